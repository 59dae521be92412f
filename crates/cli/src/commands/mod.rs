pub mod book;
pub mod markup;
pub mod rehearse;

use slotbook::PageController;
use slotbook::steps::{authenticate, navigate_to_target_area, select_resource_category};

use crate::cli::Commands;
use crate::config::SessionConfig;
use crate::error::{CliError, Result};

/// Runs a command and returns the process exit status.
pub async fn dispatch(command: Commands) -> Result<u8> {
	match command {
		Commands::Book(args) => book::run(args).await,
		Commands::Rehearse(args) => rehearse::run(args).await,
		Commands::Markup { markup: path } => markup::run(path.as_deref()),
	}
}

/// Login, navigation and category selection. None of these is retried.
pub(crate) async fn prepare<P>(page: &P, config: &SessionConfig) -> Result<()>
where
	P: PageController + ?Sized,
{
	let markup = &config.markup;
	authenticate(page, &config.login_url, &config.credentials, &markup.login)
		.await
		.map_err(|source| CliError::Step { step: "login", source })?;
	navigate_to_target_area(page, &markup.navigation)
		.await
		.map_err(|source| CliError::Step { step: "navigation", source })?;
	select_resource_category(page, &config.category, &markup.category)
		.await
		.map_err(|source| CliError::Step {
			step: "category selection",
			source,
		})?;
	Ok(())
}
