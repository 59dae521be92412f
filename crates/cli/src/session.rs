//! Browser session lifetime: open once, close on every exit path.

use std::future::Future;

use slotbook::PageController;
use slotbook::page::{LaunchOptions, WebDriverPage};
use tracing::{info, warn};

use crate::error::{CliError, Result};

pub async fn open_page(launch: &LaunchOptions) -> Result<WebDriverPage> {
	WebDriverPage::launch(launch)
		.await
		.map_err(CliError::DriverInitializationFailed)
}

/// Runs `work` against an open page, then closes the page.
///
/// Ctrl-C cancels `work` and yields [`CliError::Interrupted`]; the page is
/// still closed before returning.
pub async fn run_guarded<P, T, F>(page: &P, work: F) -> Result<T>
where
	P: PageController + ?Sized,
	F: Future<Output = Result<T>>,
{
	let result = tokio::select! {
		result = work => result,
		() = interrupted() => {
			warn!(target = "slotbook", "interrupted, closing browser");
			Err(CliError::Interrupted)
		}
	};

	if let Err(err) = page.close().await {
		warn!(target = "slotbook", error = %err, "closing browser failed");
	} else {
		info!(target = "slotbook", "browser closed");
	}
	result
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn interrupted() {
	if tokio::signal::ctrl_c().await.is_err() {
		std::future::pending::<()>().await;
	}
}
