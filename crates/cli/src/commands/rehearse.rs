use tracing::info;

use super::prepare;
use crate::cli::SessionArgs;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::{open_page, run_guarded};

/// Runs the setup steps against the live portal and stops before booking.
pub async fn run(args: SessionArgs) -> Result<u8> {
	let config = SessionConfig::from_args(&args)?;
	info!(target = "slotbook", login_url = %config.login_url, category = %config.category, "rehearsing");

	let page = open_page(&config.launch).await?;
	run_guarded(&page, prepare(&page, &config)).await?;

	println!("rehearsal ok: logged in and opened {}", config.category);
	Ok(0)
}
