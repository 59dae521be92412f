use tracing::info;

use super::require;
use crate::error::StepError;
use crate::markup::NavigationMarkup;
use crate::page::{PageController, Readiness};

/// Opens the application launcher and then the booking application.
pub async fn navigate_to_target_area<P>(page: &P, markup: &NavigationMarkup) -> Result<(), StepError>
where
	P: PageController + ?Sized,
{
	let explicit = page.bounds().explicit;

	let launcher = require(page, &markup.app_launcher, Readiness::Clickable, explicit, "application launcher").await?;
	page.click(&launcher).await?;

	let entry = require(page, &markup.app_entry, Readiness::Clickable, explicit, "booking application").await?;
	page.click(&entry).await?;

	info!(target = "slotbook.step", "opened booking application");
	Ok(())
}
