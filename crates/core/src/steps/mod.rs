//! The four workflow steps, each a protocol over a [`PageController`].
//!
//! Setup steps return `Result<(), StepError>` and are run once. The
//! reservation attempt classifies its own failures into an [`AttemptResult`]
//! so the orchestrator can decide whether to retry.

pub mod auth;
pub mod category;
pub mod navigate;
pub mod reserve;

use std::time::Duration;

pub use auth::{Credentials, authenticate, solve_captcha};
pub use category::select_resource_category;
pub use navigate::navigate_to_target_area;
pub use reserve::{AttemptResult, FailureReason, attempt_reservation};

use crate::error::StepError;
use crate::page::{ElementHandle, PageController, Readiness, SelectorSet, first_match, resolve_first};

/// Waits for the first ready match among `set`, or fails naming `what`.
pub(crate) async fn require<P>(
	page: &P,
	set: &SelectorSet,
	readiness: Readiness,
	timeout: Duration,
	what: &str,
) -> Result<ElementHandle, StepError>
where
	P: PageController + ?Sized,
{
	if set.is_empty() {
		return Err(StepError::not_found(what));
	}
	resolve_first(page, set, readiness, timeout)
		.await?
		.ok_or_else(|| StepError::timed_out(what, timeout))
}

/// Single lookup with no polling beyond the driver's implicit wait.
pub(crate) async fn present_now<P>(page: &P, set: &SelectorSet, what: &str) -> Result<ElementHandle, StepError>
where
	P: PageController + ?Sized,
{
	first_match(page, set, Readiness::Present)
		.await?
		.ok_or_else(|| StepError::not_found(what))
}

/// Lets the portal finish a client-side re-render.
pub(crate) async fn settle(duration: Duration) {
	if !duration.is_zero() {
		tokio::time::sleep(duration).await;
	}
}
