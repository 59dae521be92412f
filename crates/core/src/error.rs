use std::time::Duration;

use slotbook_runtime::RuntimeError;
use thiserror::Error;

/// Failure reported by a [`PageController`](crate::page::PageController).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
	/// The element was re-rendered or detached since it was located.
	#[error("element is no longer attached to the page")]
	Stale,

	/// The browser session or its driver is gone; nothing on this page can succeed.
	#[error("browser session lost: {0}")]
	SessionLost(String),

	#[error("driver error: {0}")]
	Driver(String),
}

impl From<RuntimeError> for PageError {
	fn from(err: RuntimeError) -> Self {
		if err.is_stale() {
			Self::Stale
		} else if err.is_session_lost() {
			Self::SessionLost(err.to_string())
		} else {
			Self::Driver(err.to_string())
		}
	}
}

/// Why a one-shot workflow step (login, navigation, category) failed.
#[derive(Debug, Error)]
pub enum StepError {
	#[error("{what} not found")]
	ElementNotFound { what: String },

	#[error("timed out after {waited:?} waiting for {what}")]
	WaitTimedOut { what: String, waited: Duration },

	#[error("unexpected page state: {0}")]
	UnexpectedPageState(String),

	#[error(transparent)]
	Page(#[from] PageError),
}

impl StepError {
	pub(crate) fn timed_out(what: impl Into<String>, waited: Duration) -> Self {
		Self::WaitTimedOut { what: what.into(), waited }
	}

	pub(crate) fn not_found(what: impl Into<String>) -> Self {
		Self::ElementNotFound { what: what.into() }
	}
}
