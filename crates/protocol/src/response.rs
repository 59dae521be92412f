//! Response envelopes.
//!
//! Every WebDriver response body is `{"value": ...}`. Failed commands carry an
//! error object inside `value` instead of the command result.

use serde::{Deserialize, Serialize};

/// Success envelope: `{"value": T}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueResponse<T> {
	pub value: T,
}

/// Error object carried inside `value` on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorValue {
	pub error: String,
	#[serde(default)]
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stacktrace: Option<String>,
}

/// Error codes the client reacts to (W3C WebDriver §6.6).
pub mod error_code {
	pub const NO_SUCH_ELEMENT: &str = "no such element";
	pub const STALE_ELEMENT_REFERENCE: &str = "stale element reference";
	pub const ELEMENT_NOT_INTERACTABLE: &str = "element not interactable";
	pub const ELEMENT_CLICK_INTERCEPTED: &str = "element click intercepted";
	pub const INVALID_SESSION_ID: &str = "invalid session id";
	pub const SESSION_NOT_CREATED: &str = "session not created";
}
