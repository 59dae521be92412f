use slotbook_protocol::error_code;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
	#[error("invalid WebDriver endpoint '{endpoint}': {source}")]
	InvalidEndpoint {
		endpoint: String,
		#[source]
		source: url::ParseError,
	},

	#[error("WebDriver request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("WebDriver error '{error}': {message}")]
	WebDriver { error: String, message: String },

	#[error("unexpected WebDriver response: {0}")]
	Protocol(String),

	#[error("failed to launch driver: {0}")]
	Launch(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl RuntimeError {
	fn code(&self) -> Option<&str> {
		match self {
			Self::WebDriver { error, .. } => Some(error.as_str()),
			_ => None,
		}
	}

	pub fn is_no_such_element(&self) -> bool {
		self.code() == Some(error_code::NO_SUCH_ELEMENT)
	}

	/// The element was found earlier but the page has since re-rendered it.
	pub fn is_stale(&self) -> bool {
		matches!(
			self.code(),
			Some(error_code::STALE_ELEMENT_REFERENCE | error_code::ELEMENT_NOT_INTERACTABLE | error_code::ELEMENT_CLICK_INTERCEPTED)
		)
	}

	/// The browser session (or the driver process behind it) is gone.
	pub fn is_session_lost(&self) -> bool {
		match self {
			Self::WebDriver { error, .. } => error == error_code::INVALID_SESSION_ID,
			Self::Http(err) => err.is_connect(),
			_ => false,
		}
	}
}
