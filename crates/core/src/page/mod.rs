//! Page controller capability.
//!
//! Workflow steps never talk to a browser directly; they drive a
//! [`PageController`]. The real implementation is [`WebDriverPage`]; tests use
//! [`FakePage`], a scripted in-memory DOM.
//!
//! Waits are explicit: every controller carries its [`WaitBounds`], fixed at
//! construction, and steps poll through [`wait_until`] / [`resolve_first`].

pub mod fake;
pub mod locator;
pub mod wait;
pub mod webdriver;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::PageError;

pub use fake::{Call, FakeElement, FakePage, Reaction};
pub use locator::{Locator, SelectorSet, xpath_literal};
pub use wait::{Readiness, first_match, first_non_empty, resolve_first, wait_for_absence, wait_until};
pub use webdriver::{LaunchOptions, WebDriverPage};

pub type Result<T> = std::result::Result<T, PageError>;

/// Opaque reference to an element located on the current page.
///
/// Handles are only valid until the page re-renders; steps re-query instead
/// of caching them across attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn id(&self) -> &str {
		&self.0
	}
}

/// Wait configuration handed to a controller when it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitBounds {
	/// Per-lookup wait applied by the driver itself (WebDriver implicit timeout).
	pub implicit: Duration,
	/// Long wait for page transitions (login, navigation, booking confirmation).
	pub explicit: Duration,
	/// Wait for controls inside a reservation attempt.
	pub step: Duration,
	/// Wait for the target calendar cell.
	pub date_cell: Duration,
	/// Interval between polls of a waited-for condition.
	pub poll_interval: Duration,
	/// Pause after opening the date picker, picking a date and picking a slot.
	pub render_pause: Duration,
	/// Pause after choosing the category, while the slot list reloads.
	pub slot_load_pause: Duration,
}

impl Default for WaitBounds {
	fn default() -> Self {
		Self {
			implicit: Duration::ZERO,
			explicit: Duration::from_secs(20),
			step: Duration::from_secs(5),
			date_cell: Duration::from_secs(3),
			poll_interval: Duration::from_millis(100),
			render_pause: Duration::from_millis(500),
			slot_load_pause: Duration::from_secs(1),
		}
	}
}

impl WaitBounds {
	/// Bounds that never wait: every condition is checked exactly once.
	pub fn immediate() -> Self {
		Self {
			implicit: Duration::ZERO,
			explicit: Duration::ZERO,
			step: Duration::ZERO,
			date_cell: Duration::ZERO,
			poll_interval: Duration::ZERO,
			render_pause: Duration::ZERO,
			slot_load_pause: Duration::ZERO,
		}
	}
}

/// Browser automation capability consumed by the workflow steps.
#[async_trait]
pub trait PageController: Send + Sync {
	/// Wait bounds this controller was built with.
	fn bounds(&self) -> &WaitBounds;

	async fn navigate(&self, url: &str) -> Result<()>;

	async fn current_url(&self) -> Result<String>;

	/// First element matching `locator`, or `None`.
	async fn find_element(&self, locator: &Locator) -> Result<Option<ElementHandle>>;

	/// All elements matching `locator`, in document order.
	async fn find_all_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>>;

	async fn click(&self, element: &ElementHandle) -> Result<()>;

	async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<()>;

	/// Text content of the element (including text hidden by styling).
	async fn read_text(&self, element: &ElementHandle) -> Result<String>;

	async fn read_attribute(&self, element: &ElementHandle, name: &str) -> Result<Option<String>>;

	async fn is_displayed(&self, element: &ElementHandle) -> Result<bool>;

	/// Displayed and enabled.
	async fn is_clickable(&self, element: &ElementHandle) -> Result<bool>;

	/// Releases the browser session. Calling it twice is a no-op.
	async fn close(&self) -> Result<()>;
}
