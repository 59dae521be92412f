//! [`PageController`] backed by a W3C WebDriver session.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use slotbook_protocol::{ChromeOptions, ElementReference, NewSessionRequest, Timeouts};
use slotbook_runtime::{DriverProcess, RuntimeError, WebDriverClient, WebDriverSession};
use tracing::{debug, info, warn};

use super::{ElementHandle, Locator, PageController, Result, WaitBounds};

/// How to obtain a browser session.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
	/// Existing driver endpoint; when `None` a driver is spawned from `chromedriver`.
	pub endpoint: Option<String>,
	pub chromedriver: PathBuf,
	pub headless: bool,
	pub bounds: WaitBounds,
	pub startup_timeout: Duration,
}

impl Default for LaunchOptions {
	fn default() -> Self {
		Self {
			endpoint: None,
			chromedriver: PathBuf::from("chromedriver"),
			headless: true,
			bounds: WaitBounds::default(),
			startup_timeout: Duration::from_secs(15),
		}
	}
}

/// A Chrome page driven over WebDriver.
pub struct WebDriverPage {
	session: WebDriverSession,
	driver: Mutex<Option<DriverProcess>>,
	bounds: WaitBounds,
	closed: AtomicBool,
}

impl WebDriverPage {
	/// Starts (or connects to) a driver and opens a Chrome session.
	///
	/// The implicit wait from `options.bounds` is installed on the session so
	/// that single lookups behave like the driver's own implicit waits.
	pub async fn launch(options: &LaunchOptions) -> std::result::Result<Self, RuntimeError> {
		let driver = match options.endpoint {
			Some(_) => None,
			None => Some(DriverProcess::spawn(&options.chromedriver, options.startup_timeout).await?),
		};
		let endpoint = match (&options.endpoint, &driver) {
			(Some(endpoint), _) => endpoint.clone(),
			(None, Some(driver)) => driver.endpoint(),
			(None, None) => return Err(RuntimeError::Launch("no driver endpoint".into())),
		};

		let client = WebDriverClient::new(&endpoint)?;
		let timeouts = Timeouts {
			implicit: Some(options.bounds.implicit.as_millis() as u64),
			..Default::default()
		};
		let request = NewSessionRequest::chrome(ChromeOptions::unattended(options.headless), Some(timeouts));
		let session = client.new_session(&request).await?;

		info!(target = "slotbook.driver", %endpoint, session = %session.id(), headless = options.headless, "browser session ready");
		Ok(Self {
			session,
			driver: Mutex::new(driver),
			bounds: options.bounds,
			closed: AtomicBool::new(false),
		})
	}
}

fn reference(element: &ElementHandle) -> ElementReference {
	ElementReference {
		id: element.id().to_string(),
	}
}

fn handle(reference: ElementReference) -> ElementHandle {
	ElementHandle::new(reference.id)
}

#[async_trait]
impl PageController for WebDriverPage {
	fn bounds(&self) -> &WaitBounds {
		&self.bounds
	}

	async fn navigate(&self, url: &str) -> Result<()> {
		debug!(target = "slotbook.driver", %url, "navigate");
		Ok(self.session.navigate(url).await?)
	}

	async fn current_url(&self) -> Result<String> {
		Ok(self.session.current_url().await?)
	}

	async fn find_element(&self, locator: &Locator) -> Result<Option<ElementHandle>> {
		let found = self.session.find_element(locator.strategy(), locator.value()).await?;
		Ok(found.map(handle))
	}

	async fn find_all_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
		let found = self.session.find_elements(locator.strategy(), locator.value()).await?;
		Ok(found.into_iter().map(handle).collect())
	}

	async fn click(&self, element: &ElementHandle) -> Result<()> {
		Ok(self.session.click(&reference(element)).await?)
	}

	async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<()> {
		Ok(self.session.send_keys(&reference(element), text).await?)
	}

	async fn read_text(&self, element: &ElementHandle) -> Result<String> {
		let text = self.session.property(&reference(element), "textContent").await?;
		Ok(text.unwrap_or_default())
	}

	async fn read_attribute(&self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
		Ok(self.session.attribute(&reference(element), name).await?)
	}

	async fn is_displayed(&self, element: &ElementHandle) -> Result<bool> {
		Ok(self.session.displayed(&reference(element)).await?)
	}

	async fn is_clickable(&self, element: &ElementHandle) -> Result<bool> {
		let reference = reference(element);
		Ok(self.session.displayed(&reference).await? && self.session.enabled(&reference).await?)
	}

	async fn close(&self) -> Result<()> {
		if self.closed.swap(true, Ordering::SeqCst) {
			return Ok(());
		}

		let deleted = self.session.delete().await;
		let driver = self.driver.lock().take();
		if let Some(driver) = driver {
			if let Err(err) = driver.shutdown().await {
				warn!(target = "slotbook.driver", error = %err, "driver shutdown failed");
			}
		}
		info!(target = "slotbook.driver", "browser session closed");
		Ok(deleted?)
	}
}
