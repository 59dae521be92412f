//! WebDriver plumbing: an HTTP client for the W3C protocol and the lifecycle
//! of a locally spawned `chromedriver`.

pub mod client;
pub mod driver;
pub mod error;
pub mod process;

pub use client::{WebDriverClient, WebDriverSession};
pub use driver::DriverProcess;
pub use error::{Result, RuntimeError};
