//! HTTP client for the W3C WebDriver protocol.
//!
//! [`WebDriverClient`] talks to a driver endpoint (for example a local
//! `chromedriver`); [`WebDriverSession`] wraps one browser session created on
//! it. Every command is a JSON request answered by a `{"value": ...}`
//! envelope, see [`slotbook_protocol::ValueResponse`].

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use slotbook_protocol::{ElementReference, ErrorValue, FindElement, LocatorStrategy, NavigateTo, NewSessionRequest, NewSessionResponse, SendKeys, Timeouts, ValueResponse};
use tracing::{debug, trace};
use url::Url;

use crate::error::{Result, RuntimeError};

/// Connection to a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
	http: reqwest::Client,
	base: Url,
}

impl WebDriverClient {
	/// Creates a client for `endpoint` (e.g. `http://127.0.0.1:9515`).
	///
	/// A path prefix such as `/wd/hub` is kept; commands are resolved below it.
	pub fn new(endpoint: &str) -> Result<Self> {
		let mut base = Url::parse(endpoint).map_err(|source| RuntimeError::InvalidEndpoint {
			endpoint: endpoint.to_string(),
			source,
		})?;
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());
			base.set_path(&path);
		}

		Ok(Self {
			http: reqwest::Client::new(),
			base,
		})
	}

	pub fn endpoint(&self) -> &Url {
		&self.base
	}

	/// Returns `true` when the driver reports it can create new sessions.
	pub async fn ready(&self) -> Result<bool> {
		let status: JsonValue = self.command(Method::GET, "status", None::<&()>).await?;
		Ok(status.get("ready").and_then(JsonValue::as_bool).unwrap_or(false))
	}

	/// Opens a new browser session.
	pub async fn new_session(&self, request: &NewSessionRequest) -> Result<WebDriverSession> {
		let response: NewSessionResponse = self.command(Method::POST, "session", Some(request)).await?;
		debug!(target = "slotbook.driver", session = %response.session_id, "webdriver session created");

		Ok(WebDriverSession {
			client: self.clone(),
			id: response.session_id,
		})
	}

	async fn command<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		let url = self
			.base
			.join(path)
			.map_err(|source| RuntimeError::InvalidEndpoint {
				endpoint: format!("{}{path}", self.base),
				source,
			})?;
		trace!(target = "slotbook.driver", %method, %url, "webdriver command");

		let mut request = self.http.request(method, url);
		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request.send().await?;
		let status = response.status();
		let bytes = response.bytes().await?;

		if status.is_success() {
			let envelope: ValueResponse<T> =
				serde_json::from_slice(&bytes).map_err(|e| RuntimeError::Protocol(format!("{path}: {e}")))?;
			return Ok(envelope.value);
		}

		match serde_json::from_slice::<ValueResponse<ErrorValue>>(&bytes) {
			Ok(envelope) => Err(RuntimeError::WebDriver {
				error: envelope.value.error,
				message: envelope.value.message,
			}),
			Err(_) => Err(RuntimeError::Protocol(format!(
				"{path}: HTTP {status} with body {}",
				String::from_utf8_lossy(&bytes)
			))),
		}
	}
}

/// One browser session on a WebDriver endpoint.
#[derive(Debug)]
pub struct WebDriverSession {
	client: WebDriverClient,
	id: String,
}

impl WebDriverSession {
	pub fn id(&self) -> &str {
		&self.id
	}

	fn path(&self, rest: &str) -> String {
		if rest.is_empty() {
			format!("session/{}", self.id)
		} else {
			format!("session/{}/{rest}", self.id)
		}
	}

	fn element_path(&self, element: &ElementReference, rest: &str) -> String {
		self.path(&format!("element/{}/{rest}", element.id))
	}

	pub async fn set_timeouts(&self, timeouts: Timeouts) -> Result<()> {
		let _: JsonValue = self.client.command(Method::POST, &self.path("timeouts"), Some(&timeouts)).await?;
		Ok(())
	}

	pub async fn navigate(&self, url: &str) -> Result<()> {
		let body = NavigateTo { url: url.to_string() };
		let _: JsonValue = self.client.command(Method::POST, &self.path("url"), Some(&body)).await?;
		Ok(())
	}

	pub async fn current_url(&self) -> Result<String> {
		self.client.command(Method::GET, &self.path("url"), None::<&()>).await
	}

	/// Finds the first element matching the locator; `None` when nothing matches.
	pub async fn find_element(&self, using: LocatorStrategy, value: &str) -> Result<Option<ElementReference>> {
		let body = FindElement {
			using,
			value: value.to_string(),
		};
		match self.client.command(Method::POST, &self.path("element"), Some(&body)).await {
			Ok(element) => Ok(Some(element)),
			Err(err) if err.is_no_such_element() => Ok(None),
			Err(err) => Err(err),
		}
	}

	pub async fn find_elements(&self, using: LocatorStrategy, value: &str) -> Result<Vec<ElementReference>> {
		let body = FindElement {
			using,
			value: value.to_string(),
		};
		self.client.command(Method::POST, &self.path("elements"), Some(&body)).await
	}

	pub async fn click(&self, element: &ElementReference) -> Result<()> {
		let _: JsonValue = self
			.client
			.command(Method::POST, &self.element_path(element, "click"), Some(&json!({})))
			.await?;
		Ok(())
	}

	pub async fn send_keys(&self, element: &ElementReference, text: &str) -> Result<()> {
		let body = SendKeys { text: text.to_string() };
		let _: JsonValue = self.client.command(Method::POST, &self.element_path(element, "value"), Some(&body)).await?;
		Ok(())
	}

	/// Reads a DOM property; `null` properties come back as `None`.
	pub async fn property(&self, element: &ElementReference, name: &str) -> Result<Option<String>> {
		let value: JsonValue = self
			.client
			.command(Method::GET, &self.element_path(element, &format!("property/{name}")), None::<&()>)
			.await?;
		Ok(json_to_string(value))
	}

	pub async fn attribute(&self, element: &ElementReference, name: &str) -> Result<Option<String>> {
		let value: JsonValue = self
			.client
			.command(Method::GET, &self.element_path(element, &format!("attribute/{name}")), None::<&()>)
			.await?;
		Ok(json_to_string(value))
	}

	pub async fn displayed(&self, element: &ElementReference) -> Result<bool> {
		self.client.command(Method::GET, &self.element_path(element, "displayed"), None::<&()>).await
	}

	pub async fn enabled(&self, element: &ElementReference) -> Result<bool> {
		self.client.command(Method::GET, &self.element_path(element, "enabled"), None::<&()>).await
	}

	/// Ends the browser session.
	pub async fn delete(&self) -> Result<()> {
		let _: JsonValue = self.client.command(Method::DELETE, &self.path(""), None::<&()>).await?;
		debug!(target = "slotbook.driver", session = %self.id, "webdriver session deleted");
		Ok(())
	}
}

fn json_to_string(value: JsonValue) -> Option<String> {
	match value {
		JsonValue::Null => None,
		JsonValue::String(s) => Some(s),
		other => Some(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoint_gets_trailing_slash() {
		let client = WebDriverClient::new("http://127.0.0.1:9515/wd/hub").unwrap();
		assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:9515/wd/hub/");
		assert_eq!(client.endpoint().join("session").unwrap().as_str(), "http://127.0.0.1:9515/wd/hub/session");
	}

	#[test]
	fn invalid_endpoint_is_rejected() {
		let err = WebDriverClient::new("not a url").unwrap_err();
		assert!(matches!(err, RuntimeError::InvalidEndpoint { .. }));
	}

	#[test]
	fn json_values_flatten_to_strings() {
		assert_eq!(json_to_string(JsonValue::Null), None);
		assert_eq!(json_to_string(json!("btn active")), Some("btn active".into()));
		assert_eq!(json_to_string(json!(3)), Some("3".into()));
	}
}
