//! Session creation payloads and timeout configuration.

use serde::{Deserialize, Serialize};

/// Body of `POST /session`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSessionRequest {
	pub capabilities: Capabilities,
}

impl NewSessionRequest {
	/// Builds a request that asks for a Chrome session with the given options.
	pub fn chrome(options: ChromeOptions, timeouts: Option<Timeouts>) -> Self {
		Self {
			capabilities: Capabilities {
				always_match: AlwaysMatch {
					browser_name: "chrome".to_string(),
					chrome_options: Some(options),
					timeouts,
				},
			},
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
	pub always_match: AlwaysMatch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlwaysMatch {
	pub browser_name: String,
	#[serde(rename = "goog:chromeOptions", skip_serializing_if = "Option::is_none", default)]
	pub chrome_options: Option<ChromeOptions>,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub timeouts: Option<Timeouts>,
}

/// Vendor-specific Chrome launch options (`goog:chromeOptions`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChromeOptions {
	#[serde(default)]
	pub args: Vec<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub exclude_switches: Vec<String>,
}

impl ChromeOptions {
	/// Options for an unattended run on a CI runner.
	///
	/// `headless` drops the visible window; the remaining flags keep Chrome
	/// stable inside containers and quiet on stderr.
	pub fn unattended(headless: bool) -> Self {
		let mut args = Vec::new();
		if headless {
			args.push("--headless".to_string());
		}
		args.extend(
			["--no-sandbox", "--disable-dev-shm-usage", "--window-size=1920,1080", "--disable-gpu", "--log-level=3"]
				.into_iter()
				.map(String::from),
		);

		Self {
			args,
			exclude_switches: vec!["enable-logging".to_string()],
		}
	}
}

/// Session timeouts in milliseconds (`POST /session/{id}/timeouts`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Timeouts {
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub implicit: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub page_load: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub script: Option<u64>,
}

/// `value` of a successful `POST /session` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
	pub session_id: String,
	#[serde(default)]
	pub capabilities: serde_json::Value,
}
