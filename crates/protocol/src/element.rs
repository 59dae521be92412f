//! Element lookup and interaction payloads.

use serde::{Deserialize, Serialize};

/// Key under which W3C WebDriver serializes a web element reference.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a07c-4e4ab8b8c66c";

/// Locator strategies accepted by `POST /session/{id}/element(s)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LocatorStrategy {
	#[serde(rename = "css selector")]
	Css,
	#[serde(rename = "xpath")]
	XPath,
	#[serde(rename = "link text")]
	LinkText,
	#[serde(rename = "tag name")]
	TagName,
}

/// Body of `POST /session/{id}/element` and `.../elements`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindElement {
	pub using: LocatorStrategy,
	pub value: String,
}

/// Opaque element reference returned by find endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ElementReference {
	#[serde(rename = "element-6066-11e4-a07c-4e4ab8b8c66c")]
	pub id: String,
}

/// Body of `POST .../element/{id}/value`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendKeys {
	pub text: String,
}

/// Body of `POST /session/{id}/url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigateTo {
	pub url: String,
}
