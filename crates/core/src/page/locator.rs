//! Element locators and ordered alternative sets.
//!
//! Portal markup drifts, so every lookup is a [`SelectorSet`]: alternatives
//! tried in order, first match wins. Sets may be templates containing
//! `{name}` placeholders; [`SelectorSet::render`] substitutes them with
//! properly quoted string literals for the locator's language.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotbook_protocol::LocatorStrategy;

/// A single way of locating elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
	Css(String),
	#[serde(rename = "xpath")]
	XPath(String),
}

impl Locator {
	pub fn css(selector: impl Into<String>) -> Self {
		Self::Css(selector.into())
	}

	pub fn xpath(expression: impl Into<String>) -> Self {
		Self::XPath(expression.into())
	}

	/// Element with the given `id` attribute.
	pub fn id(id: &str) -> Self {
		Self::Css(format!("#{id}"))
	}

	pub fn strategy(&self) -> LocatorStrategy {
		match self {
			Self::Css(_) => LocatorStrategy::Css,
			Self::XPath(_) => LocatorStrategy::XPath,
		}
	}

	pub fn value(&self) -> &str {
		match self {
			Self::Css(s) | Self::XPath(s) => s,
		}
	}

	/// Replaces each `{name}` placeholder with `value` quoted as a literal.
	pub fn render(&self, vars: &[(&str, &str)]) -> Self {
		match self {
			Self::Css(template) => Self::Css(substitute(template, vars, css_string)),
			Self::XPath(template) => Self::XPath(substitute(template, vars, xpath_literal)),
		}
	}
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Css(s) => write!(f, "css={s}"),
			Self::XPath(s) => write!(f, "xpath={s}"),
		}
	}
}

/// Single left-to-right pass: substituted values are never rescanned.
fn substitute(template: &str, vars: &[(&str, &str)], quote: fn(&str) -> String) -> String {
	let mut out = String::with_capacity(template.len());
	let mut rest = template;
	while let Some(open) = rest.find('{') {
		out.push_str(&rest[..open]);
		let tail = &rest[open..];
		let value = tail.find('}').and_then(|close| {
			let name = &tail[1..close];
			vars.iter().find(|(var, _)| *var == name).map(|(_, value)| (close, *value))
		});
		match value {
			Some((close, value)) => {
				out.push_str(&quote(value));
				rest = &tail[close + 1..];
			}
			None => {
				out.push('{');
				rest = &tail[1..];
			}
		}
	}
	out.push_str(rest);
	out
}

/// Quotes `value` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so a value containing both quote kinds is
/// assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
	if !value.contains('\'') {
		format!("'{value}'")
	} else if !value.contains('"') {
		format!("\"{value}\"")
	} else {
		let parts: Vec<String> = value.split('\'').map(|part| format!("'{part}'")).collect();
		format!("concat({})", parts.join(", \"'\", "))
	}
}

fn css_string(value: &str) -> String {
	format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Ordered alternatives for one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorSet(Vec<Locator>);

impl SelectorSet {
	pub fn new(alternatives: Vec<Locator>) -> Self {
		Self(alternatives)
	}

	pub fn single(locator: Locator) -> Self {
		Self(vec![locator])
	}

	pub fn iter(&self) -> impl Iterator<Item = &Locator> {
		self.0.iter()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn first(&self) -> Option<&Locator> {
		self.0.first()
	}

	pub fn render(&self, vars: &[(&str, &str)]) -> Self {
		Self(self.0.iter().map(|l| l.render(vars)).collect())
	}
}

impl From<Locator> for SelectorSet {
	fn from(locator: Locator) -> Self {
		Self::single(locator)
	}
}

impl fmt::Display for SelectorSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, locator) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(" | ")?;
			}
			write!(f, "{locator}")?;
		}
		Ok(())
	}
}
