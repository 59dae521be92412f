//! The portal's selectors, as data.
//!
//! Defaults describe the portal's current HTML. Every field deserializes with
//! a default, so an override file only needs the lookups that drifted:
//!
//! ```json
//! { "reservation": { "reserve_button": [{ "css": "button.reserve" }] } }
//! ```
//!
//! Templated sets use `{day}`, `{date}`, `{label}` and `{confirmation}`
//! placeholders; `confirmation_sentence` uses `{slot}`.

use serde::{Deserialize, Serialize};

use crate::page::{Locator, SelectorSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMarkup {
	pub login: LoginMarkup,
	pub navigation: NavigationMarkup,
	pub category: CategoryMarkup,
	pub reservation: ReservationMarkup,
}

impl SiteMarkup {
	/// Defaults with any subset overridden by `json`.
	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}

	pub fn to_json_pretty(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}
}

fn xpaths(expressions: &[&str]) -> SelectorSet {
	SelectorSet::new(expressions.iter().map(|e| Locator::xpath(*e)).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginMarkup {
	pub user_id: SelectorSet,
	pub password: SelectorSet,
	/// Elements whose concatenated text is the challenge.
	pub captcha_chars: SelectorSet,
	pub captcha_input: SelectorSet,
	pub submit: SelectorSet,
	pub modal_backdrop: SelectorSet,
	pub popup_dismiss: SelectorSet,
	/// Post-login URL contains this.
	pub dashboard_url_fragment: String,
	pub dashboard_marker: SelectorSet,
}

impl Default for LoginMarkup {
	fn default() -> Self {
		Self {
			user_id: Locator::id("userName").into(),
			password: Locator::id("password").into(),
			captcha_chars: xpaths(&["//div[@class='preview']//span"]),
			captcha_input: Locator::id("captcha").into(),
			submit: Locator::id("login-button").into(),
			modal_backdrop: Locator::css(".modal-backdrop").into(),
			popup_dismiss: xpaths(&[
				"//button[contains(text(), 'Deny')]",
				"//button[contains(text(), 'Cancel')]",
				"//button[contains(text(), 'Close')]",
			]),
			dashboard_url_fragment: "dashboard".into(),
			dashboard_marker: xpaths(&["//div[contains(text(), 'My dashboard')]"]),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationMarkup {
	pub app_launcher: SelectorSet,
	pub app_entry: SelectorSet,
}

impl Default for NavigationMarkup {
	fn default() -> Self {
		Self {
			app_launcher: xpaths(&[
				"//button[contains(@class, 'app-launcher')]",
				"//div[contains(@class, 'header-right')]//i[contains(@class, 'fa-th')]",
				"//img[contains(@src, 'user.png')]/preceding-sibling::div/button",
			]),
			app_entry: xpaths(&[
				"//span[contains(text(), 'G-Sports')]",
				"//div[contains(@class, 'app-icon')]//img[contains(@src, 'sports')]/ancestor::a",
			]),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryMarkup {
	/// Template over `{label}`.
	pub card: SelectorSet,
}

impl Default for CategoryMarkup {
	fn default() -> Self {
		Self {
			card: xpaths(&["//div[contains(text(), {label})]"]),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationMarkup {
	pub date_input: SelectorSet,
	/// Template over `{day}` (unpadded day of month) and `{date}` (`DD-Mon-YYYY`).
	pub date_cell: SelectorSet,
	pub category_select: SelectorSet,
	pub category_options: SelectorSet,
	pub slots: SelectorSet,
	/// Slots whose class contains this (case-insensitively) are taken.
	pub reserved_marker: String,
	pub reserve_button: SelectorSet,
	/// Template over `{confirmation}`.
	pub success: SelectorSet,
	/// Template over `{slot}`, rendered into `{confirmation}`.
	pub confirmation_sentence: String,
	pub failure: SelectorSet,
}

impl Default for ReservationMarkup {
	fn default() -> Self {
		Self {
			date_input: xpaths(&[
				"//input[contains(@placeholder, 'DD-Mon-YYYY')]",
				"//div[contains(@class, 'date-picker')]//input",
			]),
			date_cell: xpaths(&[
				"//div[contains(@class, 'datepicker-days')]//td[contains(@class, 'day') and not(contains(@class, 'old')) and not(contains(@class, 'new')) and text()={day}]",
				"//div[contains(@class, 'datepicker')]//div[contains(text(), {date})]",
			]),
			category_select: xpaths(&[
				"//select[contains(@class, 'form-control') and @name='courtId']",
				"//select[contains(@name, 'fitnessCentre')]",
			]),
			category_options: xpaths(&[
				"//select[contains(@class, 'form-control') and @name='courtId']/option",
				"//select[contains(@name, 'fitnessCentre')]/option",
			]),
			slots: xpaths(&["//div[contains(@class, 'shift-slot-wrap')]//div"]),
			reserved_marker: "reserved".into(),
			reserve_button: xpaths(&["//button[contains(text(), 'Reserve')]"]),
			success: xpaths(&[
				"//div[contains(@class, 'alert-success')]",
				"//span[contains(text(), 'successfully reserved')]",
				"//div[contains(text(), {confirmation})]",
			]),
			confirmation_sentence: "You have reserved {slot} slot".into(),
			failure: xpaths(&[
				"//div[contains(@class, 'alert-danger')]",
				"//*[contains(text(), 'already reserved')]",
				"//span[contains(text(), 'Error')]",
			]),
		}
	}
}

impl ReservationMarkup {
	/// The confirmation sentence for `slot`, e.g. "You have reserved 06:00 AM to 07:00 AM slot".
	pub fn confirmation_for(&self, slot: &str) -> String {
		self.confirmation_sentence.replace("{slot}", slot)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_override_keeps_other_defaults() {
		let markup = SiteMarkup::from_json(r#"{ "reservation": { "reserve_button": [{ "css": "button.reserve" }] } }"#).unwrap();
		assert_eq!(markup.reservation.reserve_button, SelectorSet::single(Locator::css("button.reserve")));
		assert_eq!(markup.reservation.slots, ReservationMarkup::default().slots);
		assert_eq!(markup.login, LoginMarkup::default());
	}

	#[test]
	fn defaults_survive_json() {
		let markup = SiteMarkup::default();
		let json = markup.to_json_pretty().unwrap();
		assert_eq!(SiteMarkup::from_json(&json).unwrap(), markup);
	}

	#[test]
	fn date_cell_targets_the_rendered_pair() {
		let cell = ReservationMarkup::default().date_cell.render(&[("day", "22"), ("date", "22-Jul-2025")]);
		let rendered: Vec<String> = cell.iter().map(|l| l.value().to_string()).collect();
		assert!(rendered[0].ends_with("text()='22']"));
		assert!(rendered[1].contains("contains(text(), '22-Jul-2025')"));
	}

	#[test]
	fn confirmation_sentence_names_the_slot() {
		let markup = ReservationMarkup::default();
		assert_eq!(
			markup.confirmation_for("06:00 AM to 07:00 AM"),
			"You have reserved 06:00 AM to 07:00 AM slot"
		);
	}

	#[test]
	fn unknown_fields_are_ignored() {
		let markup = SiteMarkup::from_json(r#"{ "extra": true }"#).unwrap();
		assert_eq!(markup, SiteMarkup::default());
	}
}
