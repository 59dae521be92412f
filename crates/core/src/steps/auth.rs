//! Portal login.

use std::fmt;

use tracing::{debug, info};

use super::{present_now, require};
use crate::error::StepError;
use crate::markup::LoginMarkup;
use crate::page::{PageController, Readiness, first_match, first_non_empty, resolve_first, wait_for_absence, wait_until};

/// Number of digits in the portal's login challenge.
pub const CAPTCHA_LEN: usize = 5;

/// Portal login credentials. The password never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
	user_id: String,
	password: String,
}

impl Credentials {
	pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			user_id: user_id.into(),
			password: password.into(),
		}
	}

	pub fn user_id(&self) -> &str {
		&self.user_id
	}

	pub fn password(&self) -> &str {
		&self.password
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("user_id", &self.user_id)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Extracts the challenge answer from the captcha's rendered text.
///
/// Non-digits are dropped; anything other than exactly [`CAPTCHA_LEN`]
/// digits is unreadable and yields `None`.
pub fn solve_captcha(raw: &str) -> Option<String> {
	let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
	(digits.len() == CAPTCHA_LEN).then_some(digits)
}

/// Logs in at `login_url` and waits for the dashboard.
///
/// The form is only submitted once the captcha reads as exactly five digits.
/// One interstitial popup is dismissed if it shows up; none showing up is
/// fine.
pub async fn authenticate<P>(page: &P, login_url: &str, credentials: &Credentials, markup: &LoginMarkup) -> Result<(), StepError>
where
	P: PageController + ?Sized,
{
	let bounds = *page.bounds();
	info!(target = "slotbook.step", %login_url, user = credentials.user_id(), "authenticating");
	page.navigate(login_url).await?;

	let user_field = require(page, &markup.user_id, Readiness::Present, bounds.explicit, "user id field").await?;
	page.type_text(&user_field, credentials.user_id()).await?;
	let password_field = present_now(page, &markup.password, "password field").await?;
	page.type_text(&password_field, credentials.password()).await?;

	let chars = wait_until(page, bounds.explicit, || first_non_empty(page, &markup.captcha_chars))
		.await?
		.ok_or_else(|| StepError::timed_out("captcha", bounds.explicit))?;
	let mut raw = String::new();
	for element in &chars {
		raw.push_str(page.read_text(element).await?.trim());
	}
	let Some(answer) = solve_captcha(&raw) else {
		return Err(StepError::UnexpectedPageState(format!(
			"captcha unreadable: {raw:?} does not contain exactly {CAPTCHA_LEN} digits"
		)));
	};
	debug!(target = "slotbook.step", captcha = %answer, "captcha solved");

	let captcha_field = present_now(page, &markup.captcha_input, "captcha field").await?;
	page.type_text(&captcha_field, &answer).await?;
	let submit = present_now(page, &markup.submit, "login button").await?;
	page.click(&submit).await?;

	match wait_for_absence(page, &markup.modal_backdrop, bounds.step).await {
		Ok(true) => {}
		Ok(false) => debug!(target = "slotbook.step", "modal backdrop still visible"),
		Err(err) => debug!(target = "slotbook.step", error = %err, "modal backdrop check failed"),
	}
	dismiss_popup(page, markup).await;

	let reached = wait_until(page, bounds.explicit, || on_dashboard(page, markup)).await?;
	if reached.is_none() {
		return Err(StepError::timed_out("dashboard", bounds.explicit));
	}

	info!(target = "slotbook.step", "logged in");
	Ok(())
}

async fn on_dashboard<P>(page: &P, markup: &LoginMarkup) -> crate::page::Result<Option<()>>
where
	P: PageController + ?Sized,
{
	if page.current_url().await?.contains(&markup.dashboard_url_fragment) {
		return Ok(Some(()));
	}
	Ok(first_match(page, &markup.dashboard_marker, Readiness::Present).await?.map(|_| ()))
}

async fn dismiss_popup<P>(page: &P, markup: &LoginMarkup)
where
	P: PageController + ?Sized,
{
	let step = page.bounds().step;
	match resolve_first(page, &markup.popup_dismiss, Readiness::Clickable, step).await {
		Ok(Some(button)) => match page.click(&button).await {
			Ok(()) => debug!(target = "slotbook.step", "popup dismissed"),
			Err(err) => debug!(target = "slotbook.step", error = %err, "popup dismiss click failed"),
		},
		Ok(None) => debug!(target = "slotbook.step", "no popup"),
		Err(err) => debug!(target = "slotbook.step", error = %err, "popup lookup failed"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::page::{FakeElement, FakePage, Locator, Reaction};

	const LOGIN_URL: &str = "https://login.example.edu/";

	fn login_page(captcha: &[&str]) -> (FakePage, LoginMarkup) {
		let markup = LoginMarkup::default();
		let page = FakePage::new();
		page.add(Locator::id("userName"), FakeElement::new("user"));
		page.add(Locator::id("password"), FakeElement::new("password"));
		let chars = markup.captcha_chars.first().unwrap().clone();
		for (i, text) in captcha.iter().enumerate() {
			page.add(chars.clone(), FakeElement::new(format!("captcha-{i}")).text(*text));
		}
		page.add(Locator::id("captcha"), FakeElement::new("captcha-input"));
		page.add(Locator::id("login-button"), FakeElement::new("login"));
		(page, markup)
	}

	fn credentials() -> Credentials {
		Credentials::new("2021000123", "hunter2")
	}

	#[test]
	fn captcha_requires_exactly_five_digits() {
		assert_eq!(solve_captcha("4 7 1 9 3").as_deref(), Some("47193"));
		assert_eq!(solve_captcha("a4b7c1d9e3").as_deref(), Some("47193"));
		assert_eq!(solve_captcha("4719"), None);
		assert_eq!(solve_captcha("471930"), None);
		assert_eq!(solve_captcha(""), None);
	}

	#[test]
	fn debug_hides_password() {
		let rendered = format!("{:?}", credentials());
		assert!(rendered.contains("2021000123"));
		assert!(!rendered.contains("hunter2"));
	}

	#[tokio::test]
	async fn logs_in_and_reaches_dashboard() {
		let (page, markup) = login_page(&["4", "7", "1", "9", "3"]);
		page.on_click("login", Reaction::SetUrl("https://portal.example.edu/dashboard".into()));

		authenticate(&page, LOGIN_URL, &credentials(), &markup).await.unwrap();

		assert_eq!(
			page.typed(),
			vec![
				("user".to_string(), "2021000123".to_string()),
				("password".to_string(), "hunter2".to_string()),
				("captcha-input".to_string(), "47193".to_string()),
			]
		);
		assert_eq!(page.clicks(), vec!["login"]);
	}

	#[tokio::test]
	async fn dismisses_one_popup() {
		let (page, markup) = login_page(&["1", "2", "3", "4", "5"]);
		page.add(markup.popup_dismiss.iter().nth(1).unwrap().clone(), FakeElement::new("cancel"));
		page.add(markup.dashboard_marker.first().unwrap().clone(), FakeElement::new("dashboard"));

		authenticate(&page, LOGIN_URL, &credentials(), &markup).await.unwrap();
		assert_eq!(page.clicks(), vec!["login", "cancel"]);
	}

	#[tokio::test]
	async fn malformed_captcha_is_never_submitted() {
		for captcha in [&["4", "7", "1"][..], &["4", "7", "1", "9", "3", "8"][..], &["x", "y"][..]] {
			let (page, markup) = login_page(captcha);

			let err = authenticate(&page, LOGIN_URL, &credentials(), &markup).await.unwrap_err();

			assert!(matches!(err, StepError::UnexpectedPageState(_)), "{err}");
			assert!(page.clicks().is_empty());
			assert!(page.typed().iter().all(|(name, _)| name != "captcha-input"));
		}
	}

	#[tokio::test]
	async fn missing_dashboard_fails() {
		let (page, markup) = login_page(&["4", "7", "1", "9", "3"]);

		let err = authenticate(&page, LOGIN_URL, &credentials(), &markup).await.unwrap_err();
		assert!(matches!(err, StepError::WaitTimedOut { ref what, .. } if what == "dashboard"));
	}

	#[tokio::test]
	async fn missing_user_field_times_out() {
		let page = FakePage::new();
		let err = authenticate(&page, LOGIN_URL, &credentials(), &LoginMarkup::default()).await.unwrap_err();
		assert!(matches!(err, StepError::WaitTimedOut { .. }));
		assert_eq!(page.url(), LOGIN_URL);
	}
}
