//! Workflow steps and the orchestrator against a scripted portal.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use slotbook::page::{Call, FakeElement, FakePage, Locator, Reaction};
use slotbook::steps::{attempt_reservation, authenticate, navigate_to_target_area, select_resource_category};
use slotbook::{
	AttemptResult, BookingOrchestrator, BookingOutcome, BookingTarget, Credentials, FailureReason, ManualClock, PageController,
	PageReservation, SiteMarkup, StepError,
};

const LOGIN_URL: &str = "https://login.example.edu/";
const CATEGORY: &str = "UniSex Fitness Centre";
const SLOT: &str = "06:00 AM to 07:00 AM";

fn target() -> BookingTarget {
	BookingTarget::new(15, 0, 5, 1, CATEGORY, SLOT).unwrap()
}

fn today() -> NaiveDate {
	NaiveDate::from_ymd_opt(2025, 7, 21).unwrap()
}

fn first(set: &slotbook::SelectorSet) -> Locator {
	set.first().unwrap().clone()
}

/// The whole portal: login form, dashboard, launcher, category card and
/// booking form. What clicking reserve shows is up to each test.
fn portal(markup: &SiteMarkup, captcha: &str) -> FakePage {
	let page = FakePage::new();
	let login = &markup.login;
	page.add(first(&login.user_id), FakeElement::new("user"));
	page.add(first(&login.password), FakeElement::new("password"));
	for (i, ch) in captcha.chars().enumerate() {
		page.add(first(&login.captcha_chars), FakeElement::new(format!("captcha-{i}")).text(ch.to_string()));
	}
	page.add(first(&login.captcha_input), FakeElement::new("captcha-input"));
	page.add(first(&login.submit), FakeElement::new("login"));
	page.on_click("login", Reaction::SetUrl("https://portal.example.edu/dashboard".into()));

	let nav = &markup.navigation;
	page.add(first(&nav.app_launcher), FakeElement::new("launcher"));
	page.on_click("launcher", Reaction::Reveal(first(&nav.app_entry), FakeElement::new("g-sports")));
	page.on_click(
		"g-sports",
		Reaction::Reveal(first(&markup.category.card.render(&[("label", CATEGORY)])), FakeElement::new("category-card")),
	);

	let form = &markup.reservation;
	page.add(first(&form.date_input), FakeElement::new("date-input"));
	let cell = form.date_cell.render(&[("day", "22"), ("date", "22-Jul-2025")]);
	page.add(first(&cell), FakeElement::new("day-22"));
	page.add(first(&form.category_select), FakeElement::new("select"));
	page.add(first(&form.category_options), FakeElement::new("option").text(CATEGORY));
	page.add(first(&form.slots), FakeElement::new("slot").text(SLOT));
	page.add(first(&form.reserve_button), FakeElement::new("reserve"));
	page
}

#[tokio::test]
async fn full_workflow_books_the_slot() -> Result<()> {
	let markup = SiteMarkup::default();
	let page = portal(&markup, "47193");
	page.on_click("reserve", Reaction::Reveal(first(&markup.reservation.success), FakeElement::new("alert-success")));
	let credentials = Credentials::new("2021000123", "secret");

	authenticate(&page, LOGIN_URL, &credentials, &markup.login).await?;
	navigate_to_target_area(&page, &markup.navigation).await?;
	select_resource_category(&page, CATEGORY, &markup.category).await?;

	let clock = Arc::new(ManualClock::new(today().and_hms_opt(15, 0, 5).unwrap()));
	let target = target();
	let attempt = PageReservation::new(&page, &target, &markup.reservation);
	let outcome = BookingOrchestrator::new(clock, target.clone()).run(&attempt).await;
	page.close().await?;

	assert_eq!(outcome, BookingOutcome::Booked { attempts: 1 });
	assert_eq!(
		page.clicks(),
		vec!["login", "launcher", "g-sports", "category-card", "date-input", "day-22", "option", "slot", "reserve"]
	);
	assert!(page.is_closed());
	Ok(())
}

#[tokio::test]
async fn malformed_captcha_stops_before_submit() {
	let markup = SiteMarkup::default();
	for captcha in ["4719", "471938", "12 3", "ab12c"] {
		let page = portal(&markup, captcha);

		let err = authenticate(&page, LOGIN_URL, &Credentials::new("u", "p"), &markup.login).await.unwrap_err();

		assert!(matches!(err, StepError::UnexpectedPageState(_)), "{captcha:?}: {err}");
		assert!(page.clicks().is_empty(), "{captcha:?} was submitted");
	}
}

#[tokio::test]
async fn already_reserved_is_retryable_every_time() {
	let markup = SiteMarkup::default();
	let page = portal(&markup, "47193");
	let already = Locator::xpath("//*[contains(text(), 'already reserved')]");
	page.on_click(
		"reserve",
		Reaction::Reveal(already, FakeElement::new("already-reserved").text(" This slot is already reserved ")),
	);
	let date_input = first(&markup.reservation.date_input);

	for _ in 0..4 {
		page.take_calls();
		let result = attempt_reservation(&page, &target(), today(), &markup.reservation).await;

		assert_eq!(
			result,
			AttemptResult::RetryableFailure(FailureReason::Rejected("This slot is already reserved".into()))
		);
		assert_eq!(result.to_string(), "retryable: portal rejected the reservation: This slot is already reserved");
		let calls = page.take_calls();
		assert_eq!(calls.first(), Some(&Call::Find(date_input.clone())));
		assert!(calls.contains(&Call::Click("date-input".into())));
	}
}

#[tokio::test]
async fn date_picker_targets_the_rendered_pair() {
	let markup = SiteMarkup::default();
	let page = portal(&markup, "47193");

	attempt_reservation(&page, &target(), today(), &markup.reservation).await;

	let finds: Vec<Locator> = page
		.calls()
		.into_iter()
		.filter_map(|call| match call {
			Call::Find(locator) => Some(locator),
			_ => None,
		})
		.collect();
	let day_cell = finds
		.iter()
		.find(|l| l.value().contains("datepicker-days"))
		.expect("date cell lookup");
	assert!(day_cell.value().ends_with("text()='22']"));
	assert!(page.clicks().contains(&"day-22".to_string()));
}

#[tokio::test]
async fn rejected_burst_exhausts_attempts() {
	let markup = SiteMarkup::default();
	let page = portal(&markup, "47193");
	page.on_click(
		"reserve",
		Reaction::Reveal(first(&markup.reservation.failure), FakeElement::new("alert-danger")),
	);

	let clock = Arc::new(ManualClock::new(today().and_hms_opt(15, 0, 5).unwrap()));
	let target = target();
	let attempt = PageReservation::new(&page, &target, &markup.reservation);
	let outcome = BookingOrchestrator::new(Arc::clone(&clock), target.clone()).run(&attempt).await;

	assert_eq!(outcome, BookingOutcome::Exhausted { attempts: 10 });
	assert_eq!(page.clicks().iter().filter(|c| *c == "reserve").count(), 10);
}

#[tokio::test]
async fn lost_browser_aborts_the_burst() {
	let markup = SiteMarkup::default();
	let page = portal(&markup, "47193");
	page.disconnect();

	let clock = Arc::new(ManualClock::new(today().and_hms_opt(15, 0, 5).unwrap()));
	let target = target();
	let attempt = PageReservation::new(&page, &target, &markup.reservation);
	let outcome = BookingOrchestrator::new(clock, target.clone()).run(&attempt).await;

	assert!(matches!(outcome, BookingOutcome::Aborted { attempts: 1, .. }));
}
