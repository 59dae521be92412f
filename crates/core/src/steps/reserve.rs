//! One reservation attempt, as a linear state machine.
//!
//! ```text
//! OpenDate -> PickDate -> ChooseCategory -> PickSlot -> Confirm -> Verify
//! ```
//!
//! Any stage may end the attempt early. Nothing is cached between attempts:
//! every call starts again at `OpenDate` with fresh lookups.

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, trace};

use super::settle;
use crate::error::PageError;
use crate::markup::ReservationMarkup;
use crate::page::{ElementHandle, PageController, Readiness, first_non_empty, resolve_first, wait_until};
use crate::target::{BookingDate, BookingTarget};

/// Why an attempt did not book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
	ElementNotFound(String),
	WaitTimedOut(String),
	UnexpectedPageState(String),
	/// The calendar has no selectable cell for this date yet.
	DateUnavailable(String),
	/// The portal showed an error or "already reserved" message; holds its text.
	Rejected(String),
	/// Neither a success nor a failure indicator appeared.
	NoConfirmation,
}

impl fmt::Display for FailureReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ElementNotFound(what) => write!(f, "{what} not found"),
			Self::WaitTimedOut(what) => write!(f, "timed out waiting for {what}"),
			Self::UnexpectedPageState(detail) => write!(f, "unexpected page state: {detail}"),
			Self::DateUnavailable(date) => write!(f, "date {date} not selectable"),
			Self::Rejected(message) if message.is_empty() => f.write_str("portal rejected the reservation"),
			Self::Rejected(message) => write!(f, "portal rejected the reservation: {message}"),
			Self::NoConfirmation => f.write_str("no confirmation shown"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
	Success,
	RetryableFailure(FailureReason),
	FatalFailure(FailureReason),
}

impl AttemptResult {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success)
	}
}

impl fmt::Display for AttemptResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Success => f.write_str("success"),
			Self::RetryableFailure(reason) => write!(f, "retryable: {reason}"),
			Self::FatalFailure(reason) => write!(f, "fatal: {reason}"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
	OpenDate,
	PickDate,
	ChooseCategory,
	PickSlot,
	Confirm,
	Verify,
}

enum Transition {
	Next(Stage),
	Done(AttemptResult),
}

fn retry(reason: FailureReason) -> Transition {
	Transition::Done(AttemptResult::RetryableFailure(reason))
}

struct Attempt<'a, P: ?Sized> {
	page: &'a P,
	target: &'a BookingTarget,
	date: BookingDate,
	markup: &'a ReservationMarkup,
}

/// Runs one full attempt to reserve `target`'s slot on `today + date_offset`.
///
/// Driver failures are classified rather than returned: a lost browser
/// session is fatal, anything else is worth another attempt.
pub async fn attempt_reservation<P>(page: &P, target: &BookingTarget, today: NaiveDate, markup: &ReservationMarkup) -> AttemptResult
where
	P: PageController + ?Sized,
{
	let attempt = Attempt {
		page,
		target,
		date: target.booking_date(today),
		markup,
	};

	let mut stage = Stage::OpenDate;
	loop {
		trace!(target = "slotbook.step", ?stage, "reservation stage");
		let transition = match attempt.advance(stage).await {
			Ok(transition) => transition,
			Err(err) => Transition::Done(classify(err)),
		};
		match transition {
			Transition::Next(next) => stage = next,
			Transition::Done(result) => {
				debug!(target = "slotbook.step", ?stage, %result, "attempt finished");
				return result;
			}
		}
	}
}

fn classify(err: PageError) -> AttemptResult {
	match err {
		PageError::SessionLost(detail) => AttemptResult::FatalFailure(FailureReason::UnexpectedPageState(detail)),
		PageError::Stale => AttemptResult::RetryableFailure(FailureReason::UnexpectedPageState("element went stale".into())),
		PageError::Driver(detail) => AttemptResult::RetryableFailure(FailureReason::UnexpectedPageState(detail)),
	}
}

impl<P> Attempt<'_, P>
where
	P: PageController + ?Sized,
{
	async fn advance(&self, stage: Stage) -> Result<Transition, PageError> {
		let page = self.page;
		let bounds = *page.bounds();

		match stage {
			Stage::OpenDate => {
				let Some(input) = resolve_first(page, &self.markup.date_input, Readiness::Clickable, bounds.step).await? else {
					return Ok(retry(FailureReason::WaitTimedOut("date picker".into())));
				};
				page.click(&input).await?;
				settle(bounds.render_pause).await;
				Ok(Transition::Next(Stage::PickDate))
			}
			Stage::PickDate => {
				let (day, full) = (self.date.day_of_month(), self.date.full());
				let cell = self.markup.date_cell.render(&[("day", day.as_str()), ("date", full.as_str())]);
				let Some(cell) = resolve_first(page, &cell, Readiness::Clickable, bounds.date_cell).await? else {
					return Ok(retry(FailureReason::DateUnavailable(full)));
				};
				page.click(&cell).await?;
				settle(bounds.render_pause).await;
				Ok(Transition::Next(Stage::ChooseCategory))
			}
			Stage::ChooseCategory => {
				if resolve_first(page, &self.markup.category_select, Readiness::Present, bounds.step).await?.is_none() {
					return Ok(retry(FailureReason::WaitTimedOut("category selector".into())));
				}
				let Some(option) = self.category_option().await? else {
					return Ok(retry(FailureReason::ElementNotFound(format!("category option {:?}", self.target.category()))));
				};
				page.click(&option).await?;
				settle(bounds.slot_load_pause).await;
				Ok(Transition::Next(Stage::PickSlot))
			}
			Stage::PickSlot => {
				let Some(slot) = wait_until(page, bounds.step, move || self.open_slot()).await? else {
					return Ok(retry(FailureReason::WaitTimedOut(format!("open slot {:?}", self.target.slot()))));
				};
				page.click(&slot).await?;
				settle(bounds.render_pause).await;
				Ok(Transition::Next(Stage::Confirm))
			}
			Stage::Confirm => {
				let Some(button) = resolve_first(page, &self.markup.reserve_button, Readiness::Clickable, bounds.step).await? else {
					return Ok(retry(FailureReason::WaitTimedOut("reserve button".into())));
				};
				page.click(&button).await?;
				Ok(Transition::Next(Stage::Verify))
			}
			Stage::Verify => {
				let confirmation = self.markup.confirmation_for(self.target.slot());
				let success = self.markup.success.render(&[("confirmation", confirmation.as_str())]);
				if resolve_first(page, &success, Readiness::Present, bounds.explicit).await?.is_some() {
					return Ok(Transition::Done(AttemptResult::Success));
				}
				if let Some(shown) = resolve_first(page, &self.markup.failure, Readiness::Present, bounds.step).await? {
					let message = page.read_text(&shown).await?;
					return Ok(retry(FailureReason::Rejected(message.trim().to_string())));
				}
				Ok(retry(FailureReason::NoConfirmation))
			}
		}
	}

	/// The option whose trimmed text is exactly the target category.
	async fn category_option(&self) -> Result<Option<ElementHandle>, PageError> {
		let Some(options) = first_non_empty(self.page, &self.markup.category_options).await? else {
			return Ok(None);
		};
		for option in options {
			if self.page.read_text(&option).await?.trim() == self.target.category() {
				return Ok(Some(option));
			}
		}
		Ok(None)
	}

	/// First clickable slot labelled with the target slot and not marked reserved.
	async fn open_slot(&self) -> Result<Option<ElementHandle>, PageError> {
		let marker = self.markup.reserved_marker.to_lowercase();
		for locator in self.markup.slots.iter() {
			for slot in self.page.find_all_elements(locator).await? {
				if !self.page.read_text(&slot).await?.contains(self.target.slot()) {
					continue;
				}
				let class = self.page.read_attribute(&slot, "class").await?.unwrap_or_default();
				if !marker.is_empty() && class.to_lowercase().contains(&marker) {
					continue;
				}
				if self.page.is_clickable(&slot).await? {
					return Ok(Some(slot));
				}
			}
		}
		Ok(None)
	}
}
