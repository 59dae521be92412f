//! The timed booking orchestrator.
//!
//! Sleeps until shortly before the target minute, then drives a bounded
//! burst of reservation attempts while the window is open:
//!
//! ```text
//!   target - (buffer + lead)   target + buffer     target + 60s     target + close_after
//!   |-- spin ------------------|-- attempt --------|-- spin ---------|-- closed
//! ```
//!
//! The window also closes when the target hour ends, whichever comes first.
//!
//! The orchestrator never fails; every run ends in exactly one
//! [`BookingOutcome`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DurationRound, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::markup::ReservationMarkup;
use crate::page::PageController;
use crate::steps::{AttemptResult, FailureReason, attempt_reservation};
use crate::target::BookingTarget;

/// One reservation attempt against whatever the orchestrator is driving.
#[async_trait]
pub trait ReservationAttempt: Send + Sync {
	/// `today` is the date of the target instant.
	async fn attempt(&self, today: NaiveDate) -> AttemptResult;
}

/// [`ReservationAttempt`] that runs the workflow step on a page.
pub struct PageReservation<'a, P: ?Sized> {
	page: &'a P,
	target: &'a BookingTarget,
	markup: &'a ReservationMarkup,
}

impl<'a, P: ?Sized> PageReservation<'a, P> {
	pub fn new(page: &'a P, target: &'a BookingTarget, markup: &'a ReservationMarkup) -> Self {
		Self { page, target, markup }
	}
}

#[async_trait]
impl<P> ReservationAttempt for PageReservation<'_, P>
where
	P: PageController + ?Sized,
{
	async fn attempt(&self, today: NaiveDate) -> AttemptResult {
		attempt_reservation(self.page, self.target, today, self.markup).await
	}
}

/// Timing of the rapid-retry phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Attempts allowed per run. Waiting for the window does not count.
	pub max_attempts: u32,
	/// Pause after a retryable failure.
	pub retry_delay: Duration,
	/// Re-check interval while waiting inside the burst phase.
	pub spin_interval: Duration,
	/// How long before `target + buffer` the coarse sleep ends.
	pub lead: Duration,
	/// Past `target + stale_after` the run gives up without trying.
	pub stale_after: Duration,
	/// At `target + close_after` the burst phase gives up.
	pub close_after: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: 10,
			retry_delay: Duration::from_secs(1),
			spin_interval: Duration::from_millis(100),
			lead: Duration::from_secs(5),
			stale_after: Duration::from_secs(5 * 60),
			close_after: Duration::from_secs(3 * 60),
		}
	}
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
	Booked { attempts: u32 },
	/// Every allowed attempt failed.
	Exhausted { attempts: u32 },
	/// The window closed before the attempts ran out.
	WindowClosed { attempts: u32 },
	/// Started too late to try at all.
	WindowPassed,
	/// An attempt failed in a way retrying cannot fix.
	Aborted { attempts: u32, reason: FailureReason },
}

impl BookingOutcome {
	pub fn succeeded(&self) -> bool {
		matches!(self, Self::Booked { .. })
	}

	pub fn attempts(&self) -> u32 {
		match self {
			Self::Booked { attempts } | Self::Exhausted { attempts } | Self::WindowClosed { attempts } | Self::Aborted { attempts, .. } => *attempts,
			Self::WindowPassed => 0,
		}
	}
}

impl fmt::Display for BookingOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Booked { attempts } => write!(f, "booked after {attempts} attempt(s)"),
			Self::Exhausted { attempts } => write!(f, "not booked: all {attempts} attempts failed"),
			Self::WindowClosed { attempts } => write!(f, "not booked: window closed after {attempts} attempt(s)"),
			Self::WindowPassed => f.write_str("not booked: booking window already passed"),
			Self::Aborted { attempts, reason } => write!(f, "aborted after {attempts} attempt(s): {reason}"),
		}
	}
}

/// Where `now` falls relative to one day's booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// Too late for today.
	Passed,
	/// Sleep this long before entering the burst phase.
	Early(Duration),
	/// Inside the burst phase, not yet at `target + buffer`, or past the
	/// target minute but not yet closed.
	Waiting,
	/// Inside the target minute at or after the buffer second.
	Open,
	Closed,
}

/// The orchestrator's control state for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
	target: NaiveDateTime,
	start: NaiveDateTime,
	open: NaiveDateTime,
	open_until: NaiveDateTime,
	closed: NaiveDateTime,
	stale: NaiveDateTime,
	attempts: u32,
}

fn after(t: NaiveDateTime, d: Duration) -> NaiveDateTime {
	TimeDelta::from_std(d)
		.ok()
		.and_then(|d| t.checked_add_signed(d))
		.unwrap_or(NaiveDateTime::MAX)
}

fn before(t: NaiveDateTime, d: Duration) -> NaiveDateTime {
	TimeDelta::from_std(d)
		.ok()
		.and_then(|d| t.checked_sub_signed(d))
		.unwrap_or(NaiveDateTime::MIN)
}

impl WindowState {
	/// Window around `target`'s instant on the date of `now`.
	pub fn new(now: NaiveDateTime, target: &BookingTarget, policy: &RetryPolicy) -> Self {
		let instant = target.target_instant(now.date());
		let buffer = Duration::from_secs(u64::from(target.second_buffer()));
		// the window never outlives the target hour
		let next_hour = instant
			.duration_trunc(TimeDelta::hours(1))
			.map(|hour| after(hour, Duration::from_secs(60 * 60)))
			.unwrap_or(NaiveDateTime::MAX);
		Self {
			target: instant,
			start: before(instant, buffer + policy.lead),
			open: after(instant, buffer),
			open_until: after(instant, Duration::from_secs(60)),
			closed: after(instant, policy.close_after).min(next_hour),
			stale: after(instant, policy.stale_after),
			attempts: 0,
		}
	}

	pub fn target(&self) -> NaiveDateTime {
		self.target
	}

	pub fn attempts(&self) -> u32 {
		self.attempts
	}

	/// Phase before the burst starts: passed, early, or ready.
	pub fn coarse(&self, now: NaiveDateTime) -> Phase {
		if now > self.stale {
			Phase::Passed
		} else if now < self.start {
			Phase::Early((self.start - now).to_std().unwrap_or_default())
		} else {
			Phase::Waiting
		}
	}

	/// Phase inside the burst.
	pub fn burst(&self, now: NaiveDateTime) -> Phase {
		if now >= self.open && now < self.open_until {
			Phase::Open
		} else if now >= self.closed {
			Phase::Closed
		} else {
			Phase::Waiting
		}
	}
}

/// Drives reservation attempts against the clock.
pub struct BookingOrchestrator<C> {
	clock: C,
	target: BookingTarget,
	policy: RetryPolicy,
}

impl<C: Clock> BookingOrchestrator<C> {
	pub fn new(clock: C, target: BookingTarget) -> Self {
		Self {
			clock,
			target,
			policy: RetryPolicy::default(),
		}
	}

	pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Waits for the window and runs the burst. Terminates exactly once.
	pub async fn run<A>(&self, attempt: &A) -> BookingOutcome
	where
		A: ReservationAttempt + ?Sized,
	{
		let mut window = loop {
			let now = self.clock.now();
			let window = WindowState::new(now, &self.target, &self.policy);
			match window.coarse(now) {
				Phase::Passed => {
					info!(target = "slotbook.booking", target_time = %window.target(), %now, "booking window already passed");
					return BookingOutcome::WindowPassed;
				}
				Phase::Early(deficit) => {
					info!(target = "slotbook.booking", target_time = %window.target(), seconds = deficit.as_secs(), "sleeping until the booking window");
					self.clock.sleep(deficit).await;
				}
				_ => break window,
			}
		};

		info!(target = "slotbook.booking", target_time = %window.target(), max_attempts = self.policy.max_attempts, "entering rapid-retry phase");
		let today = window.target().date();
		while window.attempts < self.policy.max_attempts {
			let now = self.clock.now();
			match window.burst(now) {
				Phase::Open => {
					window.attempts += 1;
					let n = window.attempts;
					info!(target = "slotbook.booking", attempt = n, second = now.second(), "attempting reservation");
					match attempt.attempt(today).await {
						AttemptResult::Success => {
							info!(target = "slotbook.booking", attempt = n, "reservation confirmed");
							return BookingOutcome::Booked { attempts: n };
						}
						AttemptResult::FatalFailure(reason) => {
							warn!(target = "slotbook.booking", attempt = n, %reason, "attempt failed fatally");
							return BookingOutcome::Aborted { attempts: n, reason };
						}
						AttemptResult::RetryableFailure(reason) => {
							warn!(target = "slotbook.booking", attempt = n, %reason, "attempt failed");
							if n < self.policy.max_attempts {
								self.clock.sleep(self.policy.retry_delay).await;
							}
						}
					}
				}
				Phase::Closed => {
					info!(target = "slotbook.booking", attempts = window.attempts, "booking window closed");
					return BookingOutcome::WindowClosed { attempts: window.attempts };
				}
				_ => {
					debug!(target = "slotbook.booking", %now, "waiting for the window");
					self.clock.sleep(self.policy.spin_interval).await;
				}
			}
		}

		info!(target = "slotbook.booking", attempts = window.attempts, "attempts exhausted");
		BookingOutcome::Exhausted { attempts: window.attempts }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(2025, 7, 21).unwrap().and_hms_opt(h, m, s).unwrap()
	}

	fn window(now: NaiveDateTime) -> WindowState {
		let target = BookingTarget::new(15, 0, 5, 1, "c", "s").unwrap();
		WindowState::new(now, &target, &RetryPolicy::default())
	}

	#[test]
	fn coarse_phases() {
		assert_eq!(window(at(14, 0, 0)).coarse(at(14, 0, 0)), Phase::Early(Duration::from_secs(3590)));
		assert_eq!(window(at(14, 59, 50)).coarse(at(14, 59, 50)), Phase::Waiting);
		assert_eq!(window(at(15, 5, 0)).coarse(at(15, 5, 0)), Phase::Waiting);
		assert_eq!(window(at(15, 5, 1)).coarse(at(15, 5, 1)), Phase::Passed);
	}

	#[test]
	fn burst_phases() {
		let w = window(at(15, 0, 0));
		assert_eq!(w.burst(at(14, 59, 55)), Phase::Waiting);
		assert_eq!(w.burst(at(15, 0, 4)), Phase::Waiting);
		assert_eq!(w.burst(at(15, 0, 5)), Phase::Open);
		assert_eq!(w.burst(at(15, 0, 59)), Phase::Open);
		assert_eq!(w.burst(at(15, 1, 0)), Phase::Waiting);
		assert_eq!(w.burst(at(15, 2, 59)), Phase::Waiting);
		assert_eq!(w.burst(at(15, 3, 0)), Phase::Closed);
	}

	#[test]
	fn late_evening_target_closes_across_midnight() {
		let target = BookingTarget::new(23, 59, 0, 1, "c", "s").unwrap();
		let w = WindowState::new(at(23, 59, 0), &target, &RetryPolicy::default());
		let after_midnight = NaiveDate::from_ymd_opt(2025, 7, 22).unwrap().and_hms_opt(0, 2, 0).unwrap();
		assert_eq!(w.burst(after_midnight), Phase::Closed);
		assert_eq!(w.burst(after_midnight - TimeDelta::minutes(2)), Phase::Closed);
	}

	#[test]
	fn window_closes_when_the_hour_rolls_over() {
		let target = BookingTarget::new(15, 58, 5, 1, "c", "s").unwrap();
		let w = WindowState::new(at(15, 58, 0), &target, &RetryPolicy::default());
		assert_eq!(w.burst(at(15, 58, 5)), Phase::Open);
		assert_eq!(w.burst(at(15, 59, 59)), Phase::Waiting);
		assert_eq!(w.burst(at(16, 0, 0)), Phase::Closed);
	}

	#[test]
	fn outcome_reports_attempts() {
		assert!(BookingOutcome::Booked { attempts: 3 }.succeeded());
		assert_eq!(BookingOutcome::Exhausted { attempts: 10 }.attempts(), 10);
		assert_eq!(BookingOutcome::WindowPassed.attempts(), 0);
		assert_eq!(BookingOutcome::Booked { attempts: 1 }.to_string(), "booked after 1 attempt(s)");
	}
}
