//! Wall-clock access for the booking orchestrator.
//!
//! The orchestrator only ever asks "what time is it" and "sleep this long",
//! so both go through [`Clock`]. [`ManualClock`] makes timing tests exact.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, Local, NaiveDateTime, Utc};
use parking_lot::Mutex;

#[async_trait]
pub trait Clock: Send + Sync {
	/// Current wall-clock time in the portal's time zone.
	fn now(&self) -> NaiveDateTime;

	async fn sleep(&self, duration: Duration);
}

#[async_trait]
impl<C: Clock + ?Sized> Clock for Arc<C> {
	fn now(&self) -> NaiveDateTime {
		(**self).now()
	}

	async fn sleep(&self, duration: Duration) {
		(**self).sleep(duration).await
	}
}

/// Real time, read either in the host's local zone or at a fixed UTC offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
	offset: Option<FixedOffset>,
}

impl SystemClock {
	pub fn local() -> Self {
		Self { offset: None }
	}

	/// Reads time at `offset` regardless of the host zone (CI runners are UTC).
	pub fn with_offset(offset: FixedOffset) -> Self {
		Self { offset: Some(offset) }
	}
}

#[async_trait]
impl Clock for SystemClock {
	fn now(&self) -> NaiveDateTime {
		match self.offset {
			Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
			None => Local::now().naive_local(),
		}
	}

	async fn sleep(&self, duration: Duration) {
		tokio::time::sleep(duration).await;
	}
}

/// Clock that only moves when slept on, recording every sleep.
#[derive(Debug)]
pub struct ManualClock {
	now: Mutex<NaiveDateTime>,
	sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
	pub fn new(start: NaiveDateTime) -> Self {
		Self {
			now: Mutex::new(start),
			sleeps: Mutex::new(Vec::new()),
		}
	}

	/// Moves time forward without recording a sleep.
	pub fn advance(&self, by: Duration) {
		let mut now = self.now.lock();
		*now += by;
	}

	pub fn sleeps(&self) -> Vec<Duration> {
		self.sleeps.lock().clone()
	}

	pub fn total_slept(&self) -> Duration {
		self.sleeps.lock().iter().sum()
	}
}

#[async_trait]
impl Clock for ManualClock {
	fn now(&self) -> NaiveDateTime {
		*self.now.lock()
	}

	async fn sleep(&self, duration: Duration) {
		self.sleeps.lock().push(duration);
		self.advance(duration);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	#[tokio::test]
	async fn manual_clock_advances_on_sleep() {
		let start = NaiveDate::from_ymd_opt(2025, 7, 21).unwrap().and_hms_opt(14, 59, 0).unwrap();
		let clock = ManualClock::new(start);

		clock.sleep(Duration::from_millis(1500)).await;
		clock.sleep(Duration::from_secs(1)).await;

		assert_eq!(clock.now(), start + Duration::from_millis(2500));
		assert_eq!(clock.total_slept(), Duration::from_millis(2500));
		assert_eq!(clock.sleeps().len(), 2);
	}

	#[test]
	fn fixed_offset_clock_tracks_utc() {
		let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
		let clock = SystemClock::with_offset(ist);
		let expected = Utc::now().naive_utc() + chrono::TimeDelta::minutes(330);
		let drift = (clock.now() - expected).num_seconds().abs();
		assert!(drift <= 1, "drift was {drift}s");
	}
}
