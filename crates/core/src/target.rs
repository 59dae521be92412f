//! What to book and when.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Portals open bookings days ahead, never more than a year.
pub const MAX_DATE_OFFSET: u32 = 366;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
	#[error("hour must be below 24, got {0}")]
	Hour(u32),
	#[error("minute must be below 60, got {0}")]
	Minute(u32),
	#[error("second buffer must be below 60, got {0}")]
	SecondBuffer(u32),
	#[error("date offset must be at most {MAX_DATE_OFFSET} days, got {0}")]
	DateOffset(u32),
	#[error("{0} label must not be empty")]
	EmptyLabel(&'static str),
}

/// Immutable booking configuration: the wall-clock minute the portal opens
/// reservations, how far ahead the reserved date lies, and which resource to
/// take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingTarget {
	hour: u32,
	minute: u32,
	second_buffer: u32,
	date_offset: u32,
	category: String,
	slot: String,
}

impl BookingTarget {
	pub fn new(
		hour: u32,
		minute: u32,
		second_buffer: u32,
		date_offset: u32,
		category: impl Into<String>,
		slot: impl Into<String>,
	) -> Result<Self, TargetError> {
		if hour >= 24 {
			return Err(TargetError::Hour(hour));
		}
		if minute >= 60 {
			return Err(TargetError::Minute(minute));
		}
		if second_buffer >= 60 {
			return Err(TargetError::SecondBuffer(second_buffer));
		}
		if date_offset > MAX_DATE_OFFSET {
			return Err(TargetError::DateOffset(date_offset));
		}
		let category = category.into().trim().to_string();
		let slot = slot.into().trim().to_string();
		if category.is_empty() {
			return Err(TargetError::EmptyLabel("category"));
		}
		if slot.is_empty() {
			return Err(TargetError::EmptyLabel("slot"));
		}

		Ok(Self {
			hour,
			minute,
			second_buffer,
			date_offset,
			category,
			slot,
		})
	}

	pub fn hour(&self) -> u32 {
		self.hour
	}

	pub fn minute(&self) -> u32 {
		self.minute
	}

	/// Seconds into the target minute before the first attempt.
	pub fn second_buffer(&self) -> u32 {
		self.second_buffer
	}

	pub fn date_offset(&self) -> u32 {
		self.date_offset
	}

	pub fn category(&self) -> &str {
		&self.category
	}

	pub fn slot(&self) -> &str {
		&self.slot
	}

	/// `today` at `hour:minute:00`.
	pub fn target_instant(&self, today: NaiveDate) -> NaiveDateTime {
		// validated in `new`
		let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN);
		today.and_time(time)
	}

	pub fn booking_date(&self, today: NaiveDate) -> BookingDate {
		let date = today.checked_add_days(Days::new(u64::from(self.date_offset)));
		BookingDate(date.unwrap_or(NaiveDate::MAX))
	}
}

/// The date being reserved, with the two forms the portal's calendar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BookingDate(NaiveDate);

impl BookingDate {
	/// Day of month without padding, e.g. `"5"`.
	pub fn day_of_month(&self) -> String {
		self.0.day().to_string()
	}

	/// `DD-Mon-YYYY`, e.g. `"05-Aug-2025"`.
	pub fn full(&self) -> String {
		self.0.format("%d-%b-%Y").to_string()
	}
}

impl fmt::Display for BookingDate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.full())
	}
}
