//! Timed booking of a contended slot on a web portal.
//!
//! The crate is organised leaves first:
//!
//! - [`page`]: the [`PageController`] capability (navigate, locate, click,
//!   type, read, bounded waits) with a WebDriver-backed implementation and a
//!   scripted fake for tests.
//! - [`steps`]: the four workflow steps driven against a page controller:
//!   [`authenticate`], [`navigate_to_target_area`],
//!   [`select_resource_category`] and [`attempt_reservation`].
//! - [`booking`]: the [`BookingOrchestrator`] that parks until the booking
//!   window, then races a bounded number of reservation attempts.
//!
//! [`PageController`]: page::PageController
//! [`authenticate`]: steps::authenticate
//! [`navigate_to_target_area`]: steps::navigate_to_target_area
//! [`select_resource_category`]: steps::select_resource_category
//! [`attempt_reservation`]: steps::attempt_reservation
//! [`BookingOrchestrator`]: booking::BookingOrchestrator

pub mod booking;
pub mod clock;
pub mod error;
pub mod markup;
pub mod page;
pub mod steps;
pub mod target;

pub use booking::{BookingOrchestrator, BookingOutcome, PageReservation, Phase, ReservationAttempt, RetryPolicy, WindowState};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PageError, StepError};
pub use markup::SiteMarkup;
pub use page::{ElementHandle, Locator, PageController, SelectorSet, WaitBounds};
pub use steps::{AttemptResult, Credentials, FailureReason};
pub use target::{BookingDate, BookingTarget, TargetError};
