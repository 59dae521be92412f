//! Wire types for the W3C WebDriver protocol.
//!
//! This crate contains the serde-serializable shapes exchanged with a
//! WebDriver server (`chromedriver`) over HTTP. Types here are pure data:
//! no behavior beyond serialization, 1:1 with W3C WebDriver, and
//! only the subset the booking workflow drives.
//!
//! Higher-level HTTP plumbing lives in `slotbook-runtime`.

pub mod capabilities;
pub mod element;
pub mod response;

pub use capabilities::*;
pub use element::*;
pub use response::*;
