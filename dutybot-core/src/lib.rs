//! Core engine for dutybot.
//!
//! This crate provides the pieces the bot binary glues together:
//! - `ical` — fetches an iCalendar feed, parses its VEVENT blocks and indexes
//!   them by start date and UID
//! - `diff` — computes the semantic difference between two calendar snapshots
//! - `roster` — the sibling data source: a session-cookie CSV export

pub mod diff;
pub mod error;
pub mod ical;
pub mod roster;

pub use error::{DutyError, DutyResult};
