//! iCalendar feed engine: raw VEVENT records, the block scanner, and the
//! day-indexed calendar snapshot.

mod calendar;
mod parse;
mod record;

pub use calendar::{Calendar, DEFAULT_FETCH_TIMEOUT};
pub use parse::{CalendarIndex, parse_calendar};
pub use record::{EventRecord, START_DATE, SUMMARY, UID};
