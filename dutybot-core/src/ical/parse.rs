//! Feed text to day-indexed calendar.

use std::collections::BTreeMap;

use crate::error::{DutyError, DutyResult};
use crate::ical::record::EventRecord;

/// Day (`YYYYMMDD`) -> UID -> record. Built fresh on every load; `BTreeMap`
/// keys give the deterministic day/uid iteration order the diff relies on.
pub type CalendarIndex = BTreeMap<String, BTreeMap<String, EventRecord>>;

const CALENDAR_MARKER: &str = "BEGIN:VCALENDAR";
const EVENT_BEGIN: &str = "BEGIN:VEVENT";
const EVENT_END: &str = "END:VEVENT";

/// Parse a whole feed body into a [`CalendarIndex`].
///
/// A body without a `BEGIN:VCALENDAR` marker is rejected before any block
/// scan: feeds behind an expired credential tend to come back as an HTML
/// login page, and treating that as an empty calendar would announce every
/// event as removed.
///
/// A block failing [`EventRecord::parse`] fails the whole load. Skipping it
/// would hide a data-quality problem from the roster.
pub fn parse_calendar(content: &str) -> DutyResult<CalendarIndex> {
    if !content.contains(CALENDAR_MARKER) {
        return Err(DutyError::Fetch(
            "response is not an iCalendar document".to_string(),
        ));
    }

    let mut index = CalendarIndex::new();

    for block in EventBlocks::new(content) {
        let record = EventRecord::parse(block)?;
        let day = record.start_date().to_string();
        let uid = record.uid().to_string();

        // Same (day, uid) seen twice: the later block wins.
        index.entry(day).or_default().insert(uid, record);
    }

    Ok(index)
}

/// Yields the text between each `BEGIN:VEVENT` marker and the next
/// `END:VEVENT` marker. A plain scan, not a regex: equivalent to the
/// non-greedy match but immune to backtracking on untrusted input.
/// An unterminated final block yields nothing.
struct EventBlocks<'a> {
    rest: &'a str,
}

impl<'a> EventBlocks<'a> {
    fn new(content: &'a str) -> Self {
        EventBlocks { rest: content }
    }
}

impl<'a> Iterator for EventBlocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.rest.find(EVENT_BEGIN)?;
        let body = &self.rest[start + EVENT_BEGIN.len()..];
        let end = body.find(EVENT_END)?;

        self.rest = &body[end + EVENT_END.len()..];
        Some(&body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(events: &[&str]) -> String {
        let mut out = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n");
        for event in events {
            out.push_str("BEGIN:VEVENT\r\n");
            out.push_str(event);
            out.push_str("\r\nEND:VEVENT\r\n");
        }
        out.push_str("END:VCALENDAR\r\n");
        out
    }

    #[test]
    fn indexes_events_by_day_and_uid() {
        let content = feed(&[
            "UID:u1\r\nDTSTART;VALUE=DATE:20240101\r\nSUMMARY:D1:Amy",
            "UID:u2\r\nDTSTART;VALUE=DATE:20240101\r\nSUMMARY:D2:Zoe",
            "UID:u3\r\nDTSTART;VALUE=DATE:20240102\r\nSUMMARY:D1:Bob",
        ]);

        let index = parse_calendar(&content).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index["20240101"].len(), 2);
        assert_eq!(index["20240101"]["u1"].summary(), Some("D1:Amy"));
        assert_eq!(index["20240102"]["u3"].summary(), Some("D1:Bob"));
    }

    #[test]
    fn empty_calendar_yields_empty_index() {
        let content = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n";

        let index = parse_calendar(content).unwrap();

        assert!(index.is_empty());
    }

    #[test]
    fn non_calendar_body_is_a_fetch_error() {
        let content = "<html><body>Please sign in</body></html>";

        let err = parse_calendar(content).unwrap_err();

        assert!(matches!(err, DutyError::Fetch(_)));
    }

    #[test]
    fn later_block_wins_on_day_uid_collision() {
        let content = feed(&[
            "UID:u1\r\nDTSTART;VALUE=DATE:20240101\r\nSUMMARY:first",
            "UID:u1\r\nDTSTART;VALUE=DATE:20240101\r\nSUMMARY:second",
        ]);

        let index = parse_calendar(&content).unwrap();

        assert_eq!(index["20240101"].len(), 1);
        assert_eq!(index["20240101"]["u1"].summary(), Some("second"));
    }

    #[test]
    fn unterminated_final_block_is_ignored() {
        let content = "BEGIN:VCALENDAR\r\n\
                       BEGIN:VEVENT\r\n\
                       UID:u1\r\n\
                       DTSTART;VALUE=DATE:20240101\r\n\
                       SUMMARY:D1:Amy\r\n\
                       END:VEVENT\r\n\
                       BEGIN:VEVENT\r\n\
                       UID:u2\r\n";

        let index = parse_calendar(content).unwrap();

        assert_eq!(index.len(), 1);
        assert!(index["20240101"].contains_key("u1"));
    }

    #[test]
    fn malformed_block_fails_the_whole_load() {
        let content = feed(&[
            "UID:u1\r\nDTSTART;VALUE=DATE:20240101\r\nSUMMARY:D1:Amy",
            "DTSTART;VALUE=DATE:20240102\r\nSUMMARY:no uid here",
        ]);

        let err = parse_calendar(&content).unwrap_err();

        assert!(matches!(err, DutyError::MalformedEvent(_)));
    }

    #[test]
    fn scanner_handles_bare_newlines() {
        let content = "BEGIN:VCALENDAR\n\
                       BEGIN:VEVENT\n\
                       UID:u1\n\
                       DTSTART;VALUE=DATE:20240101\n\
                       SUMMARY:D1:Amy\n\
                       END:VEVENT\n\
                       END:VCALENDAR\n";

        let index = parse_calendar(content).unwrap();

        assert_eq!(index["20240101"]["u1"].summary(), Some("D1:Amy"));
    }
}
