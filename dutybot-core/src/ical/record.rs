//! Raw VEVENT field records.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{DutyError, DutyResult};

/// The stable per-event identifier, used as the diffing key within a day.
pub const UID: &str = "UID";

/// The one field whose content is diffed between snapshots.
pub const SUMMARY: &str = "SUMMARY";

/// Canonical start-date field (`YYYYMMDD`). Always present after parsing,
/// derived from a zoned `DTSTART` when the feed omits the all-day form.
pub const START_DATE: &str = "DTSTART;VALUE=DATE";

const ZONED_START_PREFIX: &str = "DTSTART;TZID=";

/// One parsed VEVENT: a mapping from raw field name (`SUMMARY`, `UID`,
/// `DTSTART;VALUE=DATE`, ...) to raw field value. Immutable once built;
/// fields other than UID, SUMMARY and the start date are carried opaquely.
///
/// [`EventRecord::parse`] is the only constructor: the UID and start-date
/// invariants behind `uid()`/`start_date()` hold for every record, which is
/// why there is no `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventRecord {
    fields: BTreeMap<String, String>,
}

impl EventRecord {
    /// Parse the body of one VEVENT block (the text between `BEGIN:VEVENT`
    /// and `END:VEVENT`).
    ///
    /// Each line splits once on the first `:`; lines without a colon are
    /// dropped, not repaired, and the last occurrence of a repeated key wins.
    /// Fails when the block has no `UID` or no derivable start date.
    pub fn parse(block: &str) -> DutyResult<EventRecord> {
        let mut fields = BTreeMap::new();

        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            fields.insert(key.to_string(), value.to_string());
        }

        if !fields.contains_key(UID) {
            return Err(DutyError::MalformedEvent(format!(
                "event has no {UID} field"
            )));
        }

        let mut record = EventRecord { fields };
        record.derive_start_date()?;

        Ok(record)
    }

    /// Ensure the canonical `DTSTART;VALUE=DATE` field exists.
    ///
    /// Timed events carry a zoned start (`DTSTART;TZID=<zone>:YYYYMMDDTHHMMSS`)
    /// instead of the all-day form; the first 8 characters of that value are
    /// the date, stored back under the canonical key so downstream code only
    /// ever looks at one field name.
    fn derive_start_date(&mut self) -> DutyResult<()> {
        if self.fields.contains_key(START_DATE) {
            return Ok(());
        }

        let zoned = self
            .fields
            .iter()
            .find(|(key, _)| key.starts_with(ZONED_START_PREFIX))
            .and_then(|(_, value)| value.get(..8))
            .map(str::to_string);

        match zoned {
            Some(date) => {
                self.fields.insert(START_DATE.to_string(), date);
                Ok(())
            }
            None => Err(DutyError::MalformedEvent(format!(
                "event {} has no derivable start date",
                self.uid()
            ))),
        }
    }

    /// Raw field value, if the block carried the field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn uid(&self) -> &str {
        self.get(UID).expect("parsed record always has a UID")
    }

    pub fn start_date(&self) -> &str {
        self.get(START_DATE)
            .expect("parsed record always has a start date")
    }

    pub fn summary(&self) -> Option<&str> {
        self.get(SUMMARY)
    }
}
