//! Set-partition diff over two calendar indexes.

use std::collections::BTreeMap;

use crate::diff::{ChangeEntry, ChangeKind};
use crate::ical::{CalendarIndex, EventRecord};

/// Compute the changes that turn `old` into `new`.
///
/// Days only in `new` contribute an `Addition` per event; days only in `old`
/// a `Removal` per event. Within a shared day the same partition runs over
/// UIDs, and a UID present on both sides becomes an `Update` exactly when
/// the `SUMMARY` fields differ. Other fields are carried but never compared.
///
/// Entries come back sorted by day, then UID, so two identical diffs render
/// identically.
pub fn diff_indexes(new: &CalendarIndex, old: &CalendarIndex) -> Vec<ChangeEntry> {
    let mut changes = Vec::new();

    for (day, events) in new {
        match old.get(day) {
            Some(old_events) => diff_day(day, events, old_events, &mut changes),
            None => {
                changes.extend(events.values().map(|event| ChangeEntry::addition(day, event)));
            }
        }
    }

    for (day, events) in old {
        if !new.contains_key(day) {
            changes.extend(events.values().map(|event| ChangeEntry::removal(day, event)));
        }
    }

    changes.sort_by(|a, b| {
        (a.day.as_str(), a.event.uid()).cmp(&(b.day.as_str(), b.event.uid()))
    });

    changes
}

fn diff_day(
    day: &str,
    new_events: &BTreeMap<String, EventRecord>,
    old_events: &BTreeMap<String, EventRecord>,
    changes: &mut Vec<ChangeEntry>,
) {
    for (uid, event) in new_events {
        match old_events.get(uid) {
            Some(previous) => {
                if event.summary() != previous.summary() {
                    changes.push(ChangeEntry::update(day, event, previous));
                }
            }
            None => changes.push(ChangeEntry::addition(day, event)),
        }
    }

    for (uid, event) in old_events {
        if !new_events.contains_key(uid) {
            changes.push(ChangeEntry::removal(day, event));
        }
    }
}
