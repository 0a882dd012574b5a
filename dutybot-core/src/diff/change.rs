use std::fmt;

use serde::Serialize;

use crate::ical::EventRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeKind {
    Addition,
    Removal,
    Update,
}

impl ChangeKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            ChangeKind::Addition => "+",
            ChangeKind::Removal => "-",
            ChangeKind::Update => "~",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One unit of difference between two snapshots of the same feed.
///
/// `previous` is `Some` exactly for [`ChangeKind::Update`]: the record the
/// event replaced. For additions and removals `event` is the record from the
/// new and old snapshot respectively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEntry {
    pub kind: ChangeKind,
    pub day: String,
    pub event: EventRecord,
    pub previous: Option<EventRecord>,
}

impl ChangeEntry {
    pub fn addition(day: &str, event: &EventRecord) -> ChangeEntry {
        ChangeEntry {
            kind: ChangeKind::Addition,
            day: day.to_string(),
            event: event.clone(),
            previous: None,
        }
    }

    pub fn removal(day: &str, event: &EventRecord) -> ChangeEntry {
        ChangeEntry {
            kind: ChangeKind::Removal,
            day: day.to_string(),
            event: event.clone(),
            previous: None,
        }
    }

    pub fn update(day: &str, event: &EventRecord, previous: &EventRecord) -> ChangeEntry {
        ChangeEntry {
            kind: ChangeKind::Update,
            day: day.to_string(),
            event: event.clone(),
            previous: Some(previous.clone()),
        }
    }
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.kind,
            self.day,
            self.event.summary().unwrap_or("(no summary)")
        )
    }
}
