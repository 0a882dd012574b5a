//! One loaded, in-memory view of a remote calendar feed.

use std::time::Duration;

use crate::diff::{ChangeEntry, diff_indexes};
use crate::error::DutyResult;
use crate::ical::parse::{CalendarIndex, parse_calendar};
use crate::ical::record::EventRecord;

/// Applied to every feed fetch so a hung feed cannot stall the scheduler
/// forever.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A snapshot of the feed at `url`. Owns exactly one [`CalendarIndex`] at a
/// time; `reload`/`reload_and_diff` replace it wholesale after a fully
/// successful fetch and parse, so a failed reload leaves the old snapshot
/// intact and a caller never observes a half-updated index.
pub struct Calendar {
    url: String,
    http: reqwest::Client,
    index: CalendarIndex,
}

impl Calendar {
    /// Fetch `url` and build the initial snapshot.
    pub async fn connect(url: &str) -> DutyResult<Calendar> {
        Self::connect_with_timeout(url, DEFAULT_FETCH_TIMEOUT).await
    }

    pub async fn connect_with_timeout(url: &str, timeout: Duration) -> DutyResult<Calendar> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let index = fetch_index(&http, url).await?;

        Ok(Calendar {
            url: url.to_string(),
            http,
            index,
        })
    }

    /// Snapshot over an already-parsed index, for sources that are not
    /// fetched by the calendar itself.
    pub fn from_index(url: &str, index: CalendarIndex) -> Calendar {
        Calendar {
            url: url.to_string(),
            http: reqwest::Client::new(),
            index,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Every event on `day` (`YYYYMMDD`). Empty when the day is absent,
    /// never an error. No ordering guarantee beyond uid order.
    pub fn events_on(&self, day: &str) -> Vec<&EventRecord> {
        self.index
            .get(day)
            .map(|events| events.values().collect())
            .unwrap_or_default()
    }

    /// The `SUMMARY` of every event on `day`, sorted lexicographically.
    pub fn summaries_on(&self, day: &str) -> Vec<String> {
        let mut summaries: Vec<String> = self
            .events_on(day)
            .into_iter()
            .filter_map(EventRecord::summary)
            .map(str::to_string)
            .collect();
        summaries.sort();
        summaries
    }

    /// Re-fetch the feed and replace the held index.
    pub async fn reload(&mut self) -> DutyResult<()> {
        self.index = fetch_index(&self.http, &self.url).await?;
        Ok(())
    }

    /// Re-fetch the feed, diff the new snapshot against the held one, swap
    /// the new index in, and return the changes.
    pub async fn reload_and_diff(&mut self) -> DutyResult<Vec<ChangeEntry>> {
        let new_index = fetch_index(&self.http, &self.url).await?;
        Ok(self.swap_and_diff(new_index))
    }

    /// The swap half of [`Calendar::reload_and_diff`], split out so the
    /// fetch stays at the network boundary.
    pub fn swap_and_diff(&mut self, new_index: CalendarIndex) -> Vec<ChangeEntry> {
        let changes = diff_indexes(&new_index, &self.index);
        self.index = new_index;
        changes
    }

    /// Diff this snapshot against an older one of the same feed.
    pub fn compare(&self, old: &Calendar) -> Vec<ChangeEntry> {
        diff_indexes(&self.index, &old.index)
    }
}

async fn fetch_index(http: &reqwest::Client, url: &str) -> DutyResult<CalendarIndex> {
    let response = http.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    parse_calendar(&body)
}
