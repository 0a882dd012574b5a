//! Slack message rendering: @-mention substitution, human dates, and
//! change announcements.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use dutybot_core::diff::{ChangeEntry, ChangeKind};

/// A rendered change announcement: the short pretext line plus the body.
pub struct Announcement {
    pub pretext: String,
    pub text: String,
}

/// Swap known display names for `<@MEMBERID>` mentions so the post pings
/// the person. Duty summaries look like "D1:Alice": the text splits on `:`,
/// each trimmed word is looked up, and the parts rejoin with `": "`.
pub fn mention_members(text: &str, members: &BTreeMap<String, String>) -> String {
    text.split(':')
        .map(|word| {
            let word = word.trim();
            match members.get(word) {
                Some(id) => format!("<@{id}>"),
                None => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(": ")
}

/// `YYYYMMDD` to "December 08, 2019". Falls back to the raw key when it is
/// not a date, rather than dropping the announcement.
pub fn human_date(day: &str) -> String {
    match NaiveDate::parse_from_str(day, "%Y%m%d") {
        Ok(date) => date.format("%B %d, %Y").to_string(),
        Err(_) => day.to_string(),
    }
}

/// Render one change entry as a Slack announcement.
pub fn render_change(change: &ChangeEntry, members: &BTreeMap<String, String>) -> Announcement {
    let summary = change.event.summary().unwrap_or("");
    let date = human_date(&change.day);

    match change.kind {
        ChangeKind::Addition => Announcement {
            pretext: "Calendar event was added :rotating_light:".to_string(),
            text: format!("*{}*\n{}", mention_members(summary, members), date),
        },
        ChangeKind::Removal => Announcement {
            pretext: "Calendar event was deleted :rotating_light:".to_string(),
            text: format!("*~{}~*\n{}", mention_members(summary, members), date),
        },
        ChangeKind::Update => {
            let previous = change
                .previous
                .as_ref()
                .and_then(|record| record.summary())
                .unwrap_or("");
            Announcement {
                pretext: "Calendar event was updated".to_string(),
                text: format!(
                    "*~{}~*\n*{}*\n{}",
                    mention_members(previous, members),
                    mention_members(summary, members),
                    date
                ),
            }
        }
    }
}

/// One bolded, mention-parsed line per on-duty member.
pub fn render_roster(summaries: &[String], members: &BTreeMap<String, String>) -> Vec<String> {
    summaries
        .iter()
        .map(|summary| format!("*{}*", mention_members(summary, members)))
        .collect()
}

/// Today's index key in the feed's `YYYYMMDD` format.
pub fn today_key() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}
