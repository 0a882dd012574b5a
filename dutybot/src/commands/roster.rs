//! One-shot roster post: what the daily tick does, on demand.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dutybot_core::ical::Calendar;
use dutybot_core::roster::RosterClient;
use tracing::info;

use crate::commands::run::post_daily_roster;
use crate::config::Config;
use crate::render;
use crate::slack::SlackClient;

pub async fn run(config: Config, date: Option<String>) -> Result<()> {
    let slack = SlackClient::new(&config.slack.token);
    let roster = match &config.roster {
        Some(roster_config) => Some(RosterClient::with_timeout(
            &roster_config.url,
            &roster_config.cookie,
            config.calendar.fetch_timeout,
        )?),
        None => None,
    };

    let calendar =
        Calendar::connect_with_timeout(&config.calendar.ical_url, config.calendar.fetch_timeout)
            .await?;

    match date {
        // An explicit date always reads the calendar feed; the roster
        // export only knows about today.
        Some(date) => {
            let day = parse_day(&date)?;
            let summaries = calendar.summaries_on(&day);
            if summaries.is_empty() {
                info!(day = %day, "No one on duty");
                return Ok(());
            }
            for line in render::render_roster(&summaries, &config.members) {
                slack
                    .post_attachment(config.slack.roster_channel(), None, &line)
                    .await?;
            }
            Ok(())
        }
        None => post_daily_roster(&calendar, roster.as_ref(), &slack, &config).await,
    }
}

/// `YYYY-MM-DD` argument to the feed's `YYYYMMDD` index key.
fn parse_day(date: &str) -> Result<String> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{date}', expected YYYY-MM-DD"))?;
    Ok(day.format("%Y%m%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashed_date_becomes_index_key() {
        assert_eq!(parse_day("2024-01-08").unwrap(), "20240108");
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(parse_day("Jan 8").is_err());
    }
}
