//! The scheduler daemon: a periodic update check plus a daily roster post.

use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDateTime, NaiveTime};
use dutybot_core::ical::Calendar;
use dutybot_core::roster::RosterClient;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::render;
use crate::slack::SlackClient;

pub async fn run(config: Config) -> Result<()> {
    let slack = SlackClient::new(&config.slack.token);
    let roster = match &config.roster {
        Some(roster_config) => Some(RosterClient::with_timeout(
            &roster_config.url,
            &roster_config.cookie,
            config.calendar.fetch_timeout,
        )?),
        None => None,
    };

    let mut calendar =
        Calendar::connect_with_timeout(&config.calendar.ical_url, config.calendar.fetch_timeout)
            .await?;
    info!(url = %calendar.url(), "Calendar loaded");

    let post_time = config.calendar.daily_post_time()?;

    let mut check_tick = time::interval(config.calendar.check_interval);
    check_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; we just loaded, so skip it.
    check_tick.tick().await;

    // The post deadline persists across iterations and only advances after
    // the post fires. A slow change check that runs past it leaves the
    // remaining wait at zero, so the roster goes out late instead of being
    // skipped for the day.
    let mut next_post = next_occurrence(post_time, Local::now().naive_local());

    info!(
        interval = ?config.calendar.check_interval,
        daily_post = %config.calendar.daily_post_time,
        "Scheduler running"
    );

    loop {
        tokio::select! {
            _ = check_tick.tick() => {
                if let Err(err) = check_for_updates(&mut calendar, &slack, &config).await {
                    report_tick_failure(&slack, &config, "checking the calendar", &err).await;
                }
            }
            _ = time::sleep(until(next_post)) => {
                if let Err(err) = post_daily_roster(&calendar, roster.as_ref(), &slack, &config).await {
                    report_tick_failure(&slack, &config, "posting the daily roster", &err).await;
                }
                next_post = next_occurrence(post_time, Local::now().naive_local());
            }
        }
    }
}

/// Reload the feed and announce every change to the trade channel.
async fn check_for_updates(
    calendar: &mut Calendar,
    slack: &SlackClient,
    config: &Config,
) -> Result<()> {
    let changes = calendar.reload_and_diff().await?;

    if changes.is_empty() {
        debug!("No calendar changes");
        return Ok(());
    }

    info!(changes = changes.len(), "Calendar changed");
    for change in &changes {
        let message = render::render_change(change, &config.members);
        slack
            .post_attachment(
                config.slack.changes_channel(),
                Some(&message.pretext),
                &message.text,
            )
            .await?;
    }

    Ok(())
}

/// Post one message per on-duty member to the duty channel, taken from the
/// roster export when one is configured, otherwise from the calendar feed.
pub async fn post_daily_roster(
    calendar: &Calendar,
    roster: Option<&RosterClient>,
    slack: &SlackClient,
    config: &Config,
) -> Result<()> {
    let lines = match roster {
        Some(roster) => {
            let emails = roster.fetch_emails().await?;
            emails.iter().map(|email| format!("*{email}*")).collect()
        }
        None => {
            let today = render::today_key();
            let summaries = calendar.summaries_on(&today);
            if summaries.is_empty() {
                info!(day = %today, "No one on duty today");
                return Ok(());
            }
            render::render_roster(&summaries, &config.members)
        }
    };

    for line in lines {
        slack
            .post_attachment(config.slack.roster_channel(), None, &line)
            .await?;
    }

    Ok(())
}

/// A failed tick is logged and posted as a crash notice; the loop continues.
async fn report_tick_failure(
    slack: &SlackClient,
    config: &Config,
    while_doing: &str,
    err: &anyhow::Error,
) {
    error!(error = %err, "Scheduled tick failed while {while_doing}");

    let notice = format!("dutybot hit an error while {while_doing}:\n{err}");
    if let Err(post_err) = slack
        .post_attachment(config.slack.changes_channel(), None, &notice)
        .await
    {
        error!(error = %post_err, "Could not post the crash notice");
    }
}

/// The first occurrence of `at` strictly after `after`: today or tomorrow.
fn next_occurrence(at: NaiveTime, after: NaiveDateTime) -> NaiveDateTime {
    let today_at = after.date().and_time(at);

    if today_at > after {
        today_at
    } else {
        today_at + chrono::Duration::days(1)
    }
}

/// Remaining wait until `deadline`; zero once the deadline has passed, so an
/// overdue post fires on the next loop iteration.
fn until(deadline: NaiveDateTime) -> Duration {
    (deadline - Local::now().naive_local())
        .to_std()
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn on(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_time(at(h, m, s))
    }

    #[test]
    fn deadline_later_today_stays_today() {
        let next = next_occurrence(at(16, 0, 0), on(8, 9, 30, 0));

        assert_eq!(next, on(8, 16, 0, 0));
    }

    #[test]
    fn deadline_already_passed_moves_to_tomorrow() {
        let next = next_occurrence(at(16, 0, 0), on(8, 16, 0, 5));

        assert_eq!(next, on(9, 16, 0, 0));
    }

    #[test]
    fn deadline_exactly_now_moves_to_tomorrow() {
        let next = next_occurrence(at(16, 0, 0), on(8, 16, 0, 0));

        assert_eq!(next, on(9, 16, 0, 0));
    }

    #[test]
    fn deadline_survives_a_tick_that_runs_past_it() {
        // Computed before the post time, held across a change check that
        // finishes after it: the deadline must not jump to the next day
        // until the post has actually fired.
        let next_post = next_occurrence(at(16, 0, 0), on(8, 15, 59, 59));
        assert_eq!(next_post, on(8, 16, 0, 0));

        // 16:00:05, the slow check just finished; the post is overdue, not
        // rescheduled.
        let after_slow_check = on(8, 16, 0, 5);
        assert!(next_post <= after_slow_check);
        assert_eq!(
            (next_post - after_slow_check).to_std().unwrap_or(Duration::ZERO),
            Duration::ZERO
        );

        // Only once the post fires does the deadline advance to tomorrow.
        let advanced = next_occurrence(at(16, 0, 0), after_slow_check);
        assert_eq!(advanced, on(9, 16, 0, 0));
    }
}
