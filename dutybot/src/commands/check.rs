//! Feed sanity check: fetch, parse, and print what the bot would see.

use anyhow::Result;
use dutybot_core::ical::Calendar;

use crate::config::Config;
use crate::render;

pub async fn run(config: Config) -> Result<()> {
    let calendar =
        Calendar::connect_with_timeout(&config.calendar.ical_url, config.calendar.fetch_timeout)
            .await?;

    println!("Feed OK: {}", calendar.url());

    let today = render::today_key();
    let summaries = calendar.summaries_on(&today);
    if summaries.is_empty() {
        println!("No events today ({})", render::human_date(&today));
    } else {
        println!("On duty today ({}):", render::human_date(&today));
        for summary in summaries {
            println!("  {summary}");
        }
    }

    Ok(())
}
