//! Roster web-service client.
//!
//! The sibling data source next to the iCal feed: an HTTP CSV export behind
//! a session cookie, with a header row and an `Email` column. The core only
//! extracts that column; rendering happens in the bot.

use std::time::Duration;

use reqwest::header::COOKIE;

use crate::error::{DutyError, DutyResult};
use crate::ical::DEFAULT_FETCH_TIMEOUT;

const EMAIL_COLUMN: &str = "Email";

pub struct RosterClient {
    http: reqwest::Client,
    url: String,
    cookie: String,
}

impl RosterClient {
    pub fn new(url: &str, cookie: &str) -> DutyResult<RosterClient> {
        Self::with_timeout(url, cookie, DEFAULT_FETCH_TIMEOUT)
    }

    /// Same fetch timeout policy as the calendar loader: the configured
    /// timeout applies to the export fetch too.
    pub fn with_timeout(url: &str, cookie: &str, timeout: Duration) -> DutyResult<RosterClient> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(RosterClient {
            http,
            url: url.to_string(),
            cookie: cookie.to_string(),
        })
    }

    /// Fetch the CSV export and return the `Email` column in document order.
    pub async fn fetch_emails(&self) -> DutyResult<Vec<String>> {
        let body = self
            .http
            .get(&self.url)
            .header(COOKIE, &self.cookie)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        // An expired session comes back as an HTML login page, not CSV.
        if body.trim_start().starts_with('<') {
            return Err(DutyError::Fetch(
                "roster export returned HTML; the session cookie has likely expired".to_string(),
            ));
        }

        parse_email_column(&body)
    }
}

/// Pull the `Email` column out of a CSV document with a header row.
pub fn parse_email_column(content: &str) -> DutyResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let email_index = reader
        .headers()?
        .iter()
        .position(|header| header == EMAIL_COLUMN)
        .ok_or_else(|| {
            DutyError::Roster(format!("CSV export has no `{EMAIL_COLUMN}` column"))
        })?;

    let mut emails = Vec::new();
    for row in reader.records() {
        let row = row?;
        if let Some(email) = row.get(email_index) {
            if !email.is_empty() {
                emails.push(email.to_string());
            }
        }
    }

    Ok(emails)
}
