//! Slack chat sink: `chat.postMessage` with a single colored attachment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Drawn as the colored line next to every bot message.
const ATTACHMENT_COLOR: &str = "#1f4387";

pub struct SlackClient {
    http: reqwest::Client,
    token: String,
}

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    attachments: Vec<Attachment<'a>>,
}

#[derive(Serialize)]
struct Attachment<'a> {
    color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pretext: Option<&'a str>,
    text: &'a str,
}

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

impl SlackClient {
    pub fn new(token: &str) -> SlackClient {
        SlackClient {
            http: reqwest::Client::new(),
            token: token.to_string(),
        }
    }

    /// Post one attachment message to `channel`. Slack reports API-level
    /// failures in the response body, so both transport and `ok: false`
    /// bubble up as errors.
    pub async fn post_attachment(
        &self,
        channel: &str,
        pretext: Option<&str>,
        text: &str,
    ) -> Result<()> {
        let request = PostMessageRequest {
            channel,
            attachments: vec![Attachment {
                color: ATTACHMENT_COLOR,
                pretext,
                text,
            }],
        };

        let response: PostMessageResponse = self
            .http
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the Slack API")?
            .json()
            .await
            .context("Unexpected response from the Slack API")?;

        if !response.ok {
            anyhow::bail!(
                "Slack rejected the message: {}",
                response.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }

        Ok(())
    }
}
