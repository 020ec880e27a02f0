use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use snafu::{ResultExt, Snafu};
use tracing::info;

use crate::report::Report;

const BOT_USERNAME: &str = "EarningsBot";

#[derive(Debug, Snafu)]
pub enum NotifyError {
    #[snafu(display("Webhook request failed: {source}"))]
    Http { source: reqwest::Error },
    #[snafu(display("Webhook returned status {status}"))]
    Status { status: StatusCode },
}

pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

/// Outbound channel for finished reports.
#[async_trait]
pub trait Notify {
    async fn send(&self, report: &Report) -> NotifyResult<()>;
}

/// Publishes reports as Discord webhook embeds.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("earnings-bot/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Notify for DiscordNotifier {
    async fn send(&self, report: &Report) -> NotifyResult<()> {
        let payload = json!({
            "username": BOT_USERNAME,
            "embeds": [{
                "title": report.title(),
                "color": report.outcome().color(),
                "author": {
                    "name": report.name,
                    "url": report.quote_url(),
                    "icon_url": report.logo_url(),
                },
            }],
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .context(HttpSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return StatusSnafu { status }.fail();
        }

        info!(ticker = %report.ticker, "Published report");
        Ok(())
    }
}
