//! Discord webhook delivery.
//!
//! Each channel name maps to one webhook URL. Messages are posted as the
//! configured username.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::delivery::{Channel, DeliveryError};

/// Discord webhook client.
pub struct WebhookChannel {
    webhooks: HashMap<String, SecretString>,
    username: String,
    http: reqwest::Client,
}

/// Discord webhook message format.
#[derive(Debug, Serialize)]
struct DiscordMessage<'a> {
    content: &'a str,
    username: &'a str,
}

impl WebhookChannel {
    pub fn new(webhooks: HashMap<String, SecretString>, username: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            webhooks,
            username,
            http,
        })
    }

    /// Channel lookup is case-insensitive.
    pub fn resolve(&self, channel: &str) -> Option<&SecretString> {
        self.webhooks.get(&channel.to_lowercase())
    }

    pub fn channel_count(&self) -> usize {
        self.webhooks.len()
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    async fn deliver(&self, channel: &str, text: &str) -> Result<(), DeliveryError> {
        let url = self
            .resolve(channel)
            .ok_or_else(|| DeliveryError::ChannelUnresolved(channel.to_string()))?;

        let payload = DiscordMessage {
            content: text,
            username: &self.username,
        };

        let response = self
            .http
            .post(url.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport {
                channel: channel.to_string(),
                // Strip the URL, it carries the webhook token.
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Transport {
                channel: channel.to_string(),
                reason: format!("webhook returned {status}"),
            });
        }

        debug!(channel, "Message delivered");
        Ok(())
    }
}
