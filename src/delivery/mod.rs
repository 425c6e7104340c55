pub mod webhook;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// No channel with this name is known to the delivery backend.
    #[error("channel not found: {0}")]
    ChannelUnresolved(String),
    #[error("delivery to {channel} failed: {reason}")]
    Transport { channel: String, reason: String },
}

/// Chat-platform collaborator: posts text into a channel looked up by name.
#[async_trait]
pub trait Channel: Send + Sync {
    async fn deliver(&self, channel: &str, text: &str) -> Result<(), DeliveryError>;
}
