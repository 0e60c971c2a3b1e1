use async_trait::async_trait;

use crate::domain::errors::DeliveryError;
use crate::domain::models::{Reply, UserId};

/// Outbound side of the chat transport.
///
/// Used both for replies within a session and for per-recipient broadcast
/// sends. Every call is independent; a failure affects only that recipient.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send one message to a chat
    async fn send(&self, recipient: UserId, reply: &Reply) -> Result<(), DeliveryError>;
}
