use async_trait::async_trait;
use leadline_core::{InboundMessage, LeadlineResult};

/// An inbound event forwarded from a channel adapter to the dispatcher.
#[derive(Debug)]
pub enum ChannelEvent {
    MessageReceived(InboundMessage),
}

/// Outbound side of a chat transport.
///
/// `send` delivers one plain-text reply to one recipient. Implementations
/// must be cheap to share behind an `Arc` and safe to call concurrently.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, to: &str, body: &str) -> LeadlineResult<()>;
}
