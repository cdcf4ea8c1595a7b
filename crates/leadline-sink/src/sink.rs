use async_trait::async_trait;
use leadline_core::{LeadlineResult, LogEvent};

/// Destination for lead-log events.
///
/// `record` persists one event and returns once it is durable (or handed to
/// the remote service). The engine treats sink failures as non-fatal, so a
/// lost row must never cost the sender a reply.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn record(&self, event: &LogEvent) -> LeadlineResult<()>;
}
