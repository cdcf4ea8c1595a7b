use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How an inbound message should be routed.
///
/// Only [`MessageKind::Direct`] messages reach the engine; group chatter and
/// delivery/status updates are rejected by the dispatcher before intent
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// A one-to-one conversation message.
    Direct,
    /// A message posted in a group conversation.
    Group,
    /// An ephemeral status or delivery update, not a conversation message.
    Status,
}

impl MessageKind {
    /// Classify a message by the shape of its sender identifier.
    ///
    /// Group conversations carry a `@g.us` suffix on the wire; anything else
    /// is treated as a direct conversation. Status updates cannot be derived
    /// from the sender id and are tagged by the transport adapter instead.
    pub fn from_sender(sender: &str) -> Self {
        if sender.ends_with("@g.us") {
            MessageKind::Group
        } else {
            MessageKind::Direct
        }
    }
}

/// One inbound chat message as handed from the transport to the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Opaque sender identifier (e.g. `15550001111@c.us` or a bare wa_id).
    pub sender: String,
    /// The raw message text. Empty when the message had no text body.
    pub text: String,
    /// Routing classification of this message.
    pub kind: MessageKind,
    /// When the transport adapter received the message.
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Creates an inbound message stamped with the current time.
    pub fn new(sender: impl Into<String>, text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            kind,
            received_at: Utc::now(),
        }
    }

    /// Whether this message belongs in a one-to-one conversation flow.
    pub fn is_direct(&self) -> bool {
        self.kind == MessageKind::Direct
    }
}

/// The human-facing phone rendering of a sender id.
///
/// Strips the `@c.us` wire suffix; ids without it pass through unchanged.
/// Used inside reply texts (callback/urgent acknowledgements) and lead-log
/// rows.
pub fn display_phone(sender: &str) -> &str {
    sender.strip_suffix("@c.us").unwrap_or(sender)
}
