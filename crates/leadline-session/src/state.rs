use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of a sender in the scripted conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationStep {
    /// First contact; no menu has been served yet.
    New,
    /// The main menu was sent and a 1–5 reply is expected.
    MenuSent,
    /// The sender picked a menu option.
    OptionSelected {
        /// The selected option, 1–5.
        choice: u8,
    },
}

/// Durable per-sender conversation state.
///
/// Created lazily on first contact and updated on every handled message;
/// never deleted by the core (retention is the store's concern).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current position in the conversation.
    pub step: ConversationStep,
    /// Name parsed from a free-text introduction, if any. Re-introducing a
    /// new name overwrites this.
    pub display_name: Option<String>,
    /// The last menu option served, 1–5. Set on a successful menu match and
    /// never cleared afterwards.
    pub last_choice: Option<u8>,
    /// First-contact timestamp. Immutable after creation.
    pub joined_at: DateTime<Utc>,
    /// Updated on every handled message.
    pub last_active_at: DateTime<Utc>,
}

impl SessionState {
    /// Fresh state for a sender seen for the first time at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            step: ConversationStep::New,
            display_name: None,
            last_choice: None,
            joined_at: now,
            last_active_at: now,
        }
    }

    /// Mark the session active at `now`. `joined_at` is left untouched.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active_at = now;
    }
}
