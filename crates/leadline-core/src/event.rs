use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lead status recorded with every log event.
///
/// The rendered strings are the contract with downstream reporting; sinks
/// must not re-map them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTag {
    /// The sender received the main menu.
    #[serde(rename = "Engaged")]
    Engaged,
    /// The sender picked a menu option.
    #[serde(rename = "Interested")]
    Interested,
    /// The sender expressed purchase intent.
    #[serde(rename = "HOT_LEAD")]
    HotLead,
    /// The sender asked for urgent support.
    #[serde(rename = "PRIORITY")]
    Priority,
    /// The sender requested a callback.
    #[serde(rename = "CALL_BACK")]
    CallBack,
    /// The sender introduced themselves by name.
    #[serde(rename = "QUALIFIED_LEAD")]
    QualifiedLead,
    /// The sender booked a demo slot.
    #[serde(rename = "DEMO_BOOKED")]
    DemoBooked,
    /// The message was not understood.
    #[serde(rename = "NEEDS_HELP")]
    NeedsHelp,
}

impl StatusTag {
    /// The tag as it appears in the lead log.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusTag::Engaged => "Engaged",
            StatusTag::Interested => "Interested",
            StatusTag::HotLead => "HOT_LEAD",
            StatusTag::Priority => "PRIORITY",
            StatusTag::CallBack => "CALL_BACK",
            StatusTag::QualifiedLead => "QUALIFIED_LEAD",
            StatusTag::DemoBooked => "DEMO_BOOKED",
            StatusTag::NeedsHelp => "NEEDS_HELP",
        }
    }
}

impl std::fmt::Display for StatusTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lead-log row describing a handled interaction.
///
/// Created by the engine for the duration of a single message-handling call
/// and handed to the sink; never read back by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Unique identifier for this event.
    pub id: Uuid,
    /// Sender identifier the event belongs to.
    pub sender: String,
    /// The sender's name, where one is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Short label for what the sender did (e.g. `Pricing Requested`).
    pub choice_label: String,
    /// Free-text detail for the reporting sheet.
    pub detail: String,
    /// Lead status after this interaction.
    pub status: StatusTag,
    /// When the interaction was handled.
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    /// Creates a lead-log event with a fresh id.
    pub fn new(
        sender: impl Into<String>,
        display_name: Option<String>,
        choice_label: impl Into<String>,
        detail: impl Into<String>,
        status: StatusTag,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.into(),
            display_name,
            choice_label: choice_label.into(),
            detail: detail.into(),
            status,
            timestamp,
        }
    }
}
