use crate::channel::{Channel, ChannelEvent};
use async_trait::async_trait;
use leadline_core::{display_phone, InboundMessage, LeadlineError, LeadlineResult, MessageKind};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v20.0";

/// WhatsApp Cloud API channel adapter.
///
/// Uses the Graph API `/{phone_number_id}/messages` endpoint for outbound
/// text replies. Inbound traffic arrives through Meta's webhook; the gateway
/// hands each verified payload to [`ingest`](WhatsAppChannel::ingest), which
/// forwards every message as a [`ChannelEvent`] through a
/// `tokio::sync::mpsc` channel.
pub struct WhatsAppChannel {
    access_token: String,
    phone_number_id: String,
    api_base: Option<String>,
    client: reqwest::Client,
    event_tx: Mutex<Option<mpsc::Sender<ChannelEvent>>>,
    event_rx: Option<mpsc::Receiver<ChannelEvent>>,
}

// ── Graph API types ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    messaging_product: &'a str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'a str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
    #[serde(default)]
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
    #[serde(default)]
    code: Option<i64>,
}

// ── Webhook payload types ───────────────────────────────────────────────────

/// Top-level webhook notification from Meta.
///
/// Only the parts the responder consumes are modeled; unknown fields are
/// ignored during deserialization.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookChange {
    pub value: ChangeValue,
}

/// The `value` object of one webhook change: new messages and/or delivery
/// status updates.
#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
    #[serde(default)]
    pub statuses: Vec<DeliveryStatus>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub from: String,
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    pub text: Option<IncomingText>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingText {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryStatus {
    #[serde(default)]
    pub recipient_id: String,
    pub status: String,
}

// ── Implementation ──────────────────────────────────────────────────────────

impl WhatsAppChannel {
    /// Create a new `WhatsAppChannel`.
    ///
    /// * `access_token` – A Cloud API access token for the business account.
    /// * `phone_number_id` – The sending phone number id, not the number.
    /// * `event_buffer` – Capacity of the internal mpsc event buffer.
    pub fn new(
        access_token: impl Into<String>,
        phone_number_id: impl Into<String>,
        event_buffer: usize,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(event_buffer);
        Self {
            access_token: access_token.into(),
            phone_number_id: phone_number_id.into(),
            api_base: None,
            client: reqwest::Client::new(),
            event_tx: Mutex::new(Some(event_tx)),
            event_rx: Some(event_rx),
        }
    }

    /// Override the Graph API base URL (used by tests to point at a mock).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Take the receiving half of the event channel.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<ChannelEvent>> {
        self.event_rx.take()
    }

    /// Close the inbound event stream.
    ///
    /// Drops the sending half of the event channel, so the receiver taken
    /// with [`take_event_receiver`](Self::take_event_receiver) ends once
    /// already-queued events are drained. Later `ingest` calls fail;
    /// outbound `send` is unaffected.
    pub async fn close_events(&self) {
        self.event_tx.lock().await.take();
    }

    /// Forward one verified webhook payload into the event channel.
    ///
    /// Every `messages[]` element becomes an [`InboundMessage`]; messages
    /// without a text body (media, reactions, contacts) are forwarded with
    /// an empty string so the conversation flow still advances. Delivery
    /// `statuses[]` are forwarded as [`MessageKind::Status`] events and left
    /// for the dispatcher to discard.
    pub async fn ingest(&self, payload: WebhookPayload) -> LeadlineResult<()> {
        let Some(event_tx) = self.event_tx.lock().await.clone() else {
            return Err(LeadlineError::Channel(
                "WhatsApp event stream is closed".to_string(),
            ));
        };

        for entry in payload.entry {
            for change in entry.changes {
                for msg in change.value.messages {
                    let text = match msg.text {
                        Some(t) => t.body,
                        None => {
                            debug!(
                                sender = %display_phone(&msg.from),
                                message_type = msg.message_type.as_deref().unwrap_or("unknown"),
                                "Non-text message; forwarding with empty body"
                            );
                            String::new()
                        }
                    };

                    let kind = MessageKind::from_sender(&msg.from);
                    let inbound = InboundMessage::new(msg.from, text, kind);

                    event_tx
                        .send(ChannelEvent::MessageReceived(inbound))
                        .await
                        .map_err(|e| {
                            LeadlineError::Channel(format!("WhatsApp event forward error: {e}"))
                        })?;
                }

                for status in change.value.statuses {
                    let inbound = InboundMessage::new(
                        status.recipient_id,
                        status.status,
                        MessageKind::Status,
                    );

                    event_tx
                        .send(ChannelEvent::MessageReceived(inbound))
                        .await
                        .map_err(|e| {
                            LeadlineError::Channel(format!("WhatsApp event forward error: {e}"))
                        })?;
                }
            }
        }

        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn api_url(&self) -> String {
        let base = self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        format!("{}/{}/messages", base, self.phone_number_id)
    }
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, to: &str, body: &str) -> LeadlineResult<()> {
        let url = self.api_url();

        let payload = SendMessageRequest {
            messaging_product: "whatsapp",
            to: display_phone(to),
            message_type: "text",
            text: TextBody { body },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LeadlineError::Channel(format!("WhatsApp send error: {e}")))?;

        let body: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| LeadlineError::Channel(format!("WhatsApp parse error: {e}")))?;

        if let Some(err) = body.error {
            return Err(LeadlineError::Channel(format!(
                "WhatsApp send failed (code {}): {}",
                err.code.unwrap_or_default(),
                err.message
            )));
        }

        if let Some(sent) = body.messages.first() {
            debug!(message_id = %sent.id, "WhatsApp message accepted");
        }

        Ok(())
    }
}
