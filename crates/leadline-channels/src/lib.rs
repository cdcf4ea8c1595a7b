//! Chat transport abstraction for the Leadline responder.
//!
//! Provides a unified [`Channel`] trait for outbound replies and a concrete
//! WhatsApp Cloud API adapter that also parses inbound webhook payloads into
//! [`leadline_core::InboundMessage`]s.
//!
//! # Main types
//!
//! - [`Channel`] — Trait for sending replies on a platform.
//! - [`ChannelEvent`] — Inbound traffic forwarded to the dispatcher.
//! - [`WhatsAppChannel`] — WhatsApp Cloud API adapter.

/// Core channel trait and event types.
pub mod channel;
/// WhatsApp Cloud API integration.
pub mod whatsapp;

pub use channel::{Channel, ChannelEvent};
pub use whatsapp::{WebhookPayload, WhatsAppChannel};
