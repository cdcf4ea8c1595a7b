//! Core types and error definitions for the Leadline responder.
//!
//! This crate provides the foundational types shared across all Leadline
//! crates: the unified error enum, the inbound message model handed from the
//! transport to the engine, and the lead-log event sent to the sink.
//!
//! # Main types
//!
//! - [`LeadlineError`] — Unified error enum for all Leadline subsystems.
//! - [`LeadlineResult`] — Convenience alias for `Result<T, LeadlineError>`.
//! - [`InboundMessage`] — One inbound chat message plus its routing metadata.
//! - [`MessageKind`] — Direct conversation, group, or status update.
//! - [`LogEvent`] — One lead-log row describing a handled interaction.
//! - [`StatusTag`] — The lead status recorded with every event.

/// Error enum and result alias.
pub mod error;
/// Lead-log event model.
pub mod event;
/// Inbound message model.
pub mod message;

pub use error::{LeadlineError, LeadlineResult};
pub use event::{LogEvent, StatusTag};
pub use message::{display_phone, InboundMessage, MessageKind};
