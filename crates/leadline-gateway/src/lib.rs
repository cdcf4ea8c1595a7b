//! HTTP front door and message dispatcher for the Leadline responder.
//!
//! The gateway terminates Meta's webhook protocol (subscription
//! verification, payload signatures) and feeds verified traffic through the
//! WhatsApp channel adapter into the [`Dispatcher`], which serializes
//! per-sender handling.
//!
//! # Main types
//!
//! - [`GatewayServer`] — Builds the axum router.
//! - [`Dispatcher`] — Per-sender worker queues over the engine.

/// Per-sender dispatch of inbound messages.
pub mod dispatcher;
/// Axum server and webhook handlers.
pub mod server;
/// Webhook payload signature verification.
pub mod signature;

pub use dispatcher::Dispatcher;
pub use server::{AppState, GatewayServer};
pub use signature::verify_signature;
