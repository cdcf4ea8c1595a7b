//! Conversational core of the Leadline responder.
//!
//! Classifies each inbound message into an [`Intent`] with an ordered rule
//! table, maps the intent through a pure state transition, and runs the
//! resulting side effects (persist, reply, lead log) in a fixed order.
//!
//! # Main types
//!
//! - [`IntentResolver`] — Ordered keyword/capture rules over one message.
//! - [`SessionEngine`] — Drives a full message-handling turn.
//! - [`Turn`] — Reply, successor state and lead-log event of one turn.

/// Free-text capture parsers (name introduction, demo booking).
pub mod capture;
/// The message-handling engine and its pure transition.
pub mod engine;
/// Intent classification rules.
pub mod intent;
/// Reply copy and lead-log labels.
pub mod reply;

pub use capture::DemoBooking;
pub use engine::{transition, SessionEngine, Turn};
pub use intent::{Intent, IntentResolver};
