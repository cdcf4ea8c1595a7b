//! Lead-log sinks for the Leadline responder.
//!
//! Every handled interaction produces one [`leadline_core::LogEvent`]; a
//! sink is where those events go. Sinks are best-effort by contract: the
//! engine tolerates a failed `record` call, so implementations should fail
//! fast rather than retry.
//!
//! # Main types
//!
//! - [`EventSink`] — Trait for recording lead-log events.
//! - [`FileEventSink`] — Append-only JSONL file log.
//! - [`SheetsSink`] — Google Sheets `values:append` log.

/// Core sink trait.
pub mod sink;
/// JSONL file sink.
pub mod file;
/// Google Sheets sink.
pub mod sheets;

pub use file::FileEventSink;
pub use sheets::SheetsSink;
pub use sink::EventSink;
