use thiserror::Error;

/// A convenience `Result` alias using [`LeadlineError`].
pub type LeadlineResult<T> = Result<T, LeadlineError>;

/// Top-level error type for the Leadline responder.
///
/// Each variant corresponds to a subsystem that can fail. Delivery failures
/// surface as [`LeadlineError::Channel`], session-store failures as
/// [`LeadlineError::Session`], and lead-log failures as
/// [`LeadlineError::Sink`]; the engine decides which of those are fatal to a
/// single message and which are tolerated.
#[derive(Error, Debug)]
pub enum LeadlineError {
    /// An error from the chat transport (reply could not be delivered).
    #[error("Channel error: {0}")]
    Channel(String),

    /// An error from session persistence or lookup.
    #[error("Session error: {0}")]
    Session(String),

    /// An error from the lead-log sink.
    #[error("Sink error: {0}")]
    Sink(String),

    /// An error in the message-handling engine itself.
    #[error("Engine error: {0}")]
    Engine(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
