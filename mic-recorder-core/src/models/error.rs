use thiserror::Error;

/// Errors that can occur while recording or persisting audio.
///
/// Every variant is recoverable; the core reports it to the immediate caller
/// and never aborts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("resource exhausted: cannot reserve {requested} samples")]
    ResourceExhausted { requested: usize },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("corrupt container: {0}")]
    CorruptContainer(String),
}
