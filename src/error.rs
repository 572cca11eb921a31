//! Error types
//!
//! The simulation itself is infallible once running; errors only arise while
//! configuring or starting a session.

/// Tuning (balance config) errors
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is out of range
    #[error("Invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Errors that prevent a session from starting
#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    /// No renderer hook was supplied
    #[error("no renderer attached; refusing to start")]
    MissingRenderer,

    /// No input source was supplied
    #[error("no input source attached; refusing to start")]
    MissingInput,

    /// Tuning failed validation
    #[error("invalid tuning: {0}")]
    InvalidTuning(#[from] TuningError),
}
