//! Error handling for the Blink bridge

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or incomplete configuration (credentials not set)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Login or verification-code failure; persisted auth state is cleared
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Unknown device identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unknown setting key or malformed request
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unhandled failure from a vendor cloud call
    #[error("Integration error: {0}")]
    Integration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
