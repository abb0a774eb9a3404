use thiserror::Error;

/// Top-level error type for agriwaste.
///
/// A lookup that matches no active record is not an error: resolvers
/// return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum AgriError {
    /// Connectivity or timeout failure talking to the record store.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Initial store connection failed. Fatal, raised before serving.
    #[error("startup failure: {0}")]
    Startup(String),

    /// Missing or invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgriError {
    /// Whether this error means the store could not be reached in time.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
