//! Error types for the scout application layer.

/// Top-level error type for the scout CLI and its configuration.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// Configuration file could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider registry or search configuration error.
    #[error("search error: {0}")]
    Search(#[from] scout_search::ProviderError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ScoutError>;
