//! Error types for the scout-search crate.
//!
//! These errors never cross the [`Provider::fetch`](crate::Provider::fetch)
//! boundary: every provider converts them into an empty result set. They
//! surface only from registry construction and config validation, and from
//! the fallible `try_fetch` layer used internally and in tests.

/// Errors produced while talking to an upstream source or setting up providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure (connection refused, DNS, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The upstream answered with a non-success status code.
    #[error("upstream returned status {status}: {context}")]
    Status {
        /// HTTP status code returned by the upstream.
        status: u16,
        /// Which call failed.
        context: String,
    },

    /// The upstream did not answer within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The upstream body could not be parsed into the expected raw shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The caller supplied unusable fetch parameters (e.g. a blank query).
    #[error("invalid fetch params: {0}")]
    InvalidParams(String),

    /// Invalid provider or aggregator configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A provider with the same name is already registered.
    #[error("duplicate provider name: {0}")]
    DuplicateProvider(String),
}

impl ProviderError {
    /// Classify a [`reqwest::Error`] into a timeout, status or transport error.
    pub fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                context: context.to_owned(),
            }
        } else if err.is_decode() {
            Self::Parse(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for scout-search results.
pub type Result<T> = std::result::Result<T, ProviderError>;
