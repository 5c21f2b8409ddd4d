//! Error types for the Parlance library

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// The main error type for all Parlance operations
///
/// The first three variants form the API-error family raised from non-success
/// HTTP statuses; callers can match broadly on [`Error`] or narrowly on a
/// variant.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The provider rejected the credentials (HTTP 401/403)
    Authentication {
        /// Provider name (e.g., "openai", "anthropic")
        provider: String,
        /// Error message from the provider
        message: String,
    },

    /// The provider throttled the request (HTTP 429)
    RateLimit {
        /// Provider name
        provider: String,
        /// Error message from the provider
        message: String,
        /// Time to wait before retrying, from the `Retry-After` header
        retry_after: Option<Duration>,
    },

    /// Any other provider-side failure: non-2xx statuses not covered above,
    /// or a response whose shape cannot be normalized (e.g. zero choices)
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code, when the failure came from a status
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Transport-level failures, surfaced from the HTTP layer unmapped
    Network {
        /// Error message
        message: String,
        /// Underlying error if available
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    Serialization {
        /// Error message
        message: String,
        /// Underlying error if available
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Operation attempted on a client after `close()`
    ClientClosed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication { provider, message } => {
                write!(f, "Authentication error ({}): {}", provider, message)
            }
            Error::RateLimit {
                provider, message, ..
            } => {
                write!(f, "Rate limit exceeded ({}): {}", provider, message)
            }
            Error::Api {
                provider,
                status: Some(status),
                message,
            } => {
                write!(f, "API error ({}, HTTP {}): {}", provider, status, message)
            }
            Error::Api {
                provider, message, ..
            } => write!(f, "API error ({}): {}", provider, message),
            Error::Network { message, .. } => write!(f, "Network error: {}", message),
            Error::Serialization { message, .. } => write!(f, "Serialization error: {}", message),
            Error::ClientClosed => write!(f, "Client has been closed"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Network { source, .. } | Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static)),
            _ => None,
        }
    }
}

/// Result type alias for Parlance operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
