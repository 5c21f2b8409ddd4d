//! Mapping from HTTP failures to the core error taxonomy

use parlance_core::Error;
use std::time::Duration;

/// Map a non-success HTTP status to the appropriate error variant
///
/// 401/403 become [`Error::Authentication`], 429 becomes [`Error::RateLimit`]
/// and everything else becomes [`Error::Api`]. The message prefers the
/// provider's JSON `error.message` field and falls back to the raw body text.
pub fn status_error(
    provider: &str,
    status: u16,
    retry_after: Option<Duration>,
    body: &str,
) -> Error {
    let message = error_message(body);
    match status {
        401 | 403 => Error::Authentication {
            provider: provider.to_string(),
            message,
        },
        429 => Error::RateLimit {
            provider: provider.to_string(),
            message,
            retry_after,
        },
        _ => Error::Api {
            provider: provider.to_string(),
            status: Some(status),
            message,
        },
    }
}

/// Build an API error for a malformed or unexpected response shape
pub fn response_error(provider: &str, message: impl Into<String>) -> Error {
    Error::Api {
        provider: provider.to_string(),
        status: None,
        message: message.into(),
    }
}

/// Convert network errors to core errors, preserving the source
pub fn network_error(error: reqwest::Error) -> Error {
    Error::Network {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

/// Convert serialization errors to core errors
pub fn serialization_error(error: serde_json::Error) -> Error {
    Error::Serialization {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

/// Extract a human-readable message from an error response body
///
/// Providers in this family all nest their message under
/// `{"error": {"message": ...}}`; anything else is returned verbatim.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
