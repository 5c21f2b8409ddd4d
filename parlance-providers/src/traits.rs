//! Common traits for provider implementations

use async_trait::async_trait;
use parlance_core::{Error, Request, Response};
use serde_json::Value;

/// Convert requests to provider-specific format
///
/// `model` is the already-resolved model id: the request's model when set,
/// otherwise the provider's configured default.
#[async_trait]
pub trait RequestConverter: Send + Sync {
    /// Convert a generic request to provider-specific JSON
    async fn convert_request(&self, request: &Request, model: &str) -> Result<Value, Error>;
}

/// Parse responses from provider-specific format
#[async_trait]
pub trait ResponseParser: Send + Sync {
    /// Parse provider-specific JSON into a normalized response
    async fn parse_response(&self, value: Value) -> Result<Response, Error>;
}
