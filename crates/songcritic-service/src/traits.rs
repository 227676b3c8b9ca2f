use async_trait::async_trait;
use thiserror::Error;

use crate::CritiqueRequest;

/// Errors surfaced by the remote critique service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Service returned no text content")]
    EmptyResponse,

    #[error("Service response could not be decoded: {0}")]
    InvalidResponse(String),

    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),
}

/// Successful result of a remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub text: String,
}

impl ServiceResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The remote procedure that turns a critique request into JSON-shaped text
#[async_trait]
pub trait CritiqueService: Send + Sync {
    /// Human-readable name of the service (e.g., "Gemini")
    fn name(&self) -> &str;

    /// Perform exactly one call. Implementations must not retry.
    async fn generate(&self, request: &CritiqueRequest) -> Result<ServiceResponse, ServiceError>;
}
