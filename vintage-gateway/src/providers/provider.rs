//! Provider trait abstracting the external text-generation service.

use crate::chat::history::{ChatMessage, ContentPart};

/// Provider error types
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("No content in response")]
    NoContent,
}

/// A text-generation backend.
///
/// The retrieval/session/crawl core depends only on this capability, so
/// tests run against stub implementations instead of a live API.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Current model
    fn model(&self) -> &str;

    /// Generate a reply for `parts`, given prior turns and an optional
    /// system instruction.
    async fn generate(
        &self,
        system: Option<&str>,
        history: &[ChatMessage],
        parts: &[ContentPart],
    ) -> Result<String, ProviderError>;
}
