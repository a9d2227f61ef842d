//! Adapts a `Provider`'s embeddings endpoint to the `EmbeddingProvider` trait.

use std::sync::Arc;

use async_trait::async_trait;
use runcoach_core::error::ProviderError;
use runcoach_core::provider::{EmbeddingRequest, Provider};
use runcoach_core::EmbeddingProvider;
use tracing::debug;

/// Embeds text through a chat provider's `/embeddings` endpoint with a fixed model.
pub struct ProviderEmbedder {
    provider: Arc<dyn Provider>,
    model: String,
}

impl ProviderEmbedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for ProviderEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: texts.to_vec(),
            })
            .await?;

        if response.embeddings.len() != texts.len() {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: format!(
                    "Expected {} embeddings, got {}",
                    texts.len(),
                    response.embeddings.len()
                ),
            });
        }

        debug!(
            provider = %self.provider.name(),
            model = %self.model,
            count = texts.len(),
            "Embedded batch"
        );
        Ok(response.embeddings)
    }
}
