//! EmbeddingProvider trait: maps text to fixed-dimension vectors.
//!
//! The same provider must be used for ingestion and for queries, otherwise
//! similarity scores are meaningless.

use async_trait::async_trait;
use crate::error::ProviderError;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the embedding model (recorded in the index manifest).
    fn model(&self) -> &str;

    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed(&self, texts: &[String]) -> std::result::Result<Vec<Vec<f32>>, ProviderError>;

    /// Embed a single text.
    async fn embed_one(&self, text: &str) -> std::result::Result<Vec<f32>, ProviderError> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| ProviderError::ApiError {
            status_code: 200,
            message: "Embedding response contained no vectors".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LengthEmbedder;

    #[async_trait]
    impl EmbeddingProvider for LengthEmbedder {
        fn model(&self) -> &str {
            "length"
        }

        async fn embed(&self, texts: &[String]) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }
    }

    struct EmptyEmbedder;

    #[async_trait]
    impl EmbeddingProvider for EmptyEmbedder {
        fn model(&self) -> &str {
            "empty"
        }

        async fn embed(&self, _texts: &[String]) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn embed_one_returns_single_vector() {
        let v = LengthEmbedder.embed_one("tempo").await.unwrap();
        assert_eq!(v, vec![5.0, 1.0]);
    }

    #[tokio::test]
    async fn embed_one_errors_on_empty_response() {
        let err = EmptyEmbedder.embed_one("tempo").await.unwrap_err();
        assert!(err.to_string().contains("no vectors"));
    }
}
