//! LLM Provider implementations for RunCoach.
//!
//! All chat providers implement the `runcoach_core::Provider` trait.
//! The router selects the correct provider based on configuration, and
//! `ProviderEmbedder` exposes a provider's embeddings endpoint as an
//! `EmbeddingProvider`.

pub mod embedder;
pub mod openai_compat;
pub mod router;

pub use embedder::ProviderEmbedder;
pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_embedder, build_from_config};
