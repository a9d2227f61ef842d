use runcoach_core::error::{ProviderError, RetrievalError};
use thiserror::Error;

/// A chat turn that could not produce a reply.
///
/// Caught at the session boundary and turned into an apologetic response.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("{0}")]
    Retrieval(#[from] RetrievalError),

    #[error("{0}")]
    Inference(#[from] ProviderError),
}
