//! Knowledge base for RunCoach.
//!
//! Ingests reference documents from a directory, splits them into
//! overlapping chunks, embeds each chunk and persists the result as an
//! index directory. Queries embed the question with the same model and
//! return the closest chunks with their source attribution.
//!
//! The index moves `Uninitialized → (Loading | Building) → Ready`; a failed
//! load or build returns it to `Uninitialized`.

pub mod index;
pub mod loader;
pub mod result;
pub mod similarity;
pub mod splitter;
pub mod store;

pub use index::{IndexStatus, KnowledgeIndex};
pub use loader::Document;
pub use result::{RetrievalResult, RetrievedChunk, NO_RESULTS};
pub use splitter::TextSplitter;
