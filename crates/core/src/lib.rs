//! # RunCoach Core
//!
//! Domain types, traits, and error definitions for the RunCoach assistant.
//! This crate has **zero framework dependencies**: it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (language model, embedding model, tools) is
//! defined as a trait here. Implementations live in their respective crates,
//! which keeps the orchestration logic testable with scripted stand-ins.

pub mod embedding;
pub mod error;
pub mod message;
pub mod profile;
pub mod provider;
pub mod reply;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use embedding::EmbeddingProvider;
pub use error::{Error, Result};
pub use message::{Message, MessageToolCall, Role};
pub use profile::UserProfile;
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use reply::{ModelReply, strip_reasoning};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
