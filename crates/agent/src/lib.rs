//! The RunCoach conversation engine.
//!
//! Every chat turn follows the same path:
//!
//! 1. **Retrieve** knowledge base context for the user's message
//! 2. **Build** the system prompt from the profile and that context
//! 3. **Ask** the model, offering the coaching tools
//! 4. **If tool calls**: run them all, then ask once more with their output
//! 5. **Remember** the exchange (reasoning stripped) and return the raw reply
//!
//! [`Coach`] holds the shared services; each [`CoachSession`] owns its own
//! conversation memory.

pub mod coach;
pub mod error;
pub mod memory;
pub mod prompt;

#[cfg(test)]
mod test_helpers;

pub use coach::{ChatReply, Coach, CoachSession, SearchResults};
pub use error::TurnError;
pub use memory::{ConversationMemory, ConversationTurn};
pub use prompt::PromptBuilder;
