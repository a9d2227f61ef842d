//! Per-session conversation memory.

use runcoach_core::message::{Message, Role};
use runcoach_core::strip_reasoning;

/// One remembered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    fn to_message(&self) -> Message {
        match self.role {
            Role::Assistant => Message::assistant(&self.text),
            _ => Message::user(&self.text),
        }
    }
}

/// Append-only log of user/assistant exchanges.
///
/// Storage is unbounded; only [`window`](Self::window) decides how much of it
/// reaches the model.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<ConversationTurn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a completed exchange. Reasoning blocks are removed from the
    /// assistant text before it is kept.
    pub fn record(&mut self, user_text: &str, assistant_text: &str) {
        self.turns.push(ConversationTurn {
            role: Role::User,
            text: user_text.to_string(),
        });
        self.turns.push(ConversationTurn {
            role: Role::Assistant,
            text: strip_reasoning(assistant_text),
        });
    }

    /// The last `n` entries, oldest first.
    pub fn window(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// The last `n` entries as model messages.
    pub fn window_messages(&self, n: usize) -> Vec<Message> {
        self.window(n).iter().map(ConversationTurn::to_message).collect()
    }

    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
