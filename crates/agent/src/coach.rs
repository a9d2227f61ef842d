//! The coach: one chat turn from user message to reply.
//!
//! A turn always retrieves knowledge first, then asks the model. If the model
//! requests tools they all run, concurrently, and a second model call folds
//! their output into the final answer. There is exactly one tool round.

use std::sync::Arc;

use futures::future::join_all;
use runcoach_config::AppConfig;
use runcoach_core::error::{Error, RetrievalError, SetupError, ToolError};
use runcoach_core::message::{Message, MessageToolCall};
use runcoach_core::provider::{Provider, ProviderRequest, ToolDefinition};
use runcoach_core::tool::{ToolCall, ToolRegistry};
use runcoach_core::{ModelReply, UserProfile};
use runcoach_knowledge::{KnowledgeIndex, RetrievalResult};
use runcoach_tools::KNOWLEDGE_SEARCH_TOOL;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::TurnError;
use crate::memory::ConversationMemory;
use crate::prompt::PromptBuilder;

/// What a caller gets back from [`CoachSession::chat`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub success: bool,
}

/// Result of a direct knowledge base search.
pub type SearchResults = RetrievalResult;

/// Shared services for every session: model, tools, knowledge index.
pub struct Coach {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    index: Arc<KnowledgeIndex>,
    chat_top_k: usize,
    history_window: usize,
}

impl Coach {
    /// Create a coach. Retrieval depth comes from the index configuration.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        index: Arc<KnowledgeIndex>,
    ) -> Self {
        let chat_top_k = index.config().chat_top_k;
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            tools,
            index,
            chat_top_k,
            history_window: 10,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Number of remembered messages sent with each turn.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_chat_top_k(mut self, k: usize) -> Self {
        self.chat_top_k = k;
        self
    }

    /// Wire the provider, embedder, index and tools described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let router = runcoach_providers::build_from_config(config);
        let provider = router.default().ok_or_else(|| Error::Config {
            message: format!("Provider '{}' is not available", config.default_provider),
        })?;
        let embedder = runcoach_providers::build_embedder(config, &router);

        let index = Arc::new(KnowledgeIndex::new(config.knowledge.clone(), Arc::new(embedder)));
        let tools = runcoach_tools::default_registry(index.clone(), &config.tools)?;

        let model = config
            .providers
            .get(&config.default_provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| config.default_model.clone());

        Ok(Self::new(provider, model, Arc::new(tools), index)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_history_window(config.conversation.history_window))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn index(&self) -> &Arc<KnowledgeIndex> {
        &self.index
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Make the knowledge index ready. Call once before serving traffic.
    pub async fn initialize(&self) -> Result<(), SetupError> {
        info!(model = %self.model, tools = self.tools.len(), "Initializing coach");
        self.index.setup().await?;
        info!(status = ?self.index.status().await, "Coach ready");
        Ok(())
    }

    /// Search the knowledge base without involving the model.
    pub async fn direct_search(&self, query: &str, k: usize) -> Result<SearchResults, RetrievalError> {
        self.index.query(query, k).await
    }

    /// Start a session with its own empty memory.
    pub fn session(self: &Arc<Self>) -> CoachSession {
        CoachSession::new(self.clone())
    }

    /// Tools offered to the model. Knowledge search is excluded because
    /// retrieval already happens before every turn.
    fn offered_tools(&self) -> Vec<ToolDefinition> {
        self.tools.definitions_excluding(&[KNOWLEDGE_SEARCH_TOOL])
    }

    fn request(&self, messages: Vec<Message>, tools: Vec<ToolDefinition>) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools,
        }
    }

    /// Run every requested tool concurrently; output keeps call order.
    async fn run_tools(&self, calls: &[MessageToolCall]) -> String {
        let results = join_all(calls.iter().map(|call| self.run_tool(call))).await;
        calls
            .iter()
            .zip(results)
            .map(|(call, result)| format!("[{}]:\n{}", call.name, result))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Execute one call, turning every failure into text for the model.
    async fn run_tool(&self, call: &MessageToolCall) -> String {
        info!(tool = %call.name, arguments = %call.arguments, "Running tool");

        let arguments = match parse_arguments(&call.arguments) {
            Ok(arguments) => arguments,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Malformed tool arguments");
                return format!("Tool error: {e}");
            }
        };

        let tool_call = ToolCall {
            id: call.id.clone(),
            name: call.name.clone(),
            arguments,
        };

        match self.tools.execute(&tool_call).await {
            Ok(result) => result.output,
            Err(ToolError::NotFound(name)) => {
                warn!(tool = %name, "Model requested an unknown tool");
                format!("Unknown tool: {name}")
            }
            Err(e) => {
                error!(tool = %call.name, error = %e, "Tool failed");
                format!("Tool error: {e}")
            }
        }
    }
}

fn parse_arguments(raw: &str) -> Result<serde_json::Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(serde_json::Value::Object(Default::default()));
    }
    serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

fn follow_up(message: &str, tool_context: &str) -> String {
    format!(
        "Based on the tool results below, provide a helpful response to: '{message}'\n\nTool Results:\n{tool_context}"
    )
}

fn preview(message: &str) -> String {
    if message.chars().count() > 100 {
        format!("{}...", message.chars().take(100).collect::<String>())
    } else {
        message.to_string()
    }
}

/// One conversation with its own memory.
///
/// Turns on the same session are serialized: the memory lock is held for
/// the whole turn.
pub struct CoachSession {
    coach: Arc<Coach>,
    memory: Mutex<ConversationMemory>,
}

impl CoachSession {
    pub fn new(coach: Arc<Coach>) -> Self {
        Self {
            coach,
            memory: Mutex::new(ConversationMemory::new()),
        }
    }

    /// Answer one message.
    ///
    /// Failures never escape: they come back as an apology with
    /// `success: false` and memory is left untouched.
    pub async fn chat(&self, message: &str, profile: Option<&UserProfile>) -> ChatReply {
        let mut memory = self.memory.lock().await;

        info!(message = %preview(message), "Chat turn");
        match profile {
            Some(p) => info!(
                name = p.display_name().unwrap_or("Unknown"),
                age = ?p.age,
                weight = ?p.weight,
                height = ?p.height,
                goal = ?p.goal(),
                location = ?p.location(),
                "Using profile"
            ),
            None => info!("No profile data"),
        }

        match self.run_turn(&memory, message, profile).await {
            Ok(reply) => {
                memory.record(message, &reply.answer);
                info!(chars = reply.text.len(), reasoning = reply.reasoning.is_some(), "Response generated");
                ChatReply {
                    response: reply.text,
                    success: true,
                }
            }
            Err(e) => {
                error!(error = %e, "Chat turn failed");
                ChatReply {
                    response: format!("I encountered an error: {e}. Please try again."),
                    success: false,
                }
            }
        }
    }

    async fn run_turn(
        &self,
        memory: &ConversationMemory,
        message: &str,
        profile: Option<&UserProfile>,
    ) -> Result<ModelReply, TurnError> {
        let coach = &self.coach;

        debug!(k = coach.chat_top_k, "Searching knowledge base");
        let retrieved = coach.index.query(message, coach.chat_top_k).await?;
        if retrieved.sources.is_empty() {
            info!("No relevant documents found");
        } else {
            info!(sources = %retrieved.sources.join(", "), "Found context");
        }

        let system_prompt = PromptBuilder::build(profile, Some(&retrieved.context));
        let mut messages = Vec::with_capacity(coach.history_window + 2);
        messages.push(Message::system(system_prompt));
        messages.extend(memory.window_messages(coach.history_window));
        messages.push(Message::user(message));

        let response = coach
            .provider
            .complete(coach.request(messages.clone(), coach.offered_tools()))
            .await?;

        if response.message.tool_calls.is_empty() {
            return Ok(response.reply());
        }

        debug!(count = response.message.tool_calls.len(), "Model requested tools");
        let tool_context = coach.run_tools(&response.message.tool_calls).await;

        // The first reply goes back as plain text: there are no per-call tool
        // messages to pair with its tool calls.
        messages.push(Message::assistant(response.message.content));
        messages.push(Message::user(follow_up(message, &tool_context)));

        let synthesis = coach.provider.complete(coach.request(messages, Vec::new())).await?;
        Ok(synthesis.reply())
    }

    /// Forget every earlier exchange in this session.
    pub async fn reset_memory(&self) {
        self.memory.lock().await.reset();
        info!("Conversation history cleared");
    }

    /// Number of remembered messages.
    pub async fn history_len(&self) -> usize {
        self.memory.lock().await.len()
    }
}
