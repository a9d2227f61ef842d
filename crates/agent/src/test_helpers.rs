//! Scripted collaborators for coach tests.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use runcoach_config::KnowledgeConfig;
use runcoach_core::EmbeddingProvider;
use runcoach_core::error::ProviderError;
use runcoach_core::message::{Message, MessageToolCall};
use runcoach_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use runcoach_knowledge::KnowledgeIndex;

/// A mock provider that returns a sequence of scripted responses and
/// records every request it receives.
///
/// Once the script runs out each call fails with a network error.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that returns a single text response (no tool calls).
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    /// A provider that first returns tool calls, then a final answer.
    pub fn tool_then_answer(tool_calls: Vec<MessageToolCall>, thought: &str, answer: &str) -> Self {
        Self::new(vec![make_tool_call_response(tool_calls, thought), make_text_response(answer)])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };
        self.responses
            .lock()
            .unwrap()
            .get(index)
            .cloned()
            .ok_or_else(|| ProviderError::Network(format!("no scripted response for call #{index}")))
    }
}

/// A plain text response (no tool calls).
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// A response requesting tools, with optional accompanying text.
pub fn make_tool_call_response(tool_calls: Vec<MessageToolCall>, thought: &str) -> ProviderResponse {
    let mut response = make_text_response(thought);
    response.message.tool_calls = tool_calls;
    response
}

pub fn make_tool_call(name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: args.to_string(),
    }
}

/// Counts a few running words so related texts land close together.
struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn model(&self) -> &str {
        "keyword-mock"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                let mut v: Vec<f32> = ["taper", "gel", "stretch"]
                    .iter()
                    .map(|w| lower.matches(w).count() as f32)
                    .collect();
                v.push(0.1);
                v
            })
            .collect())
    }
}

/// A knowledge index over a temporary documents directory.
pub struct Fixture {
    _tmp: tempfile::TempDir,
    index: Arc<KnowledgeIndex>,
}

impl Fixture {
    fn with_docs(docs: &[(&str, &str)]) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let documents_dir: PathBuf = tmp.path().join("documents");
        std::fs::create_dir_all(&documents_dir).unwrap();
        for (name, text) in docs {
            std::fs::write(documents_dir.join(name), text).unwrap();
        }
        let config = KnowledgeConfig {
            documents_dir,
            index_dir: tmp.path().join("index"),
            ..KnowledgeConfig::default()
        };
        let index = Arc::new(KnowledgeIndex::new(config, Arc::new(KeywordEmbedder)));
        Self { _tmp: tmp, index }
    }

    pub fn with_corpus() -> Self {
        Self::with_docs(&[
            ("taper.txt", "Taper by cutting volume 40% in the final two weeks."),
            ("fuel.md", "Take a gel every 45 minutes in races over 90 minutes."),
            ("mobility.md", "Stretch after easy runs, not before intervals."),
        ])
    }

    pub fn empty() -> Self {
        Self::with_docs(&[])
    }

    pub fn index(&self) -> Arc<KnowledgeIndex> {
        self.index.clone()
    }
}
