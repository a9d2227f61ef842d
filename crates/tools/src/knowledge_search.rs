//! Knowledge base search exposed as a tool.
//!
//! Registered so it can be invoked by name, but the coach never advertises
//! it to the model: every chat turn already retrieves context up front.

use std::sync::Arc;

use async_trait::async_trait;
use runcoach_core::error::ToolError;
use runcoach_core::tool::{Tool, ToolResult};
use runcoach_knowledge::KnowledgeIndex;

use crate::args;

pub const KNOWLEDGE_SEARCH_TOOL: &str = "search_knowledge_base";

pub struct KnowledgeSearchTool {
    index: Arc<KnowledgeIndex>,
    top_k: usize,
}

impl KnowledgeSearchTool {
    pub fn new(index: Arc<KnowledgeIndex>, top_k: usize) -> Self {
        Self { index, top_k }
    }
}

#[async_trait]
impl Tool for KnowledgeSearchTool {
    fn name(&self) -> &str {
        KNOWLEDGE_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Search the running knowledge base for information about training, nutrition, \
         injury prevention, form, and race preparation."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query about running topics"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = args::required_str(&arguments, "query")?;
        let result = self
            .index
            .query(query, self.top_k)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: KNOWLEDGE_SEARCH_TOOL.into(),
                reason: e.to_string(),
            })?;
        Ok(ToolResult::ok(result.context))
    }
}
