//! Coaching tools for RunCoach.
//!
//! Tools let the coach reach outside the model: check the weather before
//! recommending a workout, compute nutrition targets and race paces, and
//! search the knowledge base.

mod args;
pub mod knowledge_search;
pub mod nutrition;
pub mod pace;
pub mod weather;

use std::sync::Arc;

use runcoach_config::ToolsConfig;
use runcoach_core::error::ToolError;
use runcoach_core::tool::ToolRegistry;
use runcoach_knowledge::KnowledgeIndex;

pub use knowledge_search::{KNOWLEDGE_SEARCH_TOOL, KnowledgeSearchTool};
pub use nutrition::NutritionTool;
pub use pace::PaceTool;
pub use weather::WeatherTool;

/// Create the registry with every coaching tool.
///
/// The knowledge search tool uses the index's `search_top_k`.
pub fn default_registry(index: Arc<KnowledgeIndex>, config: &ToolsConfig) -> Result<ToolRegistry, ToolError> {
    let top_k = index.config().search_top_k;
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(KnowledgeSearchTool::new(index, top_k)))?;
    registry.register(Box::new(WeatherTool::new(config)))?;
    registry.register(Box::new(NutritionTool))?;
    registry.register(Box::new(PaceTool))?;
    Ok(registry)
}
