//! Query results and their text rendering.

use serde::{Deserialize, Serialize};

/// Context returned when a query matches nothing.
pub const NO_RESULTS: &str = "No relevant information found in knowledge base.";

const BLOCK_DELIMITER: &str = "\n\n---\n\n";
const UNKNOWN_PAGE: &str = "?";

/// One retrieved chunk with its attribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub source: String,
    pub page: Option<u32>,
    pub score: f32,
}

impl RetrievedChunk {
    /// The source's file name, without any `/` or `\` path prefix.
    pub fn source_name(&self) -> &str {
        self.source
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.source)
    }

    fn render(&self) -> String {
        let page = self
            .page
            .map(|p| p.to_string())
            .unwrap_or_else(|| UNKNOWN_PAGE.to_string());
        format!("[Source: {}, Page {}]\n{}", self.source_name(), page, self.text)
    }
}

/// Formatted context plus the unique sources it cites, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub context: String,
    pub sources: Vec<String>,
}

impl RetrievalResult {
    pub fn from_chunks(chunks: &[RetrievedChunk]) -> Self {
        if chunks.is_empty() {
            return Self::empty();
        }

        let mut sources: Vec<String> = Vec::new();
        for chunk in chunks {
            let name = chunk.source_name();
            if !sources.iter().any(|s| s == name) {
                sources.push(name.to_string());
            }
        }

        let context = chunks
            .iter()
            .map(RetrievedChunk::render)
            .collect::<Vec<_>>()
            .join(BLOCK_DELIMITER);

        Self { context, sources }
    }

    pub fn empty() -> Self {
        Self {
            context: NO_RESULTS.to_string(),
            sources: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
