//! The knowledge index: lifecycle, ingestion and query.

use std::path::Path;
use std::sync::Arc;

use runcoach_config::KnowledgeConfig;
use runcoach_core::error::{ProviderError, RetrievalError, SetupError};
use runcoach_core::EmbeddingProvider;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::loader;
use crate::result::{RetrievalResult, RetrievedChunk};
use crate::similarity;
use crate::splitter::TextSplitter;
use crate::store::{self, IndexedChunk, Manifest};

/// Chunks loaded in memory once the index is ready.
struct LoadedIndex {
    chunks: Vec<IndexedChunk>,
}

enum IndexState {
    Uninitialized,
    Loading,
    Building,
    Ready(Arc<LoadedIndex>),
}

/// Externally visible readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IndexStatus {
    Uninitialized,
    Loading,
    Building,
    Ready { chunks: usize },
}

/// A persistent, lazily-initialised similarity index over the documents
/// directory.
///
/// `setup()` is idempotent and safe to call concurrently: a setup mutex with
/// a readiness re-check guarantees at most one load or build runs at a time.
pub struct KnowledgeIndex {
    config: KnowledgeConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    state: RwLock<IndexState>,
    setup_lock: Mutex<()>,
}

impl KnowledgeIndex {
    pub fn new(config: KnowledgeConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            config,
            embedder,
            state: RwLock::new(IndexState::Uninitialized),
            setup_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    pub async fn status(&self) -> IndexStatus {
        match &*self.state.read().await {
            IndexState::Uninitialized => IndexStatus::Uninitialized,
            IndexState::Loading => IndexStatus::Loading,
            IndexState::Building => IndexStatus::Building,
            IndexState::Ready(loaded) => IndexStatus::Ready {
                chunks: loaded.chunks.len(),
            },
        }
    }

    async fn ready(&self) -> Option<Arc<LoadedIndex>> {
        match &*self.state.read().await {
            IndexState::Ready(loaded) => Some(Arc::clone(loaded)),
            _ => None,
        }
    }

    async fn set_state(&self, state: IndexState) {
        *self.state.write().await = state;
    }

    /// Make the index ready, loading the persisted copy or building a new one.
    pub async fn setup(&self) -> Result<(), SetupError> {
        self.ensure_ready().await.map(|_| ())
    }

    async fn ensure_ready(&self) -> Result<Arc<LoadedIndex>, SetupError> {
        if let Some(loaded) = self.ready().await {
            return Ok(loaded);
        }

        let _guard = self.setup_lock.lock().await;
        if let Some(loaded) = self.ready().await {
            return Ok(loaded);
        }

        let index_dir = self.config.index_dir.clone();
        let result = if store::is_populated(&index_dir) {
            self.set_state(IndexState::Loading).await;
            info!(path = %index_dir.display(), "Loading existing knowledge index");
            self.load(&index_dir)
        } else {
            self.set_state(IndexState::Building).await;
            self.build().await
        };

        self.finish(result).await
    }

    /// Build the index again from the documents.
    ///
    /// The new index replaces the persisted one only once it is complete. If
    /// the build fails, a previously ready index stays ready and on disk.
    pub async fn rebuild(&self) -> Result<(), SetupError> {
        let _guard = self.setup_lock.lock().await;
        let previous = self.ready().await;
        self.set_state(IndexState::Building).await;

        let result = self.build().await;
        match (result, previous) {
            (Err(e), Some(previous)) => {
                error!(error = %e, "Knowledge index rebuild failed; keeping the previous index");
                self.set_state(IndexState::Ready(previous)).await;
                Err(e)
            }
            (result, _) => self.finish(result).await.map(|_| ()),
        }
    }

    async fn finish(&self, result: Result<LoadedIndex, SetupError>) -> Result<Arc<LoadedIndex>, SetupError> {
        match result {
            Ok(loaded) => {
                let loaded = Arc::new(loaded);
                info!(chunks = loaded.chunks.len(), "Knowledge index ready");
                self.set_state(IndexState::Ready(Arc::clone(&loaded))).await;
                Ok(loaded)
            }
            Err(e) => {
                error!(error = %e, "Knowledge index setup failed");
                self.set_state(IndexState::Uninitialized).await;
                Err(e)
            }
        }
    }

    fn load(&self, index_dir: &Path) -> Result<LoadedIndex, SetupError> {
        let (manifest, chunks) = store::read_index(index_dir)?;
        if manifest.embedding_model != self.embedder.model() {
            warn!(
                indexed_with = %manifest.embedding_model,
                querying_with = %self.embedder.model(),
                "Index was built with a different embedding model; rebuild it with `runcoach ingest --force`"
            );
        }
        Ok(LoadedIndex { chunks })
    }

    async fn build(&self) -> Result<LoadedIndex, SetupError> {
        let documents_dir = &self.config.documents_dir;
        info!(path = %documents_dir.display(), "Building knowledge index");

        let documents = loader::load_documents(documents_dir)?;

        let splitter = TextSplitter::new(self.config.chunk_size, self.config.chunk_overlap);
        let mut pieces: Vec<(String, &str, Option<u32>)> = Vec::new();
        for doc in &documents {
            for text in splitter.split(&doc.text) {
                pieces.push((text, doc.source.as_str(), doc.page));
            }
        }

        if pieces.is_empty() {
            return Err(SetupError::NoDocuments {
                path: documents_dir.clone(),
            });
        }
        info!(pages = documents.len(), chunks = pieces.len(), "Split documents into chunks");

        let batch_size = self.config.embed_batch_size.max(1);
        let mut chunks = Vec::with_capacity(pieces.len());
        for (batch_no, batch) in pieces.chunks(batch_size).enumerate() {
            let texts: Vec<String> = batch.iter().map(|(text, _, _)| text.clone()).collect();
            let vectors = self.embedder.embed(&texts).await?;
            if vectors.len() != texts.len() {
                return Err(SetupError::Embedding(ProviderError::ApiError {
                    status_code: 200,
                    message: format!("Expected {} embeddings, got {}", texts.len(), vectors.len()),
                }));
            }
            debug!(batch = batch_no, size = texts.len(), "Embedded batch");

            for ((text, source, page), embedding) in batch.iter().zip(vectors) {
                chunks.push(IndexedChunk {
                    text: text.clone(),
                    source: source.to_string(),
                    page: *page,
                    embedding,
                });
            }
        }

        let manifest = Manifest::new(
            self.embedder.model(),
            &chunks,
            self.config.chunk_size,
            self.config.chunk_overlap,
        );
        store::write_index(&self.config.index_dir, &manifest, &chunks)?;
        info!(path = %self.config.index_dir.display(), chunks = chunks.len(), "Knowledge index persisted");

        Ok(LoadedIndex { chunks })
    }

    /// The `k` chunks most similar to `text`, best first.
    ///
    /// Sets the index up first if it is not ready yet.
    pub async fn search(&self, text: &str, k: usize) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let loaded = self.ensure_ready().await?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed_one(text).await?;
        let hits = similarity::top_k(&loaded.chunks, &query, k)
            .into_iter()
            .map(|(score, chunk)| RetrievedChunk {
                text: chunk.text.clone(),
                source: chunk.source.clone(),
                page: chunk.page,
                score,
            })
            .collect();
        Ok(hits)
    }

    /// Search and render the hits as prompt context with source attribution.
    pub async fn query(&self, text: &str, k: usize) -> Result<RetrievalResult, RetrievalError> {
        let hits = self.search(text, k).await?;
        let result = RetrievalResult::from_chunks(&hits);
        if result.is_empty() {
            info!("No relevant documents found");
        } else {
            info!(chunks = hits.len(), sources = %result.sources.join(", "), "Retrieved context");
        }
        Ok(result)
    }
}
