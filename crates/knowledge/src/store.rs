//! On-disk index format.
//!
//! An index directory holds `manifest.json` and `chunks.jsonl` (one
//! JSON-encoded chunk per line). It is written into a sibling staging
//! directory and renamed into place, so readers never see a half-written
//! index. A directory that exists and is non-empty counts as populated.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use runcoach_core::error::SetupError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CHUNKS_FILE: &str = "chunks.jsonl";
const FORMAT_VERSION: u32 = 1;

/// A chunk with its embedding, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub text: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub embedding: Vec<f32>,
}

/// Index-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub embedding_model: String,
    pub dimensions: usize,
    pub chunk_count: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub created_at: DateTime<Utc>,
}

impl Manifest {
    pub fn new(embedding_model: &str, chunks: &[IndexedChunk], chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            version: FORMAT_VERSION,
            embedding_model: embedding_model.to_string(),
            dimensions: chunks.first().map(|c| c.embedding.len()).unwrap_or(0),
            chunk_count: chunks.len(),
            chunk_size,
            chunk_overlap,
            created_at: Utc::now(),
        }
    }
}

/// True when the directory exists and has at least one entry.
pub fn is_populated(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Sibling directory used while writing: `<dir>.building`.
pub fn staging_path(dir: &Path) -> PathBuf {
    let mut name = OsString::from(dir.as_os_str());
    name.push(".building");
    PathBuf::from(name)
}

/// Write a complete index to `dir`, replacing whatever was there.
pub fn write_index(dir: &Path, manifest: &Manifest, chunks: &[IndexedChunk]) -> Result<(), SetupError> {
    let staging = staging_path(dir);
    let result = write_staging(&staging, manifest, chunks).and_then(|()| swap_into_place(&staging, dir));
    if result.is_err() && staging.exists() {
        if let Err(e) = std::fs::remove_dir_all(&staging) {
            warn!(path = %staging.display(), error = %e, "Failed to clean up staging directory");
        }
    }
    result
}

fn write_staging(staging: &Path, manifest: &Manifest, chunks: &[IndexedChunk]) -> Result<(), SetupError> {
    if staging.exists() {
        std::fs::remove_dir_all(staging).map_err(|e| io_error(staging, e))?;
    }
    std::fs::create_dir_all(staging).map_err(|e| io_error(staging, e))?;

    let manifest_path = staging.join(MANIFEST_FILE);
    let manifest_json = serde_json::to_string_pretty(manifest).map_err(|e| SetupError::Io {
        path: manifest_path.clone(),
        reason: e.to_string(),
    })?;
    std::fs::write(&manifest_path, manifest_json).map_err(|e| io_error(&manifest_path, e))?;

    let chunks_path = staging.join(CHUNKS_FILE);
    let file = std::fs::File::create(&chunks_path).map_err(|e| io_error(&chunks_path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    for chunk in chunks {
        let line = serde_json::to_string(chunk).map_err(|e| SetupError::Io {
            path: chunks_path.clone(),
            reason: e.to_string(),
        })?;
        writeln!(writer, "{line}").map_err(|e| io_error(&chunks_path, e))?;
    }
    writer.flush().map_err(|e| io_error(&chunks_path, e))?;

    debug!(path = %staging.display(), chunks = chunks.len(), "Wrote staging index");
    Ok(())
}

fn swap_into_place(staging: &Path, dir: &Path) -> Result<(), SetupError> {
    if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| io_error(dir, e))?;
    }
    std::fs::rename(staging, dir).map_err(|e| io_error(dir, e))
}

/// Read a persisted index. Any inconsistency is a [`SetupError::CorruptIndex`].
pub fn read_index(dir: &Path) -> Result<(Manifest, Vec<IndexedChunk>), SetupError> {
    let corrupt = |reason: String| SetupError::CorruptIndex {
        path: dir.to_path_buf(),
        reason,
    };

    let manifest_text = std::fs::read_to_string(dir.join(MANIFEST_FILE))
        .map_err(|e| corrupt(format!("{MANIFEST_FILE}: {e}")))?;
    let manifest: Manifest = serde_json::from_str(&manifest_text)
        .map_err(|e| corrupt(format!("{MANIFEST_FILE}: {e}")))?;

    if manifest.version != FORMAT_VERSION {
        return Err(corrupt(format!("unsupported format version {}", manifest.version)));
    }

    let chunks_text = std::fs::read_to_string(dir.join(CHUNKS_FILE))
        .map_err(|e| corrupt(format!("{CHUNKS_FILE}: {e}")))?;

    let mut chunks = Vec::with_capacity(manifest.chunk_count);
    for (line_no, line) in chunks_text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let chunk: IndexedChunk = serde_json::from_str(line)
            .map_err(|e| corrupt(format!("{CHUNKS_FILE} line {}: {e}", line_no + 1)))?;
        if chunk.embedding.len() != manifest.dimensions {
            return Err(corrupt(format!(
                "{CHUNKS_FILE} line {}: expected {} dimensions, found {}",
                line_no + 1,
                manifest.dimensions,
                chunk.embedding.len()
            )));
        }
        chunks.push(chunk);
    }

    if chunks.len() != manifest.chunk_count || chunks.is_empty() {
        return Err(corrupt(format!(
            "manifest lists {} chunks, found {}",
            manifest.chunk_count,
            chunks.len()
        )));
    }

    Ok((manifest, chunks))
}

fn io_error(path: &Path, e: std::io::Error) -> SetupError {
    SetupError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunks() -> Vec<IndexedChunk> {
        vec![
            IndexedChunk {
                text: "Tempo runs are comfortably hard.".into(),
                source: "docs/training.txt".into(),
                page: Some(2),
                embedding: vec![0.1, 0.2],
            },
            IndexedChunk {
                text: "Carbohydrate loading before a marathon.".into(),
                source: "docs/nutrition.md".into(),
                page: None,
                embedding: vec![0.3, 0.4],
            },
        ]
    }

    #[test]
    fn write_then_read_preserves_chunks() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("index");
        let chunks = sample_chunks();
        let manifest = Manifest::new("mock-embed", &chunks, 1000, 200);

        write_index(&dir, &manifest, &chunks).unwrap();
        assert!(is_populated(&dir));
        assert!(!staging_path(&dir).exists());

        let (read_manifest, read_chunks) = read_index(&dir).unwrap();
        assert_eq!(read_manifest.embedding_model, "mock-embed");
        assert_eq!(read_manifest.dimensions, 2);
        assert_eq!(read_chunks, chunks);
    }

    #[test]
    fn write_replaces_existing_index() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("index");
        let chunks = sample_chunks();
        write_index(&dir, &Manifest::new("m", &chunks, 1000, 200), &chunks).unwrap();

        let fewer = vec![chunks[0].clone()];
        write_index(&dir, &Manifest::new("m", &fewer, 1000, 200), &fewer).unwrap();
        let (_, read_chunks) = read_index(&dir).unwrap();
        assert_eq!(read_chunks.len(), 1);
    }

    #[test]
    fn missing_or_empty_dir_is_not_populated() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!is_populated(&tmp.path().join("absent")));
        assert!(!is_populated(tmp.path()));
    }

    #[test]
    fn stray_file_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("junk.bin"), b"???").unwrap();
        assert!(is_populated(tmp.path()));
        let err = read_index(tmp.path()).unwrap_err();
        assert!(matches!(err, SetupError::CorruptIndex { .. }));
    }

    #[test]
    fn truncated_chunk_file_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("index");
        let chunks = sample_chunks();
        write_index(&dir, &Manifest::new("m", &chunks, 1000, 200), &chunks).unwrap();

        let first_line = serde_json::to_string(&chunks[0]).unwrap();
        std::fs::write(dir.join(CHUNKS_FILE), format!("{first_line}\n")).unwrap();

        let err = read_index(&dir).unwrap_err();
        assert!(err.to_string().contains("manifest lists 2 chunks, found 1"));
    }
}
