//! Reads raw documents from the documents directory.
//!
//! Files are read in sorted path order (not recursive). A PDF yields one
//! document per page, numbered as in the file. Text files (`.txt`, `.md`,
//! `.markdown`) must be UTF-8; a form feed (`\x0c`) separates pages, which
//! are numbered from 1, and a file without form feeds is a single page with
//! no number.

use std::path::{Path, PathBuf};

use runcoach_core::error::SetupError;
use tracing::{debug, info, warn};

const TEXT_EXTENSIONS: [&str; 3] = ["txt", "md", "markdown"];
const PDF_EXTENSION: &str = "pdf";
const PAGE_BREAK: char = '\x0c';

/// One page of a source document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path of the file the page came from.
    pub source: String,
    /// 1-based page number, `None` for unpaginated files.
    pub page: Option<u32>,
    pub text: String,
}

/// Load every page from the directory.
///
/// A missing directory is created so the operator can see where documents
/// belong, and the call fails with [`SetupError::MissingSource`].
pub fn load_documents(dir: &Path) -> Result<Vec<Document>, SetupError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| SetupError::Io {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        warn!(path = %dir.display(), "Documents directory was missing; created it");
        return Err(SetupError::MissingSource { path: dir.to_path_buf() });
    }

    let files = list_files(dir)?;
    let mut documents = Vec::new();

    for file in &files {
        let pages = if has_extension(file, PDF_EXTENSION) {
            match read_pdf(file) {
                Ok(pages) => pages,
                Err(reason) => {
                    warn!(path = %file.display(), %reason, "Skipping unreadable PDF");
                    continue;
                }
            }
        } else {
            match std::fs::read_to_string(file) {
                Ok(text) => split_pages(&file.to_string_lossy(), &text),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    warn!(path = %file.display(), "Skipping file that is not valid UTF-8");
                    continue;
                }
                Err(e) => {
                    return Err(SetupError::Io {
                        path: file.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        };

        debug!(path = %file.display(), pages = pages.len(), "Loaded document");
        documents.extend(pages);
    }

    if documents.is_empty() {
        return Err(SetupError::NoDocuments { path: dir.to_path_buf() });
    }

    info!(files = files.len(), pages = documents.len(), "Loaded documents");
    Ok(documents)
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, SetupError> {
    let io_err = |e: std::io::Error| SetupError::Io {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_loadable(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Whether the loader reads files with this path's extension.
pub fn is_loadable(path: &Path) -> bool {
    has_extension(path, PDF_EXTENSION) || TEXT_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// One document per PDF page. Pages whose text cannot be extracted are
/// skipped.
fn read_pdf(path: &Path) -> Result<Vec<Document>, String> {
    let pdf = lopdf::Document::load(path).map_err(|e| e.to_string())?;
    let source = path.to_string_lossy();

    let mut pages = Vec::new();
    for page in pdf.get_pages().into_keys() {
        match pdf.extract_text(&[page]) {
            Ok(text) => pages.push(Document {
                source: source.to_string(),
                page: Some(page),
                text,
            }),
            Err(e) => warn!(path = %path.display(), page, error = %e, "Skipping PDF page without extractable text"),
        }
    }
    Ok(pages)
}

fn split_pages(source: &str, text: &str) -> Vec<Document> {
    if !text.contains(PAGE_BREAK) {
        return vec![Document {
            source: source.to_string(),
            page: None,
            text: text.to_string(),
        }];
    }

    text.split(PAGE_BREAK)
        .enumerate()
        .map(|(i, page)| Document {
            source: source.to_string(),
            page: Some(i as u32 + 1),
            text: page.to_string(),
        })
        .collect()
}
