use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::core::error::Result;
use crate::core::types::{normalize_url, DocId, RawDocument};

/// Yields `(doc_id, html_bytes, url)` tuples in ascending `doc_id` order
/// — the order the K-way merger's no-cross-partial-doc_id precondition
/// assumes the caller supplies.
pub trait DocumentSource {
    fn documents(&self) -> Result<Vec<RawDocument>>;
}

#[derive(Debug, Deserialize)]
struct DocRecord {
    #[serde(default)]
    doc_id: Option<String>,
    url: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    html: Option<String>,
    #[serde(default = "default_encoding")]
    encoding: String,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

/// Walks a directory tree of per-document JSON metadata records, one
/// file per document, grouped in subdirectories. `doc_id` defaults to
/// the file's path relative to the corpus root when the record doesn't
/// supply one; paths are walked in sorted order so the resulting
/// `doc_id` sequence is stable and ascending.
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsDocumentSource { root: root.into() }
    }
}

impl DocumentSource for FsDocumentSource {
    fn documents(&self) -> Result<Vec<RawDocument>> {
        let mut paths: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();

        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            match load_one(&self.root, &path) {
                Ok(doc) => docs.push(doc),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable document");
                }
            }
        }
        Ok(docs)
    }
}

fn load_one(root: &Path, path: &Path) -> Result<RawDocument> {
    let raw = fs::read(path)?;
    // Encoding is declared inside the record itself, but only UTF-8 with
    // lossy fallback is supported; any other declared encoding is still
    // decoded lossily rather than rejected.
    let text = String::from_utf8_lossy(&raw).into_owned();
    let record: DocRecord = serde_json::from_str(&text)?;

    let doc_id = record
        .doc_id
        .unwrap_or_else(|| path.strip_prefix(root).unwrap_or(path).to_string_lossy().into_owned());

    let html = record.html.or(record.content).unwrap_or_default();

    Ok(RawDocument {
        doc_id: DocId::new(doc_id),
        url: normalize_url(&record.url),
        html_bytes: html.into_bytes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_documents_in_sorted_path_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, url) in [("a.json", "https://x/a"), ("b.json", "https://x/b#frag")] {
            let mut f = fs::File::create(dir.path().join(name)).unwrap();
            write!(f, r#"{{"url": "{url}", "content": "hello {name}"}}"#).unwrap();
        }

        let docs = FsDocumentSource::new(dir.path()).documents().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].doc_id.as_str(), "a.json");
        assert_eq!(docs[1].url, "https://x/b");
    }
}
