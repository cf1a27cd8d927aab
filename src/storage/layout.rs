use std::fs;
use std::path::PathBuf;

use crate::core::error::Result;

/// Resolves the on-disk artifact paths for one index directory.
///
/// Five (six with the manifest) named paths — no segments directory, no
/// WAL, no checkpoint file, since the build is a single-pass pipeline
/// with no incremental updates or crash recovery.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,
    pub partial_indexes_dir: PathBuf,
}

impl StorageLayout {
    /// Resolves the artifact paths without touching the filesystem. Safe
    /// to use read-only, e.g. to open an existing index for querying.
    pub fn new(base_dir: PathBuf) -> Self {
        let partial_indexes_dir = base_dir.join("PARTIAL_INDEXES");
        StorageLayout { base_dir, partial_indexes_dir }
    }

    /// Resolves the artifact paths and creates the base directory and
    /// `PARTIAL_INDEXES/` if they don't already exist. Only the builder
    /// should call this — a build is the only thing that writes to a
    /// fresh index directory.
    pub fn create(base_dir: PathBuf) -> Result<Self> {
        let layout = Self::new(base_dir);
        fs::create_dir_all(&layout.base_dir)?;
        fs::create_dir_all(&layout.partial_indexes_dir)?;
        Ok(layout)
    }

    pub fn partial_index_path(&self, k: usize) -> PathBuf {
        self.partial_indexes_dir.join(format!("partial_index_{k}.jsonl"))
    }

    pub fn final_index_path(&self) -> PathBuf {
        self.base_dir.join("final_index")
    }

    pub fn secondary_index_path(&self) -> PathBuf {
        self.base_dir.join("secondary_index.json")
    }

    pub fn doc_id_url_map_path(&self) -> PathBuf {
        self.base_dir.join("doc_id_url_map.json")
    }

    pub fn doc_len_file_path(&self) -> PathBuf {
        self.base_dir.join("doc_len_file.json")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.base_dir.join("manifest.json")
    }
}
