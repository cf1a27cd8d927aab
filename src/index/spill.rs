use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::core::error::Result;
use crate::core::types::Posting;
use crate::index::record::into_sorted_records;
use crate::storage::layout::StorageLayout;

/// Serializes an in-memory partition to disk as a sorted partial-index
/// file: `PARTIAL_INDEXES/partial_index_<k>.jsonl`.
pub struct SpillWriter<'a> {
    layout: &'a StorageLayout,
    next_index: usize,
}

impl<'a> SpillWriter<'a> {
    pub fn new(layout: &'a StorageLayout) -> Self {
        SpillWriter { layout, next_index: 0 }
    }

    /// Sorts the partition's tokens lexicographically (and each token's
    /// postings ascending by doc_id), writes one line per token, and
    /// returns the path written. `k` is monotonically increasing from 0.
    pub fn spill(&mut self, partition: HashMap<String, Vec<Posting>>) -> Result<PathBuf> {
        let path = self.layout.partial_index_path(self.next_index);
        self.next_index += 1;

        let write_result = (|| -> Result<()> {
            let file = File::create(&path)?;
            let mut writer = BufWriter::new(file);
            for record in into_sorted_records(partition) {
                writer.write_all(record.to_line()?.as_bytes())?;
            }
            writer.flush()?;
            Ok(())
        })();

        if let Err(ref err) = write_result {
            tracing::error!(path = %path.display(), error = %err, "failed to spill partial index");
        }
        write_result?;

        tracing::info!(path = %path.display(), "spilled partial index");
        Ok(path)
    }

    pub fn partial_count(&self) -> usize {
        self.next_index
    }
}
