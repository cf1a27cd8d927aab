use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::core::types::Posting;
use crate::index::record::IndexRecord;
use crate::storage::layout::StorageLayout;

/// Streaming line reader over one partial index file. Never materializes
/// more than one parsed record at a time.
struct PartialReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl PartialReader {
    fn open(path: PathBuf) -> Result<Self> {
        let file = File::open(&path)?;
        Ok(PartialReader { path, lines: BufReader::new(file).lines(), line_no: 0 })
    }

    fn next_record(&mut self) -> Result<Option<IndexRecord>> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                let line = line?;
                self.line_no += 1;
                IndexRecord::from_line(&line).map(Some).map_err(|err| {
                    Error::corrupt(format!(
                        "{}:{}: {err}",
                        self.path.display(),
                        self.line_no
                    ))
                })
            }
        }
    }
}

/// One pending record on the merge heap: the token, its source file
/// index (the stable tie-break), and its postings.
struct HeapEntry {
    token: String,
    file_index: usize,
    postings: Vec<Posting>,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token && self.file_index == other.file_index
    }
}
impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest
        // (token, file_index) first — a min-heap by construction.
        (&other.token, other.file_index).cmp(&(&self.token, self.file_index))
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Merges all `partial_index_*.jsonl` files into the single final index
/// file, preserving line-delimited, token-sorted order.
///
/// Precondition (caller-held, not re-verified here): `doc_id`s are
/// disjoint across partials and the corpus was fed in `doc_id`-ascending
/// order, so postings for the same token concatenated in heap-pop order
/// remain sorted by `doc_id`.
pub fn merge_partials(layout: &StorageLayout, partial_count: usize) -> Result<PathBuf> {
    let mut readers: Vec<PartialReader> = (0..partial_count)
        .map(|k| PartialReader::open(layout.partial_index_path(k)))
        .collect::<Result<_>>()?;

    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
    for (file_index, reader) in readers.iter_mut().enumerate() {
        if let Some(record) = reader.next_record()? {
            heap.push(HeapEntry { token: record.token, file_index, postings: record.postings });
        }
    }

    let final_path = layout.final_index_path();
    let mut writer = BufWriter::new(File::create(&final_path)?);

    let mut current: Option<(String, Vec<Posting>)> = None;

    while let Some(entry) = heap.pop() {
        match &mut current {
            Some((token, postings)) if *token == entry.token => {
                postings.extend(entry.postings);
            }
            _ => {
                if let Some((token, postings)) = current.take() {
                    flush_run(&mut writer, token, postings)?;
                }
                current = Some((entry.token.clone(), entry.postings));
            }
        }

        if let Some(next) = readers[entry.file_index].next_record()? {
            heap.push(HeapEntry {
                token: next.token,
                file_index: entry.file_index,
                postings: next.postings,
            });
        }
    }

    if let Some((token, postings)) = current {
        flush_run(&mut writer, token, postings)?;
    }

    writer.flush()?;
    tracing::info!(path = %final_path.display(), "merged partial indexes into final index");
    Ok(final_path)
}

fn flush_run(writer: &mut impl Write, token: String, postings: Vec<Posting>) -> Result<()> {
    let line = IndexRecord::new(token, postings).to_line()?;
    writer.write_all(line.as_bytes())?;
    Ok(())
}

/// Convenience for callers that already have partial-file paths (tests,
/// ad hoc tooling) rather than a `StorageLayout`.
#[allow(dead_code)]
pub(crate) fn partial_path_for(dir: &Path, k: usize) -> PathBuf {
    dir.join(format!("partial_index_{k}.jsonl"))
}
