use std::collections::HashMap;

use crate::core::types::{DocId, Posting};

/// Accumulates documents in memory, bounded by `chunk_size`, producing
/// one `(token -> postings)` partition per chunk: term frequencies are
/// computed per document, then fanned out into per-term postings.
pub struct Ingestor {
    chunk_size: usize,
    partition: HashMap<String, Vec<Posting>>,
    id_url: HashMap<DocId, String>,
    unique_tokens: std::collections::HashSet<String>,
    docs_in_partition: usize,
}

impl Ingestor {
    pub fn new(chunk_size: usize) -> Self {
        Ingestor {
            chunk_size,
            partition: HashMap::new(),
            id_url: HashMap::new(),
            unique_tokens: std::collections::HashSet::new(),
            docs_in_partition: 0,
        }
    }

    /// Computes term frequencies over `tokens`, appends one posting per
    /// distinct token, and records `doc_id -> url`.
    ///
    /// A repeated `doc_id` within a run is the caller's responsibility to
    /// prevent; the ingestor does not itself detect it, since doing so
    /// would require an extra whole-run membership check on every call.
    pub fn add_document(&mut self, doc_id: DocId, tokens: &[String], url: String) {
        let mut term_frequency: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *term_frequency.entry(token.as_str()).or_insert(0) += 1;
        }

        for (token, tf) in term_frequency {
            self.unique_tokens.insert(token.to_string());
            self.partition
                .entry(token.to_string())
                .or_default()
                .push(Posting::new(doc_id.clone(), tf));
        }

        self.id_url.insert(doc_id, url);
        self.docs_in_partition += 1;
    }

    pub fn is_full(&self) -> bool {
        self.docs_in_partition >= self.chunk_size
    }

    pub fn doc_count(&self) -> usize {
        self.docs_in_partition
    }

    pub fn unique_token_count(&self) -> usize {
        self.unique_tokens.len()
    }

    /// Hands the partition and accumulated id->url entries to the caller
    /// (the Spill Writer) and resets for the next chunk.
    pub fn take_partition(&mut self) -> (HashMap<String, Vec<Posting>>, HashMap<DocId, String>) {
        self.docs_in_partition = 0;
        self.unique_tokens.clear();
        (std::mem::take(&mut self.partition), std::mem::take(&mut self.id_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_term_frequencies_per_document() {
        let mut ingestor = Ingestor::new(10);
        ingestor.add_document(
            DocId::new("d1"),
            &["fox".into(), "fox".into(), "brown".into()],
            "u1".into(),
        );

        let (partition, id_url) = ingestor.take_partition();
        assert_eq!(partition["fox"], vec![Posting::new(DocId::new("d1"), 2)]);
        assert_eq!(partition["brown"], vec![Posting::new(DocId::new("d1"), 1)]);
        assert_eq!(id_url[&DocId::new("d1")], "u1");
    }

    #[test]
    fn is_full_once_chunk_size_reached() {
        let mut ingestor = Ingestor::new(2);
        assert!(!ingestor.is_full());
        ingestor.add_document(DocId::new("d1"), &["a".into()], "u1".into());
        assert!(!ingestor.is_full());
        ingestor.add_document(DocId::new("d2"), &["a".into()], "u2".into());
        assert!(ingestor.is_full());
    }

    #[test]
    fn take_partition_resets_counters() {
        let mut ingestor = Ingestor::new(1);
        ingestor.add_document(DocId::new("d1"), &["a".into()], "u1".into());
        ingestor.take_partition();
        assert!(!ingestor.is_full());
        assert_eq!(ingestor.doc_count(), 0);
    }
}
