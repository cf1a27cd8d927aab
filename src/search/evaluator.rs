use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::sync::Mutex;

use rust_stemmers::{Algorithm, Stemmer};

use crate::analysis::analyzer::Analyzer;
use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Posting};
use crate::index::record::IndexRecord;
use crate::scoring::scorer::{accumulate_term, vectorize_query};
use crate::search::results::{ScoredDocument, TopKCollector};
use crate::storage::layout::StorageLayout;

const DEFAULT_TOP_K: usize = 10;

/// Opens a built index read-only and answers ranked or Boolean queries
/// against it. All resident state below is loaded once at open time
/// and never mutated by a query.
pub struct Searcher {
    final_index: Mutex<File>,
    secondary_index: HashMap<String, u64>,
    magnitudes: HashMap<DocId, f64>,
    id_url: HashMap<DocId, String>,
    doc_count: usize,
    analyzer: Analyzer,
}

impl Searcher {
    /// Loads the four required artifacts from `index_dir`. Fails with
    /// `Error::Config` naming the missing path. Resolves paths only —
    /// opening a searcher never creates or modifies anything on disk.
    pub fn open(index_dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let layout = StorageLayout::new(index_dir.into());

        let final_index = open_required(&layout.final_index_path())?;
        let secondary_index: HashMap<String, u64> = read_json_required(&layout.secondary_index_path())?;
        let id_url: HashMap<String, String> = read_json_required(&layout.doc_id_url_map_path())?;
        let magnitudes_raw: HashMap<String, f64> = read_json_required(&layout.doc_len_file_path())?;

        let id_url: HashMap<DocId, String> =
            id_url.into_iter().map(|(id, url)| (DocId::new(id), url)).collect();
        let magnitudes: HashMap<DocId, f64> =
            magnitudes_raw.into_iter().map(|(id, norm)| (DocId::new(id), norm)).collect();
        let doc_count = id_url.len();

        Ok(Searcher {
            final_index: Mutex::new(final_index),
            secondary_index,
            magnitudes,
            id_url,
            doc_count,
            analyzer: Analyzer::stemmed_english(),
        })
    }

    /// Posting fetch: secondary-index lookup, seek, read one line.
    fn fetch_postings(&self, term: &str) -> Result<Vec<Posting>> {
        let Some(&offset) = self.secondary_index.get(term) else {
            return Ok(Vec::new());
        };

        let mut guard = self.final_index.lock().expect("final index mutex poisoned");
        guard.seek(SeekFrom::Start(offset))?;
        let mut reader = BufReader::new(&mut *guard);
        let mut line = String::new();
        reader.read_line(&mut line)?;

        let record = IndexRecord::from_line(&line).map_err(|err| {
            Error::corrupt(format!("offset {offset} for term '{term}' does not land on a record boundary: {err}"))
        })?;
        if record.token != term {
            return Err(Error::corrupt(format!(
                "secondary index offset {offset} for '{term}' points at record for '{}'",
                record.token
            )));
        }
        Ok(record.postings)
    }

    /// `Ok(None)` means the term is absent from the index; an `Err`
    /// (e.g. a corrupt posting record at the term's offset) is
    /// surfaced to the caller rather than treated the same as absence.
    fn doc_freq(&self, term: &str) -> Result<Option<usize>> {
        let postings = self.fetch_postings(term)?;
        Ok(if postings.is_empty() { None } else { Some(postings.len()) })
    }

    fn url_for(&self, doc_id: &DocId) -> Result<&str> {
        self.id_url
            .get(doc_id)
            .map(String::as_str)
            .ok_or_else(|| Error::corrupt(format!("doc_id '{doc_id}' absent from id->url map")))
    }

    /// Ranked TF-IDF cosine search, returning up to `DEFAULT_TOP_K` URLs
    /// ordered by descending similarity.
    pub fn search(&self, query: &str) -> Result<Vec<String>> {
        let start = std::time::Instant::now();
        let tokens = self.analyzer.tokenize(query);
        tracing::debug!(query, token_count = tokens.len(), "ranked search started");

        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let terms = vectorize_query(&tokens, |t| self.doc_freq(t), self.doc_count)?;

        let mut scores: HashMap<DocId, f64> = HashMap::new();
        let mut query_magnitude_sq = 0.0;
        for term in &terms {
            query_magnitude_sq += term.weight * term.weight;
            let postings = self.fetch_postings(&term.term)?;
            accumulate_term(&mut scores, &postings, term);
        }

        if query_magnitude_sq == 0.0 {
            return Ok(Vec::new());
        }
        let query_norm = query_magnitude_sq.sqrt();

        let mut collector = TopKCollector::new(DEFAULT_TOP_K);
        for (doc_id, raw_score) in scores {
            let doc_norm = self.magnitudes.get(&doc_id).copied().unwrap_or(0.0);
            if doc_norm == 0.0 {
                continue;
            }
            collector.offer(ScoredDocument { doc_id, score: raw_score / (doc_norm * query_norm) });
        }

        let mut urls = Vec::new();
        for scored in collector.into_sorted_vec() {
            urls.push(self.url_for(&scored.doc_id)?.to_string());
        }

        tracing::debug!(
            query,
            result_count = urls.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "ranked search finished"
        );
        Ok(urls)
    }

    /// Conjunctive Boolean AND search: documents containing every
    /// stemmed query term.
    ///
    /// Tokenization here is deliberately not `Analyzer::tokenize`: the
    /// query is split on whitespace only, and each raw token is
    /// stemmed directly, with no lowercasing and no punctuation
    /// stripping. A Boolean query like "NASA" or "don't" is matched
    /// literally (after stemming) rather than normalized the way a
    /// ranked query's terms are.
    pub fn bool_search(&self, query: &str) -> Result<Vec<String>> {
        let start = std::time::Instant::now();
        let tokens = stem_whitespace_tokens(query);
        tracing::debug!(query, token_count = tokens.len(), "bool search started");

        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut term_postings: Vec<(String, Vec<Posting>)> = Vec::new();
        for term in &tokens {
            let postings = self.fetch_postings(term)?;
            if postings.is_empty() {
                return Ok(Vec::new());
            }
            term_postings.push((term.clone(), postings));
        }

        term_postings.sort_by_key(|(_, postings)| postings.len());

        let mut candidates: HashSet<DocId> =
            term_postings[0].1.iter().map(|p| p.doc_id.clone()).collect();
        for (_, postings) in &term_postings[1..] {
            let doc_ids: HashSet<DocId> = postings.iter().map(|p| p.doc_id.clone()).collect();
            candidates.retain(|id| doc_ids.contains(id));
            if candidates.is_empty() {
                return Ok(Vec::new());
            }
        }

        let mut matching: Vec<Posting> = term_postings
            .iter()
            .flat_map(|(_, postings)| postings.iter())
            .filter(|p| candidates.contains(&p.doc_id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.tf.cmp(&a.tf));

        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        for posting in matching {
            if seen.insert(posting.doc_id.clone()) {
                urls.push(self.url_for(&posting.doc_id)?.to_string());
            }
        }

        tracing::debug!(
            query,
            result_count = urls.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "bool search finished"
        );
        Ok(urls)
    }
}

fn open_required(path: &std::path::Path) -> Result<File> {
    File::open(path).map_err(|_| Error::config(path))
}

fn read_json_required<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let mut contents = String::new();
    File::open(path).map_err(|_| Error::config(path))?.read_to_string(&mut contents)?;
    serde_json::from_str(&contents).map_err(Error::from)
}

/// Whitespace-split, raw Porter-stemmed query tokens for `bool_search`.
/// Unlike `Analyzer::tokenize`, this does not lowercase or split on
/// punctuation boundaries — each whitespace-delimited token is stemmed
/// as-is.
fn stem_whitespace_tokens(query: &str) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    query.split_whitespace().map(|term| stemmer.stem(term).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::doc::loader::DocumentSource;
    use crate::index::builder::IndexBuilder;
    use crate::core::types::RawDocument;

    struct FixedSource(Vec<RawDocument>);
    impl DocumentSource for FixedSource {
        fn documents(&self) -> Result<Vec<RawDocument>> {
            Ok(self.0.clone())
        }
    }

    fn doc(id: &str, url: &str, html: &str) -> RawDocument {
        RawDocument { doc_id: DocId::new(id), url: url.to_string(), html_bytes: html.as_bytes().to_vec() }
    }

    fn build_test_index(dir: &std::path::Path) {
        let source = FixedSource(vec![
            doc("d1", "u1", "<p>the quick brown fox</p>"),
            doc("d2", "u2", "<p>the lazy dog sleeps</p>"),
            doc("d3", "u3", "<p>quick fox jumps over the dog</p>"),
        ]);
        let config = Config {
            corpus_dir: dir.to_path_buf(),
            index_dir: dir.join("index"),
            chunk_size: 10,
            top_k: 10,
        };
        IndexBuilder::new().build(&source, &config).unwrap();
    }

    #[test]
    fn bool_search_requires_all_terms() {
        let dir = tempfile::tempdir().unwrap();
        build_test_index(dir.path());
        let searcher = Searcher::open(dir.path().join("index")).unwrap();

        let results = searcher.bool_search("fox dog").unwrap();
        assert_eq!(results, vec!["u3".to_string()]);

        assert!(searcher.bool_search("nonexistentterm").unwrap().is_empty());
    }

    #[test]
    fn ranked_search_returns_documents_containing_query_terms() {
        let dir = tempfile::tempdir().unwrap();
        build_test_index(dir.path());
        let searcher = Searcher::open(dir.path().join("index")).unwrap();

        let results = searcher.search("fox").unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.contains(&"u1".to_string()));
        assert!(results.contains(&"u3".to_string()));
    }

    #[test]
    fn empty_query_yields_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        build_test_index(dir.path());
        let searcher = Searcher::open(dir.path().join("index")).unwrap();

        assert!(searcher.search("   ").unwrap().is_empty());
        assert!(searcher.bool_search("").unwrap().is_empty());
    }

    #[test]
    fn bool_search_does_not_lowercase_or_strip_punctuation() {
        let dir = tempfile::tempdir().unwrap();
        build_test_index(dir.path());
        let searcher = Searcher::open(dir.path().join("index")).unwrap();

        // Indexed tokens are lowercased and punctuation-stripped at build
        // time ("fox"), but bool_search stems the raw query token as-is.
        assert!(searcher.bool_search("FOX").unwrap().is_empty());
        assert!(searcher.bool_search("fox.").unwrap().is_empty());
        assert!(!searcher.bool_search("fox").unwrap().is_empty());
    }

    #[test]
    fn open_fails_with_config_error_when_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Searcher::open(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
