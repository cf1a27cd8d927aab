use std::collections::HashMap;
use std::fs::File;
use std::io::Write;

use chrono::Utc;

use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::DocId;
use crate::doc::html::{HtmlExtractor, PlainTextExtractor};
use crate::doc::loader::DocumentSource;
use crate::index::finalize::finalize;
use crate::index::ingest::Ingestor;
use crate::index::merge::merge_partials;
use crate::index::spill::SpillWriter;
use crate::storage::layout::StorageLayout;

/// Orchestrates the full build pipeline: ingest -> spill -> merge ->
/// finalize. One `IndexBuilder` per build run.
pub struct IndexBuilder {
    analyzer: Analyzer,
    extractor: Box<dyn HtmlExtractor>,
}

/// Summary returned after a successful build, mirroring `manifest.json`.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub doc_count: usize,
    pub partial_file_count: usize,
    pub chunk_size: usize,
}

impl IndexBuilder {
    pub fn new() -> Self {
        IndexBuilder { analyzer: Analyzer::stemmed_english(), extractor: Box::new(PlainTextExtractor) }
    }

    /// Runs the pipeline over every document a `DocumentSource` yields,
    /// writing all on-disk artifacts under `config.index_dir`.
    pub fn build(&self, source: &dyn DocumentSource, config: &Config) -> Result<BuildReport> {
        let layout = StorageLayout::create(config.index_dir.clone())?;
        let documents = source.documents()?;
        let doc_count = documents.len();

        let mut ingestor = Ingestor::new(config.chunk_size);
        let mut spiller = SpillWriter::new(&layout);
        let mut id_url_map: HashMap<DocId, String> = HashMap::new();

        for raw in documents {
            let text = self.extractor.extract(&raw.html_bytes);
            let tokens = self.analyzer.tokenize(&text);
            ingestor.add_document(raw.doc_id, &tokens, raw.url);

            if ingestor.is_full() {
                let (partition, ids) = ingestor.take_partition();
                id_url_map.extend(ids);
                spiller.spill(partition)?;
            }
        }

        if ingestor.doc_count() > 0 {
            let (partition, ids) = ingestor.take_partition();
            id_url_map.extend(ids);
            spiller.spill(partition)?;
        }

        let partial_file_count = spiller.partial_count();
        merge_partials(&layout, partial_file_count)?;
        finalize(&layout, doc_count)?;

        write_id_url_map(&layout, &id_url_map)?;
        let report = BuildReport { doc_count, partial_file_count, chunk_size: config.chunk_size };
        write_manifest(&layout, &report)?;

        tracing::info!(
            doc_count,
            partial_file_count,
            "index build complete"
        );
        Ok(report)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn write_id_url_map(layout: &StorageLayout, map: &HashMap<DocId, String>) -> Result<()> {
    let by_string: HashMap<&str, &str> =
        map.iter().map(|(doc_id, url)| (doc_id.as_str(), url.as_str())).collect();
    let json = serde_json::to_vec(&by_string)?;
    let mut file = File::create(layout.doc_id_url_map_path())?;
    file.write_all(&json)?;
    Ok(())
}

fn write_manifest(layout: &StorageLayout, report: &BuildReport) -> Result<()> {
    let manifest = serde_json::json!({
        "doc_count": report.doc_count,
        "partial_file_count": report.partial_file_count,
        "chunk_size": report.chunk_size,
        "built_at": Utc::now().to_rfc3339(),
    });
    let mut file = File::create(layout.manifest_path())?;
    file.write_all(serde_json::to_vec(&manifest)?.as_slice())?;
    Ok(())
}
