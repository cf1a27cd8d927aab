use std::path::PathBuf;

/// Build and query configuration.
///
/// `chunk_size` bounds the Ingestor's in-memory partition (documents per
/// spilled partial index); `top_k` bounds ranked `search` results.
#[derive(Debug, Clone)]
pub struct Config {
    pub corpus_dir: PathBuf,
    pub index_dir: PathBuf,
    pub chunk_size: usize,
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            corpus_dir: PathBuf::from("./corpus"),
            index_dir: PathBuf::from("./index"),
            chunk_size: 10_000,
            top_k: 10,
        }
    }
}
