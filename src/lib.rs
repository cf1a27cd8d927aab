//! A single-node text search engine over a static corpus of HTML
//! documents: an external-memory index builder and a TF-IDF/Boolean
//! query evaluator.
//!
//! ```text
//! documents -> Ingestor -> Spill Writer -> K-Way Merger -> Finalizer
//!                                                              |
//!                                            final_index + secondary_index
//!                                            + doc_id_url_map + doc_len_file
//!                                                              |
//!                                                          Searcher
//! ```

pub mod core;
pub mod analysis;
pub mod doc;
pub mod storage;
pub mod index;
pub mod scoring;
pub mod search;

pub use core::config::Config;
pub use core::error::{Error, Result};
pub use index::builder::{BuildReport, IndexBuilder};
pub use search::evaluator::Searcher;
