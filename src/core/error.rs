use std::path::PathBuf;

/// Error kinds produced by the index builder and the query evaluator.
///
/// Build-time errors are fatal; query-time errors are recovered locally
/// by the caller (an unknown term simply contributes nothing).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse index record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing required artifact at startup: {path}")]
    Config { path: PathBuf },

    #[error("corrupt index: {context}")]
    CorruptIndex { context: String },

    #[error("query error: {0}")]
    Query(String),
}

impl Error {
    pub fn corrupt(context: impl Into<String>) -> Self {
        Error::CorruptIndex { context: context.into() }
    }

    pub fn config(path: impl Into<PathBuf>) -> Self {
        Error::Config { path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
