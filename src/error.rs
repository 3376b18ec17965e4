use std::path::PathBuf;

use thiserror::Error;

use crate::canonical::OracleError;
use crate::config::ConfigError;
use crate::graph::GraphError;

/// Everything that can abort the processing of one tree shape.
#[derive(Debug, Error)]
pub enum Error {
    #[error("symbol index {index} does not fit the {len}-symbol alphabet")]
    AlphabetExhausted { index: usize, len: usize },

    #[error("canonicalization failed: {0}")]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("I/O failure on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed artifact at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
