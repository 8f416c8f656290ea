use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("{}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("No columns to parse from file")]
    NoColumns,
    #[error("Chunk size must be at least 1")]
    InvalidChunkSize,
}

pub type Result<T> = std::result::Result<T, ViewerError>;
