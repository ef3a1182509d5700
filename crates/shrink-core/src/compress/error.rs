//! Compression error type. Rendered into the job's error message on failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressError {
    /// Source could not be opened or read.
    #[error("read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    /// Output could not be created, encoded, synced or moved into place.
    #[error("write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    /// Source was compressed but could not be removed (replace mode).
    #[error("remove source {}: {source}", .path.display())]
    RemoveSource { path: PathBuf, source: io::Error },
    /// Any other failure reported by a compressor implementation.
    #[error("{0}")]
    Other(String),
}

impl CompressError {
    pub fn other(msg: impl Into<String>) -> Self {
        CompressError::Other(msg.into())
    }
}
