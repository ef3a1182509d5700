//! File compressors.
//!
//! The pipeline treats a compressor as an opaque collaborator: it hands over
//! a source path and gets back either the size of the compressed result or
//! an error. `ZstdCompressor` is the built-in implementation; tests plug in
//! their own.

mod error;
mod output;
mod zstd;

pub use self::error::CompressError;
pub use self::output::{target_path, COMPRESSED_EXTENSION};
pub use self::zstd::ZstdCompressor;

use std::path::Path;

/// Performs the size reduction for one file.
///
/// Called from the blocking thread pool, at most once per claimed job.
/// Implementations must not return a size on failure, and must not destroy
/// the source unless their output policy says so.
pub trait Compressor: Send + Sync + 'static {
    /// Compress `path`; returns the size in bytes of the compressed result.
    fn compress(&self, path: &Path) -> Result<u64, CompressError>;
}

impl<F> Compressor for F
where
    F: Fn(&Path) -> Result<u64, CompressError> + Send + Sync + 'static,
{
    fn compress(&self, path: &Path) -> Result<u64, CompressError> {
        self(path)
    }
}
