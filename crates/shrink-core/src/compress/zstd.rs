//! zstd file compressor: streams the source into a hidden temp file next to
//! the target, fsyncs, then moves it into place. An existing target is never
//! replaced.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::config::{OutputMode, ShrinkConfig};

use super::output::{persist_new, target_path, temp_file_for};
use super::{CompressError, Compressor};

const BUF_SIZE: usize = 64 * 1024;

/// Built-in compressor backed by the `zstd` crate.
#[derive(Debug, Clone)]
pub struct ZstdCompressor {
    level: i32,
    mode: OutputMode,
    output_dir: Option<PathBuf>,
}

impl ZstdCompressor {
    pub fn new(level: i32, mode: OutputMode, output_dir: Option<PathBuf>) -> Self {
        let range = ::zstd::compression_level_range();
        Self {
            level: level.clamp(*range.start(), *range.end()),
            mode,
            output_dir,
        }
    }

    pub fn from_config(cfg: &ShrinkConfig) -> Self {
        Self::new(cfg.level, cfg.output_mode, cfg.output_dir.clone())
    }

    /// Effective level after clamping.
    pub fn level(&self) -> i32 {
        self.level
    }

    fn encode(
        &self,
        source: &Path,
        out: &mut File,
        out_path: &Path,
    ) -> Result<u64, CompressError> {
        let read_err = |source_err: io::Error| CompressError::Read {
            path: source.to_path_buf(),
            source: source_err,
        };
        let write_err = |source_err: io::Error| CompressError::Write {
            path: out_path.to_path_buf(),
            source: source_err,
        };

        let input = File::open(source).map_err(read_err)?;
        let mut reader = BufReader::with_capacity(BUF_SIZE, input);

        let mut encoder =
            ::zstd::stream::Encoder::new(BufWriter::with_capacity(BUF_SIZE, out), self.level)
                .map_err(write_err)?;
        let mut buf = vec![0u8; BUF_SIZE];
        loop {
            let n = reader.read(&mut buf).map_err(read_err)?;
            if n == 0 {
                break;
            }
            encoder.write_all(&buf[..n]).map_err(write_err)?;
        }
        let writer = encoder.finish().map_err(write_err)?;
        let file = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
        file.sync_all().map_err(write_err)?;
        let size = file.metadata().map_err(write_err)?.len();
        Ok(size)
    }
}

impl Compressor for ZstdCompressor {
    fn compress(&self, path: &Path) -> Result<u64, CompressError> {
        let target = target_path(path, self.output_dir.as_deref());
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| CompressError::Write {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        // Checked up front to skip the work; `persist_new` enforces it.
        if fs::symlink_metadata(&target).is_ok() {
            return Err(CompressError::Write {
                path: target,
                source: io::Error::new(io::ErrorKind::AlreadyExists, "target already exists"),
            });
        }

        let mut temp = temp_file_for(&target).map_err(|e| CompressError::Write {
            path: target.clone(),
            source: e,
        })?;
        let temp_path = temp.path().to_path_buf();
        let size = self.encode(path, temp.as_file_mut(), &temp_path)?;

        persist_new(temp, &target).map_err(|e| CompressError::Write {
            path: target.clone(),
            source: e,
        })?;

        if self.mode == OutputMode::Replace {
            fs::remove_file(path).map_err(|e| CompressError::RemoveSource {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        tracing::debug!(
            source = %path.display(),
            target = %target.display(),
            size,
            "compressed"
        );
        Ok(size)
    }
}
