//! Output naming, and the temp files compressed data is written to before it is moved into place.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Extension appended to compressed output (without the dot).
pub const COMPRESSED_EXTENSION: &str = "zst";

/// Final output path: `<name>.zst` next to `source`, or inside `output_dir` when given.
pub fn target_path(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut name: OsString = source
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".");
    name.push(COMPRESSED_EXTENSION);
    match output_dir {
        Some(dir) => dir.join(name),
        None => source.with_file_name(name),
    }
}

/// Unique hidden temp file next to `target` (`.<name>.XXXXXX.part`).
///
/// Dropping it without `persist` removes it, so failed writes leave nothing behind.
pub(super) fn temp_file_for(target: &Path) -> io::Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut prefix = OsString::from(".");
    if let Some(name) = target.file_name() {
        prefix.push(name);
        prefix.push(".");
    }
    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".part")
        .tempfile_in(dir)
}

/// Move `temp` to `target`, failing with `AlreadyExists` instead of replacing a file.
pub(super) fn persist_new(temp: NamedTempFile, target: &Path) -> io::Result<()> {
    temp.persist_noclobber(target).map(drop).map_err(|e| e.error)
}
