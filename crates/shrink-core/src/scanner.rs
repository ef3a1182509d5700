//! Expands user-supplied roots into a flat list of files to queue.
//!
//! Files named directly are kept when their extension matches; directories
//! are listed one level deep, or fully with `recursive`. Hidden entries
//! inside directories and already-compressed output are skipped.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::compress::COMPRESSED_EXTENSION;

/// A root that could not be read, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Matching files, sorted and without duplicates.
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedPath>,
}

/// Scan `roots`. `extensions` are matched case-insensitively, without the
/// leading dot; an empty list matches every file.
pub fn scan<P: AsRef<Path>>(roots: &[P], recursive: bool, extensions: &[String]) -> ScanResult {
    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();
    let mut files = BTreeSet::new();
    let mut skipped = Vec::new();

    for root in roots {
        let root = root.as_ref();
        let meta = match std::fs::metadata(root) {
            Ok(m) => m,
            Err(e) => {
                skipped.push(SkippedPath {
                    path: root.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if meta.is_file() {
            if matches_extension(root, &wanted) {
                files.insert(root.to_path_buf());
            }
            continue;
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && matches_extension(entry.path(), &wanted) {
                        files.insert(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    tracing::debug!(path = %path.display(), "scan error: {}", e);
                    skipped.push(SkippedPath {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    tracing::debug!(files = files.len(), skipped = skipped.len(), "scan finished");
    ScanResult {
        files: files.into_iter().collect(),
        skipped,
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn matches_extension(path: &Path, wanted: &[String]) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if ext.as_deref() == Some(COMPRESSED_EXTENSION) {
        return false;
    }
    if wanted.is_empty() {
        return true;
    }
    match ext {
        Some(ext) => wanted.iter().any(|w| *w == ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"data").unwrap();
    }

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a.png"));
        touch(&root.join("b.JPG"));
        touch(&root.join("notes.txt"));
        touch(&root.join("old.png.zst"));
        touch(&root.join(".hidden.png"));
        touch(&root.join("nested/c.png"));
        touch(&root.join("nested/deeper/d.webp"));
        touch(&root.join(".cache/e.png"));
        dir
    }

    fn names(result: &ScanResult, root: &Path) -> Vec<String> {
        result
            .files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn flat_scan_filters_by_extension() {
        let dir = tree();
        let result = scan(&[dir.path()], false, &exts(&["png", "jpg", "webp"]));
        assert_eq!(names(&result, dir.path()), vec!["a.png", "b.JPG"]);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn recursive_scan_descends_but_skips_hidden() {
        let dir = tree();
        let result = scan(&[dir.path()], true, &exts(&[".PNG", "webp"]));
        assert_eq!(
            names(&result, dir.path()),
            vec!["a.png", "nested/c.png", "nested/deeper/d.webp"]
        );
    }

    #[test]
    fn empty_extension_list_matches_everything_but_output() {
        let dir = tree();
        let result = scan(&[dir.path()], false, &[]);
        assert_eq!(names(&result, dir.path()), vec!["a.png", "b.JPG", "notes.txt"]);
    }

    #[test]
    fn explicit_files_and_duplicates() {
        let dir = tree();
        let a = dir.path().join("a.png");
        let txt = dir.path().join("notes.txt");
        let result = scan(&[a.clone(), a.clone(), txt], false, &exts(&["png"]));
        assert_eq!(result.files, vec![a]);
    }

    #[test]
    fn missing_root_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = scan(&[missing.clone()], true, &[]);
        assert!(result.files.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].path, missing);
    }
}
