//! `shrink scan <paths>` – list the files a run would queue.

use anyhow::Result;
use shrink_core::config::ShrinkConfig;
use shrink_core::scanner;
use std::path::PathBuf;

use crate::cli::format::format_bytes;

pub fn run_scan(cfg: &ShrinkConfig, roots: &[PathBuf]) -> Result<()> {
    let scan = scanner::scan(roots, cfg.recursive, &cfg.extensions);
    for skipped in &scan.skipped {
        eprintln!("skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    if scan.files.is_empty() {
        println!("No matching files.");
        return Ok(());
    }

    let mut total = 0u64;
    for path in &scan.files {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        total += size;
        println!("{:>10}  {}", format_bytes(size), path.display());
    }
    println!("{} file(s), {}", scan.files.len(), format_bytes(total));
    Ok(())
}
