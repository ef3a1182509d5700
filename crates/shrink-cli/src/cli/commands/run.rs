//! `shrink run <paths>` – scan, queue, compress, and report.

use anyhow::Result;
use shrink_core::compress::ZstdCompressor;
use shrink_core::config::ShrinkConfig;
use shrink_core::pipeline::{Job, Pipeline, QueueStats};
use shrink_core::scanner;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::format::{format_bytes, status_label};

const POLL_INTERVAL_MS: u64 = 250;

pub async fn run_batch(cfg: &ShrinkConfig, roots: &[PathBuf]) -> Result<()> {
    let scan = scanner::scan(roots, cfg.recursive, &cfg.extensions);
    for skipped in &scan.skipped {
        tracing::warn!(path = %skipped.path.display(), "skipped: {}", skipped.reason);
        eprintln!("skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    if scan.files.is_empty() {
        println!("No matching files.");
        return Ok(());
    }

    let compressor = Arc::new(ZstdCompressor::from_config(cfg));
    let pipeline = Pipeline::new(compressor, cfg.workers);
    let added = pipeline.add_files(&scan.files);
    tracing::info!(added, workers = pipeline.workers(), "starting batch");
    println!("Queued {} file(s) with {} worker(s).", added, pipeline.workers());
    pipeline.start()?;

    let mut ticker = tokio::time::interval(Duration::from_millis(POLL_INTERVAL_MS));
    let jobs = loop {
        ticker.tick().await;
        let jobs = pipeline.jobs();
        let stats = QueueStats::from_jobs(&jobs);
        print_progress(&stats)?;
        if stats.pending == 0 && stats.processing == 0 {
            break jobs;
        }
    };
    println!();
    pipeline.shutdown().await;

    print_table(&jobs);
    let stats = QueueStats::from_jobs(&jobs);
    println!(
        "Processed: {}/{} | Saved: {} ({:.1}%)",
        stats.done,
        stats.total,
        format_bytes(stats.bytes_saved),
        stats.saved_percent()
    );
    tracing::info!(
        done = stats.done,
        failed = stats.failed,
        saved = stats.bytes_saved,
        "batch finished"
    );

    if stats.failed > 0 {
        anyhow::bail!("{} of {} job(s) failed", stats.failed, stats.total);
    }
    Ok(())
}

fn print_progress(stats: &QueueStats) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(
        out,
        "\r  {}/{} finished ({:.0}%)  {} running  saved {}  ",
        stats.finished(),
        stats.total,
        stats.fraction() * 100.0,
        stats.processing,
        format_bytes(stats.bytes_saved)
    )?;
    out.flush()
}

fn print_table(jobs: &[Job]) {
    println!(
        "{:<32} {:<20} {:>10} {:>10}  {}",
        "FILE", "STATUS", "SIZE", "AFTER", "NOTE"
    );
    for job in jobs {
        let name = job
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| job.file_path.display().to_string());
        let after = job
            .compressed_size
            .map(format_bytes)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<32} {:<20} {:>10} {:>10}  {}",
            name,
            status_label(job),
            format_bytes(job.original_size),
            after,
            job.error.as_deref().unwrap_or("")
        );
    }
}
