//! Human-readable sizes and per-job status labels for terminal output.

use shrink_core::pipeline::{Job, JobStatus};

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// `512 B`, `1.5 KiB`, `3.2 MiB`, ...
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Status column text, e.g. `done (62.5% saved)`.
pub fn status_label(job: &Job) -> String {
    match (job.status, job.compressed_size) {
        (JobStatus::Done, Some(size)) if job.original_size > 0 => {
            let saved = 100.0 - size as f64 / job.original_size as f64 * 100.0;
            format!("done ({:.1}% saved)", saved)
        }
        (status, _) => status.to_string(),
    }
}
