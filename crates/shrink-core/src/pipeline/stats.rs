//! Queue statistics derived from a snapshot.
//!
//! The pipeline keeps no running counters; consumers rebuild these from
//! `Pipeline::jobs()` on every poll.

use super::job::{Job, JobStatus};

/// Aggregate view over one snapshot (CLI-friendly).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub done: usize,
    pub failed: usize,
    /// Sum of original sizes over all jobs.
    pub original_bytes: u64,
    /// Sum of original sizes over Done jobs.
    pub done_bytes: u64,
    /// Sum of `original_size - compressed_size` over Done jobs.
    pub bytes_saved: u64,
}

impl QueueStats {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut stats = QueueStats {
            total: jobs.len(),
            ..Default::default()
        };
        for job in jobs {
            stats.original_bytes += job.original_size;
            match job.status {
                JobStatus::Pending => stats.pending += 1,
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Done => {
                    stats.done += 1;
                    stats.done_bytes += job.original_size;
                    stats.bytes_saved += job.bytes_saved();
                }
                JobStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }

    /// Jobs that reached Done or Failed.
    pub fn finished(&self) -> usize {
        self.done + self.failed
    }

    /// Fraction finished in [0.0, 1.0]; an empty queue counts as finished.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.finished() as f64 / self.total as f64
    }

    /// Saved bytes as a percentage of the Done jobs' original size.
    pub fn saved_percent(&self) -> f64 {
        if self.done_bytes == 0 {
            return 0.0;
        }
        self.bytes_saved as f64 / self.done_bytes as f64 * 100.0
    }
}
