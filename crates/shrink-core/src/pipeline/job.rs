//! Job record and status handed out to consumers.

use std::fmt;
use std::path::PathBuf;

/// Lifecycle state of a job. Moves only forward:
/// `Pending → Processing → Done | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }

    /// Done or Failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file's compression work item and its outcome.
///
/// Values returned by [`Pipeline::jobs`](super::Pipeline::jobs) are copies;
/// changing them has no effect on the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Source path; unique within a pipeline.
    pub file_path: PathBuf,
    /// Size of the source when the job was added.
    pub original_size: u64,
    /// Size of the compressed result; only set when `status == Done`.
    pub compressed_size: Option<u64>,
    pub status: JobStatus,
    /// Failure message; only set when `status == Failed`.
    pub error: Option<String>,
    /// Worker that claimed the job (None while Pending).
    pub worker: Option<usize>,
}

impl Job {
    pub(crate) fn pending(file_path: PathBuf, original_size: u64) -> Self {
        Self {
            file_path,
            original_size,
            compressed_size: None,
            status: JobStatus::Pending,
            error: None,
            worker: None,
        }
    }

    /// Bytes saved by this job (0 unless Done with a smaller result).
    pub fn bytes_saved(&self) -> u64 {
        match (self.status, self.compressed_size) {
            (JobStatus::Done, Some(size)) => self.original_size.saturating_sub(size),
            _ => 0,
        }
    }
}
