//! Errors from pipeline lifecycle calls. Per-job failures never surface here;
//! they are recorded on the job.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// `start` was called outside a Tokio runtime.
    #[error("worker pool needs a Tokio runtime")]
    NoRuntime,
    /// `start` was called after `shutdown`.
    #[error("pipeline has been shut down")]
    ShutDown,
}
