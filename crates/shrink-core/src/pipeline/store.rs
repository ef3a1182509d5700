//! The job collection guarded by the pipeline lock.
//!
//! All methods here are plain bookkeeping over a `Vec` in insertion order;
//! they never do I/O, so callers can hold the lock for their duration.

use std::path::{Path, PathBuf};

use super::job::{Job, JobStatus};

struct Entry {
    job: Job,
    /// Set by `remove` while the job is Processing; the worker drops the entry on completion.
    discard: bool,
    /// Size from an `insert` made after the discard; the worker queues a fresh job instead.
    readd: Option<u64>,
}

impl Entry {
    fn new(path: PathBuf, original_size: u64) -> Self {
        Self {
            job: Job::pending(path, original_size),
            discard: false,
            readd: None,
        }
    }

    /// A discarded entry is on its way out unless it was re-added.
    fn is_live(&self) -> bool {
        !self.discard || self.readd.is_some()
    }
}

/// What happened to a job when its worker reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Finish {
    Done { original: u64, compressed: u64 },
    Failed,
    /// Removed while processing; result dropped.
    Discarded,
    /// Removed and then added again while processing; result dropped and a
    /// new Pending job appended.
    Requeued,
    /// No Processing entry for this worker (should not happen).
    Missing,
}

/// Outcome of `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Removal {
    Removed,
    /// Job is Processing; it will be dropped when its worker finishes.
    Deferred,
    NotFound,
}

#[derive(Default)]
pub(crate) struct JobStore {
    entries: Vec<Entry>,
}

impl JobStore {
    /// True if `path` has a job that is not waiting to be discarded.
    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.position(path).is_some_and(|idx| self.entries[idx].is_live())
    }

    fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.job.file_path == path)
    }

    /// Append a Pending job unless the path is already present. Returns true if added.
    ///
    /// A path removed while Processing counts as absent: the add is recorded
    /// on the entry and takes effect when its worker reports back.
    pub(crate) fn insert(&mut self, path: PathBuf, original_size: u64) -> bool {
        match self.position(&path) {
            None => {
                self.entries.push(Entry::new(path, original_size));
                true
            }
            Some(idx) => {
                let entry = &mut self.entries[idx];
                if entry.is_live() {
                    return false;
                }
                entry.readd = Some(original_size);
                true
            }
        }
    }

    /// Claim the first Pending job in insertion order for `worker`.
    pub(crate) fn claim_next(&mut self, worker: usize) -> Option<PathBuf> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.job.status == JobStatus::Pending)?;
        entry.job.status = JobStatus::Processing;
        entry.job.worker = Some(worker);
        Some(entry.job.file_path.clone())
    }

    /// Record the compressor outcome for a job claimed by `worker`.
    pub(crate) fn finish(
        &mut self,
        path: &Path,
        worker: usize,
        outcome: Result<u64, String>,
    ) -> Finish {
        let Some(idx) = self.entries.iter().position(|e| {
            e.job.file_path == path
                && e.job.status == JobStatus::Processing
                && e.job.worker == Some(worker)
        }) else {
            return Finish::Missing;
        };

        if self.entries[idx].discard {
            let entry = self.entries.remove(idx);
            return match entry.readd {
                Some(size) => {
                    self.entries.push(Entry::new(entry.job.file_path, size));
                    Finish::Requeued
                }
                None => Finish::Discarded,
            };
        }

        let job = &mut self.entries[idx].job;
        match outcome {
            Ok(size) => {
                job.status = JobStatus::Done;
                job.compressed_size = Some(size);
                job.error = None;
                Finish::Done {
                    original: job.original_size,
                    compressed: size,
                }
            }
            Err(msg) => {
                job.status = JobStatus::Failed;
                job.compressed_size = None;
                job.error = Some(msg);
                Finish::Failed
            }
        }
    }

    pub(crate) fn remove(&mut self, path: &Path) -> Removal {
        let Some(idx) = self.position(path) else {
            return Removal::NotFound;
        };
        let entry = &mut self.entries[idx];
        if entry.job.status == JobStatus::Processing {
            entry.discard = true;
            entry.readd = None;
            return Removal::Deferred;
        }
        self.entries.remove(idx);
        Removal::Removed
    }

    /// Remove every Done/Failed job; returns how many were removed.
    pub(crate) fn clear_completed(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.job.status.is_terminal());
        before - self.entries.len()
    }

    /// Copies of all jobs in insertion order.
    pub(crate) fn snapshot(&self) -> Vec<Job> {
        self.entries.iter().map(|e| e.job.clone()).collect()
    }

    /// True when nothing is Pending or Processing.
    pub(crate) fn is_idle(&self) -> bool {
        self.entries.iter().all(|e| e.job.status.is_terminal())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
