//! Job pipeline: the synchronized job store and the worker pool that drains it.
//!
//! A producer adds files and may remove jobs; a consumer polls `jobs()` for
//! snapshots; a bounded pool of workers moves jobs through
//! `Pending → Processing → Done | Failed`. One mutex guards the whole store and
//! is never held across a compressor call.

mod error;
mod job;
mod stats;
mod store;
mod worker;

pub use error::PipelineError;
pub use job::{Job, JobStatus};
pub use stats::QueueStats;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::compress::Compressor;

use store::{JobStore, Removal};

/// State shared between the pipeline handle and its workers.
pub(crate) struct Shared {
    store: Mutex<JobStore>,
    /// Signalled whenever Pending work may be available (or on shutdown).
    work: Notify,
    closed: AtomicBool,
    compressor: Arc<dyn Compressor>,
}

impl Shared {
    fn lock_store(&self) -> MutexGuard<'_, JobStore> {
        // Store methods never panic mid-update, so a poisoned lock still holds consistent data.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[derive(Default)]
struct PoolState {
    started: bool,
    handles: Vec<JoinHandle<()>>,
}

/// Concurrent compression queue with a bounded worker pool.
pub struct Pipeline {
    shared: Arc<Shared>,
    workers: usize,
    pool: Mutex<PoolState>,
}

impl Pipeline {
    /// Create an empty pipeline that will run up to `workers` compressions at once (minimum 1).
    pub fn new(compressor: Arc<dyn Compressor>, workers: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                store: Mutex::new(JobStore::default()),
                work: Notify::new(),
                closed: AtomicBool::new(false),
                compressor,
            }),
            workers: workers.max(1),
            pool: Mutex::new(PoolState::default()),
        }
    }

    /// Configured worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Queue each path that is not already in the pipeline.
    ///
    /// Paths that cannot be stat'ed or are not regular files are skipped.
    /// Existing jobs are left untouched, whatever their status. A path removed
    /// while Processing may be added again; it is queued as a new Pending job
    /// once the old compression returns. Returns the number of jobs added.
    pub fn add_files<I, P>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut seen = HashSet::new();
        let candidates: Vec<PathBuf> = {
            let store = self.shared.lock_store();
            paths
                .into_iter()
                .map(|p| p.as_ref().to_path_buf())
                .filter(|p| !store.contains(p) && seen.insert(p.clone()))
                .collect()
        };

        // Stat outside the lock.
        let sized: Vec<(PathBuf, u64)> = candidates
            .into_iter()
            .filter_map(|path| match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => Some((path, meta.len())),
                Ok(_) => {
                    tracing::debug!(path = %path.display(), "skipping non-file path");
                    None
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), "skipping path: {}", e);
                    None
                }
            })
            .collect();

        let added = {
            let mut store = self.shared.lock_store();
            sized
                .into_iter()
                .filter(|(path, size)| store.insert(path.clone(), *size))
                .count()
        };

        if added > 0 {
            tracing::debug!(added, "queued jobs");
            self.shared.work.notify_waiters();
        }
        added
    }

    /// Start the worker pool on the current Tokio runtime.
    ///
    /// Idempotent: later calls only wake the existing workers so jobs added
    /// since are picked up.
    pub fn start(&self) -> Result<(), PipelineError> {
        if self.shared.is_closed() {
            return Err(PipelineError::ShutDown);
        }
        let mut pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        if !pool.started {
            let handle =
                tokio::runtime::Handle::try_current().map_err(|_| PipelineError::NoRuntime)?;
            for worker in 0..self.workers {
                let shared = Arc::clone(&self.shared);
                pool.handles
                    .push(handle.spawn(worker::run_worker(shared, worker)));
            }
            pool.started = true;
            tracing::info!(workers = self.workers, "worker pool started");
        }
        drop(pool);
        self.shared.work.notify_waiters();
        Ok(())
    }

    /// Whether `start` has spawned the worker pool.
    pub fn is_started(&self) -> bool {
        self.pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .started
    }

    /// Point-in-time copy of every job, in the order they were added.
    pub fn jobs(&self) -> Vec<Job> {
        self.shared.lock_store().snapshot()
    }

    /// Remove the job for `path`.
    ///
    /// Pending, Done and Failed jobs go away immediately. A Processing job
    /// stays visible until its compressor call returns, then disappears
    /// without ever being reported as Done or Failed. The compression itself
    /// is not interrupted. Returns false if no such job exists.
    pub fn remove_job(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.shared.lock_store().remove(path) {
            Removal::Removed => {
                tracing::debug!(path = %path.display(), "job removed");
                true
            }
            Removal::Deferred => {
                tracing::debug!(path = %path.display(), "job processing; will discard on completion");
                true
            }
            Removal::NotFound => false,
        }
    }

    /// Remove every Done or Failed job. Returns how many were removed.
    pub fn clear_completed(&self) -> usize {
        let removed = self.shared.lock_store().clear_completed();
        if removed > 0 {
            tracing::debug!(removed, "cleared completed jobs");
        }
        removed
    }

    /// True when no job is Pending or Processing.
    pub fn is_idle(&self) -> bool {
        self.shared.lock_store().is_idle()
    }

    /// Stop the worker pool and wait for it to exit.
    ///
    /// Compressions already running finish and record their result; Pending
    /// jobs stay Pending. The pipeline cannot be started again afterwards.
    pub async fn shutdown(&self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.work.notify_waiters();
        let handles = std::mem::take(
            &mut self
                .pool
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handles,
        );
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("worker task join: {}", e);
            }
        }
        tracing::info!("worker pool stopped");
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.work.notify_waiters();
    }
}

#[cfg(test)]
mod tests;
