//! Worker loop: claim the next Pending job, compress it off the lock, record the outcome.
//!
//! Workers live until the pipeline is shut down. When nothing is Pending they
//! park on the shared `Notify`; `add_files` and `start` wake them.

use std::path::PathBuf;
use std::sync::Arc;

use super::store::Finish;
use super::Shared;

pub(super) async fn run_worker(shared: Arc<Shared>, worker: usize) {
    tracing::debug!(worker, "worker started");
    loop {
        // Register interest before looking at the store so a notify between
        // the check and the await is not lost.
        let notified = shared.work.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if shared.is_closed() {
            break;
        }

        let claimed = shared.lock_store().claim_next(worker);
        match claimed {
            Some(path) => process(&shared, worker, path).await,
            None => notified.await,
        }
    }
    tracing::debug!(worker, "worker stopped");
}

async fn process(shared: &Shared, worker: usize, path: PathBuf) {
    tracing::debug!(worker, path = %path.display(), "claimed job");

    let compressor = Arc::clone(&shared.compressor);
    let outcome = {
        let path = path.clone();
        match tokio::task::spawn_blocking(move || compressor.compress(&path)).await {
            Ok(Ok(size)) => Ok(size),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("compressor task failed: {}", e)),
        }
    };

    let failure = outcome.as_ref().err().cloned();
    let finish = shared.lock_store().finish(&path, worker, outcome);
    match finish {
        Finish::Done {
            original,
            compressed,
        } => tracing::info!(worker, path = %path.display(), original, compressed, "job done"),
        Finish::Failed => tracing::warn!(
            worker,
            path = %path.display(),
            "job failed: {}",
            failure.unwrap_or_default()
        ),
        Finish::Discarded => {
            tracing::debug!(worker, path = %path.display(), "job removed while processing; result discarded")
        }
        Finish::Requeued => {
            tracing::debug!(worker, path = %path.display(), "job re-added while processing; queued again");
            shared.work.notify_waiters();
        }
        Finish::Missing => {
            tracing::warn!(worker, path = %path.display(), "claimed job vanished from the store")
        }
    }
}
