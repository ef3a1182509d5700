//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

pub mod compressors;

use std::path::{Path, PathBuf};
use std::time::Duration;

use shrink_core::pipeline::Pipeline;

/// Write `len` bytes to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![b'x'; len]).unwrap();
    path
}

/// Poll `cond` until it holds or `timeout` passes.
pub async fn wait_until<F: FnMut() -> bool>(mut cond: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

/// Wait until no job is Pending or Processing; panics after 20s.
pub async fn wait_idle(pipeline: &Pipeline) {
    assert!(
        wait_until(|| pipeline.is_idle(), Duration::from_secs(20)).await,
        "pipeline did not go idle: {:?}",
        pipeline.jobs()
    );
}
