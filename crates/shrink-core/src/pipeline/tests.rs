use super::*;
use crate::compress::CompressError;
use std::fs;

fn halving() -> Arc<dyn Compressor> {
    Arc::new(|path: &Path| -> Result<u64, CompressError> {
        let len = fs::metadata(path)
            .map_err(|e| CompressError::other(e.to_string()))?
            .len();
        Ok(len / 2)
    })
}

fn write_file(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, vec![b'x'; len]).unwrap();
    path
}

#[test]
fn add_nonexistent_path_yields_no_jobs() {
    let pipeline = Pipeline::new(halving(), 2);
    let added = pipeline.add_files(["/definitely/not/here.png"]);
    assert_eq!(added, 0);
    assert!(pipeline.jobs().is_empty());
    assert!(pipeline.is_idle());
}

fn pipeline_with(paths: &[&PathBuf]) -> Pipeline {
    let pipeline = Pipeline::new(halving(), 1);
    pipeline.add_files(paths.iter().copied());
    pipeline
}

#[test]
fn add_records_size_and_pending_status() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", 123);

    let expected = Job {
        file_path: a.clone(),
        original_size: 123,
        compressed_size: None,
        status: JobStatus::Pending,
        error: None,
        worker: None,
    };
    assert_eq!(pipeline_with(&[&a]).jobs(), vec![expected]);
}

#[test]
fn add_is_idempotent_per_path() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", 10);
    let b = write_file(dir.path(), "b.bin", 20);
    let pipeline = Pipeline::new(halving(), 1);

    assert_eq!(pipeline.add_files([&a, &a, &b]), 2);
    assert_eq!(pipeline.add_files([&b, &a]), 0);

    let paths: Vec<PathBuf> = pipeline.jobs().into_iter().map(|j| j.file_path).collect();
    assert_eq!(paths, vec![a, b]);
}

#[test]
fn add_skips_directories_and_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    let c = write_file(dir.path(), "c.bin", 1);
    let a = write_file(dir.path(), "a.bin", 1);
    let pipeline = Pipeline::new(halving(), 1);

    assert_eq!(pipeline.add_files([&c, &sub, &a]), 2);

    let paths: Vec<PathBuf> = pipeline.jobs().into_iter().map(|j| j.file_path).collect();
    assert_eq!(paths, vec![c, a]);
}

#[test]
fn remove_pending_job_is_immediate() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", 1);
    let b = write_file(dir.path(), "b.bin", 1);
    let pipeline = pipeline_with(&[&a, &b]);

    assert!(pipeline.remove_job(&a));
    assert!(!pipeline.remove_job(&a));

    let jobs = pipeline.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].file_path, b);
}

#[test]
fn clear_completed_without_terminal_jobs_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", 1);
    let pipeline = pipeline_with(&[&a]);

    assert_eq!(pipeline.clear_completed(), 0);
    assert_eq!(pipeline.jobs().len(), 1);
}

#[test]
fn start_outside_runtime_fails() {
    let pipeline = Pipeline::new(halving(), 1);
    assert_eq!(pipeline.start(), Err(PipelineError::NoRuntime));
    assert!(!pipeline.is_started());
}

#[test]
fn worker_count_is_at_least_one() {
    assert_eq!(Pipeline::new(halving(), 0).workers(), 1);
    assert_eq!(Pipeline::new(halving(), 8).workers(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn snapshot_is_not_affected_by_later_progress() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", 64);
    let pipeline = pipeline_with(&[&a]);

    let before = pipeline.jobs();
    pipeline.start().unwrap();
    wait_idle(&pipeline).await;

    assert_eq!(before[0].status, JobStatus::Pending);
    assert!(before[0].compressed_size.is_none());
    let after = pipeline.jobs();
    assert_eq!(after[0].status, JobStatus::Done);
    assert_eq!(after[0].compressed_size, Some(32));
    pipeline.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn start_after_shutdown_is_rejected() {
    let pipeline = Pipeline::new(halving(), 1);
    pipeline.start().unwrap();
    pipeline.shutdown().await;
    assert_eq!(pipeline.start(), Err(PipelineError::ShutDown));
}

async fn wait_idle(pipeline: &Pipeline) {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(10);
    while !pipeline.is_idle() {
        assert!(tokio::time::Instant::now() < deadline, "pipeline did not go idle");
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
}
