//! Fake compressors with controllable timing and bookkeeping.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use shrink_core::compress::{CompressError, Compressor};

fn source_len(path: &Path) -> Result<u64, CompressError> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| CompressError::other(e.to_string()))
}

/// Halves the source size after `delay`, recording which paths are in flight.
///
/// `overlap` is set if the same path is ever compressed by two callers at once.
#[derive(Default)]
pub struct Halving {
    pub delay: Duration,
    active: Mutex<HashSet<PathBuf>>,
    calls: Mutex<HashMap<PathBuf, usize>>,
    order: Mutex<Vec<PathBuf>>,
    pub overlap: AtomicBool,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl Halving {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn calls_for(&self, path: &Path) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Paths in the order their compression started.
    pub fn order(&self) -> Vec<PathBuf> {
        self.order.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl Compressor for Halving {
    fn compress(&self, path: &Path) -> Result<u64, CompressError> {
        if !self.active.lock().unwrap().insert(path.to_path_buf()) {
            self.overlap.store(true, Ordering::SeqCst);
        }
        *self.calls.lock().unwrap().entry(path.to_path_buf()).or_default() += 1;
        self.order.lock().unwrap().push(path.to_path_buf());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        std::thread::sleep(self.delay);
        let result = source_len(path).map(|len| len / 2);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.active.lock().unwrap().remove(path);
        result
    }
}

/// Blocks every call until `open` is called; `entered` counts calls that started.
/// Paths whose file name contains "fail" return an error, "panic" panics.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
    pub entered: AtomicUsize,
}

impl Gate {
    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.cv.notify_all();
    }

    pub fn close(&self) {
        *self.open.lock().unwrap() = false;
    }

    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }
}

impl Compressor for Gate {
    fn compress(&self, path: &Path) -> Result<u64, CompressError> {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.cv.wait(open).unwrap();
        }
        drop(open);

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if name.contains("panic") {
            panic!("compressor blew up on {}", name);
        }
        if name.contains("fail") {
            return Err(CompressError::other(format!("cannot compress {}", name)));
        }
        source_len(path).map(|len| len / 2)
    }
}
