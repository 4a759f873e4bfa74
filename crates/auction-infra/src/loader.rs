//! Parallel multi-file loading
//!
//! One worker pool, one task per file, joined after all workers finish.
//! Workers share nothing but the work index and the result collector; each
//! task owns its file handle and its parsed rows exclusively.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use auction_domain::model::Auction;

use crate::csv_loader::{load_auctions, CsvLoadError};

/// Outcome of loading one file
#[derive(Debug)]
pub struct FileLoadResult {
    pub path: PathBuf,
    pub result: Result<Vec<Auction>, CsvLoadError>,
}

/// Load every file with up to `jobs` worker threads.
///
/// Returns one entry per input file in completion order; no ordering is
/// guaranteed between files, but each file's auctions keep their row order.
/// Per-file failures are returned, not raised, so the caller decides
/// whether to skip or abort.
pub fn load_files(paths: &[PathBuf], jobs: usize) -> Vec<FileLoadResult> {
    if paths.is_empty() {
        return Vec::new();
    }

    let jobs = jobs.clamp(1, paths.len());
    let paths = Arc::new(paths.to_vec());
    let next_index = Arc::new(AtomicUsize::new(0));
    let results: Arc<Mutex<Vec<FileLoadResult>>> = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for _ in 0..jobs {
        let paths = Arc::clone(&paths);
        let next_index = Arc::clone(&next_index);
        let results = Arc::clone(&results);

        handles.push(thread::spawn(move || loop {
            // Claim the next file (lock-free)
            let idx = next_index.fetch_add(1, Ordering::SeqCst);
            if idx >= paths.len() {
                break;
            }

            let path = paths[idx].clone();
            let result = load_auctions(&path);

            let mut guard = results.lock().unwrap();
            guard.push(FileLoadResult { path, result });
        }));
    }

    for handle in handles {
        let _ = handle.join();
    }

    let mut guard = results.lock().unwrap();
    std::mem::take(&mut *guard)
}
