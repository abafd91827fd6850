#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use splitbill::{
    core::{BillSession, FixedClock},
    storage::{JsonStore, MemoryStore},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn fixed_clock() -> Box<FixedClock> {
    Box::new(FixedClock(
        Utc.with_ymd_and_hms(2025, 3, 14, 19, 30, 0).unwrap(),
    ))
}

/// Session persisted to `state.json` under `base`.
pub fn json_session(base: &Path) -> BillSession {
    let store = JsonStore::new(Some(base.to_path_buf())).expect("create json store");
    BillSession::open(Arc::new(store), fixed_clock())
}

/// Session over an in-memory store, returned with the store for inspection.
pub fn memory_session() -> (BillSession, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (BillSession::open(store.clone(), fixed_clock()), store)
}
