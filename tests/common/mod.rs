#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use collection_core::{
    config::ConfigManager,
    core::LedgerManager,
    ledger::demo::demo_ledger,
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_root() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn storage_in(base: &Path) -> Box<JsonStorage> {
    Box::new(JsonStorage::new(Some(base.to_path_buf()), Some(3)).expect("create json storage backend"))
}

/// Creates an isolated manager seeded with the demo ledger, plus a config manager.
pub fn setup_test_env() -> (LedgerManager, ConfigManager, PathBuf) {
    let base = temp_root();
    let ledger_manager = LedgerManager::open_or_init(storage_in(&base), "field", demo_ledger)
        .expect("seed demo ledger");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (ledger_manager, config_manager, base)
}
