mod common;

use collection_core::config::Config;
use collection_core::core::services::{DashboardService, RecordFilter};
use collection_core::core::LedgerManager;
use collection_core::errors::LedgerError;
use collection_core::ledger::Outcome;
use collection_core::storage::{JsonStorage, StorageBackend};

#[test]
fn collections_survive_reopen() {
    let (manager, _config, base) = common::setup_test_env();
    manager.collect_expected("C1").unwrap();
    manager.mark_missed("C2").unwrap();
    manager
        .record_collection("C3", 1, 500, Outcome::Paid)
        .unwrap();

    let reopened = LedgerManager::open(common::storage_in(&base), "field").unwrap();
    let ledger = reopened.snapshot().unwrap();
    assert_eq!(ledger.events().len(), 3);
    assert_eq!(ledger.get_record("C1").unwrap().total_paid(), 2_600);
    assert_eq!(ledger.get_record("C2").unwrap().last_day_paid(), 7);
    assert_eq!(ledger.get_record("C3").unwrap().total_paid(), 500);
    assert!(ledger.verify().is_empty());
}

#[test]
fn rejected_collection_is_not_written() {
    let (manager, _config, base) = common::setup_test_env();
    let err = manager
        .record_collection("C2", 6, 200, Outcome::Paid)
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateCollection { .. }));

    let stored = JsonStorage::new(Some(base), Some(3))
        .unwrap()
        .load("field")
        .unwrap();
    assert!(stored.events().is_empty());
}

#[test]
fn config_points_storage_at_custom_root() {
    let (_manager, config_manager, base) = common::setup_test_env();
    let config = Config {
        data_root: Some(base.join("elsewhere")),
        backup_retention: 2,
        ..Config::default()
    };
    config_manager.save(&config).unwrap();

    let loaded = config_manager.load().unwrap();
    let storage = loaded.open_storage().unwrap();
    assert_eq!(storage.base_dir(), base.join("elsewhere").as_path());

    let manager = LedgerManager::open_or_init(
        Box::new(storage),
        "field",
        collection_core::ledger::demo::demo_ledger,
    )
    .unwrap();
    manager.collect_expected("C3").unwrap();
    let today = chrono::Utc::now().date_naive();
    let overview = manager
        .with_ledger(|ledger| DashboardService::overview(ledger, &RecordFilter::any(), today))
        .unwrap();
    assert_eq!(loaded.format_amount(overview.collected), "₹200");
}
