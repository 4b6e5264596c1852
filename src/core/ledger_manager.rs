use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::core::services::{CollectionRequest, CollectionService};
use crate::errors::{LedgerError, Result};
use crate::ledger::{CollectionEvent, Ledger, LoanRecord, Outcome};
use crate::storage::StorageBackend;

/// Owns the active ledger for every session sharing it and keeps it on disk.
///
/// Mutations run against a working copy under a single lock; the copy is
/// persisted and only then becomes the current ledger, so a rejected command or
/// a failed write leaves both memory and disk as they were.
pub struct LedgerManager {
    name: String,
    ledger: Mutex<Ledger>,
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    /// Wraps an in-memory ledger; nothing is written until the first mutation or [`save`](Self::save).
    pub fn new(storage: Box<dyn StorageBackend>, name: impl Into<String>, ledger: Ledger) -> Self {
        Self {
            name: name.into(),
            ledger: Mutex::new(ledger),
            storage,
        }
    }

    pub fn open(storage: Box<dyn StorageBackend>, name: &str) -> Result<Self> {
        let ledger = storage.load(name)?;
        let warnings = report_drift(name, &ledger);
        tracing::info!(
            ledger = %name,
            records = ledger.record_count(),
            events = ledger.events().len(),
            warnings,
            "ledger opened"
        );
        Ok(Self::new(storage, name, ledger))
    }

    /// Opens `name`, or seeds and saves a new ledger when none exists yet.
    pub fn open_or_init<F>(storage: Box<dyn StorageBackend>, name: &str, seed: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Ledger>,
    {
        if storage.exists(name) {
            return Self::open(storage, name);
        }
        let manager = Self::new(storage, name, seed()?);
        manager.save()?;
        Ok(manager)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_ledger<R, F>(&self, read: F) -> Result<R>
    where
        F: FnOnce(&Ledger) -> R,
    {
        let guard = self.lock()?;
        Ok(read(&guard))
    }

    pub fn snapshot(&self) -> Result<Ledger> {
        self.with_ledger(Ledger::clone)
    }

    pub fn get_record(&self, client_id: &str) -> Result<LoanRecord> {
        self.with_ledger(|ledger| ledger.get_record(client_id).cloned())?
    }

    pub fn record_collection(
        &self,
        client_id: &str,
        day_index: u32,
        amount: u64,
        outcome: Outcome,
    ) -> Result<CollectionEvent> {
        let request = CollectionRequest {
            client_id: client_id.to_string(),
            day_index,
            amount,
            outcome,
        };
        self.commit(|ledger| CollectionService::record(ledger, &request))
    }

    pub fn collect_expected(&self, client_id: &str) -> Result<CollectionEvent> {
        self.commit(|ledger| CollectionService::collect_expected(ledger, client_id))
    }

    pub fn mark_missed(&self, client_id: &str) -> Result<CollectionEvent> {
        self.commit(|ledger| CollectionService::mark_missed(ledger, client_id))
    }

    pub fn onboard(&self, record: LoanRecord) -> Result<()> {
        let client_id = record.client_id.clone();
        self.commit(|ledger| ledger.onboard(record))?;
        tracing::info!(ledger = %self.name, %client_id, "client onboarded");
        Ok(())
    }

    pub fn save(&self) -> Result<PathBuf> {
        let guard = self.lock()?;
        self.storage.save(&guard, &self.name)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        let guard = self.lock()?;
        self.storage.backup(&guard, &self.name, note)
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        self.storage.list_backups(&self.name)
    }

    /// Replaces the current ledger with one of [`list_backups`](Self::list_backups).
    /// Returns the number of `verify` warnings found in the restored ledger.
    pub fn restore(&self, backup_name: &str) -> Result<usize> {
        let mut guard = self.lock()?;
        let restored = self.storage.restore(&self.name, backup_name)?;
        let warnings = report_drift(&self.name, &restored);
        *guard = restored;
        tracing::info!(ledger = %self.name, backup = %backup_name, warnings, "ledger restored");
        Ok(warnings)
    }

    fn commit<R, F>(&self, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut Ledger) -> Result<R>,
    {
        let mut guard = self.lock()?;
        let mut working = guard.clone();
        let output = mutate(&mut working)?;
        self.storage.save(&working, &self.name)?;
        *guard = working;
        Ok(output)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| LedgerError::StorageError("ledger lock poisoned".into()))
    }
}

fn report_drift(name: &str, ledger: &Ledger) -> usize {
    let warnings = ledger.verify();
    for warning in &warnings {
        tracing::warn!(ledger = %name, "{warning}");
    }
    warnings.len()
}
