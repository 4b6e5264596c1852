pub mod json_backend;

use std::path::PathBuf;

use crate::{errors::LedgerError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over persistence backends capable of storing ledgers and their backups.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn exists(&self, name: &str) -> bool;
    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger>;
}

pub use json_backend::JsonStorage;
