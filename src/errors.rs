use thiserror::Error;

/// Error type that captures ledger validation and persistence failures.
///
/// Every variant renders a message suitable for showing to a field officer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown client `{0}`")]
    UnknownClient(String),
    #[error("loan for client `{0}` is already fully repaid")]
    LoanClosed(String),
    #[error("amount {amount} exceeds the remaining balance {balance} for client `{client_id}`")]
    AmountExceedsBalance {
        client_id: String,
        amount: u64,
        balance: u64,
    },
    #[error("client `{client_id}` already has a collection recorded for day {day_index}")]
    DuplicateCollection { client_id: String, day_index: u32 },
    #[error("day {day_index} is outside the 1..={term} repayment term of client `{client_id}`")]
    DayOutOfRange {
        client_id: String,
        day_index: u32,
        term: u32,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("client `{0}` is already on the ledger")]
    DuplicateClient(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::StorageError(err.to_string())
    }
}
