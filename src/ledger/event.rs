use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of a collector's visit for one repayment period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Outcome {
    Paid,
    Missed,
}

/// Immutable fact appended to the ledger for every accepted collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionEvent {
    pub id: Uuid,
    pub client_id: String,
    pub day_index: u32,
    pub amount: u64,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

impl CollectionEvent {
    pub(crate) fn new(
        client_id: impl Into<String>,
        day_index: u32,
        amount: u64,
        outcome: Outcome,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id: client_id.into(),
            day_index,
            amount,
            outcome,
            recorded_at,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.outcome == Outcome::Paid
    }
}
