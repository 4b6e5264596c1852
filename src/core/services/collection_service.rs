//! Commands that record field collections against the ledger.

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::ledger::{CollectionEvent, Ledger, Outcome};

/// A single collection command as issued by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRequest {
    pub client_id: String,
    pub day_index: u32,
    pub amount: u64,
    pub outcome: Outcome,
}

impl CollectionRequest {
    pub fn paid(client_id: impl Into<String>, day_index: u32, amount: u64) -> Self {
        Self {
            client_id: client_id.into(),
            day_index,
            amount,
            outcome: Outcome::Paid,
        }
    }

    pub fn missed(client_id: impl Into<String>, day_index: u32) -> Self {
        Self {
            client_id: client_id.into(),
            day_index,
            amount: 0,
            outcome: Outcome::Missed,
        }
    }
}

pub struct CollectionService;

impl CollectionService {
    /// Applies `request` and returns the appended event.
    pub fn record(ledger: &mut Ledger, request: &CollectionRequest) -> Result<CollectionEvent> {
        let outcome = ledger.record_collection(
            &request.client_id,
            request.day_index,
            request.amount,
            request.outcome,
        );
        match outcome {
            Ok(event) => {
                tracing::info!(
                    client_id = %event.client_id,
                    day_index = event.day_index,
                    amount = event.amount,
                    outcome = ?event.outcome,
                    "collection recorded"
                );
                Ok(event.clone())
            }
            Err(err) => {
                tracing::warn!(client_id = %request.client_id, day_index = request.day_index, %err, "collection rejected");
                Err(err)
            }
        }
    }

    /// Records the expected daily amount against the client's next day.
    pub fn collect_expected(ledger: &mut Ledger, client_id: &str) -> Result<CollectionEvent> {
        let request = Self::expected_request(ledger, client_id)?;
        Self::record(ledger, &request)
    }

    /// Records a missed visit against the client's next day.
    pub fn mark_missed(ledger: &mut Ledger, client_id: &str) -> Result<CollectionEvent> {
        let request = Self::missed_request(ledger, client_id)?;
        Self::record(ledger, &request)
    }

    pub fn expected_request(ledger: &Ledger, client_id: &str) -> Result<CollectionRequest> {
        let record = ledger
            .get_record(client_id)
            .map_err(|_| LedgerError::UnknownClient(client_id.to_string()))?;
        Ok(CollectionRequest::paid(
            client_id,
            record.next_day(),
            record.expected_amount_due(),
        ))
    }

    pub fn missed_request(ledger: &Ledger, client_id: &str) -> Result<CollectionRequest> {
        let record = ledger
            .get_record(client_id)
            .map_err(|_| LedgerError::UnknownClient(client_id.to_string()))?;
        Ok(CollectionRequest::missed(client_id, record.next_day()))
    }
}
