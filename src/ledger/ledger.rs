use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};

use super::{
    event::{CollectionEvent, Outcome},
    loan::LoanRecord,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Canonical store of loan records and their append-only collection log.
///
/// All mutation goes through [`Ledger::onboard`] and [`Ledger::record_collection`];
/// a rejected call leaves the ledger untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    records: Vec<LoanRecord>,
    #[serde(default)]
    events: Vec<CollectionEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            records: Vec::new(),
            events: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Builds a ledger from ingested records, rejecting the batch on the first bad row.
    pub fn from_records<I>(name: impl Into<String>, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = LoanRecord>,
    {
        let mut ledger = Self::new(name);
        for record in records {
            ledger.onboard(record)?;
        }
        Ok(ledger)
    }

    /// Adds a new client. The record must carry no history beyond its opening balance.
    pub fn onboard(&mut self, record: LoanRecord) -> Result<()> {
        record.validate()?;
        if record.total_paid() != record.opening_paid || record.last_day_paid() != record.opening_day {
            return Err(LedgerError::InvalidRecord(format!(
                "client `{}` shows {} paid up to day {} but opened at {} on day {}",
                record.client_id,
                record.total_paid(),
                record.last_day_paid(),
                record.opening_paid,
                record.opening_day
            )));
        }
        if self.find(&record.client_id).is_some() {
            return Err(LedgerError::DuplicateClient(record.client_id));
        }
        self.records.push(record);
        self.touch();
        Ok(())
    }

    pub fn record_collection(
        &mut self,
        client_id: &str,
        day_index: u32,
        amount: u64,
        outcome: Outcome,
    ) -> Result<&CollectionEvent> {
        self.record_collection_at(client_id, day_index, amount, outcome, Utc::now())
    }

    pub fn record_collection_at(
        &mut self,
        client_id: &str,
        day_index: u32,
        amount: u64,
        outcome: Outcome,
        recorded_at: DateTime<Utc>,
    ) -> Result<&CollectionEvent> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.client_id == client_id)
            .ok_or_else(|| LedgerError::UnknownClient(client_id.to_string()))?;

        if record.is_closed() {
            return Err(LedgerError::LoanClosed(client_id.to_string()));
        }
        if day_index == 0 || day_index > record.loan_term_days {
            return Err(LedgerError::DayOutOfRange {
                client_id: client_id.to_string(),
                day_index,
                term: record.loan_term_days,
            });
        }
        // Earlier days count as already recorded; the log is never edited retroactively.
        if day_index <= record.last_day_paid() {
            return Err(LedgerError::DuplicateCollection {
                client_id: client_id.to_string(),
                day_index,
            });
        }
        if outcome == Outcome::Missed && amount != 0 {
            return Err(LedgerError::InvalidAmount(format!(
                "a missed collection cannot carry an amount ({amount})"
            )));
        }
        if amount > record.balance() {
            return Err(LedgerError::AmountExceedsBalance {
                client_id: client_id.to_string(),
                amount,
                balance: record.balance(),
            });
        }

        let event = CollectionEvent::new(client_id, day_index, amount, outcome, recorded_at);
        record.apply(&event);
        self.events.push(event);
        self.touch();
        Ok(&self.events[self.events.len() - 1])
    }

    pub fn get_record(&self, client_id: &str) -> Result<&LoanRecord> {
        self.find(client_id)
            .ok_or_else(|| LedgerError::NotFound(format!("client `{client_id}`")))
    }

    /// Iterates records in onboarding order. The iterator is `Clone`, so it can be restarted.
    pub fn records(&self) -> std::slice::Iter<'_, LoanRecord> {
        self.records.iter()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn events(&self) -> &[CollectionEvent] {
        &self.events
    }

    pub fn events_for<'a>(
        &'a self,
        client_id: &'a str,
    ) -> impl Iterator<Item = &'a CollectionEvent> + 'a {
        self.events
            .iter()
            .filter(move |event| event.client_id == client_id)
    }

    /// Replays the collection log over every record's opening balance and reports drift.
    pub fn verify(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut replayed: BTreeMap<&str, LoanRecord> = BTreeMap::new();

        for record in &self.records {
            if let Err(err) = record.validate() {
                warnings.push(err.to_string());
            }
            if replayed
                .insert(record.client_id.as_str(), record.rewound())
                .is_some()
            {
                warnings.push(format!("client {} appears more than once", record.client_id));
            }
        }

        for event in &self.events {
            let Some(record) = replayed.get_mut(event.client_id.as_str()) else {
                warnings.push(format!(
                    "event {} references unknown client {}",
                    event.id, event.client_id
                ));
                continue;
            };
            if event.outcome == Outcome::Missed && event.amount != 0 {
                warnings.push(format!("missed event {} carries amount {}", event.id, event.amount));
            }
            if event.day_index <= record.last_day_paid() {
                warnings.push(format!(
                    "event {} for client {} repeats day {}",
                    event.id, event.client_id, event.day_index
                ));
            }
            record.apply(event);
        }

        for record in &self.records {
            let Some(expected) = replayed.get(record.client_id.as_str()) else {
                continue;
            };
            if expected.total_paid() != record.total_paid() {
                warnings.push(format!(
                    "client {} shows {} paid but the log sums to {}",
                    record.client_id,
                    record.total_paid(),
                    expected.total_paid()
                ));
            }
            if expected.last_day_paid() != record.last_day_paid() {
                warnings.push(format!(
                    "client {} is on day {} but the log ends on day {}",
                    record.client_id,
                    record.last_day_paid(),
                    expected.last_day_paid()
                ));
            }
        }
        warnings
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn find(&self, client_id: &str) -> Option<&LoanRecord> {
        self.records
            .iter()
            .find(|record| record.client_id == client_id)
    }
}
