//! Side-effect-free selection over a snapshot of loan records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ledger::LoanRecord;

/// Predicate fields for [`FilterService::filter`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centre_id: Option<String>,
    /// Inclusive lower bound on `last_day_paid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_day: Option<u32>,
    /// Inclusive upper bound on `last_day_paid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_day: Option<u32>,
}

impl RecordFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn staff(mut self, staff_id: impl Into<String>) -> Self {
        self.staff_id = Some(staff_id.into());
        self
    }

    pub fn centre(mut self, centre_id: impl Into<String>) -> Self {
        self.centre_id = Some(centre_id.into());
        self
    }

    pub fn min_day(mut self, day: u32) -> Self {
        self.min_day = Some(day);
        self
    }

    pub fn max_day(mut self, day: u32) -> Self {
        self.max_day = Some(day);
        self
    }

    pub fn matches(&self, record: &LoanRecord) -> bool {
        let day = record.last_day_paid();
        self.staff_id
            .as_deref()
            .map_or(true, |staff| record.staff_id == staff)
            && self
                .centre_id
                .as_deref()
                .map_or(true, |centre| record.centre_id == centre)
            && self.min_day.map_or(true, |min| day >= min)
            && self.max_day.map_or(true, |max| day <= max)
    }
}

pub struct FilterService;

impl FilterService {
    /// Returns the matching records in their original order; no match yields an empty vector.
    pub fn filter<'a, I>(records: I, filter: &RecordFilter) -> Vec<&'a LoanRecord>
    where
        I: IntoIterator<Item = &'a LoanRecord>,
    {
        let selected: Vec<&LoanRecord> = records
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        tracing::debug!(matched = selected.len(), ?filter, "filtered loan records");
        selected
    }

    /// Staff identifiers present in the snapshot, sorted and deduplicated.
    pub fn distinct_staff<'a, I>(records: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a LoanRecord>,
    {
        records
            .into_iter()
            .map(|record| record.staff_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Centres served by `staff_id`, sorted and deduplicated.
    pub fn centres_for_staff<'a, I>(records: I, staff_id: &str) -> Vec<String>
    where
        I: IntoIterator<Item = &'a LoanRecord>,
    {
        records
            .into_iter()
            .filter(|record| record.staff_id == staff_id)
            .map(|record| record.centre_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
