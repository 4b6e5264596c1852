use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::LoanRecord;

/// Dimension used to bucket records in [`SummaryService::summarize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    Staff,
    Centre,
}

impl GroupBy {
    fn key<'a>(&self, record: &'a LoanRecord) -> &'a str {
        match self {
            GroupBy::Staff => &record.staff_id,
            GroupBy::Centre => &record.centre_id,
        }
    }
}

/// Rollup of disbursed, collected, and outstanding amounts for a group of loans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub total_disbursed: u64,
    pub total_due: u64,
    pub total_collected: u64,
    pub client_count: usize,
}

impl GroupSummary {
    fn add(&mut self, record: &LoanRecord) {
        self.total_disbursed += record.loan_amount;
        self.total_collected += record.total_paid();
        self.total_due += record.balance();
        self.client_count += 1;
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Groups records by staff or centre; keys come back in ascending order.
    pub fn summarize<'a, I>(records: I, group_by: GroupBy) -> BTreeMap<String, GroupSummary>
    where
        I: IntoIterator<Item = &'a LoanRecord>,
    {
        let mut groups: BTreeMap<String, GroupSummary> = BTreeMap::new();
        for record in records {
            let key = group_by.key(record);
            match groups.get_mut(key) {
                Some(summary) => summary.add(record),
                None => {
                    let mut summary = GroupSummary::default();
                    summary.add(record);
                    groups.insert(key.to_string(), summary);
                }
            }
        }
        tracing::debug!(groups = groups.len(), ?group_by, "summarized loan records");
        groups
    }

    /// Single rollup over every record in the snapshot.
    pub fn totals<'a, I>(records: I) -> GroupSummary
    where
        I: IntoIterator<Item = &'a LoanRecord>,
    {
        records
            .into_iter()
            .fold(GroupSummary::default(), |mut summary, record| {
                summary.add(record);
                summary
            })
    }
}
