use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;

use super::filter_service::{FilterService, RecordFilter};

/// Per-centre visit sheet entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentreSchedule {
    pub centre_id: String,
    pub open_clients: usize,
    pub closed_clients: usize,
}

/// Field officer's view of the day: what should come in and what already has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub date: NaiveDate,
    pub target: u64,
    pub collected: u64,
    /// Percentage of `target` collected; `None` when nothing is due.
    pub collection_rate: Option<f64>,
    pub centres: Vec<CentreSchedule>,
}

pub struct DashboardService;

impl DashboardService {
    pub fn overview(ledger: &Ledger, filter: &RecordFilter, on: NaiveDate) -> DashboardOverview {
        let selected = FilterService::filter(ledger.records(), filter);

        let clients: HashSet<&str> = selected
            .iter()
            .map(|record| record.client_id.as_str())
            .collect();
        let mut collected = 0u64;
        let mut paid_since: HashMap<&str, u64> = HashMap::new();
        for event in ledger.events() {
            let day = event.recorded_at.date_naive();
            if !event.is_paid() || day < on || !clients.contains(event.client_id.as_str()) {
                continue;
            }
            if day == on {
                collected = collected.saturating_add(event.amount);
            }
            let paid = paid_since.entry(event.client_id.as_str()).or_default();
            *paid = paid.saturating_add(event.amount);
        }

        // Due amounts as they stood when `on` began, so loans closed today still count.
        let target = selected
            .iter()
            .map(|record| {
                let since = paid_since.get(record.client_id.as_str()).copied().unwrap_or(0);
                let balance = record
                    .loan_amount
                    .saturating_sub(record.total_paid().saturating_sub(since));
                record.expected_daily_amount.min(balance)
            })
            .fold(0u64, u64::saturating_add);

        let mut by_centre: BTreeMap<&str, CentreSchedule> = BTreeMap::new();
        for record in &selected {
            let entry = by_centre
                .entry(record.centre_id.as_str())
                .or_insert_with(|| CentreSchedule {
                    centre_id: record.centre_id.clone(),
                    open_clients: 0,
                    closed_clients: 0,
                });
            if record.is_closed() {
                entry.closed_clients += 1;
            } else {
                entry.open_clients += 1;
            }
        }

        let collection_rate = if target == 0 {
            None
        } else {
            Some(collected as f64 / target as f64 * 100.0)
        };

        DashboardOverview {
            date: on,
            target,
            collected,
            collection_rate,
            centres: by_centre.into_values().collect(),
        }
    }
}
