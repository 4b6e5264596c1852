use crate::core::services::{GroupBy, GroupSummary, SummaryService};
use crate::ledger::demo::demo_ledger;
use crate::ledger::{LoanRecord, Outcome};

#[test]
fn centre_summary_has_one_group_per_centre() {
    let ledger = demo_ledger().unwrap();
    let summary = SummaryService::summarize(ledger.records(), GroupBy::Centre);

    let keys: Vec<&str> = summary.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Ashapur", "Salarpur", "Sandaha"]);
    assert_eq!(summary["Salarpur"].total_disbursed, 12_000);
    assert_eq!(summary["Ashapur"].total_disbursed, 6_000);
    assert_eq!(summary["Sandaha"].total_disbursed, 12_000);
    assert!(summary.values().all(|group| group.client_count == 1));
}

#[test]
fn disbursed_total_matches_record_sum() {
    let ledger = demo_ledger().unwrap();
    let summary = SummaryService::summarize(ledger.records(), GroupBy::Centre);
    let grouped: u64 = summary.values().map(|g| g.total_disbursed).sum();
    let direct: u64 = ledger.records().map(|r| r.loan_amount).sum();
    assert_eq!(grouped, direct);
}

#[test]
fn staff_summary_tracks_collections() {
    let mut ledger = demo_ledger().unwrap();
    ledger.record_collection("C3", 1, 200, Outcome::Paid).unwrap();
    let summary = SummaryService::summarize(ledger.records(), GroupBy::Staff);

    assert_eq!(
        summary["Nandlal"],
        GroupSummary {
            total_disbursed: 24_000,
            total_due: 24_000 - 2_600,
            total_collected: 2_600,
            client_count: 2,
        }
    );
    assert_eq!(summary["Dhiraj"].total_due, 4_800);
}

#[test]
fn empty_input_yields_empty_mapping() {
    let records: Vec<LoanRecord> = Vec::new();
    assert!(SummaryService::summarize(&records, GroupBy::Centre).is_empty());
    assert_eq!(SummaryService::totals(&records), GroupSummary::default());
}

#[test]
fn totals_cover_whole_snapshot() {
    let ledger = demo_ledger().unwrap();
    let totals = SummaryService::totals(ledger.records());
    assert_eq!(totals.total_disbursed, 30_000);
    assert_eq!(totals.total_collected, 3_600);
    assert_eq!(totals.total_due, 26_400);
    assert_eq!(totals.client_count, 3);
}
