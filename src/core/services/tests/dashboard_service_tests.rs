use chrono::{NaiveDate, TimeZone, Utc};

use crate::core::services::{CentreSchedule, DashboardService, RecordFilter};
use crate::ledger::demo::demo_ledger;
use crate::ledger::{Ledger, LoanRecord, LoanTerms, Outcome};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

#[test]
fn overview_counts_only_payments_on_requested_date() {
    let mut ledger = demo_ledger().unwrap();
    let monday = Utc.with_ymd_and_hms(2025, 3, 3, 9, 30, 0).unwrap();
    let tuesday = Utc.with_ymd_and_hms(2025, 3, 4, 9, 30, 0).unwrap();
    ledger
        .record_collection_at("C1", 13, 200, Outcome::Paid, monday)
        .unwrap();
    ledger
        .record_collection_at("C2", 7, 200, Outcome::Paid, monday)
        .unwrap();
    ledger
        .record_collection_at("C1", 14, 200, Outcome::Paid, tuesday)
        .unwrap();

    let overview = DashboardService::overview(&ledger, &RecordFilter::any(), day(3));
    assert_eq!(overview.target, 600);
    assert_eq!(overview.collected, 400);
    let rate = overview.collection_rate.expect("target is non-zero");
    assert!((rate - 66.666).abs() < 0.01, "unexpected rate {rate}");

    let nandlal = DashboardService::overview(&ledger, &RecordFilter::any().staff("Nandlal"), day(4));
    assert_eq!(nandlal.collected, 200);
    assert_eq!(nandlal.target, 400);
}

#[test]
fn centres_report_open_and_closed_clients() {
    let mut ledger = demo_ledger().unwrap();
    ledger
        .record_collection("C2", 7, 4_800, Outcome::Paid)
        .unwrap();
    let overview = DashboardService::overview(&ledger, &RecordFilter::any(), day(1));
    assert_eq!(
        overview.centres,
        vec![
            CentreSchedule {
                centre_id: "Ashapur".into(),
                open_clients: 0,
                closed_clients: 1,
            },
            CentreSchedule {
                centre_id: "Salarpur".into(),
                open_clients: 1,
                closed_clients: 0,
            },
            CentreSchedule {
                centre_id: "Sandaha".into(),
                open_clients: 1,
                closed_clients: 0,
            },
        ]
    );
}

#[test]
fn empty_selection_has_no_rate() {
    let ledger = demo_ledger().unwrap();
    let overview =
        DashboardService::overview(&ledger, &RecordFilter::any().centre("Nowhere"), day(1));
    assert_eq!(overview.target, 0);
    assert_eq!(overview.collection_rate, None);
    assert!(overview.centres.is_empty());
}

#[test]
fn loan_closed_by_todays_payment_stays_in_target() {
    let record = LoanRecord::new("C4", "Sunita", "Dhiraj", "Ashapur", 1_000, LoanTerms::default())
        .with_opening_balance(800, 4);
    let mut ledger = Ledger::from_records("Closing", [record]).unwrap();
    let monday = Utc.with_ymd_and_hms(2025, 3, 3, 11, 0, 0).unwrap();
    ledger
        .record_collection_at("C4", 5, 200, Outcome::Paid, monday)
        .unwrap();
    assert!(ledger.get_record("C4").unwrap().is_closed());

    let overview = DashboardService::overview(&ledger, &RecordFilter::any(), day(3));
    assert_eq!(overview.target, 200);
    assert_eq!(overview.collected, 200);
    assert_eq!(overview.collection_rate, Some(100.0));

    let next_day = DashboardService::overview(&ledger, &RecordFilter::any(), day(4));
    assert_eq!(next_day.target, 0);
    assert_eq!(next_day.collection_rate, None);
}
