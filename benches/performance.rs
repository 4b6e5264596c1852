use collection_core::core::services::{FilterService, GroupBy, RecordFilter, SummaryService};
use collection_core::ledger::{Ledger, LoanRecord, LoanTerms, Outcome};
use collection_core::storage::json_backend::{load_ledger_from_path, save_ledger_to_path};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

fn build_sample_ledger(client_count: usize) -> Ledger {
    let mut ledger = Ledger::new("Benchmark");
    let terms = LoanTerms::default();
    for idx in 0..client_count {
        let record = LoanRecord::new(
            format!("C{idx}"),
            format!("Client {idx}"),
            format!("Staff {}", idx % 12),
            format!("Centre {}", idx % 40),
            6_000 + (idx % 3) as u64 * 3_000,
            terms,
        );
        if ledger.onboard(record).is_err() {
            continue;
        }
        for day in 1..=(idx % 20) as u32 {
            let _ = ledger.record_collection(&format!("C{idx}"), day, 200, Outcome::Paid);
        }
    }
    ledger
}

fn bench_queries(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let filter = RecordFilter::any().staff("Staff 3").min_day(5);

    c.bench_function("filter_10k", |b| {
        b.iter(|| FilterService::filter(ledger.records(), black_box(&filter)).len())
    });

    c.bench_function("summarize_by_centre_10k", |b| {
        b.iter(|| SummaryService::summarize(ledger.records(), black_box(GroupBy::Centre)))
    });
}

fn bench_ledger_io(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("ledger.json");

    c.bench_function("ledger_save_10k", |b| {
        b.iter(|| save_ledger_to_path(&ledger, &file_path).expect("save ledger"))
    });

    save_ledger_to_path(&ledger, &file_path).expect("seed ledger file");
    c.bench_function("ledger_load_10k", |b| {
        b.iter(|| load_ledger_from_path(&file_path).expect("load ledger"))
    });
}

criterion_group!(benches, bench_queries, bench_ledger_io);
criterion_main!(benches);
