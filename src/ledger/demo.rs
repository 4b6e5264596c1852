//! Small ledger mirroring the mock collection sheet used for demos and tests.

use super::{LoanRecord, LoanTerms, Ledger};
use crate::errors::Result;

pub fn demo_records() -> Vec<LoanRecord> {
    let terms = LoanTerms::default();
    vec![
        LoanRecord::new("C1", "Kiran", "Nandlal", "Salarpur", 12_000, terms)
            .with_opening_balance(2_400, 12),
        LoanRecord::new("C2", "Basanti", "Dhiraj", "Ashapur", 6_000, terms)
            .with_opening_balance(1_200, 6),
        LoanRecord::new("C3", "Meena", "Nandlal", "Sandaha", 12_000, terms),
    ]
}

pub fn demo_ledger() -> Result<Ledger> {
    Ledger::from_records("Demo", demo_records())
}
