#![doc(test(attr(deny(warnings))))]

//! Collection Core tracks microfinance loan repayments collected in the field:
//! the ledger of loans and collection events, record filtering, and per-centre
//! and per-staff rollups.

pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Collection Core tracing initialized.");
    });
}
