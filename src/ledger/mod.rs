//! Loan records, collection events, and the ledger that owns them.

pub mod demo;
pub mod event;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod loan;

pub use event::{CollectionEvent, Outcome};
pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
pub use loan::{LoanRecord, LoanTerms};
