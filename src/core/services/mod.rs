pub mod collection_service;
pub mod dashboard_service;
pub mod filter_service;
pub mod summary_service;

pub use collection_service::{CollectionRequest, CollectionService};
pub use dashboard_service::{CentreSchedule, DashboardOverview, DashboardService};
pub use filter_service::{FilterService, RecordFilter};
pub use summary_service::{GroupBy, GroupSummary, SummaryService};

#[cfg(test)]
mod tests;
