mod dashboard_service_tests;
mod summary_service_tests;
