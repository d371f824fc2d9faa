// ============================================================================
// order_dashboard
// ============================================================================
//
// Data layer of an order-tracking dashboard:
// - domain/    - order records and invariants
// - provider/  - synthetic order generation and the publishing OrderStore
// - analytics/ - pure aggregation (time ranges, day buckets, stats)
// - dashboard  - one rendered snapshot for a time range
// - config, metrics - ambient configuration and Prometheus metrics
//
// ============================================================================

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod metrics;
pub mod provider;

pub use analytics::TimeRange;
pub use config::DashboardConfig;
pub use dashboard::DashboardSnapshot;
pub use provider::OrderStore;
