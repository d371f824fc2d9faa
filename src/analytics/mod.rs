// ============================================================================
// Analytics - pure aggregation over an order collection
// ============================================================================
//
// Nothing here holds state or performs I/O. Functions that depend on the
// current time take `now` as an argument.
//
// ============================================================================

pub mod time_range;
pub mod filter;
pub mod buckets;
pub mod distribution;
pub mod summary;

pub use time_range::{TimeRange, UnknownTimeRange};
pub use filter::{filter_by_time_range, recent_orders, DEFAULT_RECENT_LIMIT};
pub use buckets::{bucket_by_day, day_label, revenue_series, volume_series, BucketOrder, ChartPoint};
pub use distribution::{status_distribution, StatusShare};
pub use summary::{compute_stats, OrderStats, StatusCounts};
