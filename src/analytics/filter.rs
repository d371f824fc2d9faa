use chrono::{DateTime, Utc};
use std::cmp::Reverse;

use crate::domain::order::Order;
use super::time_range::TimeRange;

/// Number of rows in the recent-orders table
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Orders placed within `range` of `now`, in collection order
pub fn filter_by_time_range<'a>(
    orders: &'a [Order],
    range: TimeRange,
    now: DateTime<Utc>,
) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|order| range.contains(order.order_date, now))
        .collect()
}

/// Newest orders within `range`, at most `limit` of them
pub fn recent_orders<'a>(
    orders: &'a [Order],
    range: TimeRange,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<&'a Order> {
    let mut filtered = filter_by_time_range(orders, range, now);
    filtered.sort_by_key(|order| Reverse(order.order_date));
    filtered.truncate(limit);
    filtered
}
