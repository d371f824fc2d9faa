use chrono::{FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::domain::order::Order;

// ============================================================================
// Day Buckets - time series for the revenue and volume charts
// ============================================================================
//
// Orders are grouped by calendar day in a fixed UTC offset. Buckets are keyed
// by the full date, so two days sharing a "Mon DD" label in different years
// stay separate.
//
// ============================================================================

/// One day of a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
    pub date: NaiveDate,
}

/// Output order of the day buckets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketOrder {
    /// Sorted by calendar day
    #[default]
    Chronological,
    /// Order in which each day first appears in the input
    FirstSeen,
}

/// Chart label for a day, e.g. "Jan 01"
pub fn day_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

pub fn bucket_by_day<'a, I, F>(
    orders: I,
    offset: FixedOffset,
    ordering: BucketOrder,
    value_fn: F,
) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = &'a Order>,
    F: Fn(&Order) -> Decimal,
{
    let mut points: Vec<ChartPoint> = Vec::new();
    let mut positions: HashMap<NaiveDate, usize> = HashMap::new();

    for order in orders {
        let date = order.order_date.with_timezone(&offset).date_naive();
        let value = value_fn(order);

        match positions.entry(date) {
            Entry::Occupied(slot) => points[*slot.get()].value += value,
            Entry::Vacant(slot) => {
                slot.insert(points.len());
                points.push(ChartPoint {
                    label: day_label(date),
                    value,
                    date,
                });
            }
        }
    }

    if ordering == BucketOrder::Chronological {
        points.sort_by_key(|point| point.date);
    }

    points
}

/// Revenue per day
pub fn revenue_series<'a, I>(orders: I, offset: FixedOffset, ordering: BucketOrder) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = &'a Order>,
{
    bucket_by_day(orders, offset, ordering, |order| order.total_amount)
}

/// Order count per day
pub fn volume_series<'a, I>(orders: I, offset: FixedOffset, ordering: BucketOrder) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = &'a Order>,
{
    bucket_by_day(orders, offset, ordering, |_| Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::order_at;
    use crate::domain::order::OrderStatus;
    use chrono::{Datelike, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn labels_and_values(points: &[ChartPoint]) -> Vec<(String, Decimal)> {
        points.iter().map(|p| (p.label.clone(), p.value)).collect()
    }

    #[test]
    fn test_revenue_sums_per_day() {
        let orders = vec![
            order_at("ORD-000001", Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(), OrderStatus::Pending, dec!(10)),
            order_at("ORD-000002", Utc.with_ymd_and_hms(2026, 1, 1, 17, 30, 0).unwrap(), OrderStatus::Shipped, dec!(5)),
            order_at("ORD-000003", Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap(), OrderStatus::Delivered, dec!(7)),
        ];

        let points = revenue_series(&orders, utc(), BucketOrder::Chronological);
        assert_eq!(
            labels_and_values(&points),
            vec![("Jan 01".to_string(), dec!(15)), ("Jan 02".to_string(), dec!(7))]
        );
    }

    #[test]
    fn test_volume_counts_orders() {
        let orders = vec![
            order_at("ORD-000001", Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(), OrderStatus::Pending, dec!(10)),
            order_at("ORD-000002", Utc.with_ymd_and_hms(2026, 1, 1, 17, 30, 0).unwrap(), OrderStatus::Pending, dec!(5)),
            order_at("ORD-000003", Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap(), OrderStatus::Pending, dec!(7)),
        ];

        let points = volume_series(&orders, utc(), BucketOrder::Chronological);
        assert_eq!(
            labels_and_values(&points),
            vec![("Jan 01".to_string(), dec!(2)), ("Jan 02".to_string(), dec!(1))]
        );
    }

    #[test]
    fn test_first_seen_order_is_preserved_on_request() {
        let orders = vec![
            order_at("ORD-000001", Utc.with_ymd_and_hms(2026, 1, 3, 9, 0, 0).unwrap(), OrderStatus::Pending, dec!(1)),
            order_at("ORD-000002", Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(), OrderStatus::Pending, dec!(2)),
            order_at("ORD-000003", Utc.with_ymd_and_hms(2026, 1, 3, 20, 0, 0).unwrap(), OrderStatus::Pending, dec!(3)),
        ];

        let first_seen = revenue_series(&orders, utc(), BucketOrder::FirstSeen);
        assert_eq!(
            labels_and_values(&first_seen),
            vec![("Jan 03".to_string(), dec!(4)), ("Jan 01".to_string(), dec!(2))]
        );

        let chronological = revenue_series(&orders, utc(), BucketOrder::Chronological);
        assert_eq!(chronological[0].label, "Jan 01");
        assert_eq!(chronological[1].label, "Jan 03");
    }

    #[test]
    fn test_offset_moves_orders_across_midnight() {
        let orders = vec![order_at(
            "ORD-000001",
            Utc.with_ymd_and_hms(2026, 1, 1, 23, 30, 0).unwrap(),
            OrderStatus::Pending,
            dec!(10),
        )];

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let points = revenue_series(&orders, plus_two, BucketOrder::Chronological);
        assert_eq!(points[0].label, "Jan 02");
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
    }

    #[test]
    fn test_same_label_in_different_years_stays_separate() {
        let orders = vec![
            order_at("ORD-000001", Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(), OrderStatus::Pending, dec!(10)),
            order_at("ORD-000002", Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(), OrderStatus::Pending, dec!(5)),
        ];

        let points = revenue_series(&orders, utc(), BucketOrder::Chronological);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date.year(), 2025);
    }

    #[test]
    fn test_empty_input_yields_no_points() {
        let orders: Vec<Order> = Vec::new();
        assert!(volume_series(&orders, utc(), BucketOrder::Chronological).is_empty());
    }
}
