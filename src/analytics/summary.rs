use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::{round_cents, Order, OrderStatus};

// ============================================================================
// Order Summary Statistics
// ============================================================================

/// One counter per order status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub shipped: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    pub fn tally<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut counts = Self::default();
        for order in orders {
            *counts.slot(order.status) += 1;
        }
        counts
    }

    pub fn get(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Processing => self.processing,
            OrderStatus::Shipped => self.shipped,
            OrderStatus::Delivered => self.delivered,
            OrderStatus::Cancelled => self.cancelled,
        }
    }

    pub fn total(&self) -> usize {
        OrderStatus::ALL.into_iter().map(|status| self.get(status)).sum()
    }

    fn slot(&mut self, status: OrderStatus) -> &mut usize {
        match status {
            OrderStatus::Pending => &mut self.pending,
            OrderStatus::Processing => &mut self.processing,
            OrderStatus::Shipped => &mut self.shipped,
            OrderStatus::Delivered => &mut self.delivered,
            OrderStatus::Cancelled => &mut self.cancelled,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStats {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    /// Percentage of orders delivered, two decimals
    pub delivery_rate: Decimal,
    pub status_counts: StatusCounts,
}

/// Summary over all given orders. An empty input yields all zeros.
pub fn compute_stats(orders: &[Order]) -> OrderStats {
    let status_counts = StatusCounts::tally(orders);
    let total_orders = orders.len();
    let revenue: Decimal = orders.iter().map(|order| order.total_amount).sum();

    if total_orders == 0 {
        return OrderStats {
            status_counts,
            ..OrderStats::default()
        };
    }

    let count = Decimal::from(total_orders);
    let delivered = Decimal::from(status_counts.delivered);

    OrderStats {
        total_orders,
        total_revenue: round_cents(revenue),
        average_order_value: round_cents(revenue / count),
        delivery_rate: round_cents(delivered * Decimal::ONE_HUNDRED / count),
        status_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{fixed_now, order_at};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compute_stats_empty() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
        assert_eq!(stats.average_order_value, Decimal::ZERO);
        assert_eq!(stats.delivery_rate, Decimal::ZERO);
        assert_eq!(stats.status_counts, StatusCounts::default());
    }

    #[test]
    fn test_compute_stats_three_orders() {
        let now = fixed_now();
        let orders = vec![
            order_at("ORD-000001", now - Duration::hours(1), OrderStatus::Delivered, dec!(10.00)),
            order_at("ORD-000002", now - Duration::hours(5), OrderStatus::Pending, dec!(20.00)),
            order_at("ORD-000003", now - Duration::hours(20), OrderStatus::Delivered, dec!(30.00)),
        ];

        let stats = compute_stats(&orders);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_revenue, dec!(60.00));
        assert_eq!(stats.average_order_value, dec!(20.00));
        assert_eq!(stats.delivery_rate, dec!(66.67));
        assert_eq!(stats.status_counts.delivered, 2);
        assert_eq!(stats.status_counts.pending, 1);
        assert_eq!(stats.status_counts.shipped, 0);
    }

    #[test]
    fn test_average_rounds_to_cents() {
        let now = fixed_now();
        let orders = vec![
            order_at("ORD-000001", now, OrderStatus::Shipped, dec!(10.00)),
            order_at("ORD-000002", now, OrderStatus::Shipped, dec!(10.00)),
            order_at("ORD-000003", now, OrderStatus::Shipped, dec!(10.01)),
        ];

        let stats = compute_stats(&orders);
        assert_eq!(stats.total_revenue, dec!(30.01));
        assert_eq!(stats.average_order_value, dec!(10.00));
        assert_eq!(stats.delivery_rate, dec!(0));
    }

    #[test]
    fn test_status_counts_total_matches_tally() {
        let now = fixed_now();
        let orders: Vec<Order> = OrderStatus::ALL
            .into_iter()
            .enumerate()
            .map(|(i, status)| order_at(&format!("ORD-{:06}", i + 1), now, status, dec!(1)))
            .collect();

        let counts = StatusCounts::tally(&orders);
        assert_eq!(counts.total(), 5);
        for status in OrderStatus::ALL {
            assert_eq!(counts.get(status), 1);
        }
    }
}
