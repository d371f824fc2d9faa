use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::order::{Order, OrderStatus};
use super::summary::StatusCounts;

/// Share of orders in one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusShare {
    pub status: OrderStatus,
    pub count: usize,
    /// Whole percent of all orders, rounded half up
    pub percentage: u32,
}

/// Per-status counts and percentages; statuses with no orders are omitted
pub fn status_distribution<'a, I>(orders: I) -> Vec<StatusShare>
where
    I: IntoIterator<Item = &'a Order>,
{
    let counts = StatusCounts::tally(orders);
    let total = counts.total();
    if total == 0 {
        return Vec::new();
    }

    OrderStatus::ALL
        .into_iter()
        .filter_map(|status| {
            let count = counts.get(status);
            (count > 0).then(|| StatusShare {
                status,
                count,
                percentage: whole_percent(count, total),
            })
        })
        .collect()
}

fn whole_percent(count: usize, total: usize) -> u32 {
    let share = Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total);
    share
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}
