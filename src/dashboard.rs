use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

use crate::analytics::{compute_stats, ChartPoint, OrderStats, StatusShare, TimeRange};
use crate::domain::order::{round_cents, Order, OrderStatus};
use crate::provider::OrderStore;

// ============================================================================
// Dashboard Snapshot - everything one dashboard render needs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    /// Percent change over the selected window against the one before it
    pub change: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentOrderRow {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
}

impl From<Order> for RecentOrderRow {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            status: order.status,
            total_amount: order.total_amount,
            order_date: order.order_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub time_range: TimeRange,
    pub captured_at: DateTime<Utc>,
    pub stats: OrderStats,
    pub cards: Vec<StatCard>,
    pub revenue: Vec<ChartPoint>,
    pub volume: Vec<ChartPoint>,
    pub status_distribution: Vec<StatusShare>,
    pub recent_orders: Vec<RecentOrderRow>,
}

impl DashboardSnapshot {
    pub fn capture(store: &OrderStore, range: TimeRange, recent_limit: usize) -> Self {
        let stats = store.stats().as_ref().clone();
        let now = store.now();
        let trend = WindowTrend::measure(&store.orders(), range, now);
        let snapshot = Self {
            time_range: range,
            captured_at: now,
            cards: stat_cards(&stats, &trend),
            stats,
            revenue: store.revenue_chart_data(range),
            volume: store.order_volume_chart_data(range),
            status_distribution: store.status_distribution(),
            recent_orders: store
                .recent_orders(range, recent_limit)
                .into_iter()
                .map(RecentOrderRow::from)
                .collect(),
        };

        tracing::info!(
            range = %range,
            orders = snapshot.stats.total_orders,
            revenue_days = snapshot.revenue.len(),
            recent = snapshot.recent_orders.len(),
            "Captured dashboard snapshot"
        );
        snapshot
    }

    /// Terminal rendering with dates shown in `offset`
    pub fn text(&self, offset: FixedOffset) -> TextReport<'_> {
        TextReport {
            snapshot: self,
            offset,
        }
    }
}

// ============================================================================
// Stat Cards
// ============================================================================

/// Stats of the selected window and of the equally long window before it
struct WindowTrend {
    current: OrderStats,
    previous: OrderStats,
}

impl WindowTrend {
    fn measure(orders: &[Order], range: TimeRange, now: DateTime<Utc>) -> Self {
        let start = range.start(now);
        let current: Vec<Order> = orders
            .iter()
            .filter(|order| range.contains(order.order_date, now))
            .cloned()
            .collect();
        let previous: Vec<Order> = orders
            .iter()
            .filter(|order| order.order_date < start && range.contains(order.order_date, start))
            .cloned()
            .collect();

        Self {
            current: compute_stats(&current),
            previous: compute_stats(&previous),
        }
    }

    fn change(&self, metric: impl Fn(&OrderStats) -> Decimal) -> Option<Decimal> {
        percent_change(metric(&self.current), metric(&self.previous))
    }
}

/// None when there is nothing to compare against
pub fn percent_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    let change = (current - previous) / previous * Decimal::ONE_HUNDRED;
    Some(change.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

fn stat_cards(stats: &OrderStats, trend: &WindowTrend) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Total Orders",
            value: format_count(stats.total_orders),
            change: trend.change(|s| Decimal::from(s.total_orders)),
        },
        StatCard {
            title: "Total Revenue",
            value: format_currency(stats.total_revenue),
            change: trend.change(|s| s.total_revenue),
        },
        StatCard {
            title: "Avg Order Value",
            value: format_currency(stats.average_order_value),
            change: trend.change(|s| s.average_order_value),
        },
        StatCard {
            title: "Delivery Rate",
            value: format!("{}%", stats.delivery_rate.normalize()),
            change: trend.change(|s| s.delivery_rate),
        },
    ]
}

fn format_change(change: Decimal) -> String {
    let sign = if change.is_sign_negative() { "" } else { "+" };
    format!("{}{:.1}%", sign, change)
}

// ============================================================================
// Formatting
// ============================================================================

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// "1234" -> "1,234"
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// "1234.5" -> "$1,234.50"
pub fn format_currency(amount: Decimal) -> String {
    let rounded = format!("{:.2}", round_cents(amount.abs()));
    let (whole, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

/// "Oct 18, 02:30 PM"
pub fn format_order_time(date: DateTime<Utc>, offset: FixedOffset) -> String {
    date.with_timezone(&offset).format("%b %d, %I:%M %p").to_string()
}

fn title_case(status: OrderStatus) -> String {
    let tag = status.as_str();
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub struct TextReport<'a> {
    snapshot: &'a DashboardSnapshot,
    offset: FixedOffset,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot;

        writeln!(f, "Order Overview ({})", snapshot.time_range.label())?;
        for card in &snapshot.cards {
            match card.change {
                Some(change) => writeln!(f, "  {:<16} {}  ({})", card.title, card.value, format_change(change))?,
                None => writeln!(f, "  {:<16} {}", card.title, card.value)?,
            }
        }

        writeln!(f)?;
        writeln!(f, "Revenue Trend")?;
        for point in &snapshot.revenue {
            writeln!(f, "  {}  {}", point.label, format_currency(point.value))?;
        }

        writeln!(f)?;
        writeln!(f, "Order Volume")?;
        for point in &snapshot.volume {
            writeln!(f, "  {}  {}", point.label, point.value)?;
        }

        writeln!(f)?;
        writeln!(f, "Order Status Distribution")?;
        for share in &snapshot.status_distribution {
            writeln!(
                f,
                "  {:<12} {:>4} ({}%)",
                title_case(share.status),
                share.count,
                share.percentage
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Recent Orders")?;
        if snapshot.recent_orders.is_empty() {
            return writeln!(f, "  No orders found for the selected time range.");
        }
        for row in &snapshot.recent_orders {
            writeln!(
                f,
                "  {}  {:<18} {:<11} {:>11}  {}",
                row.id,
                row.customer_name,
                title_case(row.status),
                format_currency(row.total_amount),
                format_order_time(row.order_date, self.offset)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{fixed_now, order_at};
    use crate::provider::StoreOptions;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(89.99)), "$89.99");
        assert_eq!(format_currency(dec!(1234.5)), "$1,234.50");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(-20)), "-$20.00");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(150), "150");
        assert_eq!(format_count(12500), "12,500");
    }

    #[test]
    fn test_format_order_time() {
        let date = Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(format_order_time(date, utc), "Oct 18, 02:30 PM");
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(dec!(150), dec!(100)), Some(dec!(50.0)));
        assert_eq!(percent_change(dec!(75), dec!(100)), Some(dec!(-25.0)));
        assert_eq!(percent_change(dec!(1), dec!(3)), Some(dec!(-66.7)));
        assert_eq!(percent_change(dec!(10), dec!(0)), None);
        assert_eq!(format_change(dec!(12.5)), "+12.5%");
        assert_eq!(format_change(dec!(-25)), "-25.0%");
    }

    #[test]
    fn test_stat_cards_compare_against_previous_window() {
        let now = fixed_now();
        let orders = vec![
            order_at("ORD-000001", now - Duration::days(1), OrderStatus::Delivered, dec!(100)),
            order_at("ORD-000002", now - Duration::days(2), OrderStatus::Delivered, dec!(50)),
            order_at("ORD-000003", now - Duration::days(10), OrderStatus::Delivered, dec!(100)),
            order_at("ORD-000004", now - Duration::days(40), OrderStatus::Pending, dec!(500)),
        ];
        let store = OrderStore::from_orders(orders, StoreOptions::default())
            .unwrap()
            .with_clock(fixed_now);

        let snapshot = DashboardSnapshot::capture(&store, TimeRange::SevenDays, 10);
        let changes: Vec<Option<Decimal>> = snapshot.cards.iter().map(|card| card.change).collect();
        assert_eq!(changes, vec![Some(dec!(100)), Some(dec!(50)), Some(dec!(-25)), Some(dec!(0))]);

        let text = snapshot.text(FixedOffset::east_opt(0).unwrap()).to_string();
        assert!(text.contains("Total Orders     4  (+100.0%)"));

        // nothing before the 90 day window
        let snapshot = DashboardSnapshot::capture(&store, TimeRange::NinetyDays, 10);
        assert!(snapshot.cards.iter().all(|card| card.change.is_none()));
    }

    #[test]
    fn test_capture_collects_all_sections() {
        let store = OrderStore::generated(150, 17, StoreOptions::default(), fixed_clock);
        let snapshot = DashboardSnapshot::capture(&store, TimeRange::ThirtyDays, 10);

        assert_eq!(snapshot.captured_at, fixed_clock());
        assert_eq!(snapshot.stats.total_orders, 150);
        assert_eq!(snapshot.cards.len(), 4);
        assert_eq!(snapshot.cards[0].value, "150");
        assert!(snapshot.recent_orders.len() <= 10);
        assert_eq!(
            snapshot.status_distribution.iter().map(|s| s.count).sum::<usize>(),
            150
        );

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["time_range"], "30d");
        assert!(json["revenue"].is_array());
    }

    #[test]
    fn test_text_report_for_empty_store() {
        let store = OrderStore::generated(0, 1, StoreOptions::default(), fixed_clock);
        let snapshot = DashboardSnapshot::capture(&store, TimeRange::Today, 10);
        let text = snapshot.text(FixedOffset::east_opt(0).unwrap()).to_string();

        assert!(text.contains("Order Overview (Today)"));
        assert!(text.contains("Total Revenue    $0.00"));
        assert!(text.contains("Delivery Rate    0%"));
        assert!(text.contains("No orders found for the selected time range."));
    }

    #[test]
    fn test_text_report_lists_recent_orders() {
        let store = OrderStore::generated(40, 3, StoreOptions::default(), fixed_clock);
        let snapshot = DashboardSnapshot::capture(&store, TimeRange::NinetyDays, 5);
        let text = snapshot.text(FixedOffset::east_opt(0).unwrap()).to_string();

        for row in &snapshot.recent_orders {
            assert!(text.contains(&row.id));
        }
        assert!(!text.contains("No orders found"));
    }
}
