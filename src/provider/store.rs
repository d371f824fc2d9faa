use chrono::{DateTime, FixedOffset, Offset, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::watch;

use crate::analytics::{
    compute_stats, filter_by_time_range, recent_orders, revenue_series, status_distribution,
    volume_series, BucketOrder, ChartPoint, OrderStats, StatusShare, TimeRange,
};
use crate::domain::order::{Order, OrderError};
use crate::metrics::Metrics;
use super::generator::MockOrderGenerator;

// ============================================================================
// Order Store - the dashboard's data context
// ============================================================================
//
// Owns the canonical order collection and its derived stats. Both are held in
// `watch` channels: readers pull the latest value with `orders()`/`stats()`,
// subscribers get woken on every publish. A subscription ends when its
// receiver is dropped.
//
// Collections are replaced wholesale; individual orders are never mutated.
//
// ============================================================================

/// How day buckets are computed for the chart series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub utc_offset: FixedOffset,
    pub bucket_order: BucketOrder,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            bucket_order: BucketOrder::Chronological,
        }
    }
}

pub type Clock = fn() -> DateTime<Utc>;

struct Channels {
    orders_tx: watch::Sender<Arc<Vec<Order>>>,
    stats_tx: watch::Sender<Arc<OrderStats>>,
}

impl Channels {
    fn receiver_count(&self) -> usize {
        self.orders_tx.receiver_count() + self.stats_tx.receiver_count()
    }
}

pub struct OrderStore {
    channels: Arc<Channels>,
    generator: MockOrderGenerator,
    options: StoreOptions,
    clock: Clock,
    metrics: Option<Arc<Metrics>>,
}

impl OrderStore {
    /// Generate `count` orders from an unseeded rng
    pub fn new(count: usize, options: StoreOptions) -> Self {
        let store = Self::empty(options, Utc::now);
        store.regenerate_with(count, &mut rand::rng());
        store
    }

    /// Generate `count` orders reproducibly from `seed`
    pub fn with_seed(count: usize, seed: u64, options: StoreOptions) -> Self {
        Self::generated(count, seed, options, Utc::now)
    }

    /// Seeded generation against an explicit clock
    pub fn generated(count: usize, seed: u64, options: StoreOptions, clock: Clock) -> Self {
        let store = Self::empty(options, clock);
        store.regenerate_with(count, &mut StdRng::seed_from_u64(seed));
        store
    }

    /// Wrap an existing collection; every order must pass validation
    pub fn from_orders(orders: Vec<Order>, options: StoreOptions) -> Result<Self, OrderError> {
        let store = Self::empty(options, Utc::now);
        store.replace_orders(orders)?;
        Ok(store)
    }

    fn empty(options: StoreOptions, clock: Clock) -> Self {
        let (orders_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (stats_tx, _) = watch::channel(Arc::new(OrderStats::default()));
        Self {
            channels: Arc::new(Channels { orders_tx, stats_tx }),
            generator: MockOrderGenerator::new(),
            options,
            clock,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.set_orders_held(self.channels.orders_tx.borrow().len());

        // the registry may outlive the store
        let channels = Arc::downgrade(&self.channels);
        metrics.track_subscribers(move || channels.upgrade().map_or(0, |channels| channels.receiver_count()));
        self.metrics = Some(metrics);
        self
    }

    /// Replace the clock used for time-range queries
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    // ------------------------------------------------------------------------
    // Publishing
    // ------------------------------------------------------------------------

    /// Discard the current collection and publish `count` fresh orders
    pub fn regenerate(&self, count: usize) {
        self.regenerate_with(count, &mut rand::rng());
    }

    pub fn regenerate_with<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) {
        let orders = self.generator.generate(count, self.now(), rng);
        if let Some(metrics) = &self.metrics {
            metrics.record_generated(orders.len());
        }
        self.publish(orders);
    }

    /// Publish an externally built collection after validating it
    pub fn replace_orders(&self, orders: Vec<Order>) -> Result<(), OrderError> {
        if let Err(error) = orders.iter().try_for_each(Order::validate) {
            tracing::warn!(error = %error, "Rejected order collection");
            if let Some(metrics) = &self.metrics {
                metrics.record_rejected();
            }
            return Err(error);
        }
        self.publish(orders);
        Ok(())
    }

    fn publish(&self, orders: Vec<Order>) {
        let stats = compute_stats(&orders);
        let count = orders.len();

        self.channels.orders_tx.send_replace(Arc::new(orders));
        self.channels.stats_tx.send_replace(Arc::new(stats));

        if let Some(metrics) = &self.metrics {
            metrics.record_publish(count);
        }

        tracing::debug!(
            orders = count,
            subscribers = self.subscriber_count(),
            "Published order collection"
        );
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// Current collection
    pub fn orders(&self) -> Arc<Vec<Order>> {
        self.channels.orders_tx.borrow().clone()
    }

    /// Stats of the current collection
    pub fn stats(&self) -> Arc<OrderStats> {
        self.channels.stats_tx.borrow().clone()
    }

    pub fn subscribe_orders(&self) -> watch::Receiver<Arc<Vec<Order>>> {
        self.channels.orders_tx.subscribe()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<Arc<OrderStats>> {
        self.channels.stats_tx.subscribe()
    }

    /// Live receivers across both channels
    pub fn subscriber_count(&self) -> usize {
        self.channels.receiver_count()
    }

    // ------------------------------------------------------------------------
    // Aggregation queries
    // ------------------------------------------------------------------------

    fn query<T>(&self, operation: &str, range: Option<TimeRange>, f: impl FnOnce(&[Order], DateTime<Utc>) -> T) -> T {
        let orders = self.orders();
        let now = self.now();
        let _timer = self
            .metrics
            .as_ref()
            .map(|metrics| metrics.start_query_timer(operation, range));
        f(orders.as_slice(), now)
    }

    pub fn orders_by_time_range(&self, range: TimeRange) -> Vec<Order> {
        self.query("orders_by_time_range", Some(range), |orders, now| {
            filter_by_time_range(orders, range, now).into_iter().cloned().collect()
        })
    }

    pub fn revenue_chart_data(&self, range: TimeRange) -> Vec<ChartPoint> {
        let StoreOptions { utc_offset, bucket_order } = self.options;
        self.query("revenue_chart_data", Some(range), |orders, now| {
            revenue_series(filter_by_time_range(orders, range, now), utc_offset, bucket_order)
        })
    }

    pub fn order_volume_chart_data(&self, range: TimeRange) -> Vec<ChartPoint> {
        let StoreOptions { utc_offset, bucket_order } = self.options;
        self.query("order_volume_chart_data", Some(range), |orders, now| {
            volume_series(filter_by_time_range(orders, range, now), utc_offset, bucket_order)
        })
    }

    /// Status breakdown over the whole collection
    pub fn status_distribution(&self) -> Vec<StatusShare> {
        self.query("status_distribution", None, |orders, _| status_distribution(orders))
    }

    pub fn recent_orders(&self, range: TimeRange, limit: usize) -> Vec<Order> {
        self.query("recent_orders", Some(range), |orders, now| {
            recent_orders(orders, range, now, limit).into_iter().cloned().collect()
        })
    }
}
