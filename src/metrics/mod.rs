// Private module declaration
mod server;

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{
    HistogramOpts, HistogramTimer, HistogramVec, IntCounter, IntGauge, Registry,
};
use std::sync::{Arc, PoisonError, RwLock};

use crate::analytics::TimeRange;

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for the order store
// ============================================================================
//
// Covers:
// - Order generation and collection publishes
// - Rejected (invalid) collections
// - Orders held and live subscribers (subscribers are read on every gather)
// - Aggregation query latency per operation and time range
//
// Metrics can be scraped via /metrics when the server is enabled.
// ============================================================================

type SubscriberSource = Box<dyn Fn() -> usize + Send + Sync>;

/// Gauge refreshed from its source each time the registry is gathered
#[derive(Clone)]
struct SubscriberGauge {
    gauge: IntGauge,
    source: Arc<RwLock<Option<SubscriberSource>>>,
}

impl SubscriberGauge {
    fn new() -> prometheus::Result<Self> {
        Ok(Self {
            gauge: IntGauge::new(
                "store_subscribers",
                "Live receivers on the order and stats channels",
            )?,
            source: Arc::new(RwLock::new(None)),
        })
    }

    fn refresh(&self) -> i64 {
        let source = self.source.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(source) = source.as_ref() {
            self.gauge.set(source() as i64);
        }
        self.gauge.get()
    }
}

impl Collector for SubscriberGauge {
    fn desc(&self) -> Vec<&Desc> {
        self.gauge.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.refresh();
        self.gauge.collect()
    }
}

pub struct Metrics {
    registry: Registry,

    // Collection Metrics
    pub orders_generated: IntCounter,
    pub collections_published: IntCounter,
    pub collections_rejected: IntCounter,
    pub orders_held: IntGauge,

    // Subscription Metrics
    store_subscribers: SubscriberGauge,

    // Query Metrics
    pub aggregation_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Collection Metrics
        let orders_generated = IntCounter::new(
            "orders_generated_total",
            "Total synthetic orders generated",
        )?;
        registry.register(Box::new(orders_generated.clone()))?;

        let collections_published = IntCounter::new(
            "order_collections_published_total",
            "Total order collections published to subscribers",
        )?;
        registry.register(Box::new(collections_published.clone()))?;

        let collections_rejected = IntCounter::new(
            "order_collections_rejected_total",
            "Total order collections rejected by validation",
        )?;
        registry.register(Box::new(collections_rejected.clone()))?;

        let orders_held = IntGauge::new("orders_held", "Orders in the current collection")?;
        registry.register(Box::new(orders_held.clone()))?;

        // Subscription Metrics
        let store_subscribers = SubscriberGauge::new()?;
        registry.register(Box::new(store_subscribers.clone()))?;

        // Query Metrics
        let aggregation_duration = HistogramVec::new(
            HistogramOpts::new("aggregation_duration_seconds", "Aggregation query duration")
                .buckets(vec![0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
            &["operation", "range"],
        )?;
        registry.register(Box::new(aggregation_duration.clone()))?;

        Ok(Self {
            registry,
            orders_generated,
            collections_published,
            collections_rejected,
            orders_held,
            store_subscribers,
            aggregation_duration,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_generated(&self, count: usize) {
        self.orders_generated.inc_by(count as u64);
    }

    pub fn record_publish(&self, orders: usize) {
        self.collections_published.inc();
        self.set_orders_held(orders);
    }

    pub fn record_rejected(&self) {
        self.collections_rejected.inc();
    }

    pub fn set_orders_held(&self, orders: usize) {
        self.orders_held.set(orders as i64);
    }

    /// Count live subscribers with `source` from now on
    pub fn track_subscribers(&self, source: impl Fn() -> usize + Send + Sync + 'static) {
        let mut slot = self
            .store_subscribers
            .source
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Box::new(source));
    }

    /// Current subscriber count, read from the tracked source
    pub fn subscribers(&self) -> i64 {
        self.store_subscribers.refresh()
    }

    /// Observes the elapsed time when the returned timer drops
    pub fn start_query_timer(&self, operation: &str, range: Option<TimeRange>) -> HistogramTimer {
        let range = range.map_or("all", |range| range.tag());
        self.aggregation_duration
            .with_label_values(&[operation, range])
            .start_timer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(metrics.registry().gather().len() >= 5);
    }

    #[test]
    fn test_record_generation_and_publish() {
        let metrics = Metrics::new().unwrap();
        metrics.record_generated(150);
        metrics.record_publish(150);
        metrics.record_publish(20);

        let gathered = metrics.registry().gather();
        let generated = gathered.iter().find(|m| m.name() == "orders_generated_total").unwrap();
        assert_eq!(generated.metric[0].counter.value, Some(150.0));

        let published = gathered.iter().find(|m| m.name() == "order_collections_published_total").unwrap();
        assert_eq!(published.metric[0].counter.value, Some(2.0));

        let held = gathered.iter().find(|m| m.name() == "orders_held").unwrap();
        assert_eq!(held.metric[0].gauge.value, Some(20.0));
    }

    #[test]
    fn test_subscriber_gauge_reads_source_on_gather() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.subscribers(), 0);

        let live = Arc::new(AtomicUsize::new(3));
        let source = live.clone();
        metrics.track_subscribers(move || source.load(Ordering::SeqCst));

        let gauge_value = |metrics: &Metrics| {
            let gathered = metrics.registry().gather();
            let family = gathered.iter().find(|m| m.name() == "store_subscribers").unwrap();
            family.metric[0].gauge.value
        };
        assert_eq!(gauge_value(&metrics), Some(3.0));

        live.store(1, Ordering::SeqCst);
        assert_eq!(gauge_value(&metrics), Some(1.0));
        assert_eq!(metrics.subscribers(), 1);
    }

    #[test]
    fn test_query_timer_labels() {
        let metrics = Metrics::new().unwrap();
        drop(metrics.start_query_timer("revenue_chart_data", Some(TimeRange::ThirtyDays)));
        drop(metrics.start_query_timer("status_distribution", None));

        let gathered = metrics.registry().gather();
        let durations = gathered.iter().find(|m| m.name() == "aggregation_duration_seconds").unwrap();
        assert_eq!(durations.metric.len(), 2);

        let ranges: Vec<&str> = durations
            .metric
            .iter()
            .flat_map(|m| m.label.iter())
            .filter(|l| l.name() == "range")
            .map(|l| l.value())
            .collect();
        assert!(ranges.contains(&"30d"));
        assert!(ranges.contains(&"all"));
    }
}
