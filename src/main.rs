use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_dashboard::metrics::{self, Metrics};
use order_dashboard::{DashboardConfig, DashboardSnapshot, OrderStore, TimeRange};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "order-dashboard")]
#[command(about = "Render an order-tracking dashboard from generated order data.")]
struct CommandLine {
    /// Time range: today, 7d, 30d, 90d or 1y (anything else means 7d)
    #[arg(short, long)]
    range: Option<String>,

    /// Number of orders to generate
    #[arg(short = 'n', long)]
    orders: Option<usize>,

    /// Seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Configuration file (toml, json or yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep running and serve Prometheus metrics on this port
    #[arg(long)]
    metrics_port: Option<u16>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse();

    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_dashboard=debug")),
        )
        .init();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(orders) = cli.orders {
        config.order_count = orders;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.metrics_port.is_some() {
        config.metrics_port = cli.metrics_port;
    }
    let range = cli
        .range
        .as_deref()
        .map_or(config.default_range, TimeRange::from_tag);

    let metrics = Arc::new(Metrics::new()?);
    let options = config.store_options()?;

    tracing::info!(
        orders = config.order_count,
        seed = ?config.seed,
        range = %range,
        "Generating order data"
    );
    let store = match config.seed {
        Some(seed) => OrderStore::with_seed(config.order_count, seed, options),
        None => OrderStore::new(config.order_count, options),
    }
    .with_metrics(metrics.clone());

    let snapshot = DashboardSnapshot::capture(&store, range, config.recent_limit);
    match cli.format {
        OutputFormat::Text => print!("{}", snapshot.text(options.utc_offset)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }

    if let Some(port) = config.metrics_port {
        let registry = Arc::new(metrics.registry().clone());
        metrics::start_metrics_server(registry, port).await?;
    }

    Ok(())
}
