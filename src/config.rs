use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analytics::{BucketOrder, TimeRange, DEFAULT_RECENT_LIMIT};
use crate::provider::StoreOptions;

// ============================================================================
// Dashboard Configuration
// ============================================================================
//
// Layered: defaults, then an optional file, then ORDER_DASHBOARD_* environment
// variables. Command-line flags are applied on top by the binary.
//
// ============================================================================

pub const ENV_PREFIX: &str = "ORDER_DASHBOARD";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("UTC offset out of range: {0} minutes")]
    InvalidOffset(i32),

    #[error("Recent orders limit must be at least 1")]
    ZeroRecentLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Orders generated at startup
    pub order_count: usize,
    /// Seed for reproducible generation
    pub seed: Option<u64>,
    pub default_range: TimeRange,
    pub recent_limit: usize,
    /// Offset used to cut orders into calendar days
    pub utc_offset_minutes: i32,
    pub bucket_order: BucketOrder,
    pub metrics_port: Option<u16>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            order_count: 150,
            seed: None,
            default_range: TimeRange::SevenDays,
            recent_limit: DEFAULT_RECENT_LIMIT,
            utc_offset_minutes: 0,
            bucket_order: BucketOrder::Chronological,
            metrics_port: None,
        }
    }
}

impl DashboardConfig {
    /// Load from an optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }
        Self::from_builder(builder.add_source(environment()))
    }

    fn from_builder(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings = builder.build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!(?config, "Loaded dashboard configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.utc_offset()?;
        if self.recent_limit == 0 {
            return Err(ConfigError::ZeroRecentLimit);
        }
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_minutes))
    }

    pub fn store_options(&self) -> Result<StoreOptions, ConfigError> {
        Ok(StoreOptions {
            utc_offset: self.utc_offset()?,
            bucket_order: self.bucket_order,
        })
    }
}

fn environment() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}
