// Metrica - metric identity and wire schema
// Copyright (C) 2025 Metrica Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Configuration schema
//!
//! Every section has serde defaults, so an empty document is a complete
//! configuration: `bySeriesWithTags` over one partition, MessagePack
//! batches, pretty logs at `info`.

use crate::error::{ConfigError, ConfigResult};
use metrica_msg::ArrayFormat;
use metrica_observability::{LogConfig, LogFormat};
use metrica_schema::{PartitionByMethod, PartitionedMetric};
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How records are routed to partitions
    pub partitioning: PartitioningConfig,

    /// Wire envelope settings
    pub wire: WireConfig,

    /// Logging settings
    pub observability: ObservabilityConfig,
}

/// Partition routing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitioningConfig {
    /// `byOrg`, `bySeries`, `bySeriesWithTags` or `bySeriesWithTagsFnv`
    #[serde(default = "default_partition_method")]
    pub method: String,

    /// Number of partitions, at least 1
    #[serde(default = "default_partitions")]
    pub partitions: i32,
}

impl Default for PartitioningConfig {
    fn default() -> Self {
        PartitioningConfig {
            method: default_partition_method(),
            partitions: default_partitions(),
        }
    }
}

impl PartitioningConfig {
    /// Parse the configured method
    pub fn partition_method(&self) -> ConfigResult<PartitionByMethod> {
        self.method
            .parse()
            .map_err(|e: metrica_schema::SchemaError| {
                ConfigError::invalid_value("partitioning.method", e.to_string())
            })
    }

    /// Partition of `metric` under this configuration
    pub fn partition_id<M: PartitionedMetric + ?Sized>(&self, metric: &M) -> ConfigResult<i32> {
        let method = self.partition_method()?;
        Ok(metric.partition_id(method, self.partitions)?)
    }
}

/// Wire envelope settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireConfig {
    /// Batch encoding: `json` or `msgp`
    #[serde(default = "default_array_format")]
    pub array_format: String,
}

impl Default for WireConfig {
    fn default() -> Self {
        WireConfig {
            array_format: default_array_format(),
        }
    }
}

impl WireConfig {
    /// Parse the configured batch encoding
    pub fn array_format(&self) -> ConfigResult<ArrayFormat> {
        self.array_format
            .parse()
            .map_err(|e: metrica_msg::MsgError| {
                ConfigError::invalid_value("wire.array_format", e.to_string())
            })
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Level name: trace, debug, info, warn, error or off
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty`, `compact` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// ANSI colors for non-JSON output
    #[serde(default = "default_true")]
    pub use_color: bool,

    /// Include module targets in each line
    #[serde(default = "default_true")]
    pub include_targets: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        ObservabilityConfig {
            log_level: default_log_level(),
            log_format: default_log_format(),
            use_color: true,
            include_targets: true,
        }
    }
}

impl ObservabilityConfig {
    /// Build the subscriber configuration
    pub fn log_config(&self) -> ConfigResult<LogConfig> {
        let format: LogFormat = self.log_format.parse().map_err(
            |e: metrica_observability::LogError| {
                ConfigError::invalid_value("observability.log_format", e.to_string())
            },
        )?;

        Ok(LogConfig::new()
            .with_format(format)
            .with_level(self.log_level.clone())
            .with_color(self.use_color)
            .with_targets(self.include_targets))
    }
}

fn default_partition_method() -> String {
    PartitionByMethod::BySeriesWithTags.as_str().to_string()
}

fn default_partitions() -> i32 {
    1
}

fn default_array_format() -> String {
    "msgp".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    LogFormat::Pretty.as_str().to_string()
}

fn default_true() -> bool {
    true
}
