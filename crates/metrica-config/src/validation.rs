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

//! Configuration validation

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{Config, ObservabilityConfig, PartitioningConfig, WireConfig};
use metrica_observability::{validate_level, LOG_LEVELS};

/// Check a configuration section for values outside their domain
pub trait Validator {
    /// Validate the section, returning the first problem found
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for Config {
    fn validate(&self) -> ConfigResult<()> {
        self.partitioning.validate()?;
        self.wire.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

impl Validator for PartitioningConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.partition_method()?;

        if self.partitions <= 0 {
            return Err(ConfigError::invalid_value(
                "partitioning.partitions",
                format!("must be at least 1, got {}", self.partitions),
            ));
        }

        Ok(())
    }
}

impl Validator for WireConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.array_format()?;
        Ok(())
    }
}

impl Validator for ObservabilityConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_level(&self.log_level).map_err(|_| {
            ConfigError::invalid_value(
                "observability.log_level",
                format!("must be one of: {}", LOG_LEVELS.join(", ")),
            )
        })?;
        self.log_config()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_partitions() {
        let mut config = Config::default();
        config.partitioning.partitions = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("partitioning.partitions"));
    }

    #[test]
    fn test_negative_partitions() {
        let mut config = Config::default();
        config.partitioning.partitions = -4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_legacy_array_format_not_selectable() {
        let mut config = Config::default();
        config.wire.array_format = "v1json".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("wire.array_format"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.observability.log_level = "invalid_level".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = Config::default();
        config.observability.log_format = "logfmt".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("observability.log_format"));
    }
}
