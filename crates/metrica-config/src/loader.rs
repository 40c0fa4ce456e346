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

//! Configuration loading
//!
//! Files are read with `tokio::fs` and parsed by extension. `METRICA_*`
//! environment variables override file values when loading with overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use crate::validation::Validator;
use metrica_observability::{log_debug, log_info, trace_span};
use std::path::Path;
use tokio::fs;

/// Override for `partitioning.method`
pub const ENV_PARTITION_METHOD: &str = "METRICA_PARTITION_METHOD";
/// Override for `partitioning.partitions`
pub const ENV_PARTITIONS: &str = "METRICA_PARTITIONS";
/// Override for `wire.array_format`
pub const ENV_ARRAY_FORMAT: &str = "METRICA_ARRAY_FORMAT";
/// Override for `observability.log_level`
pub const ENV_LOG_LEVEL: &str = "METRICA_LOG_LEVEL";
/// Override for `observability.log_format`
pub const ENV_LOG_FORMAT: &str = "METRICA_LOG_FORMAT";
/// Override for `observability.use_color`
pub const ENV_LOG_COLOR: &str = "METRICA_LOG_COLOR";

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::InvalidPath(path.to_path_buf())),
        }
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration loader
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader {
    validate: bool,
}

impl ConfigLoader {
    /// Create a loader that validates what it loads
    pub fn new() -> Self {
        ConfigLoader { validate: true }
    }

    /// Create a loader without validation
    pub fn without_validation() -> Self {
        ConfigLoader { validate: false }
    }

    /// Load configuration from a file
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        if !fs::try_exists(path).await? {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).await?;

        let span = trace_span!("load_config", path = %path.display());
        let _guard = span.enter();
        log_info!("loaded configuration file" => {
            format = format.name(),
            bytes = content.len(),
        });

        self.load_from_string(&content, format)
    }

    /// Load configuration from a string
    pub fn load_from_string(&self, content: &str, format: ConfigFormat) -> ConfigResult<Config> {
        let config: Config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };

        if self.validate {
            config.validate()?;
            log_debug!("configuration validated" => { format = format.name() });
        }

        Ok(config)
    }

    /// Load a file, then apply `METRICA_*` environment overrides
    pub async fn load_with_overrides<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let mut config = self.load_file(path).await?;
        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&self, config: &mut Config) -> ConfigResult<()> {
        let mut applied = 0usize;

        if let Ok(value) = std::env::var(ENV_PARTITION_METHOD) {
            config.partitioning.method = value;
            applied += 1;
        }
        if let Ok(value) = std::env::var(ENV_PARTITIONS) {
            config.partitioning.partitions = value.trim().parse().map_err(|_| {
                ConfigError::env_var_parsing_error(
                    ENV_PARTITIONS,
                    &value,
                    "expected a positive integer",
                )
            })?;
            applied += 1;
        }
        if let Ok(value) = std::env::var(ENV_ARRAY_FORMAT) {
            config.wire.array_format = value;
            applied += 1;
        }
        if let Ok(value) = std::env::var(ENV_LOG_LEVEL) {
            config.observability.log_level = value;
            applied += 1;
        }
        if let Ok(value) = std::env::var(ENV_LOG_FORMAT) {
            config.observability.log_format = value;
            applied += 1;
        }
        if let Ok(value) = std::env::var(ENV_LOG_COLOR) {
            config.observability.use_color = parse_bool(ENV_LOG_COLOR, &value)?;
            applied += 1;
        }

        if applied > 0 {
            log_debug!("applied environment overrides" => { count = applied });
            if self.validate {
                config.validate()?;
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse boolean from string (accepts: true, false, yes, no, 1, 0, on, off)
fn parse_bool(variable: &str, value: &str) -> ConfigResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ConfigError::env_var_parsing_error(
            variable,
            value,
            "expected 'true', 'false', 'yes', 'no', '1', '0', 'on', or 'off'",
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use metrica_msg::ArrayFormat;
    use metrica_schema::PartitionByMethod;

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_path("metrica.toml").unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path("metrica.yaml").unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path("metrica.yml").unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path("metrica.json").unwrap(), ConfigFormat::Json);
    }

    #[test]
    fn test_format_detection_error() {
        assert!(matches!(
            ConfigFormat::from_path("metrica.ini"),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"
        ));
        assert!(matches!(
            ConfigFormat::from_path("metrica"),
            Err(ConfigError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_parse_bool() {
        for v in ["true", "yes", "1", "ON"] {
            assert!(parse_bool("X", v).unwrap());
        }
        for v in ["false", "no", "0", "off"] {
            assert!(!parse_bool("X", v).unwrap());
        }
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
        [partitioning]
        method = "bySeries"
        partitions = 32

        [wire]
        array_format = "json"
        "#;
        let config = ConfigLoader::new()
            .load_from_string(toml, ConfigFormat::Toml)
            .unwrap();
        assert_eq!(
            config.partitioning.partition_method().unwrap(),
            PartitionByMethod::BySeries
        );
        assert_eq!(config.partitioning.partitions, 32);
        assert_eq!(config.wire.array_format().unwrap(), ArrayFormat::ArrayJson);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "partitioning:\n  method: byOrg\n  partitions: 4\nobservability:\n  log_format: json\n";
        let config = ConfigLoader::new()
            .load_from_string(yaml, ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(config.partitioning.partitions, 4);
        assert_eq!(config.observability.log_format, "json");
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"partitioning": {"method": "bySeriesWithTagsFnv", "partitions": 2}}"#;
        let config = ConfigLoader::new()
            .load_from_string(json, ConfigFormat::Json)
            .unwrap();
        assert_eq!(
            config.partitioning.partition_method().unwrap(),
            PartitionByMethod::BySeriesWithTagsFnv
        );
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = ConfigLoader::new()
            .load_from_string("", ConfigFormat::Toml)
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validation_can_be_skipped() {
        let json = r#"{"partitioning": {"partitions": 0}}"#;
        assert!(ConfigLoader::new()
            .load_from_string(json, ConfigFormat::Json)
            .is_err());
        let config = ConfigLoader::without_validation()
            .load_from_string(json, ConfigFormat::Json)
            .unwrap();
        assert_eq!(config.partitioning.partitions, 0);
    }
}
