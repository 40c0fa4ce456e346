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

//! Configuration for Metrica
//!
//! Partition routing, wire envelope and logging settings, loaded from TOML,
//! YAML or JSON with `METRICA_*` environment overrides.
//!
//! # Example
//!
//! ```no_run
//! use metrica_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .load_with_overrides("metrica.toml")
//!         .await?;
//!
//!     let method = config.partitioning.partition_method()?;
//!     println!("routing {} over {} partitions", method, config.partitioning.partitions);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ConfigFormat, ConfigLoader, ENV_ARRAY_FORMAT, ENV_LOG_COLOR, ENV_LOG_FORMAT, ENV_LOG_LEVEL,
    ENV_PARTITIONS, ENV_PARTITION_METHOD,
};
pub use schema::{Config, ObservabilityConfig, PartitioningConfig, WireConfig};
pub use validation::Validator;
