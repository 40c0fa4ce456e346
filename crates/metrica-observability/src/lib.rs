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

//! Metrica Observability Module
//!
//! Structured logging for the Metrica crates.
//!
//! # Features
//!
//! - **Multiple Output Formats**: pretty, compact and JSON
//! - **Environment-based Filtering**: `METRICA_LOG`, then `RUST_LOG`
//! - **Structured Logging**: `log_*!` macros with `key = value` fields
//!
//! # Example
//!
//! ```ignore
//! use metrica_observability::{init_tracing, LogFormat};
//!
//! init_tracing(LogFormat::Json, Some("metrica_msg=debug,info"))?;
//! tracing::info!("ingest started");
//! ```

pub mod config;
pub mod initialization;
pub mod macros;

pub use config::{validate_level, LogConfig, LogError, LogFormat, LogOutput, LogResult, LOG_LEVELS};
pub use initialization::{init_tracing, init_tracing_with_config};

/// Re-exported for the logging macros
pub use tracing;
