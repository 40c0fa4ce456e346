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

//! Metric identity and partitioning for Metrica
//!
//! This crate defines what a metric series *is* to the rest of the pipeline:
//! - **Tag validation**: `key=value` well-formedness checks
//! - **Identity**: MD5 over the defining attributes, paired with the org
//! - **Canonical name-with-tags**: one string per series, memoized per definition
//! - **Archives**: (aggregation method, rollup span) packed into 16 bits
//! - **Partitioning**: org, name, or name+tags hashed onto a partition
//!
//! # Example
//!
//! ```rust
//! use metrica_schema::{MetricData, PartitionByMethod, PartitionedMetric};
//!
//! let mut md = MetricData {
//!     org_id: 1,
//!     name: "cpu.user".to_string(),
//!     interval: 10,
//!     value: 0.5,
//!     unit: "percent".to_string(),
//!     time: 1_700_000_000,
//!     mtype: "gauge".to_string(),
//!     tags: vec!["host=web-1".to_string(), "dc=ams".to_string()],
//!     ..Default::default()
//! };
//!
//! md.validate()?;
//! md.set_id();
//! let partition = md.partition_id(PartitionByMethod::BySeriesWithTags, 8)?;
//! assert!((0..8).contains(&partition));
//! # Ok::<(), metrica_schema::SchemaError>(())
//! ```

pub mod archive;
pub mod error;
pub mod metric;
pub mod mkey;
pub mod naming;
pub mod partition;
pub mod point;
pub mod tags;

pub use archive::{Archive, Method, SPANS};
pub use error::{SchemaError, SchemaResult};
pub use metric::{
    canonical_name_with_tags, is_valid_mtype, MetricData, MetricDefinition, SyncedMeta, MTYPES,
    TAG_SEPARATOR,
};
pub use mkey::{Key, MKey, KEY_LEN};
pub use naming::{collapse_dots, sanitize_name_as_tag_value};
pub use partition::{jump_hash, PartitionByMethod, PartitionedMetric};
pub use point::{DataPoint, MetricPoint};
pub use tags::{is_valid_tag, is_valid_tag_key, is_valid_tag_set, is_valid_tag_value};
