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

//! The v1 record shape
//!
//! v1 producers sent the graphite-style `metric` path next to `name`, and
//! MessagePack encoders of that generation keyed maps by the exported field
//! name (`OrgId`) rather than the JSON name (`org_id`). Both spellings are
//! accepted.

use metrica_schema::MetricData;
use serde::{Deserialize, Serialize};

/// A record as produced by the v1 wire generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyMetricData {
    /// Identity text
    #[serde(alias = "Id", default)]
    pub id: String,
    /// Owning organization
    #[serde(alias = "OrgId")]
    pub org_id: u32,
    /// Metric name
    #[serde(alias = "Name")]
    pub name: String,
    /// Graphite path; superseded by `name` and dropped on mapping
    #[serde(alias = "Metric", default)]
    pub metric: String,
    /// Sampling interval in seconds
    #[serde(alias = "Interval")]
    pub interval: u32,
    /// Observed value
    #[serde(alias = "Value")]
    pub value: f64,
    /// Unit of the value
    #[serde(alias = "Unit", default)]
    pub unit: String,
    /// Unix timestamp; any integer width on the wire
    #[serde(alias = "Time")]
    pub time: i64,
    /// Measurement type
    #[serde(alias = "Mtype", default)]
    pub mtype: String,
    /// May be `null`
    #[serde(alias = "Tags", default)]
    pub tags: Option<Vec<String>>,
}

impl From<LegacyMetricData> for MetricData {
    fn from(old: LegacyMetricData) -> Self {
        MetricData {
            id: old.id,
            org_id: old.org_id,
            name: old.name,
            interval: old.interval,
            value: old.value,
            unit: old.unit,
            time: old.time,
            mtype: old.mtype,
            tags: old.tags.unwrap_or_default(),
        }
    }
}
