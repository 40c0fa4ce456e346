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

//! Point-only records
//!
//! Once a consumer has seen the full [`MetricData`] for a series, producers
//! may send just the identity and the new observation.

use crate::error::SchemaResult;
use crate::metric::MetricData;
use crate::mkey::MKey;
use serde::{Deserialize, Serialize};

/// Identity plus a single observation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Series identity
    pub id: MKey,
    /// Observed value
    pub value: f64,
    /// Unix timestamp in seconds
    pub time: u32,
}

impl MetricPoint {
    /// Project a full record onto its point.
    ///
    /// Timestamps outside the `u32` range saturate at the bounds.
    ///
    /// # Errors
    ///
    /// Fails if `data.id` is not a valid metric key.
    pub fn from_data(data: &MetricData) -> SchemaResult<Self> {
        Ok(MetricPoint {
            id: data.mkey()?,
            value: data.value,
            time: data.time.clamp(0, i64::from(u32::MAX)) as u32,
        })
    }
}

/// Either a full record or a point-only record
#[derive(Debug, Clone, PartialEq)]
pub enum DataPoint {
    /// Full record with all metadata
    Data(MetricData),
    /// Identity and observation only
    Point(MetricPoint),
}

impl DataPoint {
    /// Identity of the series this point belongs to
    pub fn mkey(&self) -> SchemaResult<MKey> {
        match self {
            DataPoint::Data(md) => md.mkey(),
            DataPoint::Point(mp) => Ok(mp.id),
        }
    }

    /// Observed value
    pub fn value(&self) -> f64 {
        match self {
            DataPoint::Data(md) => md.value,
            DataPoint::Point(mp) => mp.value,
        }
    }

    /// Observation timestamp
    pub fn time(&self) -> i64 {
        match self {
            DataPoint::Data(md) => md.time,
            DataPoint::Point(mp) => i64::from(mp.time),
        }
    }
}

impl From<MetricData> for DataPoint {
    fn from(md: MetricData) -> Self {
        DataPoint::Data(md)
    }
}

impl From<MetricPoint> for DataPoint {
    fn from(mp: MetricPoint) -> Self {
        DataPoint::Point(mp)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn data() -> MetricData {
        let mut md = MetricData {
            org_id: 5,
            name: "a.b".to_string(),
            interval: 10,
            value: 2.5,
            time: 1_700_000_000,
            mtype: "gauge".to_string(),
            ..Default::default()
        };
        md.set_id();
        md
    }

    #[test]
    fn test_point_from_data() {
        let md = data();
        let mp = MetricPoint::from_data(&md).unwrap();
        assert_eq!(mp.id.to_string(), md.id);
        assert_eq!(mp.value, 2.5);
        assert_eq!(mp.time, 1_700_000_000);
    }

    #[test]
    fn test_point_time_saturates() {
        let md = MetricData {
            time: -5,
            ..data()
        };
        assert_eq!(MetricPoint::from_data(&md).unwrap().time, 0);

        let md = MetricData {
            time: i64::MAX,
            ..data()
        };
        assert_eq!(MetricPoint::from_data(&md).unwrap().time, u32::MAX);
    }

    #[test]
    fn test_data_point_shares_identity() {
        let md = data();
        let mp = MetricPoint::from_data(&md).unwrap();
        let full = DataPoint::from(md);
        let point = DataPoint::from(mp);
        assert_eq!(full.mkey().unwrap(), point.mkey().unwrap());
        assert_eq!(full.time(), point.time());
        assert_eq!(full.value(), point.value());
    }
}
