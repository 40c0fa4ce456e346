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

//! Wire envelope for Metrica records
//!
//! Every message is one format byte followed by a payload. Batches are JSON
//! or MessagePack arrays of [`MetricData`](metrica_schema::MetricData);
//! single records are MessagePack full or point-only records. Older
//! producer generations are decoded transparently.
//!
//! # Example
//!
//! ```rust
//! use metrica_msg::{decode_data_point, encode_data_point};
//! use metrica_schema::{DataPoint, MetricData, MetricPoint};
//!
//! let mut md = MetricData {
//!     org_id: 1,
//!     name: "cpu.user".to_string(),
//!     interval: 10,
//!     mtype: "gauge".to_string(),
//!     ..Default::default()
//! };
//! md.set_id();
//!
//! let point = DataPoint::Point(MetricPoint::from_data(&md)?);
//! let bytes = encode_data_point(&point)?;
//! assert_eq!(decode_data_point(&bytes)?, point);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod error;
pub mod format;
pub mod legacy;

pub use codec::{
    decode_data_point, decode_metric_data_array, encode_data_point, encode_data_point_into,
    encode_metric_data_array, is_legacy_record_marker, LEGACY_RECORD,
};
pub use error::{MsgError, MsgResult, PayloadError};
pub use format::{ArrayFormat, PointFormat, LEGACY_ID_LEN};
pub use legacy::LegacyMetricData;
