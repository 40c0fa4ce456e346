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

//! Format discriminators
//!
//! Every envelope starts with one byte naming the payload format. Batches
//! (ingested over HTTP) and single records (ingested from a queue) use two
//! separate discriminator families that both start at zero.

use crate::error::MsgError;
use std::fmt;
use std::str::FromStr;

/// Length of the ignored id field that follows a v1 array discriminator
pub const LEGACY_ID_LEN: usize = 8;

/// Discriminator of a batch of full records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ArrayFormat {
    /// v1 records, JSON array, preceded by a legacy id
    V1ArrayJson = 0,
    /// v1 records, MessagePack array, preceded by a legacy id
    V1ArrayMsgp = 1,
    /// Current records, JSON array
    ArrayJson = 2,
    /// Current records, MessagePack array
    ArrayMsgp = 3,
}

impl ArrayFormat {
    /// Look up a discriminator byte
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(ArrayFormat::V1ArrayJson),
            1 => Some(ArrayFormat::V1ArrayMsgp),
            2 => Some(ArrayFormat::ArrayJson),
            3 => Some(ArrayFormat::ArrayMsgp),
            _ => None,
        }
    }

    /// Discriminator byte
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Whether this is a decode-only v1 generation
    pub fn is_legacy(self) -> bool {
        matches!(self, ArrayFormat::V1ArrayJson | ArrayFormat::V1ArrayMsgp)
    }

    /// Bytes before the payload starts
    pub fn header_len(self) -> usize {
        if self.is_legacy() {
            1 + LEGACY_ID_LEN
        } else {
            1
        }
    }

    /// Format name as used in error messages
    pub fn as_str(self) -> &'static str {
        match self {
            ArrayFormat::V1ArrayJson => "FormatMetricDataV1ArrayJson",
            ArrayFormat::V1ArrayMsgp => "FormatMetricDataV1ArrayMsgp",
            ArrayFormat::ArrayJson => "FormatMetricDataArrayJson",
            ArrayFormat::ArrayMsgp => "FormatMetricDataArrayMsgp",
        }
    }
}

impl fmt::Display for ArrayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the encoder names accepted in configuration.
///
/// Only current generations can be selected; v1 formats are decode-only.
impl FromStr for ArrayFormat {
    type Err = MsgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ArrayFormat::ArrayJson),
            "msgp" | "msgpack" => Ok(ArrayFormat::ArrayMsgp),
            _ => Err(MsgError::UnknownFormatName(s.to_string())),
        }
    }
}

/// Discriminator of a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PointFormat {
    /// Full record, MessagePack
    MetricData = 0,
    /// Point-only record, MessagePack
    MetricPoint = 1,
}

impl PointFormat {
    /// Look up a discriminator byte
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(PointFormat::MetricData),
            1 => Some(PointFormat::MetricPoint),
            _ => None,
        }
    }

    /// Discriminator byte
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Format name as used in error messages
    pub fn as_str(self) -> &'static str {
        match self {
            PointFormat::MetricData => "FormatMetricData",
            PointFormat::MetricPoint => "FormatMetricPoint",
        }
    }
}

impl fmt::Display for PointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
