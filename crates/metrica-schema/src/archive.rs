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

//! Archive descriptors for rollup data
//!
//! An [`Archive`] names one rollup series: which aggregate (avg, sum, ...)
//! over which span of time. It is packed into 16 bits so the storage engine
//! can carry it next to every chunk.
//!
//! # Format
//!
//! ```text
//! [15..8] span code: index into SPANS
//! [ 7..0] aggregation method
//! ```
//!
//! `SPANS` is shared with the storage engine. Appending to it is safe;
//! reordering or removing entries changes the meaning of stored archives.

use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported rollup spans in seconds, strictly ascending
pub const SPANS: [u32; 25] = [
    2,
    5,
    10,
    15,
    30,
    60,
    90,
    2 * 60,
    150,
    5 * 60,
    10 * 60,
    15 * 60,
    20 * 60,
    30 * 60,
    45 * 60,
    3600,
    3600 + 30 * 60,
    2 * 3600,
    3 * 3600,
    4 * 3600,
    5 * 3600,
    6 * 3600,
    8 * 3600,
    12 * 3600,
    24 * 3600,
];

/// Aggregation method of a rollup archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Method {
    /// No aggregation; only meaningful in the zero archive
    Unset = 0,
    /// Average
    Avg = 1,
    /// Sum
    Sum = 2,
    /// Last value
    Lst = 3,
    /// Maximum
    Max = 4,
    /// Minimum
    Min = 5,
    /// Count
    Cnt = 6,
}

impl Method {
    /// All aggregating methods, in code order
    pub const ALL: [Method; 6] = [
        Method::Avg,
        Method::Sum,
        Method::Lst,
        Method::Max,
        Method::Min,
        Method::Cnt,
    ];

    /// Decode a method from its 8-bit code
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(Method::Unset),
            1 => Some(Method::Avg),
            2 => Some(Method::Sum),
            3 => Some(Method::Lst),
            4 => Some(Method::Max),
            5 => Some(Method::Min),
            6 => Some(Method::Cnt),
            _ => None,
        }
    }

    /// Short name used in archive rendering
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Unset => "none",
            Method::Avg => "avg",
            Method::Sum => "sum",
            Method::Lst => "lst",
            Method::Max => "max",
            Method::Min => "min",
            Method::Cnt => "cnt",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Packed (method, span) rollup descriptor
///
/// The zero value is the "no archive" sentinel and decodes as
/// `(Method::Unset, 0)`.
///
/// # Examples
///
/// ```
/// use metrica_schema::{Archive, Method};
///
/// let arch = Archive::new(Method::Avg, 15).unwrap();
/// assert_eq!(arch.raw(), 0x301);
/// assert_eq!(arch.to_string(), "avg_15");
/// assert_eq!(arch.decode(), (Method::Avg, 15));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Archive(u16);

impl Archive {
    /// Pack a method and span
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnsetArchiveMethod` for [`Method::Unset`]; the
    /// zero archive is only ever `Archive::default()`. Returns
    /// `SchemaError::UnsupportedSpan` if `span` is not in [`SPANS`].
    pub fn new(method: Method, span: u32) -> SchemaResult<Self> {
        if method == Method::Unset {
            return Err(SchemaError::UnsetArchiveMethod);
        }
        let code = SPANS
            .binary_search(&span)
            .map_err(|_| SchemaError::UnsupportedSpan(span))?;
        // SPANS has far fewer than 256 entries
        Ok(Archive(((code as u16) << 8) | method as u16))
    }

    /// Rebuild an archive from its packed representation
    ///
    /// # Errors
    ///
    /// Fails if the method byte or the span code is out of range.
    pub fn from_raw(raw: u16) -> SchemaResult<Self> {
        let method = (raw & 0xFF) as u8;
        let code = usize::from(raw >> 8);
        if Method::from_u8(method).is_none() || code >= SPANS.len() {
            return Err(SchemaError::UnsupportedSpan(u32::from(raw)));
        }
        Ok(Archive(raw))
    }

    /// Packed representation
    pub fn raw(self) -> u16 {
        self.0
    }

    /// Aggregation method
    pub fn method(self) -> Method {
        // every constructor checks the method byte
        Method::from_u8((self.0 & 0xFF) as u8).unwrap_or(Method::Unset)
    }

    /// Rollup span in seconds; 0 for the zero archive
    pub fn span(self) -> u32 {
        if self.0 == 0 {
            return 0;
        }
        SPANS[usize::from(self.0 >> 8)]
    }

    /// Unpack into (method, span)
    pub fn decode(self) -> (Method, u32) {
        (self.method(), self.span())
    }

    /// True for the "no archive" sentinel
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.method(), self.span())
    }
}

impl TryFrom<u16> for Archive {
    type Error = SchemaError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Archive::from_raw(raw)
    }
}

impl From<Archive> for u16 {
    fn from(arch: Archive) -> Self {
        arch.0
    }
}
