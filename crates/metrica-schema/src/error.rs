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

//! Schema error types

use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors produced while validating, identifying or partitioning metrics
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The organization id is zero
    #[error("org-id cannot be 0")]
    InvalidOrgIdZero,

    /// The interval is zero
    #[error("interval cannot be 0")]
    InvalidIntervalZero,

    /// The metric name is empty
    #[error("name cannot be empty")]
    InvalidEmptyName,

    /// The measurement type is not one of the known kinds
    #[error("invalid mtype: {0:?}")]
    InvalidMtype(String),

    /// At least one tag is not of the form `key=value`
    #[error("invalid tag format")]
    InvalidTagFormat,

    /// The partition method selector is not known
    #[error("unknown partition method: {0}")]
    UnknownPartitionMethod(String),

    /// Partition count must be positive
    #[error("partition count must be > 0, got {0}")]
    InvalidPartitionCount(i32),

    /// The rollup span has no entry in the span table
    #[error("unsupported archive span: {0}s")]
    UnsupportedSpan(u32),

    /// Only the zero archive may carry the `none` method
    #[error("archive method cannot be none")]
    UnsetArchiveMethod,

    /// A textual metric key could not be parsed
    #[error("invalid metric key: {0}")]
    InvalidMKey(String),

    /// Hex decoding of a metric key digest failed
    #[error("invalid metric key digest: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl SchemaError {
    /// Create an invalid mtype error
    pub fn invalid_mtype<S: Into<String>>(mtype: S) -> Self {
        SchemaError::InvalidMtype(mtype.into())
    }

    /// Create an invalid metric key error
    pub fn invalid_mkey<S: Into<String>>(msg: S) -> Self {
        SchemaError::InvalidMKey(msg.into())
    }

    /// Check if this error was raised by record validation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SchemaError::InvalidOrgIdZero
                | SchemaError::InvalidIntervalZero
                | SchemaError::InvalidEmptyName
                | SchemaError::InvalidMtype(_)
                | SchemaError::InvalidTagFormat
        )
    }

    /// Check if this is an invalid tag format error
    pub fn is_invalid_tag_format(&self) -> bool {
        matches!(self, SchemaError::InvalidTagFormat)
    }
}
