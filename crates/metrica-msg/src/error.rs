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

//! Wire codec error types

use thiserror::Error;

/// Result type alias for wire codec operations
pub type MsgResult<T> = Result<T, MsgError>;

/// Boxed payload error from the underlying serializer
pub type PayloadError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while encoding or decoding wire envelopes
#[derive(Error, Debug)]
pub enum MsgError {
    /// The buffer is shorter than its declared format requires
    #[error("too small: need {needed} bytes, got {actual}")]
    TooSmall {
        /// Minimum length for the declared format
        needed: usize,
        /// Length actually received
        actual: usize,
    },

    /// The discriminator byte names no known format
    #[error("unknown format {0}")]
    UnknownFormat(u8),

    /// A configured format name is not known
    #[error("unknown format name: {0}")]
    UnknownFormatName(String),

    /// The payload could not be deserialized under its format
    #[error("failure to unmarshal message body via format {format}: {source}")]
    Decode {
        /// Format the payload was decoded as
        format: &'static str,
        /// Underlying deserializer error
        #[source]
        source: PayloadError,
    },

    /// The payload could not be serialized
    #[error("failed to marshal payload: {0}")]
    Encode(String),
}

impl MsgError {
    /// Create a buffer-too-small error
    pub fn too_small(needed: usize, actual: usize) -> Self {
        MsgError::TooSmall { needed, actual }
    }

    /// Create a decode error, boxing the deserializer cause
    pub fn decode<E>(format: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MsgError::Decode {
            format,
            source: Box::new(source),
        }
    }

    /// Create an encode error
    pub fn encode<S: Into<String>>(msg: S) -> Self {
        MsgError::Encode(msg.into())
    }

    /// Check if this is a buffer-too-small error
    pub fn is_too_small(&self) -> bool {
        matches!(self, MsgError::TooSmall { .. })
    }

    /// Check if this is an unknown-format error
    pub fn is_unknown_format(&self) -> bool {
        matches!(self, MsgError::UnknownFormat(_))
    }

    /// Check if this is a payload decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, MsgError::Decode { .. })
    }
}
