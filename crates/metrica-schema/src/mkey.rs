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

//! Metric key (MKey): the stable identity of a metric series
//!
//! An MKey pairs a 128-bit MD5 digest of the series' defining attributes with
//! the organization that owns the series. Its textual form is
//! `"<org>.<32 hex chars>"`, which is also how it travels over the wire.

use crate::error::{SchemaError, SchemaResult};
use md5::{Digest, Md5};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of the identity digest
pub const KEY_LEN: usize = 16;

/// 128-bit identity digest
pub type Key = [u8; KEY_LEN];

/// Metric identity: content digest plus owning organization
///
/// # Examples
///
/// ```
/// use metrica_schema::MKey;
///
/// let mkey = MKey::hash(b"some.metric\0ms\0gauge\x0010", 42);
/// let text = mkey.to_string();
/// assert!(text.starts_with("42."));
/// assert_eq!(text.parse::<MKey>().unwrap(), mkey);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MKey {
    /// MD5 digest of the defining attributes
    pub key: Key,
    /// Owning organization
    pub org: u32,
}

impl MKey {
    /// Create an MKey by hashing the given bytes
    pub fn hash(data: &[u8], org: u32) -> Self {
        let digest = Md5::digest(data);
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&digest);
        MKey { key, org }
    }

    /// Parse an MKey from its `"<org>.<hex>"` form
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidMKey` if the separator or org is malformed,
    /// and `SchemaError::Hex` if the digest is not valid hex.
    pub fn parse(s: &str) -> SchemaResult<Self> {
        let (org, digest) = s
            .split_once('.')
            .ok_or_else(|| SchemaError::invalid_mkey(format!("missing '.' in {:?}", s)))?;

        let org: u32 = org
            .parse()
            .map_err(|_| SchemaError::invalid_mkey(format!("bad org in {:?}", s)))?;

        if digest.len() != KEY_LEN * 2 {
            return Err(SchemaError::invalid_mkey(format!(
                "digest must be {} hex chars, got {}",
                KEY_LEN * 2,
                digest.len()
            )));
        }

        let mut key = [0u8; KEY_LEN];
        hex::decode_to_slice(digest, &mut key)?;
        Ok(MKey { key, org })
    }

    /// Hex rendering of the digest only
    pub fn to_hex(&self) -> String {
        hex::encode(self.key)
    }

    /// True for the all-zero key of a record whose identity was never derived
    pub fn is_zero(&self) -> bool {
        self.org == 0 && self.key == [0u8; KEY_LEN]
    }
}

impl fmt::Display for MKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.org, self.to_hex())
    }
}

impl fmt::Debug for MKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MKey({})", self)
    }
}

impl FromStr for MKey {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MKey::parse(s)
    }
}

impl Serialize for MKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MKey::parse(&s).map_err(serde::de::Error::custom)
    }
}
