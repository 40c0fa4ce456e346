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

//! Partition assignment
//!
//! Producers and routers must agree on which partition a series lands on,
//! across restarts and across implementations. Every method here is a pure
//! function of the record and the partition count.
//!
//! # Methods
//!
//! | Method | Input | Hash | Reduction |
//! |---|---|---|---|
//! | `ByOrg` | org id, 4 bytes LE | FNV-1a 32 | modulo |
//! | `BySeries` | name | FNV-1a 32 | modulo |
//! | `BySeriesWithTags` | name-with-tags | xxHash64 | jump consistent hash |
//! | `BySeriesWithTagsFnv` | name-with-tags | FNV-1a 32 | modulo |
//!
//! `BySeriesWithTags` is the one to use for new deployments: growing the
//! partition count from N to N+1 moves only about 1/(N+1) of the series.
//! The modulo methods reshuffle most series on any change of count.

use crate::error::{SchemaError, SchemaResult};
use crate::metric::{MetricData, MetricDefinition, TAG_SEPARATOR};
use crate::tags::is_name_tag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use xxhash_rust::xxh64::Xxh64;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// How a record is mapped to a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PartitionByMethod {
    /// All series of an organization share a partition
    ByOrg = 0,
    /// Series sharing a name share a partition, whatever their tags
    BySeries = 1,
    /// Name plus tags, consistent hashing
    BySeriesWithTags = 2,
    /// Name plus tags, modulo reduction; for deployments that predate
    /// `BySeriesWithTags`
    BySeriesWithTagsFnv = 3,
}

impl PartitionByMethod {
    /// Decode a method from its numeric selector
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownPartitionMethod` for unassigned codes.
    pub fn from_u8(code: u8) -> SchemaResult<Self> {
        match code {
            0 => Ok(PartitionByMethod::ByOrg),
            1 => Ok(PartitionByMethod::BySeries),
            2 => Ok(PartitionByMethod::BySeriesWithTags),
            3 => Ok(PartitionByMethod::BySeriesWithTagsFnv),
            _ => Err(SchemaError::UnknownPartitionMethod(code.to_string())),
        }
    }

    /// Name used in configuration files
    pub fn as_str(self) -> &'static str {
        match self {
            PartitionByMethod::ByOrg => "byOrg",
            PartitionByMethod::BySeries => "bySeries",
            PartitionByMethod::BySeriesWithTags => "bySeriesWithTags",
            PartitionByMethod::BySeriesWithTagsFnv => "bySeriesWithTagsFnv",
        }
    }
}

impl fmt::Display for PartitionByMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionByMethod {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "byOrg" => Ok(PartitionByMethod::ByOrg),
            "bySeries" => Ok(PartitionByMethod::BySeries),
            "bySeriesWithTags" => Ok(PartitionByMethod::BySeriesWithTags),
            "bySeriesWithTagsFnv" => Ok(PartitionByMethod::BySeriesWithTagsFnv),
            other => Err(SchemaError::UnknownPartitionMethod(other.to_string())),
        }
    }
}

/// A record that can be validated, identified and partitioned
pub trait PartitionedMetric {
    /// Check the record is fit for identity derivation
    fn validate(&self) -> SchemaResult<()>;

    /// Derive and store the record's identity
    fn set_id(&mut self);

    /// Partition in `[0, partitions)` this record belongs to
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidPartitionCount` if `partitions <= 0`.
    fn partition_id(&self, method: PartitionByMethod, partitions: i32) -> SchemaResult<i32>;
}

/// FNV-1a, 32-bit
#[derive(Debug, Clone, Copy)]
struct Fnv32a(u32);

impl Fnv32a {
    fn new() -> Self {
        Fnv32a(FNV32_OFFSET_BASIS)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u32::from(b);
            self.0 = self.0.wrapping_mul(FNV32_PRIME);
        }
    }

    fn finish(self) -> u32 {
        self.0
    }
}

/// Sink for the canonical name-with-tags byte stream
trait ByteSink {
    fn feed(&mut self, bytes: &[u8]);
}

impl ByteSink for Fnv32a {
    fn feed(&mut self, bytes: &[u8]) {
        self.write(bytes);
    }
}

impl ByteSink for Xxh64 {
    fn feed(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }
}

/// Streams name-with-tags into `sink` without building the string
fn feed_name_with_tags<S: ByteSink>(sink: &mut S, name: &str, tags: &[String]) {
    let mut sorted: Vec<&str> = tags
        .iter()
        .map(String::as_str)
        .filter(|t| !is_name_tag(t))
        .collect();
    sorted.sort_unstable();

    let mut sep = [0u8; 4];
    let sep = TAG_SEPARATOR.encode_utf8(&mut sep).as_bytes();

    sink.feed(name.as_bytes());
    for tag in sorted {
        sink.feed(sep);
        sink.feed(tag.as_bytes());
    }
}

/// Jump consistent hash (Lamping & Veach, 2014)
///
/// Maps `key` to a bucket in `[0, buckets)`; growing `buckets` by one moves
/// only keys that land in the new bucket.
pub fn jump_hash(mut key: u64, buckets: i32) -> i32 {
    let mut b: i64 = -1;
    let mut j: i64 = 0;
    while j < i64::from(buckets) {
        b = j;
        key = key.wrapping_mul(2_862_933_555_777_941_757).wrapping_add(1);
        j = ((b + 1) as f64 * ((1i64 << 31) as f64 / ((key >> 33) + 1) as f64)) as i64;
    }
    b as i32
}

/// Reduce a 32-bit hash by modulo, the way every modulo method does
fn reduce_modulo(hash: u32, partitions: i32) -> i32 {
    // the hash is reinterpreted as signed before reducing
    let p = (hash as i32) % partitions;
    if p < 0 {
        -p
    } else {
        p
    }
}

fn check_partitions(partitions: i32) -> SchemaResult<()> {
    if partitions <= 0 {
        return Err(SchemaError::InvalidPartitionCount(partitions));
    }
    Ok(())
}

/// Where the name-with-tags bytes come from
enum SeriesKey<'a> {
    /// Already canonical
    Canonical(&'a str),
    /// Name and unsorted tags
    Parts(&'a str, &'a [String]),
}

fn partition_for(
    method: PartitionByMethod,
    partitions: i32,
    org_id: u32,
    name: &str,
    series: SeriesKey<'_>,
) -> SchemaResult<i32> {
    check_partitions(partitions)?;

    let partition = match method {
        PartitionByMethod::ByOrg => {
            let mut h = Fnv32a::new();
            h.write(&org_id.to_le_bytes());
            reduce_modulo(h.finish(), partitions)
        }
        PartitionByMethod::BySeries => {
            let mut h = Fnv32a::new();
            h.write(name.as_bytes());
            reduce_modulo(h.finish(), partitions)
        }
        PartitionByMethod::BySeriesWithTags => {
            let mut h = Xxh64::new(0);
            match series {
                SeriesKey::Canonical(s) => h.update(s.as_bytes()),
                SeriesKey::Parts(name, tags) => feed_name_with_tags(&mut h, name, tags),
            }
            jump_hash(h.digest(), partitions)
        }
        PartitionByMethod::BySeriesWithTagsFnv => {
            let mut h = Fnv32a::new();
            match series {
                SeriesKey::Canonical(s) => h.write(s.as_bytes()),
                SeriesKey::Parts(name, tags) => feed_name_with_tags(&mut h, name, tags),
            }
            reduce_modulo(h.finish(), partitions)
        }
    };

    Ok(partition)
}

impl PartitionedMetric for MetricData {
    fn validate(&self) -> SchemaResult<()> {
        MetricData::validate(self)
    }

    fn set_id(&mut self) {
        MetricData::set_id(self);
    }

    fn partition_id(&self, method: PartitionByMethod, partitions: i32) -> SchemaResult<i32> {
        partition_for(
            method,
            partitions,
            self.org_id,
            &self.name,
            SeriesKey::Parts(&self.name, &self.tags),
        )
    }
}

impl PartitionedMetric for MetricDefinition {
    fn validate(&self) -> SchemaResult<()> {
        MetricDefinition::validate(self)
    }

    fn set_id(&mut self) {
        MetricDefinition::set_id(self);
    }

    /// Reuses the memoized name-with-tags when there is one, so the
    /// partition always follows the same canonical form as the index.
    fn partition_id(&self, method: PartitionByMethod, partitions: i32) -> SchemaResult<i32> {
        let series = match self.cached_name_with_tags() {
            Some(cached) => SeriesKey::Canonical(cached),
            None => SeriesKey::Parts(self.name(), self.tags()),
        };
        partition_for(method, partitions, self.org_id, self.name(), series)
    }
}
