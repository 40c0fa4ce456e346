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

//! Metric records and identity derivation
//!
//! Two record shapes share one identity scheme:
//!
//! - [`MetricData`]: a single observation as produced by ingest. Carries its
//!   identity as text (`"<org>.<hex>"`) so it can be passed around opaquely.
//! - [`MetricDefinition`]: the series description kept by an index. Carries
//!   its identity as an [`MKey`], memoizes the canonical name-with-tags, and
//!   holds two fields (`last_update`, `partition`) that a background process
//!   updates after the definition has been shared with readers.
//!
//! # Identity
//!
//! The identity digest is MD5 over:
//!
//! ```text
//! name 0x00 unit 0x00 mtype 0x00 interval(decimal) [0x00 tag]*
//! ```
//!
//! with tags sorted bytewise and the `name=` alias tag skipped.

use crate::error::{SchemaError, SchemaResult};
use crate::mkey::MKey;
use crate::naming::sanitize_name_as_tag_value;
use crate::tags::{is_name_tag, is_valid_tag_set};
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Known measurement types
pub const MTYPES: [&str; 5] = ["gauge", "rate", "count", "counter", "timestamp"];

/// Separator between fields of the identity byte sequence
const ID_SEPARATOR: u8 = 0;

/// Separator between name and tags in the canonical name-with-tags
pub const TAG_SEPARATOR: char = ';';

/// Returns true if `mtype` is one of [`MTYPES`]
pub fn is_valid_mtype(mtype: &str) -> bool {
    MTYPES.contains(&mtype)
}

fn validate_fields(
    org_id: u32,
    interval: u32,
    name: &str,
    mtype: &str,
    tags: &[String],
) -> SchemaResult<()> {
    if org_id == 0 {
        return Err(SchemaError::InvalidOrgIdZero);
    }
    if interval == 0 {
        return Err(SchemaError::InvalidIntervalZero);
    }
    if name.is_empty() {
        return Err(SchemaError::InvalidEmptyName);
    }
    if !is_valid_mtype(mtype) {
        return Err(SchemaError::invalid_mtype(mtype));
    }
    if !is_valid_tag_set(tags) {
        return Err(SchemaError::InvalidTagFormat);
    }
    Ok(())
}

/// Sorts `tags` in place and derives the identity over the given fields
fn derive_mkey(
    org_id: u32,
    name: &str,
    unit: &str,
    mtype: &str,
    interval: u32,
    tags: &mut [String],
) -> MKey {
    tags.sort_unstable();

    let interval = interval.to_string();
    let tags_len: usize = tags.iter().map(|t| t.len() + 1).sum();
    let mut buf =
        Vec::with_capacity(name.len() + unit.len() + mtype.len() + interval.len() + 3 + tags_len);
    buf.extend_from_slice(name.as_bytes());
    buf.push(ID_SEPARATOR);
    buf.extend_from_slice(unit.as_bytes());
    buf.push(ID_SEPARATOR);
    buf.extend_from_slice(mtype.as_bytes());
    buf.push(ID_SEPARATOR);
    buf.extend_from_slice(interval.as_bytes());

    for tag in tags.iter().filter(|t| !is_name_tag(t)) {
        buf.push(ID_SEPARATOR);
        buf.extend_from_slice(tag.as_bytes());
    }

    MKey::hash(&buf, org_id)
}

/// Builds the canonical name-with-tags: the name, then `;tag` for every
/// non-alias tag in sorted order. `tags` is left untouched.
pub fn canonical_name_with_tags<S: AsRef<str>>(name: &str, tags: &[S]) -> String {
    let mut sorted: Vec<&str> = tags
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !is_name_tag(t))
        .collect();
    sorted.sort_unstable();

    let mut out = String::with_capacity(name.len() + sorted.iter().map(|t| t.len() + 1).sum::<usize>());
    out.push_str(name);
    for tag in sorted {
        out.push(TAG_SEPARATOR);
        out.push_str(tag);
    }
    out
}

/// Go-style producers emit `null` for an empty tag list
fn nullable_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single metric observation with all of its metadata
///
/// Field names are snake_case on the wire; producers that key records by
/// PascalCase field names (`OrgId`, `Mtype`, ...) are accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    /// Identity in `"<org>.<hex>"` form, set by [`MetricData::set_id`]
    #[serde(alias = "Id")]
    pub id: String,
    /// Owning organization
    #[serde(alias = "OrgId")]
    pub org_id: u32,
    /// Metric name
    #[serde(alias = "Name")]
    pub name: String,
    /// Sampling interval in seconds
    #[serde(alias = "Interval")]
    pub interval: u32,
    /// Observed value
    #[serde(alias = "Value")]
    pub value: f64,
    /// Unit of the value
    #[serde(alias = "Unit")]
    pub unit: String,
    /// Unix timestamp in seconds
    #[serde(alias = "Time")]
    pub time: i64,
    /// Measurement type, one of [`MTYPES`]
    #[serde(alias = "Mtype")]
    pub mtype: String,
    /// `key=value` tags
    #[serde(alias = "Tags", default, deserialize_with = "nullable_tags")]
    pub tags: Vec<String>,
}

impl MetricData {
    /// Check the record is fit for identity derivation and transmission
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in order: org id, interval, name,
    /// mtype, tags.
    pub fn validate(&self) -> SchemaResult<()> {
        validate_fields(self.org_id, self.interval, &self.name, &self.mtype, &self.tags)
            .inspect_err(|e| {
                debug!(org_id = self.org_id, name = %self.name, error = %e, "metric data rejected");
            })
    }

    /// Derive the identity and store it in `id`.
    ///
    /// Sorts `tags` in place; the sorted order is canonical from then on.
    pub fn set_id(&mut self) {
        let mkey = derive_mkey(
            self.org_id,
            &self.name,
            &self.unit,
            &self.mtype,
            self.interval,
            &mut self.tags,
        );
        self.id = mkey.to_string();
    }

    /// Parse `id` into an [`MKey`]
    pub fn mkey(&self) -> SchemaResult<MKey> {
        MKey::parse(&self.id)
    }

    /// Canonical name-with-tags. Not cached: `MetricData` fields are public
    /// and may change between calls.
    pub fn name_with_tags(&self) -> String {
        canonical_name_with_tags(&self.name, &self.tags)
    }
}

/// Consistent snapshot of the background-updated fields of a definition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncedMeta {
    /// Unix timestamp of the most recent observation
    pub last_update: i64,
    /// Partition the series is currently assigned to
    pub partition: i32,
}

/// Series definition as held by an index
///
/// Identity-defining fields are written once, before the definition is
/// shared. `last_update` and `partition` sit in a lock-guarded cell and may
/// be changed through `&self` at any time.
///
/// `name` and `tags` are private: mutating them must drop the memoized
/// name-with-tags, which the setters do.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(from = "DefinitionRepr", into = "DefinitionRepr")]
pub struct MetricDefinition {
    /// Identity, set by [`MetricDefinition::set_id`]
    pub id: MKey,
    /// Owning organization
    pub org_id: u32,
    name: String,
    /// Sampling interval in seconds
    pub interval: u32,
    /// Unit of the values
    pub unit: String,
    /// Measurement type, one of [`MTYPES`]
    pub mtype: String,
    tags: Vec<String>,
    meta: RwLock<SyncedMeta>,
    name_with_tags: OnceLock<String>,
}

impl MetricDefinition {
    /// Create a definition; call [`MetricDefinition::set_id`] once the
    /// fields are final.
    pub fn new(
        org_id: u32,
        name: impl Into<String>,
        interval: u32,
        unit: impl Into<String>,
        mtype: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        MetricDefinition {
            org_id,
            name: name.into(),
            interval,
            unit: unit.into(),
            mtype: mtype.into(),
            tags,
            ..Default::default()
        }
    }

    /// Build a definition that shares no storage with `data`.
    ///
    /// `last_update` is taken from the observation time.
    ///
    /// # Errors
    ///
    /// Fails if `data.id` is not a valid metric key.
    pub fn from_metric_data(data: &MetricData) -> SchemaResult<Self> {
        let def = MetricDefinition {
            id: data.mkey()?,
            ..MetricDefinition::new(
                data.org_id,
                data.name.clone(),
                data.interval,
                data.unit.clone(),
                data.mtype.clone(),
                data.tags.clone(),
            )
        };
        def.set_last_update(data.time);
        Ok(def)
    }

    /// Metric name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags, including any `name=` alias
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Replace the name, dropping the memoized name-with-tags
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.name_with_tags.take();
    }

    /// Replace the tags, dropping the memoized name-with-tags
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
        self.name_with_tags.take();
    }

    /// Append one tag, dropping the memoized name-with-tags
    pub fn push_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
        self.name_with_tags.take();
    }

    /// Check the definition is fit for identity derivation
    pub fn validate(&self) -> SchemaResult<()> {
        validate_fields(self.org_id, self.interval, &self.name, &self.mtype, &self.tags)
            .inspect_err(|e| {
                debug!(org_id = self.org_id, name = %self.name, error = %e, "metric definition rejected");
            })
    }

    /// Derive the identity and store it in `id`.
    ///
    /// Sorts `tags` in place. Sorting does not change the canonical
    /// name-with-tags, so the memo stays valid.
    pub fn set_id(&mut self) {
        self.id = derive_mkey(
            self.org_id,
            &self.name,
            &self.unit,
            &self.mtype,
            self.interval,
            &mut self.tags,
        );
    }

    /// Canonical name-with-tags, computed on first use and cached.
    ///
    /// Safe to call concurrently on a shared definition: exactly one
    /// computation wins and every caller sees the same string.
    pub fn name_with_tags(&self) -> &str {
        self.name_with_tags.get_or_init(|| {
            trace!(name = %self.name, "computing name with tags");
            canonical_name_with_tags(&self.name, &self.tags)
        })
    }

    /// The memoized name-with-tags, if it has been computed
    pub fn cached_name_with_tags(&self) -> Option<&str> {
        self.name_with_tags.get().map(String::as_str)
    }

    /// Name usable as the value of the `name` tag
    pub fn name_sanitized_as_tag_value(&self) -> &str {
        sanitize_name_as_tag_value(&self.name)
    }

    /// Consistent snapshot of `last_update` and `partition`
    pub fn meta(&self) -> SyncedMeta {
        *self.meta.read()
    }

    /// Unix timestamp of the most recent observation
    pub fn last_update(&self) -> i64 {
        self.meta.read().last_update
    }

    /// Record a new observation time
    pub fn set_last_update(&self, ts: i64) {
        self.meta.write().last_update = ts;
    }

    /// Partition the series is assigned to
    pub fn partition(&self) -> i32 {
        self.meta.read().partition
    }

    /// Reassign the series to another partition
    pub fn set_partition(&self, partition: i32) {
        self.meta.write().partition = partition;
    }
}

impl Clone for MetricDefinition {
    fn clone(&self) -> Self {
        let meta = self.meta();
        let name_with_tags = OnceLock::new();
        if let Some(cached) = self.name_with_tags.get() {
            let _ = name_with_tags.set(cached.clone());
        }
        MetricDefinition {
            id: self.id,
            org_id: self.org_id,
            name: self.name.clone(),
            interval: self.interval,
            unit: self.unit.clone(),
            mtype: self.mtype.clone(),
            tags: self.tags.clone(),
            meta: RwLock::new(meta),
            name_with_tags,
        }
    }
}

impl PartialEq for MetricDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.org_id == other.org_id
            && self.name == other.name
            && self.interval == other.interval
            && self.unit == other.unit
            && self.mtype == other.mtype
            && self.tags == other.tags
            && self.meta() == other.meta()
    }
}

/// Serialized form of a definition. The `name=` alias is dropped on the way
/// out: it is a query convenience, never part of the stored record.
#[derive(Serialize, Deserialize)]
struct DefinitionRepr {
    #[serde(rename = "mkey")]
    id: MKey,
    org_id: u32,
    name: String,
    interval: u32,
    unit: String,
    mtype: String,
    #[serde(default, deserialize_with = "nullable_tags")]
    tags: Vec<String>,
    #[serde(rename = "lastUpdate", default)]
    last_update: i64,
    #[serde(default)]
    partition: i32,
}

impl From<DefinitionRepr> for MetricDefinition {
    fn from(repr: DefinitionRepr) -> Self {
        MetricDefinition {
            id: repr.id,
            org_id: repr.org_id,
            name: repr.name,
            interval: repr.interval,
            unit: repr.unit,
            mtype: repr.mtype,
            tags: repr.tags,
            meta: RwLock::new(SyncedMeta {
                last_update: repr.last_update,
                partition: repr.partition,
            }),
            name_with_tags: OnceLock::new(),
        }
    }
}

impl From<MetricDefinition> for DefinitionRepr {
    fn from(def: MetricDefinition) -> Self {
        let meta = def.meta();
        DefinitionRepr {
            id: def.id,
            org_id: def.org_id,
            name: def.name,
            interval: def.interval,
            unit: def.unit,
            mtype: def.mtype,
            tags: def.tags.into_iter().filter(|t| !is_name_tag(t)).collect(),
            last_update: meta.last_update,
            partition: meta.partition,
        }
    }
}
