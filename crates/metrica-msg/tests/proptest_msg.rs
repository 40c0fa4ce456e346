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
#![allow(clippy::unwrap_used)]
//! Property-Based Tests for the wire envelope
//!
//! Uses proptest to verify:
//! - MessagePack batches survive a round trip unchanged
//! - v1 batches keep every mapped field, including wide timestamps
//! - Decoding arbitrary bytes returns an error instead of panicking

use metrica_msg::{
    decode_data_point, decode_metric_data_array, encode_metric_data_array, ArrayFormat,
    LegacyMetricData, LEGACY_ID_LEN,
};
use metrica_schema::MetricData;
use proptest::prelude::*;

prop_compose! {
    fn arb_metric()(
        org_id in 1u32..,
        name in "[a-z]{1,10}(\\.[a-z]{1,10}){0,3}",
        interval in prop_oneof![Just(1u32), Just(10), Just(60)],
        value in any::<f64>().prop_filter("finite", |v| v.is_finite()),
        time in any::<i64>(),
        tags in prop::collection::vec("[a-z]{1,6}=[a-z0-9]{1,6}", 0..5),
    ) -> MetricData {
        let mut md = MetricData {
            org_id,
            name,
            interval,
            value,
            unit: "ms".to_string(),
            time,
            mtype: "gauge".to_string(),
            tags,
            ..Default::default()
        };
        md.set_id();
        md
    }
}

#[test]
fn proptest_msgp_array_round_trip() {
    proptest!(|(metrics in prop::collection::vec(arb_metric(), 0..20))| {
        let b = encode_metric_data_array(&metrics, ArrayFormat::ArrayMsgp).unwrap();
        let decoded = decode_metric_data_array(&b).unwrap();
        prop_assert_eq!(decoded, metrics);
    });
}

#[test]
fn proptest_v1_msgp_array_maps_fields() {
    proptest!(|(metrics in prop::collection::vec(arb_metric(), 1..10))| {
        let old: Vec<LegacyMetricData> = metrics
            .iter()
            .map(|md| LegacyMetricData {
                id: md.id.clone(),
                org_id: md.org_id,
                name: md.name.clone(),
                metric: md.name.clone(),
                interval: md.interval,
                value: md.value,
                unit: md.unit.clone(),
                time: md.time,
                mtype: md.mtype.clone(),
                tags: Some(md.tags.clone()),
            })
            .collect();

        let mut b = vec![ArrayFormat::V1ArrayMsgp.as_byte()];
        b.extend_from_slice(&[0u8; LEGACY_ID_LEN]);
        b.extend(rmp_serde::to_vec_named(&old).unwrap());

        prop_assert_eq!(decode_metric_data_array(&b).unwrap(), metrics);
    });
}

#[test]
fn proptest_decode_never_panics() {
    proptest!(|(bytes in prop::collection::vec(any::<u8>(), 0..64))| {
        let _ = decode_metric_data_array(&bytes);
        let _ = decode_data_point(&bytes);
    });
}
