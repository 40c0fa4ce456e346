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

//! Envelope encoding and decoding
//!
//! Batches are decoded through a registry keyed by discriminator byte. Each
//! entry owns its payload decoder and, for v1 generations, the mapping onto
//! the current record shape. Single records have exactly one fallback: a
//! buffer whose first byte is not a discriminator but opens a MessagePack
//! map is read whole as a v1 record written before discriminators existed.

use crate::error::{MsgError, MsgResult, PayloadError};
use crate::format::{ArrayFormat, PointFormat};
use crate::legacy::LegacyMetricData;
use metrica_schema::{DataPoint, MetricData, MetricPoint};
use tracing::debug;

/// Format name reported when the discriminator-less fallback fails
pub const LEGACY_RECORD: &str = "FormatMetricDataV1";

type DecodeArray = fn(&[u8]) -> Result<Vec<MetricData>, PayloadError>;

struct ArrayCodec {
    format: ArrayFormat,
    decode: DecodeArray,
}

static ARRAY_CODECS: [ArrayCodec; 4] = [
    ArrayCodec {
        format: ArrayFormat::V1ArrayJson,
        decode: decode_v1_json,
    },
    ArrayCodec {
        format: ArrayFormat::V1ArrayMsgp,
        decode: decode_v1_msgp,
    },
    ArrayCodec {
        format: ArrayFormat::ArrayJson,
        decode: decode_json,
    },
    ArrayCodec {
        format: ArrayFormat::ArrayMsgp,
        decode: decode_msgp,
    },
];

fn decode_json(payload: &[u8]) -> Result<Vec<MetricData>, PayloadError> {
    Ok(serde_json::from_slice(payload)?)
}

fn decode_msgp(payload: &[u8]) -> Result<Vec<MetricData>, PayloadError> {
    Ok(rmp_serde::from_slice(payload)?)
}

fn decode_v1_json(payload: &[u8]) -> Result<Vec<MetricData>, PayloadError> {
    let old: Vec<LegacyMetricData> = serde_json::from_slice(payload)?;
    Ok(old.into_iter().map(MetricData::from).collect())
}

fn decode_v1_msgp(payload: &[u8]) -> Result<Vec<MetricData>, PayloadError> {
    let old: Vec<LegacyMetricData> = rmp_serde::from_slice(payload)?;
    Ok(old.into_iter().map(MetricData::from).collect())
}

fn array_codec(format: ArrayFormat) -> Option<&'static ArrayCodec> {
    ARRAY_CODECS.iter().find(|c| c.format == format)
}

/// True for the bytes that can open a MessagePack map (fixmap, map16, map32).
///
/// v1 records were always encoded as maps, so their first byte is one of
/// these and never a [`PointFormat`] discriminator.
pub fn is_legacy_record_marker(b: u8) -> bool {
    matches!(b, 0x80..=0x8f | 0xde | 0xdf)
}

/// Encode a batch of records behind a discriminator byte.
///
/// # Errors
///
/// v1 formats are decode-only and yield [`MsgError::UnknownFormat`].
pub fn encode_metric_data_array(metrics: &[MetricData], format: ArrayFormat) -> MsgResult<Vec<u8>> {
    let mut buf = vec![format.as_byte()];
    match format {
        ArrayFormat::ArrayJson => {
            serde_json::to_writer(&mut buf, metrics).map_err(|e| MsgError::encode(e.to_string()))?
        }
        ArrayFormat::ArrayMsgp => rmp_serde::encode::write_named(&mut buf, metrics)
            .map_err(|e| MsgError::encode(e.to_string()))?,
        ArrayFormat::V1ArrayJson | ArrayFormat::V1ArrayMsgp => {
            return Err(MsgError::UnknownFormat(format.as_byte()))
        }
    }
    Ok(buf)
}

/// Decode a batch of records, mapping v1 generations onto the current shape.
///
/// # Errors
///
/// - [`MsgError::TooSmall`] if the buffer is empty, or a v1 buffer is shorter
///   than its discriminator plus legacy id
/// - [`MsgError::UnknownFormat`] for an unregistered discriminator
/// - [`MsgError::Decode`] if the payload does not parse
pub fn decode_metric_data_array(b: &[u8]) -> MsgResult<Vec<MetricData>> {
    let first = *b.first().ok_or_else(|| MsgError::too_small(1, 0))?;
    let codec = ArrayFormat::from_byte(first)
        .and_then(array_codec)
        .ok_or(MsgError::UnknownFormat(first))?;

    let header = codec.format.header_len();
    if b.len() < header {
        return Err(MsgError::too_small(header, b.len()));
    }

    let metrics = (codec.decode)(&b[header..]).map_err(|source| MsgError::Decode {
        format: codec.format.as_str(),
        source,
    })?;

    if codec.format.is_legacy() {
        debug!(
            format = %codec.format,
            records = metrics.len(),
            "decoded legacy metric data array"
        );
    }
    Ok(metrics)
}

/// Append the encoded record to `buf`
///
/// # Errors
///
/// Returns [`MsgError::Encode`] if serialization fails.
pub fn encode_data_point_into(point: &DataPoint, buf: &mut Vec<u8>) -> MsgResult<()> {
    let written = match point {
        DataPoint::Data(md) => {
            buf.push(PointFormat::MetricData.as_byte());
            rmp_serde::encode::write_named(buf, md)
        }
        DataPoint::Point(mp) => {
            buf.push(PointFormat::MetricPoint.as_byte());
            rmp_serde::encode::write_named(buf, mp)
        }
    };
    written.map_err(|e| MsgError::encode(e.to_string()))
}

/// Encode a single record behind its discriminator byte
///
/// # Errors
///
/// Returns [`MsgError::Encode`] if serialization fails.
pub fn encode_data_point(point: &DataPoint) -> MsgResult<Vec<u8>> {
    let mut buf = Vec::new();
    encode_data_point_into(point, &mut buf)?;
    Ok(buf)
}

/// Decode a single record.
///
/// # Errors
///
/// - [`MsgError::TooSmall`] for an empty buffer
/// - [`MsgError::UnknownFormat`] if the first byte is neither a discriminator
///   nor the start of a v1 record
/// - [`MsgError::Decode`] if the payload does not parse, including a failed
///   v1 fallback
pub fn decode_data_point(b: &[u8]) -> MsgResult<DataPoint> {
    let (&first, payload) = b.split_first().ok_or_else(|| MsgError::too_small(1, 0))?;

    match PointFormat::from_byte(first) {
        Some(format @ PointFormat::MetricData) => rmp_serde::from_slice::<MetricData>(payload)
            .map(DataPoint::Data)
            .map_err(|e| MsgError::decode(format.as_str(), e)),
        Some(format @ PointFormat::MetricPoint) => rmp_serde::from_slice::<MetricPoint>(payload)
            .map(DataPoint::Point)
            .map_err(|e| MsgError::decode(format.as_str(), e)),
        None if is_legacy_record_marker(first) => {
            debug!(first_byte = first, "no format byte, decoding as legacy metric data");
            let old: LegacyMetricData =
                rmp_serde::from_slice(b).map_err(|e| MsgError::decode(LEGACY_RECORD, e))?;
            Ok(DataPoint::Data(old.into()))
        }
        None => Err(MsgError::UnknownFormat(first)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample(i: u32) -> MetricData {
        let mut md = MetricData {
            org_id: i + 1,
            name: format!("litmus.http.error_state.foo.bar{}", i),
            interval: 10,
            value: f64::from(i) * 0.5,
            unit: "foo".to_string(),
            time: 1_500_000_000 + i64::from(i),
            mtype: "gauge".to_string(),
            tags: vec!["foo=bar".to_string(), "endpoint_id=25".to_string()],
            ..Default::default()
        };
        md.set_id();
        md
    }

    fn legacy(i: u32) -> LegacyMetricData {
        LegacyMetricData {
            id: format!("{}.{:032x}", i + 1, i),
            org_id: i + 1,
            name: format!("legacy.m{}", i),
            metric: format!("legacy.m{}", i),
            interval: 60,
            value: 1.25,
            unit: "ms".to_string(),
            time: 1_400_000_000 + i64::from(i),
            mtype: "rate".to_string(),
            tags: Some(vec!["a=b".to_string()]),
        }
    }

    /// Same fields as `MetricData`, keyed by PascalCase names
    #[derive(serde::Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct PascalRecord<'a> {
        id: &'a str,
        org_id: u32,
        name: &'a str,
        interval: u32,
        value: f64,
        unit: &'a str,
        time: i64,
        mtype: &'a str,
        tags: &'a [String],
    }

    fn pascal(md: &MetricData) -> PascalRecord<'_> {
        PascalRecord {
            id: &md.id,
            org_id: md.org_id,
            name: &md.name,
            interval: md.interval,
            value: md.value,
            unit: &md.unit,
            time: md.time,
            mtype: &md.mtype,
            tags: &md.tags,
        }
    }

    fn v1_envelope(format: ArrayFormat, payload: Vec<u8>) -> Vec<u8> {
        let mut b = vec![format.as_byte()];
        b.extend_from_slice(&[0xaa; 8]);
        b.extend(payload);
        b
    }

    #[test]
    fn test_registry_covers_every_array_format() {
        for (i, codec) in ARRAY_CODECS.iter().enumerate() {
            assert_eq!(usize::from(codec.format.as_byte()), i);
        }
    }

    #[test]
    fn test_array_msgp_round_trip() {
        let metrics: Vec<_> = (0..5).map(sample).collect();
        let b = encode_metric_data_array(&metrics, ArrayFormat::ArrayMsgp).unwrap();
        assert_eq!(b[0], 3);
        assert_eq!(decode_metric_data_array(&b).unwrap(), metrics);
    }

    #[test]
    fn test_array_json_round_trip() {
        let metrics: Vec<_> = (0..3).map(sample).collect();
        let b = encode_metric_data_array(&metrics, ArrayFormat::ArrayJson).unwrap();
        assert_eq!(b[0], 2);
        assert_eq!(b[1], b'[');
        assert_eq!(decode_metric_data_array(&b).unwrap(), metrics);
    }

    #[test]
    fn test_empty_array() {
        let b = encode_metric_data_array(&[], ArrayFormat::ArrayMsgp).unwrap();
        assert!(decode_metric_data_array(&b).unwrap().is_empty());
    }

    #[test]
    fn test_encode_v1_is_unknown() {
        let err = encode_metric_data_array(&[sample(0)], ArrayFormat::V1ArrayJson).unwrap_err();
        assert!(matches!(err, MsgError::UnknownFormat(0)));
    }

    #[test]
    fn test_decode_v1_json_array() {
        let old = vec![legacy(0), legacy(1)];
        let b = v1_envelope(ArrayFormat::V1ArrayJson, serde_json::to_vec(&old).unwrap());
        let metrics = decode_metric_data_array(&b).unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[1].name, "legacy.m1");
        assert_eq!(metrics[1].time, 1_400_000_001);
        assert_eq!(metrics[1].mtype, "rate");
        assert_eq!(metrics[1].tags, vec!["a=b".to_string()]);
    }

    #[test]
    fn test_decode_v1_msgp_array() {
        let old = vec![legacy(7)];
        let b = v1_envelope(
            ArrayFormat::V1ArrayMsgp,
            rmp_serde::to_vec_named(&old).unwrap(),
        );
        let metrics = decode_metric_data_array(&b).unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].org_id, 8);
        assert_eq!(metrics[0].value, 1.25);
    }

    #[test]
    fn test_decode_v1_too_small() {
        for len in 1..9 {
            let b = vec![0u8; len];
            let err = decode_metric_data_array(&b).unwrap_err();
            assert!(matches!(err, MsgError::TooSmall { needed: 9, actual } if actual == len));
        }
    }

    #[test]
    fn test_decode_empty_buffers() {
        assert!(decode_metric_data_array(&[]).unwrap_err().is_too_small());
        assert!(decode_data_point(&[]).unwrap_err().is_too_small());
    }

    #[test]
    fn test_decode_unknown_array_format() {
        let err = decode_metric_data_array(&[9, b'[', b']']).unwrap_err();
        assert!(matches!(err, MsgError::UnknownFormat(9)));
    }

    #[test]
    fn test_decode_bad_payload() {
        let err = decode_metric_data_array(&[2, b'{']).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("FormatMetricDataArrayJson"));
    }

    #[test]
    fn test_data_point_round_trip() {
        let md = sample(3);
        let mp = MetricPoint::from_data(&md).unwrap();

        for point in [DataPoint::Data(md), DataPoint::Point(mp)] {
            let b = encode_data_point(&point).unwrap();
            assert_eq!(decode_data_point(&b).unwrap(), point);
        }
    }

    #[test]
    fn test_encode_into_appends() {
        let mut buf = vec![0xff];
        let point = DataPoint::Data(sample(1));
        encode_data_point_into(&point, &mut buf).unwrap();
        assert_eq!(buf[0], 0xff);
        assert_eq!(buf[1], PointFormat::MetricData.as_byte());
        assert_eq!(decode_data_point(&buf[1..]).unwrap(), point);
    }

    #[test]
    fn test_legacy_record_without_discriminator() {
        let old = legacy(2);
        let b = rmp_serde::to_vec_named(&old).unwrap();
        assert!(is_legacy_record_marker(b[0]));

        match decode_data_point(&b).unwrap() {
            DataPoint::Data(md) => {
                assert_eq!(md.name, "legacy.m2");
                assert_eq!(md.org_id, 3);
                assert_eq!(md.time, 1_400_000_002);
                assert_eq!(md.id, old.id);
            }
            DataPoint::Point(_) => panic!("expected full record"),
        }
    }

    #[test]
    fn test_pascal_case_record_with_discriminator() {
        let md = sample(4);
        let mut b = vec![PointFormat::MetricData.as_byte()];
        b.extend(rmp_serde::to_vec_named(&pascal(&md)).unwrap());
        assert_eq!(decode_data_point(&b).unwrap(), DataPoint::Data(md));
    }

    #[test]
    fn test_pascal_case_arrays() {
        let metrics: Vec<_> = (0..3).map(sample).collect();
        let records: Vec<_> = metrics.iter().map(pascal).collect();

        let mut b = vec![ArrayFormat::ArrayMsgp.as_byte()];
        b.extend(rmp_serde::to_vec_named(&records).unwrap());
        assert_eq!(decode_metric_data_array(&b).unwrap(), metrics);

        let mut b = vec![ArrayFormat::ArrayJson.as_byte()];
        b.extend(serde_json::to_vec(&records).unwrap());
        assert_eq!(decode_metric_data_array(&b).unwrap(), metrics);
    }

    #[test]
    fn test_legacy_fallback_failure_is_surfaced() {
        let err = decode_data_point(&[0x81, 0xc1]).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains(LEGACY_RECORD));
    }

    #[test]
    fn test_unknown_point_format() {
        let err = decode_data_point(&[0x07, 0x00]).unwrap_err();
        assert!(matches!(err, MsgError::UnknownFormat(7)));
    }

    #[test]
    fn test_markers_never_collide_with_discriminators() {
        for b in 0..=u8::MAX {
            if is_legacy_record_marker(b) {
                assert!(PointFormat::from_byte(b).is_none());
            }
        }
    }
}
