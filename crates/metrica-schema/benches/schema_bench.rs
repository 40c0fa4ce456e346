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

//! Identity and partitioning benchmarks
//!
//! Benchmarks:
//! - Identity derivation for growing tag counts
//! - Partition lookup for every method
//! - Memoized vs. streamed name-with-tags on definitions

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use metrica_schema::{MetricData, MetricDefinition, PartitionByMethod, PartitionedMetric};
use std::hint::black_box;

fn record(tag_count: usize) -> MetricData {
    MetricData {
        org_id: 1,
        name: "some.service.requests.latency".to_string(),
        interval: 10,
        value: 12.5,
        unit: "ms".to_string(),
        time: 1_700_000_000,
        mtype: "gauge".to_string(),
        tags: (0..tag_count)
            .rev()
            .map(|i| format!("key{}=value{}", i, i))
            .collect(),
        ..Default::default()
    }
}

fn bench_set_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_id");

    for tag_count in [0usize, 4, 16, 64] {
        let base = record(tag_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(tag_count),
            &base,
            |b, base| {
                b.iter(|| {
                    let mut md = base.clone();
                    md.set_id();
                    black_box(md.id);
                });
            },
        );
    }
    group.finish();
}

fn bench_partition_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_id");
    let md = record(8);

    for method in [
        PartitionByMethod::ByOrg,
        PartitionByMethod::BySeries,
        PartitionByMethod::BySeriesWithTags,
        PartitionByMethod::BySeriesWithTagsFnv,
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(method), &method, |b, &method| {
            b.iter(|| black_box(md.partition_id(black_box(method), 128)));
        });
    }
    group.finish();
}

fn bench_definition_memo(c: &mut Criterion) {
    let mut group = c.benchmark_group("definition_partition");
    let md = record(8);

    let cold = MetricDefinition::new(
        md.org_id,
        md.name.clone(),
        md.interval,
        md.unit.clone(),
        md.mtype.clone(),
        md.tags.clone(),
    );
    let warm = cold.clone();
    let _ = warm.name_with_tags();

    group.bench_function("streamed", |b| {
        b.iter(|| black_box(cold.partition_id(PartitionByMethod::BySeriesWithTags, 128)));
    });
    group.bench_function("memoized", |b| {
        b.iter(|| black_box(warm.partition_id(PartitionByMethod::BySeriesWithTags, 128)));
    });
    group.finish();
}

criterion_group!(benches, bench_set_id, bench_partition_id, bench_definition_memo);
criterion_main!(benches);
