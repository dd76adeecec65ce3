//! Benchmark suite for the embedding cores
//!
//! Measures unidirectional and scaling embed/extract throughput on
//! synthetic covers.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rdh_benches::{banded_raster, gradient_raster, payload_bytes, sizes};
use rdh_core::prelude::*;
use std::hint::black_box;

/// Benchmark unidirectional embedding across cover sizes
fn bench_unidirection_embed(c: &mut Criterion) {
	let mut group = c.benchmark_group("unidirection_embed");
	let payload = payload_bytes(4096);

	for &(width, height) in &[sizes::TINY, sizes::SMALL, sizes::MEDIUM] {
		let cover = banded_raster(width, height, 128, 24);
		let pixels = (width * height) as u64;

		group.throughput(Throughput::Elements(pixels));
		group.bench_with_input(
			BenchmarkId::new("embed", format!("{width}x{height}")),
			&cover,
			|b, cover| {
				b.iter(|| {
					let embedder =
						UnidirectionEmbedder::new(black_box(cover).clone(), &payload);
					black_box(embedder.embed(4))
				});
			},
		);
	}

	group.finish();
}

/// Benchmark the full unidirectional round trip
fn bench_unidirection_roundtrip(c: &mut Criterion) {
	let (width, height) = sizes::SMALL;
	let cover = banded_raster(width, height, 128, 24);
	let payload = payload_bytes(4096);
	let marked = UnidirectionEmbedder::new(cover, &payload)
		.embed(4)
		.expect("bench cover must have capacity")
		.image;

	let mut group = c.benchmark_group("unidirection_extract");
	group.throughput(Throughput::Elements((width * height) as u64));
	group.bench_function("extract_256x256", |b| {
		b.iter(|| {
			let extractor = UnidirectionExtractor::new();
			black_box(extractor.extract(black_box(&marked)))
		});
	});
	group.finish();
}

/// Benchmark scaling embedding on a smooth full-range cover
fn bench_scaling_embed(c: &mut Criterion) {
	let (width, height) = sizes::SMALL;
	let cover = gradient_raster(width, height);
	let payload = payload_bytes(1024);

	let mut group = c.benchmark_group("scaling_embed");
	group.throughput(Throughput::Elements((width * height) as u64));

	for iterations in [16usize, 32, 63] {
		group.bench_with_input(
			BenchmarkId::new("plain", iterations),
			&iterations,
			|b, &iterations| {
				b.iter(|| {
					let embedder = ScalingEmbedder::new(
						black_box(&cover).clone(),
						&payload,
						ResidualMode::Plain,
					);
					black_box(embedder.embed(iterations))
				});
			},
		);
	}

	group.finish();
}

criterion_group!(
	benches,
	bench_unidirection_embed,
	bench_unidirection_roundtrip,
	bench_scaling_embed
);
criterion_main!(benches);
