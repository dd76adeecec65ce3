//! End-to-end reversibility scenarios across both embedding families.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rdh_core::prelude::*;

fn random_raster(width: usize, height: usize, lo: u8, hi: u8, seed: u64) -> Raster {
	let mut rng = StdRng::seed_from_u64(seed);
	let pixels = (0..width * height).map(|_| rng.random_range(lo..=hi)).collect();
	Raster::new(width, height, pixels).unwrap()
}

fn random_payload(len: usize, seed: u64) -> Vec<u8> {
	let mut rng = StdRng::seed_from_u64(seed);
	(0..len).map(|_| rng.random()).collect()
}

/// Peak signal-to-noise ratio between two equally sized rasters, for the
/// failure report when a recovery is not bit-exact.
fn psnr(a: &Raster, b: &Raster) -> f64 {
	let mse = a
		.pixels()
		.iter()
		.zip(b.pixels().iter())
		.map(|(&x, &y)| {
			let diff = f64::from(x) - f64::from(y);
			diff * diff
		})
		.sum::<f64>()
		/ a.pixels().len() as f64;

	if mse == 0.0 {
		f64::INFINITY
	} else {
		10.0 * (255.0f64 * 255.0 / mse).log10()
	}
}

fn assert_recovered(cover: &Raster, recovered: &Raster) {
	assert_eq!(
		recovered,
		cover,
		"recovered cover differs from the original, PSNR = {:.2} dB",
		psnr(cover, recovered)
	);
}

#[test_log::test]
fn test_unidirectional_reversibility_over_seeds() {
	for seed in [1u64, 2, 3, 4, 5] {
		let cover = random_raster(64, 64, 100, 150, seed);
		let payload = random_payload(512, seed + 100);

		let embedded = UnidirectionEmbedder::new(cover.clone(), &payload)
			.embed(4)
			.unwrap();
		let outcome = UnidirectionExtractor::new().extract(&embedded.image).unwrap();

		info!(
			"seed {seed}: {} iterations, {} pure payload bits",
			embedded.iterations, embedded.pure_payload_bits
		);

		assert_recovered(&cover, &outcome.image);
		assert_eq!(outcome.iterations, embedded.iterations);

		let compare = embedded.pure_payload_bits.min(payload.len() * 8) / 8;
		assert_eq!(&outcome.payload[..compare], &payload[..compare]);
	}
}

#[test_log::test]
fn test_embed_is_deterministic_after_extraction() {
	// extracting and re-embedding the same payload with the same budget
	// must reproduce the marked image bit for bit
	let cover = random_raster(64, 64, 80, 170, 42);
	let payload = b"idempotence probe";

	let first = UnidirectionEmbedder::new(cover.clone(), payload).embed(3).unwrap();
	let outcome = UnidirectionExtractor::new().extract(&first.image).unwrap();
	assert_recovered(&cover, &outcome.image);

	let second = UnidirectionEmbedder::new(outcome.image, payload).embed(3).unwrap();
	assert_eq!(first.image, second.image);
	assert_eq!(first.pure_payload_bits, second.pure_payload_bits);
}

#[test_log::test]
fn test_brightness_variant_roundtrip_and_balance() {
	// dark cover, sizable payload: the variant must stay within a few gray
	// levels of the original mean and remain fully reversible
	let cover = random_raster(128, 128, 30, 50, 2115);
	let payload = random_payload(1250, 9);

	let embedded = UnidirectionEmbedder::brightness_preserving(cover.clone(), &payload)
		.embed(32)
		.unwrap();

	let drift = (embedded.image.mean() - cover.mean()).abs();
	info!("brightness drift after 32 iterations: {drift:.3}");
	assert!(drift <= 5.0, "mean drifted by {drift}");

	let outcome = UnidirectionExtractor::new().extract(&embedded.image).unwrap();
	assert_recovered(&cover, &outcome.image);
}

#[test_log::test]
fn test_scaling_reversibility_with_random_payload() {
	// diagonal ramp over the full range, the scaling family's home turf
	let span = 256 + 256 - 2;
	let mut pixels: Vec<u8> = (0..256 * 256)
		.map(|index| {
			let (row, col) = (index / 256, index % 256);
			(((row + col) * 255) / span) as u8
		})
		.collect();
	pixels[17] = 0;
	let cover = Raster::new(256, 256, pixels).unwrap();
	let payload = random_payload(2000, 33);

	let embedded = ScalingEmbedder::new(cover.clone(), &payload, ResidualMode::Plain)
		.embed(63)
		.unwrap();
	let outcome = ScalingExtractor::new(ResidualMode::Plain)
		.extract(&embedded.image)
		.unwrap();

	info!(
		"scaling run: {} iterations, {} pure payload bits",
		embedded.iterations, embedded.pure_payload_bits
	);

	assert_recovered(&cover, &outcome.image);
	assert_eq!(outcome.iterations, 63);

	let compare = embedded.pure_payload_bits.min(payload.len() * 8) / 8;
	assert!(compare > 0);
	assert_eq!(&outcome.payload[..compare], &payload[..compare]);
}

#[test_log::test]
fn test_scaling_upscale_roundtrip() {
	// a narrow range stretched out instead of compressed: the rounding
	// residual is empty and every variable-bit group has width zero
	let cover = random_raster(48, 48, 100, 140, 77);
	let payload = random_payload(64, 78);

	let embedded = ScalingEmbedder::new(cover.clone(), &payload, ResidualMode::variable_bits())
		.embed(8)
		.unwrap();
	assert_eq!(embedded.iterations, 8);
	assert_ne!(embedded.image, cover);

	let outcome = ScalingExtractor::new(ResidualMode::variable_bits())
		.extract(&embedded.image)
		.unwrap();
	assert_recovered(&cover, &outcome.image);

	let compare = embedded.pure_payload_bits.min(payload.len() * 8) / 8;
	assert_eq!(&outcome.payload[..compare], &payload[..compare]);
}
