//! Pixel-range scaling with exactly invertible rounding.
//!
//! Compressing the intensity range loses information at bins where several
//! original values collapse into one scaled value. The rounding here is
//! deliberately asymmetric — downward scaling subtracts a small epsilon and
//! takes the ceiling, upward scaling adds it and takes the floor — so that
//! the composition `scale_to(scale_to(v, m), max(v))` overshoots the original
//! by a small non-negative integer, the *rounding residual*, which the
//! scaling embedders record as side information. The epsilon breaks ties at
//! `.5` boundaries; both its value and the ceiling/floor pairing are part of
//! the wire behavior and must not be "cleaned up".

use crate::SCALE_EPS;

/// Rescales pixels into `[0, scaled_max]`.
///
/// The input minimum is subtracted first, so the output always starts at 0.
pub fn scale_to(pixels: &[u8], scaled_max: u8) -> Vec<u8> {
	scale_to_range(pixels, 0, scaled_max)
}

/// Rescales pixels into `[scaled_min, scaled_max]`.
pub fn scale_to_range(pixels: &[u8], scaled_min: u8, scaled_max: u8) -> Vec<u8> {
	let Some(&input_min) = pixels.iter().min() else {
		return Vec::new();
	};
	let input_max = *pixels.iter().max().unwrap_or(&input_min);

	let original_range = f64::from(input_max - input_min);
	let scaled_range = f64::from(scaled_max - scaled_min);

	if original_range == 0.0 {
		// uniform input carries no range to scale
		return vec![scaled_min; pixels.len()];
	}

	let factor = scaled_range / original_range;
	let shrinking = scaled_range <= original_range;

	pixels
		.iter()
		.map(|&px| {
			let scaled = f64::from(px - input_min) * factor;
			let rounded = if shrinking {
				(scaled - SCALE_EPS).ceil()
			} else {
				(scaled + SCALE_EPS).floor()
			};
			rounded as u8 + scaled_min
		})
		.collect()
}

/// Membership mask over scaled bin values whose scale-down/scale-up
/// composition is not the identity.
///
/// Pixels landing in a marked bin are exactly the ones needing a residual
/// bit. The mask may be empty when the ranges divide evenly.
pub fn mapped_value_mask(original_max: u8, scaled_max: u8) -> [bool; 256] {
	let originals: Vec<u8> = (0..=original_max).collect();
	let scaled = scale_to(&originals, scaled_max);
	let recovered = scale_to(&scaled, original_max);

	let mut mask = [false; 256];
	for (index, &value) in originals.iter().enumerate() {
		if recovered[index] != value {
			mask[scaled[index] as usize] = true;
		}
	}
	mask
}

/// Residual width in bits for each scaled bin value.
///
/// A bin collecting `f` original values needs `ceil(log2(f))` bits to state
/// which of them a pixel came from; bins collecting at most one value need
/// none.
pub fn residual_bit_widths(original_max: u8, scaled_max: u8) -> [u8; 256] {
	let originals: Vec<u8> = (0..=original_max).collect();
	let scaled = scale_to(&originals, scaled_max);

	let mut freqs = [0usize; 256];
	for &value in &scaled {
		freqs[value as usize] += 1;
	}

	let mut widths = [0u8; 256];
	for (width, &freq) in widths.iter_mut().zip(freqs.iter()) {
		let freq = freq.max(1);
		*width = freq.next_power_of_two().trailing_zeros() as u8;
	}
	widths
}

/// Per-pixel rounding residual of a scale-down, `scale_back - original`.
pub fn rounding_residual(
	original: &[u8],
	scaled: &[u8],
	original_min: u8,
	original_max: u8,
) -> Vec<i16> {
	let recovered = scale_to_range(scaled, original_min, original_max);
	recovered
		.iter()
		.zip(original.iter())
		.map(|(&rec, &org)| i16::from(rec) - i16::from(org))
		.collect()
}
