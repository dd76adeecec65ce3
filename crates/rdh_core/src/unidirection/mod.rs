//! Unidirectional histogram-shift embedding.
//!
//! ## Overview
//!
//! Each iteration picks the fullest body bin `P_H` (the embedding peak) and a
//! near-empty bin `P_L` (the shift sink), vacates the bin next to `P_H` by
//! shifting every value strictly between the two peaks one step toward
//! `P_L`, and then re-encodes every `P_H` pixel in raster order: a payload
//! bit of 0 leaves the pixel at `P_H`, a 1 moves it into the vacated
//! neighbor. The bin that the shift merges into `P_L` is recorded as a
//! location map so the inverse transform can split it apart again.
//!
//! ## Bitstream
//!
//! The consumed bit sequence interleaves side information and payload. Per
//! applied iteration, front to back:
//!
//! | Field              | Bits | Content                                   |
//! |--------------------|------|-------------------------------------------|
//! | `P_L` of the previous iteration | 8 | big-endian, 0 on the first iteration |
//! | `P_H` of the previous iteration | 8 | big-endian, 0 on the first iteration |
//! | compressed flag    | 1    | 1 when the map is stored compressed       |
//! | map length         | 16   | compressed bit length, only when flagged  |
//! | location map       | var  | compressed bytes or the raw map           |
//! | payload            | var  | whatever capacity remains in the peak bin |
//!
//! The 17 header-pixel LSBs of the cover ride at the very front of the
//! stream; after the final iteration the last peak pair is stamped into the
//! first 16 header LSBs (17th reserved) so the extractor can bootstrap, and
//! the `(0, 0)` pair recovered from the first applied iteration's frame
//! tells it when to stop.

mod embed;
mod extract;


use crate::histogram::Histogram;
use crate::raster::Raster;
use crate::{BRIGHTNESS_THRESHOLD, MAX_PIXEL_VALUE};

pub use embed::UnidirectionEmbedder;
pub use extract::UnidirectionExtractor;

pub(crate) use embed::embed_iterations;
pub(crate) use extract::extract_iterations;

/// Extraction refuses to chase peak chains longer than this
pub(crate) const ITERATIONS_LIMIT: usize = 10_000;

/// Result of an embedding operation
#[derive(Debug)]
pub struct Embedded {
	/// The marked image
	pub image: Raster,

	/// Number of iterations actually applied
	pub iterations: usize,

	/// Bits of capacity left for payload after all overhead
	pub pure_payload_bits: usize,
}

/// Result of an extraction operation
#[derive(Debug)]
pub struct Extracted {
	/// The recovered cover image
	pub image: Raster,

	/// Number of iterations the embedder had applied
	pub iterations: usize,

	/// The recovered payload, zero-padded to whole bytes
	pub payload: Vec<u8>,
}

/// How each iteration picks its `(P_L, P_H)` pair
#[derive(Debug, Clone, Copy)]
pub(crate) enum PeakStrategy {
	/// Fullest bin, nearest sink on the better side
	Unidirectional,

	/// Fullest bin subject to steering the body mean back toward the
	/// cover's mean
	BrightnessPreserving {
		/// Mean intensity of the whole cover image
		original_mean: f64,
	},
}

impl PeakStrategy {
	/// Selects the `(P_L, P_H)` pair for the current body state.
	pub(crate) fn select(self, hist: &Histogram, body: &[u8]) -> (u8, u8) {
		match self {
			PeakStrategy::Unidirectional => {
				let peak = hist.peak();
				(select_sink(hist, peak), peak)
			}
			PeakStrategy::BrightnessPreserving { original_mean } => {
				let current_mean =
					body.iter().map(|&px| f64::from(px)).sum::<f64>() / body.len() as f64;
				let drift = original_mean - current_mean;

				// too dark: forbid the top peak so the shift must go right
				// (brightening); too bright: mirror image
				let peak = if drift > BRIGHTNESS_THRESHOLD {
					hist.peak_between(0, MAX_PIXEL_VALUE - 2)
				} else if drift < -BRIGHTNESS_THRESHOLD {
					hist.peak_between(2, MAX_PIXEL_VALUE)
				} else {
					hist.peak()
				};

				let sink = if drift > BRIGHTNESS_THRESHOLD || peak < 2 {
					hist.closest_minimum_right(peak)
				} else if drift < -BRIGHTNESS_THRESHOLD || peak > MAX_PIXEL_VALUE - 2 {
					hist.closest_minimum_left(peak)
				} else {
					hist.closest_minimum(peak)
				};

				(sink, peak)
			}
		}
	}
}

/// Sink choice of the plain unidirectional rule
fn select_sink(hist: &Histogram, peak: u8) -> u8 {
	if peak < 2 {
		hist.closest_minimum_right(peak)
	} else if peak > MAX_PIXEL_VALUE - 2 {
		hist.closest_minimum_left(peak)
	} else {
		hist.closest_minimum(peak)
	}
}

/// Step taken by shifted pixels: one toward `P_L`
pub(crate) fn shift_direction(sink: u8, peak: u8) -> i16 {
	if sink < peak { -1 } else { 1 }
}
