//! Extraction half of the scaling family.

use crate::bits::{bits_to_bytes, bits_to_integer, bytes_to_bits};
use crate::buffer::BitBuffer;
use crate::compress::{Codec, Deflate};
use crate::error::{RdhError, Result};
use crate::raster::Raster;
use crate::scale::scale_to;
use crate::unidirection::{Extracted, extract_iterations};
use crate::{COMPRESSED_LEN_BITS, MAX_PIXEL_VALUE};

use super::ResidualMode;
use super::residual::apply_residual;

/// Inverse of [`ScalingEmbedder`](super::ScalingEmbedder)
///
/// Must be configured with the same [`ResidualMode`] the embedder used; the
/// residual serialization is a wire-format choice the stream itself does not
/// announce.
#[derive(Debug)]
pub struct ScalingExtractor<C: Codec = Deflate> {
	codec: C,
	mode: ResidualMode,
}

impl ScalingExtractor<Deflate> {
	/// Creates a scaling extractor with the default deflate codec.
	pub fn new(mode: ResidualMode) -> Self {
		Self::with_codec(Deflate, mode)
	}
}

impl<C: Codec> ScalingExtractor<C> {
	/// Creates a scaling extractor with a caller-supplied compression codec.
	pub fn with_codec(codec: C, mode: ResidualMode) -> Self {
		Self { codec, mode }
	}

	/// Recovers the cover image and payload from a marked image.
	pub fn extract(&self, marked: &Raster) -> Result<Extracted> {
		let parts = extract_iterations(marked, &self.codec)?;
		let iterations = parts.iterations;
		if iterations * 2 >= usize::from(MAX_PIXEL_VALUE) {
			return Err(RdhError::invalid_image(format!(
				"{iterations} iterations exceed the scaling headroom"
			)));
		}

		let mut stream = BitBuffer::from_bits(parts.stream);
		let original_min = bits_to_integer(&stream.next_exact(8)?) as u8;
		let original_max = bits_to_integer(&stream.next_exact(8)?) as u8;
		if original_max < original_min {
			return Err(RdhError::invalid_image(format!(
				"original range [{original_min}, {original_max}] is inverted"
			)));
		}

		let compressed_bits = bits_to_integer(&stream.next_exact(COMPRESSED_LEN_BITS)?) as usize;
		let compressed = bits_to_bytes(&stream.next_exact(compressed_bits)?);
		let residual_bytes = self.codec.decompress(&compressed)?;
		let mut residual = BitBuffer::from_bits(bytes_to_bits(&residual_bytes));

		let payload = bits_to_bytes(&stream.drain());

		// undo the headroom shift; the scaling target is pinned by the
		// iteration count, not by whatever maximum the body happens to hit
		let shift = iterations as u8;
		let scaled: Vec<u8> = parts.body.iter().map(|&px| px.wrapping_sub(shift)).collect();
		let scaled_max = MAX_PIXEL_VALUE - 2 * shift;
		let original_range = original_max - original_min;

		let mut recovered = scale_to(&scaled, original_range);
		apply_residual(
			self.mode,
			&scaled,
			&mut recovered,
			&mut residual,
			original_range,
			scaled_max,
		)?;

		for px in &mut recovered {
			*px = px.wrapping_add(original_min);
		}

		Ok(Extracted {
			image: Raster::assemble(parts.header, recovered, marked.width(), marked.height())?,
			iterations,
			payload,
		})
	}
}
