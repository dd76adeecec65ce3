//! Embedding half of the scaling family.

use crate::bits::{bits_to_bytes, bytes_to_bits, get_lsb, integer_to_bits};
use crate::buffer::BitBuffer;
use crate::compress::{Codec, Deflate};
use crate::error::{RdhError, Result};
use crate::raster::Raster;
use crate::unidirection::{Embedded, PeakStrategy, embed_iterations};
use crate::{COMPRESSED_LEN_BITS, HEADER_PIXELS, MAX_PIXEL_VALUE};

use super::ResidualMode;
use super::residual::encode_residual;

/// Range-scaling embedder
///
/// Compresses the body's intensity range to manufacture shift headroom,
/// records the rounding residual as side information, then delegates to the
/// unidirectional core for exactly the requested number of iterations.
#[derive(Debug)]
pub struct ScalingEmbedder<C: Codec = Deflate> {
	cover: Raster,
	payload: Vec<bool>,
	codec: C,
	mode: ResidualMode,
}

impl ScalingEmbedder<Deflate> {
	/// Creates a scaling embedder with the default deflate codec.
	pub fn new(cover: Raster, payload: &[u8], mode: ResidualMode) -> Self {
		Self::with_codec(cover, payload, Deflate, mode)
	}
}

impl<C: Codec> ScalingEmbedder<C> {
	/// Creates a scaling embedder with a caller-supplied compression codec.
	pub fn with_codec(cover: Raster, payload: &[u8], codec: C, mode: ResidualMode) -> Self {
		Self {
			cover,
			payload: bytes_to_bits(payload),
			codec,
			mode,
		}
	}

	/// Embeds the payload using exactly `iterations` histogram shifts.
	///
	/// Fails with [`RdhError::IterationsLimitExceeded`] when the requested
	/// count leaves too little scaling headroom for the residual format,
	/// and with [`RdhError::CapacityExhausted`] when the peak bins cannot
	/// carry all `iterations` overhead frames — a partially embedded
	/// scaling image would un-shift by the wrong amount on extraction.
	pub fn embed(self, iterations: usize) -> Result<Embedded> {
		if iterations == 0 || iterations * 2 >= usize::from(MAX_PIXEL_VALUE) {
			return Err(RdhError::IterationsLimitExceeded {
				reason: format!("{iterations} iterations leave no scaled range"),
			});
		}

		let width = self.cover.width();
		let height = self.cover.height();
		let (mut header, body) = self.cover.split_header_body()?;
		if body.is_empty() {
			return Err(RdhError::InsufficientPixels {
				required: HEADER_PIXELS + 1,
				actual: HEADER_PIXELS,
			});
		}

		let original_min = *body.iter().min().unwrap_or(&0);
		let original_max = *body.iter().max().unwrap_or(&0);
		let scaled_max = MAX_PIXEL_VALUE - 2 * iterations as u8;

		let scaled = crate::scale::scale_to(&body, scaled_max);
		let residual = encode_residual(
			self.mode,
			&body,
			&scaled,
			original_min,
			original_max,
			scaled_max,
		)?;

		let compressed = self.codec.compress(&bits_to_bytes(&residual))?;
		let compressed_bits = compressed.len() * 8;
		if compressed_bits > u16::MAX as usize {
			return Err(RdhError::ResidualOverflow {
				bits: compressed_bits,
			});
		}

		// park the body in [k, 255 - k]: k free bins at each end
		let mut processed: Vec<u8> = scaled.iter().map(|&px| px + iterations as u8).collect();

		let mut side_info = integer_to_bits(u32::from(original_min), 8);
		side_info.extend(integer_to_bits(u32::from(original_max), 8));
		side_info.extend(integer_to_bits(compressed_bits as u32, COMPRESSED_LEN_BITS));
		side_info.extend(bytes_to_bits(&compressed));

		let header_lsbs: Vec<bool> = header.iter().map(|&px| get_lsb(px)).collect();
		let mut buffer = BitBuffer::new();
		buffer.push(&header_lsbs);
		buffer.push(&side_info);
		buffer.push(&self.payload);

		let (applied, pure_bits) = embed_iterations(
			&mut header,
			&mut processed,
			&mut buffer,
			&self.codec,
			PeakStrategy::Unidirectional,
			iterations,
		)?;

		if applied < iterations {
			return Err(RdhError::CapacityExhausted {
				required: iterations,
				available: applied,
			});
		}

		// the extractor parses the side information unconditionally, so all
		// of it (and the relocated header bits ahead of it) must have been
		// embedded; leftover payload is fine, leftover side info is not
		let required = HEADER_PIXELS + side_info.len();
		let shortfall = buffer.remaining().saturating_sub(self.payload.len());
		if shortfall > 0 {
			return Err(RdhError::CapacityExhausted {
				required,
				available: required - shortfall,
			});
		}

		Ok(Embedded {
			image: Raster::assemble(header, processed, width, height)?,
			iterations: applied,
			pure_payload_bits: pure_bits.saturating_sub(side_info.len()),
		})
	}
}
