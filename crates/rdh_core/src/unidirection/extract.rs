//! Extraction half of the unidirectional core.

use crate::bits::{bits_to_bytes, bits_to_integer, bytes_to_bits, get_lsb, set_lsb};
use crate::buffer::BitBuffer;
use crate::compress::{Codec, Deflate};
use crate::error::{RdhError, Result};
use crate::raster::Raster;
use crate::{COMPRESSED_LEN_BITS, HEADER_PIXELS, PEAK_BITS};

use super::{Extracted, ITERATIONS_LIMIT, shift_direction};

/// Inverse of [`UnidirectionEmbedder`](super::UnidirectionEmbedder)
///
/// Also extracts images produced by the brightness-preserving variant; the
/// peak pairs it needs are all in the stream.
#[derive(Debug)]
pub struct UnidirectionExtractor<C: Codec = Deflate> {
	codec: C,
}

impl UnidirectionExtractor<Deflate> {
	/// Creates an extractor with the default deflate codec.
	pub fn new() -> Self {
		Self::with_codec(Deflate)
	}
}

impl Default for UnidirectionExtractor<Deflate> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C: Codec> UnidirectionExtractor<C> {
	/// Creates an extractor with a caller-supplied compression codec.
	pub fn with_codec(codec: C) -> Self {
		Self { codec }
	}

	/// Recovers the cover image and payload from a marked image.
	pub fn extract(&self, marked: &Raster) -> Result<Extracted> {
		let parts = extract_iterations(marked, &self.codec)?;

		Ok(Extracted {
			image: Raster::assemble(parts.header, parts.body, marked.width(), marked.height())?,
			iterations: parts.iterations,
			payload: bits_to_bytes(&parts.stream),
		})
	}
}

/// Header, body, and recovered bitstream of an unwound marked image
pub(crate) struct ExtractedParts {
	pub header: Vec<u8>,
	pub body: Vec<u8>,
	pub iterations: usize,
	pub stream: Vec<bool>,
}

/// Unwinds every embedding iteration of a marked image.
///
/// Iterations come off latest-first; each pass recovers the bits its
/// embedding step consumed, parses the overhead frame at their front, and
/// undoes the histogram shift. The leftover chunks, concatenated in reverse
/// visit order, are exactly the bit sequence the embedder drew from its
/// buffer after the relocated header LSBs.
pub(crate) fn extract_iterations<C: Codec>(marked: &Raster, codec: &C) -> Result<ExtractedParts> {
	let (mut header, mut body) = marked.clone().split_header_body()?;

	let header_lsbs: Vec<bool> = header.iter().map(|&px| get_lsb(px)).collect();
	let mut sink = bits_to_integer(&header_lsbs[..PEAK_BITS]) as u8;
	let mut peak = bits_to_integer(&header_lsbs[PEAK_BITS..2 * PEAK_BITS]) as u8;

	let mut chunks: Vec<Vec<bool>> = Vec::new();
	let mut iterations = 0usize;

	while (sink, peak) != (0, 0) {
		if iterations >= ITERATIONS_LIMIT {
			return Err(RdhError::invalid_image(format!(
				"peak chain exceeds {ITERATIONS_LIMIT} iterations"
			)));
		}
		if sink.abs_diff(peak) < 2 {
			return Err(RdhError::invalid_image(format!(
				"peak pair ({sink}, {peak}) is too close to carry an embedding"
			)));
		}

		let direction = shift_direction(sink, peak);
		let carrier = (i16::from(peak) + direction) as u8;

		// bits recovered from this iteration's embedding sites, raster order
		let recovered: Vec<bool> = body
			.iter()
			.filter(|&&px| px == peak || px == carrier)
			.map(|&px| px != peak)
			.collect();
		let mut buffer = BitBuffer::from_bits(recovered);

		let next_sink = bits_to_integer(&buffer.next_exact(PEAK_BITS)?) as u8;
		let next_peak = bits_to_integer(&buffer.next_exact(PEAK_BITS)?) as u8;

		// the sink bin still holds both merged populations here
		let merged_count = body.iter().filter(|&&px| px == sink).count();
		let map = read_location_map(&mut buffer, codec, merged_count)?;
		if map.len() < merged_count {
			return Err(RdhError::invalid_image(format!(
				"location map holds {} bits for {merged_count} merged pixels",
				map.len()
			)));
		}

		// inverse interior shift also returns the 1-bit carriers to the peak
		let (low, high) = if sink < peak { (sink, peak) } else { (peak, sink) };
		for px in body.iter_mut() {
			if *px > low && *px < high {
				*px = (i16::from(*px) - direction) as u8;
			}
		}

		// split the merged sink bin back apart
		let mut index = 0;
		for px in body.iter_mut() {
			if *px == sink {
				if map[index] {
					*px = (i16::from(*px) - direction) as u8;
				}
				index += 1;
			}
		}

		if (next_sink, next_peak) == (0, 0) {
			// sentinel frame: the next 17 bits are the cover's header LSBs
			let restored = buffer.next_exact(HEADER_PIXELS)?;
			for (px, bit) in header.iter_mut().zip(restored) {
				*px = set_lsb(*px, bit);
			}
		}

		chunks.push(buffer.drain());
		sink = next_sink;
		peak = next_peak;
		iterations += 1;
	}

	// first-embedded chunk first: this is the embedder's consumption order
	let mut stream = Vec::new();
	for chunk in chunks.iter().rev() {
		stream.extend_from_slice(chunk);
	}

	Ok(ExtractedParts {
		header,
		body,
		iterations,
		stream,
	})
}

/// Parses one location map: a flag bit, then either a 16-bit length plus
/// compressed bytes or `merged_count` raw bits.
fn read_location_map<C: Codec>(
	buffer: &mut BitBuffer,
	codec: &C,
	merged_count: usize,
) -> Result<Vec<bool>> {
	if buffer.next_bit()? {
		let length = bits_to_integer(&buffer.next_exact(COMPRESSED_LEN_BITS)?) as usize;
		let compressed = bits_to_bytes(&buffer.next_exact(length)?);
		Ok(bytes_to_bits(&codec.decompress(&compressed)?))
	} else {
		buffer.next_exact(merged_count)
	}
}
