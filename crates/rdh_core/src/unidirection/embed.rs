//! Embedding half of the unidirectional core.

use crate::bits::{bits_to_bytes, bytes_to_bits, get_lsb, integer_to_bits, set_lsb};
use crate::buffer::BitBuffer;
use crate::compress::{Codec, Deflate};
use crate::error::{RdhError, Result};
use crate::histogram::Histogram;
use crate::raster::Raster;
use crate::{COMPRESSED_LEN_BITS, HEADER_PIXELS, PEAK_BITS};

use super::{Embedded, PeakStrategy, shift_direction};

/// Iterated peak/zero histogram-shift embedder
///
/// Consumes a cover raster and a payload; produces a marked raster whose
/// inverse transform recovers both exactly.
#[derive(Debug)]
pub struct UnidirectionEmbedder<C: Codec = Deflate> {
	cover: Raster,
	payload: Vec<bool>,
	codec: C,
	strategy: PeakStrategy,
}

impl UnidirectionEmbedder<Deflate> {
	/// Creates an embedder with the default deflate codec.
	pub fn new(cover: Raster, payload: &[u8]) -> Self {
		Self::with_codec(cover, payload, Deflate)
	}

	/// Creates a brightness-preserving embedder with the default deflate
	/// codec.
	pub fn brightness_preserving(cover: Raster, payload: &[u8]) -> Self {
		Self::brightness_preserving_with_codec(cover, payload, Deflate)
	}
}

impl<C: Codec> UnidirectionEmbedder<C> {
	/// Creates an embedder with a caller-supplied compression codec.
	pub fn with_codec(cover: Raster, payload: &[u8], codec: C) -> Self {
		Self {
			cover,
			payload: bytes_to_bits(payload),
			codec,
			strategy: PeakStrategy::Unidirectional,
		}
	}

	/// Creates a brightness-preserving embedder with a caller-supplied
	/// compression codec.
	///
	/// Peak selection steers the marked image's mean intensity back toward
	/// the cover's whenever it drifts more than the fixed threshold.
	pub fn brightness_preserving_with_codec(cover: Raster, payload: &[u8], codec: C) -> Self {
		let original_mean = cover.mean();
		Self {
			cover,
			payload: bytes_to_bits(payload),
			codec,
			strategy: PeakStrategy::BrightnessPreserving { original_mean },
		}
	}

	/// Embeds the payload using at most `iterations` histogram shifts.
	///
	/// Fails with [`RdhError::CapacityExhausted`] when not even the first
	/// iteration's overhead fits the peak bin.
	pub fn embed(self, iterations: usize) -> Result<Embedded> {
		let width = self.cover.width();
		let height = self.cover.height();
		let (mut header, mut body) = self.cover.split_header_body()?;

		// the cover's header LSBs ride at the front of the stream so the
		// peak stamp can overwrite them losslessly
		let header_lsbs: Vec<bool> = header.iter().map(|&px| get_lsb(px)).collect();
		let mut buffer = BitBuffer::new();
		buffer.push(&header_lsbs);
		buffer.push(&self.payload);

		let (applied, pure_payload_bits) = embed_iterations(
			&mut header,
			&mut body,
			&mut buffer,
			&self.codec,
			self.strategy,
			iterations,
		)?;

		Ok(Embedded {
			image: Raster::assemble(header, body, width, height)?,
			iterations: applied,
			pure_payload_bits,
		})
	}
}

/// Runs the shared iteration loop over a prepared header/body/buffer triple.
///
/// Applies up to `max_iterations` shifts, stamps the final peak pair into
/// the header LSBs, and returns the applied count together with the pure
/// payload capacity. The scaling family reuses this with its preprocessed
/// body and extended stream.
pub(crate) fn embed_iterations<C: Codec>(
	header: &mut [u8],
	body: &mut [u8],
	buffer: &mut BitBuffer,
	codec: &C,
	strategy: PeakStrategy,
	max_iterations: usize,
) -> Result<(usize, usize)> {
	let mut previous = (0u8, 0u8);
	let mut applied = 0usize;
	let mut pure_payload_bits = 0usize;

	while applied < max_iterations {
		let hist = Histogram::of(body);
		let (sink, peak) = strategy.select(&hist, body);

		let map = location_map(body, sink, peak);
		let overhead = overhead_frame(previous, &map, codec)?;

		let capacity = hist.count(peak);
		let required = overhead.len() + HEADER_PIXELS;
		if capacity < required {
			if applied == 0 {
				return Err(RdhError::CapacityExhausted {
					required,
					available: capacity,
				});
			}
			break;
		}

		buffer.add(&overhead);
		shift_and_embed(body, sink, peak, capacity, buffer);

		pure_payload_bits += capacity - overhead.len();
		if applied == 0 {
			pure_payload_bits -= HEADER_PIXELS;
		}

		previous = (sink, peak);
		applied += 1;
	}

	if applied == 0 {
		// zero requested iterations: stamping the sentinel would clobber
		// header LSBs that were never relocated into the stream
		return Err(RdhError::CapacityExhausted {
			required: HEADER_PIXELS,
			available: 0,
		});
	}

	stamp_peaks(header, previous);
	Ok((applied, pure_payload_bits))
}

/// Marks which pixels of the merged sink bin originally sat one step inside.
///
/// Built over the pre-shift body: a bit per pixel valued `P_L` or
/// `P_L - d`, true for the latter.
pub(super) fn location_map(body: &[u8], sink: u8, peak: u8) -> Vec<bool> {
	let direction = shift_direction(sink, peak);
	let merged = i16::from(sink) - direction;

	body.iter()
		.filter(|&&px| px == sink || i16::from(px) == merged)
		.map(|&px| i16::from(px) == merged)
		.collect()
}

/// Serializes one overhead frame: previous peaks, flag, and the location
/// map, compressed when that is strictly smaller and its length fits the
/// 16-bit field.
pub(super) fn overhead_frame<C: Codec>(
	previous: (u8, u8),
	map: &[bool],
	codec: &C,
) -> Result<Vec<bool>> {
	let compressed = codec.compress(&bits_to_bytes(map))?;
	let compressed_bits = compressed.len() * 8;
	let flagged =
		map.len() > compressed_bits + COMPRESSED_LEN_BITS && compressed_bits <= u16::MAX as usize;

	let mut frame = integer_to_bits(u32::from(previous.0), PEAK_BITS);
	frame.extend(integer_to_bits(u32::from(previous.1), PEAK_BITS));
	frame.push(flagged);

	if flagged {
		frame.extend(integer_to_bits(compressed_bits as u32, COMPRESSED_LEN_BITS));
		frame.extend(bytes_to_bits(&compressed));
	} else {
		frame.extend_from_slice(map);
	}

	Ok(frame)
}

/// One histogram shift: vacate the bin next to the peak, then spend one
/// buffer bit per peak pixel in raster order.
fn shift_and_embed(body: &mut [u8], sink: u8, peak: u8, capacity: usize, buffer: &mut BitBuffer) {
	let direction = shift_direction(sink, peak);
	let (low, high) = if sink < peak { (sink, peak) } else { (peak, sink) };

	for px in body.iter_mut() {
		if *px > low && *px < high {
			*px = (i16::from(*px) + direction) as u8;
		}
	}

	let bits = buffer.next_padded(capacity);
	let mut cursor = 0;
	for px in body.iter_mut() {
		if *px == peak {
			if bits[cursor] {
				*px = (i16::from(*px) + direction) as u8;
			}
			cursor += 1;
		}
	}
}

/// Writes the final peak pair into the first 16 header LSBs.
///
/// The 17th header LSB is reserved and left as the stream restored it.
fn stamp_peaks(header: &mut [u8], peaks: (u8, u8)) {
	let mut bits = integer_to_bits(u32::from(peaks.0), PEAK_BITS);
	bits.extend(integer_to_bits(u32::from(peaks.1), PEAK_BITS));

	for (px, bit) in header.iter_mut().zip(bits) {
		*px = set_lsb(*px, bit);
	}
}
