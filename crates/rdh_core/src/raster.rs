//! 2-D 8-bit grayscale pixel buffer.
//!
//! The embedders never touch pixel storage through anything but this type:
//! a raster is split into its 17-pixel header and the body once at the start
//! of an operation and reassembled once at the end.

use crate::HEADER_PIXELS;
use crate::error::{RdhError, Result};

/// Row-major 8-bit grayscale image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
	width: usize,
	height: usize,
	pixels: Vec<u8>,
}

impl Raster {
	/// Creates a raster from row-major pixel data.
	pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
		if pixels.len() != width * height {
			return Err(RdhError::DimensionMismatch {
				width,
				height,
				actual: pixels.len(),
			});
		}

		Ok(Self {
			width,
			height,
			pixels,
		})
	}

	/// Creates a raster with every pixel set to `value`.
	pub fn filled(width: usize, height: usize, value: u8) -> Self {
		Self {
			width,
			height,
			pixels: vec![value; width * height],
		}
	}

	/// Width in pixels
	pub fn width(&self) -> usize {
		self.width
	}

	/// Height in pixels
	pub fn height(&self) -> usize {
		self.height
	}

	/// Total number of pixels
	pub fn pixel_count(&self) -> usize {
		self.pixels.len()
	}

	/// Row-major pixel data
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Consumes the raster into its row-major pixel data.
	pub fn into_pixels(self) -> Vec<u8> {
		self.pixels
	}

	/// Mean pixel intensity
	pub fn mean(&self) -> f64 {
		if self.pixels.is_empty() {
			return 0.0;
		}

		self.pixels.iter().map(|&px| f64::from(px)).sum::<f64>() / self.pixels.len() as f64
	}

	/// Splits the raster into its header (first 17 pixels in raster order)
	/// and body.
	pub fn split_header_body(self) -> Result<(Vec<u8>, Vec<u8>)> {
		if self.pixels.len() < HEADER_PIXELS {
			return Err(RdhError::InsufficientPixels {
				required: HEADER_PIXELS,
				actual: self.pixels.len(),
			});
		}

		let mut header = self.pixels;
		let body = header.split_off(HEADER_PIXELS);
		Ok((header, body))
	}

	/// Reassembles a raster from a header/body pair and the original shape.
	pub fn assemble(header: Vec<u8>, body: Vec<u8>, width: usize, height: usize) -> Result<Self> {
		let mut pixels = header;
		pixels.extend_from_slice(&body);
		Self::new(width, height, pixels)
	}
}
