//! Error types for embedding and extraction.

use thiserror::Error;

/// Errors that can occur while embedding into or extracting from a raster
#[derive(Debug, Error)]
pub enum RdhError {
	/// Raster construction with a pixel count that does not match the shape
	#[error("dimension mismatch: {width}x{height} raster built from {actual} pixels")]
	DimensionMismatch {
		/// Raster width in pixels
		width: usize,
		/// Raster height in pixels
		height: usize,
		/// Number of pixels actually supplied
		actual: usize,
	},

	/// The raster is too small to hold the reserved header region
	#[error("insufficient pixels: need at least {required}, got {actual}")]
	InsufficientPixels {
		/// Minimum number of pixels
		required: usize,
		/// Number of pixels actually present
		actual: usize,
	},

	/// Embedding ran out of room: the first iteration's overhead does not
	/// fit its peak bin, or the scaling family fell short of its planned
	/// iteration count
	#[error("capacity exhausted: required {required}, available {available}")]
	CapacityExhausted {
		/// Bits the failing iteration needed, or iterations planned
		required: usize,
		/// Bits the peak bin held, or iterations applied
		available: usize,
	},

	/// The requested iteration count leaves too little scaling headroom
	#[error("iterations limit exceeded: {reason}")]
	IterationsLimitExceeded {
		/// What the rounding residual looked like
		reason: String,
	},

	/// The marked image does not decode to a consistent overhead stream
	#[error("invalid marked image: {reason}")]
	InvalidMarkedImage {
		/// Which part of the stream failed to parse
		reason: String,
	},

	/// The compressed rounding residual does not fit its 16-bit length field
	#[error("compressed residual of {bits} bits exceeds the 16-bit length field")]
	ResidualOverflow {
		/// Bit length of the compressed residual
		bits: usize,
	},

	/// The compression collaborator violated its protocol
	#[error("compression failure: {reason}")]
	Compression {
		/// Message propagated from the codec
		reason: String,
	},
}

impl RdhError {
	pub(crate) fn invalid_image(reason: impl Into<String>) -> Self {
		RdhError::InvalidMarkedImage {
			reason: reason.into(),
		}
	}
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, RdhError>;
