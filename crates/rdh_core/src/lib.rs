//! Reversible data hiding in 8-bit grayscale rasters.
//!
//! A payload of bits is embedded into a cover image such that the marked
//! image stays perceptually close to the cover and a receiver recovers both
//! the payload and the exact cover, bit for bit. Two embedding families are
//! provided:
//!
//! - [`UnidirectionEmbedder`] / [`UnidirectionExtractor`] — iterated
//!   peak/zero histogram shifting, with a brightness-preserving peak
//!   selection variant.
//! - [`ScalingEmbedder`] / [`ScalingExtractor`] — range compression first to
//!   manufacture shift headroom, with three rounding-residual wire formats
//!   ([`ResidualMode`]).
//!
//! The cores work on in-memory [`Raster`] buffers only; file decoding,
//! payload generation and experiment plumbing live with the callers. Side
//! information is compressed through the [`Codec`] protocol, deflate by
//! default.
//!
//! # Examples
//!
//! ```rust
//! use rdh_core::prelude::*;
//!
//! let cover = Raster::filled(64, 64, 128);
//! let marked = UnidirectionEmbedder::new(cover.clone(), b"payload")
//!     .embed(1)
//!     .unwrap();
//!
//! let recovered = UnidirectionExtractor::new().extract(&marked.image).unwrap();
//! assert_eq!(recovered.image, cover);
//! assert_eq!(&recovered.payload[..7], b"payload");
//! ```

/// `use rdh_core::prelude::*;` to import commonly used items.
pub mod prelude;

pub mod bits;
pub mod buffer;
pub mod compress;
pub mod error;
pub mod histogram;
pub mod raster;
pub mod scale;
pub mod scaling;
pub mod unidirection;

/// Pixels reserved at the raster start for the extractor's bootstrap
pub const HEADER_PIXELS: usize = 17;

/// Largest representable pixel intensity
pub const MAX_PIXEL_VALUE: u8 = 255;

/// Width of a serialized peak coordinate in bits
pub const PEAK_BITS: usize = 8;

/// Width of the compressed-map flag in bits
pub const FLAG_BITS: usize = 1;

/// Width of a compressed-data length field in bits
pub const COMPRESSED_LEN_BITS: usize = 16;

/// Mean-intensity drift at which the brightness-preserving variant forces
/// the shift direction
pub const BRIGHTNESS_THRESHOLD: f64 = 0.5;

/// Tie-breaking epsilon of the range scaler; part of the wire behavior
pub const SCALE_EPS: f64 = 5e-8;

pub use compress::{Codec, Deflate};
pub use error::{RdhError, Result};
pub use raster::Raster;
pub use scaling::{ResidualMode, ScalingEmbedder, ScalingExtractor};
pub use unidirection::{Embedded, Extracted, UnidirectionEmbedder, UnidirectionExtractor};
