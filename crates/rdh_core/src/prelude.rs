//! Prelude module for `rdh_core`.
//!
//! This module provides a convenient way to import the types an embedding
//! round trip touches.
//!
//! # Examples
//!
//! ```rust
//! use rdh_core::prelude::*;
//!
//! let cover = Raster::filled(32, 32, 100);
//! let embedder = ScalingEmbedder::new(cover, b"hi", ResidualMode::Plain);
//! let marked = embedder.embed(4).unwrap();
//! let outcome = ScalingExtractor::new(ResidualMode::Plain)
//!     .extract(&marked.image)
//!     .unwrap();
//! assert_eq!(&outcome.payload[..2], b"hi");
//! ```

pub use crate::compress::{Codec, Deflate};
pub use crate::error::{RdhError, Result};
pub use crate::raster::Raster;
pub use crate::scaling::{ResidualMode, ScalingEmbedder, ScalingExtractor};
pub use crate::unidirection::{
	Embedded, Extracted, UnidirectionEmbedder, UnidirectionExtractor,
};
