//! `rdh-rs` is a reversible data hiding toolkit for 8-bit grayscale raster
//! images: payloads are embedded into pixel histograms such that both the
//! payload and the exact cover image can be recovered from the marked image.
//!
//! All functionality lives in [`rdh_core`]; this crate re-exports it.

pub use rdh_core::*;
