//! Lossless byte-stream compression collaborator.
//!
//! Location maps and rounding residuals ride the same bitstream as the
//! payload, so their size matters. The cores only require a deterministic
//! pair of operations with `decompress(compress(x)) = x`; the default is a
//! deflate-class codec.

use crate::error::{RdhError, Result};

/// Two-operation protocol the embedding cores compress side information with
pub trait Codec {
	/// Compresses a byte stream.
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

	/// Decompresses a byte stream previously produced by
	/// [`compress`](Self::compress).
	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Default deflate codec
#[derive(Debug, Default, Clone, Copy)]
pub struct Deflate;

impl Codec for Deflate {
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
		Ok(miniz_oxide::deflate::compress_to_vec(data, 6))
	}

	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
		miniz_oxide::inflate::decompress_to_vec(data).map_err(|err| RdhError::Compression {
			reason: err.to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_deflate_roundtrip() {
		let data: Vec<u8> = (0..255).cycle().take(4096).collect();
		let codec = Deflate;
		let packed = codec.compress(&data).unwrap();
		assert_eq!(codec.decompress(&packed).unwrap(), data);
	}

	#[test]
	fn test_deflate_shrinks_redundant_data() {
		let data = vec![0u8; 4096];
		let packed = Deflate.compress(&data).unwrap();
		assert!(packed.len() < data.len());
	}

	#[test]
	fn test_decompress_rejects_garbage() {
		assert!(Deflate.decompress(&[0xAA, 0x55, 0xAA, 0x55]).is_err());
	}
}
