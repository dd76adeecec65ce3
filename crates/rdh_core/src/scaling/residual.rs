//! Rounding-residual serialization strategies.

use crate::bits::{bits_to_integers, integers_to_bits};
use crate::buffer::BitBuffer;
use crate::error::{RdhError, Result};
use crate::scale::{mapped_value_mask, residual_bit_widths, rounding_residual};

use super::ResidualMode;

/// Serializes the rounding residual of a scale-down per the chosen mode.
///
/// `original` and `scaled` are the body before and after scaling;
/// `scaled_max` is the scaling target `255 - 2k`.
pub(crate) fn encode_residual(
	mode: ResidualMode,
	original: &[u8],
	scaled: &[u8],
	original_min: u8,
	original_max: u8,
	scaled_max: u8,
) -> Result<Vec<bool>> {
	let residual = rounding_residual(original, scaled, original_min, original_max);
	let range = original_max - original_min;

	match mode {
		ResidualMode::Plain => {
			require_binary(&residual)?;
			let mask = mapped_value_mask(range, scaled_max);
			Ok(scaled
				.iter()
				.zip(residual.iter())
				.filter(|&(&value, _)| mask[value as usize])
				.map(|(_, &res)| res == 1)
				.collect())
		}
		ResidualMode::ValueOrdered => {
			require_binary(&residual)?;
			let mask = mapped_value_mask(range, scaled_max);
			let mut bits = Vec::new();
			for value in 0..=u8::MAX {
				if !mask[value as usize] {
					continue;
				}
				for (&scaled_px, &res) in scaled.iter().zip(residual.iter()) {
					if scaled_px == value {
						bits.push(res == 1);
					}
				}
			}
			Ok(bits)
		}
		ResidualMode::VariableBits { max_bits_per_bin } => {
			let widths = residual_bit_widths(range, scaled_max);
			let widest = widths.iter().copied().max().unwrap_or(0);
			if widest > max_bits_per_bin {
				return Err(RdhError::IterationsLimitExceeded {
					reason: format!(
						"residual needs {widest} bits per pixel in the fullest bin, \
						 limit is {max_bits_per_bin}"
					),
				});
			}

			let mut bits = Vec::new();
			for value in 0..=u8::MAX {
				let width = widths[value as usize];
				if width == 0 {
					continue;
				}
				let group: Vec<u8> = scaled
					.iter()
					.zip(residual.iter())
					.filter(|&(&scaled_px, _)| scaled_px == value)
					.map(|(_, &res)| res as u8)
					.collect();
				bits.extend(integers_to_bits(&group, width as usize));
			}
			Ok(bits)
		}
	}
}

/// Undoes the recorded residual on a scaled-back body, in the same order the
/// embedder serialized it.
///
/// `scaled` is the body after the headroom shift was removed; `recovered`
/// is its scale-up, still relative to `original_min = 0`.
pub(crate) fn apply_residual(
	mode: ResidualMode,
	scaled: &[u8],
	recovered: &mut [u8],
	residual: &mut BitBuffer,
	original_range: u8,
	scaled_max: u8,
) -> Result<()> {
	match mode {
		ResidualMode::Plain => {
			let mask = mapped_value_mask(original_range, scaled_max);
			for (index, &value) in scaled.iter().enumerate() {
				if mask[value as usize] && residual.next_bit()? {
					recovered[index] = recovered[index].wrapping_sub(1);
				}
			}
			Ok(())
		}
		ResidualMode::ValueOrdered => {
			let mask = mapped_value_mask(original_range, scaled_max);
			for value in 0..=u8::MAX {
				if !mask[value as usize] {
					continue;
				}
				for (index, &scaled_px) in scaled.iter().enumerate() {
					if scaled_px == value && residual.next_bit()? {
						recovered[index] = recovered[index].wrapping_sub(1);
					}
				}
			}
			Ok(())
		}
		ResidualMode::VariableBits { .. } => {
			let widths = residual_bit_widths(original_range, scaled_max);
			for value in 0..=u8::MAX {
				let width = widths[value as usize] as usize;
				if width == 0 {
					continue;
				}

				let positions: Vec<usize> = scaled
					.iter()
					.enumerate()
					.filter(|&(_, &scaled_px)| scaled_px == value)
					.map(|(index, _)| index)
					.collect();
				if positions.is_empty() {
					continue;
				}

				let bits = residual.next_exact(positions.len() * width)?;
				let values = bits_to_integers(&bits, width);
				for (&index, &res) in positions.iter().zip(values.iter()) {
					recovered[index] = recovered[index].wrapping_sub(res);
				}
			}
			Ok(())
		}
	}
}

/// Plain and value-ordered residuals carry one bit per pixel, so the
/// residual value set must be confined to `{0, 1}`.
fn require_binary(residual: &[i16]) -> Result<()> {
	if let Some(&bad) = residual.iter().find(|&&res| res != 0 && res != 1) {
		return Err(RdhError::IterationsLimitExceeded {
			reason: format!("rounding residual contains {bad}, expected only 0 or 1"),
		});
	}
	Ok(())
}
