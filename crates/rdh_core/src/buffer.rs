//! FIFO bit buffer shared by the embedding and extraction state machines.
//!
//! The buffer is a single growing bit vector with a read cursor. Payload
//! sources are appended at the end (`push`), while per-iteration overhead is
//! spliced in at the cursor (`add`) so it is consumed before any pending
//! payload — this ordering is what puts each overhead frame at the front of
//! its iteration's embedded chunk.

use crate::error::{RdhError, Result};

/// Ordered sequence of bits with a read cursor
#[derive(Debug, Default, Clone)]
pub struct BitBuffer {
	bits: Vec<bool>,
	cursor: usize,
}

impl BitBuffer {
	/// Creates an empty buffer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a buffer from one source sequence.
	pub fn from_bits(bits: Vec<bool>) -> Self {
		Self { bits, cursor: 0 }
	}

	/// Number of bits not yet consumed
	pub fn remaining(&self) -> usize {
		self.bits.len() - self.cursor
	}

	/// True when every bit has been consumed
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Appends bits at the end (payload path).
	pub fn push(&mut self, bits: &[bool]) {
		self.bits.extend_from_slice(bits);
	}

	/// Inserts bits at the read cursor (overhead path).
	///
	/// The inserted bits are the next to be consumed, ahead of whatever
	/// unread payload is still in the buffer.
	pub fn add(&mut self, bits: &[bool]) {
		self.bits.splice(self.cursor..self.cursor, bits.iter().copied());
	}

	/// Consumes the next `count` bits, padding with zeros past the end.
	///
	/// Embed side only: the zero padding becomes embedded filler once the
	/// payload runs dry.
	pub fn next_padded(&mut self, count: usize) -> Vec<bool> {
		let available = self.remaining().min(count);
		let mut taken = self.bits[self.cursor..self.cursor + available].to_vec();
		self.cursor += available;
		taken.resize(count, false);
		taken
	}

	/// Consumes exactly `count` bits or fails.
	///
	/// Extract side only: running out of bits mid-frame means the marked
	/// image is inconsistent, never something to paper over with padding.
	pub fn next_exact(&mut self, count: usize) -> Result<Vec<bool>> {
		if self.remaining() < count {
			return Err(RdhError::invalid_image(format!(
				"bit stream underrun: needed {count} bits, {} available",
				self.remaining()
			)));
		}

		let taken = self.bits[self.cursor..self.cursor + count].to_vec();
		self.cursor += count;
		Ok(taken)
	}

	/// Consumes a single bit or fails.
	pub fn next_bit(&mut self) -> Result<bool> {
		Ok(self.next_exact(1)?[0])
	}

	/// Consumes everything left in the buffer.
	pub fn drain(&mut self) -> Vec<bool> {
		let taken = self.bits[self.cursor..].to_vec();
		self.cursor = self.bits.len();
		taken
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_push_then_consume() {
		let mut buffer = BitBuffer::new();
		buffer.push(&[true, false, true]);
		assert_eq!(buffer.remaining(), 3);
		assert_eq!(buffer.next_exact(2).unwrap(), vec![true, false]);
		assert_eq!(buffer.drain(), vec![true]);
		assert!(buffer.is_empty());
	}

	#[test]
	fn test_add_inserts_at_cursor() {
		let mut buffer = BitBuffer::from_bits(vec![true, true, true, true]);
		buffer.next_exact(2).unwrap();
		buffer.add(&[false, false]);
		// the spliced bits come out before the remaining payload
		assert_eq!(buffer.drain(), vec![false, false, true, true]);
	}

	#[test]
	fn test_padded_read_extends_with_zeros() {
		let mut buffer = BitBuffer::from_bits(vec![true]);
		assert_eq!(buffer.next_padded(3), vec![true, false, false]);
		assert!(buffer.is_empty());
		// once drained, further padded reads are all zeros
		assert_eq!(buffer.next_padded(2), vec![false, false]);
	}

	#[test]
	fn test_exact_read_fails_on_underrun() {
		let mut buffer = BitBuffer::from_bits(vec![true, false]);
		assert!(buffer.next_exact(3).is_err());
		// the failed read must not consume anything
		assert_eq!(buffer.remaining(), 2);
	}

	#[test]
	fn test_add_after_exhaustion_appends() {
		let mut buffer = BitBuffer::from_bits(vec![true]);
		buffer.next_padded(4);
		buffer.add(&[false, true]);
		assert_eq!(buffer.drain(), vec![false, true]);
	}
}
