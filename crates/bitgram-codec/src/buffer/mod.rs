//! The typed message buffer.
//!
//! [`MessageBuffer`] is a bit-addressed read/write façade over a growable
//! byte array. Writes append at `bit_length`; reads consume from
//! `read_position`. Both positions are measured in bits.

use std::sync::Arc;

use bitgram_core::{
    byte_pool::ByteArrayPool,
    constants::DEFAULT_BUFFER_SIZE,
    error::{ErrorKind, Result},
};

mod read;
mod write;

#[cfg(test)]
mod tests;

/// Bit-addressed read/write façade over a growable byte array.
///
/// Invariants: `bit_length <= 8 * data.len()` and
/// `read_position <= bit_length`, except that a hostile string length makes
/// the reader consume the remainder of the buffer in one step.
///
/// Storage grows by doubling and never shrinks implicitly. When a write
/// straddles the current end, the trailing bits up to the next byte boundary
/// stay zero.
pub struct MessageBuffer {
    pub(crate) data: Vec<u8>,
    pub(crate) bit_length: usize,
    pub(crate) read_position: usize,
    pub(crate) pool: Option<Arc<ByteArrayPool>>,
}

impl MessageBuffer {
    /// Creates an empty buffer with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// Creates an empty buffer with `bytes` of initial capacity.
    pub fn with_capacity(bytes: usize) -> Self {
        Self { data: vec![0; bytes], bit_length: 0, read_position: 0, pool: None }
    }

    /// Creates a buffer wrapping caller-supplied bytes; every supplied byte
    /// counts as meaningful data.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let bit_length = data.len() * 8;
        Self { data, bit_length, read_position: 0, pool: None }
    }

    /// Attaches a byte pool used for read-side scratch arrays.
    pub fn attach_pool(&mut self, pool: Arc<ByteArrayPool>) {
        self.pool = Some(pool);
    }

    /// Returns the meaningful bytes written so far.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.byte_length()]
    }

    /// Returns the count of meaningful bits.
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    /// Returns the count of meaningful bytes, rounding the last partial byte up.
    pub fn byte_length(&self) -> usize {
        (self.bit_length + 7) / 8
    }

    /// Returns the current read position in bits.
    pub fn read_position(&self) -> usize {
        self.read_position
    }

    /// Moves the read position to an absolute bit offset.
    pub fn set_read_position(&mut self, bits: usize) {
        assert!(bits <= self.bit_length, "read position {bits} past bit length {}", self.bit_length);
        self.read_position = bits;
    }

    /// Returns the number of unread bits.
    pub fn remaining_bits(&self) -> usize {
        self.bit_length - self.read_position
    }

    /// Rewinds the read position to the start of the buffer.
    pub fn reset_read(&mut self) {
        self.read_position = 0;
    }

    /// Consumes the buffer, returning the meaningful bytes.
    pub fn into_payload(mut self) -> Vec<u8> {
        let len = self.byte_length();
        self.data.truncate(len);
        self.data
    }

    /// Consumes the buffer, returning the full backing storage so the owner
    /// can recycle it into a byte pool.
    pub fn into_storage(self) -> Vec<u8> {
        self.data
    }

    /// Rounds the write position up to the next byte boundary, padding with
    /// zero bits.
    pub fn write_pad_bits(&mut self) {
        let total = (self.bit_length + 7) & !7;
        self.ensure_capacity_bits(total);
        self.bit_length = total;
    }

    /// Advances the write position by exactly `bits` zero bits.
    pub fn write_pad_bits_count(&mut self, bits: usize) {
        let total = self.bit_length + bits;
        self.ensure_capacity_bits(total);
        self.bit_length = total;
    }

    /// Rounds the read position up to the next byte boundary. Idempotent.
    pub fn read_pad_bits(&mut self) -> Result<()> {
        let target = (self.read_position + 7) & !7;
        if target > self.bit_length {
            return Err(ErrorKind::ReadOverflow {
                needed: target - self.read_position,
                available: self.remaining_bits(),
            });
        }
        self.read_position = target;
        Ok(())
    }

    /// Advances the read position by exactly `bits`.
    pub fn skip_pad_bits(&mut self, bits: usize) -> Result<()> {
        self.ensure_readable(bits)?;
        self.read_position += bits;
        Ok(())
    }

    /// Grows the backing storage (by doubling) so it can hold `total_bits`.
    pub(crate) fn ensure_capacity_bits(&mut self, total_bits: usize) {
        let needed = (total_bits + 7) / 8;
        if self.data.len() < needed {
            let doubled = self.data.len() * 2;
            self.data.resize(needed.max(doubled), 0);
        }
    }

    /// Fails with `ReadOverflow` when fewer than `bits` remain unread.
    pub(crate) fn ensure_readable(&self, bits: usize) -> Result<()> {
        if self.remaining_bits() < bits {
            return Err(ErrorKind::ReadOverflow { needed: bits, available: self.remaining_bits() });
        }
        Ok(())
    }

    /// Takes a scratch array from the attached pool, or allocates one.
    pub(crate) fn take_scratch(&self, len: usize) -> Vec<u8> {
        match &self.pool {
            Some(pool) => pool.get(len),
            None => vec![0; len],
        }
    }

    /// Returns a scratch array to the attached pool, if any.
    pub(crate) fn return_scratch(&self, scratch: Vec<u8>) {
        if let Some(pool) = &self.pool {
            pool.recycle(scratch);
        }
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBuffer")
            .field("bit_length", &self.bit_length)
            .field("read_position", &self.read_position)
            .field("capacity", &self.data.len())
            .finish()
    }
}
