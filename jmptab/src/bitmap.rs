//! Bitmap API.

use alloc::{vec, vec::Vec};

/// Bit-compressed [`Vec<bool>`].
pub struct BitMap {
    /// Underlying container.
    ///
    /// Bit `index` is stored in byte `index / 8` at bit `index % 8`, counting from LSB.
    data: Vec<u8>,
}

impl BitMap {
    /// Create a bitmap of a given length, filled with zero bits.
    pub fn new_zeros(len: usize) -> Self {
        Self {
            data: vec![0; len.div_ceil(8)],
        }
    }

    /// Get the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> bool {
        self.data[index / 8] & (1 << (index % 8)) != 0
    }

    /// Set the bit at `index` to one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize) {
        self.data[index / 8] |= 1 << (index % 8);
    }

    /// Count one bits.
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|byte| byte.count_ones() as usize).sum()
    }
}
