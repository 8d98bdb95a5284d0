use crate::common::config::{Key, Position, is_prime};

/// Division-method hash functions over a fixed table size.
///
/// `get_hash` is the home position used by every strategy. `get_step` is the second hash used
/// by double hashing: `R - (key mod R)` where `R` is the largest prime below the table size,
/// so the jump is never zero and never a multiple of the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFunction {
    size: usize,
    step_modulus: usize,
}

impl HashFunction {
    /// Creates a new `HashFunction` for a table of `size` positions.
    ///
    /// # Parameters
    /// - `size`: Number of positions. Must be at least 1.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let step_modulus = (2..size).rev().find(|&n| is_prime(n)).unwrap_or(1);
        Self { size, step_modulus }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the home position of `key`: `key mod size`.
    pub fn get_hash(&self, key: Key) -> Position {
        key as usize % self.size
    }

    /// Returns the double-hashing jump for `key`, always in `1..size` when `size > 1`.
    pub fn get_step(&self, key: Key) -> usize {
        self.step_modulus - (key as usize % self.step_modulus)
    }

    /// The modulus of the second hash (`R` in `R - key mod R`).
    pub fn step_modulus(&self) -> usize {
        self.step_modulus
    }
}
