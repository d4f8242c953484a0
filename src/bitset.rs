//! A packed array of bits, used as an occupancy filter.

use crate::{DynaBuf, Error};

/// A fixed number of bits stored eight to a byte in a [`DynaBuf`].
///
/// Bit `i` lives in byte `i >> 3`, at position `i % 8`.
#[derive(Clone, Debug)]
pub struct Bitset {
    bytes: DynaBuf,
}

#[inline]
fn bytes_for(bits: usize) -> usize {
    // Never less than one byte.
    usize::max(1, (bits >> 3) + usize::from(bits & 7 != 0))
}

impl Bitset {
    /// Creates a bitset with room for at least `max_bits` bits, all clear.
    pub fn new(max_bits: usize) -> Result<Self, Error> {
        Ok(Self {
            bytes: DynaBuf::new(bytes_for(max_bits), 1)?,
        })
    }

    /// Returns the number of bits the set can address.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn bits(&self) -> usize {
        self.bytes.capacity() << 3
    }

    /// Returns `true` if bit `key` is set.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not less than [`Bitset::bits`].
    #[inline]
    pub fn contains(&self, key: usize) -> bool {
        (self.bytes.as_bytes()[key >> 3] >> (key & 7)) & 1 == 1
    }

    /// Sets bit `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not less than [`Bitset::bits`].
    #[inline]
    pub fn add(&mut self, key: usize) {
        self.bytes.as_bytes_mut()[key >> 3] |= 1 << (key & 7);
    }

    /// Clears bit `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not less than [`Bitset::bits`].
    #[inline]
    pub fn remove(&mut self, key: usize) {
        self.bytes.as_bytes_mut()[key >> 3] &= !(1 << (key & 7));
    }

    /// Grows or shrinks the set to address at least `max_bits` bits.
    ///
    /// Existing bytes are kept verbatim; new bytes start clear.
    pub fn resize(&mut self, max_bits: usize) -> Result<(), Error> {
        self.bytes.resize(bytes_for(max_bits))
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.bytes.as_bytes_mut().fill(0);
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bytes
            .as_bytes()
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum()
    }

    /// The packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_bytes()
    }
}
