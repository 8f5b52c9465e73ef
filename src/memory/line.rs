//! `MemoryLine`: A fixed-width, addressed run of memory bytes.

use super::address::Address;
use super::byte::MemoryByte;

/// One line of a memory view.
///
/// Every line in a window holds exactly the configured number of bytes per
/// line. The address is the address of the first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLine {
    address: Address,
    bytes: Vec<MemoryByte>,
    index: usize,
    /// Whether delta information for this line can be trusted.
    pub monitored: bool,
    padded_str: String,
}

impl MemoryLine {
    /// Create a new, unmonitored line.
    pub fn new(address: Address, bytes: Vec<MemoryByte>, index: usize, padded_str: &str) -> Self {
        Self {
            address,
            bytes,
            index,
            monitored: false,
            padded_str: padded_str.to_owned(),
        }
    }

    /// Address of the first byte.
    #[inline]
    pub const fn address(&self) -> &Address {
        &self.address
    }

    /// Position of this line within its window.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The bytes of this line.
    #[inline]
    pub fn bytes(&self) -> &[MemoryByte] {
        &self.bytes
    }

    /// Mutable access to the bytes of this line.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [MemoryByte] {
        &mut self.bytes
    }

    /// Number of bytes in the line.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the line has no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Text shown in place of each unknown byte.
    #[inline]
    pub fn padded_str(&self) -> &str {
        &self.padded_str
    }

    /// Check whether any byte is flagged as changed.
    pub fn has_changes(&self) -> bool {
        self.bytes.iter().any(MemoryByte::is_changed)
    }

    /// Check whether every byte carries known change state.
    pub fn all_known(&self) -> bool {
        self.bytes.iter().all(MemoryByte::is_known)
    }

    /// Raw values of the line.
    pub fn values(&self) -> Vec<u8> {
        self.bytes.iter().map(MemoryByte::value).collect()
    }
}
