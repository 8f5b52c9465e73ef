//! Tracker configuration.

use crate::error::{Error, Result};

/// Layout parameters of a memory view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Bytes shown on one line.
    pub bytes_per_line: usize,
    /// Bytes per addressable unit of the target.
    pub addressable_size: usize,
    /// Boundary that line start addresses are aligned down to.
    pub alignment: u64,
    /// Text shown in place of each unknown byte.
    pub padded_str: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            bytes_per_line: 16,
            addressable_size: 1,
            alignment: 16,
            padded_str: "??".to_owned(),
        }
    }
}

impl TrackerConfig {
    /// Set bytes per line (builder pattern).
    #[must_use]
    pub const fn with_bytes_per_line(mut self, bytes_per_line: usize) -> Self {
        self.bytes_per_line = bytes_per_line;
        self
    }

    /// Set the addressable unit size (builder pattern).
    #[must_use]
    pub const fn with_addressable_size(mut self, addressable_size: usize) -> Self {
        self.addressable_size = addressable_size;
        self
    }

    /// Set the alignment boundary (builder pattern).
    #[must_use]
    pub const fn with_alignment(mut self, alignment: u64) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the placeholder text for unknown bytes (builder pattern).
    #[must_use]
    pub fn with_padded_str(mut self, padded_str: impl Into<String>) -> Self {
        self.padded_str = padded_str.into();
        self
    }

    /// Addressable units covered by one line.
    #[inline]
    pub fn units_per_line(&self) -> u64 {
        (self.bytes_per_line / self.addressable_size.max(1)) as u64
    }

    /// Check that the layout is usable.
    pub fn validate(&self) -> Result<()> {
        if self.bytes_per_line == 0 {
            return Err(Error::InvalidConfig("bytes_per_line must be non-zero".into()));
        }
        if self.addressable_size == 0 {
            return Err(Error::InvalidConfig("addressable_size must be non-zero".into()));
        }
        if self.bytes_per_line % self.addressable_size != 0 {
            return Err(Error::InvalidConfig(format!(
                "bytes_per_line ({}) must be a multiple of addressable_size ({})",
                self.bytes_per_line, self.addressable_size
            )));
        }
        if self.alignment == 0 {
            return Err(Error::InvalidConfig("alignment must be non-zero".into()));
        }
        Ok(())
    }
}
