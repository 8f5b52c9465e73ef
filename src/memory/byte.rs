//! `MemoryByte`: The atomic unit of a memory view.
//!
//! # Memory Layout
//!
//! ```text
//! ┌─────────┬─────────┐
//! │  value  │  flags  │
//! │   u8    │   u8    │
//! └─────────┴─────────┘
//! ```
//!
//! Two bytes per entry keeps a full window of lines small enough to clone
//! into the line cache on every refresh cycle.

use bitflags::bitflags;

bitflags! {
    /// Per-byte state flags.
    ///
    /// A byte that is not `KNOWN` never carries `CHANGED`: without a known
    /// previous value there is no meaningful delta.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ByteFlags: u8 {
        /// Byte cannot be written back to the target
        const READONLY = 0b0000_0001;
        /// Byte holds real content retrieved from the target
        const VALID = 0b0000_0010;
        /// Value differs from the previously displayed value
        const CHANGED = 0b0000_0100;
        /// Change state has been determined for this byte
        const KNOWN = 0b0000_1000;
    }
}

impl std::fmt::Debug for ByteFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// A single byte of target memory together with its state flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryByte {
    value: u8,
    flags: ByteFlags,
}

const _: () = assert!(
    std::mem::size_of::<MemoryByte>() == 2,
    "MemoryByte must stay two bytes wide"
);

impl Default for MemoryByte {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

impl MemoryByte {
    /// Placeholder used for padding and dummy content: zero, read-only, unknown.
    pub const PLACEHOLDER: Self = Self {
        value: 0,
        flags: ByteFlags::READONLY,
    };

    /// Create a byte with explicit flags.
    ///
    /// `CHANGED` is dropped when `KNOWN` is absent.
    #[inline]
    pub const fn new(value: u8, flags: ByteFlags) -> Self {
        Self {
            value,
            flags: Self::normalize(flags),
        }
    }

    /// Create a valid byte as read from the target, with no delta information.
    #[inline]
    pub const fn valid(value: u8) -> Self {
        Self {
            value,
            flags: ByteFlags::VALID,
        }
    }

    #[inline]
    const fn normalize(flags: ByteFlags) -> ByteFlags {
        if flags.contains(ByteFlags::KNOWN) {
            flags
        } else {
            flags.difference(ByteFlags::CHANGED)
        }
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Get the flags.
    #[inline]
    pub const fn flags(&self) -> ByteFlags {
        self.flags
    }

    /// Check whether the byte is read-only.
    #[inline]
    pub const fn is_readonly(&self) -> bool {
        self.flags.contains(ByteFlags::READONLY)
    }

    /// Check whether the byte holds real target content.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.flags.contains(ByteFlags::VALID)
    }

    /// Check whether change state is known.
    #[inline]
    pub const fn is_known(&self) -> bool {
        self.flags.contains(ByteFlags::KNOWN)
    }

    /// Check whether the byte changed since it was last displayed.
    #[inline]
    pub const fn is_changed(&self) -> bool {
        self.flags.contains(ByteFlags::CHANGED)
    }

    /// Replace the flags, keeping the known/changed invariant.
    #[inline]
    pub const fn set_flags(&mut self, flags: ByteFlags) -> &mut Self {
        self.flags = Self::normalize(flags);
        self
    }

    /// Mark the byte as known, changed or unchanged.
    #[inline]
    pub const fn mark_changed(&mut self, changed: bool) -> &mut Self {
        self.flags = self.flags.union(ByteFlags::KNOWN);
        if changed {
            self.flags = self.flags.union(ByteFlags::CHANGED);
        } else {
            self.flags = self.flags.difference(ByteFlags::CHANGED);
        }
        self
    }

    /// Drop the `CHANGED` flag, keeping everything else.
    #[inline]
    pub const fn clear_changed(&mut self) -> &mut Self {
        self.flags = self.flags.difference(ByteFlags::CHANGED);
        self
    }

    /// Drop both `KNOWN` and `CHANGED`, discarding any delta state.
    #[inline]
    pub const fn forget_delta(&mut self) -> &mut Self {
        self.flags = self
            .flags
            .difference(ByteFlags::KNOWN.union(ByteFlags::CHANGED));
        self
    }

    /// Set the read-only flag (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_readonly(mut self, readonly: bool) -> Self {
        if readonly {
            self.flags = self.flags.union(ByteFlags::READONLY);
        } else {
            self.flags = self.flags.difference(ByteFlags::READONLY);
        }
        self
    }
}

impl std::fmt::Debug for MemoryByte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryByte")
            .field("value", &format_args!("{:#04x}", self.value))
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_size() {
        assert_eq!(std::mem::size_of::<MemoryByte>(), 2);
    }

    #[test]
    fn test_placeholder() {
        let b = MemoryByte::PLACEHOLDER;
        assert_eq!(b.value(), 0);
        assert!(b.is_readonly());
        assert!(!b.is_valid());
        assert!(!b.is_known());
        assert_eq!(MemoryByte::default(), b);
    }

    #[test]
    fn test_changed_requires_known() {
        let b = MemoryByte::new(7, ByteFlags::VALID | ByteFlags::CHANGED);
        assert!(!b.is_changed());

        let b = MemoryByte::new(7, ByteFlags::VALID | ByteFlags::KNOWN | ByteFlags::CHANGED);
        assert!(b.is_changed());

        let mut b = MemoryByte::valid(7);
        b.set_flags(ByteFlags::CHANGED);
        assert!(!b.is_changed());
    }

    #[test]
    fn test_mark_changed() {
        let mut b = MemoryByte::valid(1);
        b.mark_changed(true);
        assert!(b.is_known());
        assert!(b.is_changed());

        b.mark_changed(false);
        assert!(b.is_known());
        assert!(!b.is_changed());
    }

    #[test]
    fn test_clear_and_forget() {
        let mut b = MemoryByte::valid(1);
        b.mark_changed(true);
        b.clear_changed();
        assert!(b.is_known());
        assert!(!b.is_changed());

        b.mark_changed(true);
        b.forget_delta();
        assert!(!b.is_known());
        assert!(!b.is_changed());
        assert!(b.is_valid());
    }

    #[test]
    fn test_with_readonly() {
        let b = MemoryByte::valid(9).with_readonly(true);
        assert!(b.is_readonly());
        assert!(b.is_valid());
        assert!(!b.with_readonly(false).is_readonly());
    }
}
