//! Delta Engine: Per-byte change flags between two snapshots of a line.
//!
//! This module implements the change-highlighting logic:
//! 1. Compare a freshly loaded line with the cached line at the same address
//! 2. Flag every byte whose value differs as `CHANGED`
//! 3. Reuse previous flags when the content is identical, so a reload does
//!    not make highlights flicker
//!
//! Placeholder bytes (not `VALID`) on either side never receive delta state.

use super::byte::ByteFlags;
use super::line::MemoryLine;

/// Result of a delta operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaResult {
    /// Number of byte pairs compared.
    pub bytes_compared: usize,
    /// Number of bytes flagged as changed.
    pub bytes_changed: usize,
    /// Whether flags were copied instead of recomputed (for any line).
    pub copied: bool,
}

impl DeltaResult {
    /// Accumulate another result into this one.
    pub const fn merge(&mut self, other: Self) {
        self.bytes_compared += other.bytes_compared;
        self.bytes_changed += other.bytes_changed;
        self.copied |= other.copied;
    }
}

/// Recompute change flags of `line` against `old`.
///
/// Bytes valid in both lines become `KNOWN`, and `CHANGED` iff the values
/// differ. Any other byte loses its delta state.
pub fn mark_deltas(line: &mut MemoryLine, old: &MemoryLine) -> DeltaResult {
    debug_assert_eq!(line.len(), old.len());

    let mut result = DeltaResult::default();
    for (byte, previous) in line.bytes_mut().iter_mut().zip(old.bytes()) {
        if byte.is_valid() && previous.is_valid() {
            let changed = byte.value() != previous.value();
            byte.mark_changed(changed);
            result.bytes_compared += 1;
            if changed {
                result.bytes_changed += 1;
            }
        } else {
            byte.forget_delta();
        }
    }
    result
}

/// Copy the `KNOWN`/`CHANGED` flags of `old` onto `line`, byte for byte.
pub fn copy_deltas(line: &mut MemoryLine, old: &MemoryLine) -> DeltaResult {
    debug_assert_eq!(line.len(), old.len());

    let delta_bits = ByteFlags::KNOWN | ByteFlags::CHANGED;
    let mut result = DeltaResult {
        copied: true,
        ..DeltaResult::default()
    };
    for (byte, previous) in line.bytes_mut().iter_mut().zip(old.bytes()) {
        let flags = byte.flags().difference(delta_bits) | previous.flags().intersection(delta_bits);
        byte.set_flags(flags);
        if byte.is_changed() {
            result.bytes_changed += 1;
        }
    }
    result
}

/// Clear every `CHANGED` flag of `line`, keeping `KNOWN`.
pub fn unmark_deltas(line: &mut MemoryLine) {
    for byte in line.bytes_mut() {
        byte.clear_changed();
    }
}

/// Check whether the raw content of `line` differs from `old`.
///
/// Values and validity are compared; delta flags are ignored.
pub fn is_line_changed(line: &MemoryLine, old: &MemoryLine) -> bool {
    line.len() != old.len()
        || line
            .bytes()
            .iter()
            .zip(old.bytes())
            .any(|(a, b)| a.value() != b.value() || a.is_valid() != b.is_valid())
}

/// Apply the delta policy for one freshly loaded line.
///
/// With `update_delta` the flags are always recomputed. Without it they are
/// recomputed only if the content differs from `old`, and copied otherwise.
pub fn apply_deltas(line: &mut MemoryLine, old: &MemoryLine, update_delta: bool) -> DeltaResult {
    if update_delta || is_line_changed(line, old) {
        mark_deltas(line, old)
    } else {
        copy_deltas(line, old)
    }
}
