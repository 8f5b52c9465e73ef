//! Memory module: Core data structures for line buffering.
//!
//! This module contains:
//! - [`Address`]: Arbitrary-precision target address
//! - [`MemoryByte`]: One byte of target memory with its state flags
//! - [`ByteFlags`]: Read-only / valid / known / changed bitflags
//! - [`MemoryLine`]: A fixed-width addressed line of bytes
//! - [`delta`]: Change-flag computation between line snapshots

mod address;
mod byte;
mod line;
pub mod delta;

pub use address::{inferred_address_size, Address, CHARS_PER_BYTE};
pub use byte::{ByteFlags, MemoryByte};
pub use delta::DeltaResult;
pub use line::MemoryLine;
