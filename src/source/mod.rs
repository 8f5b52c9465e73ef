//! Byte sources: Where target memory comes from.
//!
//! Two kinds of source exist:
//! - [`SimpleMemoryBlock`]: a fixed block that always returns all of its bytes
//! - [`ExtendedMemoryBlock`]: reads from arbitrary addresses, declares its own
//!   address size and may track changes itself
//!
//! A [`MemorySource`] binds one of them to the block and target identities
//! used for event routing.

mod in_memory;

pub use in_memory::{InMemoryBlock, InMemoryExtendedBlock, SharedMemory};

use crate::error::SourceError;
use crate::memory::{Address, MemoryByte};

/// Identifier of a memory block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BlockId(pub u32);

impl BlockId {
    /// Create a new block ID.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Identifier of the debug target a block belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TargetId(pub u32);

impl TargetId {
    /// Create a new target ID.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Lifecycle state of a debug target.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum TargetStatus {
    /// Target is executing.
    #[default]
    Running,
    /// Target is stopped and memory is stable.
    Suspended,
    /// Debugger lost the connection to the target.
    Disconnected,
    /// Target process has exited.
    Terminated,
}

impl TargetStatus {
    /// Whether memory can no longer be read from the target.
    pub const fn is_gone(self) -> bool {
        matches!(self, Self::Disconnected | Self::Terminated)
    }
}

/// A fixed memory block that returns its whole content on every read.
pub trait SimpleMemoryBlock {
    /// Address of the first byte of the block.
    fn start_address(&self) -> u64;

    /// Length of the block in bytes.
    fn length(&self) -> u64;

    /// Read the whole block.
    ///
    /// `Ok(None)` means the source unexpectedly had no content.
    fn bytes(&mut self) -> Result<Option<Vec<u8>>, SourceError>;

    /// Current state of the owning target.
    fn target_status(&self) -> TargetStatus {
        TargetStatus::Running
    }
}

/// A memory block that can be read at arbitrary addresses.
pub trait ExtendedMemoryBlock {
    /// Base address the block was created for.
    fn base_address(&self) -> Address;

    /// Address size in bytes, or 0 if the block does not know it.
    fn address_size(&self) -> usize {
        0
    }

    /// Number of bytes in one addressable unit.
    fn addressable_size(&self) -> usize {
        1
    }

    /// Whether the block sets `KNOWN`/`CHANGED` flags on the bytes it returns.
    fn supports_change_management(&self) -> bool {
        false
    }

    /// Read `units` addressable units starting at `start`.
    ///
    /// The result may be shorter than requested. `Ok(None)` means the source
    /// unexpectedly had no content.
    fn bytes_from_address(
        &mut self,
        start: &Address,
        units: u64,
    ) -> Result<Option<Vec<MemoryByte>>, SourceError>;

    /// Current state of the owning target.
    fn target_status(&self) -> TargetStatus {
        TargetStatus::Running
    }
}

/// The two source variants.
pub enum SourceKind {
    /// Fixed block.
    Simple(Box<dyn SimpleMemoryBlock>),
    /// Addressable block.
    Extended(Box<dyn ExtendedMemoryBlock>),
}

impl std::fmt::Debug for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple(_) => f.write_str("Simple"),
            Self::Extended(_) => f.write_str("Extended"),
        }
    }
}

/// A byte source bound to its block and target identities.
#[derive(Debug)]
pub struct MemorySource {
    block: BlockId,
    target: TargetId,
    kind: SourceKind,
}

impl MemorySource {
    /// Wrap a simple block.
    pub fn simple(block: BlockId, target: TargetId, source: impl SimpleMemoryBlock + 'static) -> Self {
        Self {
            block,
            target,
            kind: SourceKind::Simple(Box::new(source)),
        }
    }

    /// Wrap an extended block.
    pub fn extended(
        block: BlockId,
        target: TargetId,
        source: impl ExtendedMemoryBlock + 'static,
    ) -> Self {
        Self {
            block,
            target,
            kind: SourceKind::Extended(Box::new(source)),
        }
    }

    /// Block identity.
    pub const fn block(&self) -> BlockId {
        self.block
    }

    /// Target identity.
    pub const fn target(&self) -> TargetId {
        self.target
    }

    /// The wrapped source.
    pub const fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Mutable access to the wrapped source.
    pub fn kind_mut(&mut self) -> &mut SourceKind {
        &mut self.kind
    }

    /// Whether this is an extended source.
    pub fn is_extended(&self) -> bool {
        matches!(self.kind, SourceKind::Extended(_))
    }

    /// Current state of the owning target.
    pub fn target_status(&self) -> TargetStatus {
        match &self.kind {
            SourceKind::Simple(block) => block.target_status(),
            SourceKind::Extended(block) => block.target_status(),
        }
    }

    /// Address size declared by the source (0 if undeclared).
    pub fn declared_address_size(&self) -> usize {
        match &self.kind {
            SourceKind::Simple(_) => 0,
            SourceKind::Extended(block) => block.address_size(),
        }
    }

    /// Addressable unit size declared by the source, if it declares one.
    pub fn declared_addressable_size(&self) -> Option<usize> {
        match &self.kind {
            SourceKind::Simple(_) => None,
            SourceKind::Extended(block) => Some(block.addressable_size()),
        }
    }

    /// Whether the tracker must compute deltas itself.
    pub fn tracker_manages_deltas(&self) -> bool {
        match &self.kind {
            SourceKind::Simple(_) => true,
            SourceKind::Extended(block) => !block.supports_change_management(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_status_gone() {
        assert!(!TargetStatus::Running.is_gone());
        assert!(!TargetStatus::Suspended.is_gone());
        assert!(TargetStatus::Disconnected.is_gone());
        assert!(TargetStatus::Terminated.is_gone());
    }

    #[test]
    fn test_simple_source_properties() {
        let memory = SharedMemory::new(0x100, vec![0; 4]);
        let source = MemorySource::simple(BlockId::new(1), TargetId::new(2), InMemoryBlock::new(memory));
        assert!(!source.is_extended());
        assert!(source.tracker_manages_deltas());
        assert_eq!(source.declared_address_size(), 0);
        assert_eq!(source.block(), BlockId(1));
        assert_eq!(source.target(), TargetId(2));
    }

    #[test]
    fn test_extended_source_properties() {
        let memory = SharedMemory::new(0x100, vec![0; 4]);
        let block = InMemoryExtendedBlock::new(memory)
            .with_address_size(8)
            .with_change_management(true);
        let source = MemorySource::extended(BlockId::new(1), TargetId::new(2), block);
        assert!(source.is_extended());
        assert!(!source.tracker_manages_deltas());
        assert_eq!(source.declared_address_size(), 8);
    }

    #[test]
    fn test_status_follows_shared_memory() {
        let memory = SharedMemory::new(0, vec![0; 4]);
        let source = MemorySource::simple(BlockId::new(1), TargetId::new(1), InMemoryBlock::new(memory.clone()));
        assert_eq!(source.target_status(), TargetStatus::Suspended);
        memory.set_status(TargetStatus::Terminated);
        assert!(source.target_status().is_gone());
    }
}
