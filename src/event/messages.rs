//! Message types for the event bus.

use crate::source::{BlockId, TargetId};

/// Events about memory blocks and their targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryEvent {
    /// Content of a block changed.
    ContentChanged {
        /// The block whose content changed.
        block: BlockId,
    },

    /// Non-content state of a block changed (e.g. its label or base address).
    StateChanged {
        /// The block whose state changed.
        block: BlockId,
    },

    /// A target stopped; memory of all its blocks may have changed.
    Suspended {
        /// The suspended target.
        target: TargetId,
    },

    /// A block was disposed and must no longer be read.
    Disposed {
        /// The disposed block.
        block: BlockId,
    },
}

impl MemoryEvent {
    /// The block this event is about, if it concerns a single block.
    pub const fn block(&self) -> Option<BlockId> {
        match self {
            Self::ContentChanged { block }
            | Self::StateChanged { block }
            | Self::Disposed { block } => Some(*block),
            Self::Suspended { .. } => None,
        }
    }
}
