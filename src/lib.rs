//! # Memline
//!
//! Memory line buffering and per-byte delta tracking for debugger memory views.
//!
//! Memline turns target memory into fixed-width, addressed lines and flags
//! every byte whose value changed since the view was last refreshed. It draws
//! nothing itself: a [`RenderingHost`] displays the lines and a [`Rendering`]
//! formats them.
//!
//! ## Core Concepts
//!
//! - **Byte sources**: simple blocks hand over all their bytes, extended
//!   blocks are read by address and may track changes themselves
//! - **Windows**: every load yields exactly the requested number of lines,
//!   padded with read-only placeholders when the source comes up short
//! - **Line cache**: the lines shown at the last refresh, compared byte by
//!   byte with every new load
//! - **Events**: content changes and suspends arrive over a bus and trigger
//!   the refresh cycle
//!
//! ## Example
//!
//! ```rust,ignore
//! use memline::{Address, ContentTracker, MemorySource, RecordingHost, TrackerConfig};
//! use memline::source::{BlockId, InMemoryExtendedBlock, SharedMemory, TargetId};
//!
//! let memory = SharedMemory::new(0x1000, vec![0; 256]);
//! let source = MemorySource::extended(BlockId(1), TargetId(1), InMemoryExtendedBlock::new(memory));
//! let mut tracker = ContentTracker::new(source, RecordingHost::new(), TrackerConfig::default())?;
//!
//! let _ = tracker.load_lines(&Address::from(0x1000u64), 8, false);
//! tracker.update_content();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod context;
pub mod error;
pub mod event;
pub mod host;
pub mod memory;
pub mod rendering;
pub mod source;
pub mod tab;
pub mod tracker;

// Re-exports for convenience
pub use context::{MemoryContext, Preferences};
pub use error::{Error, Result, SourceError};
pub use event::{EventBus, MemoryEvent, Subscription};
pub use host::{RecordingHost, RenderingHost};
pub use memory::{Address, ByteFlags, MemoryByte, MemoryLine};
pub use rendering::{Rendering, RenderingRegistry};
pub use source::{BlockId, MemorySource, TargetId, TargetStatus};
pub use tab::{MemoryTab, Row};
pub use tracker::{ContentInput, ContentTracker, EventResponse, LoadOutcome, TrackerConfig};
