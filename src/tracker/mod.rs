//! Content tracker: Windows of memory lines with per-byte change flags.
//!
//! A [`ContentTracker`] reads a [`MemorySource`](crate::source::MemorySource)
//! into fixed-width lines, compares them with the lines it rendered last and
//! flags every byte whose value changed.

mod config;
mod input;
#[allow(clippy::module_inception)]
mod tracker;

pub use config::TrackerConfig;
pub use input::{ContentInput, PRE_BUFFER_THRESHOLD};
pub use tracker::{ContentTracker, EventResponse, LoadOutcome, MAX_WINDOW_BYTES};
