//! Per-view content input: what part of a block a view wants to see.

use crate::memory::Address;

/// Addresses below this never get a pre-buffer.
pub const PRE_BUFFER_THRESHOLD: u64 = 32;

/// View state that drives [`ContentTracker::load_content`](super::ContentTracker::load_content).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentInput {
    /// First address the view wants to show (`None` = the block's base address).
    pub starting_address: Option<Address>,
    /// Number of lines visible at once.
    pub visible_lines: usize,
    /// Lines loaded above the visible area.
    pub pre_buffer: usize,
    /// Lines loaded below the visible area.
    pub post_buffer: usize,
    /// Upper bound for the pre-buffer and size of the post-buffer.
    pub default_buffer_size: usize,
    /// Whether the next load recomputes deltas unconditionally.
    pub update_delta: bool,
    /// Address the view treats as the block's base (`None` = the block's own).
    pub content_base_address: Option<Address>,
}

impl Default for ContentInput {
    fn default() -> Self {
        Self {
            starting_address: None,
            visible_lines: 20,
            pre_buffer: 0,
            post_buffer: 0,
            default_buffer_size: 20,
            update_delta: false,
            content_base_address: None,
        }
    }
}

impl ContentInput {
    /// Set the starting address (builder pattern).
    #[must_use]
    pub fn with_starting_address(mut self, address: Address) -> Self {
        self.starting_address = Some(address);
        self
    }

    /// Set the visible line count (builder pattern).
    #[must_use]
    pub const fn with_visible_lines(mut self, lines: usize) -> Self {
        self.visible_lines = lines;
        self
    }

    /// Set the default buffer size (builder pattern).
    #[must_use]
    pub const fn with_default_buffer_size(mut self, lines: usize) -> Self {
        self.default_buffer_size = lines;
        self
    }

    /// Pre-buffer size for a view starting at `start`.
    ///
    /// Grows by one line per 32 units of address, capped at the default
    /// buffer size; zero for addresses up to 32.
    pub fn pre_buffer_for(&self, start: &Address) -> usize {
        if *start <= Address::from(PRE_BUFFER_THRESHOLD) {
            return 0;
        }
        let scaled = start.div_u64(PRE_BUFFER_THRESHOLD);
        scaled
            .to_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map_or(self.default_buffer_size, |n| n.min(self.default_buffer_size))
    }
}
