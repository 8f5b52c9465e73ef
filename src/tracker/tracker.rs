//! `ContentTracker`: Loads memory into lines and tracks per-byte deltas.
//!
//! # Cycle
//!
//! ```text
//!   event (content changed / suspended)
//!        │
//!        ▼
//!   update_content ──▶ window lines become the line cache, deltas reset
//!        │
//!        ▼
//!   load_content / load_lines ──▶ new window, deltas against the cache
//! ```
//!
//! The line cache only changes in `update_content`, so scrolling between
//! refreshes compares against the same snapshot and highlights stay stable.

use super::config::TrackerConfig;
use super::input::ContentInput;
use crate::error::{Error, Result};
use crate::event::MemoryEvent;
use crate::host::RenderingHost;
use crate::memory::delta::{self, DeltaResult};
use crate::memory::{inferred_address_size, Address, MemoryByte, MemoryLine, CHARS_PER_BYTE};
use crate::source::{MemorySource, SourceKind};
use std::collections::HashMap;

/// Largest window, in bytes, a single load may request.
pub const MAX_WINDOW_BYTES: usize = 64 * 1024 * 1024;

/// Result of a load.
///
/// The window itself is read through [`ContentTracker::lines`].
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Real content was loaded.
    Loaded,
    /// The source failed; the window holds placeholder lines of the requested
    /// shape. The error was also sent to the host.
    Recovered(Error),
    /// The target is disconnected or terminated; nothing was done.
    TargetGone,
    /// The tracker was disposed; nothing was done.
    Disposed,
    /// The requested window is too large to hold; nothing was done.
    Rejected(Error),
}

impl LoadOutcome {
    /// Whether the window was rebuilt by this load.
    pub const fn is_rebuilt(&self) -> bool {
        matches!(self, Self::Loaded | Self::Recovered(_))
    }

    /// The error recovered from or rejected with, if any.
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Recovered(error) | Self::Rejected(error) => Some(error),
            _ => None,
        }
    }
}

/// What [`ContentTracker::handle_event`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// The event concerns another block or target.
    Ignored,
    /// The refresh cycle ran; the content should be reloaded.
    Refreshed,
    /// The event called for a refresh, but the target is gone or the host
    /// is hidden.
    RefreshSkipped,
    /// The host was asked to update its labels.
    LabelsUpdated,
    /// The tracker was disposed.
    Disposed,
}

impl EventResponse {
    /// Whether the event concerned this tracker.
    pub const fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Memory line buffer and delta tracker for one memory block.
///
/// The tracker owns its window of lines and its line cache exclusively; it
/// performs no locking and expects calls to be serialized by its owner.
#[derive(Debug)]
pub struct ContentTracker<H: RenderingHost> {
    source: MemorySource,
    host: H,
    config: TrackerConfig,
    input: ContentInput,
    /// Lines currently visible.
    window: Vec<MemoryLine>,
    /// Previously rendered lines keyed by address, for delta comparison.
    cache: HashMap<Address, MemoryLine>,
    /// Address of the first line in the window.
    top: Option<Address>,
    /// Delta statistics of the last load.
    last_delta: DeltaResult,
    disposed: bool,
}

impl<H: RenderingHost> ContentTracker<H> {
    /// Create a tracker with a default content input.
    ///
    /// An extended source's addressable size overrides the configured one.
    pub fn new(source: MemorySource, host: H, config: TrackerConfig) -> Result<Self> {
        Self::with_input(source, host, config, ContentInput::default())
    }

    /// Create a tracker with an explicit content input.
    pub fn with_input(
        source: MemorySource,
        host: H,
        mut config: TrackerConfig,
        input: ContentInput,
    ) -> Result<Self> {
        if let Some(size) = source.declared_addressable_size() {
            config.addressable_size = size;
        }
        config.validate()?;

        Ok(Self {
            source,
            host,
            config,
            input,
            window: Vec::new(),
            cache: HashMap::new(),
            top: None,
            last_delta: DeltaResult::default(),
            disposed: false,
        })
    }

    /// Lines of the current window, in address order.
    pub fn lines(&self) -> &[MemoryLine] {
        &self.window
    }

    /// Address of the first line of the window, once something was loaded.
    pub const fn buffer_top_address(&self) -> Option<&Address> {
        self.top.as_ref()
    }

    /// Address the view treats as the block's base.
    pub fn content_base_address(&self) -> Address {
        if let Some(address) = &self.input.content_base_address {
            return address.clone();
        }
        match self.source.kind() {
            SourceKind::Simple(block) => Address::from(block.start_address()),
            SourceKind::Extended(block) => block.base_address(),
        }
    }

    /// Get a reference to the host.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Get a mutable reference to the host.
    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Get the source.
    pub const fn source(&self) -> &MemorySource {
        &self.source
    }

    /// Get the effective configuration.
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Get the content input.
    pub const fn input(&self) -> &ContentInput {
        &self.input
    }

    /// Get a mutable reference to the content input.
    pub const fn input_mut(&mut self) -> &mut ContentInput {
        &mut self.input
    }

    /// Number of lines held in the delta cache.
    pub fn cached_lines(&self) -> usize {
        self.cache.len()
    }

    /// Cached line at `address`, if any.
    pub fn cached_line(&self, address: &Address) -> Option<&MemoryLine> {
        self.cache.get(address)
    }

    /// Delta statistics of the last load.
    pub const fn last_delta(&self) -> DeltaResult {
        self.last_delta
    }

    /// Whether [`dispose`](Self::dispose) was called.
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Load `number_of_lines` lines starting at (the aligned) `start`.
    ///
    /// On success the host is told to display the table. If the source fails,
    /// the window is filled with placeholder lines, the host is told to
    /// display the error, and the error is returned in the outcome.
    pub fn load_lines(&mut self, start: &Address, number_of_lines: usize, update_delta: bool) -> LoadOutcome {
        if self.disposed {
            return LoadOutcome::Disposed;
        }
        if self.source.target_status().is_gone() {
            tracing::debug!(block = self.source.block().0, "target gone, load skipped");
            return LoadOutcome::TargetGone;
        }

        let expected = self
            .config
            .bytes_per_line
            .checked_mul(number_of_lines)
            .filter(|bytes| *bytes <= MAX_WINDOW_BYTES);
        let units = self.config.units_per_line().checked_mul(number_of_lines as u64);
        let (Some(expected), Some(units)) = (expected, units) else {
            tracing::warn!(lines = number_of_lines, "requested window too large, load rejected");
            return LoadOutcome::Rejected(Error::InvalidConfig(format!(
                "a window of {number_of_lines} lines exceeds {MAX_WINDOW_BYTES} bytes"
            )));
        };

        tracing::debug!(
            start = %start,
            lines = number_of_lines,
            extended = self.source.is_extended(),
            "loading memory lines"
        );

        let (top, fetched) = self.fetch(start, units, expected);
        let (mut buffer, error) = match fetched {
            Ok(buffer) => (buffer, None),
            Err(error) => {
                tracing::warn!(start = %top, %error, "memory read failed, showing placeholder content");
                (vec![MemoryByte::PLACEHOLDER; expected], Some(error))
            }
        };

        if buffer.len() < expected {
            tracing::trace!(got = buffer.len(), expected, "short read, padding tail");
        }
        buffer.resize(expected, MemoryByte::PLACEHOLDER);

        self.rebuild_window(&top, &buffer, update_delta);
        self.top = Some(top);

        match error {
            Some(error) => {
                self.host.display_error(&error);
                LoadOutcome::Recovered(error)
            }
            None => {
                self.host.display_table();
                LoadOutcome::Loaded
            }
        }
    }

    /// Read `units` addressable units (`expected` bytes) for a window.
    ///
    /// Returns the aligned top address and the bytes, starting at that
    /// address. A simple block is placed at its own start address: leading
    /// placeholders fill the gap when it starts above `top`, and bytes it
    /// holds below `top` are skipped.
    fn fetch(&mut self, start: &Address, units: u64, expected: usize) -> (Address, Result<Vec<MemoryByte>>) {
        let top = start.align_down(self.config.alignment);

        let fetched = match self.source.kind_mut() {
            SourceKind::Extended(block) => match block.bytes_from_address(&top, units) {
                Ok(Some(bytes)) => Ok(bytes),
                Ok(None) => Err(Error::ByteSourceUnavailable),
                Err(error) => Err(Error::ByteSourceThrew(error)),
            },
            SourceKind::Simple(block) => match block.bytes() {
                Ok(Some(raw)) => {
                    let block_start = Address::from(block.start_address());
                    let bytes = if let Some(lead) = top.distance_to(&block_start) {
                        let prefill = usize::try_from(lead).map_or(expected, |n| n.min(expected));
                        let mut bytes = Vec::with_capacity(prefill + raw.len().min(expected));
                        bytes.resize(prefill, MemoryByte::PLACEHOLDER);
                        bytes.extend(raw.into_iter().take(expected - prefill).map(MemoryByte::valid));
                        bytes
                    } else {
                        let skip = block_start
                            .distance_to(&top)
                            .and_then(|n| usize::try_from(n).ok())
                            .unwrap_or(usize::MAX);
                        raw.into_iter().skip(skip).map(MemoryByte::valid).collect()
                    };
                    Ok(bytes)
                }
                Ok(None) => Err(Error::ByteSourceUnavailable),
                Err(error) => Err(Error::ByteSourceThrew(error)),
            },
        };

        (top, fetched)
    }

    /// Partition `buffer` into the new window and compute its deltas.
    fn rebuild_window(&mut self, top: &Address, buffer: &[MemoryByte], update_delta: bool) {
        let manage_deltas = self.source.tracker_manages_deltas();
        let displaying_error = self.host.is_displaying_error();
        let units_per_line = self.config.units_per_line();

        self.window.clear();
        self.last_delta = DeltaResult::default();

        for (index, chunk) in buffer.chunks_exact(self.config.bytes_per_line).enumerate() {
            let address = top.offset(index as u64 * units_per_line);
            let mut line = MemoryLine::new(address, chunk.to_vec(), index, &self.config.padded_str);

            if manage_deltas {
                // Flags reported by the source must not leak into our deltas
                for byte in line.bytes_mut() {
                    byte.forget_delta();
                }

                if displaying_error {
                    line.monitored = false;
                } else if let Some(old) = self.cache.get(line.address()) {
                    line.monitored = true;
                    let result = delta::apply_deltas(&mut line, old, update_delta);
                    self.last_delta.merge(result);
                } else {
                    line.monitored = false;
                }
            } else {
                line.monitored = line.all_known();
            }

            self.window.push(line);
        }
    }

    /// Load according to the content input.
    ///
    /// Simple sources are loaded whole. Extended sources load the visible
    /// lines plus pre- and post-buffers around the starting address. A pending
    /// `update_delta` request is consumed by this load.
    pub fn load_content(&mut self) -> LoadOutcome {
        let bytes_per_line = self.config.bytes_per_line as u64;
        let units_per_line = self.config.units_per_line();

        let (start, number_of_lines) = match self.source.kind() {
            SourceKind::Simple(block) => {
                let start = Address::from(block.start_address());
                let prefill = start.misalignment(self.config.alignment);
                let lines = prefill.saturating_add(block.length()).div_ceil(bytes_per_line);
                self.input.pre_buffer = 0;
                self.input.post_buffer = 0;
                (start, usize::try_from(lines).unwrap_or(usize::MAX))
            }
            SourceKind::Extended(block) => {
                let start = self
                    .input
                    .starting_address
                    .clone()
                    .unwrap_or_else(|| block.base_address());
                let pre = self.input.pre_buffer_for(&start);
                let post = self.input.default_buffer_size;
                self.input.pre_buffer = pre;
                self.input.post_buffer = post;
                let first = start.saturating_sub(pre as u64 * units_per_line);
                (first, self.input.visible_lines.saturating_add(pre).saturating_add(post))
            }
        };

        let update_delta = self.input.update_delta;
        let outcome = self.load_lines(&start, number_of_lines, update_delta);
        if outcome.is_rebuilt() {
            self.input.update_delta = false;
        }
        outcome
    }

    /// Refresh cycle: snapshot the window into the line cache.
    ///
    /// Returns `true` if the host was asked to refresh. Nothing happens when
    /// the target is gone; the cache is emptied but not refilled when the
    /// host is hidden, and stays empty when the host shows an error.
    pub fn update_content(&mut self) -> bool {
        if self.disposed || self.source.target_status().is_gone() {
            tracing::debug!(block = self.source.block().0, "target gone, update skipped");
            return false;
        }

        self.cache.clear();

        if !self.host.is_visible() {
            tracing::debug!(block = self.source.block().0, "host hidden, update skipped");
            return false;
        }

        if !self.host.is_displaying_error() {
            for line in &mut self.window {
                line.monitored = true;
                self.cache.insert(line.address().clone(), line.clone());
            }
        }

        self.reset_deltas();
        self.input.update_delta = true;
        self.host.refresh();
        true
    }

    /// Clear the `CHANGED` flag on every cached line, keeping the lines.
    pub fn reset_deltas(&mut self) {
        for line in self.cache.values_mut() {
            delta::unmark_deltas(line);
        }
    }

    /// Drop every cached line.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Byte width used when displaying `address`.
    ///
    /// The source's declared size wins; otherwise 8 for addresses with more
    /// than 8 hex digits and 4 for the rest.
    pub fn address_size(&self, address: &Address) -> usize {
        match self.source.declared_address_size() {
            0 => inferred_address_size(address),
            size => size,
        }
    }

    /// Uppercase hex zero-padded to the address size.
    pub fn format_address(&self, address: &Address) -> String {
        address.to_padded_hex(self.address_size(address) * CHARS_PER_BYTE)
    }

    /// Whether `address` lies outside the window.
    ///
    /// The window covers `[first line, last line + units per line)`. An empty
    /// window covers nothing.
    pub fn is_address_out_of_range(&self, address: &Address) -> bool {
        let (Some(first), Some(last)) = (self.window.first(), self.window.last()) else {
            return true;
        };
        let end = last.address().offset(self.config.units_per_line());
        !(first.address() <= address && *address < end)
    }

    /// React to a bus event.
    pub fn handle_event(&mut self, event: &MemoryEvent) -> EventResponse {
        let block = self.source.block();
        match *event {
            MemoryEvent::ContentChanged { block: b } if b == block => self.refresh_response(),
            MemoryEvent::Suspended { target } if target == self.source.target() => self.refresh_response(),
            MemoryEvent::StateChanged { block: b } if b == block => {
                self.host.update_labels();
                EventResponse::LabelsUpdated
            }
            MemoryEvent::Disposed { block: b } if b == block => {
                self.dispose();
                EventResponse::Disposed
            }
            _ => EventResponse::Ignored,
        }
    }

    fn refresh_response(&mut self) -> EventResponse {
        if self.update_content() {
            EventResponse::Refreshed
        } else {
            EventResponse::RefreshSkipped
        }
    }

    /// Release the window and the cache. Later loads are no-ops.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.window.clear();
        self.cache.clear();
        self.top = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::source::{BlockId, InMemoryBlock, InMemoryExtendedBlock, SharedMemory, TargetId, TargetStatus};

    const BLOCK: BlockId = BlockId(1);
    const TARGET: TargetId = TargetId(7);

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn extended(memory: &SharedMemory) -> ContentTracker<RecordingHost> {
        let source = MemorySource::extended(BLOCK, TARGET, InMemoryExtendedBlock::new(memory.clone()));
        ContentTracker::new(source, RecordingHost::new(), TrackerConfig::default()).unwrap()
    }

    fn simple(memory: &SharedMemory) -> ContentTracker<RecordingHost> {
        let source = MemorySource::simple(BLOCK, TARGET, InMemoryBlock::new(memory.clone()));
        ContentTracker::new(source, RecordingHost::new(), TrackerConfig::default()).unwrap()
    }

    fn changed_flags(tracker: &ContentTracker<RecordingHost>) -> Vec<bool> {
        tracker
            .lines()
            .iter()
            .flat_map(|l| l.bytes().iter().map(MemoryByte::is_changed))
            .collect()
    }

    #[test]
    fn test_line_count_and_width() {
        let memory = SharedMemory::new(0x1000, pattern(256));
        let mut tracker = extended(&memory);

        for n in [0, 1, 4, 16] {
            let outcome = tracker.load_lines(&Address::from(0x1000u64), n, false);
            assert_eq!(outcome, LoadOutcome::Loaded);
            assert_eq!(tracker.lines().len(), n);
            assert!(tracker.lines().iter().all(|l| l.len() == 16));
        }
    }

    #[test]
    fn test_short_read_is_padded() {
        let memory = SharedMemory::new(0x1000, pattern(20));
        let mut tracker = extended(&memory);

        let outcome = tracker.load_lines(&Address::from(0x1000u64), 4, false);
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(tracker.lines().len(), 4);

        let second = &tracker.lines()[1];
        assert!(second.bytes()[3].is_valid());
        assert!(!second.bytes()[4].is_valid());
        assert!(second.bytes()[4].is_readonly());
        assert!(tracker.lines()[3].bytes().iter().all(|b| !b.is_valid()));
    }

    #[test]
    fn test_failed_read_yields_dummy_lines_and_reports_once() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        memory.fail_with("bus error");
        let mut tracker = extended(&memory);

        let outcome = tracker.load_lines(&Address::from(0x1000u64), 3, true);

        assert!(matches!(outcome, LoadOutcome::Recovered(Error::ByteSourceThrew(_))));
        assert_eq!(tracker.lines().len(), 3);
        for line in tracker.lines() {
            assert_eq!(line.len(), 16);
            assert!(line.bytes().iter().all(|b| b.value() == 0 && b.is_readonly() && !b.is_known()));
        }
        assert_eq!(tracker.host().errors.len(), 1);
        assert!(tracker.host().errors[0].contains("bus error"));
        assert_eq!(tracker.host().tables_displayed, 0);
    }

    #[test]
    fn test_missing_content_is_unavailable() {
        let memory = SharedMemory::new(0, pattern(16));
        memory.fail_with_nothing();
        let mut tracker = simple(&memory);

        let outcome = tracker.load_lines(&Address::zero(), 2, false);
        assert_eq!(outcome, LoadOutcome::Recovered(Error::ByteSourceUnavailable));
        assert_eq!(tracker.lines().len(), 2);
    }

    #[test]
    fn test_alignment_on_extended_source() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);

        let _ = tracker.load_lines(&Address::from(0x1003u64), 2, false);

        assert_eq!(tracker.lines()[0].address(), &Address::from(0x1000u64));
        assert_eq!(tracker.lines()[1].address(), &Address::from(0x1010u64));
        assert_eq!(tracker.buffer_top_address(), Some(&Address::from(0x1000u64)));
    }

    #[test]
    fn test_simple_source_padding() {
        let memory = SharedMemory::new(0x2000, pattern(10));
        let mut tracker = simple(&memory);

        let outcome = tracker.load_content();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(tracker.lines().len(), 1);

        let line = &tracker.lines()[0];
        assert_eq!(line.len(), 16);
        assert!(line.bytes()[..10].iter().all(MemoryByte::is_valid));
        assert!(line.bytes()[10..]
            .iter()
            .all(|b| b.is_readonly() && !b.is_valid() && !b.is_known()));
    }

    #[test]
    fn test_simple_source_prefill() {
        let memory = SharedMemory::new(0x2004, vec![0xAB; 16]);
        let mut tracker = simple(&memory);

        let _ = tracker.load_content();

        assert_eq!(tracker.lines().len(), 2);
        let first = &tracker.lines()[0];
        assert_eq!(first.address(), &Address::from(0x2000u64));
        assert!(first.bytes()[..4].iter().all(|b| !b.is_valid() && b.value() == 0));
        assert_eq!(first.bytes()[4].value(), 0xAB);
        assert!(tracker.lines()[1].bytes()[4..].iter().all(|b| !b.is_valid()));
    }

    #[test]
    fn test_simple_block_keeps_its_address_for_any_start() {
        let memory = SharedMemory::new(0x2004, vec![0xAB; 8]);
        let mut tracker = simple(&memory);

        let _ = tracker.load_lines(&Address::from(0x2000u64), 1, false);
        let line = &tracker.lines()[0];
        assert_eq!(line.address(), &Address::from(0x2000u64));
        assert!(line.bytes()[..4].iter().all(|b| !b.is_valid()));
        assert!(line.bytes()[4..12].iter().all(|b| b.is_valid() && b.value() == 0xAB));
        assert!(line.bytes()[12..].iter().all(|b| !b.is_valid()));

        let _ = tracker.load_lines(&Address::from(0x2010u64), 1, false);
        let line = &tracker.lines()[0];
        assert_eq!(line.address(), &Address::from(0x2010u64));
        assert!(line.bytes().iter().all(|b| !b.is_valid()));
    }

    #[test]
    fn test_simple_block_starting_below_window() {
        let memory = SharedMemory::new(0x1FF8, (0..16).collect());
        let mut tracker = simple(&memory);

        let _ = tracker.load_lines(&Address::from(0x2000u64), 1, false);
        let line = &tracker.lines()[0];
        assert_eq!(line.bytes()[0].value(), 8);
        assert!(line.bytes()[..8].iter().all(MemoryByte::is_valid));
        assert!(line.bytes()[8..].iter().all(|b| !b.is_valid()));
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);
        let _ = tracker.load_lines(&Address::from(0x1000u64), 2, false);
        let reads = memory.read_count();

        let outcome = tracker.load_lines(&Address::from(0x1000u64), usize::MAX, false);
        assert!(matches!(outcome, LoadOutcome::Rejected(Error::InvalidConfig(_))));

        let outcome = tracker.load_lines(&Address::from(0x1000u64), MAX_WINDOW_BYTES / 16 + 1, false);
        assert!(matches!(outcome, LoadOutcome::Rejected(Error::InvalidConfig(_))));
        assert!(!outcome.is_rebuilt());
        assert!(outcome.error().is_some());
        assert_eq!(memory.read_count(), reads);
        assert_eq!(tracker.lines().len(), 2);
        assert!(tracker.host().errors.is_empty());
    }

    #[test]
    fn test_delta_marks_changed_bytes() {
        let memory = SharedMemory::new(0x2000, vec![0; 16]);
        memory.write(0x2000, &[0x01, 0x02]);
        let mut tracker = extended(&memory);

        let _ = tracker.load_lines(&Address::from(0x2000u64), 1, false);
        assert!(tracker.update_content());

        memory.write(0x2001, &[0xFF]);
        let _ = tracker.load_lines(&Address::from(0x2000u64), 1, true);

        let line = &tracker.lines()[0];
        assert!(line.monitored);
        assert!(line.bytes()[0].is_known());
        assert!(!line.bytes()[0].is_changed());
        assert!(line.bytes()[1].is_changed());
        assert_eq!(tracker.last_delta().bytes_changed, 1);
    }

    #[test]
    fn test_reload_without_update_keeps_flags() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);
        let start = Address::from(0x1000u64);

        let _ = tracker.load_lines(&start, 4, false);
        tracker.update_content();
        memory.write(0x1005, &[0xEE, 0xEF]);

        let _ = tracker.load_lines(&start, 4, true);
        let first = changed_flags(&tracker);
        assert_eq!(first.iter().filter(|c| **c).count(), 2);

        let _ = tracker.load_lines(&start, 4, false);
        assert_eq!(changed_flags(&tracker), first);
        let values: Vec<_> = tracker.lines().iter().flat_map(MemoryLine::values).collect();
        assert_eq!(values[5], 0xEE);
    }

    #[test]
    fn test_unchanged_content_copies_cached_flags() {
        let memory = SharedMemory::new(0x1000, pattern(32));
        let mut tracker = extended(&memory);
        let start = Address::from(0x1000u64);

        let _ = tracker.load_lines(&start, 2, false);
        tracker.update_content();
        let _ = tracker.load_lines(&start, 2, false);

        assert!(tracker.last_delta().copied);
        assert!(tracker.lines().iter().all(|l| l.monitored && !l.has_changes()));
    }

    #[test]
    fn test_clear_cache_makes_lines_unmonitored() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);
        let start = Address::from(0x1000u64);

        let _ = tracker.load_lines(&start, 4, false);
        tracker.update_content();
        assert_eq!(tracker.cached_lines(), 4);

        tracker.clear_cache();
        let _ = tracker.load_lines(&start, 4, true);
        assert!(tracker.lines().iter().all(|l| !l.monitored));
    }

    #[test]
    fn test_error_state_suppresses_monitoring() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);
        let start = Address::from(0x1000u64);

        let _ = tracker.load_lines(&start, 2, false);
        tracker.update_content();
        tracker.host_mut().displaying_error = true;

        let _ = tracker.load_lines(&start, 2, true);
        assert!(tracker.lines().iter().all(|l| !l.monitored && !l.has_changes()));
    }

    #[test]
    fn test_update_content_while_displaying_error_leaves_cache_empty() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);

        let _ = tracker.load_lines(&Address::from(0x1000u64), 2, false);
        tracker.host_mut().displaying_error = true;
        assert!(tracker.update_content());
        assert_eq!(tracker.cached_lines(), 0);
    }

    #[test]
    fn test_update_content_when_hidden() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);
        let _ = tracker.load_lines(&Address::from(0x1000u64), 2, false);
        tracker.update_content();
        assert_eq!(tracker.cached_lines(), 2);

        tracker.host_mut().visible = false;
        assert!(!tracker.update_content());
        assert_eq!(tracker.cached_lines(), 0);
        assert_eq!(tracker.host().refreshes, 1);
    }

    #[test]
    fn test_reset_deltas_keeps_cached_lines() {
        let memory = SharedMemory::new(0x1000, pattern(32));
        let mut tracker = extended(&memory);
        let start = Address::from(0x1000u64);

        let _ = tracker.load_lines(&start, 2, false);
        tracker.update_content();
        memory.write(0x1000, &[0xFF]);
        let _ = tracker.load_lines(&start, 2, true);
        tracker.update_content();

        let cached = tracker.cached_line(&start).unwrap();
        assert!(!cached.has_changes());
        assert_eq!(tracker.cached_lines(), 2);
    }

    #[test]
    fn test_target_gone_is_silent() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);
        let _ = tracker.load_lines(&Address::from(0x1000u64), 2, false);

        memory.set_status(TargetStatus::Terminated);
        let reads = memory.read_count();

        assert_eq!(tracker.load_lines(&Address::from(0x1000u64), 4, false), LoadOutcome::TargetGone);
        assert_eq!(memory.read_count(), reads);
        assert_eq!(tracker.lines().len(), 2);
        assert!(tracker.host().errors.is_empty());
        assert!(!tracker.update_content());
    }

    #[test]
    fn test_address_out_of_range() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);
        assert!(tracker.is_address_out_of_range(&Address::from(0x1000u64)));

        let _ = tracker.load_lines(&Address::from(0x1000u64), 2, false);

        assert!(tracker.is_address_out_of_range(&Address::from(0xFFFu64)));
        assert!(!tracker.is_address_out_of_range(&Address::from(0x1000u64)));
        assert!(!tracker.is_address_out_of_range(&Address::from(0x101Fu64)));
        assert!(tracker.is_address_out_of_range(&Address::from(0x1020u64)));
        assert!(tracker.is_address_out_of_range(&Address::from(0x1021u64)));
    }

    #[test]
    fn test_address_size() {
        let memory = SharedMemory::new(0, pattern(16));
        let tracker = simple(&memory);
        assert_eq!(tracker.address_size(&Address::from(0xFFFF_FFFFu64)), 4);
        assert_eq!(tracker.address_size(&Address::from(0x1_0000_0000u64)), 8);
        assert_eq!(tracker.format_address(&Address::from(0xabcu64)), "00000ABC");

        let block = InMemoryExtendedBlock::new(memory).with_address_size(2);
        let source = MemorySource::extended(BLOCK, TARGET, block);
        let tracker = ContentTracker::new(source, RecordingHost::new(), TrackerConfig::default()).unwrap();
        assert_eq!(tracker.address_size(&Address::from(0x1_0000_0000u64)), 2);
    }

    #[test]
    fn test_addressable_units_per_line() {
        let memory = SharedMemory::new(0, pattern(64));
        let block = InMemoryExtendedBlock::new(memory).with_addressable_size(4);
        let source = MemorySource::extended(BLOCK, TARGET, block);
        let mut tracker = ContentTracker::new(source, RecordingHost::new(), TrackerConfig::default()).unwrap();

        let _ = tracker.load_lines(&Address::zero(), 3, false);

        assert_eq!(tracker.config().units_per_line(), 4);
        assert_eq!(tracker.lines()[1].address(), &Address::from(4u64));
        assert_eq!(tracker.lines()[2].address(), &Address::from(8u64));
        assert!(tracker.lines()[2].bytes().iter().all(MemoryByte::is_valid));
    }

    #[test]
    fn test_source_managed_deltas_are_trusted() {
        let memory = SharedMemory::new(0, pattern(32));
        let block = InMemoryExtendedBlock::new(memory.clone()).with_change_management(true);
        let source = MemorySource::extended(BLOCK, TARGET, block);
        let mut tracker = ContentTracker::new(source, RecordingHost::new(), TrackerConfig::default()).unwrap();

        let _ = tracker.load_lines(&Address::zero(), 2, true);
        assert!(tracker.lines().iter().all(|l| !l.monitored));

        memory.commit();
        memory.write(3, &[0xFF]);
        let _ = tracker.load_lines(&Address::zero(), 2, false);
        assert!(tracker.lines().iter().all(|l| l.monitored));
        assert!(tracker.lines()[0].bytes()[3].is_changed());
        assert_eq!(tracker.cached_lines(), 0);
    }

    #[test]
    fn test_load_content_extended_buffers() {
        let memory = SharedMemory::new(0, pattern(0x1000));
        let source = MemorySource::extended(BLOCK, TARGET, InMemoryExtendedBlock::new(memory));
        let input = ContentInput::default()
            .with_starting_address(Address::from(0x100u64))
            .with_visible_lines(10)
            .with_default_buffer_size(5);
        let mut tracker =
            ContentTracker::with_input(source, RecordingHost::new(), TrackerConfig::default(), input).unwrap();

        assert_eq!(tracker.load_content(), LoadOutcome::Loaded);

        assert_eq!(tracker.input().pre_buffer, 5);
        assert_eq!(tracker.input().post_buffer, 5);
        assert_eq!(tracker.lines().len(), 20);
        assert_eq!(tracker.lines()[0].address(), &Address::from(0xB0u64));
        assert!(!tracker.is_address_out_of_range(&Address::from(0x100u64)));
    }

    #[test]
    fn test_load_content_consumes_update_request() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);
        tracker.input_mut().starting_address = Some(Address::from(0x1000u64));

        let _ = tracker.load_content();
        assert!(tracker.update_content());
        assert!(tracker.input().update_delta);

        let _ = tracker.load_content();
        assert!(!tracker.input().update_delta);
    }

    #[test]
    fn test_events_are_routed_by_identity() {
        let memory = SharedMemory::new(0x1000, pattern(64));
        let mut tracker = extended(&memory);
        let _ = tracker.load_lines(&Address::from(0x1000u64), 2, false);

        assert_eq!(
            tracker.handle_event(&MemoryEvent::ContentChanged { block: BlockId(99) }),
            EventResponse::Ignored
        );
        assert_eq!(tracker.host().refreshes, 0);

        assert_eq!(
            tracker.handle_event(&MemoryEvent::ContentChanged { block: BLOCK }),
            EventResponse::Refreshed
        );
        assert_eq!(tracker.host().refreshes, 1);

        assert_eq!(
            tracker.handle_event(&MemoryEvent::StateChanged { block: BLOCK }),
            EventResponse::LabelsUpdated
        );
        assert_eq!(tracker.host().label_updates, 1);

        assert!(!tracker.handle_event(&MemoryEvent::Suspended { target: TargetId(3) }).is_handled());
        assert_eq!(
            tracker.handle_event(&MemoryEvent::Suspended { target: TARGET }),
            EventResponse::Refreshed
        );
        assert_eq!(tracker.host().refreshes, 2);

        tracker.host_mut().visible = false;
        assert_eq!(
            tracker.handle_event(&MemoryEvent::ContentChanged { block: BLOCK }),
            EventResponse::RefreshSkipped
        );
        tracker.host_mut().visible = true;

        assert_eq!(
            tracker.handle_event(&MemoryEvent::Disposed { block: BLOCK }),
            EventResponse::Disposed
        );
        assert!(tracker.is_disposed());
        assert!(tracker.lines().is_empty());
        assert_eq!(tracker.load_lines(&Address::zero(), 1, false), LoadOutcome::Disposed);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let memory = SharedMemory::new(0, pattern(16));
        let source = MemorySource::simple(BLOCK, TARGET, InMemoryBlock::new(memory));
        let config = TrackerConfig::default().with_bytes_per_line(0);
        assert!(matches!(
            ContentTracker::new(source, RecordingHost::new(), config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
