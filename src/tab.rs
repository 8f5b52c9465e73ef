//! Memory tab: One tracker shown through one rendering.

use crate::context::MemoryContext;
use crate::error::Result;
use crate::event::{MemoryEvent, Subscription};
use crate::host::RenderingHost;
use crate::memory::{MemoryByte, MemoryLine};
use crate::rendering::Rendering;
use crate::source::MemorySource;
use crate::tracker::{ContentTracker, EventResponse, LoadOutcome};
use std::sync::Arc;

/// One formatted line of a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Line address, zero-padded uppercase hex.
    pub address: String,
    /// Rendered columns.
    pub columns: Vec<String>,
    /// Per-byte changed flags.
    pub changed: Vec<bool>,
    /// Whether the changed flags can be trusted.
    pub monitored: bool,
}

/// A memory view: a tracker, a rendering and an event subscription.
pub struct MemoryTab<H: RenderingHost> {
    tracker: ContentTracker<H>,
    rendering: Arc<dyn Rendering>,
    label: String,
    enabled: bool,
    subscription: Option<Subscription>,
}

impl<H: RenderingHost> std::fmt::Debug for MemoryTab<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTab")
            .field("label", &self.label)
            .field("rendering", &self.rendering.id())
            .field("enabled", &self.enabled)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

impl<H: RenderingHost> MemoryTab<H> {
    /// Create an enabled tab showing `source` with the rendering `rendering_id`.
    ///
    /// The tab subscribes to the context's event bus. Nothing is loaded
    /// until [`load`](Self::load) or [`set_enabled`](Self::set_enabled).
    ///
    /// # Errors
    ///
    /// Returns an error if the rendering is unknown or the context's layout
    /// does not fit the source.
    pub fn new(context: &mut MemoryContext, source: MemorySource, host: H, rendering_id: &str) -> Result<Self> {
        let rendering = context.registry_mut().create(rendering_id)?;
        let tracker = ContentTracker::with_input(source, host, context.tracker_config(), context.content_input())?;
        let label = format!("{} <{}>", tracker.content_base_address(), rendering.label());

        Ok(Self {
            tracker,
            rendering,
            label,
            enabled: true,
            subscription: Some(context.subscribe()),
        })
    }

    /// Get the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Get the rendering.
    pub fn rendering(&self) -> &dyn Rendering {
        self.rendering.as_ref()
    }

    /// Get the tracker.
    pub const fn tracker(&self) -> &ContentTracker<H> {
        &self.tracker
    }

    /// Get a mutable reference to the tracker.
    pub const fn tracker_mut(&mut self) -> &mut ContentTracker<H> {
        &mut self.tracker
    }

    /// Whether the tab reacts to events.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the tab.
    ///
    /// Enabling a disabled tab drops stale highlights and reloads; the
    /// outcome of that load is returned.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<LoadOutcome> {
        let was_enabled = self.enabled;
        self.enabled = enabled;
        if !enabled || was_enabled || self.is_disposed() {
            return None;
        }

        self.tracker.reset_deltas();
        Some(self.tracker.load_content())
    }

    /// Load content according to the tracker's content input.
    pub fn load(&mut self) -> LoadOutcome {
        self.tracker.load_content()
    }

    /// Feed pending bus events to the tracker.
    ///
    /// Returns the number of events that concerned this tab. The content is
    /// reloaded only if a refresh cycle actually ran. A disabled tab discards
    /// everything but disposal.
    pub fn pump_events(&mut self) -> usize {
        let Some(subscription) = &self.subscription else {
            return 0;
        };

        let mut handled = 0;
        let mut reload = false;
        for event in subscription.drain() {
            if !self.enabled && !matches!(event, MemoryEvent::Disposed { .. }) {
                continue;
            }
            let response = self.tracker.handle_event(&event);
            if response.is_handled() {
                handled += 1;
            }
            match response {
                EventResponse::Refreshed => reload = true,
                EventResponse::Disposed => break,
                _ => {}
            }
        }

        if self.tracker.is_disposed() {
            self.dispose();
        } else if reload {
            let _ = self.tracker.load_content();
        }
        handled
    }

    /// Format every line of the window.
    pub fn rows(&self) -> Vec<Row> {
        self.tracker.lines().iter().map(|line| self.row(line)).collect()
    }

    fn row(&self, line: &MemoryLine) -> Row {
        Row {
            address: self.tracker.format_address(line.address()),
            columns: self.rendering.format_line(line),
            changed: line.bytes().iter().map(MemoryByte::is_changed).collect(),
            monitored: line.monitored,
        }
    }

    /// Deregister from `context` and dispose. Idempotent.
    pub fn close(&mut self, context: &mut MemoryContext) {
        if let Some(subscription) = &self.subscription {
            context.unsubscribe(subscription.id());
        }
        self.dispose();
    }

    /// Drop the subscription and dispose the tracker. Idempotent.
    ///
    /// The bus forgets the subscriber on its next publish; use
    /// [`close`](Self::close) to deregister right away.
    pub fn dispose(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!(label = %self.label, "memory tab disposed");
        }
        self.tracker.dispose();
    }

    /// Whether [`dispose`](Self::dispose) was called.
    pub const fn is_disposed(&self) -> bool {
        self.tracker.is_disposed()
    }
}
