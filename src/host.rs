//! Rendering host: The view that displays a tracker's lines.
//!
//! The tracker never draws anything. It reports load results to the host and
//! asks it whether it is visible before rebuilding delta state.

use crate::error::Error;

/// Callbacks from the tracker to the view hosting it.
pub trait RenderingHost {
    /// Loading failed; show `error` instead of the table.
    fn display_error(&mut self, error: &Error);

    /// Loading succeeded; show the table.
    fn display_table(&mut self);

    /// Whether the view is currently visible.
    fn is_visible(&self) -> bool;

    /// Whether the view is currently showing an error instead of the table.
    fn is_displaying_error(&self) -> bool;

    /// The tracker's delta cache was rebuilt; the view should reload.
    fn refresh(&mut self) {}

    /// The memory block's state changed; labels may be stale.
    fn update_labels(&mut self) {}
}

/// A host that records every callback, for headless use and tests.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    /// Whether the host reports itself visible.
    pub visible: bool,
    /// Whether an error is currently displayed.
    pub displaying_error: bool,
    /// Every error displayed so far, rendered to text.
    pub errors: Vec<String>,
    /// Number of `display_table` calls.
    pub tables_displayed: usize,
    /// Number of `refresh` calls.
    pub refreshes: usize,
    /// Number of `update_labels` calls.
    pub label_updates: usize,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    /// Create a visible host that is not displaying an error.
    pub const fn new() -> Self {
        Self {
            visible: true,
            displaying_error: false,
            errors: Vec::new(),
            tables_displayed: 0,
            refreshes: 0,
            label_updates: 0,
        }
    }
}

impl RenderingHost for RecordingHost {
    fn display_error(&mut self, error: &Error) {
        self.displaying_error = true;
        self.errors.push(error.to_string());
    }

    fn display_table(&mut self) {
        self.displaying_error = false;
        self.tables_displayed += 1;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_displaying_error(&self) -> bool {
        self.displaying_error
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }

    fn update_labels(&mut self) {
        self.label_updates += 1;
    }
}
