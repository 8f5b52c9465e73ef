//! Context: Preferences, event bus and rendering registry in one place.
//!
//! A [`MemoryContext`] is created once with [`MemoryContext::init`] and handed
//! to every tab that needs it.

use crate::error::Result;
use crate::event::{EventBus, MemoryEvent, SubscriberId, Subscription};
use crate::rendering::{RegistryConfig, RenderingDescriptor, RenderingRegistry};
use crate::tracker::{ContentInput, TrackerConfig};

/// User preferences for memory views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Text shown in place of each unknown byte.
    pub padded_str: String,
    /// Upper bound for pre-buffers and size of post-buffers, in lines.
    pub default_buffer_size: usize,
    /// Bytes shown on one line.
    pub bytes_per_line: usize,
    /// Bytes per addressable unit, for sources that do not declare one.
    pub addressable_size: usize,
    /// Boundary that line start addresses are aligned down to.
    pub alignment: u64,
    /// Renderings to make available.
    pub renderings: Vec<RenderingDescriptor>,
}

impl Default for Preferences {
    fn default() -> Self {
        let tracker = TrackerConfig::default();
        Self {
            padded_str: tracker.padded_str,
            default_buffer_size: 20,
            bytes_per_line: tracker.bytes_per_line,
            addressable_size: tracker.addressable_size,
            alignment: tracker.alignment,
            renderings: RegistryConfig::default().renderings,
        }
    }
}

/// Shared state of all memory views.
#[derive(Debug)]
pub struct MemoryContext {
    preferences: Preferences,
    bus: EventBus,
    registry: RenderingRegistry,
}

impl MemoryContext {
    /// Validate `preferences` and build the bus and the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout preferences are invalid or a rendering
    /// descriptor cannot be registered.
    pub fn init(preferences: Preferences) -> Result<Self> {
        Self::tracker_config_of(&preferences).validate()?;

        let registry = RenderingRegistry::from_config(&RegistryConfig {
            renderings: preferences.renderings.clone(),
        })?;

        tracing::debug!(
            renderings = preferences.renderings.len(),
            bytes_per_line = preferences.bytes_per_line,
            "memory context initialized"
        );

        Ok(Self {
            preferences,
            bus: EventBus::new(),
            registry,
        })
    }

    /// Drop every subscriber; later publishes are no-ops.
    pub fn shutdown(&mut self) {
        if !self.bus.is_closed() {
            tracing::debug!(subscribers = self.bus.subscriber_count(), "memory context shut down");
        }
        self.bus.close();
    }

    /// Whether [`shutdown`](Self::shutdown) was called.
    pub const fn is_shut_down(&self) -> bool {
        self.bus.is_closed()
    }

    /// Get the preferences.
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Tracker layout derived from the preferences.
    pub fn tracker_config(&self) -> TrackerConfig {
        Self::tracker_config_of(&self.preferences)
    }

    /// Fresh content input using the preferred buffer size.
    pub fn content_input(&self) -> ContentInput {
        ContentInput::default().with_default_buffer_size(self.preferences.default_buffer_size)
    }

    fn tracker_config_of(preferences: &Preferences) -> TrackerConfig {
        TrackerConfig::default()
            .with_bytes_per_line(preferences.bytes_per_line)
            .with_addressable_size(preferences.addressable_size)
            .with_alignment(preferences.alignment)
            .with_padded_str(preferences.padded_str.as_str())
    }

    /// Get the event bus.
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Register a new event subscriber.
    pub fn subscribe(&mut self) -> Subscription {
        self.bus.subscribe()
    }

    /// Deregister a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Publish `event` to every subscriber. Returns the number of deliveries.
    pub fn publish(&mut self, event: MemoryEvent) -> usize {
        self.bus.publish(event)
    }

    /// Get the rendering registry.
    pub const fn registry(&self) -> &RenderingRegistry {
        &self.registry
    }

    /// Get a mutable reference to the rendering registry.
    pub const fn registry_mut(&mut self) -> &mut RenderingRegistry {
        &mut self.registry
    }
}
