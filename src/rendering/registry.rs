//! Rendering registry: Descriptors from configuration, instances on demand.

use super::builtin::{AsciiRendering, HexRendering};
use super::Rendering;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a rendering from its descriptor.
pub type RenderingFactory = fn(&RenderingDescriptor) -> Box<dyn Rendering>;

/// Kind name of the built-in hex rendering.
pub const HEX_KIND: &str = "hex";

/// Kind name of the built-in ASCII rendering.
pub const ASCII_KIND: &str = "ascii";

/// Declaration of one available rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderingDescriptor {
    /// Unique id, used to request the rendering.
    pub id: String,
    /// Human-readable name.
    pub label: String,
    /// Factory kind that builds the rendering.
    pub kind: String,
    /// Bytes per column.
    pub column_size: usize,
}

impl RenderingDescriptor {
    /// Create a descriptor.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: impl Into<String>,
        column_size: usize,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: kind.into(),
            column_size,
        }
    }
}

/// Renderings to make available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Descriptors, in presentation order.
    pub renderings: Vec<RenderingDescriptor>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            renderings: vec![
                RenderingDescriptor::new("hex", "Hex", HEX_KIND, 4),
                RenderingDescriptor::new("ascii", "ASCII", ASCII_KIND, 4),
            ],
        }
    }
}

/// Registry of renderings by id.
///
/// Instances are built the first time they are requested and shared
/// afterwards.
pub struct RenderingRegistry {
    descriptors: Vec<RenderingDescriptor>,
    factories: HashMap<String, RenderingFactory>,
    instances: HashMap<String, Arc<dyn Rendering>>,
}

impl std::fmt::Debug for RenderingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderingRegistry")
            .field("descriptors", &self.descriptors)
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .field("instantiated", &self.instances.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for RenderingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderingRegistry {
    /// Create a registry with the built-in kinds and no renderings.
    pub fn new() -> Self {
        let mut factories: HashMap<String, RenderingFactory> = HashMap::new();
        factories.insert(HEX_KIND.to_owned(), HexRendering::from_descriptor);
        factories.insert(ASCII_KIND.to_owned(), AsciiRendering::from_descriptor);

        Self {
            descriptors: Vec::new(),
            factories,
            instances: HashMap::new(),
        }
    }

    /// Create a registry holding every rendering of `config`.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in &config.renderings {
            registry.register(descriptor.clone())?;
        }
        Ok(registry)
    }

    /// Make a factory available under `kind`, replacing any previous one.
    pub fn register_kind(&mut self, kind: impl Into<String>, factory: RenderingFactory) {
        self.factories.insert(kind.into(), factory);
    }

    /// Add a rendering.
    ///
    /// Fails if its kind has no factory, its column size is zero or its id
    /// is taken.
    pub fn register(&mut self, descriptor: RenderingDescriptor) -> Result<()> {
        if !self.factories.contains_key(&descriptor.kind) {
            return Err(Error::UnknownRenderingKind(descriptor.kind));
        }
        if descriptor.column_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "rendering {} has a zero column size",
                descriptor.id
            )));
        }
        if self.descriptor(&descriptor.id).is_some() {
            return Err(Error::InvalidConfig(format!(
                "rendering {} is registered twice",
                descriptor.id
            )));
        }

        tracing::trace!(id = %descriptor.id, kind = %descriptor.kind, "rendering registered");
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptor registered under `id`.
    pub fn descriptor(&self, id: &str) -> Option<&RenderingDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// All descriptors, in registration order.
    pub fn descriptors(&self) -> &[RenderingDescriptor] {
        &self.descriptors
    }

    /// Whether `id` was already instantiated.
    pub fn is_instantiated(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    /// Get the rendering `id`, building it on first use.
    pub fn create(&mut self, id: &str) -> Result<Arc<dyn Rendering>> {
        if let Some(rendering) = self.instances.get(id) {
            return Ok(Arc::clone(rendering));
        }

        let descriptor = self
            .descriptor(id)
            .ok_or_else(|| Error::UnknownRendering(id.to_owned()))?;
        let factory = self
            .factories
            .get(&descriptor.kind)
            .ok_or_else(|| Error::UnknownRenderingKind(descriptor.kind.clone()))?;

        tracing::debug!(id, kind = %descriptor.kind, "instantiating rendering");
        let rendering: Arc<dyn Rendering> = Arc::from(factory(descriptor));
        self.instances.insert(id.to_owned(), Arc::clone(&rendering));
        Ok(rendering)
    }
}
