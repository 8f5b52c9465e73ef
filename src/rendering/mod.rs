//! Renderings: Turning memory lines into display columns.
//!
//! A [`Rendering`] formats the bytes of a [`MemoryLine`] into columns. The
//! [`RenderingRegistry`] maps rendering ids to descriptors and creates
//! instances on first use.
//!
//! # Example
//!
//! ```rust,ignore
//! use memline::rendering::{RegistryConfig, RenderingRegistry};
//!
//! let mut registry = RenderingRegistry::from_config(&RegistryConfig::default())?;
//! let hex = registry.create("hex")?;
//! let columns = hex.format_line(&line);
//! ```

mod builtin;
mod registry;

pub use builtin::{AsciiRendering, HexRendering};
pub use registry::{
    RegistryConfig, RenderingDescriptor, RenderingFactory, RenderingRegistry, ASCII_KIND, HEX_KIND,
};

use crate::memory::MemoryLine;

/// A way of displaying memory.
///
/// Implementations are stateless formatters and may be shared between tabs.
pub trait Rendering: Send + Sync {
    /// Registry id of this rendering.
    fn id(&self) -> &str;

    /// Human-readable name, used in tab labels.
    fn label(&self) -> &str;

    /// Number of bytes shown per column.
    fn column_size(&self) -> usize;

    /// Format one line into its columns.
    ///
    /// A line of `n` bytes yields `ceil(n / column_size)` cells.
    fn format_line(&self, line: &MemoryLine) -> Vec<String>;
}
