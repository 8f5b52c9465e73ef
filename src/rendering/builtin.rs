//! Built-in renderings: hexadecimal and ASCII.

use super::{Rendering, RenderingDescriptor};
use crate::memory::{MemoryByte, MemoryLine};
use std::fmt::Write;

/// Uppercase hexadecimal, two digits per byte.
#[derive(Debug, Clone)]
pub struct HexRendering {
    id: String,
    label: String,
    column_size: usize,
}

impl HexRendering {
    /// Create a hex rendering grouping `column_size` bytes per column.
    pub fn new(id: impl Into<String>, label: impl Into<String>, column_size: usize) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            column_size: column_size.max(1),
        }
    }

    /// Factory entry for the registry.
    pub fn from_descriptor(descriptor: &RenderingDescriptor) -> Box<dyn Rendering> {
        Box::new(Self::new(
            descriptor.id.as_str(),
            descriptor.label.as_str(),
            descriptor.column_size,
        ))
    }
}

impl Rendering for HexRendering {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn column_size(&self) -> usize {
        self.column_size
    }

    fn format_line(&self, line: &MemoryLine) -> Vec<String> {
        line.bytes()
            .chunks(self.column_size)
            .map(|column| {
                let mut cell = String::with_capacity(column.len() * 2);
                for byte in column {
                    if byte.is_valid() {
                        let _ = write!(cell, "{:02X}", byte.value());
                    } else {
                        cell.push_str(line.padded_str());
                    }
                }
                cell
            })
            .collect()
    }
}

/// Printable ASCII, `.` for anything else.
#[derive(Debug, Clone)]
pub struct AsciiRendering {
    id: String,
    label: String,
    column_size: usize,
}

impl AsciiRendering {
    /// Create an ASCII rendering grouping `column_size` bytes per column.
    pub fn new(id: impl Into<String>, label: impl Into<String>, column_size: usize) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            column_size: column_size.max(1),
        }
    }

    /// Factory entry for the registry.
    pub fn from_descriptor(descriptor: &RenderingDescriptor) -> Box<dyn Rendering> {
        Box::new(Self::new(
            descriptor.id.as_str(),
            descriptor.label.as_str(),
            descriptor.column_size,
        ))
    }

    fn glyph(byte: MemoryByte, unknown: char) -> char {
        if !byte.is_valid() {
            return unknown;
        }
        match byte.value() {
            v @ 0x20..=0x7E => char::from(v),
            _ => '.',
        }
    }
}

impl Rendering for AsciiRendering {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn column_size(&self) -> usize {
        self.column_size
    }

    fn format_line(&self, line: &MemoryLine) -> Vec<String> {
        let unknown = line.padded_str().chars().next().unwrap_or('?');
        line.bytes()
            .chunks(self.column_size)
            .map(|column| column.iter().map(|b| Self::glyph(*b, unknown)).collect::<String>())
            .collect()
    }
}
