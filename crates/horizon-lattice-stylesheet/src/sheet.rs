//! Rule sinks.
//!
//! A sink is the last stop for a flattened rule. It owns whatever backing
//! storage makes the rule effective and follows a small lifecycle:
//! [`inject`](StyleSink::inject) creates the storage,
//! [`insert`](StyleSink::insert) appends rules, and
//! [`flush`](StyleSink::flush) throws the storage away again.

use crate::{Error, Result};

/// Destination for flattened CSS rules.
pub trait StyleSink: Send {
    /// Create the backing storage.
    fn inject(&mut self) -> Result<()>;

    /// Append a single flattened rule.
    ///
    /// `source_map` carries the source-map comment detected in the style body
    /// the rule was generated from, if any.
    fn insert(&mut self, rule: &str, source_map: Option<&str>) -> Result<()>;

    /// Discard the backing storage and every rule in it.
    fn flush(&mut self);
}

/// A rule recorded by [`MemorySheet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRule {
    /// The flattened rule text.
    pub text: String,
    /// Source-map comment captured with the rule.
    pub source_map: Option<String>,
}

/// In-memory sink that records rules in insertion order.
///
/// Useful for server rendering (collect everything, then emit a single
/// `<style>` block) and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    rules: Vec<SheetRule>,
    injected: bool,
}

impl MemorySheet {
    /// Create a sheet that still needs to be injected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sheet that is ready to receive rules.
    pub fn injected() -> Self {
        Self {
            rules: Vec::new(),
            injected: true,
        }
    }

    /// Whether the backing storage currently exists.
    pub fn is_injected(&self) -> bool {
        self.injected
    }

    /// The recorded rules.
    pub fn rules(&self) -> &[SheetRule] {
        &self.rules
    }

    /// Number of recorded rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rule has been recorded.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Concatenated text of every rule, without source maps.
    pub fn to_css(&self) -> String {
        self.rules.iter().map(|r| r.text.as_str()).collect()
    }

    /// Iterate over rule texts.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.text.as_str())
    }
}

impl StyleSink for MemorySheet {
    fn inject(&mut self) -> Result<()> {
        if self.injected {
            return Err(Error::AlreadyInjected);
        }
        self.injected = true;
        Ok(())
    }

    fn insert(&mut self, rule: &str, source_map: Option<&str>) -> Result<()> {
        if !self.injected {
            return Err(Error::NotInjected);
        }
        tracing::trace!(target: "horizon_lattice_stylesheet::sheet", rule, "inserting rule");
        self.rules.push(SheetRule {
            text: rule.to_string(),
            source_map: source_map.map(str::to_string),
        });
        Ok(())
    }

    fn flush(&mut self) {
        self.rules.clear();
        self.injected = false;
    }
}
