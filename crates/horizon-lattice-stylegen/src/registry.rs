//! Identity and dedup state.
//!
//! Two collections live here. The [`Registry`] maps every generated token to
//! the style text it was generated from, so the token can later be expanded
//! again. The [`InsertedSet`] records which content hashes have already been
//! delivered to the sink. Both only grow until a full reset.

use std::collections::{HashMap, HashSet};

use crate::hash::hash_string;
use crate::logging::targets;
use crate::value::{StyleMeta, StyleToken};

/// Result of registering assembled style text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Content hash of the style text.
    pub hash: String,
    /// Token under which the style text is registered.
    pub token: StyleToken,
}

/// Build `prefix-hash` or `prefix-hash-label`.
pub(crate) fn make_token(prefix: &str, hash: &str, meta: &StyleMeta) -> StyleToken {
    match meta.label.as_deref() {
        Some(label) if !label.is_empty() => StyleToken::new(format!("{prefix}-{hash}-{label}")),
        _ => StyleToken::new(format!("{prefix}-{hash}")),
    }
}

/// Token to style text mapping.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    styles: HashMap<String, String>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Style text registered under `token`.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.styles.get(token).map(String::as_str)
    }

    /// Whether `token` is registered.
    pub fn contains(&self, token: &str) -> bool {
        self.styles.contains_key(token)
    }

    /// Number of registered tokens.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Iterate over `(token, styles)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.styles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Hash `styles` and register them under the derived token.
    ///
    /// Registration is idempotent: the same text and label always yield the
    /// same token, and an existing entry is never overwritten.
    pub fn register(&mut self, prefix: &str, styles: &str, meta: &StyleMeta) -> Registration {
        let hash = hash_string(styles);
        let token = make_token(prefix, &hash, meta);

        if !self.styles.contains_key(token.as_str()) {
            tracing::debug!(target: targets::ENGINE, token = %token, "registering styles");
            self.styles.insert(token.as_str().to_string(), styles.to_string());
        }

        Registration { hash, token }
    }

    pub(crate) fn clear(&mut self) {
        self.styles.clear();
    }
}

/// Content hashes that have reached the sink, or were marked as already present.
#[derive(Debug, Default, Clone)]
pub struct InsertedSet {
    hashes: HashSet<String>,
}

impl InsertedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `hash` has been delivered.
    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    /// Mark `hash` as delivered. Returns `false` if it already was.
    pub fn mark(&mut self, hash: impl Into<String>) -> bool {
        self.hashes.insert(hash.into())
    }

    /// Number of delivered hashes.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Check if nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Iterate over delivered hashes in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hashes.iter().map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.hashes.clear();
    }
}
