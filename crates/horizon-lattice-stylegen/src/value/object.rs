//! Immutable style objects.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::Interpolation;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`StyleObject`].
///
/// Clones of an object share its id; building a new object, even with equal
/// entries, yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleObjectId(u64);

impl StyleObjectId {
    fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub(crate) struct ObjectInner {
    id: StyleObjectId,
    entries: Vec<(String, Interpolation)>,
}

/// An ordered, immutable map from property names or nested selectors to values.
///
/// Objects cannot be modified once built, which is what allows the engine to
/// cache their serialized text by identity.
///
/// ```
/// use horizon_lattice_stylegen::StyleObject;
///
/// let button = StyleObject::builder()
///     .set("color", "blue")
///     .set("fontSize", 12)
///     .set(":hover", StyleObject::from_iter([("color", "navy")]))
///     .build();
///
/// assert_eq!(button.len(), 3);
/// ```
#[derive(Clone)]
pub struct StyleObject {
    inner: Arc<ObjectInner>,
}

impl StyleObject {
    /// Start building an object.
    pub fn builder() -> StyleObjectBuilder {
        StyleObjectBuilder::default()
    }

    fn from_entries(entries: Vec<(String, Interpolation)>) -> Self {
        Self {
            inner: Arc::new(ObjectInner {
                id: StyleObjectId::next(),
                entries,
            }),
        }
    }

    /// Identity of this object.
    pub fn id(&self) -> StyleObjectId {
        self.inner.id
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Check if the object has no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Interpolation> {
        self.inner
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Interpolation)> {
        self.inner.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn downgrade(&self) -> WeakStyleObject {
        WeakStyleObject(Arc::downgrade(&self.inner))
    }
}

impl fmt::Debug for StyleObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleObject")
            .field("id", &self.inner.id.0)
            .field("entries", &self.inner.entries)
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for StyleObject
where
    K: Into<String>,
    V: Into<Interpolation>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut builder = StyleObjectBuilder::default();
        for (key, value) in iter {
            builder = builder.set(key, value);
        }
        builder.build()
    }
}

impl Default for StyleObject {
    fn default() -> Self {
        Self::from_entries(Vec::new())
    }
}

/// Builder for [`StyleObject`].
#[derive(Debug, Default)]
pub struct StyleObjectBuilder {
    entries: Vec<(String, Interpolation)>,
}

impl StyleObjectBuilder {
    /// Set `key` to `value`.
    ///
    /// Setting an existing key replaces its value but keeps its position.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Interpolation>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Finish the object.
    pub fn build(self) -> StyleObject {
        StyleObject::from_entries(self.entries)
    }
}

/// Weak handle used by the serialization cache to notice dropped objects.
#[derive(Debug, Clone)]
pub(crate) struct WeakStyleObject(Weak<ObjectInner>);

impl WeakStyleObject {
    pub(crate) fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
