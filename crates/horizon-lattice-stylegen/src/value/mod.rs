//! Style values.
//!
//! Everything a caller can interpolate into a style is an [`Interpolation`]:
//! plain text and numbers, nested [`StyleObject`]s, arrays, lazily evaluated
//! functions, references to previously generated [`StyleToken`]s, and the
//! [`StyleMeta`] marker that carries a debug label instead of style text.

mod json;
mod object;

pub use object::{StyleObject, StyleObjectBuilder, StyleObjectId};
pub(crate) use object::WeakStyleObject;

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// A lazily evaluated interpolation.
///
/// Receives the binding context of the call, if one was supplied.
pub type StyleFn = Arc<dyn Fn(Option<&BindingContext>) -> Interpolation + Send + Sync>;

/// Props and context handed to function interpolations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingContext {
    /// The merged props of the component being styled.
    pub merged_props: serde_json::Value,
    /// Ambient context (theme and similar).
    pub context: serde_json::Value,
}

impl BindingContext {
    /// Create a binding context.
    pub fn new(merged_props: serde_json::Value, context: serde_json::Value) -> Self {
        Self {
            merged_props,
            context,
        }
    }

    /// Look up a single prop.
    pub fn prop(&self, name: &str) -> Option<&serde_json::Value> {
        self.merged_props.get(name)
    }
}

/// Metadata attached to a style through a [`Interpolation::Meta`] value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMeta {
    /// Human-readable suffix appended to generated identifiers.
    pub label: Option<String>,
}

impl StyleMeta {
    /// Metadata carrying a label.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

/// An identifier produced by a style-producing call.
///
/// Used as a class name (`css-1x2y3z`) or an at-rule name
/// (`animation-1x2y3z`). Interpolating a token refers to the style it was
/// registered with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleToken(String);

impl StyleToken {
    /// Wrap an existing identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning the identifier text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StyleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StyleToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StyleToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StyleToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StyleToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<StyleToken> for String {
    fn from(token: StyleToken) -> Self {
        token.0
    }
}

/// A value that can be interpolated into a style.
#[derive(Clone, Default)]
pub enum Interpolation {
    /// Absent value; resolves to nothing.
    #[default]
    Null,
    /// Booleans resolve to nothing, so `cond && style` patterns work.
    Bool(bool),
    /// A number. Gains a `px` unit in property position unless unitless.
    Number(f64),
    /// Literal text, or the name of a registered style.
    Text(String),
    /// Explicit reference to a generated identifier.
    Token(StyleToken),
    /// Evaluated at resolution time; the result is resolved in its place.
    Function(StyleFn),
    /// A nested style map.
    Object(StyleObject),
    /// A sequence, resolved element by element.
    Array(Vec<Interpolation>),
    /// Metadata; contributes no style text.
    Meta(StyleMeta),
}

impl Interpolation {
    /// Wrap a closure as a function interpolation.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Option<&BindingContext>) -> Interpolation + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// A metadata marker carrying `label`.
    pub fn label(label: impl Into<String>) -> Self {
        Self::Meta(StyleMeta::label(label))
    }

    /// Truthiness as used when collecting class names.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Token(_)
            | Self::Function(_)
            | Self::Object(_)
            | Self::Array(_)
            | Self::Meta(_) => true,
        }
    }

    /// Whether this value is [`Interpolation::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Token(t) => f.debug_tuple("Token").field(t).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Object(o) => f.debug_tuple("Object").field(o).finish(),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Self::Meta(m) => f.debug_tuple("Meta").field(m).finish(),
        }
    }
}

impl From<&str> for Interpolation {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Interpolation {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Interpolation {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for Interpolation {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Interpolation {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Interpolation {
    fn from(value: f32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for Interpolation {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i64> for Interpolation {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u32> for Interpolation {
    fn from(value: u32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<usize> for Interpolation {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<StyleToken> for Interpolation {
    fn from(value: StyleToken) -> Self {
        Self::Token(value)
    }
}

impl From<&StyleToken> for Interpolation {
    fn from(value: &StyleToken) -> Self {
        Self::Token(value.clone())
    }
}

impl From<StyleObject> for Interpolation {
    fn from(value: StyleObject) -> Self {
        Self::Object(value)
    }
}

impl From<&StyleObject> for Interpolation {
    fn from(value: &StyleObject) -> Self {
        Self::Object(value.clone())
    }
}

impl From<StyleMeta> for Interpolation {
    fn from(value: StyleMeta) -> Self {
        Self::Meta(value)
    }
}

impl<T: Into<Interpolation>> From<Option<T>> for Interpolation {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Interpolation>> From<Vec<T>> for Interpolation {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}
