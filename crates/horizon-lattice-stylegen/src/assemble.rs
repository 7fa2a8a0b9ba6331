//! Style assembly.
//!
//! A style-producing call receives either a template (literal segments with
//! interpolations between them) or a single value. Both are assembled into
//! one style string plus the metadata carried by any [`StyleMeta`]
//! interpolation.

use crate::resolve::Resolver;
use crate::value::{Interpolation, StyleMeta, StyleObject, StyleToken};

/// Literal text segments with interpolations between them.
///
/// There is always exactly one more segment than there are interpolations.
///
/// ```
/// use horizon_lattice_stylegen::Template;
///
/// let template = Template::new("color:").interp("red").text(";");
/// assert_eq!(template.strings(), ["color:", ";"]);
/// assert_eq!(template.interpolations().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    strings: Vec<String>,
    interpolations: Vec<Interpolation>,
}

impl Template {
    /// Start a template with its first literal segment.
    pub fn new(first: impl Into<String>) -> Self {
        Self {
            strings: vec![first.into()],
            interpolations: Vec::new(),
        }
    }

    /// Build a template from pre-split parts.
    ///
    /// Missing trailing segments are filled with empty text; surplus segments
    /// are joined into the last one.
    pub fn from_parts(strings: Vec<String>, interpolations: Vec<Interpolation>) -> Self {
        let mut strings = strings;
        let wanted = interpolations.len() + 1;
        if strings.len() > wanted {
            let surplus: String = strings.drain(wanted..).collect();
            if let Some(last) = strings.last_mut() {
                last.push_str(&surplus);
            }
        }
        strings.resize(wanted, String::new());
        Self {
            strings,
            interpolations,
        }
    }

    /// Append an interpolation.
    pub fn interp(mut self, value: impl Into<Interpolation>) -> Self {
        self.interpolations.push(value.into());
        self.strings.push(String::new());
        self
    }

    /// Append literal text to the current segment.
    pub fn text(mut self, text: &str) -> Self {
        if let Some(last) = self.strings.last_mut() {
            last.push_str(text);
        }
        self
    }

    /// Literal segments.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Interpolations between the segments.
    pub fn interpolations(&self) -> &[Interpolation] {
        &self.interpolations
    }
}

/// Arguments of a style-producing call.
#[derive(Debug, Clone)]
pub enum StyleArgs {
    /// Template mode.
    Template(Template),
    /// Value mode: one value, then trailing interpolations appended after it.
    Value {
        value: Interpolation,
        rest: Vec<Interpolation>,
    },
}

impl StyleArgs {
    /// Value-mode arguments.
    pub fn value(value: impl Into<Interpolation>) -> Self {
        Self::Value {
            value: value.into(),
            rest: Vec::new(),
        }
    }

    /// Append a trailing interpolation.
    pub fn interp(self, value: impl Into<Interpolation>) -> Self {
        match self {
            Self::Template(template) => Self::Template(template.interp(value)),
            Self::Value { value: head, mut rest } => {
                rest.push(value.into());
                Self::Value { value: head, rest }
            }
        }
    }
}

impl From<Template> for StyleArgs {
    fn from(template: Template) -> Self {
        Self::Template(template)
    }
}

impl From<Interpolation> for StyleArgs {
    fn from(value: Interpolation) -> Self {
        Self::value(value)
    }
}

impl From<&str> for StyleArgs {
    fn from(value: &str) -> Self {
        Self::value(value)
    }
}

impl From<String> for StyleArgs {
    fn from(value: String) -> Self {
        Self::value(value)
    }
}

impl From<StyleObject> for StyleArgs {
    fn from(value: StyleObject) -> Self {
        Self::value(value)
    }
}

impl From<&StyleObject> for StyleArgs {
    fn from(value: &StyleObject) -> Self {
        Self::value(value)
    }
}

impl From<StyleToken> for StyleArgs {
    fn from(value: StyleToken) -> Self {
        Self::value(value)
    }
}

impl From<Vec<Interpolation>> for StyleArgs {
    fn from(value: Vec<Interpolation>) -> Self {
        Self::value(value)
    }
}

impl From<serde_json::Value> for StyleArgs {
    fn from(value: serde_json::Value) -> Self {
        Self::value(value)
    }
}

/// Assembled style text and its metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledStyles {
    /// The style body.
    pub styles: String,
    /// Metadata collected from `Meta` interpolations.
    pub meta: StyleMeta,
}

pub(crate) fn assemble(resolver: &mut Resolver<'_>, args: &StyleArgs) -> AssembledStyles {
    let mut assembled = AssembledStyles::default();

    match args {
        StyleArgs::Template(template) => {
            assembled.styles.push_str(&template.strings[0]);
            for (i, interpolation) in template.interpolations.iter().enumerate() {
                // a meta marker drops the literal segment that follows it
                if let Interpolation::Meta(meta) = interpolation {
                    assembled.meta = meta.clone();
                    continue;
                }
                append(resolver, interpolation, &mut assembled);
                if let Some(segment) = template.strings.get(i + 1) {
                    assembled.styles.push_str(segment);
                }
            }
        }
        StyleArgs::Value { value, rest } => {
            append(resolver, value, &mut assembled);
            for interpolation in rest {
                append(resolver, interpolation, &mut assembled);
            }
        }
    }

    assembled
}

fn append(resolver: &mut Resolver<'_>, interpolation: &Interpolation, assembled: &mut AssembledStyles) {
    if let Interpolation::Meta(meta) = interpolation {
        assembled.meta = meta.clone();
        return;
    }
    // `.${token}` selects the class instead of inlining its styles
    let selector_context = assembled.styles.ends_with('.');
    resolver.resolve_into(interpolation, selector_context, &mut assembled.styles);
}
