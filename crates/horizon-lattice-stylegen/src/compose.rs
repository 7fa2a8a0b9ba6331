//! Class name composition.

use crate::registry::Registry;
use crate::value::{Interpolation, StyleToken};

/// Flatten class name arguments into a space-separated string.
///
/// Strings, numbers and tokens contribute themselves; objects contribute the
/// keys whose values are truthy; arrays are flattened; functions are called
/// and their result flattened. `Null`, booleans and metadata contribute
/// nothing.
///
/// ```
/// use horizon_lattice_stylegen::{classnames, Interpolation, StyleObject};
///
/// let flags = StyleObject::from_iter([("b", true), ("c", false)]);
/// let names = classnames(&[
///     "a".into(),
///     flags.into(),
///     Interpolation::Null,
///     vec!["d", "e"].into(),
/// ]);
/// assert_eq!(names, "a b d e");
/// ```
pub fn classnames(args: &[Interpolation]) -> String {
    let mut out = String::new();
    for arg in args {
        push_class(arg, &mut out);
    }
    out
}

fn push_class(arg: &Interpolation, out: &mut String) {
    match arg {
        Interpolation::Null | Interpolation::Bool(_) | Interpolation::Meta(_) => {}
        Interpolation::Text(text) => push_word(text, out),
        Interpolation::Token(token) => push_word(token.as_str(), out),
        Interpolation::Number(n) => push_word(&n.to_string(), out),
        Interpolation::Function(f) => push_class(&f(None), out),
        Interpolation::Array(items) => {
            for item in items {
                push_class(item, out);
            }
        }
        Interpolation::Object(object) => {
            for (key, value) in object.iter() {
                if value.is_truthy() {
                    push_word(key, out);
                }
            }
        }
    }
}

fn push_word(word: &str, out: &mut String) {
    if word.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(word);
}

/// A class list split into registered tokens and everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitClassNames {
    /// Tokens found in the registry, in input order.
    pub registered: Vec<StyleToken>,
    /// Remaining class names, each followed by a space.
    pub raw: String,
}

/// Partition `class_names` into registered tokens and raw class names.
pub(crate) fn split_registered(registry: &Registry, class_names: &str) -> SplitClassNames {
    let mut split = SplitClassNames::default();
    for name in class_names.split_whitespace() {
        if registry.contains(name) {
            split.registered.push(StyleToken::new(name));
        } else {
            split.raw.push_str(name);
            split.raw.push(' ');
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{StyleMeta, StyleObject};

    #[test]
    fn classnames_flattens_everything() {
        let names = classnames(&[
            "a".into(),
            StyleObject::from_iter([("b", true), ("c", false)]).into(),
            Interpolation::Null,
            vec!["d", "e"].into(),
        ]);
        assert_eq!(names, "a b d e");
    }

    #[test]
    fn classnames_calls_functions_and_skips_empty() {
        let names = classnames(&[
            "".into(),
            Interpolation::function(|_| vec!["x", "y"].into()),
            Interpolation::Bool(true),
            3.into(),
            StyleObject::from_iter([("on", Interpolation::from("yes")), ("off", Interpolation::from(""))]).into(),
        ]);
        assert_eq!(names, "x y 3 on");
    }

    #[test]
    fn split_partitions_by_registry() {
        let mut registry = Registry::new();
        let token = registry
            .register("css", "color:red;", &StyleMeta::default())
            .token;

        let split = split_registered(&registry, &format!("raw {token}  other"));
        assert_eq!(split.registered, vec![token]);
        assert_eq!(split.raw, "raw other ");
    }
}
