//! Property names and values in declaration position.

use std::collections::HashMap;

/// Properties whose numeric values never receive a unit, in camelCase.
const UNITLESS_PROPERTIES: &[&str] = &[
    "animationIterationCount",
    "borderImageOutset",
    "borderImageSlice",
    "borderImageWidth",
    "boxFlex",
    "boxFlexGroup",
    "boxOrdinalGroup",
    "columnCount",
    "columns",
    "flex",
    "flexGrow",
    "flexPositive",
    "flexShrink",
    "flexNegative",
    "flexOrder",
    "gridRow",
    "gridRowEnd",
    "gridRowSpan",
    "gridRowStart",
    "gridColumn",
    "gridColumnEnd",
    "gridColumnSpan",
    "gridColumnStart",
    "fontWeight",
    "lineClamp",
    "lineHeight",
    "opacity",
    "order",
    "orphans",
    "tabSize",
    "widows",
    "zIndex",
    "zoom",
    "fillOpacity",
    "floodOpacity",
    "stopOpacity",
    "strokeDasharray",
    "strokeDashoffset",
    "strokeMiterlimit",
    "strokeOpacity",
    "strokeWidth",
];

const VENDOR_PREFIXES: &[&str] = &["Webkit", "Moz", "ms", "O"];

/// Memoized camelCase to hyphenated conversion.
#[derive(Debug, Default)]
pub(crate) struct PropertyNames {
    cache: HashMap<String, String>,
}

impl PropertyNames {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Canonical CSS name for `key`.
    pub(crate) fn canonical(&mut self, key: &str) -> &str {
        if !self.cache.contains_key(key) {
            self.cache.insert(key.to_string(), hyphenate(key));
        }
        &self.cache[key]
    }

    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }
}

/// Convert `fontSize` to `font-size` and `msTransform` to `-ms-transform`.
pub fn hyphenate(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let rest = match key.strip_prefix("ms") {
        Some(rest) => {
            out.push_str("-ms");
            rest
        }
        None => key,
    };
    for c in rest.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

fn camelize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.trim_start_matches('-').chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether numeric values of `key` stay unitless.
pub fn is_unitless(key: &str) -> bool {
    let camel = if key.contains('-') {
        camelize(key)
    } else {
        key.to_string()
    };
    if UNITLESS_PROPERTIES.contains(&camel.as_str()) {
        return true;
    }

    // Webkit/Moz/ms/O prefixed forms of the same properties
    for prefix in VENDOR_PREFIXES {
        let lower = prefix.to_ascii_lowercase();
        let Some(rest) = camel
            .strip_prefix(prefix)
            .or_else(|| camel.strip_prefix(lower.as_str()))
        else {
            continue;
        };
        let mut chars = rest.chars();
        if let Some(first) = chars.next().filter(char::is_ascii_uppercase) {
            let unprefixed: String = first.to_ascii_lowercase().to_string() + chars.as_str();
            if UNITLESS_PROPERTIES.contains(&unprefixed.as_str()) {
                return true;
            }
        }
    }
    false
}

/// Render a number the way it is written in CSS (`12`, `1.5`).
///
/// Follows the JavaScript number-to-string rules so that rendered text (and
/// therefore the class hash) matches server output: `-0` is `0`, magnitudes
/// from `1e21` up or below `1e-6` use exponent form, and non-finite values
/// are spelled `Infinity` and `NaN`.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }
    let exponent = format!("{value:e}");
    match exponent.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => exponent,
    }
}

/// Value text for a numeric declaration, with `px` where it applies.
pub(crate) fn numeric_value(key: &str, value: f64) -> String {
    if !is_unitless(key) && value.is_finite() && value != 0.0 {
        format!("{}px", format_number(value))
    } else {
        format_number(value)
    }
}
