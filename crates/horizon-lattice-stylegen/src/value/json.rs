//! Conversions from JSON values.
//!
//! JSON objects keep their key order. Any object with a `meta` key becomes a
//! metadata marker, reading its label from `label` or `identifierName`; its
//! other keys are ignored.

use serde_json::Value;

use super::{Interpolation, StyleMeta, StyleObject};

impl From<Value> for Interpolation {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                if let Some(meta) = map.get("meta") {
                    let label = meta
                        .get("label")
                        .or_else(|| meta.get("identifierName"))
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    return Self::Meta(StyleMeta { label });
                }
                Self::Object(map.into_iter().collect::<StyleObject>())
            }
        }
    }
}

impl From<&Value> for Interpolation {
    fn from(value: &Value) -> Self {
        value.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_object_keeps_order() {
        let value: Interpolation = json!({ "zIndex": 2, "color": "red", "margin": 0 }).into();
        let Interpolation::Object(obj) = value else {
            panic!("expected an object");
        };
        let keys: Vec<_> = obj.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zIndex", "color", "margin"]);
    }

    #[test]
    fn json_meta_marker() {
        let value: Interpolation = json!({ "meta": { "identifierName": "button" } }).into();
        assert!(matches!(value, Interpolation::Meta(m) if m.label.as_deref() == Some("button")));
    }

    #[test]
    fn json_meta_with_other_keys_is_still_meta() {
        let value: Interpolation = json!({ "color": "red", "meta": { "label": "card" } }).into();
        assert!(matches!(value, Interpolation::Meta(m) if m.label.as_deref() == Some("card")));

        let value: Interpolation = json!({ "meta": true }).into();
        assert!(matches!(value, Interpolation::Meta(m) if m.label.is_none()));
    }

    #[test]
    fn json_scalars() {
        assert!(Interpolation::from(json!(null)).is_null());
        assert!(matches!(Interpolation::from(json!(1.5)), Interpolation::Number(n) if n == 1.5));
        assert!(matches!(Interpolation::from(json!([1, "a"])), Interpolation::Array(v) if v.len() == 2));
    }
}
