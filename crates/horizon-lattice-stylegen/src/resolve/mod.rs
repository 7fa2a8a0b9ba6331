//! Interpolation resolution and object serialization.
//!
//! The resolver walks an [`Interpolation`] and writes its CSS text:
//!
//! - `Null`, booleans and metadata write nothing
//! - functions are called (with the binding context, if any) and their result
//!   is resolved in the same position
//! - objects and arrays are serialized, objects through the identity cache
//! - text and tokens expand to their registered style text, unless they
//!   follow a `.` (selector context), where they stay as written
//!
//! Malformed input never fails: at worst it degrades to empty text.

mod cache;
mod property;

pub(crate) use cache::ObjectCache;
pub(crate) use property::PropertyNames;
pub use property::{hyphenate, is_unitless};

use crate::logging::targets;
use crate::registry::Registry;
use crate::value::{BindingContext, Interpolation, StyleFn, StyleObject};
use property::{format_number, numeric_value};

/// Resolution state for a single style-producing call.
pub(crate) struct Resolver<'a> {
    registry: &'a Registry,
    cache: &'a mut ObjectCache,
    names: &'a mut PropertyNames,
    context: Option<&'a BindingContext>,
    max_depth: usize,
    depth: usize,
    /// Set when the text being produced must not be cached.
    volatile: bool,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        cache: &'a mut ObjectCache,
        names: &'a mut PropertyNames,
        context: Option<&'a BindingContext>,
        max_depth: usize,
    ) -> Self {
        Self {
            registry,
            cache,
            names,
            context,
            max_depth,
            depth: 0,
            volatile: false,
        }
    }

    /// Resolve `value` to CSS text.
    pub(crate) fn resolve(&mut self, value: &Interpolation, selector_context: bool) -> String {
        let mut out = String::new();
        self.resolve_into(value, selector_context, &mut out);
        out
    }

    /// Resolve `value`, appending its text to `out`.
    pub(crate) fn resolve_into(&mut self, value: &Interpolation, selector_context: bool, out: &mut String) {
        if !self.enter() {
            return;
        }

        match value {
            Interpolation::Null | Interpolation::Bool(_) | Interpolation::Meta(_) => {}
            Interpolation::Function(f) => {
                let result = self.call(f);
                self.resolve_into(&result, selector_context, out);
            }
            Interpolation::Object(object) => self.serialize_object(object, out),
            Interpolation::Array(items) => {
                for item in items {
                    self.resolve_into(item, false, out);
                }
            }
            Interpolation::Number(n) => out.push_str(&format_number(*n)),
            Interpolation::Text(text) => self.push_scalar(text, selector_context, out),
            Interpolation::Token(token) => self.push_scalar(token.as_str(), selector_context, out),
        }

        self.depth -= 1;
    }

    fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            tracing::warn!(
                target: targets::RESOLVE,
                max_depth = self.max_depth,
                "interpolation nested too deeply, resolving to empty text"
            );
            self.volatile = true;
            return false;
        }
        self.depth += 1;
        true
    }

    fn call(&mut self, f: &StyleFn) -> Interpolation {
        self.volatile = true;
        f(self.context)
    }

    fn push_scalar(&self, name: &str, selector_context: bool, out: &mut String) {
        match self.registry.get(name) {
            Some(styles) if !selector_context => out.push_str(styles),
            _ => out.push_str(name),
        }
    }

    fn serialize_object(&mut self, object: &StyleObject, out: &mut String) {
        if let Some(text) = self.cache.get(object) {
            tracing::trace!(target: targets::RESOLVE, object = object.id().as_u64(), "object cache hit");
            out.push_str(text);
            return;
        }

        let outer_volatile = std::mem::replace(&mut self.volatile, false);
        let mut text = String::new();
        for (key, value) in object.iter() {
            self.write_entry(key, value, &mut text);
        }

        if !self.volatile {
            self.cache.insert(object, text.clone());
        }
        self.volatile |= outer_volatile;
        out.push_str(&text);
    }

    fn write_entry(&mut self, key: &str, value: &Interpolation, out: &mut String) {
        match value {
            Interpolation::Function(f) => {
                if !self.enter() {
                    return;
                }
                let result = self.call(f);
                self.write_entry(key, &result, out);
                self.depth -= 1;
            }
            Interpolation::Object(_) | Interpolation::Array(_) => {
                out.push_str(key);
                out.push('{');
                self.resolve_into(value, false, out);
                out.push('}');
            }
            Interpolation::Meta(_) => {}
            Interpolation::Text(name) if self.registry.contains(name) => {
                self.push_composed(key, name, out);
            }
            Interpolation::Token(token) if self.registry.contains(token.as_str()) => {
                self.push_composed(key, token.as_str(), out);
            }
            _ => {
                let value_text = match value {
                    Interpolation::Number(n) => numeric_value(key, *n),
                    Interpolation::Text(text) => text.clone(),
                    Interpolation::Token(token) => token.to_string(),
                    _ => String::new(),
                };
                out.push_str(self.names.canonical(key));
                out.push(':');
                out.push_str(&value_text);
                out.push(';');
            }
        }
    }

    /// Write `key{<registered styles>}`.
    fn push_composed(&self, key: &str, name: &str, out: &mut String) {
        out.push_str(key);
        out.push('{');
        out.push_str(self.registry.get(name).unwrap_or_default());
        out.push('}');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{StyleMeta, StyleToken};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        registry: Registry,
        cache: ObjectCache,
        names: PropertyNames,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: Registry::new(),
                cache: ObjectCache::with_capacity(64),
                names: PropertyNames::new(),
            }
        }

        fn resolver(&mut self) -> Resolver<'_> {
            Resolver::new(&self.registry, &mut self.cache, &mut self.names, None, 16)
        }
    }

    #[test]
    fn object_serialization() {
        let mut fx = Fixture::new();
        let obj = StyleObject::from_iter([
            ("color", Interpolation::from("blue")),
            ("fontSize", Interpolation::from(12)),
        ]);
        assert_eq!(
            fx.resolver().resolve(&obj.into(), false),
            "color:blue;font-size:12px;"
        );
    }

    #[test]
    fn nested_objects_become_blocks() {
        let mut fx = Fixture::new();
        let obj = StyleObject::builder()
            .set("color", "red")
            .set(":hover", StyleObject::from_iter([("color", "blue")]))
            .set("@media (min-width: 420px)", StyleObject::from_iter([("lineHeight", 1.5)]))
            .build();

        assert_eq!(
            fx.resolver().resolve(&obj.into(), false),
            "color:red;:hover{color:blue;}@media (min-width: 420px){line-height:1.5;}"
        );
    }

    #[test]
    fn scalar_edge_values() {
        let mut fx = Fixture::new();
        let obj = StyleObject::builder()
            .set("margin", 0)
            .set("zIndex", 3)
            .set("width", "12")
            .set("display", Interpolation::Null)
            .set("hidden", true)
            .build();

        assert_eq!(
            fx.resolver().resolve(&obj.into(), false),
            "margin:0;z-index:3;width:12;display:;hidden:;"
        );
    }

    #[test]
    fn arrays_and_falsy_values() {
        let mut fx = Fixture::new();
        let value = Interpolation::from(vec![
            Interpolation::from("color:red;"),
            Interpolation::Null,
            Interpolation::Bool(false),
            StyleObject::from_iter([("margin", 4)]).into(),
        ]);
        assert_eq!(fx.resolver().resolve(&value, false), "color:red;margin:4px;");
    }

    #[test]
    fn registered_tokens_expand_outside_selector_context() {
        let mut fx = Fixture::new();
        let token = fx
            .registry
            .register("css", "color:red;", &StyleMeta::default())
            .token;
        let value = Interpolation::Token(token.clone());

        assert_eq!(fx.resolver().resolve(&value, false), "color:red;");
        assert_eq!(fx.resolver().resolve(&value, true), token.as_str());
        assert_eq!(
            fx.resolver().resolve(&Interpolation::from(token.as_str()), false),
            "color:red;"
        );
        assert_eq!(
            fx.resolver().resolve(&Interpolation::from("css-unknown"), false),
            "css-unknown"
        );
    }

    #[test]
    fn registered_values_compose_under_keys() {
        let mut fx = Fixture::new();
        let token = fx
            .registry
            .register("css", "color:red;", &StyleMeta::default())
            .token;
        let obj = StyleObject::from_iter([("& .icon", Interpolation::Token(token))]);

        assert_eq!(fx.resolver().resolve(&obj.into(), false), "& .icon{color:red;}");
    }

    #[test]
    fn functions_are_called_in_place() {
        let mut fx = Fixture::new();
        let obj = StyleObject::builder()
            .set("color", Interpolation::function(|_| "red".into()))
            .set(
                ":hover",
                Interpolation::function(|_| StyleObject::from_iter([("color", "blue")]).into()),
            )
            .build();

        assert_eq!(
            fx.resolver().resolve(&obj.into(), false),
            "color:red;:hover{color:blue;}"
        );
    }

    #[test]
    fn functions_see_binding_context() {
        let mut fx = Fixture::new();
        let ctx = BindingContext::new(serde_json::json!({ "size": 20 }), serde_json::Value::Null);
        let value = Interpolation::function(|ctx| {
            ctx.and_then(|c| c.prop("size"))
                .and_then(|v| v.as_f64())
                .map(|size| format!("width:{size}px;"))
                .into()
        });

        let mut resolver = Resolver::new(&fx.registry, &mut fx.cache, &mut fx.names, Some(&ctx), 16);
        assert_eq!(resolver.resolve(&value, false), "width:20px;");
        assert_eq!(fx.resolver().resolve(&value, false), "");
    }

    #[test]
    fn objects_are_cached_by_identity() {
        let mut fx = Fixture::new();
        let obj = StyleObject::from_iter([("color", "red")]);

        fx.resolver().resolve(&obj.clone().into(), false);
        fx.resolver().resolve(&obj.into(), false);
        assert_eq!(fx.cache.len(), 1);
    }

    #[test]
    fn objects_with_functions_are_not_cached() {
        let mut fx = Fixture::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let obj = StyleObject::from_iter([(
            "color",
            Interpolation::function(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                "red".into()
            }),
        )]);
        let outer = StyleObject::from_iter([("& span", obj.clone())]);

        fx.resolver().resolve(&outer.clone().into(), false);
        fx.resolver().resolve(&outer.into(), false);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(fx.cache.len(), 0);
    }

    #[test]
    fn runaway_recursion_degrades_to_empty() {
        fn endless() -> Interpolation {
            Interpolation::function(|_| endless())
        }

        let mut fx = Fixture::new();
        assert_eq!(fx.resolver().resolve(&endless(), false), "");
    }

    #[test]
    fn numbers_outside_objects_stay_unitless() {
        let mut fx = Fixture::new();
        assert_eq!(fx.resolver().resolve(&Interpolation::from(12), false), "12");
        assert_eq!(
            fx.resolver().resolve(&Interpolation::Token(StyleToken::new("x")), true),
            "x"
        );
    }
}
