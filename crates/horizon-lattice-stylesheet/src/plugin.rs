//! Rule plugins and the plugin chain.
//!
//! Every rule produced by a [`Preprocessor`](crate::Preprocessor) travels
//! through a [`PluginChain`]: the registered plugins run first, in
//! registration order, and the capturing hook runs last. The hook is fixed
//! when the chain is built, so no plugin can ever be placed after it.

use std::fmt;
use std::sync::Arc;

use crate::Result;

/// A transform applied to each flattened rule.
///
/// Returning `None` drops the rule. Closures of the form
/// `Fn(String) -> Option<String>` implement this trait.
pub trait RulePlugin: Send + Sync {
    /// Transform a single rule.
    fn process(&self, rule: String) -> Option<String>;
}

impl<F> RulePlugin for F
where
    F: Fn(String) -> Option<String> + Send + Sync,
{
    fn process(&self, rule: String) -> Option<String> {
        self(rule)
    }
}

/// Terminal hook receiving `(rule, source_map)`.
pub type CaptureHook<'a> = dyn FnMut(&str, Option<&str>) -> Result<()> + 'a;

/// The plugins for a single preprocessing call, followed by the capturing hook.
pub struct PluginChain<'a> {
    plugins: &'a [Arc<dyn RulePlugin>],
    source_map: Option<&'a str>,
    capture: &'a mut CaptureHook<'a>,
}

impl<'a> PluginChain<'a> {
    /// Build a chain ending in `capture`.
    ///
    /// `source_map` is handed to the hook together with every rule emitted
    /// through this chain.
    pub fn new(
        plugins: &'a [Arc<dyn RulePlugin>],
        source_map: Option<&'a str>,
        capture: &'a mut CaptureHook<'a>,
    ) -> Self {
        Self {
            plugins,
            source_map,
            capture,
        }
    }

    /// Source-map comment attached to this call.
    pub fn source_map(&self) -> Option<&'a str> {
        self.source_map
    }

    /// Number of plugins running before the hook.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Run `rule` through every plugin and then the hook.
    pub fn emit(&mut self, rule: String) -> Result<()> {
        let mut rule = rule;
        for plugin in self.plugins {
            match plugin.process(rule) {
                Some(next) => rule = next,
                None => {
                    tracing::trace!(target: "horizon_lattice_stylesheet::plugin", "rule dropped by plugin");
                    return Ok(());
                }
            }
        }
        (self.capture)(&rule, self.source_map)
    }
}

impl fmt::Debug for PluginChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginChain")
            .field("plugins", &self.plugins.len())
            .field("source_map", &self.source_map)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_runs_plugins_in_order_then_hook() {
        let plugins: Vec<Arc<dyn RulePlugin>> = vec![
            Arc::new(|rule: String| Some(rule.replace("red", "blue"))),
            Arc::new(|rule: String| Some(format!("{rule}/*seen*/"))),
        ];

        let mut captured = Vec::new();
        let mut capture = |rule: &str, _: Option<&str>| -> Result<()> {
            captured.push(rule.to_string());
            Ok(())
        };
        let mut chain = PluginChain::new(&plugins, None, &mut capture);
        chain.emit(".a{color:red;}".to_string()).unwrap();
        drop(chain);

        assert_eq!(captured, vec![".a{color:blue;}/*seen*/".to_string()]);
    }

    #[test]
    fn chain_plugin_can_drop_rules() {
        let plugins: Vec<Arc<dyn RulePlugin>> = vec![Arc::new(|rule: String| {
            if rule.starts_with("@import") { None } else { Some(rule) }
        })];

        let mut count = 0;
        let mut capture = |_: &str, _: Option<&str>| -> Result<()> {
            count += 1;
            Ok(())
        };
        let mut chain = PluginChain::new(&plugins, None, &mut capture);
        chain.emit("@import url(a.css);".to_string()).unwrap();
        chain.emit(".a{color:red;}".to_string()).unwrap();
        drop(chain);

        assert_eq!(count, 1);
    }

    #[test]
    fn chain_hands_source_map_to_hook() {
        let mut seen = None;
        let mut capture = |_: &str, source_map: Option<&str>| -> Result<()> {
            seen = source_map.map(str::to_string);
            Ok(())
        };
        let mut chain = PluginChain::new(&[], Some("/*# map */"), &mut capture);
        chain.emit(".a{}".to_string()).unwrap();
        drop(chain);

        assert_eq!(seen.as_deref(), Some("/*# map */"));
    }
}
