//! Insertion coordination: hash-gated preprocessing into the sink.

use std::fmt;
use std::sync::{Arc, LazyLock};

use horizon_lattice_stylesheet::{NestingPreprocessor, PluginChain, Preprocessor, RulePlugin, StyleSink};
use regex::Regex;

use crate::error::Result;
use crate::logging::targets;
use crate::registry::InsertedSet;

static SOURCE_MAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\*#\ssourceMappingURL=data:application/json;\S+\s+\*/")
        .expect("source map pattern is valid")
});

/// Find an inline source-map comment in `body`.
pub fn find_source_map(body: &str) -> Option<&str> {
    SOURCE_MAP.find(body).map(|m| m.as_str())
}

/// Hands style bodies to the preprocessor and forwards the flattened rules
/// to the sink, at most once per content hash.
pub(crate) struct Inserter {
    preprocessor: Box<dyn Preprocessor>,
    plugins: Vec<Arc<dyn RulePlugin>>,
    detect_source_maps: bool,
}

impl Inserter {
    pub(crate) fn new(detect_source_maps: bool) -> Self {
        Self {
            preprocessor: Box::new(NestingPreprocessor::new()),
            plugins: Vec::new(),
            detect_source_maps,
        }
    }

    pub(crate) fn set_preprocessor(&mut self, preprocessor: Box<dyn Preprocessor>) {
        self.preprocessor = preprocessor;
    }

    /// Register a plugin. It runs after the ones already registered and
    /// before the capturing hook.
    pub(crate) fn push_plugin(&mut self, plugin: Arc<dyn RulePlugin>) {
        self.plugins.push(plugin);
    }

    pub(crate) fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Preprocess `body` under `selector` unless `hash` was already inserted.
    ///
    /// Returns whether the preprocessor ran. The hash is marked only after
    /// every rule reached the sink; on error it stays unmarked so a later
    /// call retries the whole body.
    pub(crate) fn ensure_inserted<S: StyleSink>(
        &self,
        inserted: &mut InsertedSet,
        sink: &mut S,
        hash: &str,
        selector: &str,
        body: &str,
    ) -> Result<bool> {
        if inserted.contains(hash) {
            tracing::trace!(target: targets::INSERT, hash, "already inserted");
            return Ok(false);
        }

        let source_map = if self.detect_source_maps {
            find_source_map(body)
        } else {
            None
        };

        let mut delivered = 0usize;
        let mut capture = |rule: &str, source_map: Option<&str>| -> horizon_lattice_stylesheet::Result<()> {
            sink.insert(rule, source_map)?;
            delivered += 1;
            Ok(())
        };
        let mut chain = PluginChain::new(&self.plugins, source_map, &mut capture);

        if let Err(err) = self.preprocessor.compile(selector, body, &mut chain) {
            tracing::warn!(target: targets::INSERT, hash, error = %err, "insertion failed");
            return Err(err.into());
        }

        inserted.mark(hash);
        tracing::debug!(
            target: targets::INSERT,
            hash,
            selector,
            rules = delivered,
            source_map = source_map.is_some(),
            "inserted styles"
        );
        Ok(true)
    }
}

impl fmt::Debug for Inserter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inserter")
            .field("plugins", &self.plugins.len())
            .field("detect_source_maps", &self.detect_source_maps)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_lattice_stylesheet::MemorySheet;

    const MAP: &str = "/*# sourceMappingURL=data:application/json;charset=utf-8;base64,eyJ2 */";

    #[test]
    fn source_map_detection() {
        let body = format!("color:red;{MAP}");
        assert_eq!(find_source_map(&body), Some(MAP));
        assert_eq!(find_source_map("color:red;/* plain comment */"), None);
    }

    #[test]
    fn inserts_once_per_hash() {
        let inserter = Inserter::new(true);
        let mut inserted = InsertedSet::new();
        let mut sink = MemorySheet::injected();

        let first = inserter
            .ensure_inserted(&mut inserted, &mut sink, "abc", ".css-abc", "color:red;")
            .unwrap();
        let second = inserter
            .ensure_inserted(&mut inserted, &mut sink, "abc", ".css-abc", "color:red;")
            .unwrap();

        assert!(first);
        assert!(!second);
        assert_eq!(sink.to_css(), ".css-abc{color:red;}");
        assert!(inserted.contains("abc"));
    }

    #[test]
    fn source_map_reaches_the_sink() {
        let inserter = Inserter::new(true);
        let mut inserted = InsertedSet::new();
        let mut sink = MemorySheet::injected();
        let body = format!("color:red;{MAP}");

        inserter
            .ensure_inserted(&mut inserted, &mut sink, "abc", ".a", &body)
            .unwrap();

        let rule = &sink.rules()[0];
        assert_eq!(rule.text, ".a{color:red;}");
        assert_eq!(rule.source_map.as_deref(), Some(MAP));
    }

    #[test]
    fn source_maps_can_be_disabled() {
        let inserter = Inserter::new(false);
        let mut inserted = InsertedSet::new();
        let mut sink = MemorySheet::injected();
        let body = format!("color:red;{MAP}");

        inserter
            .ensure_inserted(&mut inserted, &mut sink, "abc", ".a", &body)
            .unwrap();
        assert_eq!(sink.rules()[0].source_map, None);
    }

    #[test]
    fn failed_insertion_leaves_hash_unmarked() {
        let inserter = Inserter::new(true);
        let mut inserted = InsertedSet::new();
        let mut sink = MemorySheet::new();

        let result = inserter.ensure_inserted(&mut inserted, &mut sink, "abc", ".a", "color:red;");
        assert!(result.is_err());
        assert!(!inserted.contains("abc"));
    }

    #[test]
    fn plugins_run_before_the_sink() {
        let mut inserter = Inserter::new(true);
        inserter.push_plugin(Arc::new(|rule: String| Some(rule.replace("red", "green"))));
        let mut inserted = InsertedSet::new();
        let mut sink = MemorySheet::injected();

        inserter
            .ensure_inserted(&mut inserted, &mut sink, "abc", ".a", "color:red;")
            .unwrap();
        assert_eq!(sink.to_css(), ".a{color:green;}");
        assert_eq!(inserter.plugin_count(), 1);
    }
}
