//! The style engine.
//!
//! [`StyleEngine`] owns all engine state: the registry of generated tokens,
//! the set of inserted hashes, the object serialization cache and the sink.
//! Independent engines never observe each other.
//!
//! A style-producing call runs through four steps:
//!
//! 1. assemble the arguments into style text (resolving interpolations)
//! 2. hash the text and register it under a token
//! 3. if the hash has not been inserted, preprocess the text and forward
//!    each flattened rule to the sink
//! 4. return the token
//!
//! # Example
//!
//! ```
//! use horizon_lattice_stylegen::{StyleEngine, StyleObject, Template};
//!
//! let mut engine = StyleEngine::new();
//!
//! let base = engine.css(StyleObject::from_iter([("color", "blue"), ("fontSize", "12px")])).unwrap();
//! let button = engine
//!     .css(Template::new("").interp(&base).text("&:hover{color:red;}"))
//!     .unwrap();
//!
//! assert_eq!(engine.registered(button.as_str()), Some("color:blue;font-size:12px;&:hover{color:red;}"));
//! assert!(engine.sink().to_css().contains(&format!(".{button}:hover{{color:red;}}")));
//! ```

use std::sync::Arc;

use horizon_lattice_stylesheet::{MemorySheet, Preprocessor, RulePlugin, StyleSink};

use crate::assemble::{assemble, AssembledStyles, StyleArgs};
use crate::compose::{classnames, split_registered, SplitClassNames};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::hash::hash_string;
use crate::insert::Inserter;
use crate::logging::{span_names, targets};
use crate::registry::{make_token, InsertedSet, Registration, Registry};
use crate::resolve::{ObjectCache, PropertyNames, Resolver};
use crate::value::{BindingContext, Interpolation, StyleToken};

/// Compiles style values into class names and delivers their rules to a sink.
pub struct StyleEngine<S: StyleSink = MemorySheet> {
    config: EngineConfig,
    sink: S,
    registry: Registry,
    inserted: InsertedSet,
    cache: ObjectCache,
    names: PropertyNames,
    inserter: Inserter,
}

impl StyleEngine<MemorySheet> {
    /// Create an engine writing to an in-memory sheet.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine writing to an in-memory sheet with `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::from_parts(MemorySheet::injected(), config)
    }
}

impl Default for StyleEngine<MemorySheet> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StyleSink> StyleEngine<S> {
    /// Create an engine writing to `sink`.
    ///
    /// The sink is injected here and must not have been injected before.
    pub fn with_sink(mut sink: S, config: EngineConfig) -> Result<Self> {
        sink.inject()?;
        Ok(Self::from_parts(sink, config))
    }

    fn from_parts(sink: S, config: EngineConfig) -> Self {
        tracing::debug!(target: targets::ENGINE, ?config, "creating style engine");
        Self {
            cache: ObjectCache::with_capacity(config.object_cache_capacity),
            inserter: Inserter::new(config.source_maps),
            registry: Registry::new(),
            inserted: InsertedSet::new(),
            names: PropertyNames::new(),
            sink,
            config,
        }
    }

    /// Replace the preprocessor.
    pub fn with_preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.inserter.set_preprocessor(Box::new(preprocessor));
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The sink rules are delivered to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Register a rule plugin.
    ///
    /// Plugins run in registration order on every flattened rule, before the
    /// rule is handed to the sink.
    pub fn use_plugin(&mut self, plugin: impl RulePlugin + 'static) {
        self.inserter.push_plugin(Arc::new(plugin));
        tracing::debug!(
            target: targets::ENGINE,
            plugins = self.inserter.plugin_count(),
            "registered rule plugin"
        );
    }

    /// Number of registered rule plugins.
    pub fn plugin_count(&self) -> usize {
        self.inserter.plugin_count()
    }

    /// Assemble `args` into style text without registering or inserting it.
    pub fn assemble(&mut self, args: impl Into<StyleArgs>) -> AssembledStyles {
        self.assemble_with(None, &args.into())
    }

    /// Resolve a single value to style text.
    pub fn resolve(&mut self, value: &Interpolation) -> String {
        let mut resolver = Resolver::new(
            &self.registry,
            &mut self.cache,
            &mut self.names,
            None,
            self.config.max_depth,
        );
        resolver.resolve(value, false)
    }

    fn assemble_with(&mut self, context: Option<&BindingContext>, args: &StyleArgs) -> AssembledStyles {
        let mut resolver = Resolver::new(
            &self.registry,
            &mut self.cache,
            &mut self.names,
            context,
            self.config.max_depth,
        );
        assemble(&mut resolver, args)
    }

    /// Generate a scoped class for `args`.
    ///
    /// The styles are registered under the returned token before insertion
    /// is attempted. If the sink fails, the token stays registered, the hash
    /// stays uninserted, and the next call with the same styles retries.
    pub fn css(&mut self, args: impl Into<StyleArgs>) -> Result<StyleToken> {
        self.css_inner(None, args.into())
    }

    /// Like [`css`](Self::css), with a binding context for function values.
    pub fn css_with(&mut self, context: &BindingContext, args: impl Into<StyleArgs>) -> Result<StyleToken> {
        self.css_inner(Some(context), args.into())
    }

    fn css_inner(&mut self, context: Option<&BindingContext>, args: StyleArgs) -> Result<StyleToken> {
        let _span = tracing::debug_span!(target: targets::ENGINE, span_names::CSS).entered();

        let assembled = self.assemble_with(context, &args);
        let Registration { hash, token } =
            self.registry
                .register(&self.config.class_prefix, &assembled.styles, &assembled.meta);

        let selector = format!(".{token}");
        self.inserter.ensure_inserted(
            &mut self.inserted,
            &mut self.sink,
            &hash,
            &selector,
            &assembled.styles,
        )?;
        Ok(token)
    }

    /// Generate an animation name for the keyframe steps in `args`.
    pub fn keyframes(&mut self, args: impl Into<StyleArgs>) -> Result<StyleToken> {
        let _span = tracing::debug_span!(target: targets::ENGINE, span_names::KEYFRAMES).entered();

        let assembled = self.assemble_with(None, &args.into());
        let hash = hash_string(&assembled.styles);
        let name = make_token(&self.config.keyframes_prefix, &hash, &assembled.meta);

        let body = format!("@keyframes {name}{{{}}}", assembled.styles);
        self.inserter
            .ensure_inserted(&mut self.inserted, &mut self.sink, &hash, "", &body)?;
        Ok(name)
    }

    /// Insert global rules.
    pub fn inject_global(&mut self, args: impl Into<StyleArgs>) -> Result<()> {
        let _span = tracing::debug_span!(target: targets::ENGINE, span_names::INJECT_GLOBAL).entered();

        let assembled = self.assemble_with(None, &args.into());
        let hash = hash_string(&assembled.styles);
        self.inserter.ensure_inserted(
            &mut self.inserted,
            &mut self.sink,
            &hash,
            "",
            &assembled.styles,
        )?;
        Ok(())
    }

    /// Insert a `@font-face` rule with the descriptors in `args`.
    pub fn font_face(&mut self, args: impl Into<StyleArgs>) -> Result<()> {
        let _span = tracing::debug_span!(target: targets::ENGINE, span_names::FONT_FACE).entered();

        let assembled = self.assemble_with(None, &args.into());
        let hash = hash_string(&assembled.styles);
        let body = format!("@font-face{{{}}}", assembled.styles);
        self.inserter
            .ensure_inserted(&mut self.inserted, &mut self.sink, &hash, "", &body)?;
        Ok(())
    }

    /// Split a class list into registered tokens and raw class names.
    pub fn get_registered_styles(&self, class_names: &str) -> SplitClassNames {
        split_registered(&self.registry, class_names)
    }

    /// Collapse the registered tokens in `class_names` into a single token.
    ///
    /// With fewer than two registered tokens the input is returned unchanged.
    /// Otherwise the result is the raw class names followed by one new token
    /// whose styles are the registered styles in order.
    pub fn merge(&mut self, class_names: &str) -> Result<String> {
        self.merge_with_source_map(class_names, None)
    }

    /// Like [`merge`](Self::merge), appending `source_map` to the composed styles.
    pub fn merge_with_source_map(&mut self, class_names: &str, source_map: Option<&str>) -> Result<String> {
        let _span = tracing::debug_span!(target: targets::ENGINE, span_names::MERGE).entered();

        let split = self.get_registered_styles(class_names);
        if split.registered.len() < 2 {
            tracing::trace!(
                target: targets::COMPOSE,
                registered = split.registered.len(),
                "nothing to compose"
            );
            return Ok(class_names.to_string());
        }

        tracing::debug!(
            target: targets::COMPOSE,
            tokens = split.registered.len(),
            "composing registered styles"
        );
        let tokens = split.registered.into_iter().map(Interpolation::Token).collect();
        let args = StyleArgs::Value {
            value: Interpolation::Array(tokens),
            rest: source_map.map(Interpolation::from).into_iter().collect(),
        };
        let token = self.css_inner(None, args)?;
        Ok(format!("{}{token}", split.raw))
    }

    /// Flatten `args` into a class list and merge it.
    pub fn cx(&mut self, args: &[Interpolation]) -> Result<String> {
        let class_names = classnames(args);
        self.merge(&class_names)
    }

    /// Mark `ids` as already inserted.
    ///
    /// Used on the client with the hashes of rules that were rendered on the
    /// server, so they are not inserted a second time.
    pub fn hydrate<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut count = 0usize;
        for id in ids {
            if self.inserted.mark(id) {
                count += 1;
            }
        }
        tracing::debug!(target: targets::ENGINE, count, "hydrated inserted ids");
    }

    /// Reset all engine state and recreate the sink's storage.
    pub fn flush(&mut self) -> Result<()> {
        tracing::debug!(
            target: targets::ENGINE,
            registered = self.registry.len(),
            inserted = self.inserted.len(),
            "flushing style engine"
        );
        self.sink.flush();
        self.inserted.clear();
        self.registry.clear();
        self.cache.clear();
        self.sink.inject()?;
        Ok(())
    }

    /// Styles registered under `token`.
    pub fn registered(&self, token: &str) -> Option<&str> {
        self.registry.get(token)
    }

    /// The token registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of registered tokens.
    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    /// Whether the styles with `hash` have been inserted or hydrated.
    pub fn is_inserted(&self, hash: &str) -> bool {
        self.inserted.contains(hash)
    }

    /// Inserted hashes, sorted, for embedding into server-rendered output.
    pub fn inserted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inserted.iter().map(str::to_string).collect();
        ids.sort_unstable();
        ids
    }
}

impl<S: StyleSink + std::fmt::Debug> std::fmt::Debug for StyleEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleEngine")
            .field("config", &self.config)
            .field("sink", &self.sink)
            .field("registered", &self.registry.len())
            .field("inserted", &self.inserted.len())
            .field("cached_objects", &self.cache.len())
            .field("property_names", &self.names.len())
            .field("inserter", &self.inserter)
            .finish()
    }
}
