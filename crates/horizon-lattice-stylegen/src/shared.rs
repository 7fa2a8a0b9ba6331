//! Thread-safe engine handle.

use std::sync::Arc;

use horizon_lattice_stylesheet::{MemorySheet, RulePlugin, StyleSink};
use parking_lot::Mutex;

use crate::assemble::StyleArgs;
use crate::compose::SplitClassNames;
use crate::config::EngineConfig;
use crate::engine::StyleEngine;
use crate::error::Result;
use crate::value::{BindingContext, Interpolation, StyleToken};

/// A [`StyleEngine`] behind a mutex, cheap to clone and share between threads.
///
/// Every operation holds the lock for its whole duration, so the
/// check-then-insert sequence of a style-producing call is atomic and each
/// hash reaches the sink at most once no matter how many threads race.
///
/// ```
/// use horizon_lattice_stylegen::SharedEngine;
///
/// let engine = SharedEngine::new();
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let engine = engine.clone();
///         std::thread::spawn(move || engine.css("color:red;").unwrap())
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(engine.with(|e| e.sink().len()), 1);
/// ```
pub struct SharedEngine<S: StyleSink = MemorySheet> {
    inner: Arc<Mutex<StyleEngine<S>>>,
}

impl SharedEngine<MemorySheet> {
    /// Create a shared engine writing to an in-memory sheet.
    pub fn new() -> Self {
        Self::from_engine(StyleEngine::new())
    }

    /// Create a shared engine writing to an in-memory sheet with `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::from_engine(StyleEngine::with_config(config))
    }
}

impl Default for SharedEngine<MemorySheet> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StyleSink> Clone for SharedEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: StyleSink> SharedEngine<S> {
    /// Wrap an existing engine.
    pub fn from_engine(engine: StyleEngine<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut StyleEngine<S>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// See [`StyleEngine::css`].
    pub fn css(&self, args: impl Into<StyleArgs>) -> Result<StyleToken> {
        self.inner.lock().css(args)
    }

    /// See [`StyleEngine::css_with`].
    pub fn css_with(&self, context: &BindingContext, args: impl Into<StyleArgs>) -> Result<StyleToken> {
        self.inner.lock().css_with(context, args)
    }

    /// See [`StyleEngine::keyframes`].
    pub fn keyframes(&self, args: impl Into<StyleArgs>) -> Result<StyleToken> {
        self.inner.lock().keyframes(args)
    }

    /// See [`StyleEngine::inject_global`].
    pub fn inject_global(&self, args: impl Into<StyleArgs>) -> Result<()> {
        self.inner.lock().inject_global(args)
    }

    /// See [`StyleEngine::font_face`].
    pub fn font_face(&self, args: impl Into<StyleArgs>) -> Result<()> {
        self.inner.lock().font_face(args)
    }

    /// See [`StyleEngine::cx`].
    pub fn cx(&self, args: &[Interpolation]) -> Result<String> {
        self.inner.lock().cx(args)
    }

    /// See [`StyleEngine::merge`].
    pub fn merge(&self, class_names: &str) -> Result<String> {
        self.inner.lock().merge(class_names)
    }

    /// See [`StyleEngine::merge_with_source_map`].
    pub fn merge_with_source_map(&self, class_names: &str, source_map: Option<&str>) -> Result<String> {
        self.inner.lock().merge_with_source_map(class_names, source_map)
    }

    /// See [`StyleEngine::get_registered_styles`].
    pub fn get_registered_styles(&self, class_names: &str) -> SplitClassNames {
        self.inner.lock().get_registered_styles(class_names)
    }

    /// See [`StyleEngine::use_plugin`].
    pub fn use_plugin(&self, plugin: impl RulePlugin + 'static) {
        self.inner.lock().use_plugin(plugin);
    }

    /// See [`StyleEngine::hydrate`].
    pub fn hydrate<I, T>(&self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.inner.lock().hydrate(ids);
    }

    /// See [`StyleEngine::flush`].
    pub fn flush(&self) -> Result<()> {
        self.inner.lock().flush()
    }

    /// Styles registered under `token`.
    pub fn registered(&self, token: &str) -> Option<String> {
        self.inner.lock().registered(token).map(str::to_string)
    }

    /// See [`StyleEngine::registered_count`].
    pub fn registered_count(&self) -> usize {
        self.inner.lock().registered_count()
    }

    /// See [`StyleEngine::is_inserted`].
    pub fn is_inserted(&self, hash: &str) -> bool {
        self.inner.lock().is_inserted(hash)
    }

    /// See [`StyleEngine::inserted_ids`].
    pub fn inserted_ids(&self) -> Vec<String> {
        self.inner.lock().inserted_ids()
    }
}

impl<S: StyleSink + std::fmt::Debug> std::fmt::Debug for SharedEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEngine").field("inner", &self.inner).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_state() {
        let engine = SharedEngine::new();
        let other = engine.clone();

        let token = engine.css("color:red;").unwrap();
        assert_eq!(other.registered(token.as_str()).as_deref(), Some("color:red;"));
        assert!(other.is_inserted("tokvmb"));
    }

    #[test]
    fn concurrent_calls_insert_once() {
        let engine = SharedEngine::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = engine.clone();
                thread::spawn(move || {
                    let shared = engine.css("display:flex;").unwrap();
                    let own = engine.css(format!("order:{i};")).unwrap();
                    (shared, own)
                })
            })
            .collect();

        let tokens: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(tokens.iter().all(|(shared, _)| shared == &tokens[0].0));
        assert_eq!(engine.registered_count(), 9);
        assert_eq!(engine.with(|e| e.sink().len()), 9);
    }

    #[test]
    fn flush_through_handle() {
        let engine = SharedEngine::new();
        engine.css("color:red;").unwrap();
        engine.flush().unwrap();
        assert_eq!(engine.registered_count(), 0);
        assert!(engine.inserted_ids().is_empty());
    }
}
