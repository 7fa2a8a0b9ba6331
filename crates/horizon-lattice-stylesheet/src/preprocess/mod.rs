//! Style body preprocessing.

mod nesting;
mod selector;

pub use nesting::NestingPreprocessor;
pub use selector::{combine_selectors, split_selector_list};

use crate::{PluginChain, Result};

/// Expands a raw style body into flat CSS rules.
///
/// Implementations must push every rule they produce through
/// [`PluginChain::emit`], synchronously and in output order.
pub trait Preprocessor: Send + Sync {
    /// Compile `body` scoped under `selector`.
    ///
    /// An empty `selector` means the body is global: it holds complete rules
    /// or at-rules rather than bare declarations.
    fn compile(&self, selector: &str, body: &str, chain: &mut PluginChain<'_>) -> Result<()>;
}
