//! Rule sinks and preprocessing for Horizon Lattice style generation.
//!
//! The style generator produces raw style bodies that may contain nested
//! selectors and at-rules. This crate turns those bodies into flat CSS rules
//! and delivers them somewhere useful:
//!
//! - **Preprocessor**: [`Preprocessor`] expands nesting into flat rules;
//!   [`NestingPreprocessor`] is the default implementation, built on `cssparser`
//! - **Plugins**: [`RulePlugin`]s rewrite or drop rules on their way out,
//!   collected into a [`PluginChain`] that always ends in the capturing hook
//! - **Sinks**: [`StyleSink`] receives each flattened rule; [`MemorySheet`]
//!   keeps them in memory in insertion order
//!
//! # Example
//!
//! ```
//! use horizon_lattice_stylesheet::{MemorySheet, NestingPreprocessor, PluginChain, Preprocessor, StyleSink};
//!
//! let mut sheet = MemorySheet::injected();
//! let preprocessor = NestingPreprocessor::new();
//!
//! let mut capture = |rule: &str, source_map: Option<&str>| sheet.insert(rule, source_map);
//! let mut chain = PluginChain::new(&[], None, &mut capture);
//! preprocessor
//!     .compile(".card", "color:red;&:hover{color:blue;}", &mut chain)
//!     .unwrap();
//!
//! assert_eq!(sheet.to_css(), ".card{color:red;}.card:hover{color:blue;}");
//! ```

mod error;
pub mod plugin;
pub mod preprocess;
pub mod sheet;

pub use error::{Error, Result};
pub use plugin::{PluginChain, RulePlugin};
pub use preprocess::{NestingPreprocessor, Preprocessor};
pub use sheet::{MemorySheet, SheetRule, StyleSink};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::plugin::{PluginChain, RulePlugin};
    pub use crate::preprocess::{NestingPreprocessor, Preprocessor};
    pub use crate::sheet::{MemorySheet, SheetRule, StyleSink};
}
