//! Runtime style generation for Horizon Lattice.
//!
//! This crate compiles style values into scoped class names:
//!
//! - **Values**: [`Interpolation`] covers everything that can be interpolated
//!   into a style: text, numbers, nested [`StyleObject`]s, arrays, lazily
//!   evaluated functions and references to previously generated tokens
//! - **Identity**: assembled style text is hashed with [`hash_string`]; equal
//!   text always yields the same token
//! - **Dedup**: each distinct style body is preprocessed and handed to the
//!   sink at most once until the engine is flushed
//! - **Composition**: [`StyleEngine::cx`] and [`StyleEngine::merge`] collapse
//!   several generated classes into one rule
//!
//! Preprocessing and rule storage are provided by
//! [`horizon_lattice_stylesheet`], re-exported as [`stylesheet`].
//!
//! # Example
//!
//! ```
//! use horizon_lattice_stylegen::prelude::*;
//!
//! let mut engine = StyleEngine::new();
//!
//! let card = engine
//!     .css(StyleObject::from_iter([
//!         ("padding", Interpolation::from(8)),
//!         ("borderRadius", Interpolation::from(4)),
//!     ]))
//!     .unwrap();
//! let highlighted = engine.css("background:yellow;").unwrap();
//!
//! let class = engine
//!     .cx(&[card.into(), highlighted.into(), "external".into()])
//!     .unwrap();
//! assert!(class.starts_with("external css-"));
//!
//! // The composed class carries both bodies in order.
//! let composed = class.trim_start_matches("external ");
//! assert_eq!(
//!     engine.registered(composed),
//!     Some("padding:8px;border-radius:4px;background:yellow;")
//! );
//! ```

mod assemble;
mod compose;
mod config;
mod engine;
mod error;
mod hash;
mod insert;
pub mod logging;
mod registry;
pub mod resolve;
mod shared;
pub mod value;

pub use horizon_lattice_stylesheet as stylesheet;

pub use assemble::{AssembledStyles, StyleArgs, Template};
pub use compose::{classnames, SplitClassNames};
pub use config::EngineConfig;
pub use engine::StyleEngine;
pub use error::{Error, Result};
pub use hash::hash_string;
pub use insert::find_source_map;
pub use registry::{InsertedSet, Registration, Registry};
pub use shared::SharedEngine;
pub use value::{BindingContext, Interpolation, StyleFn, StyleMeta, StyleObject, StyleObjectBuilder, StyleToken};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::assemble::{StyleArgs, Template};
    pub use crate::compose::classnames;
    pub use crate::config::EngineConfig;
    pub use crate::engine::StyleEngine;
    pub use crate::shared::SharedEngine;
    pub use crate::value::{BindingContext, Interpolation, StyleMeta, StyleObject, StyleToken};
}
