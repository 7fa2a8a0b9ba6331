//! Tracing targets and span names for the style engine.
//!
//! The engine logs through the `tracing` crate. Nothing is printed unless the
//! application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_max_level(tracing::Level::DEBUG)
//!     .init();
//! ```

/// Span names used by the engine.
pub mod span_names {
    /// A `css` call.
    pub const CSS: &str = "horizon_lattice_stylegen::css";
    /// A `keyframes` call.
    pub const KEYFRAMES: &str = "horizon_lattice_stylegen::keyframes";
    /// An `inject_global` call.
    pub const INJECT_GLOBAL: &str = "horizon_lattice_stylegen::inject_global";
    /// A `font_face` call.
    pub const FONT_FACE: &str = "horizon_lattice_stylegen::font_face";
    /// A `merge` or `cx` call.
    pub const MERGE: &str = "horizon_lattice_stylegen::merge";
}

/// Target names for log filtering.
pub mod targets {
    /// Engine lifecycle and registration.
    pub const ENGINE: &str = "horizon_lattice_stylegen::engine";
    /// Interpolation resolution and the object cache.
    pub const RESOLVE: &str = "horizon_lattice_stylegen::resolve";
    /// Preprocessing and sink insertion.
    pub const INSERT: &str = "horizon_lattice_stylegen::insert";
    /// Class name composition.
    pub const COMPOSE: &str = "horizon_lattice_stylegen::compose";
}
