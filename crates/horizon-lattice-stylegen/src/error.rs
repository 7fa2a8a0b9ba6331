//! Error types for the style engine.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating styles.
///
/// Style values themselves never fail; malformed input degrades to empty
/// text. Errors come from the collaborators the engine drives.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The preprocessor, a plugin, or the sink failed.
    #[error(transparent)]
    Sheet(#[from] horizon_lattice_stylesheet::Error),

    /// Engine configuration could not be parsed.
    #[error("Invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),
}
