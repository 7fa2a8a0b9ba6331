//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for a [`StyleEngine`](crate::StyleEngine).
///
/// Every field has a default, so a TOML document only needs the keys it
/// changes:
///
/// ```
/// use horizon_lattice_stylegen::EngineConfig;
///
/// let config = EngineConfig::from_toml_str("class_prefix = \"ui\"").unwrap();
/// assert_eq!(config.class_prefix, "ui");
/// assert_eq!(config.keyframes_prefix, "animation");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix of generated class tokens (`css-1x2y3z`).
    pub class_prefix: String,

    /// Prefix of generated animation names (`animation-1x2y3z`).
    pub keyframes_prefix: String,

    /// Detect inline source-map comments and pass them to the sink.
    pub source_maps: bool,

    /// Maximum number of cached object serializations. 0 disables the cache.
    pub object_cache_capacity: usize,

    /// Maximum nesting depth of interpolations before resolution gives up.
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            class_prefix: "css".to_string(),
            keyframes_prefix: "animation".to_string(),
            source_maps: true,
            object_cache_capacity: 1024,
            max_depth: 64,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Set the class token prefix.
    pub fn class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the animation name prefix.
    pub fn keyframes_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.keyframes_prefix = prefix.into();
        self
    }

    /// Set whether source maps are detected.
    pub fn source_maps(mut self, enabled: bool) -> Self {
        self.source_maps = enabled;
        self
    }

    /// Set the object cache capacity.
    pub fn object_cache_capacity(mut self, capacity: usize) -> Self {
        self.object_cache_capacity = capacity;
        self
    }

    /// Set the maximum interpolation depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.class_prefix, "css");
        assert_eq!(config.keyframes_prefix, "animation");
        assert!(config.source_maps);
        assert_eq!(config.object_cache_capacity, 1024);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            source_maps = false
            max_depth = 8
            "#,
        )
        .unwrap();

        assert!(!config.source_maps);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.class_prefix, "css");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("max_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn builder_setters() {
        let config = EngineConfig::default()
            .class_prefix("ui")
            .keyframes_prefix("anim")
            .object_cache_capacity(0);
        assert_eq!(config.class_prefix, "ui");
        assert_eq!(config.keyframes_prefix, "anim");
        assert_eq!(config.object_cache_capacity, 0);
    }
}
