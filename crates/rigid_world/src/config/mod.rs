//! Configuration system
//!
//! File-backed configuration in TOML or RON, selected by file extension,
//! plus the simulation settings a world driver needs between steps.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Load configuration from file, falling back to defaults when the file is missing
    fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        match Self::load_from_file(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at '{}', using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// How moving objects are arranged under the world root
///
/// The broad phase pairs dynamic objects against each other and against
/// static ones; this tells it where the individual dynamic objects live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DynamicLayout {
    /// Each moving object is its own dynamic child of the root
    #[default]
    TopLevel,
    /// Moving objects are grouped one level deeper, under dynamic root children
    Nested,
}

/// Simulation settings for a world driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Integration step in seconds used by `step_phys`
    pub step_size: f32,
    /// Where dynamic objects sit in the tree, for the broad phase
    pub dynamic_layout: DynamicLayout,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            step_size: 0.01,
            dynamic_layout: DynamicLayout::TopLevel,
        }
    }
}

impl WorldConfig {
    /// Set the integration step
    pub fn with_step_size(mut self, step_size: f32) -> Self {
        self.step_size = step_size;
        self
    }

    /// Set the dynamic object layout
    pub fn with_dynamic_layout(mut self, layout: DynamicLayout) -> Self {
        self.dynamic_layout = layout;
        self
    }
}

impl Config for WorldConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_config_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.step_size, 0.01);
        assert_eq!(config.dynamic_layout, DynamicLayout::TopLevel);
    }

    #[test]
    fn test_world_config_parses_partial_toml() {
        let config: WorldConfig = toml::from_str("dynamic_layout = \"Nested\"").unwrap();
        assert_eq!(config.dynamic_layout, DynamicLayout::Nested);
        assert_eq!(config.step_size, 0.01);
    }

    #[test]
    fn test_world_config_parses_ron() {
        let config: WorldConfig = ron::from_str("(step_size: 0.5)").unwrap();
        assert_eq!(config.step_size, 0.5);
        assert_eq!(config.dynamic_layout, DynamicLayout::TopLevel);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = WorldConfig::default().save_to_file("world.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
