//! # World Configuration
//!
//! Sizing parameters fixed at world creation. Loaded once at startup,
//! either from code or from a TOML file:
//!
//! ```toml
//! initial_capacity = 256
//! dynamic_resize = false
//! max_components = 32
//! ```

use serde::Deserialize;

use crate::ecs::MAX_COMPONENTS;
use crate::error::{BagelError, BagelResult};

/// Configuration for a [`World`](crate::World).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Entity identities to pre-allocate.
    pub initial_capacity: u32,
    /// Double capacity when exhausted instead of failing.
    pub dynamic_resize: bool,
    /// Upper bound on distinct component types.
    pub max_components: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            dynamic_resize: true,
            max_components: MAX_COMPONENTS,
        }
    }
}

impl WorldConfig {
    /// A fixed-capacity configuration: creating entity `capacity + 1` fails.
    #[must_use]
    pub fn fixed(capacity: u32) -> Self {
        Self {
            initial_capacity: capacity,
            dynamic_resize: false,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on malformed TOML, unknown keys, or out-of-range values.
    pub fn from_toml_str(source: &str) -> BagelResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| BagelError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> BagelResult<()> {
        if self.initial_capacity == 0 {
            return Err(BagelError::InvalidConfig(
                "initial_capacity must be greater than zero".into(),
            ));
        }
        if self.max_components == 0 || self.max_components > MAX_COMPONENTS {
            return Err(BagelError::InvalidConfig(format!(
                "max_components must be in 1..={MAX_COMPONENTS}, got {}",
                self.max_components
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = WorldConfig::from_toml_str("dynamic_resize = false").unwrap();
        assert!(!config.dynamic_resize);
        assert_eq!(config.initial_capacity, 64);
        assert_eq!(config.max_components, MAX_COMPONENTS);
    }

    #[test]
    fn test_full_document() {
        let config = WorldConfig::from_toml_str(
            "initial_capacity = 256\ndynamic_resize = true\nmax_components = 32\n",
        )
        .unwrap();
        assert_eq!(
            config,
            WorldConfig {
                initial_capacity: 256,
                dynamic_resize: true,
                max_components: 32,
            }
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            WorldConfig::from_toml_str("initial_capacity = 0"),
            Err(BagelError::InvalidConfig(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("max_components = 65"),
            Err(BagelError::InvalidConfig(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("capacity = 10"),
            Err(BagelError::InvalidConfig(_))
        ));
    }
}
