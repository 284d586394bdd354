//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections mapping to a `config.toml` file. Every section
//! has hardcoded defaults; a TOML file overrides any subset of them.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! grid_size = 40
//! seed = 42
//!
//! [lifecycle]
//! hunger_cycles = 60
//! maturity_cycles = 120
//!
//! [social]
//! recruit_radius = 3
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest accepted grid edge.
pub const MAX_GRID_SIZE: u16 = 1000;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of the square grid.
    pub grid_size: u16,
    pub seed: Option<u64>,
    /// Seed from `seed` (or zero) even when no seed was given.
    pub deterministic: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 40,
            seed: None,
            deterministic: false,
        }
    }
}

/// Birth, hunger, ageing and reproduction timers, all in ticks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LifecycleConfig {
    pub incubate_cycles: u32,
    pub hunger_cycles: u32,
    pub maturity_cycles: u32,
    pub lay_egg_interval: u32,
    /// Consecutive motionless steps before a creature dies.
    pub idle_limit: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            incubate_cycles: 20,
            hunger_cycles: 40,
            maturity_cycles: 100,
            lay_egg_interval: 50,
            idle_limit: 20,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    pub turn_interval: u32,
    /// Manhattan radius within which food and eggs attract a head.
    pub food_attract_radius: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            turn_interval: 10,
            food_attract_radius: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Base rarity of feature growth, 0.0 (always grow) to 1.0.
    pub feature_rarity: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            feature_rarity: 0.3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SocialConfig {
    /// Chebyshev distance within which two heads may merge.
    pub recruit_radius: u32,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self { recruit_radius: 2 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub lifecycle: LifecycleConfig,
    pub movement: MovementConfig,
    pub evolution: EvolutionConfig,
    pub social: SocialConfig,
    /// Emit an info-level tick summary every this many ticks; 0 disables it.
    pub log_interval: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            lifecycle: LifecycleConfig::default(),
            movement: MovementConfig::default(),
            evolution: EvolutionConfig::default(),
            social: SocialConfig::default(),
            log_interval: 1000,
        }
    }
}

impl AppConfig {
    /// Validates all configuration parameters, reporting the first failure.
    ///
    /// # Validation Rules
    /// - Grid size must be in `1..=MAX_GRID_SIZE`
    /// - Every cycle count and interval must be positive
    /// - Both radii must be smaller than the grid size
    /// - Feature rarity must be in `[0.0, 1.0]`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid_size = self.world.grid_size;
        if grid_size == 0 || grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridSize {
                value: grid_size,
                max: MAX_GRID_SIZE,
            });
        }

        let positive = [
            ("incubate_cycles", self.lifecycle.incubate_cycles),
            ("hunger_cycles", self.lifecycle.hunger_cycles),
            ("maturity_cycles", self.lifecycle.maturity_cycles),
            ("lay_egg_interval", self.lifecycle.lay_egg_interval),
            ("idle_limit", self.lifecycle.idle_limit),
            ("turn_interval", self.movement.turn_interval),
            ("food_attract_radius", self.movement.food_attract_radius),
            ("recruit_radius", self.social.recruit_radius),
        ];
        if let Some(&(name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::NonPositive { name });
        }

        let radii = [
            ("food_attract_radius", self.movement.food_attract_radius),
            ("recruit_radius", self.social.recruit_radius),
        ];
        for (name, value) in radii {
            if value >= u32::from(grid_size) {
                return Err(ConfigError::RadiusTooLarge {
                    name,
                    value,
                    grid_size,
                });
            }
        }

        let rarity = self.evolution.feature_rarity;
        if !(0.0..=1.0).contains(&rarity) {
            return Err(ConfigError::OutOfUnitRange {
                name: "feature_rarity",
                value: rarity,
            });
        }

        Ok(())
    }

    /// Parses and validates a TOML document. Missing keys keep defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hex digest of every rule-affecting parameter. Seed and logging are
    /// excluded so runs under one rule set compare equal.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.world.grid_size.to_le_bytes());
        hasher.update(format!("{:?}", self.lifecycle).as_bytes());
        hasher.update(format!("{:?}", self.movement).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.social).as_bytes());
        hex::encode(hasher.finalize())
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        let size = usize::from(self.world.grid_size);
        size * size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_grid_rejected() {
        let config = AppConfig {
            world: WorldConfig {
                grid_size: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridSize { value: 0, .. })
        ));
    }

    #[test]
    fn test_radius_must_fit_grid() {
        let mut config = AppConfig::default();
        config.world.grid_size = 10;
        config.social.recruit_radius = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RadiusTooLarge {
                name: "recruit_radius",
                ..
            })
        ));

        config.social.recruit_radius = 2;
        config.movement.food_attract_radius = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cycle_rejected() {
        let mut config = AppConfig::default();
        config.lifecycle.hunger_cycles = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "hunger_cycles"
            })
        ));
    }

    #[test]
    fn test_rarity_range() {
        let mut config = AppConfig::default();
        config.evolution.feature_rarity = 1.5;
        assert!(config.validate().is_err());
        config.evolution.feature_rarity = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            grid_size = 12
            seed = 7

            [lifecycle]
            hunger_cycles = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.world.grid_size, 12);
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.lifecycle.hunger_cycles, 9);
        assert_eq!(config.lifecycle.incubate_cycles, 20);
    }

    #[test]
    fn test_from_toml_rejects_invalid() {
        assert!(AppConfig::from_toml("[world]\ngrid_size = 0\n").is_err());
        assert!(matches!(
            AppConfig::from_toml("[world\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_fingerprint_ignores_seed() {
        let a = AppConfig::default();
        let mut b = AppConfig::default();
        b.world.seed = Some(99);
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.social.recruit_radius = 3;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
