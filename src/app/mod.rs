//! Headless driver: loads configuration, seeds a world with random eggs and
//! food, and runs ticks until asked to stop or the population dies out.

use crate::model::config::AppConfig;
use crate::model::data::PopulationStats;
use crate::model::world::{TickReport, World};
use anyhow::{Context, Result};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Outcome of [`App::run`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub ticks_run: u64,
    pub extinct: bool,
    pub deaths: BTreeMap<String, u64>,
    pub stats: PopulationStats,
}

impl RunSummary {
    fn absorb(&mut self, report: &TickReport) {
        self.ticks_run += 1;
        for (_, cause) in &report.deaths {
            *self.deaths.entry(cause.label().to_string()).or_insert(0) += 1;
        }
    }
}

pub struct App {
    pub running: bool,
    pub world: World,
    pub config: AppConfig,
    pub config_path: Option<PathBuf>,
}

impl App {
    /// Reads `path` as TOML, or falls back to defaults when no path is given.
    pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
        let Some(path) = path else {
            return Ok(AppConfig::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = AppConfig::from_toml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Writes the default parameter set as TOML, for users to edit.
    pub fn write_default_config(path: &Path) -> Result<()> {
        let toml_str = toml::to_string(&AppConfig::default())
            .context("failed to encode default config")?;
        std::fs::write(path, toml_str)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn new(config: AppConfig) -> Result<Self> {
        let world = World::new(config.clone()).context("failed to create world")?;
        tracing::info!(
            grid_size = config.world.grid_size,
            fingerprint = %config.fingerprint(),
            "Simulation ready"
        );
        Ok(Self {
            running: true,
            world,
            config,
            config_path: None,
        })
    }

    pub fn from_path(path: Option<&Path>) -> Result<Self> {
        let config = Self::load_config(path)?;
        let mut app = Self::new(config)?;
        app.config_path = path.map(Path::to_path_buf);
        Ok(app)
    }

    /// Scatters up to `eggs` eggs and `food` food items at random cells.
    /// Returns how many of each were actually placed.
    pub fn seed_random(&mut self, eggs: usize, food: usize) -> (usize, usize) {
        let size = i32::from(self.world.grid.size());
        let mut placed = (0, 0);
        for _ in 0..eggs {
            let (x, y) = (self.world.rng.gen_range(0..size), self.world.rng.gen_range(0..size));
            if self.world.add_egg(x, y) {
                placed.0 += 1;
            }
        }
        for _ in 0..food {
            let (x, y) = (self.world.rng.gen_range(0..size), self.world.rng.gen_range(0..size));
            if self.world.add_food(x, y) {
                placed.1 += 1;
            }
        }
        tracing::debug!(eggs = placed.0, food = placed.1, "Seeded world");
        placed
    }

    /// Runs up to `ticks` ticks, stopping early once nothing is alive or
    /// incubating.
    pub fn run(&mut self, ticks: u64) -> RunSummary {
        let mut summary = RunSummary::default();
        while self.running && summary.ticks_run < ticks {
            let report = self.world.advance_tick();
            summary.absorb(&report);
            if self.world.population() == 0 && self.world.unhatched_egg_count() == 0 {
                summary.extinct = true;
                self.running = false;
                tracing::info!(cycle = self.world.cycle, "Population extinct");
            }
        }
        summary.stats = self.world.stats().clone();
        summary
    }

    /// Applies a new parameter set to the running world.
    pub fn reconfigure(&mut self, config: AppConfig) -> Result<()> {
        self.world
            .configure(config.clone())
            .context("rejected configuration")?;
        self.config = config;
        self.running = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.world.grid_size = 12;
        config.world.seed = Some(11);
        config.movement.food_attract_radius = 4;
        config.social.recruit_radius = 2;
        config.log_interval = 0;
        config
    }

    #[test]
    fn test_seed_random_stays_in_bounds() {
        let mut app = App::new(small_config()).unwrap();
        let (eggs, food) = app.seed_random(20, 30);
        assert_eq!(app.world.unhatched_egg_count(), eggs);
        assert_eq!(app.world.food_count(), food);
        assert!(eggs > 0 && food > 0);
    }

    #[test]
    fn test_empty_world_is_extinct_immediately() {
        let mut app = App::new(small_config()).unwrap();
        let summary = app.run(50);
        assert!(summary.extinct);
        assert_eq!(summary.ticks_run, 1);
        assert!(!app.running);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = App::load_config(Some(Path::new("/nonexistent/predators.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_reconfigure_rejects_invalid_grid() {
        let mut app = App::new(small_config()).unwrap();
        let mut bad = small_config();
        bad.world.grid_size = 0;
        assert!(app.reconfigure(bad).is_err());
        assert_eq!(app.world.grid.size(), 12);
    }
}
