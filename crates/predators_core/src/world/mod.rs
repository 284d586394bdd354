//! The engine root: owns every live entity and runs one tick at a time.
//!
//! Callers only place eggs and food, reconfigure, advance ticks and read
//! the display grid or statistics back.

use crate::config::AppConfig;
use crate::error::{Result, SimError};
use crate::grid::{DisplayGrid, Grid};
use crate::metrics::Metrics;
use crate::systems::cooperation::{Group, GroupRegistry};
use crate::systems::stats;
use crate::targeting::TargetSet;
use predators_data::{Creature, DeathCause, Egg, PopulationStats, Position};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

pub mod finalize;
pub mod update;

pub use update::TickReport;

fn seeded_rng(config: &AppConfig) -> ChaCha8Rng {
    match config.world.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None if config.world.deterministic => ChaCha8Rng::seed_from_u64(0),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Serializable view of the live state at a tick boundary.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub cycle: u64,
    pub config_fingerprint: String,
    pub stats: PopulationStats,
    pub eggs: Vec<Egg>,
    pub creatures: Vec<Creature>,
    pub food: Vec<Position>,
    pub groups: Vec<Group>,
}

pub struct World {
    pub config: AppConfig,
    pub grid: Grid,
    pub cycle: u64,
    pub eggs: Vec<Egg>,
    pub creatures: Vec<Creature>,
    pub food: BTreeSet<Position>,
    pub groups: GroupRegistry,
    pub stats: PopulationStats,
    pub rng: ChaCha8Rng,
    pub metrics: Metrics,
    display: DisplayGrid,
    targets: TargetSet,
    id_index: HashMap<Uuid, usize>,
    abundance: f64,
    rarity: f64,
    coop_probability: f64,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("cycle", &self.cycle)
            .field("grid_size", &self.grid.size())
            .field("creatures", &self.creatures.len())
            .field("eggs", &self.eggs.len())
            .field("food", &self.food.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

impl World {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let size = config.world.grid_size;
        tracing::debug!(
            grid_size = size,
            fingerprint = %config.fingerprint(),
            "World created"
        );
        Ok(Self {
            grid: Grid::new(size),
            cycle: 0,
            eggs: Vec::new(),
            creatures: Vec::new(),
            food: BTreeSet::new(),
            groups: GroupRegistry::new(),
            stats: PopulationStats::default(),
            rng: seeded_rng(&config),
            metrics: Metrics::new(config.log_interval),
            display: DisplayGrid::new(size),
            targets: TargetSet::new(),
            id_index: HashMap::new(),
            abundance: 0.0,
            rarity: 0.0,
            coop_probability: 0.0,
            config,
        })
    }

    /// Applies new parameters. A different grid size clears all live state.
    pub fn configure(&mut self, config: AppConfig) -> Result<()> {
        config.validate()?;
        let resize = config.world.grid_size != self.config.world.grid_size;
        self.metrics.set_log_interval(config.log_interval);
        self.config = config;
        if resize {
            self.reset();
        }
        Ok(())
    }

    /// Clears every entity and the tick counter, and reseeds the generator.
    pub fn reset(&mut self) {
        let size = self.config.world.grid_size;
        self.grid = Grid::new(size);
        self.display = DisplayGrid::new(size);
        self.cycle = 0;
        self.eggs.clear();
        self.creatures.clear();
        self.food.clear();
        self.groups.clear();
        self.targets = TargetSet::new();
        self.id_index.clear();
        self.stats = PopulationStats::default();
        self.rng = seeded_rng(&self.config);
        self.abundance = 0.0;
        self.rarity = 0.0;
        self.coop_probability = 0.0;
    }

    /// Places an egg. Rejected outside the grid or where an unhatched egg
    /// already sits.
    pub fn add_egg(&mut self, x: i32, y: i32) -> bool {
        let pos = Position::new(x, y);
        if !self.grid.contains(pos) || self.eggs.iter().any(|e| !e.hatched && e.position == pos) {
            return false;
        }
        self.eggs
            .push(Egg::new(pos, self.config.lifecycle.incubate_cycles));
        self.refresh_display();
        true
    }

    /// Places food. Returns false outside the grid or for a duplicate.
    pub fn add_food(&mut self, x: i32, y: i32) -> bool {
        let pos = Position::new(x, y);
        if !self.grid.contains(pos) || !self.food.insert(pos) {
            return false;
        }
        self.refresh_display();
        true
    }

    /// Inserts a fully specified creature whose head lies inside the grid.
    pub fn spawn_creature(&mut self, creature: Creature) -> bool {
        if !self.grid.contains(creature.head()) || self.id_index.contains_key(&creature.id) {
            return false;
        }
        self.id_index.insert(creature.id, self.creatures.len());
        self.creatures.push(creature);
        self.refresh_display();
        true
    }

    pub fn snapshot_grid(&self) -> &DisplayGrid {
        &self.display
    }

    pub fn stats(&self) -> &PopulationStats {
        &self.stats
    }

    pub fn population(&self) -> usize {
        self.creatures.iter().filter(|c| c.alive).count()
    }

    pub fn unhatched_egg_count(&self) -> usize {
        self.eggs.iter().filter(|e| !e.hatched).count()
    }

    pub fn food_count(&self) -> usize {
        self.food.len()
    }

    pub fn abundance(&self) -> f64 {
        self.abundance
    }

    pub fn rarity(&self) -> f64 {
        self.rarity
    }

    pub fn coop_probability(&self) -> f64 {
        self.coop_probability
    }

    pub fn creature(&self, id: Uuid) -> Option<&Creature> {
        self.id_index.get(&id).map(|&idx| &self.creatures[idx])
    }

    pub fn group_of(&self, id: Uuid) -> Option<&Group> {
        self.creature(id)
            .and_then(|c| c.coop.group)
            .and_then(|gid| self.groups.get(gid))
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            cycle: self.cycle,
            config_fingerprint: self.config.fingerprint(),
            stats: self.stats.clone(),
            eggs: self.eggs.clone(),
            creatures: self.creatures.clone(),
            food: self.food.iter().copied().collect(),
            groups: self.groups.iter().cloned().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.snapshot()).map_err(SimError::from)
    }

    pub(crate) fn rebuild_index(&mut self) {
        self.id_index = self
            .creatures
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id, idx))
            .collect();
    }

    pub(crate) fn refresh_display(&mut self) {
        stats::paint_display(&mut self.display, &self.eggs, &self.food, &self.creatures);
    }

    /// Marks a creature dead; the body is turned into food at cleanup.
    pub(crate) fn kill(&mut self, idx: usize, cause: DeathCause, report: &mut TickReport) {
        let creature = &mut self.creatures[idx];
        if !creature.alive {
            return;
        }
        creature.alive = false;
        tracing::debug!(id = %creature.id, cause = ?cause, cycle = self.cycle, "Creature died");
        report.deaths.push((creature.id, cause));
    }
}
