//! Directional stepping for a single body.
//!
//! A micro-step never touches other entities; contact resolution (kills,
//! meals) is left to the world so that every commit goes through one place.

use crate::config::AppConfig;
use crate::grid::Grid;
use crate::lifecycle::random_direction;
use crate::targeting::{steer, Steering, TargetSet};
use predators_data::{Creature, Direction, Egg, Position, MAX_BODY_CELLS};
use rand::Rng;

pub struct MoveContext<'a> {
    pub grid: &'a Grid,
    pub targets: &'a TargetSet,
    pub config: &'a AppConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub from: Position,
    pub to: Position,
    /// The idle counter reached the configured limit on this step.
    pub idle_expired: bool,
}

impl StepOutcome {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Advances `creature` by one cell, or leaves it in place when the next
/// cell lies outside the grid.
pub fn micro_step<R: Rng>(creature: &mut Creature, ctx: &MoveContext, rng: &mut R) -> StepOutcome {
    creature.steps_since_turn += 1;
    let from = creature.head();

    let mut steered = false;
    match steer(
        creature,
        ctx.targets,
        ctx.grid,
        ctx.config.movement.food_attract_radius,
    ) {
        Steering::Eye(dir) => {
            let next = from.step(dir);
            if ctx.grid.contains(next) {
                creature.set_direction(dir);
                creature.move_to(next);
                let idle_expired = track_idle(creature, from, ctx.config.lifecycle.idle_limit);
                return StepOutcome {
                    from,
                    to: next,
                    idle_expired,
                };
            }
        }
        Steering::Toward(target) => {
            if let Some(dir) = Direction::from_delta(target.x - from.x, target.y - from.y) {
                creature.set_direction(dir);
                steered = true;
            }
        }
        Steering::Wander => {}
    }

    if !steered && creature.steps_since_turn >= ctx.config.movement.turn_interval {
        let dir = random_direction(rng);
        creature.set_direction(dir);
        creature.steps_since_turn = 0;
    }

    let next = from.step(creature.direction);
    if ctx.grid.contains(next) {
        creature.move_to(next);
    }

    let idle_expired = track_idle(creature, from, ctx.config.lifecycle.idle_limit);
    StepOutcome {
        from,
        to: creature.head(),
        idle_expired,
    }
}

/// Resets the idle counter on movement, otherwise increments it. Returns
/// true once the counter reaches `idle_limit`.
pub fn track_idle(creature: &mut Creature, previous: Position, idle_limit: u32) -> bool {
    if creature.head() == previous {
        creature.idle_counter += 1;
    } else {
        creature.idle_counter = 0;
    }
    creature.idle_counter >= idle_limit
}

/// Guard only: the fixed feature slots keep bodies at or under the limit.
pub fn is_overgrown(creature: &Creature) -> bool {
    creature.cell_count() > MAX_BODY_CELLS
}

/// A complete creature lays at its head once `lay_egg_interval` ticks have
/// passed since its last egg.
pub fn try_lay_egg(creature: &mut Creature, cycle: u64, config: &AppConfig) -> Option<Egg> {
    if !creature.is_complete() {
        return None;
    }
    let interval = u64::from(config.lifecycle.lay_egg_interval);
    if cycle.saturating_sub(creature.last_lay_cycle) < interval {
        return None;
    }
    creature.last_lay_cycle = cycle;
    Some(Egg::new(creature.head(), config.lifecycle.incubate_cycles))
}
