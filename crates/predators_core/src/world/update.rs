use crate::lifecycle;
use crate::systems::cooperation::{self, MergeRecord, PendingMerges};
use crate::systems::growth;
use crate::systems::interaction::{self, InteractionCommand};
use crate::systems::movement::{self, MoveContext, StepOutcome};
use crate::targeting::TargetSet;
use crate::world::World;
use predators_data::{DeathCause, Egg, GroupId, Position};
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub cycle: u64,
    pub hatched: Vec<Uuid>,
    pub deaths: Vec<(Uuid, DeathCause)>,
    pub kills: usize,
    pub merges: Vec<MergeRecord>,
    pub eggs_laid: usize,
    pub meals: usize,
    pub features_grown: usize,
    pub features_lost: usize,
}

impl TickReport {
    pub fn deaths_by(&self, cause: DeathCause) -> usize {
        self.deaths.iter().filter(|(_, c)| *c == cause).count()
    }
}

/// How a live creature takes part in this tick's movement phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    Solitary,
    Group(GroupId),
}

impl World {
    /// Advances the simulation by exactly one tick.
    ///
    /// Order: egg observation and hatching, merge planning, movement with
    /// contact resolution, solitary hunger, merge commit, group settling,
    /// then cleanup, statistics and the display grid.
    pub fn advance_tick(&mut self) -> TickReport {
        let started = Instant::now();
        lifecycle::observe_eggs(&mut self.eggs, self.cycle);
        self.cycle += 1;
        let mut report = TickReport {
            cycle: self.cycle,
            ..TickReport::default()
        };

        self.refresh_scarcity();
        self.hatch(&mut report);
        self.targets = TargetSet::from_sources(
            self.food.iter().copied(),
            self.eggs.iter().filter(|e| !e.hatched).map(|e| e.position),
        );

        let pending = cooperation::plan_merges(
            &self.creatures,
            &self.groups,
            self.coop_probability,
            self.config.social.recruit_radius,
            &mut self.rng,
        );

        let mut laid = Vec::new();
        for idx in 0..self.creatures.len() {
            match self.step_kind(idx) {
                Some(StepKind::Solitary) => self.solitary_step(idx, &pending, &mut laid, &mut report),
                Some(StepKind::Group(gid)) => self.group_step(gid, &pending, &mut laid, &mut report),
                None => {}
            }
        }

        self.starve_solitary(&mut report);

        report.merges = cooperation::commit_merges(
            &pending,
            &mut self.creatures,
            &mut self.groups,
            &self.id_index,
            &self.grid,
            self.config.lifecycle.hunger_cycles,
            self.cycle,
        );
        let collapsed = cooperation::settle_groups(
            &self.creatures,
            &mut self.groups,
            &self.id_index,
            self.config.lifecycle.hunger_cycles,
        );
        for (idx, cause) in collapsed {
            self.kill(idx, cause, &mut report);
        }

        self.finalize_tick(laid, &mut report);
        self.metrics.record_tick(
            started.elapsed(),
            self.creatures.len(),
            self.food.len(),
            self.groups.len(),
        );
        self.count_events(&report);
        report
    }

    /// Folds this tick's events into the run-long named counters.
    fn count_events(&self, report: &TickReport) {
        let metrics = &self.metrics;
        metrics.increment_counter("hatched", report.hatched.len() as u64);
        metrics.increment_counter("kills", report.kills as u64);
        metrics.increment_counter("merges", report.merges.len() as u64);
        metrics.increment_counter("eggs_laid", report.eggs_laid as u64);
        metrics.increment_counter("meals", report.meals as u64);
        metrics.increment_counter("features_grown", report.features_grown as u64);
        metrics.increment_counter("features_lost", report.features_lost as u64);
        for (_, cause) in &report.deaths {
            metrics.increment_counter(&format!("deaths.{}", cause.label()), 1);
        }
    }

    fn refresh_scarcity(&mut self) {
        self.abundance = growth::abundance(
            self.food.len(),
            self.unhatched_egg_count(),
            self.grid.cell_count(),
        );
        self.rarity = growth::rarity_factor(self.config.evolution.feature_rarity, self.abundance);
        self.coop_probability = growth::coop_probability(self.abundance);
    }

    fn hatch(&mut self, report: &mut TickReport) {
        let hatchlings = lifecycle::hatch_eggs(
            &mut self.eggs,
            self.cycle,
            self.config.lifecycle.hunger_cycles,
            &mut self.rng,
        );
        if hatchlings.is_empty() {
            return;
        }
        for creature in &hatchlings {
            tracing::debug!(id = %creature.id, x = creature.head().x, y = creature.head().y, "Egg hatched");
            report.hatched.push(creature.id);
        }
        self.creatures.extend(hatchlings);
        self.rebuild_index();
    }

    fn step_kind(&self, idx: usize) -> Option<StepKind> {
        let creature = &self.creatures[idx];
        if !creature.alive || lifecycle::is_newborn(creature, self.cycle) {
            return None;
        }
        match creature.coop.group {
            None => Some(StepKind::Solitary),
            Some(gid) if creature.coop.is_nucleus => Some(StepKind::Group(gid)),
            Some(_) => None,
        }
    }

    fn move_once(&mut self, idx: usize) -> StepOutcome {
        let ctx = MoveContext {
            grid: &self.grid,
            targets: &self.targets,
            config: &self.config,
        };
        movement::micro_step(&mut self.creatures[idx], &ctx, &mut self.rng)
    }

    /// One micro-step followed by its idle, contact and overgrowth checks.
    /// Returns false once the creature is dead.
    fn step_and_resolve(&mut self, idx: usize, pending: &PendingMerges, report: &mut TickReport) -> bool {
        let outcome = self.move_once(idx);
        if outcome.idle_expired {
            self.kill(idx, DeathCause::Idle, report);
            return false;
        }
        self.check_body(idx, pending, report)
    }

    /// Contact resolution and overgrowth check at the creature's current cells.
    ///
    /// A `Body` holds at most three feature slots, so the overgrowth branch
    /// is a guard that no current growth path can trigger.
    fn check_body(&mut self, idx: usize, pending: &PendingMerges, report: &mut TickReport) -> bool {
        self.resolve_contacts(idx, pending, report);
        if !self.creatures[idx].alive {
            return false;
        }
        if movement::is_overgrown(&self.creatures[idx]) {
            self.kill(idx, DeathCause::Overgrowth, report);
            return false;
        }
        true
    }

    fn solitary_step(
        &mut self,
        idx: usize,
        pending: &PendingMerges,
        laid: &mut Vec<Egg>,
        report: &mut TickReport,
    ) {
        let speed = self.creatures[idx].speed();
        for _ in 0..speed {
            if !self.step_and_resolve(idx, pending, report) {
                return;
            }
        }
        self.age(idx, report);
        self.lay(idx, laid, report);
    }

    fn group_step(
        &mut self,
        gid: GroupId,
        pending: &PendingMerges,
        laid: &mut Vec<Egg>,
        report: &mut TickReport,
    ) {
        let Some(group) = self.groups.get(gid) else {
            return;
        };
        let Some(&nucleus_idx) = self.id_index.get(&group.nucleus) else {
            return;
        };
        let follower_idxs: Vec<usize> = group
            .followers()
            .filter_map(|m| self.id_index.get(&m).copied())
            .collect();

        let speed = self.creatures[nucleus_idx].speed();
        for _ in 0..speed {
            if !self.step_and_resolve(nucleus_idx, pending, report) {
                break;
            }
        }

        if self.creatures[nucleus_idx].alive {
            let previous: Vec<Position> = follower_idxs
                .iter()
                .map(|&m| self.creatures[m].head())
                .collect();
            cooperation::layout_members(&mut self.creatures, nucleus_idx, &follower_idxs, &self.grid);
            let idle_limit = self.config.lifecycle.idle_limit;
            for (&m, prev) in follower_idxs.iter().zip(previous) {
                if !self.creatures[m].alive {
                    continue;
                }
                if movement::track_idle(&mut self.creatures[m], prev, idle_limit) {
                    self.kill(m, DeathCause::Idle, report);
                    continue;
                }
                self.check_body(m, pending, report);
            }
        }

        // One starving member takes the whole group down; weapon deaths only
        // shrink it later in `settle_groups`.
        let mut member_starved = false;
        let members = std::iter::once(nucleus_idx).chain(follower_idxs.iter().copied());
        for m in members {
            if !self.creatures[m].alive {
                continue;
            }
            self.creatures[m].hunger -= 1;
            self.age(m, report);
            member_starved |= self.creatures[m].hunger <= 0;
        }

        let pooled_empty = self.groups.get_mut(gid).is_some_and(|group| {
            group.hunger -= 1;
            group.hunger <= 0
        });
        if pooled_empty || member_starved {
            tracing::debug!(group = gid.0, cycle = self.cycle, member_starved, "Group starved");
            for m in std::iter::once(nucleus_idx).chain(follower_idxs.iter().copied()) {
                self.kill(m, DeathCause::GroupStarvation, report);
            }
        }

        if self.creatures[nucleus_idx].alive {
            self.lay(nucleus_idx, laid, report);
        }
    }

    fn resolve_contacts(&mut self, idx: usize, pending: &PendingMerges, report: &mut TickReport) {
        let commands = interaction::contacts(idx, &self.creatures, &self.eggs, &self.food, pending);
        for command in commands {
            match command {
                InteractionCommand::Kill {
                    target_idx,
                    attacker_idx,
                } => {
                    if !self.creatures[target_idx].alive {
                        continue;
                    }
                    tracing::debug!(
                        attacker = %self.creatures[attacker_idx].id,
                        victim = %self.creatures[target_idx].id,
                        "Weapon kill"
                    );
                    report.kills += 1;
                    self.kill(target_idx, DeathCause::Killed, report);
                }
                InteractionCommand::EatEgg {
                    egg_idx,
                    attacker_idx,
                } => {
                    let egg = &mut self.eggs[egg_idx];
                    if egg.hatched {
                        continue;
                    }
                    egg.hatched = true;
                    let position = egg.position;
                    self.targets.remove(position);
                    self.eat(attacker_idx, report);
                }
                InteractionCommand::EatFood {
                    attacker_idx,
                    position,
                } => {
                    if self.food.remove(&position) {
                        self.targets.remove(position);
                        self.eat(attacker_idx, report);
                    }
                }
            }
        }
    }

    /// A meal: refill hunger (for every member of a group) and try to grow.
    fn eat(&mut self, idx: usize, report: &mut TickReport) {
        report.meals += 1;
        let hunger_cycles = self.config.lifecycle.hunger_cycles;
        let member_idxs: Vec<usize> = self.creatures[idx]
            .coop
            .group
            .and_then(|gid| self.groups.get(gid))
            .map(|g| {
                g.members
                    .iter()
                    .filter_map(|m| self.id_index.get(m).copied())
                    .collect()
            })
            .unwrap_or_default();

        let unavailable = if member_idxs.is_empty() {
            lifecycle::feed(&mut self.creatures[idx], hunger_cycles);
            Vec::new()
        } else {
            for &m in &member_idxs {
                if self.creatures[m].alive {
                    lifecycle::feed(&mut self.creatures[m], hunger_cycles);
                }
            }
            cooperation::features_held_elsewhere(&self.creatures, &member_idxs, idx)
        };

        if let Some(feature) =
            growth::try_grow(&mut self.creatures[idx], self.rarity, &unavailable, &mut self.rng)
        {
            tracing::debug!(id = %self.creatures[idx].id, feature = ?feature, "Feature grown");
            report.features_grown += 1;
        }
    }

    fn age(&mut self, idx: usize, report: &mut TickReport) {
        let maturity = self.config.lifecycle.maturity_cycles;
        if let Some(feature) = growth::age_one_tick(&mut self.creatures[idx], maturity, &mut self.rng) {
            tracing::debug!(id = %self.creatures[idx].id, feature = ?feature, "Feature lost");
            report.features_lost += 1;
        }
    }

    fn lay(&mut self, idx: usize, laid: &mut Vec<Egg>, report: &mut TickReport) {
        if let Some(egg) = movement::try_lay_egg(&mut self.creatures[idx], self.cycle, &self.config) {
            tracing::debug!(
                id = %self.creatures[idx].id,
                x = egg.position.x,
                y = egg.position.y,
                "Egg laid"
            );
            report.eggs_laid += 1;
            laid.push(egg);
        }
    }

    /// Individual hunger for creatures outside any group.
    fn starve_solitary(&mut self, report: &mut TickReport) {
        for idx in 0..self.creatures.len() {
            let creature = &self.creatures[idx];
            if !creature.alive
                || creature.coop.group.is_some()
                || lifecycle::is_newborn(creature, self.cycle)
            {
                continue;
            }
            self.creatures[idx].hunger -= 1;
            if self.creatures[idx].hunger <= 0 {
                self.kill(idx, DeathCause::Starvation, report);
            }
        }
    }
}
