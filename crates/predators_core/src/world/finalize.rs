use crate::systems::stats;
use crate::world::{TickReport, World};
use predators_data::Egg;

impl World {
    /// Cleanup half of a tick: corpses become food, dead creatures and
    /// spent eggs leave the live set, laid eggs join it, then statistics
    /// and the display grid are rebuilt.
    pub(crate) fn finalize_tick(&mut self, laid: Vec<Egg>, report: &mut TickReport) {
        for corpse in self.creatures.iter().filter(|c| !c.alive) {
            self.food
                .extend(corpse.cells().filter(|cell| self.grid.contains(*cell)));
        }
        self.creatures.retain(|c| c.alive);
        self.eggs.retain(|e| !e.hatched);
        self.eggs.extend(laid);
        self.rebuild_index();

        self.stats.total_births += report.hatched.len() as u64;
        self.stats.total_deaths += report.deaths.len() as u64;
        self.stats.total_kills += report.kills as u64;
        self.stats.total_merges += report.merges.len() as u64;
        self.stats.total_eggs_laid += report.eggs_laid as u64;
        self.stats.abundance = self.abundance;
        self.stats.coop_probability = self.coop_probability;
        stats::update_population_stats(
            &mut self.stats,
            self.cycle,
            &self.creatures,
            &self.eggs,
            self.food.len(),
            self.groups.len(),
        );
        self.refresh_display();

        if !report.deaths.is_empty() || !report.merges.is_empty() {
            tracing::trace!(
                cycle = self.cycle,
                deaths = report.deaths.len(),
                merges = report.merges.len(),
                population = self.stats.population,
                "Tick finalized"
            );
        }
    }
}
