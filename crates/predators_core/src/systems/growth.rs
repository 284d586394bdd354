//! Feature acquisition on eating and age-related feature loss.

use predators_data::{Creature, Feature};
use rand::seq::SliceRandom;
use rand::Rng;

const ABUNDANCE_WEIGHT: f64 = 0.8;
const ABUNDANCE_OFFSET: f64 = 0.2;
const LOSS_FLOOR: f64 = 0.05;
const LOSS_CEILING: f64 = 0.8;

/// Fraction of grid cells holding food or an unhatched egg.
pub fn abundance(food: usize, unhatched_eggs: usize, cell_count: usize) -> f64 {
    if cell_count == 0 {
        return 0.0;
    }
    (food + unhatched_eggs) as f64 / cell_count as f64
}

/// Growth is common when food is scarce and rare when it is plentiful.
pub fn rarity_factor(base_rarity: f64, abundance: f64) -> f64 {
    (base_rarity + abundance * ABUNDANCE_WEIGHT - ABUNDANCE_OFFSET).clamp(0.0, 1.0)
}

/// Scarcity-driven merge chance: zero once abundance reaches one half.
pub fn coop_probability(abundance: f64) -> f64 {
    (1.0 - 2.0 * abundance).max(0.0)
}

#[inline]
fn growth_roll<R: Rng>(rarity: f64, rng: &mut R) -> bool {
    rarity == 0.0 || rng.gen::<f64>() > rarity
}

/// Attempts to grow one absent feature after a meal.
///
/// `unavailable` lists features that may not be taken, such as those held
/// elsewhere in the creature's group.
pub fn try_grow<R: Rng>(
    creature: &mut Creature,
    rarity: f64,
    unavailable: &[Feature],
    rng: &mut R,
) -> Option<Feature> {
    let options: Vec<Feature> = Feature::ALL
        .into_iter()
        .filter(|f| !creature.has_feature(*f) && !unavailable.contains(f))
        .collect();
    if options.is_empty() || !growth_roll(rarity, rng) {
        return None;
    }
    let chosen = *options.choose(rng)?;
    creature.grant(chosen);
    Some(chosen)
}

/// Linear ramp from 0.05 at the onset of old age to 0.8 at
/// `2 × maturity_cycles` past it.
pub fn loss_probability(age: u64, old_since: u64, maturity_cycles: u32) -> f64 {
    let span = f64::from(maturity_cycles) * 2.0;
    if span <= 0.0 {
        return LOSS_CEILING;
    }
    let elapsed = age.saturating_sub(old_since) as f64;
    (LOSS_FLOOR + (LOSS_CEILING - LOSS_FLOOR) * elapsed / span).min(LOSS_CEILING)
}

pub fn try_lose<R: Rng>(creature: &mut Creature, maturity_cycles: u32, rng: &mut R) -> Option<Feature> {
    if !creature.is_old || creature.feature_count() == 0 {
        return None;
    }
    if let Some(last) = creature.last_feature_loss_age {
        if creature.age.saturating_sub(last) < u64::from(maturity_cycles) {
            return None;
        }
    }
    let old_since = creature.old_since_age.unwrap_or(creature.age);
    let p = loss_probability(creature.age, old_since, maturity_cycles);
    if rng.gen::<f64>() >= p {
        return None;
    }
    let held: Vec<Feature> = creature.body.features().collect();
    let lost = *held.choose(rng)?;
    creature.revoke(lost);
    creature.last_feature_loss_age = Some(creature.age);
    Some(lost)
}

/// One tick of ageing: age, the old-age transition, then a loss attempt.
pub fn age_one_tick<R: Rng>(
    creature: &mut Creature,
    maturity_cycles: u32,
    rng: &mut R,
) -> Option<Feature> {
    creature.age += 1;
    if !creature.is_old && creature.age >= u64::from(maturity_cycles) {
        creature.is_old = true;
        creature.old_since_age = Some(creature.age);
    }
    try_lose(creature, maturity_cycles, rng)
}
