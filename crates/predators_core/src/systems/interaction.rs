use crate::systems::cooperation::PendingMerges;
use predators_data::{Creature, Egg, Feature, Position};
use std::collections::BTreeSet;

/// A contact produced by one body's current position, applied by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionCommand {
    Kill {
        target_idx: usize,
        attacker_idx: usize,
    },
    EatEgg {
        egg_idx: usize,
        attacker_idx: usize,
    },
    EatFood {
        attacker_idx: usize,
        position: Position,
    },
}

/// Whether `attacker`'s weapon may kill `victim`.
///
/// Members of one group never harm each other, nor do the parties of a
/// merge planned for this tick. Two weapons on the same cell cancel out.
pub fn can_kill(attacker: &Creature, victim: &Creature, pending: &PendingMerges) -> bool {
    if attacker.id == victim.id || !victim.alive {
        return false;
    }
    if attacker.coop.group.is_some() && attacker.coop.group == victim.coop.group {
        return false;
    }
    if pending.same_event(attacker.id, victim.id) {
        return false;
    }
    let Some(weapon) = attacker.body.part(Feature::Weapon) else {
        return false;
    };
    if victim.body.part(Feature::Weapon) == Some(weapon) {
        return false;
    }
    victim.body.occupies(weapon)
}

/// Kills and meals caused by the body at `attacker_idx`, in that order.
pub fn contacts(
    attacker_idx: usize,
    creatures: &[Creature],
    eggs: &[Egg],
    food: &BTreeSet<Position>,
    pending: &PendingMerges,
) -> Vec<InteractionCommand> {
    let attacker = &creatures[attacker_idx];
    let mut commands = Vec::new();
    if !attacker.alive {
        return commands;
    }

    if attacker.has_feature(Feature::Weapon) {
        commands.extend(
            creatures
                .iter()
                .enumerate()
                .filter(|(_, victim)| can_kill(attacker, victim, pending))
                .map(|(target_idx, _)| InteractionCommand::Kill {
                    target_idx,
                    attacker_idx,
                }),
        );
    }

    let head = attacker.head();
    commands.extend(
        eggs.iter()
            .enumerate()
            .filter(|(_, egg)| !egg.hatched && egg.position == head)
            .map(|(egg_idx, _)| InteractionCommand::EatEgg {
                egg_idx,
                attacker_idx,
            }),
    );
    if food.contains(&head) {
        commands.push(InteractionCommand::EatFood {
            attacker_idx,
            position: head,
        });
    }
    commands
}
