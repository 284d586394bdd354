//! Cooperation engine: merge planning, atomic merge commits, group feature
//! de-duplication and spatial re-clustering of group members.
//!
//! Groups live in an arena ([`GroupRegistry`]) keyed by [`GroupId`]; each
//! creature only carries the id in its [`CoopState`]. Merges are planned
//! before movement and committed after it, so a weapon check never sees a
//! half-merged group.

use crate::grid::Grid;
use predators_data::{CoopState, Creature, DeathCause, Feature, GroupId, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use uuid::Uuid;

/// Shared record for every member of one cooperation group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub nucleus: Uuid,
    /// Nucleus first, then members in join order.
    pub members: Vec<Uuid>,
    /// Pooled hunger budget shared by the whole group.
    pub hunger: i64,
    pub formed_cycle: u64,
}

impl Group {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.members.contains(&id)
    }

    pub fn followers(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.members.iter().copied().filter(move |m| *m != self.nucleus)
    }
}

/// `hunger_cycles × member_count`.
pub fn pooled_hunger(hunger_cycles: u32, members: usize) -> i64 {
    i64::from(hunger_cycles) * members as i64
}

#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<GroupId, Group>,
    next_id: u64,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> GroupId {
        self.next_id += 1;
        GroupId(self.next_id)
    }

    pub fn insert(&mut self, group: Group) {
        self.groups.insert(group.id, group);
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn get_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(&id)
    }

    pub fn remove(&mut self, id: GroupId) -> Option<Group> {
        self.groups.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn ids(&self) -> Vec<GroupId> {
        self.groups.keys().copied().collect()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Every member id of the party `creature` leads (just itself if solitary).
    pub fn party_of(&self, creature: &Creature) -> Vec<Uuid> {
        creature
            .coop
            .group
            .and_then(|gid| self.get(gid))
            .map_or_else(|| vec![creature.id], |g| g.members.clone())
    }
}

/// A merge whose probability draw succeeded this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMerge {
    pub recruiter: Uuid,
    pub recruit: Uuid,
}

/// Merges planned for the current tick and which creatures they claim.
#[derive(Debug, Clone, Default)]
pub struct PendingMerges {
    pub events: Vec<PlannedMerge>,
    claims: HashMap<Uuid, usize>,
}

impl PendingMerges {
    pub fn is_claimed(&self, id: Uuid) -> bool {
        self.claims.contains_key(&id)
    }

    /// Both creatures belong to parties of the same planned merge.
    pub fn same_event(&self, a: Uuid, b: Uuid) -> bool {
        match (self.claims.get(&a), self.claims.get(&b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn push(&mut self, merge: PlannedMerge, claimed: impl IntoIterator<Item = Uuid>) {
        let event = self.events.len();
        self.events.push(merge);
        for id in claimed {
            self.claims.insert(id, event);
        }
    }
}

/// Solitary creatures and nuclei may start a merge; followers may not.
fn is_party(creature: &Creature) -> bool {
    creature.alive && !creature.coop.is_follower()
}

/// Eligibility ignoring the probability draw.
pub fn can_cooperate_with(a: &Creature, b: &Creature, recruit_radius: u32) -> bool {
    if a.id == b.id || !is_party(a) || !is_party(b) {
        return false;
    }
    if !(a.is_old || b.is_old) {
        return false;
    }
    if a.coop.group.is_some() && a.coop.group == b.coop.group {
        return false;
    }
    let radius = i32::try_from(recruit_radius).unwrap_or(i32::MAX);
    a.head().chebyshev(b.head()) <= radius
}

/// Plans this tick's merges. Two old parties always merge; otherwise the
/// draw succeeds with `coop_probability`. Each party joins at most one
/// merge per tick, and earlier creatures recruit later ones.
pub fn plan_merges<R: Rng>(
    creatures: &[Creature],
    groups: &GroupRegistry,
    coop_probability: f64,
    recruit_radius: u32,
    rng: &mut R,
) -> PendingMerges {
    let mut pending = PendingMerges::default();
    for (i, a) in creatures.iter().enumerate() {
        if !is_party(a) || pending.is_claimed(a.id) {
            continue;
        }
        for b in &creatures[i + 1..] {
            if pending.is_claimed(b.id) || !can_cooperate_with(a, b, recruit_radius) {
                continue;
            }
            let certain = a.is_old && b.is_old;
            let drawn = certain || (coop_probability > 0.0 && rng.gen::<f64>() < coop_probability);
            if !drawn {
                continue;
            }
            let claimed: Vec<Uuid> = groups
                .party_of(a)
                .into_iter()
                .chain(groups.party_of(b))
                .collect();
            pending.push(
                PlannedMerge {
                    recruiter: a.id,
                    recruit: b.id,
                },
                claimed,
            );
            break;
        }
    }
    pending
}

/// An applied merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRecord {
    pub group: GroupId,
    pub nucleus: Uuid,
    pub joined: Uuid,
    pub size: usize,
    pub features_stripped: usize,
    pub relocated_to: Option<Position>,
}

/// An existing nucleus is kept; otherwise the older party leads, the
/// recruiter winning ties.
fn choose_nucleus(creatures: &[Creature], recruiter: usize, recruit: usize) -> usize {
    let (a, b) = (&creatures[recruiter], &creatures[recruit]);
    if a.coop.is_nucleus {
        recruiter
    } else if b.coop.is_nucleus || b.age > a.age {
        recruit
    } else {
        recruiter
    }
}

/// Applies every planned merge whose parties are both still alive.
pub fn commit_merges(
    pending: &PendingMerges,
    creatures: &mut [Creature],
    groups: &mut GroupRegistry,
    index: &HashMap<Uuid, usize>,
    grid: &Grid,
    hunger_cycles: u32,
    cycle: u64,
) -> Vec<MergeRecord> {
    let mut records = Vec::new();
    for merge in &pending.events {
        let (Some(&ai), Some(&bi)) = (index.get(&merge.recruiter), index.get(&merge.recruit)) else {
            continue;
        };
        if !creatures[ai].alive || !creatures[bi].alive {
            continue;
        }

        let nucleus_idx = choose_nucleus(creatures, ai, bi);
        let other_idx = if nucleus_idx == ai { bi } else { ai };
        let nucleus_id = creatures[nucleus_idx].id;
        let joined_id = creatures[other_idx].id;
        let kept_gid = creatures[nucleus_idx].coop.group;
        let absorbed_gid = creatures[other_idx].coop.group;

        let kept = kept_gid.and_then(|g| groups.remove(g));
        let formed_cycle = kept.as_ref().map_or(cycle, |g| g.formed_cycle);
        let mut members = kept.map_or_else(|| vec![nucleus_id], |g| g.members);
        match absorbed_gid.and_then(|g| groups.remove(g)) {
            Some(absorbed) => members.extend(absorbed.members),
            None => members.push(joined_id),
        }
        members.retain(|m| index.get(m).is_some_and(|&j| creatures[j].alive));

        let gid = kept_gid.unwrap_or_else(|| groups.allocate());
        for m in &members {
            let j = index[m];
            creatures[j].coop = CoopState {
                group: Some(gid),
                leader: Some(nucleus_id),
                is_nucleus: *m == nucleus_id,
                last_coop_cycle: Some(cycle),
            };
        }

        let member_idxs: Vec<usize> = members.iter().map(|m| index[m]).collect();
        let features_stripped = dedupe_features(creatures, &member_idxs);
        // The non-nucleus party moves, so the fallback anchor is the
        // nucleus's head; that is the recruiter unless the recruit leads.
        let anchor = creatures[nucleus_idx].head();
        let relocated_to = if absorbed_gid.is_none() {
            relocate_recruit(creatures, other_idx, &member_idxs, anchor, grid)
        } else {
            None
        };

        tracing::debug!(
            group = gid.0,
            nucleus = %nucleus_id,
            joined = %joined_id,
            size = members.len(),
            "Cooperation merge"
        );
        records.push(MergeRecord {
            group: gid,
            nucleus: nucleus_id,
            joined: joined_id,
            size: members.len(),
            features_stripped,
            relocated_to,
        });
        groups.insert(Group {
            id: gid,
            nucleus: nucleus_id,
            hunger: pooled_hunger(hunger_cycles, members.len()),
            members,
            formed_cycle,
        });
    }
    records
}

/// Keeps at most one holder per feature across `member_idxs`; earlier
/// members (the nucleus first) keep theirs. Returns how many were stripped.
pub fn dedupe_features(creatures: &mut [Creature], member_idxs: &[usize]) -> usize {
    let mut stripped = 0;
    for feature in Feature::ALL {
        let mut owned = false;
        for &j in member_idxs {
            if !creatures[j].has_feature(feature) {
                continue;
            }
            if owned {
                creatures[j].revoke(feature);
                stripped += 1;
            } else {
                owned = true;
            }
        }
    }
    stripped
}

/// Features held by any member of `members` other than `except`.
pub fn features_held_elsewhere(
    creatures: &[Creature],
    member_idxs: &[usize],
    except: usize,
) -> Vec<Feature> {
    Feature::ALL
        .into_iter()
        .filter(|f| {
            member_idxs
                .iter()
                .any(|&j| j != except && creatures[j].alive && creatures[j].has_feature(*f))
        })
        .collect()
}

fn occupied_cells<F>(creatures: &[Creature], skip: F) -> HashSet<Position>
where
    F: Fn(usize) -> bool,
{
    creatures
        .iter()
        .enumerate()
        .filter(|(j, c)| c.alive && !skip(*j))
        .flat_map(|(_, c)| c.cells())
        .collect()
}

/// Breadth-first walk over in-bounds cells yielding unoccupied ones.
struct FreeCellSearch {
    queue: VecDeque<Position>,
    visited: HashSet<Position>,
}

impl FreeCellSearch {
    fn new(seed: Position) -> Self {
        Self {
            queue: VecDeque::from([seed]),
            visited: HashSet::from([seed]),
        }
    }

    fn next_free(&mut self, grid: &Grid, occupied: &HashSet<Position>) -> Option<Position> {
        while let Some(cell) = self.queue.pop_front() {
            for n in grid.neighbors(cell) {
                if self.visited.insert(n) {
                    self.queue.push_back(n);
                }
            }
            if grid.contains(cell) && !occupied.contains(&cell) {
                return Some(cell);
            }
        }
        None
    }
}

/// Moves the joining party (whichever side did not become nucleus) next to
/// its group's footprint, else next to `anchor`, else to the nearest free
/// cell anywhere.
pub fn relocate_recruit(
    creatures: &mut [Creature],
    recruit_idx: usize,
    member_idxs: &[usize],
    anchor: Position,
    grid: &Grid,
) -> Option<Position> {
    let occupied = occupied_cells(creatures, |j| j == recruit_idx);
    let footprint: Vec<Position> = member_idxs
        .iter()
        .filter(|&&j| j != recruit_idx)
        .flat_map(|&j| creatures[j].cells())
        .collect();

    let free = |p: &Position| !occupied.contains(p);
    let slot = footprint
        .iter()
        .flat_map(|p| grid.neighbors(*p))
        .find(free)
        .or_else(|| grid.neighbors(anchor).find(free))
        .or_else(|| FreeCellSearch::new(anchor).next_free(grid, &occupied))?;

    let recruit = &mut creatures[recruit_idx];
    recruit.move_to(slot);
    recruit.idle_counter = 0;
    Some(slot)
}

/// Re-clusters followers around the nucleus's current head in
/// breadth-first order, facing the nucleus's heading.
pub fn layout_members(
    creatures: &mut [Creature],
    nucleus_idx: usize,
    follower_idxs: &[usize],
    grid: &Grid,
) {
    let in_group: HashSet<usize> = follower_idxs
        .iter()
        .copied()
        .chain(std::iter::once(nucleus_idx))
        .collect();
    let mut occupied = occupied_cells(creatures, |j| in_group.contains(&j));
    occupied.extend(creatures[nucleus_idx].cells());

    let heading = creatures[nucleus_idx].direction;
    let mut search = FreeCellSearch::new(creatures[nucleus_idx].head());
    for &m in follower_idxs {
        if !creatures[m].alive {
            continue;
        }
        if let Some(cell) = search.next_free(grid, &occupied) {
            let member = &mut creatures[m];
            member.direction = heading;
            member.move_to(cell);
        }
        occupied.extend(creatures[m].cells());
    }
}

/// Removes dead members and collapses groups that lost their nucleus or
/// shrank to the nucleus alone. Returns creatures the caller must kill.
///
/// A member lost to a weapon or to idling only shrinks its group; a
/// starving member already took its whole group down in the tick.
pub fn settle_groups(
    creatures: &[Creature],
    groups: &mut GroupRegistry,
    index: &HashMap<Uuid, usize>,
    hunger_cycles: u32,
) -> Vec<(usize, DeathCause)> {
    let mut doomed = Vec::new();
    for gid in groups.ids() {
        let Some(group) = groups.get_mut(gid) else {
            continue;
        };
        let alive: Vec<Uuid> = group
            .members
            .iter()
            .copied()
            .filter(|m| index.get(m).is_some_and(|&j| creatures[j].alive))
            .collect();
        let nucleus_alive = alive.contains(&group.nucleus);

        if !nucleus_alive || alive.len() <= 1 {
            doomed.extend(alive.iter().map(|m| (index[m], DeathCause::GroupCollapse)));
            groups.remove(gid);
            continue;
        }
        if alive.len() != group.members.len() {
            group.hunger = pooled_hunger(hunger_cycles, alive.len());
            group.members = alive;
        }
    }
    doomed
}
