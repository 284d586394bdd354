use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A creature that grows past this many occupied cells dies of overgrowth.
pub const MAX_BODY_CELLS: usize = 4;
/// Weapon, leg and eye.
pub const MAX_FEATURES: usize = 3;

/// Integer grid coordinate. Ordering is by `x`, then `y`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    #[inline]
    pub fn manhattan(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    #[inline]
    pub fn chebyshev(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// The 8-connected neighbourhood, in `Direction::ALL` order.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        Direction::ALL.into_iter().map(move |d| self.step(d))
    }
}

/// One of the eight compass headings. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Heading matching the signs of `(dx, dy)`; `None` for the zero vector.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        let sig = (dx.signum(), dy.signum());
        Self::ALL.into_iter().find(|d| d.delta() == sig)
    }

    pub fn opposite(self) -> Self {
        let (dx, dy) = self.delta();
        Self::from_delta(-dx, -dy).unwrap_or(self)
    }

    /// Quarter turn clockwise on screen: `(dx, dy) -> (-dy, dx)`.
    pub fn perpendicular(self) -> Self {
        let (dx, dy) = self.delta();
        Self::from_delta(-dy, dx).unwrap_or(self)
    }
}

/// Body add-ons a creature may grow. Each occupies exactly one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    /// Kills whatever it touches. Sits one cell ahead of the head.
    Weapon,
    /// Doubles speed. Sits one cell behind the head.
    Leg,
    /// Looks along a ray for food. Sits one cell to the side.
    Eye,
}

impl Feature {
    pub const ALL: [Feature; MAX_FEATURES] = [Feature::Weapon, Feature::Leg, Feature::Eye];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Feature::Weapon => 0,
            Feature::Leg => 1,
            Feature::Eye => 2,
        }
    }

    /// Cell this feature occupies for a head at `head` facing `dir`.
    pub fn anchor(self, head: Position, dir: Direction) -> Position {
        match self {
            Feature::Weapon => head.step(dir),
            Feature::Leg => head.step(dir.opposite()),
            Feature::Eye => head.step(dir.perpendicular()),
        }
    }
}

/// Occupied cells of a creature: the neutral head plus one slot per feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub neutral: Position,
    pub parts: [Option<Position>; MAX_FEATURES],
}

impl Body {
    pub fn new(neutral: Position) -> Self {
        Self {
            neutral,
            parts: [None; MAX_FEATURES],
        }
    }

    #[inline]
    pub fn has(&self, feature: Feature) -> bool {
        self.parts[feature.index()].is_some()
    }

    #[inline]
    pub fn part(&self, feature: Feature) -> Option<Position> {
        self.parts[feature.index()]
    }

    pub fn features(&self) -> impl Iterator<Item = Feature> {
        let parts = self.parts;
        Feature::ALL
            .into_iter()
            .filter(move |f| parts[f.index()].is_some())
    }

    pub fn feature_count(&self) -> usize {
        self.parts.iter().filter(|p| p.is_some()).count()
    }

    pub fn cell_count(&self) -> usize {
        1 + self.feature_count()
    }

    /// Neutral cell first, then weapon, leg, eye.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let neutral = self.neutral;
        let parts = self.parts;
        std::iter::once(neutral).chain(parts.into_iter().flatten())
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.cells().any(|c| c == pos)
    }

    pub fn grant(&mut self, feature: Feature, dir: Direction) {
        self.parts[feature.index()] = Some(feature.anchor(self.neutral, dir));
    }

    pub fn revoke(&mut self, feature: Feature) {
        self.parts[feature.index()] = None;
    }

    /// Recomputes every attached part relative to the current head.
    pub fn realign(&mut self, dir: Direction) {
        for feature in Feature::ALL {
            if self.has(feature) {
                self.grant(feature, dir);
            }
        }
    }

    pub fn move_to(&mut self, neutral: Position, dir: Direction) {
        self.neutral = neutral;
        self.realign(dir);
    }
}

/// Key into the world's group arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GroupId(pub u64);

/// Cooperation membership as seen from one creature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoopState {
    pub group: Option<GroupId>,
    pub leader: Option<Uuid>,
    pub is_nucleus: bool,
    pub last_coop_cycle: Option<u64>,
}

impl CoopState {
    pub fn is_solitary(&self) -> bool {
        self.group.is_none()
    }

    /// Members that are not the nucleus never drive movement.
    pub fn is_follower(&self) -> bool {
        self.group.is_some() && !self.is_nucleus
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Egg {
    pub position: Position,
    pub incubate_cycles: u32,
    pub born_cycle: Option<u64>,
    pub hatched: bool,
}

impl Egg {
    pub fn new(position: Position, incubate_cycles: u32) -> Self {
        Self {
            position,
            incubate_cycles,
            born_cycle: None,
            hatched: false,
        }
    }

    pub fn is_due(&self, cycle: u64) -> bool {
        match self.born_cycle {
            Some(born) => cycle.saturating_sub(born) >= u64::from(self.incubate_cycles),
            None => false,
        }
    }
}

/// A living agent on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: Uuid,
    pub body: Body,
    pub direction: Direction,
    pub hunger: i32,
    pub age: u64,
    pub born_cycle: u64,
    pub steps_since_turn: u32,
    pub last_lay_cycle: u64,
    pub idle_counter: u32,
    pub alive: bool,
    pub is_old: bool,
    /// Age at which `is_old` first became true.
    pub old_since_age: Option<u64>,
    pub last_feature_loss_age: Option<u64>,
    pub coop: CoopState,
}

impl Creature {
    pub fn new(id: Uuid, position: Position, direction: Direction, hunger: i32, cycle: u64) -> Self {
        Self {
            id,
            body: Body::new(position),
            direction,
            hunger,
            age: 0,
            born_cycle: cycle,
            steps_since_turn: 0,
            last_lay_cycle: cycle,
            idle_counter: 0,
            alive: true,
            is_old: false,
            old_since_age: None,
            last_feature_loss_age: None,
            coop: CoopState::default(),
        }
    }

    #[inline]
    pub fn head(&self) -> Position {
        self.body.neutral
    }

    #[inline]
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.body.has(feature)
    }

    pub fn feature_count(&self) -> usize {
        self.body.feature_count()
    }

    pub fn cell_count(&self) -> usize {
        self.body.cell_count()
    }

    /// Holding every feature is what allows egg-laying.
    pub fn is_complete(&self) -> bool {
        self.feature_count() == MAX_FEATURES
    }

    /// Micro-steps per tick.
    pub fn speed(&self) -> u32 {
        if self.has_feature(Feature::Leg) {
            2
        } else {
            1
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> {
        self.body.cells()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.body.realign(direction);
    }

    pub fn grant(&mut self, feature: Feature) {
        self.body.grant(feature, self.direction);
    }

    pub fn revoke(&mut self, feature: Feature) {
        self.body.revoke(feature);
    }

    pub fn move_to(&mut self, neutral: Position) {
        self.body.move_to(neutral, self.direction);
    }
}
