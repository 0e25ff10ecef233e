#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hero Defence engine.
//!
//! This crate defines the immutable per-turn snapshot that the protocol adapter
//! builds from the referee's records, and the [`Decision`] values the turn
//! engine hands back. Systems receive a [`TurnState`] by reference, never mutate
//! it, and respond exclusively with new decision batches.

use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// Bottom-right corner of the arena. The top-left corner is the origin.
pub const ARENA_BOUNDS: Point = Point::new(17630, 9000);

/// Mana consumed by every spell.
pub const SPELL_COST: u32 = 10;

/// Maximum distance between a hero and the target of a control spell.
pub const SPELL_CONTROL_RANGE: u32 = 2200;

/// Base health each player starts the game with.
pub const INITIAL_HEALTH: u32 = 3;

/// Mana each player starts the game with.
pub const INITIAL_MANA: u32 = 0;

/// Location in the arena expressed in integer arena units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, growing to the right.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate, growing downwards.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }

    /// Reports whether `other` lies within `radius` of this point, boundary included.
    #[must_use]
    pub fn within(self, other: Point, radius: u32) -> bool {
        let dx = i128::from(self.x) - i128::from(other.x);
        let dy = i128::from(self.y) - i128::from(other.y);
        let radius = i128::from(radius);
        dx * dx + dy * dy <= radius * radius
    }

    /// Reports whether the point lies inside the arena, edges included.
    #[must_use]
    pub const fn in_arena(self) -> bool {
        self.x >= 0 && self.x <= ARENA_BOUNDS.x && self.y >= 0 && self.y <= ARENA_BOUNDS.y
    }

    /// Component-wise absolute value, saturating at `i32::MAX`.
    ///
    /// Combined with subtraction this mirrors a layout point defined for the
    /// top-left base onto whichever corner `base` occupies: `(p - base).abs()`.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self {
            x: self.x.saturating_abs(),
            y: self.y.saturating_abs(),
        }
    }
}

/// Component-wise subtraction, saturating at the bounds of `i32`.
impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Identifier assigned to a hero or a monster by the referee.
///
/// Heroes and monsters share a single id space, which lets a shield target either.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Side a hero fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Heroes controlled by this agent.
    Mine,
    /// Heroes controlled by the opponent.
    Enemy,
}

/// Behavioural classification of a monster relative to the two bases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatState {
    /// Wandering without heading to either base.
    Clueless,
    /// Heading towards my base but not yet inside its target radius.
    RoamingTowardMe,
    /// Heading towards the enemy base but not yet inside its target radius.
    RoamingTowardEnemy,
    /// Locked onto my base; it deals damage on arrival.
    TargetingMe,
    /// Locked onto the enemy base.
    TargetingEnemy,
}

impl ThreatState {
    /// Decodes the referee's `(near_base, threat_for)` flag pair.
    ///
    /// Returns `None` for pairs the referee never emits, such as a monster near a
    /// base that threatens nobody.
    #[must_use]
    pub const fn from_flags(near_base: i32, threat_for: i32) -> Option<Self> {
        match (near_base, threat_for) {
            (0, 0) => Some(Self::Clueless),
            (0, 1) => Some(Self::RoamingTowardMe),
            (0, 2) => Some(Self::RoamingTowardEnemy),
            (1, 1) => Some(Self::TargetingMe),
            (1, 2) => Some(Self::TargetingEnemy),
            _ => None,
        }
    }

    /// Encodes the state back into the referee's `(near_base, threat_for)` pair.
    #[must_use]
    pub const fn flags(self) -> (i32, i32) {
        match self {
            Self::Clueless => (0, 0),
            Self::RoamingTowardMe => (0, 1),
            Self::RoamingTowardEnemy => (0, 2),
            Self::TargetingMe => (1, 1),
            Self::TargetingEnemy => (1, 2),
        }
    }
}

/// Immutable representation of a single hero for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSnapshot {
    /// Identifier of the hero, stable across turns.
    pub id: EntityId,
    /// Side the hero fights for.
    pub team: Team,
    /// Current location of the hero.
    pub location: Point,
    /// Remaining turns of shield protection; zero when unshielded.
    pub shield_life: u32,
    /// Indicates whether an enemy spell overrides the hero's orders this turn.
    pub is_controlled: bool,
}

/// Immutable representation of a single monster for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSnapshot {
    /// Identifier of the monster, stable while it lives.
    pub id: EntityId,
    /// Current location of the monster.
    pub location: Point,
    /// Remaining turns of shield protection; zero when unshielded.
    pub shield_life: u32,
    /// Indicates whether a spell overrides the monster's behaviour this turn.
    pub is_controlled: bool,
    /// Remaining hit points.
    pub health: u32,
    /// Displacement the monster will apply on its next move.
    pub velocity: Point,
    /// Threat classification reported by the referee.
    pub threat: ThreatState,
}

/// Health and mana of one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatus {
    /// Remaining base health.
    pub health: u32,
    /// Mana available for spells this turn.
    pub mana: u32,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self {
            health: INITIAL_HEALTH,
            mana: INITIAL_MANA,
        }
    }
}

/// Read-only snapshot of the whole arena for a single turn.
///
/// Heroes and monsters are kept in ascending id order so every consumer
/// iterates deterministically.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    me: PlayerStatus,
    enemy: PlayerStatus,
    heroes: Vec<HeroSnapshot>,
    monsters: Vec<MonsterSnapshot>,
}

impl TurnState {
    /// Creates a turn snapshot from the provided statuses and entities.
    #[must_use]
    pub fn new(
        me: PlayerStatus,
        enemy: PlayerStatus,
        mut heroes: Vec<HeroSnapshot>,
        mut monsters: Vec<MonsterSnapshot>,
    ) -> Self {
        heroes.sort_by_key(|hero| hero.id);
        monsters.sort_by_key(|monster| monster.id);
        Self {
            me,
            enemy,
            heroes,
            monsters,
        }
    }

    /// Status of this agent's base.
    #[must_use]
    pub const fn me(&self) -> PlayerStatus {
        self.me
    }

    /// Status of the opponent's base.
    #[must_use]
    pub const fn enemy(&self) -> PlayerStatus {
        self.enemy
    }

    /// Every hero on the field, both teams, in ascending id order.
    #[must_use]
    pub fn heroes(&self) -> &[HeroSnapshot] {
        &self.heroes
    }

    /// Iterator over the heroes this agent commands, in ascending id order.
    pub fn my_heroes(&self) -> impl Iterator<Item = &HeroSnapshot> {
        self.heroes.iter().filter(|hero| hero.team == Team::Mine)
    }

    /// Iterator over the opponent's heroes, in ascending id order.
    pub fn enemy_heroes(&self) -> impl Iterator<Item = &HeroSnapshot> {
        self.heroes.iter().filter(|hero| hero.team == Team::Enemy)
    }

    /// Every visible monster in ascending id order.
    #[must_use]
    pub fn monsters(&self) -> &[MonsterSnapshot] {
        &self.monsters
    }
}

/// Parameters announced once by the referee before the first turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameParameters {
    base: Point,
    heroes_per_player: u32,
}

impl GameParameters {
    /// Creates the game parameters from the startup handshake values.
    #[must_use]
    pub const fn new(base: Point, heroes_per_player: u32) -> Self {
        Self {
            base,
            heroes_per_player,
        }
    }

    /// Location of this agent's base.
    #[must_use]
    pub const fn base(&self) -> Point {
        self.base
    }

    /// Location of the opponent's base, diagonally opposite to ours.
    #[must_use]
    pub fn enemy_base(&self) -> Point {
        ARENA_BOUNDS - self.base
    }

    /// Number of heroes each player commands.
    #[must_use]
    pub const fn heroes_per_player(&self) -> u32 {
        self.heroes_per_player
    }
}

/// Order issued to a single hero for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Walk towards the destination.
    Move {
        /// Point the hero heads for.
        destination: Point,
    },
    /// Stay in place.
    Wait,
    /// Cast a control spell forcing a monster to walk towards the destination.
    Control {
        /// Monster targeted by the spell.
        monster: EntityId,
        /// Point the monster is sent towards.
        destination: Point,
    },
    /// Cast a wind spell pushing nearby entities towards the destination.
    Wind {
        /// Direction the entities are pushed to.
        destination: Point,
    },
    /// Cast a shield spell on a hero or a monster.
    Shield {
        /// Entity protected by the shield.
        target: EntityId,
    },
}

impl Decision {
    /// Reports whether the decision consumes mana.
    #[must_use]
    pub const fn is_spell(&self) -> bool {
        matches!(
            self,
            Self::Control { .. } | Self::Wind { .. } | Self::Shield { .. }
        )
    }
}

/// Decision paired with the hero it is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeroDecision {
    /// Hero receiving the order.
    pub hero: EntityId,
    /// Order for the current turn.
    pub decision: Decision,
}

impl HeroDecision {
    /// Pairs a decision with its hero.
    #[must_use]
    pub const fn new(hero: EntityId, decision: Decision) -> Self {
        Self { hero, decision }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Decision, EntityId, GameParameters, HeroSnapshot, MonsterSnapshot, PlayerStatus, Point,
        Team, ThreatState, TurnState, ARENA_BOUNDS,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn hero(id: u32, team: Team) -> HeroSnapshot {
        HeroSnapshot {
            id: EntityId::new(id),
            team,
            location: Point::new(0, 0),
            shield_life: 0,
            is_controlled: false,
        }
    }

    fn monster(id: u32) -> MonsterSnapshot {
        MonsterSnapshot {
            id: EntityId::new(id),
            location: Point::new(100, 100),
            shield_life: 0,
            is_controlled: false,
            health: 10,
            velocity: Point::new(-300, -200),
            threat: ThreatState::Clueless,
        }
    }

    #[test]
    fn distance_is_euclidean() {
        let origin = Point::new(0, 0);
        let destination = Point::new(3, 4);
        assert!((origin.distance(destination) - 5.0).abs() < f64::EPSILON);
        assert!((destination.distance(origin) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn within_includes_boundary() {
        let origin = Point::new(0, 0);
        assert!(origin.within(Point::new(2200, 0), 2200));
        assert!(!origin.within(Point::new(2200, 1), 2200));
    }

    #[test]
    fn within_handles_extreme_coordinates() {
        let far = Point::new(i32::MIN, i32::MIN);
        let other = Point::new(i32::MAX, i32::MAX);
        assert!(!far.within(other, u32::MAX));
        assert!(far.within(far, 0));
    }

    #[test]
    fn subtraction_and_abs_saturate() {
        let low = Point::new(i32::MIN, 0);
        let high = Point::new(i32::MAX, 1);
        assert_eq!(low - high, Point::new(i32::MIN, -1));
        assert_eq!((low - high).abs(), Point::new(i32::MAX, 1));
    }

    #[test]
    fn arena_membership_includes_edges() {
        assert!(Point::new(0, 0).in_arena());
        assert!(ARENA_BOUNDS.in_arena());
        assert!(!Point::new(-1, 0).in_arena());
        assert!(!Point::new(0, ARENA_BOUNDS.y() + 1).in_arena());
    }

    #[test]
    fn mirroring_maps_layout_onto_far_corner() {
        let layout = Point::new(3535, 3535);
        assert_eq!((layout - Point::new(0, 0)).abs(), layout);
        assert_eq!(
            (layout - ARENA_BOUNDS).abs(),
            Point::new(17630 - 3535, 9000 - 3535)
        );
    }

    #[test]
    fn threat_flags_decode_every_meaningful_pair() {
        let states = [
            ThreatState::Clueless,
            ThreatState::RoamingTowardMe,
            ThreatState::RoamingTowardEnemy,
            ThreatState::TargetingMe,
            ThreatState::TargetingEnemy,
        ];
        for state in states {
            let (near_base, threat_for) = state.flags();
            assert_eq!(ThreatState::from_flags(near_base, threat_for), Some(state));
        }
        assert_eq!(ThreatState::from_flags(1, 0), None);
        assert_eq!(ThreatState::from_flags(0, 3), None);
    }

    #[test]
    fn turn_state_orders_entities_and_partitions_teams() {
        let state = TurnState::new(
            PlayerStatus::default(),
            PlayerStatus::default(),
            vec![hero(4, Team::Enemy), hero(2, Team::Mine), hero(0, Team::Mine)],
            vec![monster(9), monster(7)],
        );

        let mine: Vec<_> = state.my_heroes().map(|hero| hero.id.get()).collect();
        let theirs: Vec<_> = state.enemy_heroes().map(|hero| hero.id.get()).collect();
        let monsters: Vec<_> = state.monsters().iter().map(|m| m.id.get()).collect();

        assert_eq!(mine, vec![0, 2]);
        assert_eq!(theirs, vec![4]);
        assert_eq!(monsters, vec![7, 9]);
    }

    #[test]
    fn enemy_base_is_diagonally_opposite() {
        let params = GameParameters::new(Point::new(0, 0), 3);
        assert_eq!(params.enemy_base(), ARENA_BOUNDS);

        let params = GameParameters::new(ARENA_BOUNDS, 3);
        assert_eq!(params.enemy_base(), Point::new(0, 0));
    }

    #[test]
    fn only_casts_are_spells() {
        assert!(!Decision::Wait.is_spell());
        assert!(!Decision::Move {
            destination: Point::new(1, 1)
        }
        .is_spell());
        assert!(Decision::Shield {
            target: EntityId::new(3)
        }
        .is_spell());
    }

    #[test]
    fn decision_round_trips_through_bincode() {
        assert_round_trip(&Decision::Control {
            monster: EntityId::new(12),
            destination: ARENA_BOUNDS,
        });
    }

    #[test]
    fn turn_state_round_trips_through_bincode() {
        let state = TurnState::new(
            PlayerStatus { health: 2, mana: 40 },
            PlayerStatus::default(),
            vec![hero(1, Team::Mine)],
            vec![monster(5)],
        );
        assert_round_trip(&state);
    }
}
