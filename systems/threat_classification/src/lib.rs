#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that partitions monsters by threat state.

use hero_defence_core::{MonsterSnapshot, Point, ThreatState};

/// Threat states worth walking over to hit: anything heading for my base.
pub const DANGEROUS_FOR_ATTACK: [ThreatState; 2] =
    [ThreatState::TargetingMe, ThreatState::RoamingTowardMe];

/// Threat states worth spending a control spell on.
///
/// Clueless monsters are included so they can be redirected to the enemy base
/// before they drift towards ours.
pub const SPELL_CANDIDATES: [ThreatState; 3] = [
    ThreatState::TargetingMe,
    ThreatState::RoamingTowardMe,
    ThreatState::Clueless,
];

/// Returns the uncontrolled monsters whose threat state is in `accepted`.
///
/// Input order is preserved. Controlled monsters are always dropped: their
/// movement this turn belongs to whoever cast the spell.
#[must_use]
pub fn classify<'a>(
    monsters: &'a [MonsterSnapshot],
    accepted: &[ThreatState],
) -> Vec<&'a MonsterSnapshot> {
    monsters
        .iter()
        .filter(|monster| !monster.is_controlled && accepted.contains(&monster.threat))
        .collect()
}

/// Keeps the monsters located within `range` of `origin`, boundary included.
#[must_use]
pub fn within_range<'a>(
    origin: Point,
    monsters: &[&'a MonsterSnapshot],
    range: u32,
) -> Vec<&'a MonsterSnapshot> {
    monsters
        .iter()
        .copied()
        .filter(|monster| origin.within(monster.location, range))
        .collect()
}
