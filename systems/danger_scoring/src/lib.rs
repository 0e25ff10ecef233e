#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Heuristic ranking of monsters by how much harm they are about to cause.
//!
//! Scores are only meaningful relative to each other: a higher score means the
//! monster deserves attention first.

use std::cmp::Ordering;

use hero_defence_core::{HeroSnapshot, MonsterSnapshot, Point, ThreatState};

/// Weights applied to each term of the danger score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DangerWeights {
    /// Coefficient of the monster's distance to my base.
    pub base_proximity: f64,
    /// Coefficient of the distance between the hero and the monster.
    pub hero_proximity: f64,
    /// Flat bonus for monsters already locked onto my base.
    pub targeting_bonus: f64,
}

impl Default for DangerWeights {
    fn default() -> Self {
        Self {
            base_proximity: -1.0,
            hero_proximity: -1.0,
            targeting_bonus: 1000.0,
        }
    }
}

/// Scores how dangerous `monster` is from the point of view of `hero`.
///
/// With the default weights this is
/// `-d(monster, base) - d(hero, monster) + 1000 * [monster targets my base]`.
#[must_use]
pub fn score(
    weights: &DangerWeights,
    hero: &HeroSnapshot,
    monster: &MonsterSnapshot,
    base: Point,
) -> f64 {
    let targeting = if monster.threat == ThreatState::TargetingMe {
        weights.targeting_bonus
    } else {
        0.0
    };

    weights.base_proximity * monster.location.distance(base)
        + weights.hero_proximity * hero.location.distance(monster.location)
        + targeting
}

/// Returns the highest-scoring monster, or `None` when `monsters` is empty.
///
/// Equal scores resolve to the monster with the smaller id so the result does
/// not depend on iteration order.
#[must_use]
pub fn most_dangerous<'a, I>(
    weights: &DangerWeights,
    hero: &HeroSnapshot,
    monsters: I,
    base: Point,
) -> Option<&'a MonsterSnapshot>
where
    I: IntoIterator<Item = &'a MonsterSnapshot>,
{
    let mut best: Option<(f64, &'a MonsterSnapshot)> = None;

    for monster in monsters {
        let current = score(weights, hero, monster, base);
        match best {
            Some((best_score, best_monster)) => {
                let precedes = match current.total_cmp(&best_score) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => monster.id < best_monster.id,
                };
                if precedes {
                    best = Some((current, monster));
                }
            }
            None => best = Some((current, monster)),
        }
    }

    best.map(|(_, monster)| monster)
}

/// Sorts monsters from most to least dangerous for `hero`.
///
/// Ties keep the smaller id first, matching [`most_dangerous`].
#[must_use]
pub fn rank<'a>(
    weights: &DangerWeights,
    hero: &HeroSnapshot,
    monsters: &[&'a MonsterSnapshot],
    base: Point,
) -> Vec<&'a MonsterSnapshot> {
    let mut scored: Vec<(f64, &'a MonsterSnapshot)> = monsters
        .iter()
        .map(|monster| (score(weights, hero, monster, base), *monster))
        .collect();
    scored.sort_by(|(left_score, left), (right_score, right)| {
        right_score
            .total_cmp(left_score)
            .then_with(|| left.id.cmp(&right.id))
    });
    scored.into_iter().map(|(_, monster)| monster).collect()
}
