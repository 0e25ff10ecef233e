#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that spreads idle heroes over fixed guard points.
//!
//! Guard points are laid out for a base in the top-left corner and mirrored onto
//! the actual base with `|point - base|`. Heroes are paired with points by an
//! exhaustive permutation search minimising the summed walking distance, which
//! stays cheap for squads of up to five heroes.

use hero_defence_core::{EntityId, HeroSnapshot, Point};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Guard points for a base located at the origin.
pub const CANONICAL_GUARD_POINTS: [Point; 3] = [
    Point::new(3535, 3535),
    Point::new(1500, 4850),
    Point::new(4850, 1500),
];

/// Mirrors canonical guard points onto the corner occupied by `base`.
#[must_use]
pub fn guard_points(canonical: &[Point], base: Point) -> Vec<Point> {
    canonical.iter().map(|point| (*point - base).abs()).collect()
}

/// Strategy applied to heroes left over once every guard point is claimed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurplusPolicy {
    /// Reinforce the claimed guard point closest to the hero.
    #[default]
    NearestClaimed,
    /// Hold position.
    Wait,
}

/// Pairing of a hero with the guard point it should occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardAssignment {
    /// Hero walking to the point.
    pub hero: EntityId,
    /// Guard point claimed by the hero.
    pub point: Point,
}

/// Final placement of a hero for the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Station {
    /// Hero being placed.
    pub hero: EntityId,
    /// Point the hero should walk to, or `None` when it should hold position.
    pub post: Option<Point>,
}

/// Computes the hero/point pairing with the smallest total distance.
///
/// When heroes outnumber points only `points.len()` heroes are paired; when
/// points outnumber heroes every hero is paired and the extra points stay empty.
/// Among equally short pairings the first one in permutation order wins, so the
/// result is deterministic. Assignments are returned in ascending hero id order.
#[must_use]
pub fn solve(heroes: &[&HeroSnapshot], points: &[Point]) -> Vec<GuardAssignment> {
    if heroes.is_empty() || points.is_empty() {
        return Vec::new();
    }

    let mut best: Option<(f64, Vec<(&HeroSnapshot, Point)>)> = None;

    if heroes.len() >= points.len() {
        for ordering in heroes.iter().permutations(points.len()) {
            let pairs: Vec<_> = ordering
                .into_iter()
                .copied()
                .zip(points.iter().copied())
                .collect();
            keep_shorter(&mut best, pairs);
        }
    } else {
        for ordering in points.iter().permutations(heroes.len()) {
            let pairs: Vec<_> = heroes
                .iter()
                .copied()
                .zip(ordering.into_iter().copied())
                .collect();
            keep_shorter(&mut best, pairs);
        }
    }

    let mut assignments: Vec<GuardAssignment> = best
        .map(|(_, pairs)| {
            pairs
                .into_iter()
                .map(|(hero, point)| GuardAssignment {
                    hero: hero.id,
                    point,
                })
                .collect()
        })
        .unwrap_or_default();
    assignments.sort_by_key(|assignment| assignment.hero);
    assignments
}

/// Places every hero, pairing them with guard points and resolving surplus heroes.
///
/// Returns exactly one [`Station`] per hero, in the order of `heroes`.
#[must_use]
pub fn station(heroes: &[&HeroSnapshot], points: &[Point], policy: SurplusPolicy) -> Vec<Station> {
    let assignments = solve(heroes, points);
    let claimed: Vec<Point> = assignments.iter().map(|assignment| assignment.point).collect();

    heroes
        .iter()
        .map(|hero| {
            let assigned = assignments
                .iter()
                .find(|assignment| assignment.hero == hero.id)
                .map(|assignment| assignment.point);
            let post = assigned.or_else(|| match policy {
                SurplusPolicy::NearestClaimed => nearest(hero.location, &claimed),
                SurplusPolicy::Wait => None,
            });
            Station { hero: hero.id, post }
        })
        .collect()
}

fn keep_shorter<'a>(
    best: &mut Option<(f64, Vec<(&'a HeroSnapshot, Point)>)>,
    pairs: Vec<(&'a HeroSnapshot, Point)>,
) {
    let total: f64 = pairs
        .iter()
        .map(|(hero, point)| hero.location.distance(*point))
        .sum();

    let improves = best
        .as_ref()
        .map_or(true, |(best_total, _)| total < *best_total);
    if improves {
        *best = Some((total, pairs));
    }
}

fn nearest(origin: Point, candidates: &[Point]) -> Option<Point> {
    candidates
        .iter()
        .copied()
        .min_by(|left, right| origin.distance(*left).total_cmp(&origin.distance(*right)))
}
