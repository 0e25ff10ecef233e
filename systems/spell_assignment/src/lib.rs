#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that distributes control spells over the heroes in range.
//!
//! The solver enumerates the Cartesian product of every hero's options (each
//! reachable monster, then "no cast") and keeps the first combination that
//! disables the most monsters without exceeding the spell budget. The search is
//! exponential in the squad size, so callers keep candidate lists short.

use std::iter;

use hero_defence_core::EntityId;
use itertools::Itertools;

/// Mana available this turn and the price of a single cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpellBudget {
    mana: u32,
    cost: u32,
}

impl SpellBudget {
    /// Creates a budget from the current mana pool and the per-spell cost.
    #[must_use]
    pub const fn new(mana: u32, cost: u32) -> Self {
        Self { mana, cost }
    }

    /// Reports whether at least one spell can be paid for.
    #[must_use]
    pub const fn affords_any(&self) -> bool {
        self.mana >= self.cost
    }

    /// Number of spells castable this turn by a squad of `heroes`.
    ///
    /// Each hero casts at most once per turn. A zero cost leaves the squad size
    /// as the only limit.
    #[must_use]
    pub fn casts(&self, heroes: usize) -> usize {
        match self.mana.checked_div(self.cost) {
            Some(affordable) => usize::try_from(affordable).map_or(heroes, |n| n.min(heroes)),
            None => heroes,
        }
    }
}

/// Monsters a single hero can reach with a spell this turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeroCandidates {
    /// Hero that would cast the spell.
    pub hero: EntityId,
    /// Reachable monsters in the order the solver should try them.
    pub monsters: Vec<EntityId>,
}

/// Spell target chosen for a hero, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpellTarget {
    /// Hero that casts.
    pub hero: EntityId,
    /// Monster to cast on, or `None` when the hero should not cast.
    pub monster: Option<EntityId>,
}

/// Outcome of the assignment: one entry per hero, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpellAssignment {
    targets: Vec<SpellTarget>,
}

impl SpellAssignment {
    fn unassigned(candidates: &[HeroCandidates]) -> Self {
        Self {
            targets: candidates
                .iter()
                .map(|entry| SpellTarget {
                    hero: entry.hero,
                    monster: None,
                })
                .collect(),
        }
    }

    /// Every hero's target, in the order heroes were supplied.
    #[must_use]
    pub fn targets(&self) -> &[SpellTarget] {
        &self.targets
    }

    /// Number of heroes that cast this turn.
    #[must_use]
    pub fn cast_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|target| target.monster.is_some())
            .count()
    }

    /// Monster assigned to `hero`, if any.
    #[must_use]
    pub fn target_of(&self, hero: EntityId) -> Option<EntityId> {
        self.targets
            .iter()
            .find(|target| target.hero == hero)
            .and_then(|target| target.monster)
    }
}

/// Assigns at most `max_casts` monsters to heroes, never the same monster twice.
///
/// The number of casting heroes is maximised. Among equally large assignments
/// the first one in enumeration order wins: earlier heroes get first pick and
/// earlier candidates are preferred. When nothing can be cast every hero maps
/// to `None`.
#[must_use]
pub fn assign(candidates: &[HeroCandidates], max_casts: usize) -> SpellAssignment {
    let mut assignment = SpellAssignment::unassigned(candidates);
    if candidates.is_empty() || max_casts == 0 {
        return assignment;
    }

    let options = candidates.iter().map(|entry| {
        entry
            .monsters
            .iter()
            .copied()
            .map(Some)
            .chain(iter::once(None))
            .collect::<Vec<_>>()
    });

    let ceiling = max_casts.min(candidates.len());
    let mut best: Option<(usize, Vec<Option<EntityId>>)> = None;

    for combination in options.multi_cartesian_product() {
        let resolved = drop_collisions(combination);
        let count = resolved.iter().flatten().count();
        if count > max_casts {
            continue;
        }

        if best.as_ref().map_or(true, |(best_count, _)| count > *best_count) {
            best = Some((count, resolved));
            if count == ceiling {
                break;
            }
        }
    }

    if let Some((_, monsters)) = best {
        for (target, monster) in assignment.targets.iter_mut().zip(monsters) {
            target.monster = monster;
        }
    }

    assignment
}

/// Clears every repeated monster after its first claim, in hero order.
fn drop_collisions(combination: Vec<Option<EntityId>>) -> Vec<Option<EntityId>> {
    let mut claimed: Vec<EntityId> = Vec::with_capacity(combination.len());
    combination
        .into_iter()
        .map(|choice| match choice {
            Some(monster) if claimed.contains(&monster) => None,
            Some(monster) => {
                claimed.push(monster);
                Some(monster)
            }
            None => None,
        })
        .collect()
}
