#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn state machine that turns a [`TurnState`] into one order per hero.
//!
//! Every turn starts from scratch:
//!
//! 1. With no monster heading for my base the squad spreads over the guard
//!    points ([`Phase::NoThreat`]).
//! 2. Without mana for a spell every hero chases the most dangerous monster
//!    ([`Phase::LowManaAttack`]).
//! 3. Otherwise control spells are distributed over reachable monsters and sent
//!    towards the enemy base ([`Phase::SpellAssignment`]). Heroes without a target
//!    attack instead; if no hero can cast at all the turn degrades to
//!    [`Phase::FallbackAttack`].

use hero_defence_core::{
    Decision, GameParameters, HeroDecision, HeroSnapshot, MonsterSnapshot, Point, ThreatState,
    TurnState, SPELL_CONTROL_RANGE, SPELL_COST,
};
use hero_defence_system_danger_scoring::{most_dangerous, rank, DangerWeights};
use hero_defence_system_defensive_positioning::{
    guard_points, station, SurplusPolicy, CANONICAL_GUARD_POINTS,
};
use hero_defence_system_spell_assignment::{assign, HeroCandidates, SpellBudget};
use hero_defence_system_threat_classification::{
    classify, within_range, DANGEROUS_FOR_ATTACK, SPELL_CANDIDATES,
};
use log::{debug, trace};

/// Tunable policy driving the turn engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Weights of the danger heuristic used for every ranking.
    pub weights: DangerWeights,
    /// Mana spent by a control spell.
    pub spell_cost: u32,
    /// Maximum distance between a hero and the monster it controls.
    pub control_range: u32,
    /// Guard points laid out for a base in the top-left corner.
    pub guard_points: Vec<Point>,
    /// Placement of heroes left without a guard point.
    pub surplus: SurplusPolicy,
    /// Threat states that make a monster worth attacking.
    pub attack_threats: Vec<ThreatState>,
    /// Threat states that make a monster worth controlling.
    pub spell_threats: Vec<ThreatState>,
    /// Longest candidate list handed to the spell solver for a single hero.
    pub max_candidates_per_hero: usize,
    /// Ignores shielded monsters when looking for spell targets. Off by default.
    pub skip_shielded: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: DangerWeights::default(),
            spell_cost: SPELL_COST,
            control_range: SPELL_CONTROL_RANGE,
            guard_points: CANONICAL_GUARD_POINTS.to_vec(),
            surplus: SurplusPolicy::default(),
            attack_threats: DANGEROUS_FOR_ATTACK.to_vec(),
            spell_threats: SPELL_CANDIDATES.to_vec(),
            max_candidates_per_hero: 8,
            skip_shielded: false,
        }
    }
}

/// Branch of the state machine taken for a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No monster threatens the base; heroes hold the guard points.
    NoThreat,
    /// Monsters threaten the base but mana cannot pay for a spell.
    LowManaAttack,
    /// At least one hero casts a control spell.
    SpellAssignment,
    /// Mana is available but no monster can be controlled.
    FallbackAttack,
}

/// Orders produced for a single turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnPlan {
    /// Branch that produced the orders.
    pub phase: Phase,
    /// One order per hero of mine, in ascending hero id order.
    pub decisions: Vec<HeroDecision>,
}

/// Stateless per-turn decision engine.
#[derive(Clone, Debug)]
pub struct TurnEngine {
    config: Config,
    parameters: GameParameters,
    guard_points: Vec<Point>,
}

impl TurnEngine {
    /// Creates an engine for the base announced in `parameters`.
    #[must_use]
    pub fn new(config: Config, parameters: GameParameters) -> Self {
        let guard_points = guard_points(&config.guard_points, parameters.base());
        Self {
            config,
            parameters,
            guard_points,
        }
    }

    /// Policy the engine was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Guard points mirrored onto this agent's base.
    #[must_use]
    pub fn guard_points(&self) -> &[Point] {
        &self.guard_points
    }

    /// Computes the orders for every hero of mine in `state`.
    #[must_use]
    pub fn make_turn(&self, state: &TurnState) -> TurnPlan {
        trace!("turn state: {state:?}");

        let heroes: Vec<&HeroSnapshot> = state.my_heroes().collect();
        let dangerous = classify(state.monsters(), &self.config.attack_threats);

        let plan = if dangerous.is_empty() {
            TurnPlan {
                phase: Phase::NoThreat,
                decisions: self.hold_guard_points(&heroes),
            }
        } else if !SpellBudget::new(state.me().mana, self.config.spell_cost).affords_any() {
            TurnPlan {
                phase: Phase::LowManaAttack,
                decisions: self.attack(&heroes, &dangerous),
            }
        } else {
            self.cast_or_attack(state, &heroes, &dangerous)
        };

        debug!(
            "phase {:?} with {} dangerous monster(s), mana {}",
            plan.phase,
            dangerous.len(),
            state.me().mana
        );
        for entry in &plan.decisions {
            debug!("hero {} -> {:?}", entry.hero.get(), entry.decision);
        }

        plan
    }

    fn hold_guard_points(&self, heroes: &[&HeroSnapshot]) -> Vec<HeroDecision> {
        station(heroes, &self.guard_points, self.config.surplus)
            .into_iter()
            .map(|placement| {
                let decision = match placement.post {
                    Some(destination) => Decision::Move { destination },
                    None => Decision::Wait,
                };
                HeroDecision::new(placement.hero, decision)
            })
            .collect()
    }

    fn attack(
        &self,
        heroes: &[&HeroSnapshot],
        dangerous: &[&MonsterSnapshot],
    ) -> Vec<HeroDecision> {
        heroes
            .iter()
            .map(|hero| HeroDecision::new(hero.id, self.attack_decision(hero, dangerous)))
            .collect()
    }

    fn attack_decision(&self, hero: &HeroSnapshot, dangerous: &[&MonsterSnapshot]) -> Decision {
        most_dangerous(
            &self.config.weights,
            hero,
            dangerous.iter().copied(),
            self.parameters.base(),
        )
        .map_or(Decision::Wait, |monster| Decision::Move {
            destination: monster.location,
        })
    }

    fn cast_or_attack(
        &self,
        state: &TurnState,
        heroes: &[&HeroSnapshot],
        dangerous: &[&MonsterSnapshot],
    ) -> TurnPlan {
        let candidates = self.spell_candidates(state, heroes);
        let budget = SpellBudget::new(state.me().mana, self.config.spell_cost);
        let assignment = assign(&candidates, budget.casts(heroes.len()));

        if assignment.cast_count() == 0 {
            return TurnPlan {
                phase: Phase::FallbackAttack,
                decisions: self.attack(heroes, dangerous),
            };
        }

        let destination = self.parameters.enemy_base();
        let decisions = heroes
            .iter()
            .map(|hero| {
                let decision = match assignment.target_of(hero.id) {
                    Some(monster) => Decision::Control {
                        monster,
                        destination,
                    },
                    None => self.attack_decision(hero, dangerous),
                };
                HeroDecision::new(hero.id, decision)
            })
            .collect();

        TurnPlan {
            phase: Phase::SpellAssignment,
            decisions,
        }
    }

    fn spell_candidates(&self, state: &TurnState, heroes: &[&HeroSnapshot]) -> Vec<HeroCandidates> {
        let targetable: Vec<&MonsterSnapshot> =
            classify(state.monsters(), &self.config.spell_threats)
                .into_iter()
                .filter(|monster| !(self.config.skip_shielded && monster.shield_life > 0))
                .collect();

        heroes
            .iter()
            .map(|hero| {
                let reachable = within_range(hero.location, &targetable, self.config.control_range);
                let monsters = rank(
                    &self.config.weights,
                    hero,
                    &reachable,
                    self.parameters.base(),
                )
                .into_iter()
                .take(self.config.max_candidates_per_hero)
                .map(|monster| monster.id)
                .collect();
                HeroCandidates {
                    hero: hero.id,
                    monsters,
                }
            })
            .collect()
    }
}
