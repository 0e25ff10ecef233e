//! Policy file loading for the turn engine.
//!
//! Every key is optional and falls back to [`Config::default`]:
//!
//! ```toml
//! version = 1
//!
//! [danger]
//! base_proximity = -1.0
//! hero_proximity = -1.0
//! targeting_bonus = 1000.0
//!
//! [spells]
//! cost = 10
//! control_range = 2200
//! max_candidates_per_hero = 8
//! skip_shielded = false
//!
//! [defence]
//! guard_points = [[3535, 3535], [1500, 4850], [4850, 1500]]
//! surplus = "nearest_claimed"
//!
//! [threats]
//! attack = ["targeting_me", "roaming_toward_me"]
//! spell = ["targeting_me", "roaming_toward_me", "clueless"]
//! ```

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use hero_defence_core::{Point, ThreatState};
use hero_defence_system_defensive_positioning::SurplusPolicy;
use hero_defence_system_turn_decision::Config;
use serde::Deserialize;

const SUPPORTED_POLICY_VERSION: u32 = 1;

/// Guard point counts above this make the permutation search too slow for a turn.
const MAX_GUARD_POINTS: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyFile {
    version: u32,
    #[serde(default)]
    danger: DangerSection,
    #[serde(default)]
    spells: SpellSection,
    #[serde(default)]
    defence: DefenceSection,
    #[serde(default)]
    threats: ThreatSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DangerSection {
    base_proximity: Option<f64>,
    hero_proximity: Option<f64>,
    targeting_bonus: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpellSection {
    cost: Option<u32>,
    control_range: Option<u32>,
    max_candidates_per_hero: Option<usize>,
    skip_shielded: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefenceSection {
    guard_points: Option<Vec<[i32; 2]>>,
    surplus: Option<SurplusPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThreatSection {
    attack: Option<Vec<ThreatState>>,
    spell: Option<Vec<ThreatState>>,
}

/// Reads and validates the policy file at `path`.
pub(crate) fn load_policy(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file at {}", path.display()))?;
    parse_policy(&contents)
        .with_context(|| format!("invalid policy file at {}", path.display()))
}

fn parse_policy(contents: &str) -> Result<Config> {
    let file: PolicyFile = toml::from_str(contents).context("failed to parse policy toml")?;
    if file.version != SUPPORTED_POLICY_VERSION {
        bail!(
            "unsupported policy version {}; expected {}",
            file.version,
            SUPPORTED_POLICY_VERSION
        );
    }

    let mut config = Config::default();

    let danger = file.danger;
    if let Some(value) = danger.base_proximity {
        config.weights.base_proximity = finite("danger.base_proximity", value)?;
    }
    if let Some(value) = danger.hero_proximity {
        config.weights.hero_proximity = finite("danger.hero_proximity", value)?;
    }
    if let Some(value) = danger.targeting_bonus {
        config.weights.targeting_bonus = finite("danger.targeting_bonus", value)?;
    }

    let spells = file.spells;
    if let Some(cost) = spells.cost {
        config.spell_cost = cost;
    }
    if let Some(range) = spells.control_range {
        config.control_range = range;
    }
    if let Some(limit) = spells.max_candidates_per_hero {
        if limit == 0 {
            bail!("spells.max_candidates_per_hero must be at least 1");
        }
        config.max_candidates_per_hero = limit;
    }
    if let Some(skip) = spells.skip_shielded {
        config.skip_shielded = skip;
    }

    let defence = file.defence;
    if let Some(points) = defence.guard_points {
        if points.len() > MAX_GUARD_POINTS {
            bail!(
                "defence.guard_points lists {} points; at most {} are supported",
                points.len(),
                MAX_GUARD_POINTS
            );
        }
        config.guard_points = points.into_iter().map(|[x, y]| Point::new(x, y)).collect();
    }
    if let Some(surplus) = defence.surplus {
        config.surplus = surplus;
    }

    let threats = file.threats;
    if let Some(attack) = threats.attack {
        config.attack_threats = attack;
    }
    if let Some(spell) = threats.spell {
        config.spell_threats = spell;
    }

    Ok(config)
}

fn finite(key: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        bail!("{key} must be a finite number, found {value}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_policy_keeps_defaults() {
        let config = parse_policy("version = 1").expect("minimal policy parses");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_are_applied() {
        let policy = r#"
            version = 1

            [danger]
            targeting_bonus = 2500.0

            [spells]
            cost = 20
            max_candidates_per_hero = 3
            skip_shielded = true

            [defence]
            guard_points = [[4000, 4000], [2000, 5000]]
            surplus = "wait"

            [threats]
            spell = ["targeting_me"]
        "#;

        let config = parse_policy(policy).expect("policy parses");
        assert!((config.weights.targeting_bonus - 2500.0).abs() < f64::EPSILON);
        assert!((config.weights.base_proximity + 1.0).abs() < f64::EPSILON);
        assert_eq!(config.spell_cost, 20);
        assert_eq!(config.control_range, Config::default().control_range);
        assert_eq!(config.max_candidates_per_hero, 3);
        assert!(config.skip_shielded);
        assert_eq!(
            config.guard_points,
            vec![Point::new(4000, 4000), Point::new(2000, 5000)]
        );
        assert_eq!(config.surplus, SurplusPolicy::Wait);
        assert_eq!(config.spell_threats, vec![ThreatState::TargetingMe]);
        assert_eq!(config.attack_threats, Config::default().attack_threats);
    }

    #[test]
    fn missing_version_is_rejected() {
        assert!(parse_policy("[spells]\ncost = 10\n").is_err());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let error = parse_policy("version = 2").expect_err("version 2 is unknown");
        assert!(error.to_string().contains("unsupported policy version 2"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_policy("version = 1\n[spells]\nrange = 10\n").is_err());
    }

    #[test]
    fn surplus_policies_use_snake_case_names() {
        let config = parse_policy("version = 1\n[defence]\nsurplus = \"nearest_claimed\"\n")
            .expect("policy parses");
        assert_eq!(config.surplus, SurplusPolicy::NearestClaimed);
        assert!(parse_policy("version = 1\n[defence]\nsurplus = \"Wait\"\n").is_err());
    }

    #[test]
    fn unknown_threat_state_is_rejected() {
        assert!(parse_policy("version = 1\n[threats]\nattack = [\"hungry\"]\n").is_err());
    }

    #[test]
    fn zero_candidate_limit_is_rejected() {
        assert!(parse_policy("version = 1\n[spells]\nmax_candidates_per_hero = 0\n").is_err());
    }

    #[test]
    fn oversized_guard_layout_is_rejected() {
        let policy = "version = 1\n[defence]\nguard_points = [[0,0],[1,1],[2,2],[3,3],[4,4],[5,5],[6,6]]\n";
        assert!(parse_policy(policy).is_err());
    }

    #[test]
    fn load_policy_reports_missing_file() {
        let error = load_policy(Path::new("/nonexistent/hero-defence/policy.toml"))
            .expect_err("missing file");
        assert!(format!("{error:#}").contains("failed to read policy file"));
    }
}
