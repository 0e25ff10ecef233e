#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Line-oriented adapter between the referee and the turn engine.
//!
//! The referee announces the base location and squad size once, then sends one
//! block of whitespace-separated integers per turn. Orders go back as one line per
//! hero. Malformed input is reported as a [`ProtocolError`]; the caller is expected
//! to give up, since a desynchronised stream cannot be recovered.

use std::{
    collections::HashSet,
    io::{self, BufRead, Write},
    num::ParseIntError,
};

use hero_defence_core::{
    Decision, EntityId, GameParameters, HeroDecision, HeroSnapshot, MonsterSnapshot,
    PlayerStatus, Point, Team, ThreatState, TurnState,
};
use log::debug;
use thiserror::Error;

const MONSTER_TYPE: i32 = 0;
const MY_HERO_TYPE: i32 = 1;
const ENEMY_HERO_TYPE: i32 = 2;

/// Number of integers describing a single entity.
pub const ENTITY_FIELDS: usize = 11;

/// Errors raised while decoding referee input.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The underlying reader failed.
    #[error("failed to read line {line}")]
    Io {
        /// Line that was being read.
        line: usize,
        /// Failure reported by the reader.
        #[source]
        source: io::Error,
    },
    /// Input ended in the middle of a record.
    #[error("input ended after line {line} while expecting {expected}")]
    UnexpectedEof {
        /// Last line successfully read.
        line: usize,
        /// Description of the missing record.
        expected: &'static str,
    },
    /// A line carried the wrong number of integers.
    #[error("line {line}: expected {expected} integers for {record}, found {found}")]
    FieldCount {
        /// Offending line.
        line: usize,
        /// Description of the record.
        record: &'static str,
        /// Number of integers the record requires.
        expected: usize,
        /// Number of tokens present on the line.
        found: usize,
    },
    /// A token could not be parsed as an integer.
    #[error("line {line}: `{token}` is not an integer")]
    InvalidInteger {
        /// Offending line.
        line: usize,
        /// Token that failed to parse.
        token: String,
        /// Parser failure.
        #[source]
        source: ParseIntError,
    },
    /// A field that must be non-negative carried a negative value.
    #[error("line {line}: {field} must not be negative, found {value}")]
    Negative {
        /// Offending line.
        line: usize,
        /// Name of the field.
        field: &'static str,
        /// Value received.
        value: i32,
    },
    /// A boolean flag was neither `0` nor `1`.
    #[error("line {line}: {field} must be 0 or 1, found {value}")]
    InvalidFlag {
        /// Offending line.
        line: usize,
        /// Name of the field.
        field: &'static str,
        /// Value received.
        value: i32,
    },
    /// The entity type is not one of monster, my hero or enemy hero.
    #[error("line {line}: unknown entity type {value}")]
    UnknownEntityType {
        /// Offending line.
        line: usize,
        /// Value received.
        value: i32,
    },
    /// The `(near_base, threat_for)` pair does not describe a threat state.
    #[error("line {line}: invalid threat flags ({near_base}, {threat_for})")]
    InvalidThreat {
        /// Offending line.
        line: usize,
        /// Near-base flag received.
        near_base: i32,
        /// Threat-target flag received.
        threat_for: i32,
    },
    /// The announced base is not a point of the arena.
    #[error("line {line}: base ({x}, {y}) lies outside the arena")]
    BaseOutsideArena {
        /// Offending line.
        line: usize,
        /// Horizontal coordinate received.
        x: i32,
        /// Vertical coordinate received.
        y: i32,
    },
    /// Two entities of the same turn share an id.
    #[error("line {line}: entity id {id} appears twice in the same turn")]
    DuplicateEntity {
        /// Offending line.
        line: usize,
        /// Repeated identifier.
        id: u32,
    },
}

/// Decodes referee input from any buffered reader.
#[derive(Debug)]
pub struct ProtocolReader<R> {
    reader: R,
    buffer: String,
    line: usize,
}

impl<R: BufRead> ProtocolReader<R> {
    /// Wraps a buffered reader positioned at the start of the handshake.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line: 0,
        }
    }

    /// Reads the startup handshake: base coordinates, then heroes per player.
    pub fn read_parameters(&mut self) -> Result<GameParameters, ProtocolError> {
        let [x, y] = self.record::<2>("base coordinates")?;
        let base = Point::new(x, y);
        if !base.in_arena() {
            return Err(ProtocolError::BaseOutsideArena {
                line: self.line,
                x,
                y,
            });
        }
        let [heroes] = self.record::<1>("heroes per player")?;
        let heroes = self.non_negative("heroes per player", heroes)?;
        Ok(GameParameters::new(base, heroes))
    }

    /// Reads one turn, or returns `None` when the input ends cleanly between turns.
    pub fn read_turn(&mut self) -> Result<Option<TurnState>, ProtocolError> {
        let Some([my_health, my_mana]) = self.next_record::<2>("my health and mana")? else {
            return Ok(None);
        };
        let me = PlayerStatus {
            health: self.non_negative("health", my_health)?,
            mana: self.non_negative("mana", my_mana)?,
        };

        let [enemy_health, enemy_mana] = self.record::<2>("enemy health and mana")?;
        let enemy = PlayerStatus {
            health: self.non_negative("health", enemy_health)?,
            mana: self.non_negative("mana", enemy_mana)?,
        };

        let [count] = self.record::<1>("entity count")?;
        let count = self.non_negative("entity count", count)?;

        let mut heroes = Vec::new();
        let mut monsters = Vec::new();
        let mut seen = HashSet::new();

        for _ in 0..count {
            let fields = self.record::<ENTITY_FIELDS>("entity")?;
            let [id, kind, x, y, shield_life, is_controlled, health, vx, vy, near_base, threat_for] =
                fields;

            let id = self.non_negative("entity id", id)?;
            if !seen.insert(id) {
                return Err(ProtocolError::DuplicateEntity {
                    line: self.line,
                    id,
                });
            }

            let id = EntityId::new(id);
            let location = Point::new(x, y);
            let shield_life = self.non_negative("shield life", shield_life)?;
            let is_controlled = self.flag("is controlled", is_controlled)?;

            match kind {
                MONSTER_TYPE => {
                    let threat = ThreatState::from_flags(near_base, threat_for).ok_or(
                        ProtocolError::InvalidThreat {
                            line: self.line,
                            near_base,
                            threat_for,
                        },
                    )?;
                    monsters.push(MonsterSnapshot {
                        id,
                        location,
                        shield_life,
                        is_controlled,
                        health: self.non_negative("health", health)?,
                        velocity: Point::new(vx, vy),
                        threat,
                    });
                }
                MY_HERO_TYPE | ENEMY_HERO_TYPE => {
                    let team = if kind == MY_HERO_TYPE {
                        Team::Mine
                    } else {
                        Team::Enemy
                    };
                    heroes.push(HeroSnapshot {
                        id,
                        team,
                        location,
                        shield_life,
                        is_controlled,
                    });
                }
                value => {
                    return Err(ProtocolError::UnknownEntityType {
                        line: self.line,
                        value,
                    })
                }
            }
        }

        debug!(
            "read turn: {} hero(es), {} monster(s), mana {}",
            heroes.len(),
            monsters.len(),
            me.mana
        );

        Ok(Some(TurnState::new(me, enemy, heroes, monsters)))
    }

    fn record<const N: usize>(&mut self, expected: &'static str) -> Result<[i32; N], ProtocolError> {
        self.next_record(expected)?
            .ok_or(ProtocolError::UnexpectedEof {
                line: self.line,
                expected,
            })
    }

    fn next_record<const N: usize>(
        &mut self,
        record: &'static str,
    ) -> Result<Option<[i32; N]>, ProtocolError> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_line(&mut self.buffer)
                .map_err(|source| ProtocolError::Io {
                    line: self.line + 1,
                    source,
                })?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;
            if !self.buffer.trim().is_empty() {
                break;
            }
        }

        let line = self.line;
        let mut fields = [0; N];
        let mut found = 0;
        for token in self.buffer.split_whitespace() {
            if found < N {
                fields[found] = token
                    .parse()
                    .map_err(|source| ProtocolError::InvalidInteger {
                        line,
                        token: token.to_owned(),
                        source,
                    })?;
            }
            found += 1;
        }

        if found != N {
            return Err(ProtocolError::FieldCount {
                line,
                record,
                expected: N,
                found,
            });
        }

        Ok(Some(fields))
    }

    fn non_negative(&self, field: &'static str, value: i32) -> Result<u32, ProtocolError> {
        u32::try_from(value).map_err(|_| ProtocolError::Negative {
            line: self.line,
            field,
            value,
        })
    }

    fn flag(&self, field: &'static str, value: i32) -> Result<bool, ProtocolError> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ProtocolError::InvalidFlag {
                line: self.line,
                field,
                value,
            }),
        }
    }
}

/// Formats a decision as the command line understood by the referee.
#[must_use]
pub fn render(decision: &Decision) -> String {
    match decision {
        Decision::Move { destination } => format!("MOVE {} {}", destination.x(), destination.y()),
        Decision::Wait => "WAIT".to_owned(),
        Decision::Control {
            monster,
            destination,
        } => format!(
            "SPELL CONTROL {} {} {}",
            monster.get(),
            destination.x(),
            destination.y()
        ),
        Decision::Wind { destination } => {
            format!("SPELL WIND {} {}", destination.x(), destination.y())
        }
        Decision::Shield { target } => format!("SPELL SHIELD {}", target.get()),
    }
}

/// Writes one command line per decision, ordered by hero id, then flushes.
///
/// The referee matches lines to heroes by position, so the order is fixed
/// regardless of the order the decisions were produced in.
pub fn write_decisions<W: Write>(out: &mut W, decisions: &[HeroDecision]) -> io::Result<()> {
    let mut ordered = decisions.to_vec();
    ordered.sort_by_key(|entry| entry.hero);
    for entry in &ordered {
        writeln!(out, "{}", render(&entry.decision))?;
    }
    out.flush()
}
