use crate::logic::board::{in_bounds, manhattan, MatchState, Team, Unit};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Why a per-unit check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("team changed")]
    TeamChanged,
    #[error("position is off the grid")]
    OffGrid,
    #[error("unit has no known archetype")]
    UnknownArchetype,
    #[error("movesLeft increased")]
    MovesIncreased,
    #[error("moved further than its remaining moves")]
    MovedTooFar,
    #[error("movesLeft not decreased by the distance moved")]
    MovesMismatch,
    #[error("attack status reverted")]
    AttackReverted,
    #[error("moved outside its own turn")]
    MovedOffTurn,
    #[error("not reset for the new turn")]
    NotReset,
    #[error("living unit missing from the proposal")]
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Malformed update: {0}")]
    MalformedProposal(String),
    #[error("It is not your turn.")]
    NotYourTurn { acting: Team, turn: Team },
    #[error("The match is already over.")]
    MatchOver,
    #[error("Unknown unit id {0}.")]
    UnknownUnit(u32),
    #[error("Unit {unit_id}: {violation}.")]
    Invariant { unit_id: u32, violation: Violation },
    #[error("Two units occupy ({x}, {y}).")]
    OccupancyConflict { x: i32, y: i32 },
    #[error("Unit {attacker} attacked without a full-power hit on an adjacent enemy.")]
    UnsubstantiatedAttack { attacker: u32 },
}

/// Coarse taxonomy of rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    MalformedProposal,
    TurnViolation,
    UnknownUnit,
    InvariantViolation,
    OccupancyConflict,
    UnsubstantiatedAttack,
}

impl Rejection {
    #[must_use]
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::MalformedProposal(_) => RejectionKind::MalformedProposal,
            Self::NotYourTurn { .. } | Self::MatchOver => RejectionKind::TurnViolation,
            Self::UnknownUnit(_) => RejectionKind::UnknownUnit,
            Self::Invariant { .. } => RejectionKind::InvariantViolation,
            Self::OccupancyConflict { .. } => RejectionKind::OccupancyConflict,
            Self::UnsubstantiatedAttack { .. } => RejectionKind::UnsubstantiatedAttack,
        }
    }

    const fn invariant(unit_id: u32, violation: Violation) -> Self {
        Self::Invariant { unit_id, violation }
    }
}

/// The parts of a unit a client is allowed to propose. Anything else on the
/// wire (`name`, `atk`, `sprite`, ...) is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitProposal {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub team: Team,
    pub hp: u32,
    pub moves_left: u32,
    pub has_attacked: bool,
}

impl From<&Unit> for UnitProposal {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            x: unit.x,
            y: unit.y,
            team: unit.team,
            hp: unit.hp,
            moves_left: unit.moves_left,
            has_attacked: unit.has_attacked,
        }
    }
}

#[derive(Deserialize)]
struct RawProposal {
    characters: Option<Vec<UnitProposal>>,
    turn: Option<Team>,
}

/// A typed `updateGame` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateProposal {
    pub units: Vec<UnitProposal>,
    pub turn: Team,
}

impl StateProposal {
    /// Parses a raw payload, rejecting anything that does not have the
    /// expected shape before any game rule is looked at.
    ///
    /// # Errors
    ///
    /// `MalformedProposal` on missing or mistyped fields, negative counts,
    /// unknown team labels, or a unit id listed twice.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, Rejection> {
        let raw = RawProposal::deserialize(value)
            .map_err(|e| Rejection::MalformedProposal(e.to_string()))?;
        let units = raw
            .characters
            .ok_or_else(|| Rejection::MalformedProposal("missing characters".to_string()))?;
        let turn = raw
            .turn
            .ok_or_else(|| Rejection::MalformedProposal("missing turn".to_string()))?;

        let mut seen = HashSet::with_capacity(units.len());
        if let Some(dup) = units.iter().find(|u| !seen.insert(u.id)) {
            return Err(Rejection::MalformedProposal(format!(
                "unit id {} listed twice",
                dup.id
            )));
        }

        Ok(Self { units, turn })
    }

    /// Proposal that restates `state` unchanged.
    #[must_use]
    pub fn from_state(state: &MatchState) -> Self {
        Self {
            units: state.units.iter().map(UnitProposal::from).collect(),
            turn: state.turn,
        }
    }

    #[must_use]
    pub fn unit(&self, id: u32) -> Option<&UnitProposal> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: u32) -> Option<&mut UnitProposal> {
        self.units.iter_mut().find(|u| u.id == id)
    }
}

/// Judges whether `proposal` is reachable from `current` by legal moves and
/// attacks of `acting`, returning the canonical next state if so.
///
/// # Errors
///
/// The first [`Rejection`] found; `current` is left as it was.
pub fn validate(
    current: &MatchState,
    proposal: &StateProposal,
    acting: Team,
) -> Result<MatchState, Rejection> {
    let result = check_transition(current, proposal, acting);
    if let Err(rejection) = &result {
        log::debug!("Rejected update from team {acting}: {rejection}");
    }
    result
}

fn check_transition(
    current: &MatchState,
    proposal: &StateProposal,
    acting: Team,
) -> Result<MatchState, Rejection> {
    if acting != current.turn {
        return Err(Rejection::NotYourTurn {
            acting,
            turn: current.turn,
        });
    }
    if current.is_over() {
        return Err(Rejection::MatchOver);
    }

    // Only two teams, so a changed turn always names the opponent.
    let incoming = (proposal.turn != current.turn).then_some(proposal.turn);

    let mut proposed = HashMap::with_capacity(proposal.units.len());
    for p in &proposal.units {
        let old = current.unit(p.id).ok_or(Rejection::UnknownUnit(p.id))?;
        let next = check_unit(old, p, incoming)?;
        proposed.insert(p.id, next);
    }

    check_occupancy(proposal.units.iter().filter_map(|p| proposed.get(&p.id)))?;
    let killed = check_attacks(current, &proposed)?;

    let mut units = Vec::with_capacity(current.units.len());
    for old in &current.units {
        match proposed.remove(&old.id) {
            Some(next) => units.push(next),
            None if !old.is_alive() => units.push(old.clone()),
            None if killed.contains(&old.id) => units.push(Unit {
                hp: 0,
                ..old.clone()
            }),
            None => return Err(Rejection::invariant(old.id, Violation::Missing)),
        }
    }

    check_turn_transition(current, &units, proposal.turn)?;

    let mut next = MatchState {
        units,
        turn: proposal.turn,
        winner: None,
    };
    let standing = next.last_team_standing();
    next.winner = current.winner.or(standing);
    Ok(next)
}

/// Per-unit consistency. Returns the unit as it will be committed: identity
/// and stats from authority, position and resources from the proposal, HP
/// clamped to the archetype maximum.
fn check_unit(old: &Unit, p: &UnitProposal, incoming: Option<Team>) -> Result<Unit, Rejection> {
    let fail = |violation| Err(Rejection::invariant(old.id, violation));

    let Some(archetype) = old.archetype() else {
        return fail(Violation::UnknownArchetype);
    };
    if p.team != old.team {
        return fail(Violation::TeamChanged);
    }
    if !in_bounds(p.x, p.y) {
        return fail(Violation::OffGrid);
    }

    let hp = p.hp.min(archetype.max_hp);
    if hp != p.hp {
        log::debug!("Clamped hp of unit {} from {} to {}", old.id, p.hp, hp);
    }

    let distance = manhattan(old.x, old.y, p.x, p.y);
    if incoming == Some(old.team) {
        // Resources of the team about to move are checked against the reset
        // rule instead; they must not have moved in the meantime.
        if distance != 0 {
            return fail(Violation::MovedOffTurn);
        }
    } else {
        if p.moves_left > old.moves_left {
            return fail(Violation::MovesIncreased);
        }
        if distance > old.moves_left {
            return fail(Violation::MovedTooFar);
        }
        if p.moves_left != old.moves_left - distance {
            return fail(Violation::MovesMismatch);
        }
        if old.has_attacked && !p.has_attacked {
            return fail(Violation::AttackReverted);
        }
    }

    Ok(Unit {
        x: p.x,
        y: p.y,
        hp,
        moves_left: p.moves_left,
        has_attacked: p.has_attacked,
        ..old.clone()
    })
}

fn check_occupancy<'a>(units: impl Iterator<Item = &'a Unit>) -> Result<(), Rejection> {
    let mut occupied = HashSet::new();
    for unit in units.filter(|u| u.is_alive()) {
        if !occupied.insert((unit.x, unit.y)) {
            return Err(Rejection::OccupancyConflict {
                x: unit.x,
                y: unit.y,
            });
        }
    }
    Ok(())
}

/// Every unit that newly raised its attack flag must have landed a
/// full-power hit on an enemy adjacent to where it stood before the update.
/// Returns the ids of omitted enemies accounted for as lethal hits.
fn check_attacks(
    current: &MatchState,
    proposed: &HashMap<u32, Unit>,
) -> Result<HashSet<u32>, Rejection> {
    let mut killed = HashSet::new();

    let mut attackers: Vec<&Unit> = proposed
        .values()
        .filter(|next| next.has_attacked && next.is_alive())
        .filter(|next| current.unit(next.id).is_some_and(|old| !old.has_attacked))
        .collect();
    attackers.sort_by_key(|u| u.id);

    for attacker in attackers {
        let Some(old) = current.unit(attacker.id) else {
            continue;
        };
        let attack_power = old
            .archetype()
            .map_or(old.attack_power, |a| a.attack_power);

        let mut substantiated = false;
        for enemy in current.units.iter().filter(|e| {
            e.team != old.team && e.is_alive() && manhattan(e.x, e.y, old.x, old.y) == 1
        }) {
            let lethal = enemy.hp <= attack_power;
            match proposed.get(&enemy.id) {
                None if lethal => {
                    substantiated = true;
                    killed.insert(enemy.id);
                    break;
                }
                Some(after) if (!after.is_alive() && lethal)
                    || enemy.hp.checked_sub(after.hp) == Some(attack_power) =>
                {
                    substantiated = true;
                    break;
                }
                _ => {}
            }
        }

        if !substantiated {
            return Err(Rejection::UnsubstantiatedAttack {
                attacker: attacker.id,
            });
        }
    }

    Ok(killed)
}

fn check_turn_transition(current: &MatchState, units: &[Unit], turn: Team) -> Result<(), Rejection> {
    let turn_changed = turn != current.turn;

    for unit in units {
        let Some(prior) = current.unit(unit.id) else {
            continue;
        };
        let fail = |violation| Err(Rejection::invariant(unit.id, violation));

        if turn_changed && unit.team == turn {
            let full = unit.archetype().map_or(unit.move_range, |a| a.move_range);
            let reset = unit.moves_left == full && !unit.has_attacked;
            // The fallen are not refreshed, but may be shown either way.
            let untouched = !unit.is_alive()
                && unit.moves_left == prior.moves_left
                && unit.has_attacked == prior.has_attacked;
            if !(reset || untouched) {
                return fail(Violation::NotReset);
            }
        } else if turn_changed || unit.team == current.turn {
            if unit.moves_left > prior.moves_left {
                return fail(Violation::MovesIncreased);
            }
            if prior.has_attacked && !unit.has_attacked {
                return fail(Violation::AttackReverted);
            }
        }
    }

    Ok(())
}
