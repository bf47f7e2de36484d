use crate::logic::catalog::{self, UnitArchetype};
use crate::logic::generator::TeamGenerator;
use serde::{Deserialize, Serialize};

pub const GRID_SIZE: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Row the team deploys on at the start of a match.
    #[must_use]
    pub const fn home_row(self) -> i32 {
        match self {
            Self::A => 0,
            Self::B => GRID_SIZE - 1,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub team: Team,
    pub hp: u32,
    #[serde(rename = "atk")]
    pub attack_power: u32,
    pub move_range: u32,
    pub moves_left: u32,
    pub has_attacked: bool,
}

impl Unit {
    #[must_use]
    pub fn spawn(id: u32, archetype: &UnitArchetype, team: Team, x: i32, y: i32) -> Self {
        Self {
            id,
            name: archetype.name.to_string(),
            x,
            y,
            team,
            hp: archetype.max_hp,
            attack_power: archetype.attack_power,
            move_range: archetype.move_range,
            moves_left: archetype.move_range,
            has_attacked: false,
        }
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    #[must_use]
    pub fn archetype(&self) -> Option<&'static UnitArchetype> {
        catalog::archetype(&self.name)
    }

    /// Restores per-turn resources to the archetype's allowance.
    pub fn refresh(&mut self) {
        if let Some(archetype) = self.archetype() {
            self.moves_left = archetype.move_range;
        }
        self.has_attacked = false;
    }
}

#[must_use]
pub const fn manhattan(ax: i32, ay: i32, bx: i32, by: i32) -> u32 {
    ax.abs_diff(bx) + ay.abs_diff(by)
}

#[must_use]
pub const fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && x < GRID_SIZE && y >= 0 && y < GRID_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    #[serde(rename = "characters")]
    pub units: Vec<Unit>,
    pub turn: Team,
    pub winner: Option<Team>,
}

impl MatchState {
    /// Fresh match: team A on row 0, team B on the far edge, A to move.
    #[must_use]
    pub fn new_match(generator: &mut TeamGenerator) -> Self {
        let mut units = generator.generate(Team::A, Team::A.home_row());
        units.extend(generator.generate(Team::B, Team::B.home_row()));
        Self {
            units,
            turn: Team::A,
            winner: None,
        }
    }

    #[must_use]
    pub fn unit(&self, id: u32) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    #[must_use]
    pub fn has_living(&self, team: Team) -> bool {
        self.units.iter().any(|u| u.team == team && u.is_alive())
    }

    /// The side left standing when exactly one side has been wiped out.
    #[must_use]
    pub fn last_team_standing(&self) -> Option<Team> {
        match (self.has_living(Team::A), self.has_living(Team::B)) {
            (true, false) => Some(Team::A),
            (false, true) => Some(Team::B),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.winner.is_some()
    }
}
