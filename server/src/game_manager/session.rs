use duelgrid_core::{MatchState, Team};
use std::collections::HashMap;

pub struct Room {
    pub id: String,
    pub members: HashMap<String, Team>,
    pub state: MatchState,
}

impl Room {
    pub fn new(id: String, player_a: &str, player_b: &str, state: MatchState) -> Self {
        let members = HashMap::from([
            (player_a.to_string(), Team::A),
            (player_b.to_string(), Team::B),
        ]);
        Self { id, members, state }
    }

    pub fn team_of(&self, player_id: &str) -> Option<Team> {
        self.members.get(player_id).copied()
    }

    /// Any member currently playing `team`.
    pub fn member_on(&self, team: Team) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, t)| **t == team)
            .map(|(id, _)| id.as_str())
    }

    pub fn others<'a>(&'a self, player_id: &'a str) -> impl Iterator<Item = (&'a str, Team)> + 'a {
        self.members
            .iter()
            .filter(move |(id, _)| id.as_str() != player_id)
            .map(|(id, team)| (id.as_str(), *team))
    }
}
