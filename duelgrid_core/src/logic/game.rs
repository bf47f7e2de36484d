use crate::logic::board::{MatchState, Team};
use crate::logic::rules::{validate, Rejection, StateProposal};

impl MatchState {
    /// Validates a client proposal and returns the state to commit.
    /// `self` is never touched; callers swap the result in on success.
    ///
    /// # Errors
    ///
    /// Whatever [`validate`] rejects the proposal with.
    pub fn apply_update(&self, proposal: &StateProposal, acting: Team) -> Result<Self, Rejection> {
        validate(self, proposal, acting)
    }

    /// Hands the turn to the opponent without a full state proposal.
    ///
    /// Living units of the incoming team get their moves and attack back.
    /// The outgoing team keeps whatever it has left; nothing is rolled back.
    ///
    /// # Errors
    ///
    /// `NotYourTurn` when `requesting` is not on turn, `MatchOver` once a
    /// winner is set.
    pub fn end_turn(&self, requesting: Team) -> Result<Self, Rejection> {
        if requesting != self.turn {
            return Err(Rejection::NotYourTurn {
                acting: requesting,
                turn: self.turn,
            });
        }
        if self.is_over() {
            return Err(Rejection::MatchOver);
        }

        let turn = self.turn.opposite();
        let mut units = self.units.clone();
        for unit in units.iter_mut().filter(|u| u.team == turn && u.is_alive()) {
            unit.refresh();
        }

        Ok(Self {
            units,
            turn,
            winner: self.winner,
        })
    }

    /// Records `team` as the winner unless a winner is already set.
    /// Returns whether the state changed.
    pub fn declare_winner(&mut self, team: Team) -> bool {
        if self.winner.is_some() {
            return false;
        }
        self.winner = Some(team);
        true
    }
}
