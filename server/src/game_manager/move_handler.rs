use crate::game_manager::GameManager;
use duelgrid_core::{MatchState, Rejection, StateProposal, Team};
use shared::{GameOverReason, ServerMessage};

impl GameManager {
    pub fn handle_update(&mut self, player_id: &str, payload: &serde_json::Value) {
        self.commit(player_id, "updateGame", |state, team| {
            let proposal = StateProposal::from_value(payload)?;
            state.apply_update(&proposal, team)
        });
    }

    pub fn handle_end_turn(&mut self, player_id: &str) {
        self.commit(player_id, "endTurn", MatchState::end_turn);
    }

    /// Runs `transition` against the sender's room. On success the result
    /// replaces the room state and is broadcast; on rejection only the sender
    /// hears about it and the room is left as it was.
    fn commit<F>(&mut self, player_id: &str, event: &'static str, transition: F)
    where
        F: FnOnce(&MatchState, Team) -> Result<MatchState, Rejection>,
    {
        let hub = std::sync::Arc::clone(&self.hub);
        let Some((room_id, room)) = self.room_of_mut(player_id) else {
            tracing::debug!(player_id = %player_id, event, "No room found, ignoring");
            return;
        };
        let Some(team) = room.team_of(player_id) else {
            tracing::warn!(player_id = %player_id, room_id = %room_id, event, "Sender is not a member of its room");
            return;
        };

        match transition(&room.state, team) {
            Ok(next) => {
                let newly_won = room.state.winner.is_none() && next.winner.is_some();
                room.state = next;
                tracing::info!(player_id = %player_id, room_id = %room_id, team = %team, event, turn = %room.state.turn, "Update accepted");
                hub.broadcast(&room_id, &ServerMessage::GameState(room.state.clone()));

                if newly_won {
                    let winner = room
                        .state
                        .winner
                        .and_then(|t| room.member_on(t))
                        .map(str::to_string);
                    if let Some(winner_id) = winner {
                        tracing::info!(room_id = %room_id, winner_id = %winner_id, "Match won");
                        hub.broadcast(
                            &room_id,
                            &ServerMessage::GameOver {
                                winner_id,
                                reason: Some(GameOverReason::Victory),
                            },
                        );
                    }
                }
            }
            Err(rejection) => {
                tracing::info!(player_id = %player_id, room_id = %room_id, team = %team, event, reason = %rejection, kind = ?rejection.kind(), "Update rejected");
                hub.send_to(player_id, ServerMessage::InvalidUpdate(rejection.to_string()));
            }
        }
    }
}
