use crate::game_manager::{GameManager, Room};
use crate::hub::Tx;
use shared::{GameOverReason, ServerMessage};

impl GameManager {
    /// New connection: register its channel and put it in line for a match.
    pub fn add_player(&mut self, id: String, tx: Tx) {
        tracing::info!(player_id = %id, "Player connected");
        self.hub.register(id.clone(), tx);
        self.queue_for_match(&id);
    }

    /// Connection closed. The opponent, if the match was still live, wins by
    /// forfeit; the room itself goes away once nobody is left in it.
    pub fn remove_player(&mut self, id: &str) {
        tracing::info!(player_id = %id, "Player disconnected");
        self.hub.unregister(id);
        self.waiting_queue.retain(|queued| queued != id);

        let Some(room_id) = self.player_to_room.remove(id) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return;
        };
        room.members.remove(id);

        let remaining: Vec<_> = room.others(id).map(|(p, t)| (p.to_string(), t)).collect();
        for (winner_id, team) in remaining {
            if room.state.declare_winner(team) {
                tracing::info!(room_id = %room_id, winner_id = %winner_id, "Win by forfeit");
                self.hub.send_to(
                    &winner_id,
                    ServerMessage::GameOver {
                        winner_id: winner_id.clone(),
                        reason: Some(GameOverReason::OpponentDisconnected),
                    },
                );
            } else {
                tracing::debug!(room_id = %room_id, "Opponent left a finished match");
            }
        }

        if room.members.is_empty() {
            self.rooms.remove(&room_id);
            tracing::info!(room_id = %room_id, "Deleted empty room");
        }
    }

    /// Everyone else in the room wins; the room is closed and nobody is
    /// queued again until they ask for it.
    pub fn handle_surrender(&mut self, player_id: &str) {
        let Some(room_id) = self.player_to_room.get(player_id).cloned() else {
            tracing::debug!(player_id = %player_id, "surrender: no room found");
            return;
        };
        let Some(room) = self.rooms.get(&room_id) else {
            return;
        };
        tracing::info!(player_id = %player_id, room_id = %room_id, "Player surrendered");

        for (winner_id, _) in room.others(player_id) {
            self.hub.broadcast(
                &room_id,
                &ServerMessage::GameOver {
                    winner_id: winner_id.to_string(),
                    reason: Some(GameOverReason::Surrender),
                },
            );
        }
        for member in room.members.keys() {
            self.hub.send_to(member, ServerMessage::GameEnded {});
        }

        self.teardown_room(&room_id);
    }

    /// Rematch request. The requester's room is dissolved for all of its
    /// members, but only the requester goes back in the queue.
    pub fn handle_play_again(&mut self, player_id: &str) {
        tracing::info!(player_id = %player_id, "Player asked to play again");
        if let Some(room_id) = self.player_to_room.get(player_id).cloned() {
            self.teardown_room(&room_id);
        }
        self.queue_for_match(player_id);
    }

    /// Removes a room and every trace of its members' membership.
    pub fn teardown_room(&mut self, room_id: &str) -> Option<Room> {
        let room = self.rooms.remove(room_id)?;
        for member in room.members.keys() {
            self.player_to_room.remove(member);
            self.waiting_queue.retain(|queued| queued != member);
            self.hub.leave(room_id, member);
        }
        tracing::info!(room_id = %room.id, "Room torn down");
        Some(room)
    }
}
