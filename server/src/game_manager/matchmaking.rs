use crate::game_manager::{GameManager, Room};
use duelgrid_core::{MatchState, Team};
use shared::ServerMessage;
use uuid::Uuid;

impl GameManager {
    pub fn enqueue(&mut self, player_id: &str) {
        if self.waiting_queue.iter().any(|id| id == player_id) {
            tracing::debug!(player_id = %player_id, "Player already in queue");
            return;
        }
        self.waiting_queue.push_back(player_id.to_string());
        tracing::info!(player_id = %player_id, queue_len = self.waiting_queue.len(), "Player queued");
    }

    /// Pairs queued players front to back until fewer than two remain.
    pub fn try_match_players(&mut self) {
        while self.waiting_queue.len() >= 2 {
            let (Some(player_a), Some(player_b)) =
                (self.waiting_queue.pop_front(), self.waiting_queue.pop_front())
            else {
                break;
            };

            let a_live = self.hub.is_connected(&player_a);
            let b_live = self.hub.is_connected(&player_b);
            if !(a_live && b_live) {
                tracing::warn!(player_a = %player_a, a_live, player_b = %player_b, b_live, "Dropping stale queue entry");
                // Survivors keep their place at the head of the queue.
                if b_live {
                    self.waiting_queue.push_front(player_b);
                }
                if a_live {
                    self.waiting_queue.push_front(player_a);
                }
                continue;
            }

            self.start_game(&player_a, &player_b);
        }
    }

    /// Queues `player_id` and runs a pairing pass. Only that player is told
    /// to wait if the pass leaves them unmatched.
    pub fn queue_for_match(&mut self, player_id: &str) {
        self.enqueue(player_id);
        self.try_match_players();

        if self.waiting_queue.iter().any(|id| id == player_id) {
            tracing::debug!(player_id = %player_id, "Waiting for an opponent");
            self.hub.send_to(player_id, ServerMessage::WaitingForOpponent {});
        }
    }

    fn new_room_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.rooms.contains_key(&id) {
                return id;
            }
        }
    }

    fn start_game(&mut self, player_a: &str, player_b: &str) {
        let room_id = self.new_room_id();
        let state = MatchState::new_match(&mut self.team_generator);
        let initial = ServerMessage::GameState(state.clone());

        self.rooms.insert(
            room_id.clone(),
            Room::new(room_id.clone(), player_a, player_b, state),
        );
        self.player_to_room
            .insert(player_a.to_string(), room_id.clone());
        self.player_to_room
            .insert(player_b.to_string(), room_id.clone());

        self.hub.join(&room_id, player_a);
        self.hub.join(&room_id, player_b);

        self.hub.send_to(player_a, ServerMessage::AssignTeam(Team::A));
        self.hub.send_to(player_b, ServerMessage::AssignTeam(Team::B));
        self.hub.broadcast(
            &room_id,
            &ServerMessage::StartGame {
                room_id: room_id.clone(),
                players: [player_a.to_string(), player_b.to_string()],
            },
        );
        self.hub.broadcast(&room_id, &initial);

        tracing::info!(room_id = %room_id, team_a = %player_a, team_b = %player_b, "Match started");
    }
}
