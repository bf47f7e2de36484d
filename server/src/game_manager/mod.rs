use crate::hub::Hub;
use duelgrid_core::TeamGenerator;
use shared::ClientMessage;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod lifecycle;
pub mod matchmaking;
pub mod move_handler;
pub mod session;

pub use session::Room;

/// Shared handle given to every socket task. All registry mutation happens
/// while `game_manager` is locked, one inbound message at a time.
pub struct AppState {
    pub game_manager: Mutex<GameManager>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            game_manager: Mutex::new(GameManager::new(Arc::new(Hub::new()))),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Waiting queue and room registry.
pub struct GameManager {
    pub(crate) hub: Arc<Hub>,
    pub rooms: HashMap<String, Room>,
    pub player_to_room: HashMap<String, String>,
    pub waiting_queue: VecDeque<String>,
    team_generator: TeamGenerator,
}

impl GameManager {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self {
            hub,
            rooms: HashMap::new(),
            player_to_room: HashMap::new(),
            waiting_queue: VecDeque::new(),
            team_generator: TeamGenerator::new(),
        }
    }

    pub fn handle_message(&mut self, player_id: &str, msg: ClientMessage) {
        match msg {
            ClientMessage::UpdateGame(payload) => self.handle_update(player_id, &payload),
            ClientMessage::EndTurn => self.handle_end_turn(player_id),
            ClientMessage::Surrender => self.handle_surrender(player_id),
            ClientMessage::PlayAgain => self.handle_play_again(player_id),
        }
    }

    /// Room id and mutable room for a connection, if it is in a match.
    fn room_of_mut(&mut self, player_id: &str) -> Option<(String, &mut Room)> {
        let room_id = self.player_to_room.get(player_id)?.clone();
        let room = self.rooms.get_mut(&room_id)?;
        Some((room_id, room))
    }
}
