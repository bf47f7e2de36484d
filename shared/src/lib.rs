use duelgrid_core::{MatchState, Team};
use serde::{Deserialize, Serialize};

/// Every frame on the socket is `{ "event": <name>, "data": <payload> }`.
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Raw proposal; shape is checked by the validator so a bad payload can
    /// be answered with `invalidUpdate` instead of being dropped.
    UpdateGame(serde_json::Value),
    EndTurn,
    Surrender,
    PlayAgain,
}

impl ClientMessage {
    pub fn from_text(text: &str) -> Result<Self, ProtocolError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        // Payloads of the other events carry nothing the server reads.
        match envelope.event.as_str() {
            "updateGame" => Ok(Self::UpdateGame(envelope.data)),
            "endTurn" => Ok(Self::EndTurn),
            "surrender" => Ok(Self::Surrender),
            "playAgain" => Ok(Self::PlayAgain),
            _ => Err(ProtocolError::UnknownEvent(envelope.event)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameOverReason {
    Victory,
    Surrender,
    OpponentDisconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    AssignTeam(Team),
    StartGame {
        #[serde(rename = "roomId")]
        room_id: String,
        players: [String; 2],
    },
    GameState(MatchState),
    InvalidUpdate(String),
    GameOver {
        #[serde(rename = "winnerId")]
        winner_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<GameOverReason>,
    },
    GameEnded {},
    WaitingForOpponent {},
}

impl ServerMessage {
    /// Event name as it appears on the wire.
    #[must_use]
    pub const fn event(&self) -> &'static str {
        match self {
            Self::AssignTeam(_) => "assignTeam",
            Self::StartGame { .. } => "startGame",
            Self::GameState(_) => "gameState",
            Self::InvalidUpdate(_) => "invalidUpdate",
            Self::GameOver { .. } => "gameOver",
            Self::GameEnded {} => "gameEnded",
            Self::WaitingForOpponent {} => "waitingForOpponent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_client_events() {
        let update = ClientMessage::from_text(
            r#"{"event":"updateGame","data":{"characters":[],"turn":"A"}}"#,
        )
        .unwrap();
        assert_eq!(
            update,
            ClientMessage::UpdateGame(json!({ "characters": [], "turn": "A" }))
        );

        assert_eq!(
            ClientMessage::from_text(r#"{"event":"endTurn"}"#).unwrap(),
            ClientMessage::EndTurn
        );
        // The stock client sends a payload with surrender; it is ignored.
        assert_eq!(
            ClientMessage::from_text(r#"{"event":"surrender","data":{"winner":"B"}}"#).unwrap(),
            ClientMessage::Surrender
        );
        assert_eq!(
            ClientMessage::from_text(r#"{"event":"playAgain","data":{}}"#).unwrap(),
            ClientMessage::PlayAgain
        );
    }

    #[test]
    fn rejects_unknown_and_garbage_frames() {
        assert!(matches!(
            ClientMessage::from_text(r#"{"event":"cheat"}"#),
            Err(ProtocolError::UnknownEvent(e)) if e == "cheat"
        ));
        assert!(matches!(
            ClientMessage::from_text("not json"),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn server_events_match_wire_contract() {
        let assign = serde_json::to_value(ServerMessage::AssignTeam(Team::B)).unwrap();
        assert_eq!(assign, json!({ "event": "assignTeam", "data": "B" }));

        let start = serde_json::to_value(ServerMessage::StartGame {
            room_id: "r1".to_string(),
            players: ["p1".to_string(), "p2".to_string()],
        })
        .unwrap();
        assert_eq!(
            start,
            json!({ "event": "startGame", "data": { "roomId": "r1", "players": ["p1", "p2"] } })
        );

        let over = serde_json::to_value(ServerMessage::GameOver {
            winner_id: "p2".to_string(),
            reason: None,
        })
        .unwrap();
        assert_eq!(over, json!({ "event": "gameOver", "data": { "winnerId": "p2" } }));

        let forfeit = serde_json::to_value(ServerMessage::GameOver {
            winner_id: "p2".to_string(),
            reason: Some(GameOverReason::OpponentDisconnected),
        })
        .unwrap();
        assert_eq!(forfeit["data"]["reason"], "opponentDisconnected");

        let ended = serde_json::to_value(ServerMessage::GameEnded {}).unwrap();
        assert_eq!(ended, json!({ "event": "gameEnded", "data": {} }));

        let invalid = ServerMessage::InvalidUpdate("nope".to_string());
        assert_eq!(
            serde_json::to_value(&invalid).unwrap()["event"],
            invalid.event()
        );
    }
}
