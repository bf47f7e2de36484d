use dashmap::DashMap;
use shared::ServerMessage;
use std::collections::HashSet;
use tokio::sync::mpsc;

pub type Tx = mpsc::UnboundedSender<ServerMessage>;

/// Outbound side of the transport: one channel per live connection, plus
/// named broadcast groups (one per room).
#[derive(Default)]
pub struct Hub {
    connections: DashMap<String, Tx>,
    groups: DashMap<String, HashSet<String>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: String, tx: Tx) {
        self.connections.insert(id, tx);
    }

    /// Drops the connection's channel and every group membership it had.
    pub fn unregister(&self, id: &str) {
        self.connections.remove(id);
        self.groups.retain(|_, members| {
            members.remove(id);
            !members.is_empty()
        });
    }

    pub fn is_connected(&self, id: &str) -> bool {
        self.connections
            .get(id)
            .is_some_and(|tx| !tx.is_closed())
    }

    pub fn send_to(&self, id: &str, msg: ServerMessage) {
        let Some(tx) = self.connections.get(id) else {
            tracing::debug!(player_id = %id, event = msg.event(), "Dropping message for unknown connection");
            return;
        };
        if tx.send(msg).is_err() {
            tracing::debug!(player_id = %id, "Connection channel closed");
        }
    }

    pub fn broadcast(&self, group: &str, msg: &ServerMessage) {
        for id in self.group_members(group) {
            self.send_to(&id, msg.clone());
        }
    }

    pub fn join(&self, group: &str, id: &str) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(id.to_string());
    }

    pub fn leave(&self, group: &str, id: &str) {
        let emptied = self.groups.get_mut(group).is_some_and(|mut members| {
            members.remove(id);
            members.is_empty()
        });
        if emptied {
            self.groups.remove(group);
        }
    }

    pub fn group_members(&self, group: &str) -> HashSet<String> {
        self.groups
            .get(group)
            .map(|m| m.value().clone())
            .unwrap_or_default()
    }
}
