use crate::error::{RelayError, Result};
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use dashmap::DashMap;
use rendezvous_core::{ConnectionId, RoomId, ServerSignal};
use std::collections::HashSet;
use tokio::sync::mpsc;
use tracing::debug;

struct ConnectionEntry {
    sender: mpsc::UnboundedSender<ServerSignal>,
    rooms: HashSet<RoomId>,
}

/// Live connections of this relay process, keyed by the id handed out at
/// connect time.
///
/// Each entry owns the connection's outbound queue and the set of rooms it
/// currently belongs to.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, ConnectionEntry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session and returns its freshly generated id.
    pub fn register(&self, sender: mpsc::UnboundedSender<ServerSignal>) -> ConnectionId {
        let connection_id = ConnectionId::new();
        self.connections.insert(
            connection_id.clone(),
            ConnectionEntry {
                sender,
                rooms: HashSet::new(),
            },
        );
        connection_id
    }

    /// Drops the session and returns the rooms it was still in. Unknown ids
    /// yield an empty set.
    pub fn unregister(&self, connection_id: &ConnectionId) -> HashSet<RoomId> {
        self.connections
            .remove(connection_id)
            .map(|(_, entry)| entry.rooms)
            .unwrap_or_default()
    }

    /// Records `room_id` in the connection's room set. Returns `false` when
    /// the connection is no longer registered.
    pub fn track_room(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool {
        match self.connections.get_mut(connection_id) {
            Some(mut entry) => {
                entry.rooms.insert(room_id);
                true
            }
            None => false,
        }
    }

    pub fn untrack_room(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        if let Some(mut entry) = self.connections.get_mut(connection_id) {
            entry.rooms.remove(room_id);
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Queues a signal for one connection without waiting on its socket.
    pub fn send(&self, connection_id: &ConnectionId, signal: ServerSignal) -> Result<()> {
        let Some(entry) = self.connections.get(connection_id) else {
            return Err(RelayError::ConnectionClosed(connection_id.clone()));
        };
        entry
            .sender
            .send(signal)
            .map_err(|_| RelayError::ConnectionClosed(connection_id.clone()))
    }
}

#[async_trait]
impl SignalingOutput for ConnectionRegistry {
    async fn deliver(&self, connection_id: &ConnectionId, signal: ServerSignal) {
        if let Err(e) = self.send(connection_id, signal) {
            debug!("Dropping signal: {}", e);
        }
    }
}
