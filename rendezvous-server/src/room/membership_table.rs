use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rendezvous_core::{ConnectionId, RoomId};
use std::collections::HashSet;
use tracing::{debug, info};

/// Room id to member set.
///
/// Every operation is a single mutation of one map entry under its shard
/// lock, so concurrent joins to the same room never lose a member. Rooms
/// appear on first join and are pruned when the last member leaves.
#[derive(Default)]
pub struct RoomMembershipTable {
    rooms: DashMap<RoomId, HashSet<ConnectionId>>,
}

impl RoomMembershipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the connection and returns the members right after the join,
    /// the joiner included.
    pub fn join(&self, room_id: &RoomId, connection_id: &ConnectionId) -> HashSet<ConnectionId> {
        let mut members = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Creating new room: {}", room_id);
            HashSet::new()
        });

        members.insert(connection_id.clone());
        members.value().clone()
    }

    /// Removes the connection and returns the members that remain, taken in
    /// the same entry operation. `None` when it was not a member.
    pub fn leave(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<HashSet<ConnectionId>> {
        let Entry::Occupied(mut entry) = self.rooms.entry(room_id.clone()) else {
            return None;
        };

        if !entry.get_mut().remove(connection_id) {
            return None;
        }

        if entry.get().is_empty() {
            entry.remove();
            debug!("Room {} is empty, dropping it", room_id);
            return Some(HashSet::new());
        }

        Some(entry.get().clone())
    }

    /// Snapshot of the current members; empty for unknown rooms.
    pub fn members_of(&self, room_id: &RoomId) -> HashSet<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|members| members.value().clone())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
