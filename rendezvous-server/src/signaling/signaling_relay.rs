use crate::registry::ConnectionRegistry;
use crate::room::{LifecycleNotifier, RoomMembershipTable};
use crate::signaling::SignalingOutput;
use rendezvous_core::{ClientSignal, ConnectionId, RoomId, ServerSignal};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Routes inbound signals to the other members of a room.
///
/// The relay is a fan-out router. Offers, answers and candidates go to every
/// member except the sender, stamped with the sender's id, and are never
/// inspected. In rooms with more than two members each client has to run one
/// peer connection per remote member (full mesh); the relay keeps no
/// per-pair negotiation state.
pub struct SignalingRelay {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<RoomMembershipTable>,
    output: Arc<dyn SignalingOutput>,
    notifier: LifecycleNotifier,
}

impl SignalingRelay {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        rooms: Arc<RoomMembershipTable>,
        output: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            registry,
            rooms,
            notifier: LifecycleNotifier::new(output.clone()),
            output,
        }
    }

    pub fn rooms(&self) -> &RoomMembershipTable {
        &self.rooms
    }

    pub async fn handle(&self, from: &ConnectionId, signal: ClientSignal) {
        match signal {
            ClientSignal::JoinRoom { room_id } => self.join(from, room_id).await,

            ClientSignal::LeaveRoom { room_id } => self.leave(from, &room_id).await,

            ClientSignal::Offer { room_id, offer } => {
                let out = ServerSignal::Offer {
                    offer,
                    connection_id: from.clone(),
                };
                self.forward(from, &room_id, out).await;
            }

            ClientSignal::Answer { room_id, answer } => {
                let out = ServerSignal::Answer {
                    answer,
                    connection_id: from.clone(),
                };
                self.forward(from, &room_id, out).await;
            }

            ClientSignal::IceCandidate { room_id, candidate } => {
                let out = ServerSignal::IceCandidate {
                    candidate,
                    connection_id: from.clone(),
                };
                self.forward(from, &room_id, out).await;
            }
        }
    }

    /// Unregisters the connection and removes it from every room it was in.
    pub async fn disconnect(&self, connection_id: &ConnectionId) {
        let rooms = self.registry.unregister(connection_id);

        for room_id in rooms {
            self.remove_member(connection_id, &room_id).await;
        }
    }

    async fn join(&self, from: &ConnectionId, room_id: RoomId) {
        // Membership first: a disconnect that unregisters in between either
        // sees the tracked room or makes `track_room` fail below.
        let members = self.rooms.join(&room_id, from);

        if !self.registry.track_room(from, room_id.clone()) {
            self.rooms.leave(&room_id, from);
            warn!("Ignoring join to '{}' from unregistered {}", room_id, from);
            return;
        }

        info!(
            "Connection {} joined room '{}' ({} members)",
            from,
            room_id,
            members.len()
        );

        self.notifier.notify_joined(&room_id, from, &members).await;
    }

    async fn leave(&self, from: &ConnectionId, room_id: &RoomId) {
        self.registry.untrack_room(from, room_id);
        self.remove_member(from, room_id).await;
    }

    async fn remove_member(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        let Some(remaining) = self.rooms.leave(room_id, connection_id) else {
            return;
        };
        info!("Connection {} left room '{}'", connection_id, room_id);

        self.notifier
            .notify_left(room_id, connection_id, &remaining)
            .await;
    }

    async fn forward(&self, from: &ConnectionId, room_id: &RoomId, signal: ServerSignal) -> usize {
        let recipients: Vec<ConnectionId> = self
            .rooms
            .members_of(room_id)
            .into_iter()
            .filter(|member| member != from)
            .collect();

        for recipient in &recipients {
            self.output.deliver(recipient, signal.clone()).await;
        }

        debug!(
            "Forwarded signal from {} in room '{}' to {} peers",
            from,
            room_id,
            recipients.len()
        );
        recipients.len()
    }
}
