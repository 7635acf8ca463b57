use crate::signaling::SignalingOutput;
use rendezvous_core::{ConnectionId, RoomId, ServerSignal};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Tells room members when someone arrives or goes away.
///
/// Notifications are best effort. Nothing orders them against offer/answer
/// traffic, so clients must accept a `user-joined` and an `offer` from the
/// same peer in either order.
#[derive(Clone)]
pub struct LifecycleNotifier {
    output: Arc<dyn SignalingOutput>,
}

impl LifecycleNotifier {
    pub fn new(output: Arc<dyn SignalingOutput>) -> Self {
        Self { output }
    }

    /// Sends `user-joined` to every member of the snapshot except the joiner.
    pub async fn notify_joined(
        &self,
        room_id: &RoomId,
        joined: &ConnectionId,
        members: &HashSet<ConnectionId>,
    ) -> usize {
        let signal = ServerSignal::UserJoined {
            connection_id: joined.clone(),
        };
        let notified = self.announce(joined, members, signal).await;
        debug!("Announced {} in room {} to {} peers", joined, room_id, notified);
        notified
    }

    /// Sends `user-left` to the members that remain.
    pub async fn notify_left(
        &self,
        room_id: &RoomId,
        left: &ConnectionId,
        remaining: &HashSet<ConnectionId>,
    ) -> usize {
        let signal = ServerSignal::UserLeft {
            connection_id: left.clone(),
        };
        let notified = self.announce(left, remaining, signal).await;
        debug!("Told {} peers in room {} that {} left", notified, room_id, left);
        notified
    }

    async fn announce(
        &self,
        subject: &ConnectionId,
        members: &HashSet<ConnectionId>,
        signal: ServerSignal,
    ) -> usize {
        let mut notified = 0;
        for member in members.iter().filter(|member| *member != subject) {
            self.output.deliver(member, signal.clone()).await;
            notified += 1;
        }
        notified
    }
}
