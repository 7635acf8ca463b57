use async_trait::async_trait;
use rendezvous_core::{ConnectionId, ServerSignal};

/// Outbound side of the relay: whatever can push a signal to one connection.
///
/// Delivery is fire-and-forget. Implementations log failures instead of
/// returning them, since a peer that vanished mid-forward is not an error for
/// the sender.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn deliver(&self, connection_id: &ConnectionId, signal: ServerSignal);
}
