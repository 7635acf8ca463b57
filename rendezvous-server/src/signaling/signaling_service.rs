use crate::error::Result;
use crate::registry::ConnectionRegistry;
use crate::room::RoomMembershipTable;
use crate::signaling::{SignalingOutput, SignalingRelay};
use rendezvous_core::{ClientSignal, ConnectionId, IceServerConfig, RoomId, ServerSignal};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

struct SignalingInner {
    registry: Arc<ConnectionRegistry>,
    relay: SignalingRelay,
    ice_servers: Vec<IceServerConfig>,
}

/// Shared handle used by every socket task.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let rooms = Arc::new(RoomMembershipTable::new());
        let output: Arc<dyn SignalingOutput> = registry.clone();
        let relay = SignalingRelay::new(registry.clone(), rooms, output);

        Self {
            inner: Arc::new(SignalingInner {
                registry,
                relay,
                ice_servers,
            }),
        }
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    /// Registers a new session, greets it with its id and, if any are
    /// configured, the ICE servers to use.
    pub fn connect(&self, tx: mpsc::UnboundedSender<ServerSignal>) -> ConnectionId {
        let connection_id = self.inner.registry.register(tx);

        let welcome = ServerSignal::Welcome {
            connection_id: connection_id.clone(),
        };
        if let Err(e) = self.inner.registry.send(&connection_id, welcome) {
            error!("Failed to greet {}: {}", connection_id, e);
        }

        if !self.inner.ice_servers.is_empty() {
            let ice_config = ServerSignal::IceConfig {
                ice_servers: self.get_ice_servers(),
            };
            if let Err(e) = self.inner.registry.send(&connection_id, ice_config) {
                error!("Failed to send ICE config to {}: {}", connection_id, e);
            }
        }

        connection_id
    }

    /// Decodes one text frame and routes it.
    pub async fn dispatch(&self, from: &ConnectionId, text: &str) -> Result<()> {
        let signal: ClientSignal = serde_json::from_str(text)?;
        debug!(
            "{} from {} for room '{}'",
            signal.op(),
            from,
            signal.room_id()
        );

        self.inner.relay.handle(from, signal).await;
        Ok(())
    }

    pub async fn disconnect(&self, connection_id: &ConnectionId) {
        self.inner.relay.disconnect(connection_id).await;
    }

    pub fn members_of(&self, room_id: &RoomId) -> HashSet<ConnectionId> {
        self.inner.relay.rooms().members_of(room_id)
    }

    pub fn connection_count(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn room_count(&self) -> usize {
        self.inner.relay.rooms().room_count()
    }
}
