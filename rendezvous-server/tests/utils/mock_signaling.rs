use async_trait::async_trait;
use rendezvous_core::{ConnectionId, ServerSignal};
use rendezvous_server::SignalingOutput;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// One signal handed to the output, with its addressee.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub to: ConnectionId,
    pub signal: ServerSignal,
}

/// Mock SignalingOutput that captures all outgoing signals.
#[derive(Clone)]
pub struct MockSignalingOutput {
    /// Channel to send captured deliveries.
    tx: mpsc::UnboundedSender<Delivery>,
    /// All captured deliveries (for verification).
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl MockSignalingOutput {
    /// Create a new MockSignalingOutput and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let output = Self {
            tx,
            deliveries: Arc::new(Mutex::new(Vec::new())),
        };
        (output, rx)
    }

    /// Create a MockSignalingOutput without a receiver (deliveries are only stored).
    pub fn new_stored_only() -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        Self {
            tx,
            deliveries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All signals addressed to one connection, in delivery order.
    pub async fn signals_for(&self, connection_id: &ConnectionId) -> Vec<ServerSignal> {
        self.deliveries
            .lock()
            .await
            .iter()
            .filter(|d| &d.to == connection_id)
            .map(|d| d.signal.clone())
            .collect()
    }

    /// Every connection that received at least one signal.
    pub async fn recipients(&self) -> HashSet<ConnectionId> {
        self.deliveries
            .lock()
            .await
            .iter()
            .map(|d| d.to.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.deliveries.lock().await.len()
    }

    pub async fn clear(&self) {
        self.deliveries.lock().await.clear();
    }
}

impl Default for MockSignalingOutput {
    fn default() -> Self {
        Self::new_stored_only()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn deliver(&self, connection_id: &ConnectionId, signal: ServerSignal) {
        tracing::debug!("[MockSignaling] deliver to {}", connection_id);

        let delivery = Delivery {
            to: connection_id.clone(),
            signal,
        };

        self.deliveries.lock().await.push(delivery.clone());
        let _ = self.tx.send(delivery);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_captures_delivery() {
        let (output, mut rx) = MockSignalingOutput::new();
        let to = ConnectionId::new();
        let joined = ConnectionId::new();
        let signal = ServerSignal::UserJoined {
            connection_id: joined,
        };

        output.deliver(&to, signal.clone()).await;

        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.to, to);
        assert_eq!(output.signals_for(&to).await, vec![signal]);
    }
}
