use crate::model::connection::ConnectionId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Frames a browser sends to the relay.
///
/// Session descriptions and candidates are carried as raw JSON and never
/// looked at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientSignal {
    JoinRoom { room_id: RoomId },
    LeaveRoom { room_id: RoomId },
    Offer { room_id: RoomId, offer: Value },
    Answer { room_id: RoomId, answer: Value },
    IceCandidate { room_id: RoomId, candidate: Value },
}

impl ClientSignal {
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::JoinRoom { room_id }
            | Self::LeaveRoom { room_id }
            | Self::Offer { room_id, .. }
            | Self::Answer { room_id, .. }
            | Self::IceCandidate { room_id, .. } => room_id,
        }
    }

    /// Event name as it appears on the wire.
    pub fn op(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join-room",
            Self::LeaveRoom { .. } => "leave-room",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
        }
    }
}

/// Frames the relay sends to a browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerSignal {
    Welcome {
        connection_id: ConnectionId,
    },
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    UserJoined {
        connection_id: ConnectionId,
    },
    UserLeft {
        connection_id: ConnectionId,
    },
    Offer {
        offer: Value,
        connection_id: ConnectionId,
    },
    Answer {
        answer: Value,
        connection_id: ConnectionId,
    },
    IceCandidate {
        candidate: Value,
        connection_id: ConnectionId,
    },
}
