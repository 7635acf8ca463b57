use crate::error::Result;
use crate::signaling::{SignalingService, ws_handler};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Debug, Serialize, PartialEq)]
pub struct HealthReport {
    pub status: &'static str,
    pub connections: usize,
    pub rooms: usize,
}

/// `/ws` for signaling sessions, `/health` for liveness checks. Any origin
/// may connect.
pub fn router(service: SignalingService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(cors)
        .with_state(service)
}

pub async fn serve(listener: TcpListener, service: SignalingService) -> Result<()> {
    info!("Signaling relay listening on {}", listener.local_addr()?);
    axum::serve(listener, router(service)).await?;
    Ok(())
}

async fn health(State(service): State<SignalingService>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        connections: service.connection_count(),
        rooms: service.room_count(),
    })
}
