use anyhow::{Context, Result};
use clap::Parser;
use rendezvous_core::IceServerConfig;
use rendezvous_server::{RelayConfig, SignalingService};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rendezvous")]
#[command(version, about = "Room-scoped WebRTC signaling relay")]
struct Cli {
    /// Address to accept WebSocket connections on.
    #[arg(long, env = "RENDEZVOUS_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "RENDEZVOUS_LOG", default_value = "info")]
    log_level: String,

    #[arg(long = "stun-url", env = "STUN_URL", value_delimiter = ',')]
    stun_urls: Vec<String>,

    #[arg(long = "turn-url", env = "TURN_URL", value_delimiter = ',')]
    turn_urls: Vec<String>,

    #[arg(long, env = "TURN_USERNAME")]
    turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL")]
    turn_credential: Option<String>,
}

impl Cli {
    fn relay_config(&self) -> RelayConfig {
        let mut config = RelayConfig::default().with_bind(self.bind);

        if !self.stun_urls.is_empty() {
            config = config.with_ice_server(IceServerConfig {
                urls: self.stun_urls.clone(),
                username: None,
                credential: None,
            });
        }

        if !self.turn_urls.is_empty() {
            config = config.with_ice_server(IceServerConfig {
                urls: self.turn_urls.clone(),
                username: self.turn_username.clone(),
                credential: self.turn_credential.clone(),
            });
        }

        config
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = cli.relay_config();
    info!(
        "Starting relay with {} ICE server entries",
        config.ice_servers.len()
    );

    let service = SignalingService::new(config.ice_servers.clone());

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    rendezvous_server::serve(listener, service)
        .await
        .context("Relay server stopped")?;

    Ok(())
}
