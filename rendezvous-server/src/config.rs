use rendezvous_core::IceServerConfig;
use std::net::SocketAddr;

/// Runtime settings for one relay process.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    /// Handed to every client right after `welcome`. Empty means the browser
    /// falls back to its own defaults.
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            ice_servers: Vec::new(),
        }
    }
}

impl RelayConfig {
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_ice_server(mut self, server: IceServerConfig) -> Self {
        self.ice_servers.push(server);
        self
    }
}
