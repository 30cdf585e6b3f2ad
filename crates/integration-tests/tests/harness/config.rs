//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use crafter_config::{Config, HealthConfig, HubConfig, ResponseConfig, ServerConfig};
use crafter_core::NamingConvention;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with public visibility and no conversion
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                    hub: HubConfig::default(),
                },
                response: ResponseConfig {
                    visibility: Some("Public".to_owned()),
                    naming_convention: NamingConvention::Default,
                },
                telemetry: None,
            },
        }
    }

    /// Expose verbose diagnostics for unclassified errors
    pub fn private(mut self) -> Self {
        self.config.response.visibility = Some("Private".to_owned());
        self
    }

    /// Set the naming convention applied to messages
    pub fn with_convention(mut self, convention: NamingConvention) -> Self {
        self.config.response.naming_convention = convention;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Disable the hub endpoint
    pub fn without_hub(mut self) -> Self {
        self.config.server.hub.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
