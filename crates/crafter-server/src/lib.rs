//! Transports for classified errors
//!
//! [`ResponseCrafterExt::with_response_crafter`] installs the HTTP error
//! handler on any axum router; [`hub`] serves invocations over a websocket
//! and pushes classified errors back to the caller. [`Server`] assembles both
//! from configuration.

mod error_handler;
mod health;
pub mod hub;

use std::net::SocketAddr;

use axum::Router;
use crafter_config::Config;
use crafter_dispatch::{Dispatcher, Rule};

pub use error_handler::{ResponseCrafterExt, respond_with_errors, write_error};
pub use hub::{Hub, HubArgument, HubArguments, HubCallContext};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

/// Collects application routes, the hub, and extra rules before assembly
pub struct ServerBuilder {
    config: Config,
    routes: Router,
    hub: Option<Hub>,
    dispatcher: Dispatcher,
}

impl ServerBuilder {
    /// Application routes whose errors are classified
    #[must_use]
    pub fn routes(mut self, routes: Router) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    /// Hub served on the configured hub path
    #[must_use]
    pub fn hub(mut self, hub: Hub) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Additional classification rule
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.dispatcher = self.dispatcher.with_rule(rule);
        self
    }

    pub fn build(self) -> Server {
        let listen_address = self
            .config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let mut app = self.routes;

        // Health check
        if self.config.server.health.enabled {
            app = app.route(&self.config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Hub endpoint
        let hub_config = &self.config.server.hub;
        match self.hub {
            Some(hub) if hub_config.enabled => {
                tracing::debug!(hub = %hub.name(), path = %hub_config.path, "hub endpoint registered");
                let state = hub::HubState::new(hub, self.dispatcher.clone(), hub_config.user_id_header.clone());
                app = app.route(&hub_config.path, axum::routing::get(hub::hub_handler).with_state(state));
            }
            Some(hub) => tracing::info!(hub = %hub.name(), "hub disabled by configuration"),
            None => {}
        }

        app = app.with_response_crafter(self.dispatcher);

        Server {
            router: app,
            listen_address,
        }
    }
}

impl Server {
    /// Start assembling a server from configuration
    ///
    /// Visibility and naming convention are resolved here, once.
    pub fn builder(config: Config) -> ServerBuilder {
        let dispatcher = Dispatcher::new(config.response.visibility(), config.response.naming_convention);

        tracing::info!(
            visibility = %dispatcher.visibility(),
            naming_convention = %dispatcher.convention(),
            "response crafter configured"
        );

        ServerBuilder {
            config,
            routes: Router::new(),
            hub: None,
            dispatcher,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
