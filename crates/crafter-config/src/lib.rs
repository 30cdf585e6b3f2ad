#![allow(clippy::must_use_candidate)]

mod env;
pub mod health;
pub mod hub;
mod loader;
pub mod response;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use env::ExpandError;
pub use health::*;
pub use hub::*;
pub use response::*;
pub use server::*;
pub use telemetry::{ExportProtocol, ExporterConfig, TelemetryConfig};

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Error response shaping
    #[serde(default)]
    pub response: ResponseConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
