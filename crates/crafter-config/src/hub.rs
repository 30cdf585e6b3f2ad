use serde::Deserialize;

/// Real-time hub endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Path the hub's websocket is served on
    #[serde(default = "default_path")]
    pub path: String,
    /// Upgrade request header identifying the connected user
    #[serde(default)]
    pub user_id_header: Option<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_path(),
            user_id_header: None,
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/hubs/chat".to_string()
}
