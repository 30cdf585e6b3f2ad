use crafter_core::{NamingConvention, Visibility};
use serde::Deserialize;

/// How error responses are shaped
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseConfig {
    /// Raw visibility setting, `Public` or `Private`
    ///
    /// Kept as written so that invalid values fall back with a warning
    /// instead of failing the whole configuration.
    #[serde(default)]
    pub visibility: Option<String>,
    /// Casing applied to outgoing messages
    #[serde(default)]
    pub naming_convention: NamingConvention,
}

impl ResponseConfig {
    /// Resolve the visibility setting, warning on unset or invalid values
    pub fn visibility(&self) -> Visibility {
        Visibility::resolve(self.visibility.as_deref())
    }
}
