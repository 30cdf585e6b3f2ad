use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if variable expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if endpoint paths are malformed or collide, or
    /// telemetry settings are out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_paths()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_paths(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        let hub = &self.server.hub;

        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if hub.enabled && !hub.path.starts_with('/') {
            anyhow::bail!("server.hub.path must start with '/'");
        }

        if health.enabled && hub.enabled && health.path == hub.path {
            anyhow::bail!("server.health.path and server.hub.path must differ");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&telemetry.sampling_rate) {
            anyhow::bail!("telemetry.sampling_rate must be between 0.0 and 1.0");
        }

        if telemetry.service_name.trim().is_empty() {
            anyhow::bail!("telemetry.service_name must not be empty");
        }

        Ok(())
    }
}
