//! Engine Configuration

use std::path::{Path, PathBuf};

use cnav_geo::FixOptions;
use cnav_map::MapStyle;
use cnav_net::{RoutingConfig, Url};
use serde::{Deserialize, Serialize};

/// Routing service root
pub const ENV_ROUTING_URL: &str = "CNAV_ROUTING_URL";
/// OSRM profile
pub const ENV_ROUTING_PROFILE: &str = "CNAV_ROUTING_PROFILE";
/// Routing deadline in seconds
pub const ENV_ROUTING_TIMEOUT_SECS: &str = "CNAV_ROUTING_TIMEOUT_SECS";
/// Great-circle estimate speed
pub const ENV_FALLBACK_SPEED_KMH: &str = "CNAV_FALLBACK_SPEED_KMH";
/// Position fix deadline in seconds
pub const ENV_FIX_TIMEOUT_SECS: &str = "CNAV_FIX_TIMEOUT_SECS";

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Navigation configuration options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Routing service
    pub routing: RoutingConfig,

    /// Position fix request
    pub position: FixOptions,

    /// Map content styling
    pub map: MapStyle,
}

impl NavConfig {
    /// Parse a JSON document; absent sections keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Apply `CNAV_*` environment overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_ROUTING_URL) {
            self.routing.base_url = url;
        }
        if let Some(profile) = lookup(ENV_ROUTING_PROFILE) {
            self.routing.profile = profile;
        }
        if let Some(secs) = lookup(ENV_ROUTING_TIMEOUT_SECS) {
            self.routing.timeout_ms = parse_secs(ENV_ROUTING_TIMEOUT_SECS, &secs)?;
        }
        if let Some(speed) = lookup(ENV_FALLBACK_SPEED_KMH) {
            self.routing.fallback_speed_kmh = speed
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_FALLBACK_SPEED_KMH, &speed))?;
        }
        if let Some(secs) = lookup(ENV_FIX_TIMEOUT_SECS) {
            self.position.timeout_ms = parse_secs(ENV_FIX_TIMEOUT_SECS, &secs)?;
        }

        self.validate()
    }

    /// Check values the engine can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.routing.base_url)
            .map_err(|e| ConfigError::Invalid(format!("routing.base_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "routing.base_url: unsupported scheme {}",
                url.scheme()
            )));
        }
        if self.routing.profile.trim().is_empty() || self.routing.profile.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "routing.profile: {:?}",
                self.routing.profile
            )));
        }
        if self.routing.timeout_ms == 0 {
            return Err(ConfigError::Invalid("routing.timeout_ms must be positive".into()));
        }
        let speed = self.routing.fallback_speed_kmh;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "routing.fallback_speed_kmh must be positive, got {speed}"
            )));
        }
        if self.position.timeout_ms == 0 {
            return Err(ConfigError::Invalid("position.timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

fn parse_secs(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    let secs: f64 = value.trim().parse().map_err(|_| invalid(key, value))?;
    if !(secs.is_finite() && secs > 0.0) {
        return Err(invalid(key, value));
    }
    Ok((secs * 1000.0).round() as u64)
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}
