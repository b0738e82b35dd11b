//! Client configuration, read once at startup

use crate::location::LocationCatalog;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOCATIONS: &str = "inn,fairy_village";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_ASSET_ROOT: &str = "/images";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IMMERSIVE_API_URL is not set")]
    MissingApiUrl,
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("IMMERSIVE_LOCATIONS must name at least one location")]
    NoLocations,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the agent service, without trailing slash
    pub api_url: String,
    pub player_id: u32,
    pub timeout: Duration,
    pub catalog: LocationCatalog,
    pub asset_root: String,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("IMMERSIVE_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingApiUrl)?;

        let player_id = parse_or(&lookup, "IMMERSIVE_PLAYER_ID", 0)?;
        let timeout_secs = parse_or(&lookup, "IMMERSIVE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "IMMERSIVE_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let locations = lookup("IMMERSIVE_LOCATIONS").unwrap_or_else(|| DEFAULT_LOCATIONS.to_string());
        let catalog = LocationCatalog::from_keys(
            locations
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty()),
        )
        .ok_or(ConfigError::NoLocations)?;

        let asset_root =
            lookup("IMMERSIVE_ASSET_ROOT").unwrap_or_else(|| DEFAULT_ASSET_ROOT.to_string());

        Ok(Self {
            api_url,
            player_id,
            timeout: Duration::from_secs(timeout_secs),
            catalog,
            asset_root,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
