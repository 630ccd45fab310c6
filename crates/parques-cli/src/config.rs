//! Settings read from the environment.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PARQUES_SEED must be an unsigned integer, got '{0}'")]
    InvalidSeed(String),
}

/// Client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Seed for the die and computer players; random when absent
    pub seed: Option<u64>,
    /// Wait for Enter between turns
    pub pause: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            seed: None,
            pause: true,
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = match lookup("PARQUES_SEED") {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidSeed(raw.clone()))?,
            ),
            None => None,
        };
        let no_pause = lookup("PARQUES_NO_PAUSE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            seed,
            pause: !no_pause,
        })
    }
}
