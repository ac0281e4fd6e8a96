use std::path::PathBuf;

use game_core::{Config, Mode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostConfigError {
    #[error("{var}={value:?} is not valid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings of the headless host, read from the environment
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub game: Config,
    /// Ticks to run before exiting
    pub ticks: u64,
    /// Durable key-value file; in-memory storage when absent
    pub store_path: Option<PathBuf>,
}

impl HostConfig {
    /// One minute of play at the default cadence
    pub const DEFAULT_TICKS: u64 = 1200;

    /// Reads `PONG_MODE`, `PONG_TICKS`, `PONG_STORE` and `PONG_SEED`
    pub fn from_env() -> Result<Self, HostConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HostConfigError> {
        let mut game = Config::new();

        if let Some(value) = lookup("PONG_MODE") {
            game.initial_mode = value
                .parse::<Mode>()
                .map_err(|reason| invalid("PONG_MODE", &value, reason))?;
        }
        if let Some(value) = lookup("PONG_SEED") {
            game.rng_seed = value
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("PONG_SEED", &value, e.to_string()))?;
        }
        let ticks = match lookup("PONG_TICKS") {
            Some(value) => value
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("PONG_TICKS", &value, e.to_string()))?,
            None => Self::DEFAULT_TICKS,
        };
        let store_path = lookup("PONG_STORE")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            game,
            ticks,
            store_path,
        })
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            game: Config::new(),
            ticks: Self::DEFAULT_TICKS,
            store_path: None,
        }
    }
}

fn invalid(var: &'static str, value: &str, reason: String) -> HostConfigError {
    HostConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = HostConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.game.initial_mode, Mode::SelfPlayTraining);
        assert_eq!(config.ticks, HostConfig::DEFAULT_TICKS);
        assert_eq!(config.store_path, None);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = HostConfig::from_lookup(lookup(&[
            ("PONG_MODE", "human"),
            ("PONG_TICKS", "40"),
            ("PONG_STORE", "/tmp/pong.json"),
            ("PONG_SEED", "7"),
        ]))
        .unwrap();
        assert_eq!(config.game.initial_mode, Mode::Human);
        assert_eq!(config.ticks, 40);
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/pong.json")));
        assert_eq!(config.game.rng_seed, 7);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = HostConfig::from_lookup(lookup(&[("PONG_MODE", "robot")])).unwrap_err();
        assert!(matches!(err, HostConfigError::Invalid { var: "PONG_MODE", .. }));
        let err = HostConfig::from_lookup(lookup(&[("PONG_TICKS", "-3")])).unwrap_err();
        assert!(matches!(err, HostConfigError::Invalid { var: "PONG_TICKS", .. }));
    }
}
