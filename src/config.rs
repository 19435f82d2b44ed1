use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::registry;

pub const CONFIG_FILE: &str = "swipecade.toml";

/// Runtime configuration, loaded from `swipecade.toml` and then overridden
/// by `SWIPECADE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Event poll timeout and frame cadence.
    pub tick_rate_ms: u64,
    /// Longest stretch of time a host catches up in one step.
    pub max_catch_up_ms: u64,
    /// Window in which a cross-source repeat of a press is dropped.
    pub dedupe_window_ms: u64,
    /// Fixed seed for reproducible sessions; random when absent.
    pub seed: Option<u64>,
    /// Best-score file; next to the executable when absent.
    pub scores_path: Option<PathBuf>,
    pub log_path: PathBuf,
    /// Game id to open the feed on.
    pub start_game: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            max_catch_up_ms: 250,
            dedupe_window_ms: 300,
            seed: None,
            scores_path: None,
            log_path: PathBuf::from("swipecade.log"),
            start_game: None,
        }
    }
}

impl AppConfig {
    /// Load `swipecade.toml` from the working directory if present, apply
    /// environment overrides and validate the result.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(Path::new(CONFIG_FILE))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Environment variable overrides. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("SWIPECADE_TICK_MS") {
            self.tick_rate_ms = parse_number("SWIPECADE_TICK_MS", &v)?;
        }
        if let Some(v) = var("SWIPECADE_SEED") {
            self.seed = Some(parse_number("SWIPECADE_SEED", &v)?);
        }
        if let Some(v) = var("SWIPECADE_SCORES") {
            self.scores_path = Some(PathBuf::from(v));
        }
        if let Some(v) = var("SWIPECADE_LOG") {
            self.log_path = PathBuf::from(v);
        }
        if let Some(v) = var("SWIPECADE_START") {
            self.start_game = Some(v.trim().to_string());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.tick_rate_ms) {
            return Err(ConfigError::Invalid {
                field: "tick_rate_ms",
                message: format!("{} is outside 1..=1000", self.tick_rate_ms),
            });
        }
        if self.max_catch_up_ms < self.tick_rate_ms {
            return Err(ConfigError::Invalid {
                field: "max_catch_up_ms",
                message: format!(
                    "{} is shorter than one tick ({} ms)",
                    self.max_catch_up_ms, self.tick_rate_ms
                ),
            });
        }
        if let Some(id) = &self.start_game {
            if registry::find(id).is_none() {
                return Err(ConfigError::Invalid {
                    field: "start_game",
                    message: format!("no game with id `{id}`"),
                });
            }
        }
        Ok(())
    }

    /// Session seed: the configured one, or fresh entropy.
    pub fn session_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Feed position to open on.
    pub fn start_index(&self) -> usize {
        self.start_game
            .as_deref()
            .and_then(registry::index_of)
            .unwrap_or(0)
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|e| ConfigError::Invalid {
        field,
        message: format!("`{value}`: {e}"),
    })
}
