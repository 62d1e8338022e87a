//! Engine configuration
//!
//! Board dimensions and the optional RNG seed, with defaults matching the classic
//! 10x20 playfield. Values can be read from the environment:
//!
//! - `TETRIS_BOARD_WIDTH`: columns (default 10)
//! - `TETRIS_BOARD_HEIGHT`: rows (default 20)
//! - `TETRIS_SEED`: `u64` seed for reproducible piece sequences (default: entropy)

use std::fmt;

use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, MAX_BOARD_DIMENSION, MIN_BOARD_DIMENSION};

pub const WIDTH_ENV: &str = "TETRIS_BOARD_WIDTH";
pub const HEIGHT_ENV: &str = "TETRIS_BOARD_HEIGHT";
pub const SEED_ENV: &str = "TETRIS_SEED";

/// Invalid configuration or board input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A board dimension outside `MIN_BOARD_DIMENSION..=MAX_BOARD_DIMENSION`
    DimensionOutOfRange { name: &'static str, value: usize },
    /// An environment value that does not parse
    InvalidValue { key: String, value: String },
    /// A textual board with an unknown cell character or ragged rows
    MalformedBoard(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DimensionOutOfRange { name, value } => write!(
                f,
                "board {} {} is outside {}..={}",
                name, value, MIN_BOARD_DIMENSION, MAX_BOARD_DIMENSION
            ),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value {:?} for {}", value, key)
            }
            ConfigError::MalformedBoard(reason) => write!(f, "malformed board: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Check one board dimension against the allowed range
pub fn check_dimension(name: &'static str, value: usize) -> Result<u8, ConfigError> {
    if value < MIN_BOARD_DIMENSION as usize || value > MAX_BOARD_DIMENSION as usize {
        return Err(ConfigError::DimensionOutOfRange { name, value });
    }
    Ok(value as u8)
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    /// Seed for the piece RNG; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimension("width", self.width as usize)?;
        check_dimension("height", self.height as usize)?;
        Ok(())
    }

    /// Create from environment variables, falling back to defaults for unset keys
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup (same keys as [`EngineConfig::from_env`])
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let width = match parse_key::<usize, _>(&lookup, WIDTH_ENV)? {
            Some(value) => check_dimension("width", value)?,
            None => defaults.width,
        };
        let height = match parse_key::<usize, _>(&lookup, HEIGHT_ENV)? {
            Some(value) => check_dimension("height", value)?,
            None => defaults.height,
        };

        Ok(Self {
            width,
            height,
            seed: parse_key(&lookup, SEED_ENV)?,
        })
    }
}

fn parse_key<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
        })
}
