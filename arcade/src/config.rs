use std::{env, fmt, str::FromStr};

use serde::Serialize;
use strum::{Display, EnumString};

use common::constants::{BUBBLE_COLORS, BUBBLE_COLS, BUBBLE_ROWS, MAZE_COLS, MAZE_ROWS};

pub const DEFAULT_PLAYER: &str = "player";
pub const DEFAULT_MAZE_LEVELS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value {:?} for {}", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub seed: u64,
    pub maze_cols: usize,
    pub maze_rows: usize,
    pub maze_levels: u32,
    pub bubble_cols: usize,
    pub bubble_rows: usize,
    pub colors: u8,
    pub player: String,
    pub format: OutputFormat,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed = match lookup("ARCADE_SEED") {
            Some(value) => parse("ARCADE_SEED", value)?,
            None => rand::random(),
        };

        Ok(Self {
            seed,
            maze_cols: positive(&lookup, "ARCADE_MAZE_COLS", MAZE_COLS)?,
            maze_rows: positive(&lookup, "ARCADE_MAZE_ROWS", MAZE_ROWS)?,
            maze_levels: positive(&lookup, "ARCADE_MAZE_LEVELS", DEFAULT_MAZE_LEVELS)?,
            bubble_cols: positive(&lookup, "ARCADE_BUBBLE_COLS", BUBBLE_COLS)?,
            bubble_rows: positive(&lookup, "ARCADE_BUBBLE_ROWS", BUBBLE_ROWS)?,
            colors: positive(&lookup, "ARCADE_COLORS", BUBBLE_COLORS)?,
            player: lookup("ARCADE_PLAYER")
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| DEFAULT_PLAYER.to_string()),
            format: match lookup("ARCADE_FORMAT") {
                Some(value) => parse("ARCADE_FORMAT", value)?,
                None => OutputFormat::Text,
            },
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

fn positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };

    let parsed: T = parse(key, value.clone())?;
    if parsed > T::default() {
        Ok(parsed)
    } else {
        Err(ConfigError::Invalid { key, value })
    }
}
