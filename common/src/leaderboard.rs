use std::{
    collections::HashMap,
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::constants::MAX_NAME_LENGTH;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    AsteroidBlaster,
    BubblePop,
    FruitCatcher,
    MazeRunner,
    PlatformerQuest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOrder {
    /// Lower is better (times).
    Ascending,
    Descending,
}

impl GameId {
    pub fn is_time_based(self) -> bool {
        matches!(self, GameId::MazeRunner)
    }

    pub fn score_order(self) -> ScoreOrder {
        if self.is_time_based() {
            ScoreOrder::Ascending
        } else {
            ScoreOrder::Descending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
    pub timestamp: u64, // Milliseconds since the Unix epoch.
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    Empty,
    TooLong,
    InvalidCharacter(char),
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "name cannot be empty"),
            NameError::TooLong => write!(f, "name is longer than {} characters", MAX_NAME_LENGTH),
            NameError::InvalidCharacter(c) => {
                write!(f, "name contains invalid character {:?}", c)
            }
        }
    }
}

impl std::error::Error for NameError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    InvalidName(NameError),
    Unavailable(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderboardError::InvalidName(e) => write!(f, "invalid name: {}", e),
            LeaderboardError::Unavailable(reason) => {
                write!(f, "leaderboard unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for LeaderboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeaderboardError::InvalidName(e) => Some(e),
            LeaderboardError::Unavailable(_) => None,
        }
    }
}

impl From<NameError> for LeaderboardError {
    fn from(e: NameError) -> Self {
        LeaderboardError::InvalidName(e)
    }
}

pub fn sanitize_name(input: &str) -> Result<String, NameError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(NameError::TooLong);
    }

    if let Some(invalid) = trimmed.chars().find(|ch| ch.is_control()) {
        return Err(NameError::InvalidCharacter(invalid));
    }

    Ok(trimmed.to_string())
}

/// Score store shared by every game. The hosted backend lives elsewhere; this
/// is the contract the games talk to.
pub trait Leaderboard {
    fn submit_score(
        &mut self,
        game: GameId,
        name: &str,
        score: u64,
    ) -> Result<ScoreEntry, LeaderboardError>;

    /// Best `limit` entries, best first.
    fn top_scores(&self, game: GameId, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError>;
}

/// Stable sort, so equal scores keep submission order.
pub fn rank_entries(game: GameId, entries: &mut [ScoreEntry]) {
    match game.score_order() {
        ScoreOrder::Ascending => entries.sort_by_key(|entry| entry.score),
        ScoreOrder::Descending => entries.sort_by(|a, b| b.score.cmp(&a.score)),
    }
}

pub fn format_score(game: GameId, score: u64) -> String {
    if game.is_time_based() {
        format!("{}s", score)
    } else {
        score.to_string()
    }
}

/// One leaderboard line, `rank` counted from 1.
pub fn format_entry(rank: usize, entry: &ScoreEntry, game: GameId) -> String {
    format!(
        "{:>2}. {:<width$}  {}",
        rank,
        entry.name,
        format_score(game, entry.score),
        width = MAX_NAME_LENGTH
    )
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[derive(Debug, Default, Clone)]
pub struct MemoryLeaderboard {
    entries: HashMap<GameId, Vec<ScoreEntry>>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, game: GameId) -> usize {
        self.entries.get(&game).map_or(0, Vec::len)
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn submit_score(
        &mut self,
        game: GameId,
        name: &str,
        score: u64,
    ) -> Result<ScoreEntry, LeaderboardError> {
        let name = sanitize_name(name).inspect_err(|e| warn!("rejected score submission: {}", e))?;
        let entry = ScoreEntry {
            name,
            score,
            timestamp: now_millis(),
        };

        self.entries.entry(game).or_default().push(entry.clone());
        info!(
            "{} scored {} in {}",
            entry.name,
            format_score(game, score),
            game
        );

        Ok(entry)
    }

    fn top_scores(&self, game: GameId, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let mut entries = self.entries.get(&game).cloned().unwrap_or_default();
        rank_entries(game, &mut entries);
        entries.truncate(limit);
        Ok(entries)
    }
}
