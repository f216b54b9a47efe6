//! Score leaderboard
//!
//! In-process counterpart of the score submission flow: arcade-style
//! three-letter names, per-mode boards, all-time and weekly views.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GameMode;

/// Entries shown per board
pub const BOARD_SIZE: usize = 10;

/// Arcade-style initials length
pub const NAME_LENGTH: usize = 3;

/// Weekly window
pub const WEEK_MS: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Rejected submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("player name cannot be empty")]
    EmptyName,
    #[error("score must be positive")]
    ZeroScore,
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u64,
    pub game_mode: GameMode,
    /// Unix timestamp (ms) when submitted
    pub created_at: f64,
}

/// All submitted scores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

/// Trim, cut to [`NAME_LENGTH`] characters and upper-case
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .take(NAME_LENGTH)
        .collect::<String>()
        .to_uppercase()
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a finished run
    pub fn submit(
        &mut self,
        player_name: &str,
        score: u64,
        game_mode: GameMode,
        timestamp_ms: f64,
    ) -> Result<ScoreEntry, SubmitError> {
        if score == 0 {
            return Err(SubmitError::ZeroScore);
        }
        let player_name = normalize_name(player_name);
        if player_name.is_empty() {
            return Err(SubmitError::EmptyName);
        }

        let entry = ScoreEntry {
            player_name,
            score,
            game_mode,
            created_at: timestamp_ms,
        };
        self.entries.push(entry.clone());
        log::info!(
            "Score submitted: {} {} ({})",
            entry.player_name,
            entry.score,
            game_mode.as_str()
        );
        Ok(entry)
    }

    /// Best scores for a mode, highest first; ties go to the earlier entry
    pub fn top(&self, mode: GameMode, limit: usize) -> Vec<ScoreEntry> {
        self.ranked(mode, |_| true, limit)
    }

    /// Best scores for a mode over the last seven days
    pub fn weekly(&self, mode: GameMode, now_ms: f64, limit: usize) -> Vec<ScoreEntry> {
        let since = now_ms - WEEK_MS;
        self.ranked(mode, |e| e.created_at >= since, limit)
    }

    fn ranked(
        &self,
        mode: GameMode,
        keep: impl Fn(&ScoreEntry) -> bool,
        limit: usize,
    ) -> Vec<ScoreEntry> {
        let mut entries: Vec<ScoreEntry> = self
            .entries
            .iter()
            .filter(|e| e.game_mode == mode && keep(e))
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.created_at.total_cmp(&b.created_at))
        });
        entries.truncate(limit);
        entries
    }

    /// Check if a score would make the all-time board for its mode
    pub fn qualifies(&self, mode: GameMode, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        let board = self.top(mode, BOARD_SIZE);
        if board.len() < BOARD_SIZE {
            return true;
        }
        board.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, mode: GameMode, score: u64) -> Option<usize> {
        if !self.qualifies(mode, score) {
            return None;
        }
        let board = self.top(mode, BOARD_SIZE);
        let rank = board.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(board.len()) + 1)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
