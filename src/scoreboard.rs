//! Session leaderboard
//!
//! Tracks the top 10 runs of this session. The host can serialize it for
//! whatever storage it has; the sim only reads and records.

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Final score
    pub score: u32,
    /// Level reached
    pub level: u32,
}

/// Top-score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreBoard {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    /// Create an empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it misses the board)
    pub fn rank_for(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run. Returns the rank achieved (1-indexed) or None
    /// if it didn't qualify.
    pub fn record(&mut self, score: u32, level: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = ScoreEntry { score, level };

        // Insertion point keeps the list sorted descending
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score so far, if any
    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}
