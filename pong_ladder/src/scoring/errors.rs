//! Error types for score validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for per-game score validation
pub type ScoreResult<T> = Result<T, InvalidScore>;

/// Why a list of game scores is not a finished series
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidScore {
    #[error("best of {best_of} is not a series length (1, 3, 5 or 7)")]
    InvalidBestOf { best_of: u8 },

    #[error("no games recorded")]
    EmptySeries,

    #[error("{played} games recorded for a best of {best_of}")]
    TooManyGames { played: usize, best_of: u8 },

    #[error("game {game} is tied")]
    TiedGame { game: usize },

    #[error("no winner yet: {player1_wins}-{player2_wins}, need {needed} wins")]
    InsufficientWins {
        player1_wins: u8,
        player2_wins: u8,
        needed: u8,
    },

    #[error("both sides reached the winning game count")]
    BothSidesQualified,
}

/// Result type for series shorthand validation
pub type SeriesScoreResult<T> = Result<T, InvalidSeriesScore>;

/// Why a "W-L" series shorthand is not legal
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidSeriesScore {
    #[error("best of {best_of} is not a series length (1, 3, 5 or 7)")]
    InvalidBestOf { best_of: u8 },

    #[error("malformed series score: {0:?}")]
    Malformed(String),

    #[error("winner needs exactly {expected} wins, got {actual}")]
    WrongWinnerCount { expected: u8, actual: u8 },

    #[error("loser wins ({loser}) must be fewer than winner wins ({winner})")]
    LoserNotSmaller { winner: u8, loser: u8 },
}
