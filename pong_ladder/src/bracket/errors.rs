//! Error types for bracket generation and progression

use thiserror::Error;

use super::models::{MatchStatus, ParticipantId};

/// Result type for bracket generation
pub type BracketResult<T> = Result<T, BracketError>;

/// Generator precondition violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("Not enough participants: need {needed}, have {actual}")]
    NotEnoughParticipants { needed: usize, actual: usize },

    #[error("Invalid group count {groups} for {participants} participants")]
    InvalidGroupCount { groups: usize, participants: usize },

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(ParticipantId),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for result recording
pub type ProgressionResult<T> = Result<T, ProgressionError>;

/// Rejected result submissions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("Match not found: round {round}, position {position}")]
    MatchNotFound { round: u32, position: usize },

    #[error("Match not ready: status is {0}")]
    NotReady(MatchStatus),

    #[error("Match already decided")]
    AlreadyDecided,

    #[error("Participant {0} is not playing in this match")]
    WinnerNotInMatch(ParticipantId),

    #[error("Invalid scores: {0}")]
    InvalidScores(#[from] crate::scoring::InvalidScore),
}
