//! Tournament notifications.
//!
//! Progression returns plain [`TournamentEvent`] values; delivering them is
//! left to an [`EventSink`]. Delivery is fire-and-forget: a failing sink is
//! logged and never affects the bracket.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::bracket::models::ParticipantId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TournamentEvent {
    MatchCompleted {
        round: u32,
        position: usize,
        winner: ParticipantId,
        loser: Option<ParticipantId>,
        walkover: bool,
    },
    ParticipantAdvanced {
        participant: ParticipantId,
        round: u32,
        position: usize,
    },
    MatchReady {
        round: u32,
        position: usize,
    },
    /// A repair pass changed persisted state
    BracketRepaired {
        changes: usize,
    },
    TournamentCompleted {
        champion: ParticipantId,
    },
}

impl fmt::Display for TournamentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentEvent::MatchCompleted {
                round,
                position,
                winner,
                walkover,
                ..
            } => {
                let how = if *walkover { " by walkover" } else { "" };
                write!(f, "Round {round} match {position} won by {winner}{how}")
            }
            TournamentEvent::ParticipantAdvanced {
                participant,
                round,
                position,
            } => write!(f, "{participant} advances to round {round} match {position}"),
            TournamentEvent::MatchReady { round, position } => {
                write!(f, "Round {round} match {position} is ready")
            }
            TournamentEvent::BracketRepaired { changes } => {
                write!(f, "Bracket repaired ({changes} changes)")
            }
            TournamentEvent::TournamentCompleted { champion } => {
                write!(f, "Tournament won by {champion}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Receiver of tournament notifications
pub trait EventSink: Send + Sync {
    /// Deliver one event
    fn publish(&self, event: &TournamentEvent) -> Result<(), NotifyError>;
}

/// Sink that writes every event to the log, with its JSON payload at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: &TournamentEvent) -> Result<(), NotifyError> {
        info!("{event}");
        debug!("{}", serde_json::to_string(event)?);
        Ok(())
    }
}

/// Publish `events` in order, returning how many were delivered
pub fn dispatch_events(sink: &dyn EventSink, events: &[TournamentEvent]) -> usize {
    events
        .iter()
        .filter(|event| match sink.publish(event) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropped event '{event}': {e}");
                false
            }
        })
        .count()
}
