//! Bracket data models shared by every generator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::GameScore;

/// Participant ID type
pub type ParticipantId = i64;

/// Underlying player ID type
pub type PlayerId = i64;

/// Persisted match ID type (assigned by storage, never by generators)
pub type MatchId = i64;

/// Persisted round ID type
pub type RoundId = i64;

/// Group index within a group stage
pub type GroupId = usize;

/// Tournament entrant as seen by the generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Tournament participant ID
    pub id: ParticipantId,
    /// Ladder player behind this entry
    pub player_id: PlayerId,
    /// Current rating
    pub elo: i32,
    /// Explicit seed (1 = strongest)
    #[serde(default)]
    pub seed: Option<u32>,
    /// Seed was set manually by an organizer
    #[serde(default)]
    pub seed_override: bool,
}

impl Participant {
    /// Create an unseeded participant
    pub fn new(id: ParticipantId, player_id: PlayerId, elo: i32) -> Self {
        Self {
            id,
            player_id,
            elo,
            seed: None,
            seed_override: false,
        }
    }

    /// Attach a manual seed
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self.seed_override = true;
        self
    }
}

/// Structural role of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Winners,
    Losers,
    Finals,
    Group,
    SwissRound,
}

impl BracketType {
    /// Rounds of this type are elimination rounds linked to earlier rounds
    pub fn is_elimination(self) -> bool {
        match self {
            BracketType::Winners | BracketType::Losers | BracketType::Finals => true,
            BracketType::Group | BracketType::SwissRound => false,
        }
    }
}

impl fmt::Display for BracketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketType::Winners => write!(f, "winners"),
            BracketType::Losers => write!(f, "losers"),
            BracketType::Finals => write!(f, "finals"),
            BracketType::Group => write!(f, "group"),
            BracketType::SwissRound => write!(f, "swiss_round"),
        }
    }
}

/// Match lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Slots not both resolved yet
    Pending,
    /// Both slots filled, no result
    Ready,
    /// One slot permanently empty, winner auto-assigned
    Bye,
    /// Result recorded
    Completed,
    /// Decided without play
    Walkover,
}

impl MatchStatus {
    /// Whether the match has a final outcome
    pub fn is_decided(self) -> bool {
        matches!(
            self,
            MatchStatus::Bye | MatchStatus::Completed | MatchStatus::Walkover
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "pending"),
            MatchStatus::Ready => write!(f, "ready"),
            MatchStatus::Bye => write!(f, "bye"),
            MatchStatus::Completed => write!(f, "completed"),
            MatchStatus::Walkover => write!(f, "walkover"),
        }
    }
}

/// Which participant of the feeding match fills the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedOutcome {
    Winner,
    Loser,
}

/// Positional pointer from a slot to the match that fills it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeederLink {
    /// Round number of the feeding match
    pub round: u32,
    /// Position of the feeding match within its round
    pub position: usize,
    /// Winner advances or loser drops
    pub outcome: FeedOutcome,
    /// Persisted ID of the feeding match, once known
    #[serde(default)]
    pub match_id: Option<MatchId>,
}

impl FeederLink {
    pub fn winner_of(round: u32, position: usize) -> Self {
        Self {
            round,
            position,
            outcome: FeedOutcome::Winner,
            match_id: None,
        }
    }

    pub fn loser_of(round: u32, position: usize) -> Self {
        Self {
            round,
            position,
            outcome: FeedOutcome::Loser,
            match_id: None,
        }
    }

    /// Same positional target, ignoring the persisted ID
    pub fn same_target(&self, other: &FeederLink) -> bool {
        self.round == other.round
            && self.position == other.position
            && self.outcome == other.outcome
    }
}

/// One of the two participant slots of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    One,
    Two,
}

/// A single pairing within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Persisted ID, assigned by storage
    #[serde(default)]
    pub id: Option<MatchId>,
    /// 0-based position within the round
    pub position: usize,
    pub participant1: Option<ParticipantId>,
    pub participant2: Option<ParticipantId>,
    pub winner: Option<ParticipantId>,
    pub status: MatchStatus,
    /// Per-match best-of override
    #[serde(default)]
    pub best_of: Option<u8>,
    /// Recorded game scores
    #[serde(default)]
    pub scores: Vec<GameScore>,
    /// Feeder of slot one
    #[serde(default)]
    pub source1: Option<FeederLink>,
    /// Feeder of slot two
    #[serde(default)]
    pub source2: Option<FeederLink>,
    /// Group the match belongs to (group stage only)
    #[serde(default)]
    pub group_id: Option<GroupId>,
}

impl Match {
    /// Round-1 style match between known participants.
    ///
    /// Two participants give a `ready` match, one gives a `bye` with the
    /// present participant as winner.
    pub fn seeded(
        position: usize,
        participant1: Option<ParticipantId>,
        participant2: Option<ParticipantId>,
    ) -> Self {
        let (status, winner) = match (participant1, participant2) {
            (Some(_), Some(_)) => (MatchStatus::Ready, None),
            (Some(p), None) | (None, Some(p)) => (MatchStatus::Bye, Some(p)),
            (None, None) => (MatchStatus::Bye, None),
        };

        Self {
            id: None,
            position,
            participant1,
            participant2,
            winner,
            status,
            best_of: None,
            scores: Vec::new(),
            source1: None,
            source2: None,
            group_id: None,
        }
    }

    /// Empty match waiting on two feeders
    pub fn linked(position: usize, source1: FeederLink, source2: FeederLink) -> Self {
        Self {
            id: None,
            position,
            participant1: None,
            participant2: None,
            winner: None,
            status: MatchStatus::Pending,
            best_of: None,
            scores: Vec::new(),
            source1: Some(source1),
            source2: Some(source2),
            group_id: None,
        }
    }

    pub fn participant(&self, slot: Slot) -> Option<ParticipantId> {
        match slot {
            Slot::One => self.participant1,
            Slot::Two => self.participant2,
        }
    }

    pub fn source(&self, slot: Slot) -> Option<&FeederLink> {
        match slot {
            Slot::One => self.source1.as_ref(),
            Slot::Two => self.source2.as_ref(),
        }
    }

    pub(crate) fn set_participant(&mut self, slot: Slot, participant: Option<ParticipantId>) {
        match slot {
            Slot::One => self.participant1 = participant,
            Slot::Two => self.participant2 = participant,
        }
    }

    pub(crate) fn set_source(&mut self, slot: Slot, link: Option<FeederLink>) {
        match slot {
            Slot::One => self.source1 = link,
            Slot::Two => self.source2 = link,
        }
    }

    /// Whether the participant plays in this match
    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.participant1 == Some(participant) || self.participant2 == Some(participant)
    }

    /// The participant opposite the winner, for decided matches with two players
    pub fn loser(&self) -> Option<ParticipantId> {
        let winner = self.winner?;
        match (self.participant1, self.participant2) {
            (Some(a), Some(b)) if a == winner => Some(b),
            (Some(a), Some(b)) if b == winner => Some(a),
            _ => None,
        }
    }

    pub fn has_both_participants(&self) -> bool {
        self.participant1.is_some() && self.participant2.is_some()
    }
}

/// An ordered set of matches played at the same stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Persisted ID, assigned by storage
    #[serde(default)]
    pub id: Option<RoundId>,
    /// 1-based round number, unique within a bracket
    pub number: u32,
    pub name: String,
    pub bracket_type: BracketType,
    /// ELO multiplier in percent (100 = x1)
    pub elo_multiplier: u32,
    /// Per-round best-of override
    #[serde(default)]
    pub best_of: Option<u8>,
    pub matches: Vec<Match>,
}

impl Round {
    pub fn new(
        number: u32,
        name: impl Into<String>,
        bracket_type: BracketType,
        elo_multiplier: u32,
    ) -> Self {
        Self {
            id: None,
            number,
            name: name.into(),
            bracket_type,
            elo_multiplier,
            best_of: None,
            matches: Vec::new(),
        }
    }
}

/// Round-robin group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Alphabetic name (A, B, C, ...)
    pub name: String,
    pub display_order: usize,
    /// Participants in draft order
    pub participants: Vec<ParticipantId>,
}

/// Competition format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketFormat {
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    Swiss,
}

impl fmt::Display for BracketFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketFormat::SingleElimination => write!(f, "single_elimination"),
            BracketFormat::DoubleElimination => write!(f, "double_elimination"),
            BracketFormat::RoundRobin => write!(f, "round_robin"),
            BracketFormat::Swiss => write!(f, "swiss"),
        }
    }
}

impl std::str::FromStr for BracketFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "single" | "single_elimination" => Ok(BracketFormat::SingleElimination),
            "double" | "double_elimination" => Ok(BracketFormat::DoubleElimination),
            "groups" | "round_robin" => Ok(BracketFormat::RoundRobin),
            "swiss" => Ok(BracketFormat::Swiss),
            other => Err(format!("unknown bracket format: {other}")),
        }
    }
}

/// Generated competition structure, addressed positionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub format: BracketFormat,
    /// Power-of-two slot count (elimination) or participant count
    pub bracket_size: usize,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Bracket {
    /// Round by its 1-based number
    pub fn round(&self, number: u32) -> Option<&Round> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.rounds.get(index).filter(|r| r.number == number)
    }

    pub fn round_mut(&mut self, number: u32) -> Option<&mut Round> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.rounds.get_mut(index).filter(|r| r.number == number)
    }

    pub fn match_at(&self, round: u32, position: usize) -> Option<&Match> {
        self.round(round)?.matches.get(position)
    }

    pub fn match_at_mut(&mut self, round: u32, position: usize) -> Option<&mut Match> {
        self.round_mut(round)?.matches.get_mut(position)
    }

    /// Rounds carrying the given tag, in order
    pub fn rounds_of(&self, bracket_type: BracketType) -> impl Iterator<Item = &Round> {
        self.rounds
            .iter()
            .filter(move |r| r.bracket_type == bracket_type)
    }

    pub fn match_count(&self) -> usize {
        self.rounds.iter().map(|r| r.matches.len()).sum()
    }

    /// Number of round-1 byes
    pub fn bye_count(&self) -> usize {
        self.rounds
            .first()
            .map(|r| {
                r.matches
                    .iter()
                    .filter(|m| m.status == MatchStatus::Bye)
                    .count()
            })
            .unwrap_or(0)
    }
}
