//! Best-of resolution and series score validation.

use serde::{Deserialize, Serialize};

use super::errors::{InvalidScore, InvalidSeriesScore, ScoreResult, SeriesScoreResult};
use crate::bracket::BracketType;

/// Series lengths a tournament may use
pub const ALLOWED_BEST_OF: [u8; 4] = [1, 3, 5, 7];

/// Default series length when nothing else is configured
pub const DEFAULT_BEST_OF: u8 = 3;

/// Points scored by each side in one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    pub player1: u32,
    pub player2: u32,
}

impl GameScore {
    pub fn new(player1: u32, player2: u32) -> Self {
        Self { player1, player2 }
    }

    /// Side that took the game, `None` on a tie
    pub fn winner(&self) -> Option<Side> {
        match self.player1.cmp(&self.player2) {
            std::cmp::Ordering::Greater => Some(Side::Player1),
            std::cmp::Ordering::Less => Some(Side::Player2),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl From<(u32, u32)> for GameScore {
    fn from((player1, player2): (u32, u32)) -> Self {
        Self { player1, player2 }
    }
}

/// One side of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player1,
    Player2,
}

/// Outcome of a valid series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesOutcome {
    pub winner: Side,
    pub player1_wins: u8,
    pub player2_wins: u8,
}

/// Per-stage best-of defaults configured on a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestOfSettings {
    /// Tournament-wide default
    pub default: u8,
    /// Group and Swiss stages
    #[serde(default)]
    pub group: Option<u8>,
    /// Quarterfinals and "Round of N" rounds
    #[serde(default)]
    pub early_rounds: Option<u8>,
    #[serde(default)]
    pub semifinals: Option<u8>,
    #[serde(default)]
    pub finals: Option<u8>,
}

impl Default for BestOfSettings {
    fn default() -> Self {
        Self {
            default: DEFAULT_BEST_OF,
            group: None,
            early_rounds: None,
            semifinals: None,
            finals: None,
        }
    }
}

/// Whether `best_of` is one of the allowed series lengths
pub fn is_valid_best_of(best_of: u8) -> bool {
    ALLOWED_BEST_OF.contains(&best_of)
}

/// Game wins needed to take a best-of-`best_of` series
pub fn wins_needed(best_of: u8) -> u8 {
    best_of.div_ceil(2)
}

/// First configured value of match override, round override, tournament default.
///
/// The result is never below 1.
pub fn resolve_best_of(
    match_best_of: Option<u8>,
    round_best_of: Option<u8>,
    tournament_default: u8,
) -> u8 {
    match_best_of
        .or(round_best_of)
        .unwrap_or(tournament_default)
        .max(1)
}

/// Best-of a round should use when it carries no override of its own.
pub fn get_round_default_best_of(
    round_name: &str,
    bracket_type: BracketType,
    settings: &BestOfSettings,
) -> u8 {
    let name = round_name.to_lowercase();
    let is_semi = name.contains("semi");
    let is_quarter = name.contains("quarter");

    let selected = match bracket_type {
        BracketType::Group | BracketType::SwissRound => settings.group,
        BracketType::Finals if !is_semi && !is_quarter => settings.finals,
        BracketType::Winners | BracketType::Losers | BracketType::Finals => {
            if name.contains("final") && !is_semi && !is_quarter {
                settings.finals
            } else if is_semi {
                settings.semifinals.or(settings.finals)
            } else if is_quarter || name.contains("round of") {
                settings.early_rounds
            } else {
                None
            }
        }
    };

    selected.unwrap_or(settings.default).max(1)
}

/// Validate per-game scores of a best-of series.
///
/// # Arguments
///
/// * `games` - Scores of every game played, in order
/// * `best_of` - Series length
///
/// # Returns
///
/// * `ScoreResult<SeriesOutcome>` - Winner and win counts, or the reason the
///   series is not a finished, legal result
pub fn validate_scores(games: &[GameScore], best_of: u8) -> ScoreResult<SeriesOutcome> {
    if !is_valid_best_of(best_of) {
        return Err(InvalidScore::InvalidBestOf { best_of });
    }

    if games.is_empty() {
        return Err(InvalidScore::EmptySeries);
    }

    if games.len() > usize::from(best_of) {
        return Err(InvalidScore::TooManyGames {
            played: games.len(),
            best_of,
        });
    }

    let mut player1_wins: u8 = 0;
    let mut player2_wins: u8 = 0;
    for (index, game) in games.iter().enumerate() {
        match game.winner() {
            Some(Side::Player1) => player1_wins += 1,
            Some(Side::Player2) => player2_wins += 1,
            None => return Err(InvalidScore::TiedGame { game: index + 1 }),
        }
    }

    let needed = wins_needed(best_of);
    let winner = match (player1_wins >= needed, player2_wins >= needed) {
        // Unreachable once even lengths are refused
        (true, true) => return Err(InvalidScore::BothSidesQualified),
        (true, false) => Side::Player1,
        (false, true) => Side::Player2,
        (false, false) => {
            return Err(InvalidScore::InsufficientWins {
                player1_wins,
                player2_wins,
                needed,
            });
        }
    };

    Ok(SeriesOutcome {
        winner,
        player1_wins,
        player2_wins,
    })
}

/// Every legal "W-L" shorthand for a best-of series, loser count ascending.
///
/// Empty when `best_of` is not an allowed series length.
pub fn get_valid_series_scores(best_of: u8) -> Vec<String> {
    if !is_valid_best_of(best_of) {
        return Vec::new();
    }
    let needed = wins_needed(best_of);
    (0..needed).map(|loser| format!("{needed}-{loser}")).collect()
}

/// Parse a "W-L" shorthand into `(winner_wins, loser_wins)`
pub fn parse_series_score(score: &str) -> Option<(u8, u8)> {
    let (winner, loser) = score.trim().split_once('-')?;
    Some((winner.trim().parse().ok()?, loser.trim().parse().ok()?))
}

/// Validate a "W-L" shorthand against a series length
pub fn validate_series_score(score: &str, best_of: u8) -> SeriesScoreResult<(u8, u8)> {
    if !is_valid_best_of(best_of) {
        return Err(InvalidSeriesScore::InvalidBestOf { best_of });
    }

    let (winner, loser) = parse_series_score(score)
        .ok_or_else(|| InvalidSeriesScore::Malformed(score.to_string()))?;

    let needed = wins_needed(best_of);
    if winner != needed {
        return Err(InvalidSeriesScore::WrongWinnerCount {
            expected: needed,
            actual: winner,
        });
    }

    if loser >= winner {
        return Err(InvalidSeriesScore::LoserNotSmaller { winner, loser });
    }

    Ok((winner, loser))
}
