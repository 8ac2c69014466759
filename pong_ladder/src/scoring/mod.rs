//! Scoring rules: how a match result is validated and turned into rating changes.
//!
//! - Best-of resolution (match override, round override, tournament default)
//! - Per-game and series-shorthand validation with structured reasons
//! - ELO deltas for singles, doubles and tournament rounds

pub mod best_of;
pub mod elo;
pub mod errors;

pub use best_of::{
    ALLOWED_BEST_OF, BestOfSettings, DEFAULT_BEST_OF, GameScore, SeriesOutcome, Side,
    get_round_default_best_of, get_valid_series_scores, is_valid_best_of, parse_series_score,
    resolve_best_of, validate_scores, validate_series_score, wins_needed,
};
pub use elo::{
    DoublesEloChange, EloChange, K_FACTOR, MIN_RATING, calculate_doubles_elo_change,
    calculate_doubles_tournament_elo_change, calculate_elo_change, calculate_flat_elo_change,
    calculate_tournament_elo_change, expected_score, interpolate_multiplier,
};
pub use errors::{InvalidScore, InvalidSeriesScore, ScoreResult, SeriesScoreResult};
