//! # Pong Ladder
//!
//! Tournament bracket engine for a ping-pong ladder.
//!
//! The library turns a roster of rated participants into a bracket, records
//! results as they come in and computes the rating changes they earn. Every
//! function is synchronous; progression mutates only the bracket it is given.
//!
//! ## Formats
//!
//! - **Single elimination**: power-of-two tree with byes for the top seeds
//! - **Double elimination**: winners tree, interleaved losers rounds, Grand
//!   Finals and a reset played only when needed
//! - **Round robin**: snake-drafted groups, optionally followed by a knockout
//! - **Swiss**: points-ordered pairing without rematches, Buchholz tiebreak
//!
//! ## Core Modules
//!
//! - [`bracket`]: generators, models, progression and link repair
//! - [`scoring`]: best-of resolution, score validation and ELO
//! - [`config`]: tournament settings
//! - [`events`]: notifications for state transitions
//!
//! ## Example
//!
//! ```
//! use pong_ladder::scoring::calculate_elo_change;
//!
//! let change = calculate_elo_change(1000, 1000);
//! assert_eq!(change.change, 16);
//! ```

/// Bracket generators, models and progression.
pub mod bracket;
pub use bracket::{
    Bracket, BracketError, BracketFormat, BracketType, Match, MatchStatus, Participant,
    ProgressionError, Round, generate_bracket, record_result, record_walkover, repair_links,
};

/// Tournament settings.
pub mod config;
pub use config::TournamentSettings;

/// Notifications.
pub mod events;
pub use events::{EventSink, TournamentEvent, dispatch_events};

/// Result validation and rating changes.
pub mod scoring;
