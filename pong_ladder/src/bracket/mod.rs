//! Bracket generation and progression.
//!
//! Generators are pure: they take a roster and return a [`Bracket`] whose
//! matches reference each other positionally through [`FeederLink`]s.
//! Storage assigns IDs afterwards and [`repair_links`] fills them in.
//!
//! ## Example
//!
//! ```
//! use pong_ladder::bracket::{Participant, generate_bracket, record_result, repair_links};
//! use pong_ladder::config::TournamentSettings;
//!
//! let roster: Vec<_> = (1..=3).map(|i| Participant::new(i, i, 1500 - i as i32)).collect();
//! let mut bracket = generate_bracket(&roster, &TournamentSettings::default()).unwrap();
//!
//! // Seed 1 has a bye into the final
//! repair_links(&mut bracket);
//! record_result(&mut bracket, 1, 1, 2, Vec::new()).unwrap();
//! let progress = record_result(&mut bracket, 2, 0, 1, Vec::new()).unwrap();
//! assert_eq!(progress.champion, Some(1));
//! ```

pub mod double_elimination;
pub mod errors;
pub mod knockout;
pub mod models;
pub mod progression;
pub mod round_robin;
pub mod seeding;
pub mod single_elimination;
pub mod standings;
pub mod swiss;

pub use double_elimination::{
    GRAND_FINALS, GRAND_FINALS_RESET, double_elimination_sources,
    generate_double_elimination_bracket, grand_finals_round, losers_round_count,
    losers_round_matches,
};
pub use errors::{BracketError, BracketResult, ProgressionError, ProgressionResult};
pub use knockout::{GroupPlacement, generate_knockout_from_groups, knockout_seed_order};
pub use models::{
    Bracket, BracketFormat, BracketType, FeedOutcome, FeederLink, Group, GroupId, Match, MatchId,
    MatchStatus, Participant, ParticipantId, PlayerId, Round, RoundId, Slot,
};
pub use progression::{
    Advancement, MatchRef, Progress, RepairReport, champion, effective_best_of, record_result,
    record_scored_result, record_walkover, repair_links,
};
pub use round_robin::{GROUP_STAGE, generate_round_robin_groups, group_name, snake_group};
pub use seeding::{compare_by_seed, generate_seed_positions, next_power_of_2, sort_by_seed};
pub use single_elimination::{
    MIN_ELIMINATION_PARTICIPANTS, generate_single_elimination_bracket, get_bye_winner,
    round_name, winners_tree_sources,
};
pub use standings::{GroupStanding, group_standings, placements_from_standings};
pub use swiss::{
    OpponentHistory, SWISS_SEARCH_BUDGET, SwissPoints, SwissStanding, calculate_buchholz,
    generate_swiss_round, swiss_standings,
};

use log::info;
use std::collections::HashMap;

use crate::config::TournamentSettings;

/// Generate the opening structure for `settings.format`.
///
/// Swiss produces a bracket holding round 1 only; later rounds come from
/// [`generate_swiss_round`] once results are in.
pub fn generate_bracket(
    participants: &[Participant],
    settings: &TournamentSettings,
) -> BracketResult<Bracket> {
    settings.validate().map_err(BracketError::InvalidSettings)?;

    let bracket = match settings.format {
        BracketFormat::SingleElimination => generate_single_elimination_bracket(
            participants,
            settings.base_multiplier,
            settings.final_multiplier,
        )?,
        BracketFormat::DoubleElimination => generate_double_elimination_bracket(
            participants,
            settings.base_multiplier,
            settings.final_multiplier,
        )?,
        BracketFormat::RoundRobin => generate_round_robin_groups(
            participants,
            settings.group_count,
            settings.group_multiplier,
        )?,
        BracketFormat::Swiss => {
            let first = generate_swiss_round(
                participants,
                1,
                &HashMap::new(),
                &HashMap::new(),
                settings.group_multiplier,
            )?;
            Bracket {
                format: BracketFormat::Swiss,
                bracket_size: participants.len(),
                rounds: vec![first],
                groups: Vec::new(),
            }
        }
    };

    info!(
        "Generated {} bracket: {} participants, {} rounds, {} matches",
        bracket.format,
        participants.len(),
        bracket.rounds.len(),
        bracket.match_count()
    );

    Ok(bracket)
}
