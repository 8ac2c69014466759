//! Single-elimination bracket generation.

use log::debug;
use std::collections::HashSet;

use super::errors::{BracketError, BracketResult};
use super::models::{
    Bracket, BracketFormat, BracketType, FeederLink, Match, Participant, ParticipantId, Round,
};
use super::seeding::{generate_seed_positions, next_power_of_2, sort_by_seed};
use crate::scoring::interpolate_multiplier;

/// Minimum entrants for any elimination format
pub const MIN_ELIMINATION_PARTICIPANTS: usize = 2;

/// Display name for a round by the number of players still in it
pub fn round_name(players_remaining: usize) -> String {
    match players_remaining {
        2 => "Finals".to_string(),
        4 => "Semifinals".to_string(),
        8 => "Quarterfinals".to_string(),
        n => format!("Round of {n}"),
    }
}

/// Winner of a bye pairing: the one participant present, if exactly one is.
pub fn get_bye_winner(
    participant1: Option<ParticipantId>,
    participant2: Option<ParticipantId>,
) -> Option<ParticipantId> {
    match (participant1, participant2) {
        (Some(p), None) | (None, Some(p)) => Some(p),
        _ => None,
    }
}

/// Feeders of a winners-tree match: winners of `2P` and `2P + 1` one round back.
pub fn winners_tree_sources(round: u32, position: usize) -> Option<(FeederLink, FeederLink)> {
    let previous = round.checked_sub(1).filter(|&r| r >= 1)?;
    Some((
        FeederLink::winner_of(previous, 2 * position),
        FeederLink::winner_of(previous, 2 * position + 1),
    ))
}

pub(crate) fn ensure_unique(participants: &[Participant]) -> BracketResult<()> {
    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.id) {
            return Err(BracketError::DuplicateParticipant(participant.id));
        }
    }
    Ok(())
}

/// Ranked participants laid out into power-of-two bracket slots.
pub(crate) fn seeded_slots(participants: &[Participant]) -> BracketResult<Vec<Option<ParticipantId>>> {
    if participants.len() < MIN_ELIMINATION_PARTICIPANTS {
        return Err(BracketError::NotEnoughParticipants {
            needed: MIN_ELIMINATION_PARTICIPANTS,
            actual: participants.len(),
        });
    }
    ensure_unique(participants)?;

    let size = next_power_of_2(participants.len());
    let ranked = sort_by_seed(participants);

    Ok(generate_seed_positions(size)
        .into_iter()
        .map(|seed| ranked.get(seed - 1).map(|p| p.id))
        .collect())
}

/// Build a full winners tree over `slots`.
///
/// `describe` gets the 0-based round index and the players remaining and must
/// return the (empty) round to fill. Round 1 pairs adjacent slots; later
/// rounds link to the two matches below them.
pub(crate) fn build_tree(
    slots: &[Option<ParticipantId>],
    mut describe: impl FnMut(usize, usize) -> Round,
) -> Vec<Round> {
    let size = slots.len();
    let total_rounds = size.trailing_zeros() as usize;
    let mut rounds = Vec::with_capacity(total_rounds);

    for index in 0..total_rounds {
        let mut round = describe(index, size >> index);
        if index == 0 {
            round.matches = slots
                .chunks(2)
                .enumerate()
                .map(|(position, pair)| Match::seeded(position, pair[0], pair.get(1).copied().flatten()))
                .collect();
        } else {
            let previous = round.number - 1;
            round.matches = (0..size >> (index + 1))
                .map(|position| {
                    Match::linked(
                        position,
                        FeederLink::winner_of(previous, 2 * position),
                        FeederLink::winner_of(previous, 2 * position + 1),
                    )
                })
                .collect();
        }
        rounds.push(round);
    }

    rounds
}

/// Generate a single-elimination bracket.
///
/// # Arguments
///
/// * `participants` - Entrants, at least two
/// * `base_multiplier` - ELO multiplier of round 1, in percent
/// * `final_multiplier` - ELO multiplier of the final, in percent
///
/// # Returns
///
/// * `BracketResult<Bracket>` - Rounds in order; round 1 is `ready`/`bye`,
///   every later match is `pending` and linked to its two feeders
///
/// # Example
///
/// ```
/// use pong_ladder::bracket::{generate_single_elimination_bracket, MatchStatus, Participant};
///
/// let players: Vec<_> = (1..=5).map(|i| Participant::new(i, i, 1000 + i as i32)).collect();
/// let bracket = generate_single_elimination_bracket(&players, 150, 300).unwrap();
///
/// assert_eq!(bracket.bracket_size, 8);
/// assert_eq!(bracket.rounds.len(), 3);
/// assert_eq!(bracket.rounds[2].name, "Finals");
/// assert_eq!(bracket.bye_count(), 3);
/// assert!(bracket.rounds[1].matches.iter().all(|m| m.status == MatchStatus::Pending));
/// ```
pub fn generate_single_elimination_bracket(
    participants: &[Participant],
    base_multiplier: u32,
    final_multiplier: u32,
) -> BracketResult<Bracket> {
    let slots = seeded_slots(participants)?;
    let bracket_size = slots.len();
    let total_rounds = bracket_size.trailing_zeros() as usize;

    let rounds = build_tree(&slots, |index, remaining| {
        let bracket_type = if index + 1 == total_rounds {
            BracketType::Finals
        } else {
            BracketType::Winners
        };
        Round::new(
            (index + 1) as u32,
            round_name(remaining),
            bracket_type,
            interpolate_multiplier(index, total_rounds, base_multiplier, final_multiplier),
        )
    });

    debug!(
        "Generated single elimination: {} participants, size {}, {} rounds",
        participants.len(),
        bracket_size,
        rounds.len()
    );

    Ok(Bracket {
        format: BracketFormat::SingleElimination,
        bracket_size,
        rounds,
        groups: Vec::new(),
    })
}
