//! Double-elimination bracket generation.
//!
//! Round numbering is global: winners rounds `1..=W`, losers rounds
//! `W+1..=W+L` with `L = 2(W - 1)`, then the Grand Finals and its reset.
//!
//! Losers rounds alternate two kinds:
//! - minor rounds (odd `k`) pair survivors of the previous losers round (or,
//!   for `k = 1`, the losers of winners round 1) against each other
//! - major rounds (even `k = 2j`) pit each survivor against a player dropping
//!   in from winners round `j + 1`, in reversed order to delay rematches

use log::debug;

use super::errors::BracketResult;
use super::models::{Bracket, BracketFormat, BracketType, FeederLink, Match, Participant, Round};
use super::single_elimination::{build_tree, round_name, seeded_slots, winners_tree_sources};
use crate::scoring::interpolate_multiplier;

pub const GRAND_FINALS: &str = "Grand Finals";
pub const GRAND_FINALS_RESET: &str = "Grand Finals Reset";

/// Number of losers rounds for `winners_rounds` winners rounds
pub fn losers_round_count(winners_rounds: u32) -> u32 {
    winners_rounds.saturating_sub(1) * 2
}

/// Matches in losers round `k` (1-based) of a bracket with `winners_rounds` rounds
pub fn losers_round_matches(winners_rounds: u32, k: u32) -> usize {
    let pair = k.div_ceil(2);
    (1usize << winners_rounds) >> (pair + 1)
}

/// Round number of the Grand Finals
pub fn grand_finals_round(winners_rounds: u32) -> u32 {
    winners_rounds + losers_round_count(winners_rounds) + 1
}

/// Feeders of the match at `(round, position)` in a double-elimination bracket.
///
/// Returns `None` for round 1 and for rounds outside the bracket.
pub fn double_elimination_sources(
    winners_rounds: u32,
    round: u32,
    position: usize,
) -> Option<(FeederLink, FeederLink)> {
    let losers_rounds = losers_round_count(winners_rounds);
    let grand_finals = grand_finals_round(winners_rounds);

    if round <= winners_rounds {
        return winners_tree_sources(round, position);
    }

    if round <= winners_rounds + losers_rounds {
        let k = round - winners_rounds;
        let previous = round - 1;
        return Some(if k == 1 {
            (
                FeederLink::loser_of(1, 2 * position),
                FeederLink::loser_of(1, 2 * position + 1),
            )
        } else if k % 2 == 0 {
            let drop_from = k / 2 + 1;
            let matches = losers_round_matches(winners_rounds, k);
            (
                FeederLink::winner_of(previous, position),
                FeederLink::loser_of(drop_from, matches.saturating_sub(1 + position)),
            )
        } else {
            (
                FeederLink::winner_of(previous, 2 * position),
                FeederLink::winner_of(previous, 2 * position + 1),
            )
        });
    }

    if round == grand_finals {
        let challenger = if losers_rounds == 0 {
            FeederLink::loser_of(winners_rounds, 0)
        } else {
            FeederLink::winner_of(winners_rounds + losers_rounds, 0)
        };
        return Some((FeederLink::winner_of(winners_rounds, 0), challenger));
    }

    if round == grand_finals + 1 {
        return Some((
            FeederLink::winner_of(grand_finals, 0),
            FeederLink::loser_of(grand_finals, 0),
        ));
    }

    None
}

/// Generate a double-elimination bracket.
///
/// The winners side is the single-elimination tree with every round tagged
/// `winners`. Both finals rounds use the final multiplier; the reset is only
/// played when the losers-side finalist takes the Grand Finals.
pub fn generate_double_elimination_bracket(
    participants: &[Participant],
    base_multiplier: u32,
    final_multiplier: u32,
) -> BracketResult<Bracket> {
    let slots = seeded_slots(participants)?;
    let bracket_size = slots.len();
    let winners_rounds = bracket_size.trailing_zeros();
    let losers_rounds = losers_round_count(winners_rounds);
    let steps = winners_rounds as usize + 1;

    let mut rounds = build_tree(&slots, |index, remaining| {
        Round::new(
            (index + 1) as u32,
            format!("Winners {}", round_name(remaining)),
            BracketType::Winners,
            interpolate_multiplier(index, steps, base_multiplier, final_multiplier),
        )
    });

    for k in 1..=losers_rounds {
        let number = winners_rounds + k;
        let mut round = Round::new(
            number,
            format!("Losers Round {k}"),
            BracketType::Losers,
            interpolate_multiplier(
                (k - 1) as usize,
                losers_rounds as usize + 1,
                base_multiplier,
                final_multiplier,
            ),
        );
        round.matches = linked_matches(winners_rounds, number, losers_round_matches(winners_rounds, k));
        rounds.push(round);
    }

    let grand_finals = grand_finals_round(winners_rounds);
    for (number, name) in [(grand_finals, GRAND_FINALS), (grand_finals + 1, GRAND_FINALS_RESET)] {
        let mut round = Round::new(number, name, BracketType::Finals, final_multiplier);
        round.matches = linked_matches(winners_rounds, number, 1);
        rounds.push(round);
    }

    debug!(
        "Generated double elimination: {} participants, {} winners rounds, {} losers rounds",
        participants.len(),
        winners_rounds,
        losers_rounds
    );

    Ok(Bracket {
        format: BracketFormat::DoubleElimination,
        bracket_size,
        rounds,
        groups: Vec::new(),
    })
}

fn linked_matches(winners_rounds: u32, round: u32, count: usize) -> Vec<Match> {
    (0..count)
        .filter_map(|position| {
            double_elimination_sources(winners_rounds, round, position)
                .map(|(a, b)| Match::linked(position, a, b))
        })
        .collect()
}
