//! Swiss-system pairing and Buchholz tiebreaks.
//!
//! Swiss state is owned by the caller and threaded between rounds:
//! `previous_opponents` lists who each participant has already played and
//! `swiss_points` holds their current score.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::errors::{BracketError, BracketResult};
use super::models::{BracketType, Match, Participant, ParticipantId, Round};
use super::seeding::sort_by_seed;
use super::single_elimination::ensure_unique;

/// Caller-threaded opponent history
pub type OpponentHistory = HashMap<ParticipantId, Vec<ParticipantId>>;

/// Caller-threaded Swiss points
pub type SwissPoints = HashMap<ParticipantId, u32>;

/// Search nodes the repeat-free pairing search may visit before giving up
pub const SWISS_SEARCH_BUDGET: usize = 100_000;

/// Standings row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwissStanding {
    pub participant_id: ParticipantId,
    pub points: u32,
    pub buchholz: u32,
}

fn have_met(history: &OpponentHistory, a: ParticipantId, b: ParticipantId) -> bool {
    history.get(&a).is_some_and(|o| o.contains(&b))
        || history.get(&b).is_some_and(|o| o.contains(&a))
}

/// Participants ordered by points, then by seed rank
fn pairing_order(participants: &[Participant], swiss_points: &SwissPoints) -> Vec<ParticipantId> {
    let mut order: Vec<ParticipantId> = sort_by_seed(participants).iter().map(|p| p.id).collect();
    // Stable sort keeps seed rank as the secondary key
    order.sort_by_key(|id| std::cmp::Reverse(swiss_points.get(id).copied().unwrap_or(0)));
    order
}

fn pair_without_repeats(
    remaining: &[ParticipantId],
    history: &OpponentHistory,
    budget: &mut usize,
    pairs: &mut Vec<(ParticipantId, ParticipantId)>,
) -> bool {
    let Some((&first, rest)) = remaining.split_first() else {
        return true;
    };

    for (index, &candidate) in rest.iter().enumerate() {
        if *budget == 0 {
            return false;
        }
        *budget -= 1;

        if have_met(history, first, candidate) {
            continue;
        }

        let next: Vec<ParticipantId> = rest
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != index)
            .map(|(_, &id)| id)
            .collect();

        pairs.push((first, candidate));
        if pair_without_repeats(&next, history, budget, pairs) {
            return true;
        }
        pairs.pop();
    }

    false
}

fn pair_greedily(
    remaining: &[ParticipantId],
    history: &OpponentHistory,
) -> Vec<(ParticipantId, ParticipantId)> {
    let mut pool = remaining.to_vec();
    let mut pairs = Vec::with_capacity(pool.len() / 2);

    while pool.len() >= 2 {
        let first = pool.remove(0);
        let index = pool
            .iter()
            .position(|&candidate| !have_met(history, first, candidate))
            .unwrap_or(0);
        let second = pool.remove(index);
        if have_met(history, first, second) {
            warn!("Swiss repeat pairing: {first} vs {second}, no fresh opponent left");
        }
        pairs.push((first, second));
    }

    pairs
}

/// Pairings plus the bye (odd counts only)
fn pair_round(
    order: &[ParticipantId],
    history: &OpponentHistory,
) -> (Vec<(ParticipantId, ParticipantId)>, Option<ParticipantId>) {
    let mut budget = SWISS_SEARCH_BUDGET;

    if order.len() % 2 == 0 {
        let mut pairs = Vec::new();
        if pair_without_repeats(order, history, &mut budget, &mut pairs) {
            return (pairs, None);
        }
        return (pair_greedily(order, history), None);
    }

    // Lowest-ranked participant whose bye leaves a repeat-free pairing
    for bye_index in (0..order.len()).rev() {
        let rest: Vec<ParticipantId> = order
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != bye_index)
            .map(|(_, &id)| id)
            .collect();
        let mut pairs = Vec::new();
        if pair_without_repeats(&rest, history, &mut budget, &mut pairs) {
            return (pairs, Some(order[bye_index]));
        }
        if budget == 0 {
            break;
        }
    }

    let (rest, bye) = order.split_at(order.len() - 1);
    (pair_greedily(rest, history), bye.first().copied())
}

/// Generate one Swiss round.
///
/// # Arguments
///
/// * `participants` - Active participants
/// * `round_number` - 1-based round number
/// * `previous_opponents` - Opponents each participant already played
/// * `swiss_points` - Current points (missing entries count as 0)
/// * `elo_multiplier` - Multiplier stored on the round
///
/// # Returns
///
/// * `BracketResult<Round>` - `ready` pairings, plus a single `bye` match
///   when the participant count is odd
pub fn generate_swiss_round(
    participants: &[Participant],
    round_number: u32,
    previous_opponents: &OpponentHistory,
    swiss_points: &SwissPoints,
    elo_multiplier: u32,
) -> BracketResult<Round> {
    if participants.is_empty() {
        return Err(BracketError::NotEnoughParticipants {
            needed: 1,
            actual: 0,
        });
    }
    ensure_unique(participants)?;

    let order = pairing_order(participants, swiss_points);
    let (pairs, bye) = pair_round(&order, previous_opponents);

    let mut round = Round::new(
        round_number,
        format!("Swiss Round {round_number}"),
        BracketType::SwissRound,
        elo_multiplier,
    );
    round.matches = pairs
        .iter()
        .enumerate()
        .map(|(position, &(a, b))| Match::seeded(position, Some(a), Some(b)))
        .collect();
    if let Some(bye) = bye {
        round
            .matches
            .push(Match::seeded(round.matches.len(), Some(bye), None));
    }

    debug!(
        "Generated Swiss round {}: {} pairings, bye: {:?}",
        round_number,
        pairs.len(),
        bye
    );

    Ok(round)
}

/// Sum of the points of every opponent `participant` has played.
pub fn calculate_buchholz(
    participant: ParticipantId,
    previous_opponents: &OpponentHistory,
    swiss_points: &SwissPoints,
) -> u32 {
    previous_opponents
        .get(&participant)
        .map(|opponents| {
            opponents
                .iter()
                .map(|o| swiss_points.get(o).copied().unwrap_or(0))
                .sum()
        })
        .unwrap_or(0)
}

/// Standings by points, then Buchholz, then seed rank
pub fn swiss_standings(
    participants: &[Participant],
    previous_opponents: &OpponentHistory,
    swiss_points: &SwissPoints,
) -> Vec<SwissStanding> {
    let mut standings: Vec<SwissStanding> = sort_by_seed(participants)
        .iter()
        .map(|p| SwissStanding {
            participant_id: p.id,
            points: swiss_points.get(&p.id).copied().unwrap_or(0),
            buchholz: calculate_buchholz(p.id, previous_opponents, swiss_points),
        })
        .collect();
    standings.sort_by(|a, b| b.points.cmp(&a.points).then(b.buchholz.cmp(&a.buchholz)));
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::models::MatchStatus;

    fn roster(n: i64) -> Vec<Participant> {
        (1..=n).map(|i| Participant::new(i, i, 1600 - i as i32)).collect()
    }

    fn pairs_of(round: &Round) -> Vec<(ParticipantId, ParticipantId)> {
        round
            .matches
            .iter()
            .filter_map(|m| Some((m.participant1?, m.participant2?)))
            .collect()
    }

    #[test]
    fn test_first_round_pairs_top_down() {
        let round =
            generate_swiss_round(&roster(4), 1, &HashMap::new(), &HashMap::new(), 100).unwrap();
        assert_eq!(round.name, "Swiss Round 1");
        assert_eq!(round.bracket_type, BracketType::SwissRound);
        assert_eq!(pairs_of(&round), vec![(1, 2), (3, 4)]);
        assert!(round.matches.iter().all(|m| m.status == MatchStatus::Ready));
    }

    #[test]
    fn test_avoids_rematch() {
        let history: OpponentHistory = HashMap::from([(1, vec![2]), (2, vec![1]), (3, vec![4]), (4, vec![3])]);
        let points: SwissPoints = HashMap::from([(1, 1), (3, 1)]);
        let round = generate_swiss_round(&roster(4), 2, &history, &points, 100).unwrap();
        assert_eq!(pairs_of(&round), vec![(1, 3), (2, 4)]);
    }

    #[test]
    fn test_backtracks_when_greedy_would_repeat() {
        // Greedy takes 1-2 and strands 3 with 4, who already met
        let history: OpponentHistory = HashMap::from([(3, vec![4]), (4, vec![3])]);
        let round =
            generate_swiss_round(&roster(4), 2, &history, &HashMap::new(), 100).unwrap();
        for (a, b) in pairs_of(&round) {
            assert!(!have_met(&history, a, b), "{a} and {b} already met");
        }
    }

    #[test]
    fn test_repeat_only_when_unavoidable() {
        let history: OpponentHistory = HashMap::from([(1, vec![2])]);
        let round =
            generate_swiss_round(&roster(2), 2, &history, &HashMap::new(), 100).unwrap();
        assert_eq!(pairs_of(&round), vec![(1, 2)]);
    }

    #[test]
    fn test_odd_count_single_bye() {
        let round =
            generate_swiss_round(&roster(5), 1, &HashMap::new(), &HashMap::new(), 100).unwrap();
        let byes: Vec<_> = round
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Bye)
            .collect();
        assert_eq!(byes.len(), 1);
        assert_eq!(byes[0].participant1, Some(5));
        assert_eq!(byes[0].participant2, None);
        assert_eq!(byes[0].winner, Some(5));
    }

    #[test]
    fn test_bye_moves_up_when_lowest_would_force_repeat() {
        // With 5 on the bye, 4 has nobody new among 1, 2 and 3
        let history: OpponentHistory = HashMap::from([
            (4, vec![1, 2, 3]),
            (1, vec![4]),
            (2, vec![4]),
            (3, vec![4]),
        ]);
        let round =
            generate_swiss_round(&roster(5), 4, &history, &HashMap::new(), 100).unwrap();

        let bye = round
            .matches
            .iter()
            .find(|m| m.status == MatchStatus::Bye)
            .and_then(|m| m.participant1);
        assert_eq!(bye, Some(4));
        assert_eq!(pairs_of(&round), vec![(1, 2), (3, 5)]);
        for (a, b) in pairs_of(&round) {
            assert!(!have_met(&history, a, b), "{a} and {b} already met");
        }
    }

    #[test]
    fn test_bye_falls_to_lowest_when_every_choice_repeats() {
        let history: OpponentHistory =
            HashMap::from([(1, vec![2, 3]), (2, vec![1, 3]), (3, vec![1, 2])]);
        let round =
            generate_swiss_round(&roster(3), 3, &history, &HashMap::new(), 100).unwrap();
        assert_eq!(pairs_of(&round), vec![(1, 2)]);
        let bye = round.matches.iter().find(|m| m.status == MatchStatus::Bye);
        assert_eq!(bye.and_then(|m| m.participant1), Some(3));
    }

    #[test]
    fn test_points_drive_order() {
        let points: SwissPoints = HashMap::from([(4, 2), (3, 2), (1, 1)]);
        let round = generate_swiss_round(&roster(4), 3, &HashMap::new(), &points, 100).unwrap();
        assert_eq!(pairs_of(&round), vec![(3, 4), (1, 2)]);
    }

    #[test]
    fn test_buchholz() {
        let history: OpponentHistory = HashMap::from([(1, vec![2, 3, 9])]);
        let points: SwissPoints = HashMap::from([(2, 2), (3, 1)]);
        assert_eq!(calculate_buchholz(1, &history, &points), 3);
        assert_eq!(calculate_buchholz(2, &history, &points), 0);
    }

    #[test]
    fn test_standings_use_buchholz_tiebreak() {
        let history: OpponentHistory = HashMap::from([(1, vec![4]), (2, vec![3]), (3, vec![2]), (4, vec![1])]);
        let points: SwissPoints = HashMap::from([(1, 1), (2, 1), (3, 0), (4, 1)]);
        let standings = swiss_standings(&roster(4), &history, &points);
        let ids: Vec<_> = standings.iter().map(|s| s.participant_id).collect();
        assert_eq!(ids, vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(generate_swiss_round(&[], 1, &HashMap::new(), &HashMap::new(), 100).is_err());
    }
}
