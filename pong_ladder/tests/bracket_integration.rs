//! Integration tests for bracket generation
//!
//! These tests check the structural guarantees of every generator across a
//! range of roster sizes.

use pong_ladder::bracket::{
    BracketFormat, BracketType, MatchStatus, Participant, ParticipantId, generate_bracket,
    generate_double_elimination_bracket, generate_knockout_from_groups,
    generate_round_robin_groups, generate_seed_positions, generate_single_elimination_bracket,
    generate_swiss_round, group_standings, next_power_of_2, placements_from_standings,
    record_result, repair_links, sort_by_seed,
};
use pong_ladder::config::TournamentSettings;
use pong_ladder::scoring::GameScore;
use std::collections::{HashMap, HashSet};

fn roster(n: i64) -> Vec<Participant> {
    (1..=n)
        .map(|i| Participant::new(i, 1000 + i, 2200 - i as i32 * 7))
        .collect()
}

fn ceil_log2(n: usize) -> usize {
    next_power_of_2(n).trailing_zeros() as usize
}

#[test]
fn test_power_of_two_sizing() {
    assert_eq!(next_power_of_2(0), 1);
    assert_eq!(next_power_of_2(1), 1);
    assert_eq!(next_power_of_2(5), 8);
    assert_eq!(next_power_of_2(16), 16);
    assert_eq!(next_power_of_2(17), 32);
}

#[test]
fn test_seed_positions_pair_to_size_plus_one() {
    for size in [2, 4, 8, 16, 32] {
        let positions = generate_seed_positions(size);
        let unique: HashSet<_> = positions.iter().copied().collect();
        assert_eq!(unique.len(), size);
        assert!(positions.iter().all(|&s| (1..=size).contains(&s)));

        for pair in positions.chunks(2) {
            assert_eq!(pair[0] + pair[1], size + 1, "pair {pair:?} in size {size}");
        }
    }
    assert_eq!(generate_seed_positions(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
}

#[test]
fn test_sort_by_seed_is_pure_and_seeded_first() {
    let mut participants = roster(5);
    participants[4] = participants[4].clone().with_seed(1);
    participants[3] = participants[3].clone().with_seed(2);
    let before = participants.clone();

    let ranked: Vec<_> = sort_by_seed(&participants).iter().map(|p| p.id).collect();
    assert_eq!(ranked, vec![5, 4, 1, 2, 3]);
    assert_eq!(participants, before);
}

#[test]
fn test_single_elimination_shape() {
    for n in 2..=33 {
        let bracket = generate_single_elimination_bracket(&roster(n as i64), 150, 300).unwrap();
        let size = next_power_of_2(n);

        assert_eq!(bracket.bracket_size, size);
        assert_eq!(bracket.rounds.len(), ceil_log2(n), "rounds for {n}");
        assert_eq!(bracket.bye_count(), size - n, "byes for {n}");

        let byes_have_winners = bracket.rounds[0]
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Bye)
            .all(|m| m.winner.is_some());
        assert!(byes_have_winners);

        let last = bracket.rounds.last().unwrap();
        assert_eq!(last.name, "Finals");
        assert_eq!(last.bracket_type, BracketType::Finals);
        assert_eq!(last.elo_multiplier, 300);

        for round in &bracket.rounds[1..] {
            for (i, m) in round.matches.iter().enumerate() {
                assert_eq!(m.status, MatchStatus::Pending);
                let (a, b) = (m.source1.as_ref().unwrap(), m.source2.as_ref().unwrap());
                assert_eq!((a.round, a.position), (round.number - 1, 2 * i));
                assert_eq!((b.round, b.position), (round.number - 1, 2 * i + 1));
            }
        }
    }
}

#[test]
fn test_five_player_example() {
    let bracket = generate_single_elimination_bracket(&roster(5), 150, 300).unwrap();
    assert_eq!(bracket.bracket_size, 8);
    let first = &bracket.rounds[0].matches;
    assert_eq!(first.iter().filter(|m| m.status == MatchStatus::Bye).count(), 3);
    assert_eq!(first.iter().filter(|m| m.status == MatchStatus::Ready).count(), 1);
    assert_eq!(bracket.rounds[1].matches.len(), 2);
    assert_eq!(bracket.rounds[2].name, "Finals");
}

fn play_favorites(bracket: &mut pong_ladder::Bracket) -> Vec<(u32, ParticipantId, ParticipantId)> {
    repair_links(bracket);
    let mut meetings = Vec::new();
    let numbers: Vec<u32> = bracket.rounds.iter().map(|r| r.number).collect();
    for round in numbers {
        let count = bracket.round(round).unwrap().matches.len();
        for position in 0..count {
            let m = bracket.match_at(round, position).unwrap();
            if m.status != MatchStatus::Ready {
                continue;
            }
            let (a, b) = (m.participant1.unwrap(), m.participant2.unwrap());
            meetings.push((round, a.min(b), a.max(b)));
            record_result(bracket, round, position, a.min(b), Vec::new()).unwrap();
        }
    }
    meetings
}

#[test]
fn test_top_two_seeds_meet_only_in_final() {
    for n in 2..=40 {
        let mut bracket = generate_single_elimination_bracket(&roster(n), 150, 300).unwrap();
        let last = bracket.rounds.len() as u32;
        let meetings = play_favorites(&mut bracket);

        let top_two: Vec<_> = meetings.iter().filter(|&&(_, a, b)| (a, b) == (1, 2)).collect();
        assert_eq!(top_two.len(), 1, "roster of {n}");
        assert_eq!(top_two[0].0, last, "roster of {n}");
    }
}

#[test]
fn test_double_elimination_finals() {
    for n in [2, 4, 6, 8, 13, 32] {
        let bracket = generate_double_elimination_bracket(&roster(n), 150, 300).unwrap();
        let names: Vec<_> = bracket.rounds.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.iter().filter(|&&name| name == "Grand Finals").count(), 1);
        assert_eq!(names.iter().filter(|&&name| name == "Grand Finals Reset").count(), 1);
        assert_eq!(*names.last().unwrap(), "Grand Finals Reset");

        for (index, round) in bracket.rounds.iter().enumerate() {
            assert_eq!(round.number as usize, index + 1);
        }
    }
}

#[test]
fn test_round_robin_match_total() {
    for (n, groups) in [(4, 1), (8, 2), (10, 3), (16, 4), (7, 7)] {
        let bracket = generate_round_robin_groups(&roster(n), groups, 100).unwrap();
        let sizes: Vec<usize> = bracket.groups.iter().map(|g| g.participants.len()).collect();
        assert!(sizes.iter().max().unwrap() - sizes.iter().min().unwrap() <= 1);

        let expected: usize = sizes.iter().map(|k| k * (k - 1) / 2).sum();
        let ready = bracket.rounds[0]
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Ready)
            .count();
        assert_eq!(ready, expected);
    }
}

#[test]
fn test_swiss_odd_roster_gets_one_bye() {
    for n in [3, 5, 9, 15] {
        let round = generate_swiss_round(&roster(n), 1, &HashMap::new(), &HashMap::new(), 100)
            .unwrap();
        let byes = round
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Bye)
            .count();
        assert_eq!(byes, 1);
        assert_eq!(round.matches.len(), (n as usize).div_ceil(2));
    }
}

#[test]
fn test_groups_into_knockout() {
    let participants = roster(8);
    let settings = TournamentSettings {
        group_count: 2,
        ..TournamentSettings::with_format(BracketFormat::RoundRobin)
    };
    let mut groups = generate_bracket(&participants, &settings).unwrap();

    // Favorites win every group match 2-0
    for m in &mut groups.rounds[0].matches {
        let (a, b) = (m.participant1.unwrap(), m.participant2.unwrap());
        m.winner = Some(a.min(b));
        m.scores = if a < b {
            vec![GameScore::new(11, 6), GameScore::new(11, 8)]
        } else {
            vec![GameScore::new(6, 11), GameScore::new(8, 11)]
        };
        m.status = MatchStatus::Completed;
    }

    let table = group_standings(&groups, 0);
    assert_eq!(table[0].participant_id, 1);
    assert_eq!(table[0].wins, 3);

    let placements = placements_from_standings(&groups, 2);
    assert_eq!(placements.len(), 4);

    let knockout = generate_knockout_from_groups(&participants, &placements, 150, 300).unwrap();
    assert_eq!(knockout.bracket_size, 4);
    let opener = &knockout.rounds[0].matches[0];
    // Seed 1 (group A winner) opens against seed 4 (group A runner-up)
    assert_eq!(opener.participant1, Some(1));
    assert_eq!(opener.participant2, Some(4));
    assert_eq!(opener.status, MatchStatus::Ready);
}

#[test]
fn test_bracket_survives_json() {
    let bracket = generate_double_elimination_bracket(&roster(6), 150, 300).unwrap();
    let json = serde_json::to_string(&bracket).unwrap();
    let restored: pong_ladder::Bracket = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, bracket);
}
