//! Group tables computed from recorded results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::knockout::GroupPlacement;
use super::models::{Bracket, BracketType, GroupId, MatchStatus, ParticipantId};

/// One row of a group table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStanding {
    pub participant_id: ParticipantId,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub points_for: u32,
    pub points_against: u32,
}

impl GroupStanding {
    pub fn game_difference(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }

    pub fn point_difference(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }
}

/// Table for one group, best first.
///
/// Only `completed` and `walkover` matches count. Ordering is wins, game
/// difference, point difference, then the group's draft order (which is seed
/// order). Returns an empty table for an unknown group.
pub fn group_standings(bracket: &Bracket, group_id: GroupId) -> Vec<GroupStanding> {
    let Some(group) = bracket.groups.iter().find(|g| g.id == group_id) else {
        return Vec::new();
    };

    let mut rows: HashMap<ParticipantId, GroupStanding> = group
        .participants
        .iter()
        .map(|&id| {
            (
                id,
                GroupStanding {
                    participant_id: id,
                    ..GroupStanding::default()
                },
            )
        })
        .collect();

    let decided = bracket
        .rounds
        .iter()
        .filter(|r| r.bracket_type == BracketType::Group)
        .flat_map(|r| r.matches.iter())
        .filter(|m| m.group_id == Some(group_id))
        .filter(|m| matches!(m.status, MatchStatus::Completed | MatchStatus::Walkover));

    for m in decided {
        let (Some(p1), Some(p2), Some(winner)) = (m.participant1, m.participant2, m.winner) else {
            continue;
        };
        let games1 = m.scores.iter().filter(|g| g.player1 > g.player2).count() as u32;
        let games2 = m.scores.iter().filter(|g| g.player2 > g.player1).count() as u32;
        let points1: u32 = m.scores.iter().map(|g| g.player1).sum();
        let points2: u32 = m.scores.iter().map(|g| g.player2).sum();

        for (id, won_games, lost_games, scored, conceded) in
            [(p1, games1, games2, points1, points2), (p2, games2, games1, points2, points1)]
        {
            if let Some(row) = rows.get_mut(&id) {
                row.played += 1;
                if id == winner {
                    row.wins += 1;
                } else {
                    row.losses += 1;
                }
                row.games_won += won_games;
                row.games_lost += lost_games;
                row.points_for += scored;
                row.points_against += conceded;
            }
        }
    }

    let draft_rank: HashMap<ParticipantId, usize> = group
        .participants
        .iter()
        .enumerate()
        .map(|(rank, &id)| (id, rank))
        .collect();

    let mut table: Vec<GroupStanding> = rows.into_values().collect();
    table.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.game_difference().cmp(&a.game_difference()))
            .then(b.point_difference().cmp(&a.point_difference()))
            .then(draft_rank[&a.participant_id].cmp(&draft_rank[&b.participant_id]))
    });
    table
}

/// Placements of the top `advance_per_group` of every group, for the knockout stage
pub fn placements_from_standings(
    bracket: &Bracket,
    advance_per_group: usize,
) -> HashMap<ParticipantId, GroupPlacement> {
    let mut placements = HashMap::new();
    for group in &bracket.groups {
        for (index, row) in group_standings(bracket, group.id)
            .into_iter()
            .take(advance_per_group)
            .enumerate()
        {
            placements.insert(
                row.participant_id,
                GroupPlacement {
                    group_name: group.name.clone(),
                    placement: index as u32 + 1,
                },
            );
        }
    }
    placements
}
