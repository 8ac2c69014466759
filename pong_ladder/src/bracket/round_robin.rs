//! Round-robin group stage generation.

use log::debug;

use super::errors::{BracketError, BracketResult};
use super::models::{Bracket, BracketFormat, BracketType, Group, Match, Participant, Round};
use super::seeding::sort_by_seed;
use super::single_elimination::ensure_unique;

pub const GROUP_STAGE: &str = "Group Stage";

/// Alphabetic group name: A..Z, then AA, AB, ...
pub fn group_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Group index for the `rank`-th participant of a snake draft over `groups` groups
pub fn snake_group(rank: usize, groups: usize) -> usize {
    let lap = rank / groups;
    let offset = rank % groups;
    if lap % 2 == 0 {
        offset
    } else {
        groups - 1 - offset
    }
}

/// Generate round-robin groups.
///
/// Participants are ranked, snake-drafted into `group_count` groups and every
/// pairing inside a group becomes a `ready` match of a single "Group Stage"
/// round.
pub fn generate_round_robin_groups(
    participants: &[Participant],
    group_count: usize,
    elo_multiplier: u32,
) -> BracketResult<Bracket> {
    if group_count == 0 || group_count > participants.len() {
        return Err(BracketError::InvalidGroupCount {
            groups: group_count,
            participants: participants.len(),
        });
    }
    ensure_unique(participants)?;

    let mut groups: Vec<Group> = (0..group_count)
        .map(|id| Group {
            id,
            name: group_name(id),
            display_order: id,
            participants: Vec::new(),
        })
        .collect();

    for (rank, participant) in sort_by_seed(participants).iter().enumerate() {
        groups[snake_group(rank, group_count)]
            .participants
            .push(participant.id);
    }

    let mut round = Round::new(1, GROUP_STAGE, BracketType::Group, elo_multiplier);
    for group in &groups {
        for (i, &first) in group.participants.iter().enumerate() {
            for &second in &group.participants[i + 1..] {
                let mut pairing = Match::seeded(round.matches.len(), Some(first), Some(second));
                pairing.group_id = Some(group.id);
                round.matches.push(pairing);
            }
        }
    }

    debug!(
        "Generated {} groups with {} matches for {} participants",
        groups.len(),
        round.matches.len(),
        participants.len()
    );

    Ok(Bracket {
        format: BracketFormat::RoundRobin,
        bracket_size: participants.len(),
        rounds: vec![round],
        groups,
    })
}
