//! Knockout stage seeded from group-stage placements.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::errors::BracketResult;
use super::models::{Bracket, Participant, ParticipantId};
use super::seeding::compare_by_seed;
use super::single_elimination::generate_single_elimination_bracket;

/// Where a participant finished in the group stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPlacement {
    pub group_name: String,
    /// 1 = group winner
    pub placement: u32,
}

/// Qualified participants in knockout seed order.
///
/// Group winners outrank runners-up and so on; equal placements are ordered
/// by the usual seed comparison.
pub fn knockout_seed_order(
    participants: &[Participant],
    placements: &HashMap<ParticipantId, GroupPlacement>,
) -> Vec<Participant> {
    let mut qualified: Vec<(&Participant, u32)> = participants
        .iter()
        .filter_map(|p| placements.get(&p.id).map(|pl| (p, pl.placement)))
        .collect();

    qualified.sort_by(|(a, pa), (b, pb)| pa.cmp(pb).then_with(|| compare_by_seed(a, b)));
    qualified.into_iter().map(|(p, _)| p.clone()).collect()
}

/// Generate a single-elimination knockout from group placements.
///
/// Only participants present in `placements` qualify. They receive explicit
/// seeds `1..=n` in [`knockout_seed_order`] and the bracket is built by the
/// single-elimination generator.
pub fn generate_knockout_from_groups(
    participants: &[Participant],
    placements: &HashMap<ParticipantId, GroupPlacement>,
    base_multiplier: u32,
    final_multiplier: u32,
) -> BracketResult<Bracket> {
    let seeded: Vec<Participant> = knockout_seed_order(participants, placements)
        .into_iter()
        .enumerate()
        .map(|(index, p)| p.with_seed(index as u32 + 1))
        .collect();

    debug!(
        "Knockout from groups: {} of {} participants qualified",
        seeded.len(),
        participants.len()
    );

    generate_single_elimination_bracket(&seeded, base_multiplier, final_multiplier)
}
