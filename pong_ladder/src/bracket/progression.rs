//! Result recording, winner advancement and feeder-link repair.
//!
//! Every slot with a feeder link resolves to one of three states: a known
//! participant, void (the feeder can never produce one, e.g. the loser of a
//! bye) or still unknown. Settling a bracket walks rounds in order, since
//! feeders always sit in earlier rounds, and applies the state of each slot.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::double_elimination::{double_elimination_sources, grand_finals_round};
use super::errors::{ProgressionError, ProgressionResult};
use super::models::{
    Bracket, BracketFormat, FeedOutcome, FeederLink, Match, MatchStatus, ParticipantId, Slot,
};
use super::single_elimination::winners_tree_sources;
use crate::events::TournamentEvent;
use crate::scoring::{
    BestOfSettings, GameScore, Side, get_round_default_best_of, resolve_best_of, validate_scores,
};

/// Positional address of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRef {
    pub round: u32,
    pub position: usize,
}

/// A participant written into a dependent slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advancement {
    pub participant: ParticipantId,
    pub to: MatchRef,
    pub slot: Slot,
}

/// Everything that changed because of one recorded result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub decided: MatchRef,
    pub winner: ParticipantId,
    pub loser: Option<ParticipantId>,
    pub walkover: bool,
    pub advanced: Vec<Advancement>,
    /// Matches promoted from `pending` to `ready`
    pub ready: Vec<MatchRef>,
    /// Matches closed as byes (void slots, unneeded reset)
    pub byes: Vec<MatchRef>,
    /// Set when this result decided the bracket
    pub champion: Option<ParticipantId>,
}

impl Progress {
    /// Notifications describing this progress, in order
    pub fn events(&self) -> Vec<TournamentEvent> {
        let mut events = vec![TournamentEvent::MatchCompleted {
            round: self.decided.round,
            position: self.decided.position,
            winner: self.winner,
            loser: self.loser,
            walkover: self.walkover,
        }];
        events.extend(self.advanced.iter().map(|a| TournamentEvent::ParticipantAdvanced {
            participant: a.participant,
            round: a.to.round,
            position: a.to.position,
        }));
        events.extend(self.ready.iter().map(|r| TournamentEvent::MatchReady {
            round: r.round,
            position: r.position,
        }));
        if let Some(champion) = self.champion {
            events.push(TournamentEvent::TournamentCompleted { champion });
        }
        events
    }
}

/// Counts of everything a repair pass touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReport {
    pub links_added: usize,
    pub links_corrected: usize,
    pub match_ids_filled: usize,
    pub slots_filled: usize,
    pub promoted: usize,
    pub byes_closed: usize,
}

impl RepairReport {
    pub fn total(&self) -> usize {
        self.links_added
            + self.links_corrected
            + self.match_ids_filled
            + self.slots_filled
            + self.promoted
            + self.byes_closed
    }

    /// Nothing needed fixing
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    pub fn events(&self) -> Vec<TournamentEvent> {
        if self.is_clean() {
            Vec::new()
        } else {
            vec![TournamentEvent::BracketRepaired {
                changes: self.total(),
            }]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Filled(ParticipantId),
    Void,
    Unknown,
}

enum Change {
    Filled(Advancement),
    Ready(MatchRef),
    Closed(MatchRef),
}

fn resolve_link(bracket: &Bracket, link: &FeederLink) -> SlotState {
    let Some(feeder) = bracket.match_at(link.round, link.position) else {
        return SlotState::Unknown;
    };
    if !feeder.status.is_decided() {
        return SlotState::Unknown;
    }

    let participant = match link.outcome {
        FeedOutcome::Winner => feeder.winner,
        FeedOutcome::Loser => feeder.loser(),
    };
    participant.map_or(SlotState::Void, SlotState::Filled)
}

fn slot_state(bracket: &Bracket, m: &Match, slot: Slot) -> SlotState {
    if let Some(participant) = m.participant(slot) {
        return SlotState::Filled(participant);
    }
    m.source(slot)
        .map_or(SlotState::Unknown, |link| resolve_link(bracket, link))
}

fn winners_rounds(bracket: &Bracket) -> u32 {
    bracket.bracket_size.trailing_zeros()
}

/// Champion to close the reset with, when the winners-side finalist took the Grand Finals
fn unneeded_reset(bracket: &Bracket, round: u32) -> Option<ParticipantId> {
    if bracket.format != BracketFormat::DoubleElimination {
        return None;
    }
    let grand_finals = grand_finals_round(winners_rounds(bracket));
    if round != grand_finals + 1 {
        return None;
    }

    let decider = bracket.match_at(grand_finals, 0)?;
    let winner = decider.winner.filter(|_| decider.status.is_decided())?;
    (decider.participant1 == Some(winner)).then_some(winner)
}

/// Winner of the deciding match, once there is one
pub fn champion(bracket: &Bracket) -> Option<ParticipantId> {
    match bracket.format {
        BracketFormat::SingleElimination | BracketFormat::DoubleElimination => {
            let last = bracket.rounds.last()?.matches.first()?;
            last.winner.filter(|_| last.status.is_decided())
        }
        BracketFormat::RoundRobin | BracketFormat::Swiss => None,
    }
}

fn settle(bracket: &mut Bracket) -> Vec<Change> {
    let mut changes = Vec::new();

    for ri in 0..bracket.rounds.len() {
        let round = bracket.rounds[ri].number;
        for pi in 0..bracket.rounds[ri].matches.len() {
            let at = MatchRef { round, position: pi };
            if bracket.rounds[ri].matches[pi].status.is_decided() {
                continue;
            }

            if let Some(champion) = unneeded_reset(bracket, round) {
                let m = &mut bracket.rounds[ri].matches[pi];
                m.participant1 = Some(champion);
                m.participant2 = None;
                m.winner = Some(champion);
                m.status = MatchStatus::Bye;
                changes.push(Change::Closed(at));
                continue;
            }

            let states = {
                let m = &bracket.rounds[ri].matches[pi];
                [
                    (Slot::One, slot_state(bracket, m, Slot::One)),
                    (Slot::Two, slot_state(bracket, m, Slot::Two)),
                ]
            };

            let m = &mut bracket.rounds[ri].matches[pi];
            for (slot, state) in states {
                if let SlotState::Filled(participant) = state
                    && m.participant(slot).is_none()
                {
                    m.set_participant(slot, Some(participant));
                    changes.push(Change::Filled(Advancement {
                        participant,
                        to: at,
                        slot,
                    }));
                }
            }

            match (states[0].1, states[1].1) {
                (SlotState::Filled(_), SlotState::Filled(_)) => {
                    if m.status == MatchStatus::Pending {
                        m.status = MatchStatus::Ready;
                        changes.push(Change::Ready(at));
                    }
                }
                (SlotState::Filled(p), SlotState::Void) | (SlotState::Void, SlotState::Filled(p)) => {
                    m.winner = Some(p);
                    m.status = MatchStatus::Bye;
                    changes.push(Change::Closed(at));
                }
                (SlotState::Void, SlotState::Void) => {
                    m.winner = None;
                    m.status = MatchStatus::Bye;
                    changes.push(Change::Closed(at));
                }
                _ => {}
            }
        }
    }

    changes
}

fn decide(
    bracket: &mut Bracket,
    round: u32,
    position: usize,
    winner: ParticipantId,
    status: MatchStatus,
    scores: Vec<GameScore>,
) -> ProgressionResult<Progress> {
    let champion_before = champion(bracket);

    let m = bracket
        .match_at_mut(round, position)
        .ok_or(ProgressionError::MatchNotFound { round, position })?;
    if m.status.is_decided() {
        return Err(ProgressionError::AlreadyDecided);
    }
    if m.status != MatchStatus::Ready || !m.has_both_participants() {
        return Err(ProgressionError::NotReady(m.status));
    }
    if !m.involves(winner) {
        return Err(ProgressionError::WinnerNotInMatch(winner));
    }

    m.winner = Some(winner);
    m.status = status;
    m.scores = scores;
    let loser = m.loser();

    info!("Round {round} match {position}: {winner} beat {loser:?} ({status})");

    let mut progress = Progress {
        decided: MatchRef { round, position },
        winner,
        loser,
        walkover: status == MatchStatus::Walkover,
        advanced: Vec::new(),
        ready: Vec::new(),
        byes: Vec::new(),
        champion: None,
    };

    for change in settle(bracket) {
        match change {
            Change::Filled(advancement) => progress.advanced.push(advancement),
            Change::Ready(at) => progress.ready.push(at),
            Change::Closed(at) => progress.byes.push(at),
        }
    }

    if champion_before.is_none() {
        progress.champion = champion(bracket);
    }
    if let Some(champion) = progress.champion {
        info!("Bracket decided: champion {champion}");
    }

    Ok(progress)
}

/// Record a played result.
///
/// # Arguments
///
/// * `bracket` - Bracket to update
/// * `round` - Round number of the match
/// * `position` - Position of the match within the round
/// * `winner` - Winning participant, must be in the match
/// * `scores` - Game scores to store with the result
///
/// # Returns
///
/// * `ProgressionResult<Progress>` - Advancements, newly ready matches and the
///   champion if the bracket is now decided
pub fn record_result(
    bracket: &mut Bracket,
    round: u32,
    position: usize,
    winner: ParticipantId,
    scores: Vec<GameScore>,
) -> ProgressionResult<Progress> {
    decide(bracket, round, position, winner, MatchStatus::Completed, scores)
}

/// Record a result decided without play
pub fn record_walkover(
    bracket: &mut Bracket,
    round: u32,
    position: usize,
    winner: ParticipantId,
) -> ProgressionResult<Progress> {
    decide(bracket, round, position, winner, MatchStatus::Walkover, Vec::new())
}

/// Series length in force for a match: match override, round override, then
/// the stage default for the round.
pub fn effective_best_of(
    bracket: &Bracket,
    round: u32,
    position: usize,
    settings: &BestOfSettings,
) -> Option<u8> {
    let r = bracket.round(round)?;
    let m = r.matches.get(position)?;
    let stage_default = get_round_default_best_of(&r.name, r.bracket_type, settings);
    Some(resolve_best_of(m.best_of, r.best_of, stage_default))
}

/// Validate game scores against the match's series length, then record the winner.
///
/// An override outside 1, 3, 5 or 7 is refused with `InvalidScore::InvalidBestOf`.
pub fn record_scored_result(
    bracket: &mut Bracket,
    round: u32,
    position: usize,
    games: &[GameScore],
    settings: &BestOfSettings,
) -> ProgressionResult<Progress> {
    let best_of = effective_best_of(bracket, round, position, settings)
        .ok_or(ProgressionError::MatchNotFound { round, position })?;
    let outcome = validate_scores(games, best_of)?;

    let m = bracket
        .match_at(round, position)
        .ok_or(ProgressionError::MatchNotFound { round, position })?;
    let winner = match outcome.winner {
        Side::Player1 => m.participant1,
        Side::Player2 => m.participant2,
    }
    .ok_or(ProgressionError::NotReady(m.status))?;

    record_result(bracket, round, position, winner, games.to_vec())
}

fn expected_sources(
    format: BracketFormat,
    winners_rounds: u32,
    round: u32,
    position: usize,
) -> Option<(FeederLink, FeederLink)> {
    match format {
        BracketFormat::SingleElimination => winners_tree_sources(round, position),
        BracketFormat::DoubleElimination => {
            double_elimination_sources(winners_rounds, round, position)
        }
        BracketFormat::RoundRobin | BracketFormat::Swiss => None,
    }
}

/// Re-derive feeder links from position arithmetic and settle the bracket.
///
/// Meant to run after storage has assigned IDs, or whenever persisted state
/// may have drifted. Missing or wrong links are replaced, missing feeder
/// match IDs are filled, known winners are pushed into empty slots and
/// fully populated matches are promoted. Running it on a consistent bracket
/// changes nothing.
pub fn repair_links(bracket: &mut Bracket) -> RepairReport {
    let mut report = RepairReport::default();

    bracket.rounds.sort_by_key(|r| r.number);
    for round in &mut bracket.rounds {
        round.matches.sort_by_key(|m| m.position);
    }

    let format = bracket.format;
    let winners = winners_rounds(bracket);

    for round in bracket.rounds.iter_mut().skip(1) {
        if !round.bracket_type.is_elimination() {
            continue;
        }
        let number = round.number;
        for (position, m) in round.matches.iter_mut().enumerate() {
            let Some((first, second)) = expected_sources(format, winners, number, position) else {
                continue;
            };
            for (slot, expected) in [(Slot::One, first), (Slot::Two, second)] {
                match m.source(slot) {
                    None => {
                        m.set_source(slot, Some(expected));
                        report.links_added += 1;
                    }
                    Some(current) if !current.same_target(&expected) => {
                        m.set_source(slot, Some(expected));
                        report.links_corrected += 1;
                    }
                    Some(_) => {}
                }
            }
        }
    }

    for ri in 0..bracket.rounds.len() {
        for pi in 0..bracket.rounds[ri].matches.len() {
            for slot in [Slot::One, Slot::Two] {
                let Some(link) = bracket.rounds[ri].matches[pi].source(slot).cloned() else {
                    continue;
                };
                let target_id = bracket
                    .match_at(link.round, link.position)
                    .and_then(|target| target.id);
                if target_id.is_some() && link.match_id != target_id {
                    let m = &mut bracket.rounds[ri].matches[pi];
                    m.set_source(
                        slot,
                        Some(FeederLink {
                            match_id: target_id,
                            ..link
                        }),
                    );
                    report.match_ids_filled += 1;
                }
            }
        }
    }

    for change in settle(bracket) {
        match change {
            Change::Filled(_) => report.slots_filled += 1,
            Change::Ready(_) => report.promoted += 1,
            Change::Closed(_) => report.byes_closed += 1,
        }
    }

    if report.is_clean() {
        debug!("Repair pass: bracket already consistent");
    } else {
        info!("Repair pass applied {} changes: {:?}", report.total(), report);
    }

    report
}
