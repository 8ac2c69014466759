//! ELO rating changes for singles, doubles and tournament rounds.

use serde::{Deserialize, Serialize};

/// K-factor for rating updates
pub const K_FACTOR: f64 = 32.0;

/// Ratings never drop below this value
pub const MIN_RATING: i32 = 100;

/// Damping applied to doubles deltas
pub const DOUBLES_DAMPING: f64 = 0.75;

/// Neutral tournament multiplier (x1)
pub const NEUTRAL_MULTIPLIER: u32 = 100;

/// Rating change for a singles result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EloChange {
    /// Points gained by the winner (and nominally lost by the loser)
    pub change: i32,
    pub winner_new_elo: i32,
    pub loser_new_elo: i32,
}

/// Rating change for a doubles result, applied identically to both teammates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoublesEloChange {
    pub change: i32,
    pub winners_new_elo: [i32; 2],
    pub losers_new_elo: [i32; 2],
}

/// Logistic expected score of `player` against `opponent`
pub fn expected_score(player_elo: f64, opponent_elo: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent_elo - player_elo) / 400.0))
}

fn base_delta(winner_elo: f64, loser_elo: f64) -> i32 {
    let expected = expected_score(winner_elo, loser_elo);
    (K_FACTOR * (1.0 - expected)).round() as i32
}

fn scale(delta: i32, factor: f64) -> i32 {
    (f64::from(delta) * factor).round() as i32
}

fn apply(winner_elo: i32, loser_elo: i32, change: i32) -> EloChange {
    EloChange {
        change,
        winner_new_elo: winner_elo + change,
        loser_new_elo: (loser_elo - change).max(MIN_RATING),
    }
}

fn apply_doubles(winners: [i32; 2], losers: [i32; 2], change: i32) -> DoublesEloChange {
    DoublesEloChange {
        change,
        winners_new_elo: winners.map(|elo| elo + change),
        losers_new_elo: losers.map(|elo| (elo - change).max(MIN_RATING)),
    }
}

fn team_average(team: [i32; 2]) -> f64 {
    (f64::from(team[0]) + f64::from(team[1])) / 2.0
}

/// Singles rating change.
///
/// # Example
///
/// ```
/// use pong_ladder::scoring::calculate_elo_change;
///
/// let result = calculate_elo_change(1000, 1000);
/// assert_eq!(result.change, 16);
/// assert_eq!(result.winner_new_elo, 1016);
/// assert_eq!(result.loser_new_elo, 984);
/// ```
pub fn calculate_elo_change(winner_elo: i32, loser_elo: i32) -> EloChange {
    let change = base_delta(f64::from(winner_elo), f64::from(loser_elo));
    apply(winner_elo, loser_elo, change)
}

/// Doubles rating change: the base formula on team averages, damped.
pub fn calculate_doubles_elo_change(winners: [i32; 2], losers: [i32; 2]) -> DoublesEloChange {
    let delta = base_delta(team_average(winners), team_average(losers));
    apply_doubles(winners, losers, scale(delta, DOUBLES_DAMPING))
}

/// Singles rating change scaled by a round multiplier in percent.
pub fn calculate_tournament_elo_change(
    winner_elo: i32,
    loser_elo: i32,
    multiplier: u32,
) -> EloChange {
    let delta = base_delta(f64::from(winner_elo), f64::from(loser_elo));
    let change = scale(delta, f64::from(multiplier) / 100.0);
    apply(winner_elo, loser_elo, change)
}

/// Doubles rating change scaled by a round multiplier in percent.
pub fn calculate_doubles_tournament_elo_change(
    winners: [i32; 2],
    losers: [i32; 2],
    multiplier: u32,
) -> DoublesEloChange {
    let delta = base_delta(team_average(winners), team_average(losers));
    let damped = scale(delta, DOUBLES_DAMPING);
    apply_doubles(winners, losers, scale(damped, f64::from(multiplier) / 100.0))
}

/// Rating change for quick-entry results recorded without game scores.
///
/// Uses the plain base formula with no score-margin bonus.
pub fn calculate_flat_elo_change(winner_elo: i32, loser_elo: i32) -> EloChange {
    calculate_elo_change(winner_elo, loser_elo)
}

/// Multiplier for step `index` of `steps`, linear from `base` to `final_multiplier`.
///
/// A single-step schedule uses the final multiplier.
pub fn interpolate_multiplier(index: usize, steps: usize, base: u32, final_multiplier: u32) -> u32 {
    if steps <= 1 {
        return final_multiplier;
    }

    let index = index.min(steps - 1);
    let fraction = index as f64 / (steps - 1) as f64;
    let value = f64::from(base) + (f64::from(final_multiplier) - f64::from(base)) * fraction;
    value.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_ratings() {
        let result = calculate_elo_change(1000, 1000);
        assert_eq!(result.change, 16);
        assert_eq!(result.winner_new_elo, 1016);
        assert_eq!(result.loser_new_elo, 984);
    }

    #[test]
    fn test_expected_score_symmetry() {
        let a = expected_score(1400.0, 1200.0);
        let b = expected_score(1200.0, 1400.0);
        assert!((a + b - 1.0).abs() < 1e-9);
        assert!(a > 0.5);
    }

    #[test]
    fn test_upset_pays_more() {
        let upset = calculate_elo_change(1000, 1400);
        let expected_win = calculate_elo_change(1400, 1000);
        assert!(upset.change > expected_win.change);
        assert_eq!(upset.change + expected_win.change, 32);
    }

    #[test]
    fn test_loser_floor() {
        let result = calculate_elo_change(2000, 105);
        assert!(result.loser_new_elo >= MIN_RATING);

        let result = calculate_elo_change(100, 100);
        assert_eq!(result.loser_new_elo, MIN_RATING);
    }

    #[test]
    fn test_tournament_multiplier() {
        assert_eq!(calculate_tournament_elo_change(1000, 1000, 300).change, 48);
        assert_eq!(calculate_tournament_elo_change(1000, 1000, 150).change, 24);
        assert_eq!(
            calculate_tournament_elo_change(1000, 1000, NEUTRAL_MULTIPLIER),
            calculate_elo_change(1000, 1000)
        );
    }

    #[test]
    fn test_doubles_damping() {
        let result = calculate_doubles_elo_change([1100, 900], [1000, 1000]);
        assert_eq!(result.change, 12);
        assert_eq!(result.winners_new_elo, [1112, 912]);
        assert_eq!(result.losers_new_elo, [988, 988]);
    }

    #[test]
    fn test_doubles_tournament() {
        let result = calculate_doubles_tournament_elo_change([1000, 1000], [1000, 1000], 200);
        assert_eq!(result.change, 24);
    }

    #[test]
    fn test_flat_matches_base() {
        assert_eq!(
            calculate_flat_elo_change(1234, 1100),
            calculate_elo_change(1234, 1100)
        );
    }

    #[test]
    fn test_interpolate_multiplier() {
        assert_eq!(interpolate_multiplier(0, 1, 150, 300), 300);
        assert_eq!(interpolate_multiplier(0, 3, 150, 300), 150);
        assert_eq!(interpolate_multiplier(1, 3, 150, 300), 225);
        assert_eq!(interpolate_multiplier(2, 3, 150, 300), 300);
        assert_eq!(interpolate_multiplier(1, 4, 150, 300), 200);
    }
}
