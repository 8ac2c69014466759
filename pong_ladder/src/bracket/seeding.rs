//! Bracket sizing, seed-slot ordering and rank sorting.

use std::cmp::Ordering;

use super::models::Participant;

/// Smallest power of two that is >= `n` (0 and 1 both map to 1).
pub fn next_power_of_2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Seed number occupying each bracket slot.
///
/// Starts from `[1, 2]` and on every doubling replaces each seed `p` with the
/// pair `[p, new_size + 1 - p]`, so seed 1 opens against seed `size` and the
/// top two seeds sit in opposite halves.
///
/// `size` is expected to be a power of two.
pub fn generate_seed_positions(size: usize) -> Vec<usize> {
    if size <= 1 {
        return vec![1];
    }

    let mut positions = vec![1, 2];
    while positions.len() < size {
        let next_size = positions.len() * 2;
        positions = positions
            .iter()
            .flat_map(|&p| [p, next_size + 1 - p])
            .collect();
    }
    positions
}

/// Rank comparison used by every generator.
///
/// Seeded entries come first in ascending seed order; unseeded entries follow
/// by rating, strongest first. Participant ID breaks any remaining tie.
pub fn compare_by_seed(a: &Participant, b: &Participant) -> Ordering {
    match (a.seed, b.seed) {
        (Some(sa), Some(sb)) => sa
            .cmp(&sb)
            .then_with(|| b.seed_override.cmp(&a.seed_override))
            .then_with(|| b.elo.cmp(&a.elo)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.elo.cmp(&a.elo),
    }
    .then_with(|| a.id.cmp(&b.id))
}

/// Participants in rank order. The input slice is left untouched.
pub fn sort_by_seed(participants: &[Participant]) -> Vec<Participant> {
    let mut ranked = participants.to_vec();
    ranked.sort_by(compare_by_seed);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_power_of_2() {
        assert_eq!(next_power_of_2(0), 1);
        assert_eq!(next_power_of_2(1), 1);
        assert_eq!(next_power_of_2(2), 2);
        assert_eq!(next_power_of_2(3), 4);
        assert_eq!(next_power_of_2(5), 8);
        assert_eq!(next_power_of_2(8), 8);
        assert_eq!(next_power_of_2(9), 16);
    }

    #[test]
    fn test_seed_positions_known_layouts() {
        assert_eq!(generate_seed_positions(2), vec![1, 2]);
        assert_eq!(generate_seed_positions(4), vec![1, 4, 2, 3]);
        assert_eq!(generate_seed_positions(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn test_seed_positions_are_permutation() {
        for size in [1, 2, 4, 8, 16, 32, 64] {
            let mut positions = generate_seed_positions(size);
            positions.sort_unstable();
            assert_eq!(positions, (1..=size).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_top_seed_meets_bottom_seed_first() {
        let positions = generate_seed_positions(16);
        let top = positions.iter().position(|&s| s == 1).unwrap();
        let bottom = positions.iter().position(|&s| s == 16).unwrap();
        assert_eq!(top / 2, bottom / 2, "Seeds 1 and 16 should share a match");
    }

    #[test]
    fn test_sort_by_seed_seeded_first() {
        let participants = vec![
            Participant::new(1, 11, 1800),
            Participant::new(2, 12, 1000).with_seed(2),
            Participant::new(3, 13, 1500),
            Participant::new(4, 14, 900).with_seed(1),
        ];

        let ranked = sort_by_seed(&participants);
        let ids: Vec<_> = ranked.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);

        // Input is untouched
        assert_eq!(participants[0].id, 1);
        assert_eq!(participants[3].id, 4);
    }

    #[test]
    fn test_sort_by_seed_rating_ties_by_id() {
        let participants = vec![
            Participant::new(7, 1, 1200),
            Participant::new(3, 2, 1200),
            Participant::new(5, 3, 1300),
        ];
        let ids: Vec<_> = sort_by_seed(&participants).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 3, 7]);
    }

    #[test]
    fn test_manual_seed_wins_equal_seed() {
        let mut stored = Participant::new(1, 1, 2000);
        stored.seed = Some(1);
        let manual = Participant::new(2, 2, 1000).with_seed(1);

        let ids: Vec<_> = sort_by_seed(&[stored, manual])
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
