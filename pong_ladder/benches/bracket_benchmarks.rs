use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pong_ladder::bracket::{
    Bracket, MatchStatus, OpponentHistory, Participant, SwissPoints,
    generate_double_elimination_bracket, generate_round_robin_groups,
    generate_single_elimination_bracket, generate_swiss_round, record_result, repair_links,
};
use pong_ladder::scoring::{GameScore, calculate_elo_change, validate_scores};
use std::hint::black_box;

/// Roster of `n` participants with descending ratings
fn roster(n: usize) -> Vec<Participant> {
    (1..=n as i64)
        .map(|i| Participant::new(i, i, 2400 - i as i32 * 3))
        .collect()
}

/// Record favorites through every ready match
fn play_out(bracket: &mut Bracket) {
    repair_links(bracket);
    let numbers: Vec<u32> = bracket.rounds.iter().map(|r| r.number).collect();
    for round in numbers {
        let count = bracket.round(round).map_or(0, |r| r.matches.len());
        for position in 0..count {
            let Some(m) = bracket.match_at(round, position) else {
                continue;
            };
            if m.status != MatchStatus::Ready {
                continue;
            }
            if let (Some(a), Some(b)) = (m.participant1, m.participant2) {
                let _ = record_result(bracket, round, position, a.min(b), Vec::new());
            }
        }
    }
}

/// Benchmark single-elimination generation across roster sizes
fn bench_single_elimination(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_elimination");

    for n in [8, 37, 128, 500] {
        let participants = roster(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &participants, |b, p| {
            b.iter(|| generate_single_elimination_bracket(black_box(p), 150, 300));
        });
    }

    group.finish();
}

/// Benchmark double-elimination generation plus a full playthrough
fn bench_double_elimination_playthrough(c: &mut Criterion) {
    let mut group = c.benchmark_group("double_elimination_playthrough");

    for n in [8, 24, 64] {
        let participants = roster(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &participants, |b, p| {
            b.iter(|| {
                if let Ok(mut bracket) = generate_double_elimination_bracket(black_box(p), 150, 300)
                {
                    play_out(&mut bracket);
                }
            });
        });
    }

    group.finish();
}

/// Benchmark an idempotent repair pass on a settled bracket
fn bench_repair_links(c: &mut Criterion) {
    let Ok(mut bracket) = generate_double_elimination_bracket(&roster(100), 150, 300) else {
        return;
    };
    repair_links(&mut bracket);

    c.bench_function("repair_links_clean_128", |b| {
        b.iter(|| repair_links(black_box(&mut bracket)));
    });
}

/// Benchmark round-robin groups
fn bench_round_robin(c: &mut Criterion) {
    let participants = roster(64);
    c.bench_function("round_robin_64_in_8_groups", |b| {
        b.iter(|| generate_round_robin_groups(black_box(&participants), 8, 100));
    });
}

/// Benchmark Swiss pairing late in an event, when the no-rematch search works hardest
fn bench_swiss_pairing(c: &mut Criterion) {
    let participants = roster(32);
    let mut history = OpponentHistory::new();
    let mut points = SwissPoints::new();

    for round_number in 1..=4 {
        let Ok(round) = generate_swiss_round(&participants, round_number, &history, &points, 100)
        else {
            return;
        };
        for m in &round.matches {
            if let (Some(a), Some(b)) = (m.participant1, m.participant2) {
                history.entry(a).or_default().push(b);
                history.entry(b).or_default().push(a);
                *points.entry(a.min(b)).or_insert(0) += 1;
            }
        }
    }

    c.bench_function("swiss_round_5_of_32", |b| {
        b.iter(|| generate_swiss_round(black_box(&participants), 5, &history, &points, 100));
    });
}

/// Benchmark score validation and rating changes
fn bench_scoring(c: &mut Criterion) {
    let games = vec![
        GameScore::new(11, 9),
        GameScore::new(8, 11),
        GameScore::new(11, 13),
        GameScore::new(11, 4),
        GameScore::new(12, 10),
    ];

    c.bench_function("validate_scores_best_of_5", |b| {
        b.iter(|| validate_scores(black_box(&games), 5));
    });

    c.bench_function("calculate_elo_change", |b| {
        b.iter(|| calculate_elo_change(black_box(1612), black_box(1488)));
    });
}

criterion_group!(
    benches,
    bench_single_elimination,
    bench_double_elimination_playthrough,
    bench_repair_links,
    bench_round_robin,
    bench_swiss_pairing,
    bench_scoring
);
criterion_main!(benches);
