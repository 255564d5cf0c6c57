use std::hint::black_box;

use blackjack_rs::cards::parse_cards;
use blackjack_rs::scoring::{evaluate, hand_value};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_hand_value(c: &mut Criterion) {
    let hard = parse_cards("Kd 7s").unwrap();
    let many_aces = parse_cards("As Ad Ah Ac 2s 3d").unwrap();

    let mut g = c.benchmark_group("hand_value");
    g.bench_with_input(BenchmarkId::new("hard", "K,7"), &hard, |b, input| {
        b.iter(|| hand_value(black_box(input)))
    });
    g.bench_with_input(BenchmarkId::new("soften", "A,A,A,A,2,3"), &many_aces, |b, input| {
        b.iter(|| hand_value(black_box(input)))
    });
    g.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let soft = parse_cards("As 6d").unwrap();
    c.bench_function("evaluate_soft_17", |b| b.iter(|| evaluate(black_box(&soft))));
}

criterion_group!(benches, bench_hand_value, bench_evaluate);
criterion_main!(benches);
