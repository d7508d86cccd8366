//! Chain sweep benchmarks
//!
//! Measures full-chain evaluation when scrubbing a long chain end to end in
//! both directions.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use tweenline::{shared_target, Tween};

const SEGMENTS: usize = 256;

fn build_chain() -> Tween {
    let sprite = shared_target(HashMap::from([
        ("x".to_string(), 0.0f32),
        ("y".to_string(), 0.0f32),
    ]));
    let mut chain = Tween::new(sprite);
    for i in 0..SEGMENTS {
        let v = (i + 1) as f32;
        chain = chain.to([("x", v), ("y", -v)], 1.0);
    }
    chain
}

fn bench_scrub(c: &mut Criterion) {
    let end = SEGMENTS as f32;

    c.bench_function("scrub_forward_back", |b| {
        let mut chain = build_chain();
        b.iter(|| {
            chain.set_time(black_box(end));
            chain.set_time(black_box(0.0));
        });
    });

    c.bench_function("scrub_small_steps", |b| {
        let mut chain = build_chain();
        b.iter(|| {
            for _ in 0..64 {
                chain.update(black_box(0.25));
            }
            chain.set_time(black_box(0.0));
        });
    });

    c.bench_function("build_chain", |b| {
        b.iter(|| black_box(build_chain()));
    });
}

criterion_group!(benches, bench_scrub);
criterion_main!(benches);
