//! NUMEN Benchmark Suite
//!
//! Targets:
//!   record_event_single ............. < 1μs
//!   resolve_tick_ledger_1000 ........ < 200μs
//!   tick_step_20_deities ............ < 2ms
//!   snapshot_json_round_trip_1000 ... < 5ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use numen_core::config::NumenConfig;
use numen_core::mood::impulse;
use numen_core::{Alignment, Deity, Offering, WorldAction};

/// A deity with `events` mixed interactions spread over time.
fn seasoned_deity(events: usize) -> Deity {
    let mut deity = Deity::new(&NumenConfig::default());
    for i in 0..events {
        match i % 5 {
            0 => deity.offer(Offering::new().item(format!("gift-{}", i % 7)).value(0.6)),
            1 => deity.pray("harvest"),
            2 => deity.act(WorldAction::new().target("village").favor(0.5)),
            3 => deity.offer(Offering::new().value(0.4).alignment(Alignment::Chaotic)),
            _ => deity.desecrate("grove"),
        }
        if i % 10 == 9 {
            deity.tick(1);
        }
    }
    deity
}

/// Benchmark: record one event (target: < 1μs).
fn bench_record(c: &mut Criterion) {
    let mut deity = Deity::new(&NumenConfig::default());
    c.bench_function("record_event_single", |b| {
        b.iter(|| deity.offer(black_box(Offering::new().value(0.5))));
    });
}

/// Benchmark: impulse over a 1000-entry ledger (target: < 200μs).
fn bench_resolve(c: &mut Criterion) {
    let deity = seasoned_deity(1000);
    c.bench_function("resolve_tick_ledger_1000", |b| {
        b.iter(|| impulse::compute(black_box(deity.ledger())));
    });
}

/// Benchmark: one tick for 20 deities with 200 entries each (target: < 2ms).
fn bench_tick_many(c: &mut Criterion) {
    let mut deities: Vec<Deity> = (0..20).map(|_| seasoned_deity(200)).collect();
    c.bench_function("tick_step_20_deities", |b| {
        b.iter(|| {
            for deity in &mut deities {
                deity.tick(black_box(1));
            }
        });
    });
}

/// Benchmark: JSON snapshot out and back (target: < 5ms).
fn bench_snapshot(c: &mut Criterion) {
    let deity = seasoned_deity(1000);
    c.bench_function("snapshot_json_round_trip_1000", |b| {
        b.iter(|| {
            let json = deity.to_json().expect("serialize");
            let restored = Deity::from_json(black_box(&json)).expect("deserialize");
            black_box(restored);
        });
    });
}

criterion_group!(
    benches,
    bench_record,
    bench_resolve,
    bench_tick_many,
    bench_snapshot,
);
criterion_main!(benches);
