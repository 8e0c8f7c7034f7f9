use criterion::{black_box, criterion_group, Criterion};
use satnet::physics::util::clock::SimulatedClock;

fn bench_run(c: &mut Criterion) {
    c.bench_function("clock_run_century", |b| {
        b.iter(|| {
            let mut clock = SimulatedClock::default();
            clock.run(black_box(3.15e9));
            clock
        })
    });
}

fn bench_update(c: &mut Criterion) {
    let mut clock = SimulatedClock::default();
    clock.set_time_scale(8_000_000.0);
    c.bench_function("clock_update", |b| {
        b.iter(|| clock.update(black_box(1.0 / 60.0)))
    });
}

criterion_group!(benches, bench_run, bench_update);
