use bevy::math::DVec3;
use criterion::{black_box, criterion_group, BenchmarkId, Criterion};
use satnet::physics::orbits::{
    components::{OrbitalElements, OriginFrame},
    kepler::{OrbitSolver, SolverStrategy},
};

fn bench_solve(c: &mut Criterion) {
    let solver = OrbitSolver::default();
    let origin = OriginFrame::new(DVec3::ZERO, 10.0);
    let mut group = c.benchmark_group("solve");
    for eccentricity in [0.0, 0.3, 0.7] {
        let elements = OrbitalElements::new(20_000.0, 20_500.0, eccentricity, 0.9, -43_000.0);
        group.bench_with_input(
            BenchmarkId::new("satellite", eccentricity),
            &elements,
            |b, elements| {
                b.iter(|| {
                    solver.solve(
                        &SolverStrategy::SATELLITE,
                        &origin,
                        black_box(elements),
                        black_box(1.234e7),
                    )
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("major_body", eccentricity),
            &elements,
            |b, elements| {
                b.iter(|| {
                    solver.solve(
                        &SolverStrategy::MAJOR_BODY,
                        &origin,
                        black_box(elements),
                        black_box(1.234e7),
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_solve);
