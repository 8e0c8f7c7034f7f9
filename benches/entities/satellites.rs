use std::fmt::Write;

use bevy::math::DVec3;
use criterion::{criterion_group, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use satnet::{
    catalog::satellite::parse_satellites,
    config::SimulationConfig,
    entities::satellites::SatelliteField,
    physics::{
        orbits::{components::OriginFrame, kepler::OrbitSolver},
        util::{calendar::CalendarFields, clock::SimulatedClock},
    },
};

/// A synthetic catalog as large as the default satellite cap
fn catalog(rows: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    let users = ["Civil", "Commercial", "Government", "Military", "Education"];
    let mut text =
        String::from("Users\tPerigee\tApogee\tEccentricity\tInclination\tPeriod\tDate_of_Launch\n");
    for _ in 0..rows {
        let perigee = rng.gen_range(300.0..36_000.0);
        let _ = writeln!(
            text,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}-06-01",
            users[rng.gen_range(0..users.len())],
            perigee,
            perigee + rng.gen_range(0.0..500.0),
            rng.gen_range(0.0..0.05),
            rng.gen_range(0.0..110.0),
            rng.gen_range(90.0..1500.0),
            rng.gen_range(1974..2024),
        );
    }
    text
}

fn bench_field_update(c: &mut Criterion) {
    let config = SimulationConfig::default();
    let satellites =
        parse_satellites(&catalog(config.max_satellites), config.max_satellites, &mut StdRng::seed_from_u64(1))
            .unwrap();
    let mut field = SatelliteField::new(satellites, config.earth.tilt);
    let solver = OrbitSolver::from_config(&config);
    let origin = OriginFrame::new(DVec3::ZERO, config.earth.size);
    let clock = SimulatedClock::with_start(CalendarFields::new_year(2024), 200.0);

    c.bench_function("satellite_field_update", |b| {
        b.iter(|| field.update(&solver, &origin, &clock))
    });
}

criterion_group!(benches, bench_field_update);
