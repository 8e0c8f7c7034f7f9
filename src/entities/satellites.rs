//! The satellite field: thousands of small bodies orbiting the host planet.
//!
//! Satellites are not entities. They are kept in a single resource and solved in
//! parallel every frame into a packed position buffer that a renderer can upload as is.

use bevy::{
    app::{App, Plugin, Update},
    ecs::{
        query::With,
        schedule::IntoSystemConfigs,
        system::{Query, Res, ResMut, Resource},
    },
    log::debug,
    math::DVec3,
};
use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;

use super::{
    celestials::celestial::SatelliteHost,
    utils::{Radius, WorldPosition},
    SimulationSet,
};
use crate::{
    catalog::satellite::{SatelliteFilter, SatelliteRecord},
    physics::{
        orbits::{
            components::{OrbitalElements, OriginFrame},
            kepler::OrbitSolver,
        },
        util::clock::SimulatedClock,
    },
};

/// One vertex of the position buffer
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PackedPosition(pub [f32; 3]);

impl PackedPosition {
    /// NaN coordinates become zero
    pub fn from_dvec3(position: DVec3) -> Self {
        Self(
            position
                .as_vec3()
                .to_array()
                .map(|coord| if coord.is_nan() { 0.0 } else { coord }),
        )
    }
}

#[derive(Resource, Debug, Default)]
pub struct SatelliteField {
    satellites: Vec<SatelliteRecord>,
    elements: Vec<OrbitalElements>,
    positions: Vec<PackedPosition>,
    filter: SatelliteFilter,
    active_count: usize,
}

impl SatelliteField {
    /// `host_tilt` is the tilt of the host's spin axis, in radians
    pub fn new(satellites: Vec<SatelliteRecord>, host_tilt: f64) -> Self {
        let elements = satellites
            .iter()
            .map(|satellite| satellite.orbital_elements(host_tilt))
            .collect();
        let positions = vec![PackedPosition::default(); satellites.len()];
        Self {
            satellites,
            elements,
            positions,
            filter: SatelliteFilter::All,
            active_count: 0,
        }
    }

    pub fn with_filter(mut self, filter: SatelliteFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn satellites(&self) -> &[SatelliteRecord] {
        &self.satellites
    }

    pub fn positions(&self) -> &[PackedPosition] {
        &self.positions
    }

    /// The position buffer as raw bytes, three native endian f32 per satellite
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn filter(&self) -> SatelliteFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: SatelliteFilter) {
        self.filter = filter;
    }

    /// Satellites shown after the last update
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Recomputes every position for the clock's current time and returns the number
    /// of active satellites.
    ///
    /// A satellite is active once launched and when it passes the filter, otherwise it
    /// is parked inside `origin`.
    pub fn update(
        &mut self,
        solver: &OrbitSolver,
        origin: &OriginFrame,
        clock: &SimulatedClock,
    ) -> usize {
        let time = clock.velocity().0;
        let today = clock.current_datetime().map(|now| now.date());
        let filter = self.filter;
        let parked = PackedPosition::from_dvec3(solver.park(origin));

        let (positions, active): (Vec<PackedPosition>, Vec<bool>) = self
            .satellites
            .par_iter()
            .zip(self.elements.par_iter())
            .map(|(satellite, elements)| {
                let launched = today.is_some_and(|date| satellite.is_launched(date));
                if launched && filter.matches(satellite.category) {
                    let position = solver.solve_satellite(origin, elements, time);
                    (PackedPosition::from_dvec3(position), true)
                } else {
                    (parked, false)
                }
            })
            .unzip();

        let active_count = active.into_iter().filter(|active| *active).count();
        if active_count != self.active_count {
            debug!(
                "Active satellites {} -> {}",
                self.active_count, active_count
            );
        }
        self.positions = positions;
        self.active_count = active_count;
        active_count
    }
}

pub struct SatellitePlugin;

impl Plugin for SatellitePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SatelliteField>();
        app.add_systems(
            Update,
            Self::update_system.in_set(SimulationSet::Satellites),
        );
    }
}

/// Bevy Systems
impl SatellitePlugin {
    pub fn update_system(
        solver: Res<OrbitSolver>,
        clock: Res<SimulatedClock>,
        mut field: ResMut<SatelliteField>,
        host: Query<(&WorldPosition, &Radius), With<SatelliteHost>>,
    ) {
        if field.is_empty() {
            return;
        }
        let Ok((position, radius)) = host.get_single() else {
            return;
        };
        field.update(&solver, &position.origin_frame(*radius), &clock);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use bevy::ecs::{schedule::Schedule, world::World};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        catalog::satellite::{parse_satellites, UserCategory},
        config::SimulationConfig,
        physics::util::calendar::CalendarFields,
    };

    const CATALOG: &str = "Users\tPerigee\tApogee\tEccentricity\tInclination\tPeriod\tDate_of_Launch
Civil\t500\t520\t0.001\t45\t95\t1975-06-01
Commercial\t35780\t35790\t0.0001\t0\t1436\t1990-01-01
Military\t20000\t20200\t0.002\t55\t718\t1978-02-22
Education\tn/a\t600\t0\t98\t96\t1980-12-31
";

    fn field() -> SatelliteField {
        let satellites = parse_satellites(CATALOG, 100, &mut StdRng::seed_from_u64(1)).unwrap();
        SatelliteField::new(satellites, SimulationConfig::default().earth.tilt)
    }

    fn earth() -> OriginFrame {
        OriginFrame::new(DVec3::ZERO, 10.0)
    }

    #[test]
    fn test_only_launched_are_active() {
        let mut field = field();
        let clock = SimulatedClock::default();
        let active = field.update(&OrbitSolver::default(), &earth(), &clock);
        // 1981: the commercial one is still on the ground
        assert_eq!(active, 3);
        assert_eq!(field.active_count(), 3);
        assert_eq!(field.positions().len(), 4);

        let parked = PackedPosition::from_dvec3(OrbitSolver::default().park(&earth()));
        assert_eq!(field.positions()[1], parked);
        assert_ne!(field.positions()[0], parked);
    }

    #[test]
    fn test_filter() {
        let mut field = field().with_filter(SatelliteFilter::Category(UserCategory::Military));
        let clock = SimulatedClock::with_start(CalendarFields::new_year(2000), 1.0);
        assert_eq!(field.update(&OrbitSolver::default(), &earth(), &clock), 1);

        field.set_filter(SatelliteFilter::All);
        assert_eq!(field.update(&OrbitSolver::default(), &earth(), &clock), 4);
    }

    #[test]
    fn test_nan_replaced() {
        let mut field = field();
        let clock = SimulatedClock::with_start(CalendarFields::new_year(2000), 1.0);
        field.update(&OrbitSolver::default(), &earth(), &clock);
        assert!(field
            .positions()
            .iter()
            .all(|position| position.0.iter().all(|coord| coord.is_finite())));
    }

    #[test]
    fn test_active_radius() {
        let mut field = field();
        let solver = OrbitSolver::default();
        let clock = SimulatedClock::default();
        field.update(&solver, &earth(), &clock);
        let [x, y, z] = field.positions()[0].0;
        let distance = (x * x + y * y + z * z).sqrt() as f64;
        let perigee = 500.0 * solver.scale_factor() + 10.0;
        let apogee = 520.0 * solver.scale_factor() + 10.0;
        assert!(distance >= perigee * 0.999 && distance <= apogee * 1.001);
    }

    #[test]
    fn test_position_bytes() {
        let mut field = field();
        field.update(&OrbitSolver::default(), &earth(), &SimulatedClock::default());
        let bytes = field.position_bytes();
        assert_eq!(bytes.len(), 4 * 3 * std::mem::size_of::<f32>());
        let first = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_relative_eq!(first, field.positions()[0].0[0]);
    }

    #[test]
    fn test_update_system() {
        let config = SimulationConfig::default();
        let mut world = World::new();
        world.insert_resource(OrbitSolver::from_config(&config));
        world.insert_resource(SimulatedClock::from_config(&config));
        world.insert_resource(field());
        world.spawn((WorldPosition(DVec3::new(1.0, 2.0, 3.0)), Radius(10.0), SatelliteHost));

        let mut schedule = Schedule::default();
        schedule.add_systems(SatellitePlugin::update_system);
        schedule.run(&mut world);

        let field = world.resource::<SatelliteField>();
        assert_eq!(field.active_count(), 3);
        let parked = field.positions()[1].0;
        assert_eq!(parked, [11.0, 2.0, 3.0]);
    }
}
