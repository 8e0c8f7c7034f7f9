//! This module contains all the top level bundles, plugins and systems.
//! [crate::physics] does the math, this module wires it into bevy.

use bevy::{
    app::{App, Plugin, PluginGroup, PluginGroupBuilder, Update},
    ecs::schedule::{IntoSystemSetConfigs, SystemSet},
};

use crate::{
    config::SimulationConfig,
    physics::{orbits::kepler::OrbitSolver, util::clock::SimulatedClock},
};

pub mod celestials;
pub mod clock;
pub mod launch_sites;
pub mod satellites;
pub mod utils;

/// Per frame stages, run in declaration order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Clock,
    Orbits,
    Satellites,
    Spin,
    Sync,
}

pub struct EntitiesPluginGroup;

impl PluginGroup for EntitiesPluginGroup {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(clock::ClockPlugin)
            .add(celestials::celestial::CelestialPlugin)
            .add(satellites::SatellitePlugin)
            .add(launch_sites::LaunchSitePlugin)
    }
}

/// Everything the simulation needs, built from one [SimulationConfig]
#[derive(Default)]
pub struct SimulationPlugin {
    config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone());
        app.insert_resource(OrbitSolver::from_config(&self.config));
        app.insert_resource(SimulatedClock::from_config(&self.config));
        app.configure_sets(
            Update,
            (
                SimulationSet::Clock,
                SimulationSet::Orbits,
                SimulationSet::Satellites,
                SimulationSet::Spin,
                SimulationSet::Sync,
            )
                .chain(),
        );
        app.add_plugins(EntitiesPluginGroup);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::{app::App, time::Time};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        catalog::satellite::parse_satellites,
        entities::satellites::SatelliteField,
        physics::util::clock::SimSeconds,
    };

    #[test]
    fn test_simulation_frames() {
        let config = SimulationConfig::default().time_scale(1000.0);
        let satellites = parse_satellites(
            "Users\tPerigee\tApogee\tEccentricity\tInclination\tPeriod\tDate_of_Launch\nCivil\t500\t520\t0.001\t45\t95\t1975-06-01\n",
            10,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();

        let mut app = App::new();
        app.add_plugins(SimulationPlugin::new(config.clone()));
        app.insert_resource(SatelliteField::new(satellites, config.earth.tilt));
        app.init_resource::<Time>();

        for _ in 0..3 {
            app.world.resource_mut::<Time>().advance_by(Duration::from_millis(500));
            app.update();
        }

        let clock = app.world.resource::<SimulatedClock>();
        assert_eq!(clock.velocity(), SimSeconds(1500.0));
        assert_eq!(app.world.resource::<SatelliteField>().active_count(), 1);
    }
}
