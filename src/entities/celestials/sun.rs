use bevy::{
    ecs::{entity::Entity, system::Commands},
    log::info,
};

use super::celestial::{CelestialBundle, CelestialKind, OrbitBundle, OrbitsAround};
use crate::{
    config::{BodyOrbitConfig, MajorBodyConfig, SimulationConfig},
    physics::orbits::kepler::SolverStrategy,
};

/// The Sun as seen from the Earth: it follows the Earth's own orbit around its host.
pub struct SunBuilder {
    size: f64,
    tilt: f64,
    rotation_speed: f64,
    orbit: BodyOrbitConfig,
}

impl Default for SunBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SunBuilder {
    pub fn new() -> Self {
        Self {
            size: MajorBodyConfig::SUN.size,
            tilt: MajorBodyConfig::SUN.tilt,
            rotation_speed: MajorBodyConfig::SUN.rotation_speed,
            orbit: BodyOrbitConfig::EARTH,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new()
            .size(config.sun.size)
            .tilt(config.sun.tilt)
            .rotation_speed(config.sun.rotation_speed)
            .orbit(config.earth_orbit)
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn tilt(mut self, tilt: f64) -> Self {
        self.tilt = tilt;
        self
    }

    pub fn rotation_speed(mut self, rotation_speed: f64) -> Self {
        self.rotation_speed = rotation_speed;
        self
    }

    pub fn orbit(mut self, orbit: BodyOrbitConfig) -> Self {
        self.orbit = orbit;
        self
    }

    pub fn build(&self, host: Entity) -> (CelestialBundle, OrbitBundle) {
        (
            CelestialBundle::new(CelestialKind::Sun, self.size, self.tilt, self.rotation_speed),
            OrbitBundle {
                elements: self.orbit.elements(),
                strategy: SolverStrategy::MAJOR_BODY,
                orbits_around: OrbitsAround(host),
            },
        )
    }

    pub fn spawn(&self, commands: &mut Commands, host: Entity) -> Entity {
        let sun = commands.spawn(self.build(host)).id();
        info!("Spawned the Sun around {:?}", host);
        sun
    }
}
