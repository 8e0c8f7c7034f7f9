use bevy::{
    ecs::{entity::Entity, system::Commands},
    log::{info, warn},
};

use super::celestial::{CelestialBundle, CelestialKind, OrbitBundle, OrbitsAround, SatelliteHost};
use crate::{
    config::{BodyOrbitConfig, MajorBodyConfig, SimulationConfig},
    physics::orbits::kepler::SolverStrategy,
};

/// Rocky bodies: the Earth and the Moon
pub struct EarthLikeBuilder {
    kind: CelestialKind,
    size: f64,
    tilt: f64,
    rotation_speed: f64,
    orbit: Option<BodyOrbitConfig>,
    satellite_host: bool,
}

impl Default for EarthLikeBuilder {
    fn default() -> Self {
        Self::new(CelestialKind::Earth)
    }
}

impl EarthLikeBuilder {
    pub fn new(kind: CelestialKind) -> Self {
        let body = match kind {
            CelestialKind::Moon => MajorBodyConfig::MOON,
            _ => MajorBodyConfig::EARTH,
        };
        Self {
            kind,
            size: body.size,
            tilt: body.tilt,
            rotation_speed: body.rotation_speed,
            orbit: None,
            satellite_host: false,
        }
    }

    /// The scene root, it does not orbit and hosts the satellites
    pub fn earth(config: &SimulationConfig) -> Self {
        Self::new(CelestialKind::Earth)
            .size(config.earth.size)
            .tilt(config.earth.tilt)
            .rotation_speed(config.earth.rotation_speed)
            .satellite_host(true)
    }

    pub fn moon(config: &SimulationConfig) -> Self {
        Self::new(CelestialKind::Moon)
            .size(config.moon.size)
            .tilt(config.moon.tilt)
            .rotation_speed(config.moon.rotation_speed)
            .orbit(Some(config.moon_orbit))
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

    pub fn orbit(mut self, orbit: Option<BodyOrbitConfig>) -> Self {
        self.orbit = orbit;
        self
    }

    pub fn satellite_host(mut self, satellite_host: bool) -> Self {
        self.satellite_host = satellite_host;
        self
    }

    pub fn build(&self) -> CelestialBundle {
        CelestialBundle::new(self.kind, self.size, self.tilt, self.rotation_speed)
    }

    /// Spawns the body, orbiting `host` when both an orbit and a host are given
    pub fn spawn(&self, commands: &mut Commands, host: Option<Entity>) -> Entity {
        let mut body = commands.spawn(self.build());
        match (self.orbit, host) {
            (Some(orbit), Some(host)) => {
                body.insert(OrbitBundle {
                    elements: orbit.elements(),
                    strategy: SolverStrategy::MAJOR_BODY,
                    orbits_around: OrbitsAround(host),
                });
            }
            (Some(_), None) => warn!("{} has an orbit but no host, it will stay put", self.kind),
            _ => {}
        }
        if self.satellite_host {
            body.insert(SatelliteHost);
        }
        let id = body.id();
        info!("Spawned {} as {:?}", self.kind, id);
        id
    }
}
