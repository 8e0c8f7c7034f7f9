use bevy::{
    app::{App, Plugin, Startup, Update},
    ecs::{
        bundle::Bundle,
        component::Component,
        entity::Entity,
        query::With,
        schedule::IntoSystemConfigs,
        system::{Commands, Query, Res},
    },
    log::warn,
    math::{DQuat, DVec3},
    transform::components::Transform,
};
use hashbrown::HashMap;
use strum_macros::Display;

use super::{earthlike::EarthLikeBuilder, sun::SunBuilder};
use crate::{
    config::SimulationConfig,
    entities::{
        utils::{Radius, WorldPosition},
        SimulationSet,
    },
    physics::{
        orbits::{
            components::{OrbitalElements, OriginFrame},
            kepler::{OrbitSolver, SolverStrategy},
        },
        util::{clock::SimulatedClock, vectors::rotation_axis},
    },
};

/// Which major body an entity is
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CelestialKind {
    Sun,
    Earth,
    Moon,
}

/// The entity this one orbits
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbitsAround(pub Entity);

/// Marks the body the satellite field orbits
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SatelliteHost;

/// Rotation of a body on itself
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub axis: DVec3,
    /// Radians per frame per unit of time scale
    pub rotation_speed: f64,
    pub rotation: DQuat,
}

impl Spin {
    pub fn new(tilt: f64, rotation_speed: f64) -> Self {
        Self {
            axis: rotation_axis(tilt),
            rotation_speed,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Rotates about the body's own axis
    pub fn advance(&mut self, time_scale: f64) {
        let step = DQuat::from_axis_angle(self.axis, self.rotation_speed * time_scale);
        self.rotation = (self.rotation * step).normalize();
    }
}

#[derive(Bundle)]
pub struct CelestialBundle {
    pub kind: CelestialKind,
    pub radius: Radius,
    pub spin: Spin,
    pub position: WorldPosition,
    pub transform: Transform,
}

impl CelestialBundle {
    pub fn new(kind: CelestialKind, radius: f64, tilt: f64, rotation_speed: f64) -> Self {
        Self {
            kind,
            radius: Radius(radius),
            spin: Spin::new(tilt, rotation_speed),
            position: WorldPosition::default(),
            transform: Transform::default(),
        }
    }
}

#[derive(Bundle)]
pub struct OrbitBundle {
    pub elements: OrbitalElements,
    pub strategy: SolverStrategy,
    pub orbits_around: OrbitsAround,
}

/// A plugin that spawns the major bodies and moves them every frame
pub struct CelestialPlugin;

impl Plugin for CelestialPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, Self::spawn_system);
        app.add_systems(Update, Self::orbit_system.in_set(SimulationSet::Orbits));
        app.add_systems(Update, Self::spin_system.in_set(SimulationSet::Spin));
        app.add_systems(Update, Self::sync_transform_system.in_set(SimulationSet::Sync));
    }
}

/// Bevy Systems
impl CelestialPlugin {
    /// The Earth sits still at the scene root, the Sun and the Moon orbit it
    pub fn spawn_system(mut commands: Commands, config: Res<SimulationConfig>) {
        let earth = EarthLikeBuilder::earth(&config).spawn(&mut commands, None);
        EarthLikeBuilder::moon(&config).spawn(&mut commands, Some(earth));
        SunBuilder::from_config(&config).spawn(&mut commands, earth);
    }

    /// Every orbiting body is solved against the origin positions of the previous system
    /// run, so a body orbiting another orbiting body lags one frame behind it.
    #[allow(clippy::type_complexity)]
    pub fn orbit_system(
        solver: Res<OrbitSolver>,
        clock: Res<SimulatedClock>,
        mut bodies: Query<(
            Entity,
            &Radius,
            &mut WorldPosition,
            Option<(&OrbitalElements, &SolverStrategy, &OrbitsAround)>,
        )>,
    ) {
        let origins: HashMap<Entity, OriginFrame> = bodies
            .iter()
            .map(|(entity, radius, position, _)| (entity, position.origin_frame(*radius)))
            .collect();
        let time = clock.velocity().0;

        for (entity, _, mut position, orbit) in bodies.iter_mut() {
            let Some((elements, strategy, around)) = orbit else {
                continue;
            };
            match origins.get(&around.0) {
                Some(origin) => position.0 = solver.solve(strategy, origin, elements, time),
                None => warn!("{:?} orbits {:?}, which has no position", entity, around.0),
            }
        }
    }

    pub fn spin_system(clock: Res<SimulatedClock>, mut spins: Query<&mut Spin>) {
        let time_scale = clock.time_scale();
        for mut spin in spins.iter_mut() {
            spin.advance(time_scale);
        }
    }

    pub fn sync_transform_system(
        mut bodies: Query<(&WorldPosition, Option<&Spin>, &mut Transform), With<Radius>>,
    ) {
        for (position, spin, mut transform) in bodies.iter_mut() {
            transform.translation = position.0.as_vec3();
            if let Some(spin) = spin {
                transform.rotation = spin.rotation.as_f32();
            }
        }
    }
}
