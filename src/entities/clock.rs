//! Drives the [SimulatedClock] from bevy's frame time.

use bevy::{
    app::{App, Plugin, Update},
    ecs::{
        schedule::IntoSystemConfigs,
        system::{Res, ResMut},
    },
    time::Time,
};

use super::SimulationSet;
use crate::physics::util::clock::SimulatedClock;

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulatedClock>();
        app.add_systems(Update, Self::tick_system.in_set(SimulationSet::Clock));
    }
}

/// Bevy Systems
impl ClockPlugin {
    pub fn tick_system(time: Res<Time>, mut clock: ResMut<SimulatedClock>) {
        clock.update(time.delta_seconds_f64());
    }
}
