use bevy::{ecs::component::Component, math::DVec3};
use derive_more::{From, Into};

use crate::physics::orbits::components::OriginFrame;

/// Radius for spherical entities, in scene units
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, From, Into)]
pub struct Radius(pub f64);

/// Position in double precision scene units.
/// [bevy::transform::components::Transform] is derived from it once per frame.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, From, Into)]
pub struct WorldPosition(pub DVec3);

impl WorldPosition {
    /// The frame this entity offers to bodies orbiting it
    pub fn origin_frame(self, radius: Radius) -> OriginFrame {
        OriginFrame::new(self.0, radius.0)
    }
}
