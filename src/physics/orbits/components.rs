#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::f64::consts::TAU;

use bevy::{ecs::component::Component, math::DVec3};
use rand::Rng;

/// Classical two-body orbital elements, as the solver consumes them.
///
/// Distances are in real-world units (km) and get rescaled by the solver.
/// The sign of `period` encodes the direction of travel.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Closest distance to the focus
    pub perigee: f64,
    /// Farthest distance to the focus
    pub apogee: f64,
    /// Must lie in `[0, 1)`, only closed ellipses are supported
    pub eccentricity: f64,
    /// Radians
    pub inclination: f64,
    /// Signed time units (seconds) for one revolution
    pub period: f64,
    /// Mean anomaly offset at time zero, in radians
    pub initial_phase: f64,
}

impl OrbitalElements {
    /// The degenerate orbit used to park a body on its host.
    /// Every field is zero, the solver guards the zero period.
    pub const ZERO: Self = Self {
        perigee: 0.0,
        apogee: 0.0,
        eccentricity: 0.0,
        inclination: 0.0,
        period: 0.0,
        initial_phase: 0.0,
    };

    /// Creates elements with a zero initial phase
    pub fn new(
        perigee: f64,
        apogee: f64,
        eccentricity: f64,
        inclination: f64,
        period: f64,
    ) -> Self {
        debug_assert!(
            (0.0..1.0).contains(&eccentricity),
            "Eccentricity must be in [0, 1), got {}",
            eccentricity
        );
        Self {
            perigee,
            apogee,
            eccentricity,
            inclination,
            period,
            initial_phase: 0.0,
        }
    }

    /// Sets the initial phase in radians
    pub fn with_initial_phase(mut self, initial_phase: f64) -> Self {
        self.initial_phase = initial_phase;
        self
    }

    /// Draws the initial phase uniformly from `[0, 2π)`
    pub fn with_random_phase<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        self.with_initial_phase(random_phase(rng))
    }
}

/// A uniformly distributed phase in `[0, 2π)`
pub fn random_phase<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..TAU)
}

/// The body an orbit is computed relative to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OriginFrame {
    /// World space position of the origin body's center
    pub position: DVec3,
    /// Radius of the origin body in scene units
    pub size: f64,
}

impl OriginFrame {
    /// Creates a new origin frame
    pub fn new(position: DVec3, size: f64) -> Self {
        Self { position, size }
    }
}
