//! Simulation wide configuration.
//!
//! Everything is plain data with defaults matching the real world constants the scene
//! is tuned for. The config is built once, optionally tweaked with the builder style
//! setters, then handed to the solver and clock constructors and inserted as a resource.

use bevy::ecs::system::Resource;

use crate::physics::{orbits::components::OrbitalElements, util::calendar::CalendarFields};

/// Real-world orbit of a major body, in km, degrees and seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyOrbitConfig {
    pub perigee: f64,
    pub apogee: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub period: f64,
}

impl BodyOrbitConfig {
    /// Heliocentric orbit of the Earth, also used for the apparent orbit of the Sun
    pub const EARTH: Self = Self {
        perigee: 1_471_000_000.0,
        apogee: 1_521_000_000.0,
        eccentricity: 0.0167,
        inclination_deg: 7.155,
        period: 31_557_600.0,
    };

    pub const MOON: Self = Self {
        perigee: 402_541.95,
        apogee: 405_000.0,
        eccentricity: 0.0549,
        inclination_deg: 5.1,
        period: 2_546_800.0,
    };

    /// Elements with the inclination in radians and a zero initial phase
    pub fn elements(&self) -> OrbitalElements {
        OrbitalElements::new(
            self.perigee,
            self.apogee,
            self.eccentricity,
            self.inclination_deg.to_radians(),
            self.period,
        )
    }
}

/// Shape and spin of a major body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MajorBodyConfig {
    /// Radius in scene units
    pub size: f64,
    /// Tilt of the spin axis away from +Y, in radians
    pub tilt: f64,
    /// Radians per frame per unit of time scale
    pub rotation_speed: f64,
}

impl MajorBodyConfig {
    pub const SUN: Self = Self {
        size: 8000.0,
        tilt: 0.0,
        rotation_speed: 0.4,
    };

    pub const EARTH: Self = Self {
        size: 10.0,
        tilt: -23.5 * std::f64::consts::PI / 180.0,
        rotation_speed: 0.0000727 / 47.0,
    };

    /// The tilt is used as a raw radian value, the way the scene was tuned
    pub const MOON: Self = Self {
        size: 2.5,
        tilt: 6.68,
        rotation_speed: 0.00000266 / 48.0,
    };
}

/// Bounds and starting point of the simulated clock
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    /// Calendar fields at creation, also the reference instant for velocity
    pub start: CalendarFields,
    pub time_scale: f64,
    pub min_time_scale: f64,
    pub max_time_scale: f64,
    /// Running the clock before the first of January of this year resets it there
    pub floor_year: i32,
    /// Largest year accepted by the year setter
    pub max_year: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start: CalendarFields::new_year(1981),
            time_scale: 200.0,
            min_time_scale: -8_000_000.0,
            max_time_scale: 8_000_000.0,
            floor_year: 1974,
            max_year: 2025,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Scene units per km
    pub scale_factor: f64,
    pub sun: MajorBodyConfig,
    pub earth: MajorBodyConfig,
    pub moon: MajorBodyConfig,
    pub earth_orbit: BodyOrbitConfig,
    pub moon_orbit: BodyOrbitConfig,
    pub clock: ClockConfig,
    /// Catalog rows read at most
    pub max_satellites: usize,
    /// Launch sites closer than this, in degrees, share a bin
    pub launch_site_proximity: f64,
    /// Bar height per launch
    pub launch_site_bar_scale: f64,
    /// Thickness of each bar, in scene units
    pub launch_site_bar_radius: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scale_factor: 10.0 / 6371.0,
            sun: MajorBodyConfig::SUN,
            earth: MajorBodyConfig::EARTH,
            moon: MajorBodyConfig::MOON,
            earth_orbit: BodyOrbitConfig::EARTH,
            moon_orbit: BodyOrbitConfig::MOON,
            clock: ClockConfig::default(),
            max_satellites: 7560,
            launch_site_proximity: 0.1,
            launch_site_bar_scale: 0.02,
            launch_site_bar_radius: 0.05,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn time_scale(mut self, time_scale: f64) -> Self {
        self.clock.time_scale = time_scale.clamp(self.clock.min_time_scale, self.clock.max_time_scale);
        self
    }

    pub fn start(mut self, start: CalendarFields) -> Self {
        self.clock.start = start;
        self
    }

    pub fn clock(mut self, clock: ClockConfig) -> Self {
        self.clock = clock;
        self
    }

    pub fn max_satellites(mut self, max_satellites: usize) -> Self {
        self.max_satellites = max_satellites;
        self
    }

    pub fn launch_site_proximity(mut self, launch_site_proximity: f64) -> Self {
        self.launch_site_proximity = launch_site_proximity;
        self
    }

    pub fn launch_site_bar_scale(mut self, launch_site_bar_scale: f64) -> Self {
        self.launch_site_bar_scale = launch_site_bar_scale;
        self
    }

    pub fn launch_site_bar_radius(mut self, launch_site_bar_radius: f64) -> Self {
        self.launch_site_bar_radius = launch_site_bar_radius;
        self
    }
}
