//! Kepler ellipse propagation.
//!
//! Positions are computed analytically from the orbital elements and a simulated
//! timestamp, so nothing is integrated and the result only depends on the inputs.
//! Two numeric behaviors exist side by side and are selected with a [SolverStrategy]:
//! * [SolverStrategy::SATELLITE] solves Kepler's equation $E - e \sin E = M$ with
//!   Newton-Raphson until the step falls under a tolerance.
//! * [SolverStrategy::MAJOR_BODY] runs a fixed number of successive substitutions,
//!   reverses the mean motion and tilts the orbital plane by an extra quarter turn.
//!
//! Both must stay numerically stable, since thousands of satellites run through here
//! every frame.

use std::f64::consts::{FRAC_PI_2, TAU};

use bevy::{
    ecs::{component::Component, system::Resource},
    math::DVec3,
};

use super::components::{OrbitalElements, OriginFrame};
use crate::config::SimulationConfig;

/// Newton-Raphson stops once a step is smaller than this
pub const NEWTON_TOLERANCE: f64 = 1e-6;
/// Newton-Raphson never takes more steps than this
pub const NEWTON_MAX_ITERATIONS: usize = 100;
/// Iteration count of the fixed cost solve
pub const FIXED_POINT_ITERATIONS: usize = 10;

/// Which way the mean anomaly advances for a positive period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanMotionSign {
    /// $n = 2\pi / T$
    Direct,
    /// $n = 2\pi / -T$
    Reversed,
}

impl MeanMotionSign {
    /// Mean motion in radians per time unit.
    /// A zero period parks the body and yields zero instead of an infinity.
    pub fn mean_motion(self, period: f64) -> f64 {
        if period == 0.0 {
            return 0.0;
        }
        match self {
            MeanMotionSign::Direct => TAU / period,
            MeanMotionSign::Reversed => TAU / -period,
        }
    }
}

/// How the eccentric anomaly is found
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationPolicy {
    /// Newton-Raphson seeded with the mean anomaly
    Newton {
        /// Step size under which the current estimate is accepted
        tolerance: f64,
        /// Upper bound on steps, the last estimate is returned once reached
        max_iterations: usize,
    },
    /// Successive substitution $E \leftarrow M + e \sin E$, always the same cost
    FixedPoint {
        /// Number of substitutions
        iterations: usize,
    },
}

impl IterationPolicy {
    /// Solves Kepler's equation for the eccentric anomaly.
    /// Never fails, a non-converged solve returns its last estimate.
    pub fn eccentric_anomaly(self, mean_anomaly: f64, eccentricity: f64) -> f64 {
        let mut e_anomaly = mean_anomaly;
        match self {
            IterationPolicy::Newton {
                tolerance,
                max_iterations,
            } => {
                for _ in 0..max_iterations {
                    let delta = (e_anomaly - eccentricity * e_anomaly.sin() - mean_anomaly)
                        / (1.0 - eccentricity * e_anomaly.cos());
                    if delta.abs() < tolerance {
                        break;
                    }
                    e_anomaly -= delta;
                }
            }
            IterationPolicy::FixedPoint { iterations } => {
                for _ in 0..iterations {
                    e_anomaly = mean_anomaly + eccentricity * e_anomaly.sin();
                }
            }
        }
        e_anomaly
    }
}

/// Whether perigee and apogee are measured from the origin's surface or center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceFrame {
    /// The origin radius is added to both apsides
    SurfaceRelative,
    /// Apsides are already center to center
    CenterRelative,
}

/// The knobs that distinguish the satellite solve from the major body solve.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SolverStrategy {
    pub mean_motion: MeanMotionSign,
    pub iteration: IterationPolicy,
    /// Radians added to the inclination before use
    pub inclination_bias: f64,
    pub distance_frame: DistanceFrame,
}

impl SolverStrategy {
    /// Used for the satellite field, favors precision over a fixed cost
    pub const SATELLITE: Self = Self {
        mean_motion: MeanMotionSign::Direct,
        iteration: IterationPolicy::Newton {
            tolerance: NEWTON_TOLERANCE,
            max_iterations: NEWTON_MAX_ITERATIONS,
        },
        inclination_bias: 0.0,
        distance_frame: DistanceFrame::SurfaceRelative,
    };

    /// Used for the Sun, Earth and Moon, a handful of bodies with a predictable cost
    pub const MAJOR_BODY: Self = Self {
        mean_motion: MeanMotionSign::Reversed,
        iteration: IterationPolicy::FixedPoint {
            iterations: FIXED_POINT_ITERATIONS,
        },
        inclination_bias: FRAC_PI_2,
        distance_frame: DistanceFrame::CenterRelative,
    };
}

impl Default for SolverStrategy {
    fn default() -> Self {
        Self::SATELLITE
    }
}

/// Converts orbital elements and a simulated time into a scene position.
///
/// Stateless apart from the scale factor, which converts real-world distances
/// into scene units.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct OrbitSolver {
    scale_factor: f64,
}

impl OrbitSolver {
    pub fn new(scale_factor: f64) -> Self {
        debug_assert!(scale_factor.is_finite(), "Scale factor must be finite");
        Self { scale_factor }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.scale_factor)
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Semi-major axis in scene units
    pub fn semi_major_axis(
        &self,
        strategy: &SolverStrategy,
        origin: &OriginFrame,
        elements: &OrbitalElements,
    ) -> f64 {
        let offset = match strategy.distance_frame {
            DistanceFrame::SurfaceRelative => origin.size,
            DistanceFrame::CenterRelative => 0.0,
        };
        let perigee = elements.perigee * self.scale_factor + offset;
        let apogee = elements.apogee * self.scale_factor + offset;
        (perigee + apogee) / 2.0
    }

    /// Position of the body at simulated `time`, in world space.
    pub fn solve(
        &self,
        strategy: &SolverStrategy,
        origin: &OriginFrame,
        elements: &OrbitalElements,
        time: f64,
    ) -> DVec3 {
        let a = self.semi_major_axis(strategy, origin, elements);
        let e = elements.eccentricity;
        let inclination = elements.inclination + strategy.inclination_bias;

        let n = strategy.mean_motion.mean_motion(elements.period);
        let mean_anomaly = n * time + elements.initial_phase;
        let e_anomaly = strategy.iteration.eccentric_anomaly(mean_anomaly, e);

        let v = true_anomaly(e_anomaly, e);
        let r = a * (1.0 - e * e_anomaly.cos());

        let in_plane = DVec3::new(
            r * v.cos(),
            r * v.sin() * inclination.cos(),
            r * v.sin() * inclination.sin(),
        );
        in_plane + origin.position
    }

    /// [Self::solve] with [SolverStrategy::SATELLITE]
    pub fn solve_satellite(
        &self,
        origin: &OriginFrame,
        elements: &OrbitalElements,
        time: f64,
    ) -> DVec3 {
        self.solve(&SolverStrategy::SATELLITE, origin, elements, time)
    }

    /// [Self::solve] with [SolverStrategy::MAJOR_BODY]
    pub fn solve_major_body(
        &self,
        origin: &OriginFrame,
        elements: &OrbitalElements,
        time: f64,
    ) -> DVec3 {
        self.solve(&SolverStrategy::MAJOR_BODY, origin, elements, time)
    }

    /// Where a hidden body sits: the zero orbit around `origin`
    pub fn park(&self, origin: &OriginFrame) -> DVec3 {
        self.solve_satellite(origin, &OrbitalElements::ZERO, 0.0)
    }
}

impl Default for OrbitSolver {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

/// True anomaly from the eccentric anomaly
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = ((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt() * (eccentric_anomaly / 2.0).tan();
    2.0 * half.atan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SCALE: f64 = 10.0 / 6371.0;

    fn earth_origin() -> OriginFrame {
        OriginFrame::new(DVec3::new(3.0, -2.0, 1.5), 10.0)
    }

    fn leo() -> OrbitalElements {
        OrbitalElements::new(400.0, 1200.0, 0.06, 0.9, 5760.0)
    }

    #[test]
    fn test_finite_for_valid_eccentricities() {
        let solver = OrbitSolver::new(SCALE);
        let origin = earth_origin();
        for i in 0..100 {
            let e = 0.9 * i as f64 / 100.0;
            let elements = OrbitalElements::new(500.0, 36000.0, e, 1.1, -720.0 * 60.0)
                .with_initial_phase(0.37 * i as f64);
            for strategy in [SolverStrategy::SATELLITE, SolverStrategy::MAJOR_BODY] {
                for time in [0.0, 1.0, 1234.5, -98765.4, 3.2e9] {
                    let p = solver.solve(&strategy, &origin, &elements, time);
                    assert!(p.is_finite(), "e={} t={} gave {:?}", e, time, p);
                }
            }
        }
    }

    #[test]
    fn test_periapsis_at_time_zero() {
        let solver = OrbitSolver::new(SCALE);
        let origin = earth_origin();
        let elements = leo();
        let a = solver.semi_major_axis(&SolverStrategy::SATELLITE, &origin, &elements);
        let p = solver.solve_satellite(&origin, &elements, 0.0);
        let distance = (p - origin.position).length();
        assert_relative_eq!(distance, a * (1.0 - elements.eccentricity), epsilon = 1e-6);
    }

    #[test]
    fn test_major_body_periapsis_at_time_zero() {
        let solver = OrbitSolver::new(SCALE);
        let origin = OriginFrame::new(DVec3::ZERO, 10.0);
        let elements = OrbitalElements::new(402541.95, 405000.0, 0.0549, 0.089, 2546800.0);
        let a = solver.semi_major_axis(&SolverStrategy::MAJOR_BODY, &origin, &elements);
        let p = solver.solve_major_body(&origin, &elements, 0.0);
        assert_relative_eq!(p.length(), a * (1.0 - elements.eccentricity), epsilon = 1e-6);
    }

    #[test]
    fn test_periodic() {
        let solver = OrbitSolver::new(SCALE);
        let origin = earth_origin();
        let elements = leo().with_initial_phase(1.3);
        for time in [0.0, 17.0, 1000.0, 4321.0] {
            let a = solver.solve_satellite(&origin, &elements, time);
            let b = solver.solve_satellite(&origin, &elements, time + elements.period);
            assert_relative_eq!(a.x, b.x, epsilon = 1e-4);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-4);
            assert_relative_eq!(a.z, b.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_surface_relative_adds_origin_size() {
        let solver = OrbitSolver::new(SCALE);
        let origin = earth_origin();
        let elements = leo();
        let surface = solver.semi_major_axis(&SolverStrategy::SATELLITE, &origin, &elements);
        let center = solver.semi_major_axis(&SolverStrategy::MAJOR_BODY, &origin, &elements);
        assert_relative_eq!(surface - center, origin.size, epsilon = 1e-12);
    }

    #[test]
    fn test_park_is_finite_and_on_surface() {
        let solver = OrbitSolver::new(SCALE);
        let origin = earth_origin();
        let p = solver.park(&origin);
        assert!(p.is_finite());
        assert_relative_eq!((p - origin.position).length(), origin.size, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_period_has_zero_mean_motion() {
        assert_eq!(MeanMotionSign::Direct.mean_motion(0.0), 0.0);
        assert_eq!(MeanMotionSign::Reversed.mean_motion(0.0), 0.0);
        assert_relative_eq!(MeanMotionSign::Reversed.mean_motion(10.0), -TAU / 10.0);
    }

    #[test]
    fn test_newton_satisfies_kepler() {
        let policy = SolverStrategy::SATELLITE.iteration;
        for &(m, e) in &[(0.5, 0.1), (2.0, 0.5), (-1.0, 0.7), (3.0, 0.9)] {
            let e_anomaly = policy.eccentric_anomaly(m, e);
            let residual = e_anomaly - e * e_anomaly.sin() - m;
            assert!(residual.abs() < 1e-5, "m={} e={} residual={}", m, e, residual);
        }
    }

    /// The two policies agree once both have converged on a low eccentricity orbit
    #[test]
    fn test_fixed_point_close_to_newton_for_small_e() {
        let newton = SolverStrategy::SATELLITE.iteration;
        let fixed = SolverStrategy::MAJOR_BODY.iteration;
        for m in [0.1, 1.0, 2.5, 4.0] {
            let a = newton.eccentric_anomaly(m, 0.0167);
            let b = fixed.eccentric_anomaly(m, 0.0167);
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    /// The fixed policy never exits early, even when the seed is already exact
    #[test]
    fn test_fixed_point_runs_all_iterations() {
        let one = IterationPolicy::FixedPoint { iterations: 1 };
        let ten = IterationPolicy::FixedPoint { iterations: 10 };
        let m = 1.0;
        let e = 0.5;
        assert_relative_eq!(one.eccentric_anomaly(m, e), m + e * m.sin());
        assert_ne!(one.eccentric_anomaly(m, e), ten.eccentric_anomaly(m, e));
    }

    #[test]
    fn test_circular_orbit_radius_constant() {
        let solver = OrbitSolver::new(1.0);
        let origin = OriginFrame::new(DVec3::ZERO, 0.0);
        let elements = OrbitalElements::new(100.0, 100.0, 0.0, 0.3, 60.0);
        for time in [0.0, 7.5, 15.0, 33.3] {
            let p = solver.solve_satellite(&origin, &elements, time);
            assert_relative_eq!(p.length(), 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_inclination_tilts_plane() {
        let solver = OrbitSolver::new(1.0);
        let origin = OriginFrame::new(DVec3::ZERO, 0.0);
        let flat = OrbitalElements::new(100.0, 100.0, 0.0, 0.0, 60.0);
        let p = solver.solve_satellite(&origin, &flat, 15.0);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
        // A quarter of the way round a circular orbit sits on the y axis when flat
        assert_relative_eq!(p.y, 100.0, epsilon = 1e-9);

        // Major bodies get an extra quarter turn, so the same orbit stands upright
        let p = solver.solve_major_body(&origin, &flat, -15.0);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 100.0, epsilon = 1e-9);
    }
}
