//! Orbits and orbital mechanics.
//!
//! Every orbit is an independent two-body Kepler ellipse around a single origin,
//! bodies never perturb one another.

pub mod components;
pub mod kepler;
