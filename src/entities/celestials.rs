//! Celestials are the major bodies of the scene, they orbit and spin.
//! They include the Sun, the Earth and the Moon.

pub mod celestial;
pub mod earthlike;
pub mod sun;
