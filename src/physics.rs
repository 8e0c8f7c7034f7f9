//! This module contains all the physics related code.
//!
//! When contributing to this module, please keep the following things in mind:
//! * Keep it "game engine agnostic" apart from bevy's math and ecs derives.
//!   Systems and plugins live in [crate::entities].
//! * Physics should be highly unit tested.

pub mod orbits;
pub mod util;
