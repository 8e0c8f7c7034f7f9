pub mod orbits;
pub mod util;
