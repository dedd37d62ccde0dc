#![deny(bare_trait_objects)]

//! Shapes and debugging helpers shared by the tessera test suites.

extern crate tessera_path as path;

pub use path::geom::euclid;
pub use path::math;

pub mod debugging;
pub mod shapes;
