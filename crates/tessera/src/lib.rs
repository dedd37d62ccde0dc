#![deny(bare_trait_objects)]

//! Triangulation of 2D vector paths.
//!
//! # Crates
//!
//! This meta-crate (`tessera`) reexports the following sub-crates for convenience:
//!
//! * **tessera_tessellation** - Constrained Delaunay triangulation of paths.
//! * **tessera_path** - Tools to build and iterate over paths.
//! * **tessera_geom** - Cubic bézier flattening and robust geometric predicates.
//! * **tessera_extra** - Test shapes and debugging tools, behind the `extra` feature.
//!
//! Each `tessera_<name>` crate is reexported as a `<name>` module in `tessera`. For example:
//!
//! ```ignore
//! use tessera_tessellation::Triangulator;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! use tessera::tessellation::Triangulator;
//! ```
//!
//! # Feature flags
//!
//! * `serialization`: derives serde's traits for the options and mesh types.
//! * `extra`: reexports `tessera_extra` as `tessera::extra`.
//!
//! # Example
//!
//! ```
//! use tessera::math::{point, Point3D};
//! use tessera::path::builder::PathBuilder;
//! use tessera::path::Path;
//! use tessera::tessellation::geometry_builder::simple_builder;
//! use tessera::tessellation::{TriangulationOptions, Triangulator, VertexBuffers};
//!
//! let mut builder = Path::builder();
//! builder.begin(point(0.0, 0.0));
//! builder.line_to(point(10.0, 0.0));
//! builder.cubic_bezier_to(point(15.0, 5.0), point(15.0, 10.0), point(10.0, 10.0));
//! builder.line_to(point(0.0, 10.0));
//! builder.close();
//! let path = builder.build();
//!
//! let mut geometry: VertexBuffers<Point3D, u32> = VertexBuffers::new();
//! let mut triangulator = Triangulator::new();
//! triangulator
//!     .triangulate_path(
//!         &path,
//!         &TriangulationOptions::tolerance(0.1),
//!         &mut simple_builder(&mut geometry),
//!     )
//!     .unwrap();
//!
//! assert_eq!(geometry.indices.len(), (geometry.vertices.len() - 2) * 3);
//! ```

#[cfg(feature = "extra")]
pub extern crate tessera_extra;
pub extern crate tessera_tessellation;

#[cfg(feature = "extra")]
pub use tessera_extra as extra;
pub use tessera_tessellation as tessellation;
pub use tessellation::geom;
pub use tessellation::path;

pub use path::math;
