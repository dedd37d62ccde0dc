#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]

//! Constrained Delaunay triangulation of 2D paths.
//!
//! This crate is reexported in [tessera](https://docs.rs/tessera/).
//!
//! ## Overview
//!
//! The most interesting types of this crate are:
//!
//! * [`Triangulator`] - Turns a [`Path`](path::Path) into a triangle mesh.
//! * [`TriangulationOptions`] - Parameters of the triangulation.
//! * [`VertexBuffers`] - The vertex and index buffers the triangles end up in.
//!
//! ## The triangulation pipeline
//!
//! A triangulation call goes through the following stages:
//!
//! 1. Flattening: cubic bézier curves are approximated with line segments (see
//!    [`FlatteningOptions`](geom::FlatteningOptions)).
//! 2. Assembly: the resulting polylines are merged into a planar graph. Identical positions
//!    are collapsed into a single vertex, each sub-path becomes a closed loop of edges.
//! 3. Sweep: a sweep line moving along the x axis triangulates the convex hull of the
//!    vertices with monotone chains, leaving every input edge in the mesh.
//! 4. Refinement: edges that are not part of the input are flipped until every pair of
//!    adjacent triangles satisfies the Delaunay condition.
//! 5. Filtering: triangles are classified by the winding number of the input contours
//!    around their centroid, which is how holes are cut out of the shape.
//!
//! Orientation and in-circle decisions are made with exact predicates, so nearly
//! collinear or nearly cocircular points do not corrupt the mesh.
//!
//! Edges that are vertical in the sweep direction do not produce sweep events. Their end
//! points are still triangulated, but the edge itself is not guaranteed to survive.
//!
//! ## Examples
//!
//! ```
//! use tessera_tessellation::{Triangulator, TriangulationOptions, VertexBuffers};
//! use tessera_tessellation::geometry_builder::simple_builder;
//! use tessera_tessellation::math::{point, Point3D};
//! use tessera_tessellation::path::Path;
//! use tessera_tessellation::path::builder::PathBuilder;
//!
//! let mut builder = Path::builder();
//! builder.begin(point(0.0, 0.0));
//! builder.line_to(point(1.0, 0.0));
//! builder.line_to(point(1.0, 1.0));
//! builder.line_to(point(0.0, 1.0));
//! builder.close();
//! let path = builder.build();
//!
//! let mut buffers: VertexBuffers<Point3D, u32> = VertexBuffers::new();
//! let mut triangulator = Triangulator::new();
//! triangulator
//!     .triangulate_path(
//!         &path,
//!         &TriangulationOptions::default(),
//!         &mut simple_builder(&mut buffers),
//!     )
//!     .unwrap();
//!
//! assert_eq!(buffers.vertices.len(), 4);
//! assert_eq!(buffers.indices.len(), 6);
//! ```

pub use tessera_path as path;

#[cfg(test)]
use tessera_extra as extra;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

/// Forwards to `log::trace!` when logging is enabled on the given object.
macro_rules! tess_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            log::trace!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            log::trace!($fmt, $($arg)*);
        }
    );
}

mod adjacency;
mod assembler;
mod delaunay;
mod error;
mod filter;
pub mod geometry_builder;
mod mesh;
mod monotone;
pub mod pool;
pub mod search;
mod triangulator;

#[cfg(test)]
mod triangulation_tests;

pub use crate::path::geom;
pub use crate::path::math;

#[doc(inline)]
pub use crate::adjacency::Adjacency;
#[doc(inline)]
pub use crate::assembler::{ContourAssembler, PathFlattener};
#[doc(inline)]
pub use crate::delaunay::DelaunayRefiner;
#[doc(inline)]
pub use crate::error::*;
#[doc(inline)]
pub use crate::filter::{winding_number, TriangleFilter};
#[doc(inline)]
pub use crate::geometry_builder::VertexBuffers;
#[doc(inline)]
pub use crate::mesh::{Edge, Mesh};
#[doc(inline)]
pub use crate::monotone::MonotoneTriangulator;
#[doc(inline)]
pub use crate::pool::{Scratch, ScratchPool};
#[doc(inline)]
pub use crate::triangulator::Triangulator;

pub use crate::path::FillRule;

use crate::geom::FlatteningOptions;
use std::fmt;

/// A virtual vertex offset in a mesh.
///
/// Vertex ids index the mesh's vertex list.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexId(pub u32);

impl VertexId {
    pub const INVALID: VertexId = VertexId(u32::MAX);

    pub fn offset(self) -> u32 {
        self.0
    }

    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    pub fn from_usize(v: usize) -> Self {
        VertexId(v as u32)
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u16> for VertexId {
    fn from(v: u16) -> Self {
        VertexId(v as u32)
    }
}

impl From<u32> for VertexId {
    fn from(v: u32) -> Self {
        VertexId(v)
    }
}

impl From<i32> for VertexId {
    fn from(v: i32) -> Self {
        VertexId(v as u32)
    }
}

impl From<VertexId> for u32 {
    fn from(v: VertexId) -> Self {
        v.0
    }
}

impl From<VertexId> for u16 {
    fn from(v: VertexId) -> Self {
        v.0 as u16
    }
}

impl From<VertexId> for usize {
    fn from(v: VertexId) -> Self {
        v.0 as usize
    }
}

/// Parameters for the triangulator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct TriangulationOptions {
    /// Whether to flip edges until the mesh is a constrained Delaunay triangulation.
    ///
    /// Default value: `true`.
    pub delaunay: bool,

    /// Whether to keep the triangles that are inside of the shape.
    ///
    /// Default value: `true`.
    pub interior: bool,

    /// Whether to keep the triangles that are outside of the shape but inside of the
    /// convex hull of its vertices.
    ///
    /// Default value: `false`.
    pub exterior: bool,

    /// How winding numbers are mapped to inside and outside.
    ///
    /// Default value: `FillRule::EvenOdd`.
    pub fill_rule: FillRule,

    /// Keep exactly the triangles whose winding number is this value.
    ///
    /// Overrides `interior`, `exterior` and `fill_rule` when set.
    ///
    /// Default value: `None`.
    pub winding_target: Option<i32>,

    /// Factor applied to the flattening tolerance. Shapes that are displayed larger need
    /// a finer approximation.
    ///
    /// Must be finite and strictly positive.
    /// Default value: `1.0`.
    pub scale: f32,

    /// How curves are approximated.
    ///
    /// Default value: `FlatteningOptions::DEFAULT`.
    pub flattening: FlatteningOptions,
}

impl TriangulationOptions {
    pub const DEFAULT_FILL_RULE: FillRule = FillRule::EvenOdd;
    pub const DEFAULT_SCALE: f32 = 1.0;

    pub const DEFAULT: Self = TriangulationOptions {
        delaunay: true,
        interior: true,
        exterior: false,
        fill_rule: Self::DEFAULT_FILL_RULE,
        winding_target: None,
        scale: Self::DEFAULT_SCALE,
        flattening: FlatteningOptions::DEFAULT,
    };

    #[inline]
    pub fn tolerance(tolerance: f32) -> Self {
        Self::DEFAULT.with_tolerance(tolerance)
    }

    #[inline]
    pub const fn even_odd() -> Self {
        Self::DEFAULT
    }

    #[inline]
    pub const fn non_zero() -> Self {
        Self::DEFAULT.with_fill_rule(FillRule::NonZero)
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.flattening = self.flattening.with_distance_tolerance(tolerance);
        self
    }

    #[inline]
    pub const fn with_flattening(mut self, flattening: FlatteningOptions) -> Self {
        self.flattening = flattening;
        self
    }

    #[inline]
    pub const fn with_fill_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = rule;
        self
    }

    #[inline]
    pub const fn with_delaunay(mut self, delaunay: bool) -> Self {
        self.delaunay = delaunay;
        self
    }

    #[inline]
    pub const fn with_interior(mut self, interior: bool) -> Self {
        self.interior = interior;
        self
    }

    #[inline]
    pub const fn with_exterior(mut self, exterior: bool) -> Self {
        self.exterior = exterior;
        self
    }

    #[inline]
    pub const fn with_winding_target(mut self, target: Option<i32>) -> Self {
        self.winding_target = target;
        self
    }

    #[inline]
    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[test]
fn options_builders() {
    let options = TriangulationOptions::non_zero()
        .with_tolerance(0.25)
        .with_exterior(true)
        .with_scale(2.0);

    assert_eq!(options.fill_rule, FillRule::NonZero);
    assert_eq!(options.flattening.distance_tolerance, 0.25);
    assert!(options.interior);
    assert!(options.exterior);
    assert!(options.delaunay);
    assert_eq!(options.scale, 2.0);
    assert_eq!(TriangulationOptions::default(), TriangulationOptions::even_odd());
}

#[test]
fn vertex_id_formatting() {
    assert_eq!(format!("{:?}", VertexId(12)), "#12");
    assert_eq!(VertexId::from_usize(3).to_usize(), 3);
    assert!(VertexId(2) < VertexId(10));
}
