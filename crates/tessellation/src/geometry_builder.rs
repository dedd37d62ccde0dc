//! Tools to help with generating vertex and index buffers.
//!
//! ## Overview
//!
//! The triangulator does not write into vertex buffers directly. It hands its vertices and
//! triangles to a [`GeometryBuilder`], which decides the final vertex layout and index
//! type. It is very common to push vertices and indices into a pair of vectors, so this
//! module also provides:
//!
//! * [`VertexBuffers`], a simple pair of vectors of vertices and indices.
//! * [`BuffersBuilder`], which writes into a `VertexBuffers` and delegates the creation of
//!   each vertex value to a [`VertexConstructor`].
//! * [`Positions`], the vertex constructor producing 3D positions with a zero `z`
//!   component, which is the layout renderers usually expect.
//!
//! ## Examples
//!
//! ```
//! use tessera_tessellation::geometry_builder::*;
//! use tessera_tessellation::{Triangulator, TriangulationOptions};
//! use tessera_tessellation::math::{point, Point};
//! use tessera_tessellation::path::Path;
//! use tessera_tessellation::path::builder::PathBuilder;
//!
//! #[derive(Copy, Clone, Debug)]
//! struct MyVertex {
//!     position: [f32; 2],
//!     color: [f32; 4],
//! }
//!
//! let mut builder = Path::builder();
//! builder.add_polygon(&[point(0.0, 0.0), point(10.0, 0.0), point(5.0, 8.0)]);
//! let path = builder.build();
//!
//! let mut buffers: VertexBuffers<MyVertex, u16> = VertexBuffers::new();
//! let mut triangulator = Triangulator::new();
//! let color = [1.0, 0.0, 0.0, 1.0];
//! triangulator.triangulate_path(
//!     &path,
//!     &TriangulationOptions::default(),
//!     &mut BuffersBuilder::new(&mut buffers, |p: Point| MyVertex {
//!         position: p.to_array(),
//!         color,
//!     }),
//! ).unwrap();
//!
//! assert_eq!(buffers.vertices.len(), 3);
//! assert_eq!(buffers.indices.len(), 3);
//! ```

pub use crate::error::GeometryBuilderError;
use crate::math::{Point, Point3D};
use crate::VertexId;

use std::convert::From;

/// An interface separating the triangulator from the actual vertex construction.
pub trait GeometryBuilder {
    /// Called at the beginning of a generation.
    ///
    /// end_geometry must be called before begin_geometry is called again.
    fn begin_geometry(&mut self) {}

    /// Called at the end of a generation.
    fn end_geometry(&mut self) {}

    /// Inserts a vertex and returns its id.
    ///
    /// The id is only valid between begin_geometry and end_geometry.
    fn add_vertex(&mut self, position: Point) -> Result<VertexId, GeometryBuilderError>;

    /// Insert a triangle made of vertices that were added after the last call to
    /// begin_geometry.
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId);

    /// Called instead of end_geometry if an error occurred while producing the geometry.
    ///
    /// The implementation is expected to discard the geometry that was generated since the
    /// last time begin_geometry was called, and to remain in a usable state.
    fn abort_geometry(&mut self) {}
}

/// Structure that holds the vertex and index data.
///
/// Usually written into though temporary `BuffersBuilder` objects.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexBuffers<OutputVertex, OutputIndex> {
    pub vertices: Vec<OutputVertex>,
    pub indices: Vec<OutputIndex>,
}

impl<OutputVertex, OutputIndex> VertexBuffers<OutputVertex, OutputIndex> {
    /// Constructor
    pub fn new() -> Self {
        VertexBuffers::with_capacity(512, 1024)
    }

    /// Constructor
    pub fn with_capacity(num_vertices: usize, num_indices: usize) -> Self {
        VertexBuffers {
            vertices: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_indices),
        }
    }

    /// Empty the buffers without freeing memory, for reuse without reallocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Number of complete triangles in the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A temporary view on a `VertexBuffers` object which facilitates the population of vertex
/// and index data.
///
/// `BuffersBuilder`s record the vertex offset from when they are created so that the
/// triangulator does not need to worry about offsetting indices if some geometry was added
/// beforehand.
pub struct BuffersBuilder<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor> {
    buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>,
    first_vertex: u32,
    first_index: u32,
    vertex_constructor: Ctor,
}

impl<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor>
    BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
{
    pub fn new(buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>, ctor: Ctor) -> Self {
        let first_vertex = buffers.vertices.len() as u32;
        let first_index = buffers.indices.len() as u32;
        BuffersBuilder {
            buffers,
            first_vertex,
            first_index,
            vertex_constructor: ctor,
        }
    }

    pub fn buffers<'a, 'b: 'a>(&'b self) -> &'a VertexBuffers<OutputVertex, OutputIndex> {
        self.buffers
    }
}

/// A trait specifying how to create vertex values.
pub trait VertexConstructor<OutputVertex> {
    fn new_vertex(&mut self, position: Point) -> OutputVertex;
}

/// A simple vertex constructor that produces 3D positions with `z = 0`.
pub struct Positions;

impl VertexConstructor<Point3D> for Positions {
    fn new_vertex(&mut self, position: Point) -> Point3D {
        position.to_3d()
    }
}

impl VertexConstructor<Point> for Positions {
    fn new_vertex(&mut self, position: Point) -> Point {
        position
    }
}

impl<F, OutputVertex> VertexConstructor<OutputVertex> for F
where
    F: Fn(Point) -> OutputVertex,
{
    fn new_vertex(&mut self, position: Point) -> OutputVertex {
        self(position)
    }
}

/// A `BuffersBuilder` producing the default renderer layout.
pub type SimpleBuffersBuilder<'l> = BuffersBuilder<'l, Point3D, u32, Positions>;

/// Creates a `SimpleBuffersBuilder`.
pub fn simple_builder(buffers: &mut VertexBuffers<Point3D, u32>) -> SimpleBuffersBuilder {
    BuffersBuilder::new(buffers, Positions)
}

impl<'l, OutputVertex, OutputIndex, Ctor> GeometryBuilder
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: From<VertexId> + MaxIndex,
    Ctor: VertexConstructor<OutputVertex>,
{
    fn begin_geometry(&mut self) {
        self.first_vertex = self.buffers.vertices.len() as u32;
        self.first_index = self.buffers.indices.len() as u32;
    }

    fn add_vertex(&mut self, position: Point) -> Result<VertexId, GeometryBuilderError> {
        let len = self.buffers.vertices.len();
        if len >= OutputIndex::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.buffers
            .vertices
            .push(self.vertex_constructor.new_vertex(position));

        Ok(VertexId(len as u32))
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        debug_assert!(a != VertexId::INVALID);
        debug_assert!(b != VertexId::INVALID);
        debug_assert!(c != VertexId::INVALID);
        self.buffers.indices.push(a.into());
        self.buffers.indices.push(b.into());
        self.buffers.indices.push(c.into());
    }

    fn abort_geometry(&mut self) {
        self.buffers.vertices.truncate(self.first_vertex as usize);
        self.buffers.indices.truncate(self.first_index as usize);
    }
}

/// A geometry builder that does not output any geometry.
///
/// Mostly useful for testing.
pub struct NoOutput {
    next_vertex: u32,
}

impl NoOutput {
    pub fn new() -> Self {
        NoOutput { next_vertex: 0 }
    }
}

impl Default for NoOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryBuilder for NoOutput {
    fn begin_geometry(&mut self) {
        self.next_vertex = 0;
    }

    fn add_vertex(&mut self, _position: Point) -> Result<VertexId, GeometryBuilderError> {
        if self.next_vertex == u32::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.next_vertex += 1;
        Ok(VertexId(self.next_vertex - 1))
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
    }
}

/// Provides the maximum value of an index.
///
/// This should be the maximum value representable by the index type up
/// to u32::MAX because the triangulator can't internally represent more
/// than u32::MAX vertices.
pub trait MaxIndex {
    const MAX: usize;
}

impl MaxIndex for u8 {
    const MAX: usize = u8::MAX as usize;
}
impl MaxIndex for i8 {
    const MAX: usize = i8::MAX as usize;
}
impl MaxIndex for u16 {
    const MAX: usize = u16::MAX as usize;
}
impl MaxIndex for i16 {
    const MAX: usize = i16::MAX as usize;
}
impl MaxIndex for u32 {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for i32 {
    const MAX: usize = i32::MAX as usize;
}
// The triangulator internally uses u32 indices so we can't have more than u32::MAX
impl MaxIndex for u64 {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for i64 {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for usize {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for isize {
    const MAX: usize = u32::MAX as usize;
}

#[test]
fn buffers_builder_offsets_and_abort() {
    use crate::math::point;

    let mut buffers: VertexBuffers<Point3D, u32> = VertexBuffers::new();
    {
        let mut builder = simple_builder(&mut buffers);
        builder.begin_geometry();
        let a = builder.add_vertex(point(0.0, 0.0)).unwrap();
        let b = builder.add_vertex(point(1.0, 0.0)).unwrap();
        let c = builder.add_vertex(point(0.0, 1.0)).unwrap();
        builder.add_triangle(a, b, c);
        builder.end_geometry();
    }
    assert_eq!(buffers.vertices[1], Point3D::new(1.0, 0.0, 0.0));
    assert_eq!(buffers.indices, vec![0, 1, 2]);
    assert_eq!(buffers.triangle_count(), 1);

    {
        let mut builder = simple_builder(&mut buffers);
        builder.begin_geometry();
        builder.add_vertex(point(5.0, 5.0)).unwrap();
        builder.abort_geometry();
    }
    assert_eq!(buffers.vertices.len(), 3);
    assert_eq!(buffers.indices.len(), 3);
}

#[test]
fn too_many_vertices() {
    use crate::math::point;

    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    let mut builder = BuffersBuilder::new(&mut buffers, Positions);
    builder.begin_geometry();
    for _ in 0..u16::MAX {
        builder.add_vertex(point(0.0, 0.0)).unwrap();
    }
    assert_eq!(
        builder.add_vertex(point(0.0, 0.0)),
        Err(GeometryBuilderError::TooManyVertices)
    );
}
