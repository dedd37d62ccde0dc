use crate::adjacency::Adjacency;
use crate::assembler::{ContourAssembler, PathFlattener};
use crate::delaunay::DelaunayRefiner;
use crate::error::*;
use crate::filter::TriangleFilter;
use crate::geom::Point as GenericPoint;
use crate::geometry_builder::GeometryBuilder;
use crate::math::Point;
use crate::mesh::{Edge, Mesh};
use crate::monotone::MonotoneTriangulator;
use crate::path::Path;
use crate::pool::ScratchPool;
use crate::{TriangulationOptions, VertexId};

/// A constrained Delaunay triangulator for paths.
///
/// ## Overview
///
/// The triangulator flattens the path, merges its sub-paths into a planar graph, covers the
/// convex hull of the graph's vertices with triangles that keep the graph's edges, flips
/// edges to make the triangulation Delaunay and finally drops the triangles that are not
/// part of the shape according to the [fill rule](crate::FillRule).
///
/// The triangulator keeps its internal buffers between calls, so it is better to reuse
/// the same object when triangulating many shapes, for example once per frame.
///
/// ## Limitations
///
/// Self-intersecting contours are not split at their intersections, the result of
/// triangulating them is unspecified. Edges parallel to the y axis are not guaranteed to
/// be part of the triangulation.
///
/// ## Examples
///
/// ```
/// use tessera_tessellation::{Triangulator, TriangulationOptions, VertexBuffers};
/// use tessera_tessellation::geometry_builder::simple_builder;
/// use tessera_tessellation::math::{point, Point3D};
/// use tessera_tessellation::path::Path;
/// use tessera_tessellation::path::builder::PathBuilder;
///
/// // A square with a square hole.
/// let mut builder = Path::builder();
/// builder.add_polygon(&[point(-2.0, -2.0), point(2.0, -2.0), point(2.0, 2.0), point(-2.0, 2.0)]);
/// builder.add_polygon(&[point(-1.0, -1.0), point(1.0, -1.0), point(1.0, 1.0), point(-1.0, 1.0)]);
/// let path = builder.build();
///
/// let mut buffers: VertexBuffers<Point3D, u32> = VertexBuffers::new();
/// let mut triangulator = Triangulator::new();
/// triangulator.triangulate_path(
///     &path,
///     &TriangulationOptions::default(),
///     &mut simple_builder(&mut buffers),
/// ).unwrap();
///
/// assert_eq!(buffers.vertices.len(), 8);
/// assert_eq!(buffers.indices.len(), 8 * 3);
/// ```
pub struct Triangulator {
    mesh: Mesh,
    assembler: ContourAssembler,
    adjacency: Adjacency,
    constraints: Vec<Edge>,
    pool: ScratchPool,
    monotone: MonotoneTriangulator,
    refiner: DelaunayRefiner,
    log: bool,
}

impl Default for Triangulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Triangulator {
    /// Constructor.
    pub fn new() -> Self {
        Triangulator {
            mesh: Mesh::new(),
            assembler: ContourAssembler::new(),
            adjacency: Adjacency::new(),
            constraints: Vec::new(),
            pool: ScratchPool::new(),
            monotone: MonotoneTriangulator::new(),
            refiner: DelaunayRefiner::new(),
            log: false,
        }
    }

    /// Enable/disable some verbose logging during the triangulation, for
    /// debugging purposes.
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.monotone.set_logging(is_enabled);
        self.refiner.set_logging(is_enabled);
        self.log = is_enabled;
    }

    /// The mesh produced by the last call to `triangulate_path`.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Compute the triangulation of a path.
    pub fn triangulate_path(
        &mut self,
        path: &Path,
        options: &TriangulationOptions,
        output: &mut dyn GeometryBuilder,
    ) -> TriangulationResult {
        validate_options(options)?;

        self.mesh.clear();
        self.assembler.clear();
        PathFlattener::new(options.flattening, options.scale).assemble(
            path.iter(),
            &mut self.assembler,
            &mut self.mesh,
            &self.pool,
        )?;

        self.triangulate_and_output(options, output)
    }

    /// Compute the triangulation of a single closed polygon.
    pub fn triangulate_polygon(
        &mut self,
        polygon: &[Point],
        options: &TriangulationOptions,
        output: &mut dyn GeometryBuilder,
    ) -> TriangulationResult {
        validate_options(options)?;

        self.mesh.clear();
        self.assembler.clear();
        self.assembler.add_contour(&mut self.mesh, polygon);

        self.triangulate_and_output(options, output)
    }

    fn triangulate_and_output(
        &mut self,
        options: &TriangulationOptions,
        output: &mut dyn GeometryBuilder,
    ) -> TriangulationResult {
        let mut mesh = std::mem::take(&mut self.mesh);
        let result = self
            .triangulate_mesh(&mut mesh, options)
            .and_then(|()| self.build_geometry(&mesh, output));
        self.mesh = mesh;

        if let Err(e) = &result {
            tess_log!(self, "Triangulation failed with error: {}.", e);
        }

        result
    }

    fn build_geometry(&self, mesh: &Mesh, output: &mut dyn GeometryBuilder) -> TriangulationResult {
        output.begin_geometry();

        let mut ids = self.pool.checkout::<VertexId>();
        for &position in &mesh.vertices {
            match output.add_vertex(position) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    output.abort_geometry();
                    return Err(e.into());
                }
            }
        }

        for tri in &mesh.triangles {
            output.add_triangle(
                ids[tri[0].to_usize()],
                ids[tri[1].to_usize()],
                ids[tri[2].to_usize()],
            );
        }

        output.end_geometry();

        Ok(())
    }

    /// Replaces the triangles of a planar graph with its triangulation.
    ///
    /// The vertices of the mesh must be unique and its edges must form closed contours.
    /// Edges referring to missing vertices are reported as
    /// [`InternalError::EdgeOutOfRange`].
    pub fn triangulate_mesh(
        &mut self,
        mesh: &mut Mesh,
        options: &TriangulationOptions,
    ) -> TriangulationResult {
        validate_options(options)?;
        if mesh.vertices.iter().any(|p| p.x.is_nan() || p.y.is_nan()) {
            return Err(UnsupportedParameter::PositionIsNaN.into());
        }

        let num_vertices = mesh.vertices.len();
        if let Some(edge) = mesh
            .edges
            .iter()
            .find(|e| e.from.to_usize() >= num_vertices || e.to.to_usize() >= num_vertices)
        {
            return Err(InternalError::EdgeOutOfRange(edge.from, edge.to).into());
        }

        mesh.triangles.clear();

        let filter = TriangleFilter::from_options(options);
        if filter == TriangleFilter::None || mesh.vertices.is_empty() {
            return Ok(());
        }

        self.monotone.triangulate(mesh, &self.pool)?;

        let mut positions = self.pool.checkout::<GenericPoint<f64>>();
        positions.extend(mesh.vertices.iter().map(|p| p.to_f64()));

        if options.delaunay {
            mesh.constraint_edges(&mut self.constraints);
            self.adjacency
                .rebuild(mesh.vertices.len(), &self.constraints, &mesh.triangles);
            self.refiner.refine(
                &mut self.adjacency,
                &positions,
                mesh.triangles.len(),
                &self.pool,
            )?;

            mesh.triangles.clear();
            self.adjacency.fill(&mut mesh.triangles);
        }

        filter.apply(&positions, &mesh.edges, &mut mesh.triangles);

        log::debug!(
            "triangulated {} vertices and {} edges into {} triangles",
            mesh.vertices.len(),
            mesh.edges.len(),
            mesh.triangles.len()
        );

        Ok(())
    }
}

fn validate_options(options: &TriangulationOptions) -> Result<(), UnsupportedParameter> {
    if !options.scale.is_finite() || options.scale <= 0.0 {
        return Err(UnsupportedParameter::ScaleIsNotPositive);
    }

    let flattening = &options.flattening;
    if flattening.distance_tolerance.is_nan()
        || flattening.angle_tolerance.is_nan()
        || flattening.cusp_limit.is_nan()
    {
        return Err(UnsupportedParameter::ToleranceIsNaN);
    }

    Ok(())
}
