use crate::extra::debugging::find_reduced_test_case;
use crate::extra::shapes::*;
use crate::geom::{in_circle, orient2d};
use crate::geometry_builder::*;
use crate::math::*;
use crate::path::builder::PathBuilder;
use crate::path::Path;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{
    Adjacency, Edge, GeometryBuilderError, InternalError, Mesh, TriangulationError,
    TriangulationOptions, Triangulator, UnsupportedParameter, VertexId,
};

fn new_triangulator() -> Triangulator {
    let mut tess = Triangulator::new();
    if std::env::var("TESSERA_ENABLE_LOGGING").is_ok() {
        let _ = env_logger::builder().is_test(true).try_init();
        tess.set_logging(true);
    }
    tess
}

fn triangulate(path: &Path, options: &TriangulationOptions) -> Result<Mesh, TriangulationError> {
    let mut tess = new_triangulator();
    tess.triangulate_path(path, options, &mut NoOutput::new())?;
    Ok(tess.mesh().clone())
}

/// Signed area enclosed by the mesh's edges, positive for counter-clockwise contours.
fn contour_area(mesh: &Mesh) -> f64 {
    let mut area = 0.0;
    for edge in &mesh.edges {
        let a = mesh.vertex(edge.from).to_f64();
        let b = mesh.vertex(edge.to).to_f64();
        area += a.x * b.y - b.x * a.y;
    }

    area * 0.5
}

fn check_triangles(mesh: &Mesh) {
    for tri in &mesh.triangles {
        for id in tri {
            assert!(id.to_usize() < mesh.vertices.len(), "{:?} out of bounds", id);
        }
        let (a, b, c) = (mesh.vertex(tri[0]), mesh.vertex(tri[1]), mesh.vertex(tri[2]));
        assert!(orient2d(a, b, c) < 0.0, "{:?} is flat or clockwise", tri);
    }
}

/// Checks that no non-constraint edge has an apex inside the circumcircle of the other side.
fn check_delaunay(mesh: &Mesh) {
    let positions: Vec<_> = mesh.vertices.iter().map(|p| p.to_f64()).collect();
    let mut constraints = Vec::new();
    mesh.constraint_edges(&mut constraints);

    let mut adjacency = Adjacency::new();
    adjacency.rebuild(mesh.vertices.len(), &constraints, &mesh.triangles);

    let mut edges = Vec::new();
    adjacency.for_each_edge(|i, j| edges.push((i, j)));
    for (i, j) in edges {
        if adjacency.is_constraint(i, j) {
            continue;
        }
        if let (Some(a), Some(b)) = (adjacency.opposite(i, j), adjacency.opposite(j, i)) {
            let p = |v: VertexId| positions[v.to_usize()];
            assert!(
                in_circle(p(i), p(j), p(a), p(b)) <= 0.0,
                "edge {:?}-{:?} is not locally Delaunay",
                i,
                j
            );
        }
    }
}

fn assert_area(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-6 * expected.abs().max(1.0),
        "expected area {}, got {}",
        expected,
        actual
    );
}

/// Triangulates a simple contour and checks that the triangles exactly cover it.
fn test_simple_path(path: &Path) {
    let check = |path: &Path| -> bool {
        let options = TriangulationOptions::tolerance(0.05);
        match triangulate(path, &options) {
            Ok(mesh) => {
                check_triangles(&mesh);
                check_delaunay(&mesh);
                assert_area(mesh.triangle_area(), contour_area(&mesh).abs());
                true
            }
            Err(e) => panic!("{}", e),
        }
    };

    let find_test_case = std::env::var("TESSERA_REDUCED_TESTCASE").is_ok();
    if !find_test_case {
        check(path);
        return;
    }

    if std::panic::catch_unwind(|| check(path)).is_err() {
        find_reduced_test_case(path, &|path: Path| {
            std::panic::catch_unwind(|| check(&path)).is_err()
        });
        panic!("reduced test case printed above");
    }
}

#[test]
fn unit_square() {
    let mut builder = Path::builder();
    builder.add_polygon(&[
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ]);
    let path = builder.build();

    let mut buffers: VertexBuffers<Point3D, u32> = VertexBuffers::new();
    let mut tess = new_triangulator();
    tess.triangulate_path(
        &path,
        &TriangulationOptions::default(),
        &mut simple_builder(&mut buffers),
    )
    .unwrap();

    assert_eq!(buffers.vertices.len(), 4);
    assert_eq!(buffers.triangle_count(), 2);
    assert_area(tess.mesh().triangle_area(), 1.0);
    check_triangles(tess.mesh());
}

#[test]
fn single_triangle_polygon() {
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    let mut tess = new_triangulator();
    tess.triangulate_polygon(
        &[point(0.0, 0.0), point(4.0, 0.0), point(0.0, 3.0)],
        &TriangulationOptions::default(),
        &mut BuffersBuilder::new(&mut buffers, Positions),
    )
    .unwrap();

    assert_eq!(buffers.vertices.len(), 3);
    assert_eq!(buffers.indices.len(), 3);
    assert_area(tess.mesh().triangle_area(), 6.0);
}

#[test]
fn nested_squares() {
    let mut builder = Path::builder();
    build_nested_squares_path(&mut builder, 2.0, 1.0, false);
    let path = builder.build();

    // The hole has a winding number of two.
    let mesh = triangulate(&path, &TriangulationOptions::even_odd()).unwrap();
    assert_eq!(mesh.vertices.len(), 8);
    assert_eq!(mesh.triangles.len(), 8);
    assert_area(mesh.triangle_area(), 12.0);
    check_triangles(&mesh);

    let mesh = triangulate(&path, &TriangulationOptions::non_zero()).unwrap();
    assert_eq!(mesh.triangles.len(), 10);
    assert_area(mesh.triangle_area(), 16.0);

    let options = TriangulationOptions::DEFAULT.with_winding_target(Some(2));
    let mesh = triangulate(&path, &options).unwrap();
    assert_eq!(mesh.triangles.len(), 2);
    assert_area(mesh.triangle_area(), 4.0);

    let options = TriangulationOptions::DEFAULT.with_winding_target(Some(-1));
    assert!(triangulate(&path, &options).unwrap().triangles.is_empty());
}

#[test]
fn reversed_hole() {
    let mut builder = Path::builder();
    build_nested_squares_path(&mut builder, 2.0, 1.0, true);
    let path = builder.build();

    for options in &[TriangulationOptions::even_odd(), TriangulationOptions::non_zero()] {
        let mesh = triangulate(&path, options).unwrap();
        assert_eq!(mesh.triangles.len(), 8);
        assert_area(mesh.triangle_area(), 12.0);
        check_delaunay(&mesh);
    }
}

#[test]
fn exterior_triangles() {
    let mut builder = Path::builder();
    build_nested_squares_path(&mut builder, 2.0, 1.0, false);
    let path = builder.build();

    let exterior = TriangulationOptions::DEFAULT
        .with_interior(false)
        .with_exterior(true);
    let mesh = triangulate(&path, &exterior).unwrap();
    assert_area(mesh.triangle_area(), 4.0);

    let everything = TriangulationOptions::DEFAULT.with_exterior(true);
    let mesh = triangulate(&path, &everything).unwrap();
    assert_eq!(mesh.triangles.len(), 10);
    assert_area(mesh.triangle_area(), 16.0);

    // A concave shape: the notch is outside but inside the convex hull.
    let mut builder = Path::builder();
    builder.add_polygon(&[
        point(0.0, 0.0),
        point(4.0, 0.0),
        point(4.0, 4.0),
        point(2.0, 1.0),
        point(0.0, 4.0),
    ]);
    let path = builder.build();

    let interior = triangulate(&path, &TriangulationOptions::default()).unwrap();
    let exterior = triangulate(&path, &exterior).unwrap();
    assert_area(interior.triangle_area(), contour_area(&interior));
    assert_area(interior.triangle_area() + exterior.triangle_area(), 16.0);
    assert_eq!(interior.triangles.len() + exterior.triangles.len(), 4);
}

#[test]
fn nothing_to_keep() {
    let mut builder = Path::builder();
    build_nested_squares_path(&mut builder, 2.0, 1.0, false);
    let path = builder.build();

    let options = TriangulationOptions::DEFAULT.with_interior(false);
    let mut buffers: VertexBuffers<Point3D, u32> = VertexBuffers::new();
    new_triangulator()
        .triangulate_path(&path, &options, &mut simple_builder(&mut buffers))
        .unwrap();

    assert_eq!(buffers.vertices.len(), 8);
    assert!(buffers.indices.is_empty());
}

#[test]
fn empty_and_degenerate_paths() {
    let path = Path::builder().build();
    let mesh = triangulate(&path, &TriangulationOptions::default()).unwrap();
    assert!(mesh.is_empty());
    assert!(mesh.triangles.is_empty());

    // Collinear points cover no area.
    let mut builder = Path::builder();
    builder.add_polygon(&[point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)]);
    let mesh = triangulate(&builder.build(), &TriangulationOptions::default()).unwrap();
    assert!(mesh.triangles.is_empty());
}

#[test]
fn open_sub_path_is_closed_on_itself() {
    let mut builder = Path::builder();
    builder.add_polygon(&[
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
        point(0.0, 10.0),
    ]);
    builder.begin(point(2.0, 3.0));
    builder.line_to(point(8.0, 7.0));
    builder.end(false);
    let path = builder.build();

    let mesh = triangulate(&path, &TriangulationOptions::default()).unwrap();
    assert!(mesh.edges.contains(&Edge::new(VertexId(4), VertexId(5))));
    assert!(mesh.edges.contains(&Edge::new(VertexId(5), VertexId(4))));
    // Going back and forth along the segment leaves the winding numbers untouched.
    assert_area(mesh.triangle_area(), 100.0);
    check_triangles(&mesh);
    check_delaunay(&mesh);
}

#[test]
fn vertex_on_a_vertical_edge() {
    // The left side of the square is vertical and the triangle touches it at (0, 5).
    let mut builder = Path::builder();
    builder.add_polygon(&[
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
        point(0.0, 10.0),
    ]);
    builder.add_polygon(&[point(0.0, 5.0), point(5.0, 3.0), point(5.0, 7.0)]);
    let path = builder.build();

    let mesh = triangulate(&path, &TriangulationOptions::non_zero()).unwrap();
    check_triangles(&mesh);

    let has_side = |a: u32, b: u32| {
        mesh.triangles.iter().any(|tri| {
            tri.contains(&VertexId(a)) && tri.contains(&VertexId(b))
        })
    };
    // Vertical edges are not swept, so the side is split at the touching vertex.
    assert!(!has_side(0, 3));
    assert!(has_side(0, 4));
    assert!(has_side(3, 4));
    assert_area(mesh.triangle_area(), 100.0);

    let mesh = triangulate(&path, &TriangulationOptions::even_odd()).unwrap();
    assert_area(mesh.triangle_area(), 90.0);
}

#[test]
fn vertical_sides() {
    let mut builder = Path::builder();
    builder.add_polygon(&[
        point(0.0, 0.0),
        point(4.0, 0.0),
        point(4.0, 1.0),
        point(2.0, 1.0),
        point(2.0, 3.0),
        point(0.0, 3.0),
    ]);
    let path = builder.build();

    let mesh = triangulate(&path, &TriangulationOptions::default()).unwrap();
    check_triangles(&mesh);
    assert_area(mesh.triangle_area(), 8.0);
}

/// Points along a jittered line closed by two far away vertices.
fn nearly_collinear_polygon(rng: &mut SmallRng, output: &mut Vec<Point>) {
    output.clear();
    for i in 0..=20 {
        let x = i as f32 * 0.5 + rng.gen_range(-1e-6..1e-6);
        let y = if rng.gen_bool(0.2) {
            0.0
        } else {
            rng.gen_range(-1e-9..1e-9)
        };
        output.push(point(x, y));
    }
    output.push(point(10.5, 1.0));
    output.push(point(-0.5, 1.2));
}

/// Points on a jittered circle, in the given direction.
fn nearly_cocircular_polygon(
    rng: &mut SmallRng,
    radius: f32,
    reversed: bool,
    output: &mut Vec<Point>,
) {
    let n = 32;
    output.clear();
    for k in 0..n {
        let mut angle = 0.1 + k as f32 * std::f32::consts::PI * 2.0 / n as f32;
        if reversed {
            angle = -angle;
        }
        let r = radius * (1.0 + rng.gen_range(-1e-7..1e-7));
        output.push(point(r * angle.cos(), r * angle.sin()));
    }
}

#[test]
fn jittered_degenerate_polygons() {
    let options = TriangulationOptions::default();
    let mut tess = new_triangulator();
    let mut polygon = Vec::new();
    let mut hole = Vec::new();

    let check = |mesh: &Mesh| {
        check_triangles(mesh);
        check_delaunay(mesh);
        assert_area(mesh.triangle_area(), contour_area(mesh).abs());
    };

    for seed in 0..50 {
        let mut rng = SmallRng::seed_from_u64(seed);

        nearly_collinear_polygon(&mut rng, &mut polygon);
        tess.triangulate_polygon(&polygon, &options, &mut NoOutput::new())
            .unwrap();
        check(tess.mesh());

        nearly_cocircular_polygon(&mut rng, 10.0, false, &mut polygon);
        tess.triangulate_polygon(&polygon, &options, &mut NoOutput::new())
            .unwrap();
        check(tess.mesh());
        assert_eq!(tess.mesh().triangles.len(), polygon.len() - 2);

        // A ring, with the same jitter on both sides.
        nearly_cocircular_polygon(&mut rng, 5.0, true, &mut hole);
        let mut builder = Path::builder();
        builder.add_polygon(&polygon);
        builder.add_polygon(&hole);
        let path = builder.build();
        tess.triangulate_path(&path, &options, &mut NoOutput::new())
            .unwrap();
        check(tess.mesh());
    }
}

#[test]
fn circle() {
    let mut builder = Path::builder();
    build_circle_path(&mut builder, point(0.0, 0.0), 10.0);
    test_simple_path(&builder.build());
}

#[test]
fn star() {
    let mut builder = Path::builder();
    build_star_path(&mut builder, point(5.0, -3.0), 20.0, 8.0, 7);
    test_simple_path(&builder.build());
}

#[test]
fn blob() {
    let mut builder = Path::builder();
    build_blob_path(&mut builder);
    test_simple_path(&builder.build());
}

#[test]
fn several_disjoint_shapes() {
    let mut builder = Path::builder();
    build_circle_path(&mut builder, point(0.0, 0.0), 3.0);
    build_star_path(&mut builder, point(20.0, 0.0), 5.0, 2.0, 5);
    build_circle_path(&mut builder, point(0.0, 20.0), 4.0);
    let path = builder.build();

    let mesh = triangulate(&path, &TriangulationOptions::tolerance(0.01)).unwrap();
    check_triangles(&mesh);
    check_delaunay(&mesh);
    assert_area(mesh.triangle_area(), contour_area(&mesh));
}

#[test]
fn delaunay_refinement_keeps_coverage() {
    let mut builder = Path::builder();
    build_blob_path(&mut builder);
    let path = builder.build();

    let refined = triangulate(&path, &TriangulationOptions::default()).unwrap();
    let options = TriangulationOptions::DEFAULT.with_delaunay(false);
    let raw = triangulate(&path, &options).unwrap();

    check_triangles(&raw);
    assert_eq!(raw.vertices, refined.vertices);
    assert_eq!(raw.triangles.len(), refined.triangles.len());
    assert_area(raw.triangle_area(), refined.triangle_area());
    check_delaunay(&refined);
}

#[test]
fn finer_scale_adds_vertices() {
    let mut builder = Path::builder();
    build_circle_path(&mut builder, point(0.0, 0.0), 1.0);
    let path = builder.build();

    let coarse = triangulate(&path, &TriangulationOptions::tolerance(0.01)).unwrap();
    let options = TriangulationOptions::tolerance(0.01).with_scale(100.0);
    let fine = triangulate(&path, &options).unwrap();

    assert!(fine.vertices.len() > coarse.vertices.len());
    assert!((fine.triangle_area() - std::f64::consts::PI).abs() < 5e-3);
}

#[test]
fn reuse_triangulator() {
    let mut square = Path::builder();
    square.add_polygon(&[
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(1.0, 1.0),
        point(0.0, 1.0),
    ]);
    let square = square.build();

    let mut circle = Path::builder();
    build_circle_path(&mut circle, point(0.0, 0.0), 10.0);
    let circle = circle.build();

    let options = TriangulationOptions::default();
    let mut tess = new_triangulator();
    let mut buffers: VertexBuffers<Point3D, u32> = VertexBuffers::new();

    for _ in 0..2 {
        tess.triangulate_path(&square, &options, &mut simple_builder(&mut buffers))
            .unwrap();
        assert_eq!(tess.mesh().triangles.len(), 2);

        tess.triangulate_path(&circle, &options, &mut simple_builder(&mut buffers))
            .unwrap();
        check_triangles(tess.mesh());
    }

    // The buffers accumulate the output of the four calls.
    assert_eq!(buffers.vertices.len() % 2, 0);
    assert!(buffers.vertices.len() > 8);
}

#[test]
fn invalid_parameters() {
    let mut builder = Path::builder();
    build_circle_path(&mut builder, point(0.0, 0.0), 1.0);
    let path = builder.build();

    for &scale in &[0.0, -1.0, std::f32::INFINITY, std::f32::NAN] {
        let options = TriangulationOptions::DEFAULT.with_scale(scale);
        assert_eq!(
            triangulate(&path, &options).map(|_| ()),
            Err(TriangulationError::UnsupportedParameter(
                UnsupportedParameter::ScaleIsNotPositive
            ))
        );
    }

    assert_eq!(
        triangulate(&path, &TriangulationOptions::tolerance(std::f32::NAN)).map(|_| ()),
        Err(TriangulationError::UnsupportedParameter(
            UnsupportedParameter::ToleranceIsNaN
        ))
    );

    let mut tess = new_triangulator();
    let res = tess.triangulate_polygon(
        &[point(0.0, 0.0), point(std::f32::NAN, 0.0), point(0.0, 1.0)],
        &TriangulationOptions::default(),
        &mut NoOutput::new(),
    );
    assert_eq!(
        res,
        Err(TriangulationError::UnsupportedParameter(
            UnsupportedParameter::PositionIsNaN
        ))
    );
}

#[test]
fn duplicate_vertices_in_mesh() {
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(point(0.0, 0.0));
    let b = mesh.add_vertex(point(1.0, 0.0));
    let c = mesh.add_vertex(point(0.0, 0.0));
    let d = mesh.add_vertex(point(0.0, 1.0));
    mesh.add_edge(a, b);
    mesh.add_edge(b, d);
    mesh.add_edge(d, c);

    let res = new_triangulator().triangulate_mesh(&mut mesh, &TriangulationOptions::default());
    assert_eq!(
        res,
        Err(TriangulationError::Internal(InternalError::DuplicateVertex(
            VertexId(2)
        )))
    );
}

#[test]
fn edge_to_missing_vertex() {
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(point(0.0, 0.0));
    let b = mesh.add_vertex(point(1.0, 0.0));
    let c = mesh.add_vertex(point(0.0, 1.0));
    mesh.add_edge(a, b);
    mesh.add_edge(b, c);
    mesh.add_edge(c, VertexId(9));

    let res = new_triangulator().triangulate_mesh(&mut mesh, &TriangulationOptions::default());
    assert_eq!(
        res,
        Err(TriangulationError::Internal(InternalError::EdgeOutOfRange(
            c,
            VertexId(9)
        )))
    );
}

#[test]
fn triangulate_existing_mesh() {
    let mut mesh = Mesh::new();
    let ids: Vec<VertexId> = [(0.0, 0.0), (3.0, 0.0), (3.0, 2.0), (0.0, 2.0)]
        .iter()
        .map(|&(x, y)| mesh.add_vertex(point(x, y)))
        .collect();
    for i in 0..4 {
        mesh.add_edge(ids[i], ids[(i + 1) % 4]);
    }
    // Stale triangles are replaced.
    mesh.triangles.push([ids[0], ids[0], ids[0]]);

    new_triangulator()
        .triangulate_mesh(&mut mesh, &TriangulationOptions::default())
        .unwrap();

    assert_eq!(mesh.triangles.len(), 2);
    assert_area(mesh.triangle_area(), 6.0);
    check_triangles(&mesh);
    assert_eq!(mesh.edges[0], Edge::new(ids[0], ids[1]));
}

#[test]
fn too_many_vertices() {
    struct Builder {
        max_vertices: u32,
        aborted: bool,
    }

    impl GeometryBuilder for Builder {
        fn add_vertex(&mut self, _: Point) -> Result<VertexId, GeometryBuilderError> {
            if self.max_vertices == 0 {
                return Err(GeometryBuilderError::TooManyVertices);
            }
            self.max_vertices -= 1;
            Ok(VertexId(self.max_vertices))
        }

        fn add_triangle(&mut self, _a: VertexId, _b: VertexId, _c: VertexId) {}

        fn abort_geometry(&mut self) {
            self.aborted = true;
        }
    }

    let mut path = Path::builder();
    build_star_path(&mut path, point(0.0, 0.0), 10.0, 4.0, 5);
    let path = path.build();

    let mut tess = new_triangulator();
    let options = TriangulationOptions::default();

    for &max_vertices in &[0, 5, 9] {
        let mut builder = Builder {
            max_vertices,
            aborted: false,
        };
        assert_eq!(
            tess.triangulate_path(&path, &options, &mut builder),
            Err(TriangulationError::GeometryBuilder(
                GeometryBuilderError::TooManyVertices
            )),
        );
        assert!(builder.aborted);
    }

    let mut builder = Builder {
        max_vertices: 10,
        aborted: false,
    };
    assert_eq!(tess.triangulate_path(&path, &options, &mut builder), Ok(()));
    assert!(!builder.aborted);
}
