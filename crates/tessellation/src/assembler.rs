//! Conversion of paths into a planar straight-line graph.

use crate::error::UnsupportedParameter;
use crate::geom::{CubicBezierSegment, FlatteningOptions};
use crate::math::Point;
use crate::mesh::Mesh;
use crate::path::PathEvent;
use crate::pool::ScratchPool;
use crate::VertexId;

use std::collections::HashMap;

/// Merges closed polylines into the vertex and edge lists of a [`Mesh`].
///
/// Identical positions map to a single vertex, across contours. `-0.0` and `0.0` are
/// considered identical.
#[derive(Clone, Debug, Default)]
pub struct ContourAssembler {
    vertex_ids: HashMap<(u32, u32), VertexId>,
}

impl ContourAssembler {
    pub fn new() -> Self {
        ContourAssembler::default()
    }

    /// Forgets the known vertices. Must be called when the mesh is cleared.
    pub fn clear(&mut self) {
        self.vertex_ids.clear();
    }

    fn vertex(&mut self, mesh: &mut Mesh, position: Point) -> VertexId {
        // Adding zero turns -0.0 into 0.0.
        let key = ((position.x + 0.0).to_bits(), (position.y + 0.0).to_bits());
        *self
            .vertex_ids
            .entry(key)
            .or_insert_with(|| mesh.add_vertex(position))
    }

    /// Adds a contour, implicitly closed.
    ///
    /// Consecutive identical points are collapsed. No closing edge is added if the last
    /// point is already the first one. A two-point contour becomes a pair of opposite
    /// edges, which leaves winding numbers unchanged.
    pub fn add_contour(&mut self, mesh: &mut Mesh, points: &[Point]) {
        let mut first = None;
        let mut previous = None;

        for &p in points {
            let id = self.vertex(mesh, p);
            match previous {
                None => {
                    first = Some(id);
                }
                Some(prev) if prev == id => {
                    continue;
                }
                Some(prev) => {
                    mesh.add_edge(prev, id);
                }
            }
            previous = Some(id);
        }

        if let (Some(first), Some(last)) = (first, previous) {
            if last != first {
                mesh.add_edge(last, first);
            }
        }
    }
}

/// Flattens path events into contours and feeds them to a [`ContourAssembler`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathFlattener {
    pub options: FlatteningOptions,
    pub scale: f32,
}

impl PathFlattener {
    pub fn new(options: FlatteningOptions, scale: f32) -> Self {
        PathFlattener { options, scale }
    }

    /// Adds every sub-path of a sequence of path events to the mesh.
    ///
    /// Sub-paths are closed even when the events do not close them.
    pub fn assemble<Iter>(
        &self,
        events: Iter,
        assembler: &mut ContourAssembler,
        mesh: &mut Mesh,
        pool: &ScratchPool,
    ) -> Result<(), UnsupportedParameter>
    where
        Iter: IntoIterator<Item = PathEvent>,
    {
        let mut contour = pool.checkout::<Point>();

        for event in events {
            match event {
                PathEvent::Begin { at } => {
                    check_position(at)?;
                    if !contour.is_empty() {
                        assembler.add_contour(mesh, &contour);
                        contour.clear();
                    }
                    contour.push(at);
                }
                PathEvent::Line { from, to } => {
                    check_position(to)?;
                    if contour.is_empty() {
                        check_position(from)?;
                        contour.push(from);
                    }
                    contour.push(to);
                }
                PathEvent::Cubic {
                    from,
                    ctrl1,
                    ctrl2,
                    to,
                } => {
                    check_position(ctrl1)?;
                    check_position(ctrl2)?;
                    check_position(to)?;
                    if contour.is_empty() {
                        check_position(from)?;
                        contour.push(from);
                    }

                    let segment = CubicBezierSegment {
                        from,
                        ctrl1,
                        ctrl2,
                        to,
                    };
                    segment.for_each_adaptive_point(&self.options, self.scale, &mut |p| {
                        contour.push(p)
                    });
                    contour.push(to);
                }
                PathEvent::End { .. } => {
                    assembler.add_contour(mesh, &contour);
                    contour.clear();
                }
            }
        }

        if !contour.is_empty() {
            assembler.add_contour(mesh, &contour);
        }

        Ok(())
    }
}

fn check_position(p: Point) -> Result<(), UnsupportedParameter> {
    if p.x.is_nan() || p.y.is_nan() {
        return Err(UnsupportedParameter::PositionIsNaN);
    }

    Ok(())
}

#[cfg(test)]
use crate::mesh::Edge;
#[cfg(test)]
use crate::math::point;

#[test]
fn dedup_and_close() {
    let mut mesh = Mesh::new();
    let mut assembler = ContourAssembler::new();
    assembler.add_contour(
        &mut mesh,
        &[
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(1.0, 0.0),
            point(1.0, 1.0),
        ],
    );

    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(
        mesh.edges,
        vec![
            Edge::new(VertexId(0), VertexId(1)),
            Edge::new(VertexId(1), VertexId(2)),
            Edge::new(VertexId(2), VertexId(0)),
        ]
    );
}

#[test]
fn explicitly_closed_contour() {
    let mut mesh = Mesh::new();
    let mut assembler = ContourAssembler::new();
    assembler.add_contour(
        &mut mesh,
        &[
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(1.0, 1.0),
            point(0.0, 0.0),
        ],
    );

    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.edges.len(), 3);
    assert_eq!(mesh.edges[2], Edge::new(VertexId(2), VertexId(0)));
}

#[test]
fn shared_vertices_and_negative_zero() {
    let mut mesh = Mesh::new();
    let mut assembler = ContourAssembler::new();
    assembler.add_contour(
        &mut mesh,
        &[point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)],
    );
    assembler.add_contour(
        &mut mesh,
        &[point(-0.0, 0.0), point(0.0, -1.0), point(-1.0, -0.0)],
    );

    assert_eq!(mesh.vertices.len(), 5);
    assert_eq!(mesh.edges.len(), 6);
    assert_eq!(mesh.edges[3].from, VertexId(0));

    assembler.clear();
    mesh.clear();
    assembler.add_contour(&mut mesh, &[point(5.0, 5.0)]);
    assert_eq!(mesh.vertices.len(), 1);
    assert!(mesh.edges.is_empty());
}

#[test]
fn degenerate_contours() {
    let mut mesh = Mesh::new();
    let mut assembler = ContourAssembler::new();
    assembler.add_contour(&mut mesh, &[point(0.0, 0.0), point(1.0, 0.0)]);
    assert_eq!(
        mesh.edges,
        vec![
            Edge::new(VertexId(0), VertexId(1)),
            Edge::new(VertexId(1), VertexId(0)),
        ]
    );

    assembler.add_contour(&mut mesh, &[]);
    assembler.add_contour(&mut mesh, &[point(3.0, 3.0), point(3.0, 3.0)]);
    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.edges.len(), 2);
}

#[test]
fn flatten_path_events() {
    use crate::path::builder::PathBuilder;
    use crate::path::Path;

    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(10.0, 0.0));
    builder.line_to(point(10.0, 10.0));
    builder.end(false);
    builder.begin(point(20.0, 0.0));
    builder.cubic_bezier_to(point(30.0, 0.0), point(30.0, 10.0), point(20.0, 10.0));
    builder.close();
    let path = builder.build();

    let mut mesh = Mesh::new();
    let mut assembler = ContourAssembler::new();
    let pool = ScratchPool::new();
    let flattener = PathFlattener::new(FlatteningOptions::tolerance(0.1), 1.0);
    flattener
        .assemble(path.iter(), &mut assembler, &mut mesh, &pool)
        .unwrap();

    // The open triangle is closed.
    assert_eq!(mesh.edges[2], Edge::new(VertexId(2), VertexId(0)));
    // The curve contributes interior points.
    assert!(mesh.vertices.len() > 5);
    assert_eq!(mesh.edges.len(), mesh.vertices.len());
    assert_eq!(pool.available::<Point>(), 1);

    // A finer scale produces more points.
    let count = mesh.vertices.len();
    mesh.clear();
    assembler.clear();
    PathFlattener::new(FlatteningOptions::tolerance(0.1), 10.0)
        .assemble(path.iter(), &mut assembler, &mut mesh, &pool)
        .unwrap();
    assert!(mesh.vertices.len() > count);
}

#[test]
fn nan_positions() {
    let events = vec![
        PathEvent::Begin {
            at: point(0.0, 0.0),
        },
        PathEvent::Line {
            from: point(0.0, 0.0),
            to: point(std::f32::NAN, 1.0),
        },
    ];

    let mut mesh = Mesh::new();
    let pool = ScratchPool::new();
    let res = PathFlattener::new(FlatteningOptions::DEFAULT, 1.0).assemble(
        events,
        &mut ContourAssembler::new(),
        &mut mesh,
        &pool,
    );
    assert_eq!(res, Err(UnsupportedParameter::PositionIsNaN));
    assert_eq!(pool.available::<Point>(), 1);
}

#[test]
fn nan_start_points() {
    let nan = point(std::f32::NAN, 0.0);
    let line = PathEvent::Line {
        from: nan,
        to: point(1.0, 1.0),
    };
    let cubic = PathEvent::Cubic {
        from: nan,
        ctrl1: point(1.0, 0.0),
        ctrl2: point(1.0, 1.0),
        to: point(0.0, 1.0),
    };

    let pool = ScratchPool::new();
    let flattener = PathFlattener::new(FlatteningOptions::DEFAULT, 1.0);
    for &event in &[line, cubic] {
        let mut mesh = Mesh::new();
        let res = flattener.assemble(Some(event), &mut ContourAssembler::new(), &mut mesh, &pool);
        assert_eq!(res, Err(UnsupportedParameter::PositionIsNaN));
        assert!(mesh.vertices.is_empty());
    }
}
