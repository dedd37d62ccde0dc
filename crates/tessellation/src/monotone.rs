//! Sweep-line triangulation of a planar straight-line graph.
//!
//! A vertical sweep line moves along the x axis. The region it has already crossed is
//! partitioned into partial hulls by the input edges. Each partial hull keeps a lower and
//! an upper monotone chain of vertices, which are greedily triangulated as new points come
//! in: every point reached by the sweep line is connected to the chains of the hulls it
//! falls into, and the reflex part of each chain is popped into triangles.
//!
//! Edges starting at a point split the hull they start in, edges ending at a point merge
//! the two hulls on each side of them. A sentinel hull to the left of every input point
//! bounds the region from below, so every point falls into at least one hull.
//!
//! The result covers the convex hull of the vertices and contains every input edge that is
//! not vertical. Vertical edges do not generate events.

use crate::error::InternalError;
use crate::geom::{orient2d, point, Point};
use crate::mesh::{Edge, Mesh};
use crate::pool::ScratchPool;
use crate::search;
use crate::VertexId;

use std::cmp::Ordering;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Point,
    End,
    Start,
}

#[derive(Copy, Clone, Debug)]
struct SweepEvent {
    /// Where the event happens.
    at: Point<f64>,
    /// The other end of the edge. Same as `at` for point events.
    other: Point<f64>,
    kind: EventKind,
    /// Vertex index for point events, edge index otherwise.
    index: usize,
}

#[derive(Clone, Debug)]
struct PartialHull {
    a: Point<f64>,
    b: Point<f64>,
    /// `None` for the sentinel.
    edge: Option<usize>,
    lower: Vec<VertexId>,
    upper: Vec<VertexId>,
}

#[inline]
fn sign(v: f64) -> Ordering {
    if v > 0.0 {
        Ordering::Greater
    } else if v < 0.0 {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

fn compare_events(a: &SweepEvent, b: &SweepEvent) -> Ordering {
    a.at.x
        .partial_cmp(&b.at.x)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.at.y.partial_cmp(&b.at.y).unwrap_or(Ordering::Equal))
        .then_with(|| a.kind.cmp(&b.kind))
        .then_with(|| {
            if a.kind == EventKind::Point {
                Ordering::Equal
            } else {
                sign(orient2d(a.at, a.other, b.other))
            }
        })
        .then_with(|| a.index.cmp(&b.index))
}

/// Side of the hull's lower boundary the point is on.
fn test_point(hull: &PartialHull, p: Point<f64>) -> Ordering {
    sign(orient2d(hull.a, hull.b, p))
}

/// Orders a hull against an edge going from `edge.at` (left) to `edge.other` (right).
fn find_split(hull: &PartialHull, edge: &SweepEvent) -> Ordering {
    let d = if hull.a.x < edge.at.x {
        orient2d(hull.a, hull.b, edge.at)
    } else {
        orient2d(edge.other, edge.at, hull.a)
    };
    if d != 0.0 {
        return sign(d);
    }

    let d = if edge.other.x < hull.b.x {
        orient2d(hull.a, hull.b, edge.other)
    } else {
        orient2d(edge.other, edge.at, hull.b)
    };
    if d != 0.0 {
        return sign(d);
    }

    hull.edge.cmp(&Some(edge.index))
}

/// Sweep-line triangulator producing the initial triangle soup of a mesh.
pub struct MonotoneTriangulator {
    log: bool,
}

impl MonotoneTriangulator {
    pub fn new() -> Self {
        MonotoneTriangulator { log: false }
    }

    /// Enable/disable some verbose logging during the sweep, for debugging purposes.
    pub fn set_logging(&mut self, is_enabled: bool) {
        #[cfg(debug_assertions)]
        let forced = std::env::var("TESSERA_FORCE_LOGGING").is_ok();

        #[cfg(not(debug_assertions))]
        let forced = false;

        self.log = is_enabled || forced;
    }

    /// Appends a triangulation of the mesh's vertices to its triangle list.
    ///
    /// The vertices must be unique. Each emitted triangle has a negative
    /// [orientation](crate::geom::orient2d).
    pub fn triangulate(&self, mesh: &mut Mesh, pool: &ScratchPool) -> Result<(), InternalError> {
        if mesh.vertices.is_empty() {
            return Ok(());
        }

        let mut positions = pool.checkout::<Point<f64>>();
        positions.extend(mesh.vertices.iter().map(|p| p.to_f64()));

        let mut events = pool.checkout::<SweepEvent>();
        for (index, &at) in positions.iter().enumerate() {
            events.push(SweepEvent {
                at,
                other: at,
                kind: EventKind::Point,
                index,
            });
        }

        // Contours that retrace an edge would otherwise open empty hulls.
        let mut edges = pool.checkout::<Edge>();
        mesh.constraint_edges(&mut edges);

        for (index, edge) in edges.iter().enumerate() {
            let a = positions[edge.from.to_usize()];
            let b = positions[edge.to.to_usize()];
            let (left, right) = if a.x < b.x {
                (a, b)
            } else if a.x > b.x {
                (b, a)
            } else {
                tess_log!(self, "skipping vertical edge #{} {:?}", index, edge);
                continue;
            };

            events.push(SweepEvent {
                at: left,
                other: right,
                kind: EventKind::Start,
                index,
            });
            events.push(SweepEvent {
                at: right,
                other: left,
                kind: EventKind::End,
                index,
            });
        }

        events.sort_by(compare_events);

        let first_x = events[0].at.x;
        let min_x = first_x - (1.0 + first_x.abs());
        let mut hulls = pool.checkout::<PartialHull>();
        hulls.push(PartialHull {
            a: point(min_x, 1.0),
            b: point(min_x, 0.0),
            edge: None,
            lower: Vec::new(),
            upper: Vec::new(),
        });

        let num_triangles = mesh.triangles.len();
        let mut previous_point: Option<Point<f64>> = None;

        for event in events.iter() {
            match event.kind {
                EventKind::Point => {
                    if previous_point == Some(event.at) {
                        return Err(InternalError::DuplicateVertex(VertexId::from_usize(
                            event.index,
                        )));
                    }
                    previous_point = Some(event.at);

                    self.add_point(
                        &mut hulls,
                        &positions,
                        &mut mesh.triangles,
                        event.at,
                        VertexId::from_usize(event.index),
                    );
                }
                EventKind::Start => {
                    self.split_hulls(&mut hulls, event)?;
                }
                EventKind::End => {
                    self.merge_hulls(&mut hulls, event)?;
                }
            }
        }

        log::debug!(
            "monotone sweep: {} events, {} triangles",
            events.len(),
            mesh.triangles.len() - num_triangles
        );

        Ok(())
    }

    fn add_point(
        &self,
        hulls: &mut [PartialHull],
        positions: &[Point<f64>],
        triangles: &mut Vec<[VertexId; 3]>,
        p: Point<f64>,
        id: VertexId,
    ) {
        // The sentinel is below every point, so `lo` is only missing on degenerate input.
        let lo = search::last_less(hulls, |hull| test_point(hull, p)).unwrap_or(0);
        let hi = search::first_greater(hulls, |hull| test_point(hull, p));

        tess_log!(self, "point {:?} at {:?} in hulls {}..{}", id, p, lo, hi);

        for hull in hulls.iter_mut().take(hi).skip(lo) {
            let lower = &mut hull.lower;
            while lower.len() > 1 {
                let n = lower.len();
                let (a, b) = (lower[n - 2], lower[n - 1]);
                if orient2d(positions[a.to_usize()], positions[b.to_usize()], p) <= 0.0 {
                    break;
                }
                triangles.push([b, a, id]);
                lower.pop();
            }
            lower.push(id);

            let upper = &mut hull.upper;
            while upper.len() > 1 {
                let n = upper.len();
                let (a, b) = (upper[n - 2], upper[n - 1]);
                if orient2d(positions[a.to_usize()], positions[b.to_usize()], p) >= 0.0 {
                    break;
                }
                triangles.push([a, b, id]);
                upper.pop();
            }
            upper.push(id);
        }
    }

    fn split_hulls(
        &self,
        hulls: &mut Vec<PartialHull>,
        event: &SweepEvent,
    ) -> Result<(), InternalError> {
        let missing = InternalError::MissingHullFragment(event.index);

        let idx = search::last_less_or_equal(hulls, |hull| find_split(hull, event))
            .ok_or(missing)?;

        let seed = *hulls[idx].upper.last().ok_or(missing)?;
        let upper = std::mem::replace(&mut hulls[idx].upper, vec![seed]);

        tess_log!(self, "edge #{} splits hull {} at {:?}", event.index, idx, seed);

        hulls.insert(
            idx + 1,
            PartialHull {
                a: event.at,
                b: event.other,
                edge: Some(event.index),
                lower: vec![seed],
                upper,
            },
        );

        Ok(())
    }

    fn merge_hulls(
        &self,
        hulls: &mut Vec<PartialHull>,
        event: &SweepEvent,
    ) -> Result<(), InternalError> {
        // Look the edge up in the direction it was inserted with.
        let edge = SweepEvent {
            at: event.other,
            other: event.at,
            ..*event
        };

        let idx = match search::find_equal(hulls, |hull| find_split(hull, &edge)) {
            Some(idx) if idx > 0 => idx,
            _ => {
                return Err(InternalError::MissingHullFragment(event.index));
            }
        };

        tess_log!(self, "edge #{} merges hulls {} and {}", event.index, idx - 1, idx);

        let removed = hulls.remove(idx);
        hulls[idx - 1].upper = removed.upper;

        Ok(())
    }
}

impl Default for MonotoneTriangulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
fn sweep(points: &[(f32, f32)], contour: bool) -> Result<Mesh, InternalError> {
    let mut mesh = Mesh::new();
    for &(x, y) in points {
        mesh.add_vertex(crate::math::point(x, y));
    }
    if contour {
        let n = points.len() as u32;
        for i in 0..n {
            mesh.add_edge(VertexId(i), VertexId((i + 1) % n));
        }
    }

    let pool = ScratchPool::new();
    MonotoneTriangulator::new().triangulate(&mut mesh, &pool)?;

    for tri in &mesh.triangles {
        let a = mesh.vertex(tri[0]).to_f64();
        let b = mesh.vertex(tri[1]).to_f64();
        let c = mesh.vertex(tri[2]).to_f64();
        assert!(orient2d(a, b, c) < 0.0, "bad winding {:?}", tri);
    }

    Ok(mesh)
}

#[test]
fn unit_square() {
    let mesh = sweep(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], true).unwrap();
    assert_eq!(mesh.triangles.len(), 2);
    assert!((mesh.triangle_area() - 1.0).abs() < 1e-9);
}

#[test]
fn single_triangle() {
    let mesh = sweep(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)], true).unwrap();
    assert_eq!(
        mesh.triangles,
        vec![[VertexId(2), VertexId(0), VertexId(1)]]
    );
}

#[test]
fn point_grid() {
    let mut points = Vec::new();
    for x in 0..3 {
        for y in 0..3 {
            points.push((x as f32, y as f32));
        }
    }

    let mesh = sweep(&points, false).unwrap();
    assert_eq!(mesh.triangles.len(), 8);
    assert!((mesh.triangle_area() - 4.0).abs() < 1e-9);
}

#[test]
fn no_vertices() {
    let mesh = sweep(&[], false).unwrap();
    assert!(mesh.triangles.is_empty());
}

#[test]
fn collinear_points() {
    let mesh = sweep(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)], false).unwrap();
    assert!(mesh.triangles.is_empty());
}

#[test]
fn duplicate_vertex() {
    let res = sweep(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)], false);
    assert_eq!(res.err(), Some(InternalError::DuplicateVertex(VertexId(2))));
}

#[test]
fn scratch_buffers_are_returned() {
    let mut mesh = Mesh::new();
    mesh.add_vertex(crate::math::point(0.0, 0.0));
    mesh.add_vertex(crate::math::point(1.0, 0.5));
    mesh.add_vertex(crate::math::point(0.0, 1.0));

    let pool = ScratchPool::new();
    let triangulator = MonotoneTriangulator::new();
    triangulator.triangulate(&mut mesh, &pool).unwrap();
    assert_eq!(pool.available::<SweepEvent>(), 1);
    assert_eq!(pool.available::<PartialHull>(), 1);

    mesh.triangles.clear();
    mesh.add_vertex(crate::math::point(1.0, 0.5));
    assert!(triangulator.triangulate(&mut mesh, &pool).is_err());
    assert_eq!(pool.available::<SweepEvent>(), 1);
    assert_eq!(pool.available::<Point<f64>>(), 1);
}
