//! Classification of triangles against the input contours.

use crate::geom::{orient2d, Point, Triangle};
use crate::mesh::Edge;
use crate::{FillRule, TriangulationOptions, VertexId};

/// Winding number of the directed edges around `p`.
///
/// Contours that are counter-clockwise with the y axis pointing up contribute `+1` to the
/// points they enclose, clockwise ones contribute `-1`.
pub fn winding_number(positions: &[Point<f64>], edges: &[Edge], p: Point<f64>) -> i32 {
    let mut winding = 0;
    for edge in edges {
        let a = positions[edge.from.to_usize()];
        let b = positions[edge.to.to_usize()];
        if a.y <= p.y {
            if b.y > p.y && orient2d(a, b, p) < 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && orient2d(a, b, p) > 0.0 {
            winding -= 1;
        }
    }

    winding
}

/// Decides which triangles of a triangulation are kept.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TriangleFilter {
    /// Keep every triangle of the convex hull.
    All,
    /// Keep the triangles that are inside according to the fill rule.
    Interior(FillRule),
    /// Keep the triangles that are outside according to the fill rule.
    Exterior(FillRule),
    /// Keep the triangles with exactly this winding number.
    Winding(i32),
    /// Keep nothing.
    None,
}

impl TriangleFilter {
    pub fn from_options(options: &TriangulationOptions) -> Self {
        if let Some(target) = options.winding_target {
            return TriangleFilter::Winding(target);
        }

        match (options.interior, options.exterior) {
            (true, true) => TriangleFilter::All,
            (true, false) => TriangleFilter::Interior(options.fill_rule),
            (false, true) => TriangleFilter::Exterior(options.fill_rule),
            (false, false) => TriangleFilter::None,
        }
    }

    #[inline]
    pub fn keeps(&self, winding: i32) -> bool {
        match *self {
            TriangleFilter::All => true,
            TriangleFilter::Interior(rule) => rule.is_in(winding),
            TriangleFilter::Exterior(rule) => rule.is_out(winding),
            TriangleFilter::Winding(target) => winding == target,
            TriangleFilter::None => false,
        }
    }

    /// Whether the filter needs winding numbers at all.
    pub fn is_trivial(&self) -> bool {
        matches!(*self, TriangleFilter::All | TriangleFilter::None)
    }

    /// Removes the triangles that are not kept, sampling the winding number at their
    /// centroid.
    pub fn apply(
        &self,
        positions: &[Point<f64>],
        edges: &[Edge],
        triangles: &mut Vec<[VertexId; 3]>,
    ) {
        match *self {
            TriangleFilter::All => {
                return;
            }
            TriangleFilter::None => {
                triangles.clear();
                return;
            }
            _ => {}
        }

        let before = triangles.len();
        triangles.retain(|tri| {
            let centroid = Triangle {
                a: positions[tri[0].to_usize()],
                b: positions[tri[1].to_usize()],
                c: positions[tri[2].to_usize()],
            }
            .centroid();

            self.keeps(winding_number(positions, edges, centroid))
        });

        log::debug!(
            "winding filter {:?}: kept {} of {} triangles",
            self,
            triangles.len(),
            before
        );
    }
}

#[cfg(test)]
use crate::geom::point;

#[cfg(test)]
fn square(positions: &mut Vec<Point<f64>>, edges: &mut Vec<Edge>, half: f64, reversed: bool) {
    let first = positions.len() as u32;
    positions.push(point(-half, -half));
    positions.push(point(half, -half));
    positions.push(point(half, half));
    positions.push(point(-half, half));
    for i in 0..4 {
        let (from, to) = (VertexId(first + i), VertexId(first + (i + 1) % 4));
        edges.push(if reversed {
            Edge::new(to, from)
        } else {
            Edge::new(from, to)
        });
    }
}

#[test]
fn winding_of_nested_squares() {
    let mut positions = Vec::new();
    let mut edges = Vec::new();
    square(&mut positions, &mut edges, 2.0, false);
    square(&mut positions, &mut edges, 1.0, false);

    assert_eq!(winding_number(&positions, &edges, point(0.0, 0.0)), 2);
    assert_eq!(winding_number(&positions, &edges, point(1.5, 0.1)), 1);
    assert_eq!(winding_number(&positions, &edges, point(3.0, 0.0)), 0);

    let mut positions = Vec::new();
    let mut edges = Vec::new();
    square(&mut positions, &mut edges, 2.0, false);
    square(&mut positions, &mut edges, 1.0, true);
    assert_eq!(winding_number(&positions, &edges, point(0.0, 0.0)), 0);
    assert_eq!(winding_number(&positions, &edges, point(-1.5, -1.2)), 1);
}

#[test]
fn clockwise_contours_wind_negatively() {
    let mut positions = Vec::new();
    let mut edges = Vec::new();
    square(&mut positions, &mut edges, 1.0, true);
    assert_eq!(winding_number(&positions, &edges, point(0.25, -0.5)), -1);
}

#[test]
fn filter_modes() {
    let options = TriangulationOptions::default();
    assert_eq!(
        TriangleFilter::from_options(&options),
        TriangleFilter::Interior(FillRule::EvenOdd)
    );
    assert_eq!(
        TriangleFilter::from_options(&options.with_exterior(true)),
        TriangleFilter::All
    );
    assert_eq!(
        TriangleFilter::from_options(&options.with_interior(false).with_exterior(true)),
        TriangleFilter::Exterior(FillRule::EvenOdd)
    );
    assert_eq!(
        TriangleFilter::from_options(&options.with_interior(false)),
        TriangleFilter::None
    );
    assert_eq!(
        TriangleFilter::from_options(&options.with_winding_target(Some(2))),
        TriangleFilter::Winding(2)
    );

    assert!(TriangleFilter::Interior(FillRule::EvenOdd).keeps(1));
    assert!(!TriangleFilter::Interior(FillRule::EvenOdd).keeps(2));
    assert!(TriangleFilter::Interior(FillRule::NonZero).keeps(2));
    assert!(TriangleFilter::Exterior(FillRule::NonZero).keeps(0));
    assert!(TriangleFilter::Winding(-1).keeps(-1));
    assert!(!TriangleFilter::Winding(1).keeps(2));
}

#[test]
fn apply_removes_hole() {
    let mut positions = Vec::new();
    let mut edges = Vec::new();
    square(&mut positions, &mut edges, 2.0, false);
    square(&mut positions, &mut edges, 1.0, false);

    // One triangle in the ring, one in the hole.
    let ring = [VertexId(0), VertexId(1), VertexId(5)];
    let hole = [VertexId(4), VertexId(5), VertexId(6)];
    let mut triangles = vec![ring, hole];

    TriangleFilter::Interior(FillRule::EvenOdd).apply(&positions, &edges, &mut triangles);
    assert_eq!(triangles, vec![ring]);

    let mut triangles = vec![ring, hole];
    TriangleFilter::Winding(2).apply(&positions, &edges, &mut triangles);
    assert_eq!(triangles, vec![hole]);
}
