//! Delaunay refinement by edge flipping.
//!
//! Every edge of the triangulation that is not an input edge is checked against the local
//! Delaunay condition: the apex of one of its triangles must not lie strictly inside the
//! circumcircle of the other. Offending edges are flipped and the four outer edges of the
//! flipped quad are checked again.
//!
//! Each flip strictly decreases the sum of the circumradii of the triangles, so the process
//! terminates for a fixed point set. The in-circle predicate is exact, which keeps rounding
//! from breaking that progress; the flip count is bounded anyway.

use crate::adjacency::Adjacency;
use crate::error::InternalError;
use crate::geom::{in_circle, Point};
use crate::pool::ScratchPool;
use crate::VertexId;

/// Flips non-constraint edges until the triangulation is a constrained Delaunay
/// triangulation.
pub struct DelaunayRefiner {
    log: bool,
}

impl DelaunayRefiner {
    pub fn new() -> Self {
        DelaunayRefiner { log: false }
    }

    /// Enable/disable some verbose logging, for debugging purposes.
    pub fn set_logging(&mut self, is_enabled: bool) {
        #[cfg(debug_assertions)]
        let forced = std::env::var("TESSERA_FORCE_LOGGING").is_ok();

        #[cfg(not(debug_assertions))]
        let forced = false;

        self.log = is_enabled || forced;
    }

    /// Refines the triangulation in place and returns the number of flips.
    pub fn refine(
        &self,
        adjacency: &mut Adjacency,
        positions: &[Point<f64>],
        num_triangles: usize,
        pool: &ScratchPool,
    ) -> Result<usize, InternalError> {
        let mut queue = pool.checkout::<(VertexId, VertexId)>();
        adjacency.for_each_edge(|j, k| queue.push((j, k)));

        let max_flips = num_triangles.max(1).saturating_mul(num_triangles.max(1));
        let mut flips = 0;

        while let Some((i, j)) = queue.pop() {
            if adjacency.is_constraint(i, j) {
                continue;
            }

            let (a, b) = match (adjacency.opposite(i, j), adjacency.opposite(j, i)) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    continue;
                }
            };

            let p = |v: VertexId| positions[v.to_usize()];
            if in_circle(p(i), p(j), p(a), p(b)) <= 0.0 {
                continue;
            }

            if flips == max_flips {
                log::warn!(
                    "Delaunay refinement stopped after {} flips, the mesh may not be Delaunay",
                    flips
                );
                break;
            }

            tess_log!(self, "flip {:?}-{:?} ({:?}, {:?})", i, j, a, b);

            adjacency.flip(i, j)?;
            flips += 1;

            queue.push((i, a));
            queue.push((a, j));
            queue.push((j, b));
            queue.push((b, i));
        }

        log::debug!("Delaunay refinement: {} flips", flips);

        Ok(flips)
    }
}

impl Default for DelaunayRefiner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
fn refine_quad(points: [(f64, f64); 4], constrained_diagonal: bool) -> (Adjacency, usize) {
    use crate::mesh::Edge;
    use crate::geom::point;

    let positions: Vec<Point<f64>> = points.iter().map(|&(x, y)| point(x, y)).collect();
    let mut constraints = vec![
        Edge::new(VertexId(0), VertexId(1)),
        Edge::new(VertexId(0), VertexId(3)),
        Edge::new(VertexId(1), VertexId(2)),
        Edge::new(VertexId(2), VertexId(3)),
    ];
    if constrained_diagonal {
        constraints.push(Edge::new(VertexId(0), VertexId(2)));
        constraints.sort();
    }

    let triangles = [
        [VertexId(0), VertexId(1), VertexId(2)],
        [VertexId(0), VertexId(2), VertexId(3)],
    ];
    let mut adjacency = Adjacency::new();
    adjacency.rebuild(4, &constraints, &triangles);

    let pool = ScratchPool::new();
    let flips = DelaunayRefiner::new()
        .refine(&mut adjacency, &positions, 2, &pool)
        .unwrap();

    (adjacency, flips)
}

#[test]
fn flips_skinny_diagonal() {
    // The 0-2 diagonal is the long one.
    let (adjacency, flips) = refine_quad([(0.0, 0.0), (4.0, -1.0), (8.0, 0.0), (4.0, 1.0)], false);
    assert_eq!(flips, 1);

    let mut triangles = Vec::new();
    adjacency.fill(&mut triangles);
    for tri in &triangles {
        assert!(tri.contains(&VertexId(1)) && tri.contains(&VertexId(3)));
    }
}

#[test]
fn respects_constraints() {
    let (_, flips) = refine_quad([(0.0, 0.0), (4.0, -1.0), (8.0, 0.0), (4.0, 1.0)], true);
    assert_eq!(flips, 0);
}

#[test]
fn cocircular_points_are_not_flipped() {
    let (_, flips) = refine_quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], false);
    assert_eq!(flips, 0);
}

#[test]
fn flip_budget_stops_refinement() {
    use crate::geom::{in_circle, point};
    use crate::mesh::Edge;

    // A fan over a flat octagon needs several flips to become Delaunay.
    let positions: Vec<Point<f64>> = [
        (0.0, 0.0), (3.0, -2.0), (6.0, -2.5), (9.0, -2.0),
        (12.0, 0.0), (9.0, 2.0), (6.0, 2.5), (3.0, 2.0),
    ]
    .iter()
    .map(|&(x, y)| point(x, y))
    .collect();
    let n = positions.len() as u32;
    let mut constraints: Vec<Edge> = (0..n)
        .map(|i| Edge::new(VertexId(i), VertexId((i + 1) % n)).canonical())
        .collect();
    constraints.sort();
    let triangles: Vec<[VertexId; 3]> = (1..n - 1)
        .map(|k| [VertexId(0), VertexId(k), VertexId(k + 1)])
        .collect();

    let pool = ScratchPool::new();
    let mut adjacency = Adjacency::new();
    adjacency.rebuild(positions.len(), &constraints, &triangles);
    // An empty triangle count leaves a budget of a single flip.
    let flips = DelaunayRefiner::new()
        .refine(&mut adjacency, &positions, 0, &pool)
        .unwrap();
    assert_eq!(flips, 1);

    let mut illegal_edges = 0;
    adjacency.for_each_edge(|i, j| {
        if adjacency.is_constraint(i, j) {
            return;
        }
        if let (Some(a), Some(b)) = (adjacency.opposite(i, j), adjacency.opposite(j, i)) {
            let p = |v: VertexId| positions[v.to_usize()];
            if in_circle(p(i), p(j), p(a), p(b)) > 0.0 {
                illegal_edges += 1;
            }
        }
    });
    assert!(illegal_edges > 0);

    // With the regular budget the same fan is fully refined.
    adjacency.rebuild(positions.len(), &constraints, &triangles);
    let flips = DelaunayRefiner::new()
        .refine(&mut adjacency, &positions, triangles.len(), &pool)
        .unwrap();
    assert!(flips > 1, "{}", flips);
}
