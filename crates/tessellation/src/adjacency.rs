//! Triangle adjacency, stored as vertex stars.
//!
//! The star of a vertex `i` lists, for every triangle `(i, j, k)` incident to it, the edge
//! `(j, k)` opposite to `i`. Each triangle therefore has one entry in the star of each of
//! its three vertices, which is enough to walk across any edge and to flip it.

use crate::error::InternalError;
use crate::mesh::Edge;
use crate::search;
use crate::VertexId;

/// Per-vertex stars of a triangle mesh, supporting edge flips.
#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    stars: Vec<Vec<(VertexId, VertexId)>>,
    constraints: Vec<Edge>,
}

impl Adjacency {
    pub fn new() -> Self {
        Adjacency::default()
    }

    /// Rebuilds the stars from a triangle list.
    ///
    /// `constraints` must be sorted canonical edges, see
    /// [`Mesh::constraint_edges`](crate::Mesh::constraint_edges).
    pub fn rebuild(
        &mut self,
        num_vertices: usize,
        constraints: &[Edge],
        triangles: &[[VertexId; 3]],
    ) {
        // Keep the per-vertex allocations around.
        for star in &mut self.stars {
            star.clear();
        }
        self.stars.resize_with(num_vertices, Vec::new);

        self.constraints.clear();
        self.constraints.extend_from_slice(constraints);
        debug_assert!(self.constraints.windows(2).all(|w| w[0] < w[1]));

        for &[i, j, k] in triangles {
            self.add_triangle(i, j, k);
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.stars.len()
    }

    pub fn star(&self, i: VertexId) -> &[(VertexId, VertexId)] {
        &self.stars[i.to_usize()]
    }

    pub fn add_triangle(&mut self, i: VertexId, j: VertexId, k: VertexId) {
        self.stars[i.to_usize()].push((j, k));
        self.stars[j.to_usize()].push((k, i));
        self.stars[k.to_usize()].push((i, j));
    }

    pub fn remove_triangle(
        &mut self,
        i: VertexId,
        j: VertexId,
        k: VertexId,
    ) -> Result<(), InternalError> {
        self.remove_pair(i, (j, k), (i, j, k))?;
        self.remove_pair(j, (k, i), (i, j, k))?;
        self.remove_pair(k, (i, j), (i, j, k))?;

        Ok(())
    }

    fn remove_pair(
        &mut self,
        vertex: VertexId,
        pair: (VertexId, VertexId),
        triangle: (VertexId, VertexId, VertexId),
    ) -> Result<(), InternalError> {
        let star = &mut self.stars[vertex.to_usize()];
        match star.iter().position(|&entry| entry == pair) {
            Some(idx) => {
                star.swap_remove(idx);
                Ok(())
            }
            None => Err(InternalError::MissingStarEntry(
                triangle.0, triangle.1, triangle.2,
            )),
        }
    }

    /// The apex of the triangle `(j, i, apex)`, or `None` if no triangle contains the
    /// directed edge `j -> i`.
    pub fn opposite(&self, j: VertexId, i: VertexId) -> Option<VertexId> {
        self.stars[i.to_usize()]
            .iter()
            .find(|&&(_, t)| t == j)
            .map(|&(s, _)| s)
    }

    /// Replaces the two triangles sharing edge `i - j` with the two triangles sharing the
    /// other diagonal of their quad.
    pub fn flip(&mut self, i: VertexId, j: VertexId) -> Result<(), InternalError> {
        let a = self.opposite(i, j);
        let b = self.opposite(j, i);
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(InternalError::NonInteriorFlip(i, j));
            }
        };

        self.remove_triangle(i, j, a)?;
        self.remove_triangle(j, i, b)?;
        self.add_triangle(i, b, a);
        self.add_triangle(j, a, b);

        Ok(())
    }

    /// Whether `i - j` is one of the input edges, in either direction.
    pub fn is_constraint(&self, i: VertexId, j: VertexId) -> bool {
        let key = Edge::new(i, j).canonical();
        search::find_equal(&self.constraints, |e| e.cmp(&key)).is_some()
    }

    /// Writes each triangle once.
    pub fn fill(&self, output: &mut Vec<[VertexId; 3]>) {
        for (i, star) in self.stars.iter().enumerate() {
            let i = VertexId::from_usize(i);
            for &(j, k) in star {
                if i < j.min(k) {
                    output.push([i, j, k]);
                }
            }
        }
    }

    /// Calls `callback` with every directed edge `(j, k)` found in the stars.
    pub fn for_each_edge<F: FnMut(VertexId, VertexId)>(&self, mut callback: F) {
        for star in &self.stars {
            for &(j, k) in star {
                callback(j, k);
            }
        }
    }
}

#[cfg(test)]
fn quad() -> Adjacency {
    // 3 ---- 2
    // |    / |
    // |  /   |
    // 0 ---- 1
    let constraints = [
        Edge::new(VertexId(0), VertexId(1)),
        Edge::new(VertexId(0), VertexId(3)),
        Edge::new(VertexId(1), VertexId(2)),
        Edge::new(VertexId(2), VertexId(3)),
    ];
    let triangles = [
        [VertexId(0), VertexId(1), VertexId(2)],
        [VertexId(0), VertexId(2), VertexId(3)],
    ];

    let mut adjacency = Adjacency::new();
    adjacency.rebuild(4, &constraints, &triangles);
    adjacency
}

#[test]
fn opposite_vertices() {
    let adjacency = quad();
    assert_eq!(adjacency.star(VertexId(0)).len(), 2);
    assert_eq!(adjacency.star(VertexId(1)).len(), 1);

    assert_eq!(adjacency.opposite(VertexId(2), VertexId(0)), Some(VertexId(1)));
    assert_eq!(adjacency.opposite(VertexId(0), VertexId(2)), Some(VertexId(3)));
    assert_eq!(adjacency.opposite(VertexId(0), VertexId(1)), Some(VertexId(2)));
    // Boundary edge.
    assert_eq!(adjacency.opposite(VertexId(1), VertexId(0)), None);
}

#[test]
fn flip_diagonal() {
    let mut adjacency = quad();
    assert!(!adjacency.is_constraint(VertexId(2), VertexId(0)));
    assert!(adjacency.is_constraint(VertexId(3), VertexId(0)));

    adjacency.flip(VertexId(0), VertexId(2)).unwrap();

    let mut triangles = Vec::new();
    adjacency.fill(&mut triangles);
    triangles.sort();
    assert_eq!(
        triangles,
        vec![
            [VertexId(0), VertexId(1), VertexId(3)],
            [VertexId(1), VertexId(2), VertexId(3)],
        ]
    );

    assert_eq!(adjacency.opposite(VertexId(3), VertexId(1)), Some(VertexId(2)));
    assert_eq!(adjacency.opposite(VertexId(1), VertexId(3)), Some(VertexId(0)));
}

#[test]
fn contract_violations() {
    let mut adjacency = quad();
    assert_eq!(
        adjacency.flip(VertexId(0), VertexId(1)),
        Err(InternalError::NonInteriorFlip(VertexId(0), VertexId(1)))
    );
    assert_eq!(
        adjacency.remove_triangle(VertexId(1), VertexId(2), VertexId(3)),
        Err(InternalError::MissingStarEntry(
            VertexId(1),
            VertexId(2),
            VertexId(3)
        ))
    );

    adjacency
        .remove_triangle(VertexId(2), VertexId(0), VertexId(1))
        .unwrap();
    let mut triangles = Vec::new();
    adjacency.fill(&mut triangles);
    assert_eq!(triangles, vec![[VertexId(0), VertexId(2), VertexId(3)]]);
}
