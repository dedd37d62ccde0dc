use crate::geom::Triangle;
use crate::math::Point;
use crate::VertexId;

/// A directed constraint edge between two vertices of a [`Mesh`].
///
/// Edges keep the direction of the contour they come from, which the winding number
/// computation relies on. Constraint lookups use the [canonical](Edge::canonical) form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
}

impl Edge {
    #[inline]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Edge { from, to }
    }

    /// The edge with its end points in ascending order.
    #[inline]
    pub fn canonical(self) -> Self {
        if self.from <= self.to {
            self
        } else {
            Edge {
                from: self.to,
                to: self.from,
            }
        }
    }

    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.from == self.to
    }
}

/// A planar straight-line graph and its triangulation.
///
/// The vertex list holds unique positions. Edges form the closed input contours.
/// Triangles index the vertex list and are wound counter-clockwise in a y-up coordinate
/// system (clockwise on a y-down screen).
///
/// A mesh keeps its allocations when cleared so that it can be reused every frame.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Mesh {
    pub vertices: Vec<Point>,
    pub edges: Vec<Edge>,
    pub triangles: Vec<[VertexId; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Mesh::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Mesh {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            triangles: Vec::with_capacity(vertices * 2),
        }
    }

    /// Empty the mesh without freeing memory.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.triangles.clear();
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> Point {
        self.vertices[id.to_usize()]
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Appends a vertex without checking for duplicates.
    pub fn add_vertex(&mut self, position: Point) -> VertexId {
        self.vertices.push(position);
        VertexId::from_usize(self.vertices.len() - 1)
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId) {
        self.edges.push(Edge { from, to });
    }

    /// Writes the canonical form of every edge, sorted and without duplicates.
    pub fn constraint_edges(&self, output: &mut Vec<Edge>) {
        output.clear();
        output.extend(self.edges.iter().map(|e| e.canonical()));
        output.sort_unstable();
        output.dedup();
    }

    /// Sum of the absolute triangle areas.
    pub fn triangle_area(&self) -> f64 {
        let mut area = 0.0;
        for tri in &self.triangles {
            area += Triangle {
                a: self.vertex(tri[0]).to_f64(),
                b: self.vertex(tri[1]).to_f64(),
                c: self.vertex(tri[2]).to_f64(),
            }
            .area();
        }

        area
    }
}

#[test]
fn canonical_constraint_edges() {
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(Point::new(0.0, 0.0));
    let b = mesh.add_vertex(Point::new(1.0, 0.0));
    let c = mesh.add_vertex(Point::new(0.0, 1.0));
    mesh.add_edge(a, b);
    mesh.add_edge(c, b);
    mesh.add_edge(b, a);
    mesh.add_edge(c, a);

    let mut edges = Vec::new();
    mesh.constraint_edges(&mut edges);
    assert_eq!(
        edges,
        vec![Edge::new(a, b), Edge::new(a, c), Edge::new(b, c)]
    );

    assert_eq!(Edge::new(c, a).canonical(), Edge::new(a, c));
    assert!(Edge::new(b, b).is_degenerate());

    mesh.triangles.push([a, c, b]);
    assert!((mesh.triangle_area() - 0.5).abs() < 1e-12);

    mesh.clear();
    assert!(mesh.is_empty());
    assert!(mesh.triangles.is_empty());
}
