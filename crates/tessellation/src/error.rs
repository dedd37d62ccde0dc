use crate::VertexId;
use thiserror::Error;

/// The triangulator's result type.
pub type TriangulationResult = Result<(), TriangulationError>;

/// Describes an unexpected error happening during triangulation.
///
/// These correspond to broken internal invariants. They are reported instead of letting
/// the mesh adjacency silently degrade into incorrect triangles.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InternalError {
    #[error("Vertex {0:?} has the same position as another vertex")]
    DuplicateVertex(VertexId),
    #[error("No partial hull ends with edge #{0}")]
    MissingHullFragment(usize),
    #[error("Triangle ({0:?}, {1:?}, {2:?}) is not in the adjacency structure")]
    MissingStarEntry(VertexId, VertexId, VertexId),
    #[error("Edge ({0:?}, {1:?}) is not shared by two triangles")]
    NonInteriorFlip(VertexId, VertexId),
    #[error("Edge ({0:?}, {1:?}) references a vertex that is not in the mesh")]
    EdgeOutOfRange(VertexId, VertexId),
}

/// A parameter of the triangulation request cannot be handled.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedParameter {
    #[error("Position is not a number")]
    PositionIsNaN,
    #[error("Tolerance threshold is not a number")]
    ToleranceIsNaN,
    #[error("Scale must be finite and strictly positive")]
    ScaleIsNotPositive,
}

/// An error that can happen while generating geometry.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryBuilderError {
    #[error("Too many vertices")]
    TooManyVertices,
}

/// The triangulator's error enumeration.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum TriangulationError {
    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(#[from] UnsupportedParameter),
    #[error("Geometry builder error: {0}")]
    GeometryBuilder(#[from] GeometryBuilderError),
    #[error("Internal error: {0}")]
    Internal(#[from] InternalError),
}

#[test]
fn error_messages() {
    let err: TriangulationError = InternalError::NonInteriorFlip(VertexId(1), VertexId(4)).into();
    assert_eq!(
        err.to_string(),
        "Internal error: Edge (#1, #4) is not shared by two triangles"
    );

    let err: TriangulationError = UnsupportedParameter::ScaleIsNotPositive.into();
    assert_eq!(
        err,
        TriangulationError::UnsupportedParameter(UnsupportedParameter::ScaleIsNotPositive)
    );
}
