//! TopologyError: Unified error type for polygon-topology public APIs
//!
//! Construction, editing and checked indexing all report through this one
//! enum, so callers never see a partially built or half-edited topology.

use thiserror::Error;

/// Which indexed array an out-of-range access targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Vertex,
    Face,
    Edge,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Vertex => f.write_str("vertex"),
            ElementKind::Face => f.write_str("face"),
            ElementKind::Edge => f.write_str("edge"),
        }
    }
}

/// Unified error type for topology operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    // ----- build errors ---------------------------------------------------
    /// A face was declared with fewer corners than the builder accepts.
    #[error("Build error: face {face} has {sides} vertices, at least {min} required")]
    DegenerateFace { face: usize, sides: usize, min: usize },
    /// The same vertex appears twice in one face.
    #[error("Build error: face {face} lists vertex {vertex} more than once")]
    RepeatedFaceVertex { face: usize, vertex: usize },
    /// Two faces claim the same directed side, usually a winding mismatch.
    #[error("Build error: directed edge {from} -> {to} is claimed by faces {first} and {second}")]
    DuplicateEdge {
        from: usize,
        to: usize,
        first: usize,
        second: usize,
    },
    /// A vertex lists a neighbor that does not list it back.
    #[error("Build error: vertex {vertex} lists neighbor {neighbor}, which does not list it back")]
    UnmatchedNeighbor { vertex: usize, neighbor: usize },
    /// A vertex lists itself, or the same neighbor twice.
    #[error("Build error: vertex {vertex} has an invalid neighbor entry {neighbor}")]
    InvalidNeighbor { vertex: usize, neighbor: usize },
    /// A neighbor index points past the declared vertex range.
    #[error("Build error: vertex {vertex} references missing vertex {neighbor}")]
    MissingVertex { vertex: usize, neighbor: usize },
    /// A vertex index below the vertex count is used by no face.
    #[error("Build error: vertex {vertex} is not connected to any face")]
    DisconnectedVertex { vertex: usize },
    /// A vertex's edges do not form a single rotation cycle.
    #[error("Build error: vertex {vertex} is non-manifold ({reached} of {expected} edges reachable)")]
    NonManifoldVertex {
        vertex: usize,
        reached: usize,
        expected: usize,
    },
    /// A boundary vertex joins several open fans.
    #[error("Build error: vertex {vertex} is pinched between {fans} boundary fans")]
    PinchedVertex { vertex: usize, fans: usize },
    /// Tracing an external face over boundary half-edges never returned to
    /// its starting edge.
    #[error("Build error: boundary loop from edge {edge} does not close")]
    OpenBoundary { edge: usize },
    /// The number of traced faces differs from the declared count.
    #[error("Build error: expected {expected} faces, traced {found}")]
    FaceCountMismatch { expected: usize, found: usize },
    /// A vertex or face has more neighbors than a `u16` can hold.
    #[error("Build error: {kind} {index} has {count} neighbors, more than supported")]
    NeighborCountOverflow {
        kind: ElementKind,
        index: usize,
        count: usize,
    },
    /// An extend call referenced a face or vertex that was never added.
    #[error("Build error: {kind} {index} has not been declared")]
    UndeclaredElement { kind: ElementKind, index: usize },
    /// `extend_*_after` was given an anchor that is not in the element's list.
    #[error("Build error: {kind} {index} does not contain anchor {anchor}")]
    MissingAnchor {
        kind: ElementKind,
        index: usize,
        anchor: usize,
    },

    /// Grid generator dimensions that cannot form a valid topology.
    #[error("Build error: {columns}x{rows} grid is invalid: {reason}")]
    InvalidGrid {
        columns: usize,
        rows: usize,
        reason: &'static str,
    },

    // ----- runtime errors -------------------------------------------------
    /// An Euler operator's precondition does not hold; nothing was changed.
    #[error("Invalid operation: cannot {operation} edge {edge}: {reason}")]
    InvalidOperation {
        operation: &'static str,
        edge: usize,
        reason: &'static str,
    },
    /// The topology is not in a state that allows the request.
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
    /// Checked index access outside the array bounds.
    #[error("Index error: {kind} {index} out of range (len {len})")]
    OutOfRange {
        kind: ElementKind,
        index: usize,
        len: usize,
    },
    /// An attribute array does not match the topology it is used with.
    #[error("Attribute error: expected {expected} entries, found {found}")]
    AttributeLengthMismatch { expected: usize, found: usize },

    // ----- validation -----------------------------------------------------
    /// `twin(twin(e)) != e` or `twin(e) == e`.
    #[error("Topology error: edge {edge} has inconsistent twin {twin}")]
    BrokenTwin { edge: usize, twin: usize },
    /// A rotation cycle does not match its declared neighbor count.
    #[error("Topology error: {kind} {index} cycle has {found} edges, neighbor count is {expected}")]
    CycleLengthMismatch {
        kind: ElementKind,
        index: usize,
        expected: usize,
        found: usize,
    },
    /// An edge in a cycle does not point back to the element that owns it.
    #[error("Topology error: edge {edge} is in the cycle of {kind} {index} but belongs to {kind} {owner}")]
    CycleMembership {
        kind: ElementKind,
        index: usize,
        edge: usize,
        owner: usize,
    },
    /// `f_next(e)` is not the twin of the edge before `e` around its vertex.
    #[error("Topology error: edge {edge} has inconsistent vertex and face rotations")]
    RotationMismatch { edge: usize },
    /// An internal face has fewer sides than allowed.
    #[error("Topology error: face {face} has {sides} sides, at least {min} required")]
    UndersizedFace { face: usize, sides: usize, min: usize },
    /// Stored wrap flags disagree between an edge and its twin, or around a corner.
    #[error("Wrap error: edge {edge} has inconsistent wrap flags")]
    InconsistentWrap { edge: usize },
}

impl TopologyError {
    /// True for errors that can only be produced by a builder's `build()`.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            TopologyError::DegenerateFace { .. }
                | TopologyError::RepeatedFaceVertex { .. }
                | TopologyError::DuplicateEdge { .. }
                | TopologyError::UnmatchedNeighbor { .. }
                | TopologyError::InvalidNeighbor { .. }
                | TopologyError::MissingVertex { .. }
                | TopologyError::DisconnectedVertex { .. }
                | TopologyError::NonManifoldVertex { .. }
                | TopologyError::PinchedVertex { .. }
                | TopologyError::OpenBoundary { .. }
                | TopologyError::FaceCountMismatch { .. }
                | TopologyError::NeighborCountOverflow { .. }
                | TopologyError::UndeclaredElement { .. }
                | TopologyError::MissingAnchor { .. }
                | TopologyError::InvalidGrid { .. }
        )
    }
}
