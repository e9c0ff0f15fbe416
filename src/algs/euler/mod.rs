//! Local edit operators that rewire a valid topology in place.
//!
//! A *pivot* moves one end of a half-edge pair one step around an adjacent
//! face (vertex pivot) or vertex (face pivot). A *spin* pivots both ends,
//! the polygon generalization of an edge flip.
//!
//! Every operator is check-then-act: the matching `can_*` predicate is
//! evaluated first and a failed check returns
//! [`TopologyError::InvalidOperation`](crate::mesh_error::TopologyError)
//! with the topology untouched. Each operator rewrites a fixed handful of
//! records, independent of mesh size.
//!
//! The `*_with_wrap` variants also keep a caller-owned
//! [`EdgeAttribute<EdgeWrap>`](crate::topology::attributes::EdgeAttribute)
//! consistent with the new connectivity.

/// Generates the public `can_*`, checked and `*_with_wrap` entry points for
/// one operator from its precondition and its raw rewiring routine.
macro_rules! euler_operator {
    (
        $(#[$doc:meta])*
        $label:literal,
        can: $can:ident,
        apply: $apply:ident,
        with_wrap: $with_wrap:ident,
        check: $check:ident,
        raw: $raw:ident $(,)?
    ) => {
        impl $crate::topology::topology::Topology {
            /// Whether the operator below would succeed on `edge`.
            pub fn $can(&self, edge: usize) -> bool {
                edge < self.edge_count() && self.$check(edge).is_ok()
            }

            $(#[$doc])*
            pub fn $apply(&mut self, edge: usize) -> Result<(), $crate::mesh_error::TopologyError> {
                self.check_operation($label, edge, |t| t.$check(edge), None)?;
                self.$raw(edge, None);
                log::trace!(concat!($label, ": edge {}"), edge);
                $crate::debug_invariants::DebugInvariants::debug_assert_invariants_after(&*self, $label);
                Ok(())
            }

            /// Same as the plain operator, also recomposing `wraps`.
            pub fn $with_wrap(
                &mut self,
                edge: usize,
                wraps: &mut $crate::topology::attributes::EdgeAttribute<$crate::topology::wrap::EdgeWrap>,
            ) -> Result<(), $crate::mesh_error::TopologyError> {
                self.check_operation($label, edge, |t| t.$check(edge), Some(wraps.as_slice()))?;
                self.$raw(edge, Some(wraps.as_mut_slice()));
                log::trace!(concat!($label, " with wrap: edge {}"), edge);
                $crate::debug_invariants::DebugInvariants::debug_assert_invariants_after(&*self, $label);
                Ok(())
            }
        }
    };
}

mod pivot;
mod spin;

use crate::mesh_error::TopologyError;
use crate::topology::attributes::EdgeAttribute;
use crate::topology::topology::Topology;
use crate::topology::wrap::EdgeWrap;

/// Which pivot to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PivotKind {
    VertexForward,
    VertexBackward,
    FaceForward,
    FaceBackward,
}

/// Which spin to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpinKind {
    VertexForward,
    VertexBackward,
    FaceForward,
    FaceBackward,
}

impl PivotKind {
    pub const ALL: [PivotKind; 4] = [
        PivotKind::VertexForward,
        PivotKind::VertexBackward,
        PivotKind::FaceForward,
        PivotKind::FaceBackward,
    ];

    /// The pivot that undoes this one when applied to the same edge.
    pub fn inverse(self) -> Self {
        match self {
            PivotKind::VertexForward => PivotKind::VertexBackward,
            PivotKind::VertexBackward => PivotKind::VertexForward,
            PivotKind::FaceForward => PivotKind::FaceBackward,
            PivotKind::FaceBackward => PivotKind::FaceForward,
        }
    }
}

impl SpinKind {
    pub const ALL: [SpinKind; 4] = [
        SpinKind::VertexForward,
        SpinKind::VertexBackward,
        SpinKind::FaceForward,
        SpinKind::FaceBackward,
    ];

    /// The spin that undoes this one when applied to the same edge.
    pub fn inverse(self) -> Self {
        match self {
            SpinKind::VertexForward => SpinKind::VertexBackward,
            SpinKind::VertexBackward => SpinKind::VertexForward,
            SpinKind::FaceForward => SpinKind::FaceBackward,
            SpinKind::FaceBackward => SpinKind::FaceForward,
        }
    }
}

/// Result of a precondition check: `Err` carries the reason it failed.
pub(crate) type Check = Result<(), &'static str>;

#[inline]
pub(crate) fn require(condition: bool, reason: &'static str) -> Check {
    if condition { Ok(()) } else { Err(reason) }
}

impl Topology {
    /// Whether `pivot(kind, edge)` would succeed.
    pub fn can_pivot(&self, kind: PivotKind, edge: usize) -> bool {
        match kind {
            PivotKind::VertexForward => self.can_pivot_vertex_edge_forward(edge),
            PivotKind::VertexBackward => self.can_pivot_vertex_edge_backward(edge),
            PivotKind::FaceForward => self.can_pivot_face_edge_forward(edge),
            PivotKind::FaceBackward => self.can_pivot_face_edge_backward(edge),
        }
    }

    pub fn pivot(&mut self, kind: PivotKind, edge: usize) -> Result<(), TopologyError> {
        match kind {
            PivotKind::VertexForward => self.pivot_vertex_edge_forward(edge),
            PivotKind::VertexBackward => self.pivot_vertex_edge_backward(edge),
            PivotKind::FaceForward => self.pivot_face_edge_forward(edge),
            PivotKind::FaceBackward => self.pivot_face_edge_backward(edge),
        }
    }

    pub fn pivot_with_wrap(
        &mut self,
        kind: PivotKind,
        edge: usize,
        wraps: &mut EdgeAttribute<EdgeWrap>,
    ) -> Result<(), TopologyError> {
        match kind {
            PivotKind::VertexForward => self.pivot_vertex_edge_forward_with_wrap(edge, wraps),
            PivotKind::VertexBackward => self.pivot_vertex_edge_backward_with_wrap(edge, wraps),
            PivotKind::FaceForward => self.pivot_face_edge_forward_with_wrap(edge, wraps),
            PivotKind::FaceBackward => self.pivot_face_edge_backward_with_wrap(edge, wraps),
        }
    }

    /// Whether `spin(kind, edge)` would succeed.
    pub fn can_spin(&self, kind: SpinKind, edge: usize) -> bool {
        match kind {
            SpinKind::VertexForward => self.can_spin_vertex_edge_forward(edge),
            SpinKind::VertexBackward => self.can_spin_vertex_edge_backward(edge),
            SpinKind::FaceForward => self.can_spin_face_edge_forward(edge),
            SpinKind::FaceBackward => self.can_spin_face_edge_backward(edge),
        }
    }

    pub fn spin(&mut self, kind: SpinKind, edge: usize) -> Result<(), TopologyError> {
        match kind {
            SpinKind::VertexForward => self.spin_vertex_edge_forward(edge),
            SpinKind::VertexBackward => self.spin_vertex_edge_backward(edge),
            SpinKind::FaceForward => self.spin_face_edge_forward(edge),
            SpinKind::FaceBackward => self.spin_face_edge_backward(edge),
        }
    }

    pub fn spin_with_wrap(
        &mut self,
        kind: SpinKind,
        edge: usize,
        wraps: &mut EdgeAttribute<EdgeWrap>,
    ) -> Result<(), TopologyError> {
        match kind {
            SpinKind::VertexForward => self.spin_vertex_edge_forward_with_wrap(edge, wraps),
            SpinKind::VertexBackward => self.spin_vertex_edge_backward_with_wrap(edge, wraps),
            SpinKind::FaceForward => self.spin_face_edge_forward_with_wrap(edge, wraps),
            SpinKind::FaceBackward => self.spin_face_edge_backward_with_wrap(edge, wraps),
        }
    }

    /// Neither end of the edge pair may coincide: no loops, no edge with the
    /// same face on both sides.
    pub(crate) fn check_distinct_sides(&self, edge: usize) -> Check {
        require(
            self.near_vertex(edge) != self.far_vertex(edge),
            "edge is a loop on a single vertex",
        )?;
        require(
            self.near_face(edge) != self.far_face(edge),
            "edge has the same face on both sides",
        )
    }

    /// Shared entry for every operator: range check, precondition, wrap size.
    pub(crate) fn check_operation(
        &self,
        operation: &'static str,
        edge: usize,
        check: impl FnOnce(&Self) -> Check,
        wraps: Option<&[EdgeWrap]>,
    ) -> Result<(), TopologyError> {
        self.check_index(crate::mesh_error::ElementKind::Edge, edge)?;
        if let Some(wraps) = wraps {
            if wraps.len() != self.edge_count() {
                return Err(TopologyError::AttributeLengthMismatch {
                    expected: self.edge_count(),
                    found: wraps.len(),
                });
            }
        }
        check(self).map_err(|reason| TopologyError::InvalidOperation {
            operation,
            edge,
            reason,
        })
    }
}
