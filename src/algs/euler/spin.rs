//! Spin operators: both ends of an edge pivot in the same rotational sense.
//!
//! On a triangulation a vertex spin is the classic edge flip. On polygon
//! meshes it rotates the edge one step inside the union of its two faces
//! (vertex spin) or around the union of its two vertices (face spin).

use super::{Check, require};
use crate::topology::topology::Topology;
use crate::topology::wrap::EdgeWrap;

euler_operator! {
    /// Rotate `edge` forward inside the two faces it separates.
    ///
    /// Both endpoints lose a neighbor and the two vertices the edge moves to
    /// gain one. Face sizes are unchanged.
    "spin vertex edge forward",
    can: can_spin_vertex_edge_forward,
    apply: spin_vertex_edge_forward,
    with_wrap: spin_vertex_edge_forward_with_wrap,
    check: check_spin_vertex_forward,
    raw: spin_vertex_forward_raw,
}

euler_operator! {
    /// Inverse of [`Topology::spin_vertex_edge_forward`].
    "spin vertex edge backward",
    can: can_spin_vertex_edge_backward,
    apply: spin_vertex_edge_backward,
    with_wrap: spin_vertex_edge_backward_with_wrap,
    check: check_spin_vertex_backward,
    raw: spin_vertex_backward_raw,
}

euler_operator! {
    /// Rotate `edge` forward around the two vertices it joins, so that it
    /// separates a different pair of faces.
    ///
    /// Both adjacent faces lose a side, vertex degrees are unchanged.
    "spin face edge forward",
    can: can_spin_face_edge_forward,
    apply: spin_face_edge_forward,
    with_wrap: spin_face_edge_forward_with_wrap,
    check: check_spin_face_forward,
    raw: spin_face_forward_raw,
}

euler_operator! {
    /// Inverse of [`Topology::spin_face_edge_forward`].
    "spin face edge backward",
    can: can_spin_face_edge_backward,
    apply: spin_face_edge_backward,
    with_wrap: spin_face_edge_backward_with_wrap,
    check: check_spin_face_backward,
    raw: spin_face_backward_raw,
}

impl Topology {
    fn check_spin_vertex_degrees(&self, e: usize) -> Check {
        self.check_distinct_sides(e)?;
        require(
            self.vertex_neighbor_count(self.near_vertex(e)) > 3
                && self.vertex_neighbor_count(self.far_vertex(e)) > 3,
            "an endpoint would drop below 3 neighbors",
        )
    }

    fn check_spin_face_sides(&self, e: usize) -> Check {
        self.check_distinct_sides(e)?;
        require(
            self.face_neighbor_count(self.near_face(e)) > 3
                && self.face_neighbor_count(self.far_face(e)) > 3,
            "an adjacent face would drop below 3 sides",
        )
    }

    pub(crate) fn check_spin_vertex_forward(&self, e: usize) -> Check {
        self.check_spin_vertex_degrees(e)?;
        let p = self.v_prev(self.twin(e));
        let p2 = self.v_prev(e);
        let (c, d) = (self.far_vertex(p), self.far_vertex(p2));
        require(c != self.near_vertex(e), "new far vertex is the near vertex")?;
        require(self.near_face(p) != self.near_face(e), "spin would fold onto the previous face")?;
        require(d != c, "both ends would land on the same vertex")?;
        require(self.near_face(p2) != self.far_face(e), "spin would fold onto the next face")
    }

    pub(crate) fn check_spin_vertex_backward(&self, e: usize) -> Check {
        self.check_spin_vertex_degrees(e)?;
        let s = self.v_next(self.twin(e));
        let s2 = self.v_next(e);
        let (c, d) = (self.far_vertex(s), self.far_vertex(s2));
        require(c != self.near_vertex(e), "new far vertex is the near vertex")?;
        require(self.far_face(s) != self.far_face(e), "spin would fold onto the next face")?;
        require(d != c, "both ends would land on the same vertex")?;
        require(self.far_face(s2) != self.near_face(e), "spin would fold onto the previous face")
    }

    pub(crate) fn check_spin_face_forward(&self, e: usize) -> Check {
        self.check_spin_face_sides(e)?;
        let p = self.f_next(self.twin(e));
        let p2 = self.f_next(e);
        let (c, d) = (self.far_face(p), self.far_face(p2));
        require(c != self.near_face(e), "new far face is the near face")?;
        require(self.near_vertex(p) != self.near_vertex(e), "spin would fold onto the near vertex")?;
        require(d != c, "both sides would land on the same face")?;
        require(self.near_vertex(p2) != self.far_vertex(e), "spin would fold onto the far vertex")
    }

    pub(crate) fn check_spin_face_backward(&self, e: usize) -> Check {
        self.check_spin_face_sides(e)?;
        let s = self.f_prev(self.twin(e));
        let s2 = self.f_prev(e);
        let (c, d) = (self.far_face(s), self.far_face(s2));
        require(c != self.near_face(e), "new far face is the near face")?;
        require(self.far_vertex(s) != self.far_vertex(e), "spin would fold onto the far vertex")?;
        require(d != c, "both sides would land on the same face")?;
        require(self.far_vertex(s2) != self.near_vertex(e), "spin would fold onto the near vertex")
    }

    pub(crate) fn spin_vertex_forward_raw(&mut self, e: usize, mut wraps: Option<&mut [EdgeWrap]>) {
        let twin = self.twin(e);
        self.pivot_vertex_forward_raw(e, wraps.as_deref_mut());
        self.pivot_vertex_forward_raw(twin, wraps);
    }

    pub(crate) fn spin_vertex_backward_raw(&mut self, e: usize, mut wraps: Option<&mut [EdgeWrap]>) {
        let twin = self.twin(e);
        self.pivot_vertex_backward_raw(e, wraps.as_deref_mut());
        self.pivot_vertex_backward_raw(twin, wraps);
    }

    pub(crate) fn spin_face_forward_raw(&mut self, e: usize, mut wraps: Option<&mut [EdgeWrap]>) {
        let twin = self.twin(e);
        self.pivot_face_forward_raw(e, wraps.as_deref_mut());
        self.pivot_face_forward_raw(twin, wraps);
    }

    pub(crate) fn spin_face_backward_raw(&mut self, e: usize, mut wraps: Option<&mut [EdgeWrap]>) {
        let twin = self.twin(e);
        self.pivot_face_backward_raw(e, wraps.as_deref_mut());
        self.pivot_face_backward_raw(twin, wraps);
    }
}
