//! Pivot operators.
//!
//! Naming used below, for an edge `e` with twin `ē`: `A`/`B` are its near and
//! far vertex, `L`/`R` its near and far face. A vertex pivot keeps `A` and
//! moves the far end from `B` to the neighbor vertex across `R` (forward) or
//! `L` (backward). A face pivot keeps the near face and moves the far face
//! the same way around the vertices.
//!
//! Wrap updates are composed through vertices only. Relations that reach an
//! external face carry no crossings: on a cylinder a rim face spans the seam
//! and has no single position to measure from.

use super::{Check, require};
use crate::topology::topology::Topology;
use crate::topology::wrap::{
    EdgeWrap, WrapRelation, chain, chain_face_to_vert_to_vert, chain_vert_to_vert_to_face,
    chain_vert_to_vert_to_vert,
};

const MAX_NEIGHBORS: usize = u16::MAX as usize;

euler_operator! {
    /// Move the far end of `edge` one vertex forward around its next face.
    ///
    /// The old far vertex and the next face each lose a neighbor; the new far
    /// vertex and the previous face gain one.
    "pivot vertex edge forward",
    can: can_pivot_vertex_edge_forward,
    apply: pivot_vertex_edge_forward,
    with_wrap: pivot_vertex_edge_forward_with_wrap,
    check: check_pivot_vertex_forward,
    raw: pivot_vertex_forward_raw,
}

euler_operator! {
    /// Move the far end of `edge` one vertex backward around its previous
    /// face. Inverse of [`Topology::pivot_vertex_edge_forward`].
    "pivot vertex edge backward",
    can: can_pivot_vertex_edge_backward,
    apply: pivot_vertex_edge_backward,
    with_wrap: pivot_vertex_edge_backward_with_wrap,
    check: check_pivot_vertex_backward,
    raw: pivot_vertex_backward_raw,
}

euler_operator! {
    /// Move the far face of `edge` one face forward around its far vertex.
    "pivot face edge forward",
    can: can_pivot_face_edge_forward,
    apply: pivot_face_edge_forward,
    with_wrap: pivot_face_edge_forward_with_wrap,
    check: check_pivot_face_forward,
    raw: pivot_face_forward_raw,
}

euler_operator! {
    /// Move the far face of `edge` one face backward around its near vertex.
    /// Inverse of [`Topology::pivot_face_edge_forward`].
    "pivot face edge backward",
    can: can_pivot_face_edge_backward,
    apply: pivot_face_edge_backward,
    with_wrap: pivot_face_edge_backward_with_wrap,
    check: check_pivot_face_backward,
    raw: pivot_face_backward_raw,
}

impl Topology {
    #[inline]
    fn has_vertex_room(&self, vertex: usize) -> bool {
        self.vertex_neighbor_count(vertex) < MAX_NEIGHBORS
    }

    #[inline]
    fn has_face_room(&self, face: usize) -> bool {
        self.face_neighbor_count(face) < MAX_NEIGHBORS
    }

    /// Writes `value` on `edge` and its reverse on the twin, after the links
    /// of `edge` are final. Regions reaching an external face are cleared.
    #[inline]
    pub(crate) fn store_wrap_pair(&self, wraps: &mut [EdgeWrap], edge: usize, value: EdgeWrap) {
        let value = self.without_external_regions(edge, value);
        wraps[edge] = value;
        wraps[self.twin(edge)] = value.reversed();
    }

    fn without_external_regions(&self, edge: usize, mut value: EdgeWrap) -> EdgeWrap {
        let empty = EdgeWrap::empty();
        if !self.is_internal_face(self.far_face(edge)) {
            value = value
                .with_region(WrapRelation::VertToFace, empty)
                .with_region(WrapRelation::FaceToFace, empty);
        }
        if !self.is_internal_face(self.near_face(edge)) {
            value = value
                .with_region(WrapRelation::FaceToVert, empty)
                .with_region(WrapRelation::FaceToFace, empty);
        }
        value
    }

    pub(crate) fn check_pivot_vertex_forward(&self, e: usize) -> Check {
        self.check_distinct_sides(e)?;
        let p = self.v_prev(self.twin(e));
        require(
            self.vertex_neighbor_count(self.far_vertex(e)) > 3,
            "far vertex would drop below 3 neighbors",
        )?;
        require(
            self.face_neighbor_count(self.far_face(e)) > 3,
            "next face would drop below 3 sides",
        )?;
        require(self.far_vertex(p) != self.near_vertex(e), "new far vertex is the near vertex")?;
        require(self.near_face(p) != self.near_face(e), "pivot would fold onto the previous face")?;
        require(
            self.has_vertex_room(self.far_vertex(p)) && self.has_face_room(self.near_face(e)),
            "neighbor count limit reached",
        )
    }

    pub(crate) fn check_pivot_vertex_backward(&self, e: usize) -> Check {
        self.check_distinct_sides(e)?;
        let s = self.v_next(self.twin(e));
        require(
            self.vertex_neighbor_count(self.far_vertex(e)) > 3,
            "far vertex would drop below 3 neighbors",
        )?;
        require(
            self.face_neighbor_count(self.near_face(e)) > 3,
            "previous face would drop below 3 sides",
        )?;
        require(self.far_vertex(s) != self.near_vertex(e), "new far vertex is the near vertex")?;
        require(self.far_face(s) != self.far_face(e), "pivot would fold onto the next face")?;
        require(
            self.has_vertex_room(self.far_vertex(s)) && self.has_face_room(self.far_face(e)),
            "neighbor count limit reached",
        )
    }

    pub(crate) fn check_pivot_face_forward(&self, e: usize) -> Check {
        self.check_distinct_sides(e)?;
        let p = self.f_next(self.twin(e));
        require(
            self.face_neighbor_count(self.far_face(e)) > 3,
            "far face would drop below 3 sides",
        )?;
        require(
            self.vertex_neighbor_count(self.far_vertex(e)) > 3,
            "far vertex would drop below 3 neighbors",
        )?;
        require(self.far_face(p) != self.near_face(e), "new far face is the near face")?;
        require(self.near_vertex(p) != self.near_vertex(e), "pivot would fold onto the near vertex")?;
        require(
            self.has_face_room(self.far_face(p)) && self.has_vertex_room(self.near_vertex(e)),
            "neighbor count limit reached",
        )
    }

    pub(crate) fn check_pivot_face_backward(&self, e: usize) -> Check {
        self.check_distinct_sides(e)?;
        let s = self.f_prev(self.twin(e));
        require(
            self.face_neighbor_count(self.far_face(e)) > 3,
            "far face would drop below 3 sides",
        )?;
        require(
            self.vertex_neighbor_count(self.near_vertex(e)) > 3,
            "near vertex would drop below 3 neighbors",
        )?;
        require(self.far_face(s) != self.near_face(e), "new far face is the near face")?;
        require(self.far_vertex(s) != self.far_vertex(e), "pivot would fold onto the far vertex")?;
        require(
            self.has_face_room(self.far_face(s)) && self.has_vertex_room(self.far_vertex(e)),
            "neighbor count limit reached",
        )
    }

    /// `p` is the edge before `ē` around `B`; its far vertex `C` becomes the
    /// new far vertex of `e`.
    pub(crate) fn pivot_vertex_forward_raw(&mut self, e: usize, wraps: Option<&mut [EdgeWrap]>) {
        let twin = self.twin(e);
        let p = self.v_prev(twin);
        let p_twin = self.twin(p);
        let q = self.v_prev(p_twin);
        let q_twin = self.twin(q);
        let s = self.v_next(twin);
        let old_far = self.far_vertex(e);
        let new_far = self.far_vertex(p);
        let shrinking = self.far_face(e);
        let growing = self.far_face(twin);

        let wraps = wraps.map(|wraps| {
            let (we, wp) = (wraps[e], wraps[p]);
            let back = we.reversed();
            let new_e = we
                .with_region(WrapRelation::VertToVert, chain_vert_to_vert_to_vert(we, wp))
                .with_region(WrapRelation::FaceToVert, chain_face_to_vert_to_vert(we, wp));
            // near face of p -> C -> B -> L
            let to_b = chain_face_to_vert_to_vert(wp, wp.reversed());
            let new_p = wp.with_region(WrapRelation::VertToFace, back).with_region(
                WrapRelation::FaceToFace,
                chain(
                    to_b,
                    WrapRelation::FaceToVert,
                    back,
                    WrapRelation::VertToFace,
                    WrapRelation::FaceToFace,
                ),
            );
            (wraps, new_e, new_p)
        });

        self.set_v_next(p, s);
        self.set_v_next(q, twin);
        self.set_v_next(twin, p_twin);
        self.set_f_next(s, p_twin);
        self.set_f_next(twin, q_twin);
        self.set_f_next(p_twin, e);
        self.set_far_vertex(e, new_far);
        self.set_far_face(p, growing);

        self.shift_vertex_neighbor(old_far, new_far);
        self.shift_face_neighbor(shrinking, growing);
        self.reanchor_vertex(old_far, twin, s);
        self.reanchor_face(shrinking, p_twin, twin);

        if let Some((wraps, new_e, new_p)) = wraps {
            self.store_wrap_pair(wraps, e, new_e);
            self.store_wrap_pair(wraps, p, new_p);
        }
    }

    /// `s` is the edge after `ē` around `B`; its far vertex `C` becomes the
    /// new far vertex of `e`.
    pub(crate) fn pivot_vertex_backward_raw(&mut self, e: usize, wraps: Option<&mut [EdgeWrap]>) {
        let twin = self.twin(e);
        let s = self.v_next(twin);
        let s_twin = self.twin(s);
        let t = self.v_next(s_twin);
        let p = self.v_prev(twin);
        let p_twin = self.twin(p);
        let old_far = self.far_vertex(e);
        let new_far = self.far_vertex(s);
        let growing = self.far_face(e);
        let shrinking = self.far_face(twin);

        let wraps = wraps.map(|wraps| {
            let (we, ws) = (wraps[e], wraps[s]);
            let new_e = we
                .with_region(WrapRelation::VertToVert, chain_vert_to_vert_to_vert(we, ws))
                .with_region(WrapRelation::FaceToVert, chain_face_to_vert_to_vert(we, ws));
            // R -> A -> B, then on to the far elements of s
            let to_b = chain_face_to_vert_to_vert(we.reversed(), we);
            let new_s = ws
                .with_region(WrapRelation::FaceToVert, chain_face_to_vert_to_vert(to_b, ws))
                .with_region(
                    WrapRelation::FaceToFace,
                    chain(
                        to_b,
                        WrapRelation::FaceToVert,
                        ws,
                        WrapRelation::VertToFace,
                        WrapRelation::FaceToFace,
                    ),
                );
            (wraps, new_e, new_s)
        });

        self.set_v_next(p, s);
        self.set_v_next(s_twin, twin);
        self.set_v_next(twin, t);
        self.set_f_next(s, p_twin);
        self.set_f_next(twin, s);
        self.set_f_next(t, e);
        self.set_far_vertex(e, new_far);
        self.set_far_face(s_twin, growing);

        self.shift_vertex_neighbor(old_far, new_far);
        self.shift_face_neighbor(shrinking, growing);
        self.reanchor_vertex(old_far, twin, s);
        self.reanchor_face(shrinking, s, e);

        if let Some((wraps, new_e, new_s)) = wraps {
            self.store_wrap_pair(wraps, e, new_e);
            self.store_wrap_pair(wraps, s, new_s);
        }
    }

    /// `p` is the edge after `ē` around `L`; its far face becomes the new far
    /// face of `e`.
    pub(crate) fn pivot_face_forward_raw(&mut self, e: usize, wraps: Option<&mut [EdgeWrap]>) {
        let twin = self.twin(e);
        let p = self.f_next(twin);
        let p_twin = self.twin(p);
        let q = self.f_next(p_twin);
        let q_twin = self.twin(q);
        let s = self.f_prev(twin);
        let old_face = self.far_face(e);
        let new_face = self.far_face(p);
        let far = self.far_vertex(e);
        let near = self.far_vertex(twin);

        let wraps = wraps.map(|wraps| {
            let (we, wp) = (wraps[e], wraps[p]);
            let back = we.reversed();
            // B -> near vertex of p -> new far face
            let from_b = chain_vert_to_vert_to_face(wp.reversed(), wp);
            let new_e = we
                .with_region(WrapRelation::VertToFace, chain_vert_to_vert_to_face(we, from_b))
                .with_region(
                    WrapRelation::FaceToFace,
                    chain(
                        we,
                        WrapRelation::FaceToVert,
                        from_b,
                        WrapRelation::VertToFace,
                        WrapRelation::FaceToFace,
                    ),
                );
            let new_p = wp
                .with_region(WrapRelation::FaceToVert, back)
                .with_region(WrapRelation::VertToVert, chain_vert_to_vert_to_vert(wp, back));
            (wraps, new_e, new_p)
        });

        self.set_f_next(s, p);
        self.set_f_next(twin, q);
        self.set_f_next(p_twin, twin);
        self.set_v_next(p_twin, s);
        self.set_v_next(q_twin, twin);
        self.set_v_next(e, p_twin);
        self.set_far_face(e, new_face);
        self.set_far_vertex(p, near);

        self.shift_face_neighbor(old_face, new_face);
        self.shift_vertex_neighbor(far, near);
        self.reanchor_face(old_face, twin, s);
        self.reanchor_vertex(far, p_twin, twin);

        if let Some((wraps, new_e, new_p)) = wraps {
            self.store_wrap_pair(wraps, e, new_e);
            self.store_wrap_pair(wraps, p, new_p);
        }
    }

    /// `s` is the edge before `ē` around `L`; its far face becomes the new
    /// far face of `e`.
    pub(crate) fn pivot_face_backward_raw(&mut self, e: usize, wraps: Option<&mut [EdgeWrap]>) {
        let twin = self.twin(e);
        let s = self.f_prev(twin);
        let s_twin = self.twin(s);
        let t = self.f_prev(s_twin);
        let p = self.f_next(twin);
        let p_twin = self.twin(p);
        let old_face = self.far_face(e);
        let new_face = self.far_face(s);
        let far = self.far_vertex(e);
        let near = self.far_vertex(twin);

        let wraps = wraps.map(|wraps| {
            let (we, ws) = (wraps[e], wraps[s]);
            let back = we.reversed();
            // L -> B -> A, then across s
            let to_a = chain_face_to_vert_to_vert(we, back);
            let new_e = we.with_region(WrapRelation::VertToFace, ws).with_region(
                WrapRelation::FaceToFace,
                chain(
                    to_a,
                    WrapRelation::FaceToVert,
                    ws,
                    WrapRelation::VertToFace,
                    WrapRelation::FaceToFace,
                ),
            );
            let new_s = ws
                .with_region(WrapRelation::VertToVert, chain_vert_to_vert_to_vert(back, ws))
                .with_region(WrapRelation::VertToFace, chain_vert_to_vert_to_face(back, ws));
            (wraps, new_e, new_s)
        });

        self.set_f_next(s, p);
        self.set_f_next(twin, s_twin);
        self.set_f_next(t, twin);
        self.set_v_next(p_twin, s);
        self.set_v_next(s, twin);
        self.set_v_next(e, t);
        self.set_far_face(e, new_face);
        self.set_far_vertex(s_twin, far);

        self.shift_face_neighbor(old_face, new_face);
        self.shift_vertex_neighbor(near, far);
        self.reanchor_face(old_face, twin, s);
        self.reanchor_vertex(near, s, e);

        if let Some((wraps, new_e, new_s)) = wraps {
            self.store_wrap_pair(wraps, e, new_e);
            self.store_wrap_pair(wraps, s, new_s);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::algs::euler::PivotKind;
    use crate::algs::meshgen::{self, GridWrap};
    use crate::mesh_error::TopologyError;
    use crate::topology::validation::validate_wrap;
    use crate::topology::wrap::WrapRelation;

    #[test]
    fn vertex_pivot_moves_far_end_and_counts() {
        let (mut t, _) = meshgen::quad_grid(6, 5, GridWrap::BOTH).unwrap();
        let e = t.find_vertex_edge(7, 8).unwrap().index();
        let (near, far) = (t.near_vertex(e), t.far_vertex(e));
        let (left, right) = (t.near_face(e), t.far_face(e));
        let target = t.far_vertex(t.v_prev(t.twin(e)));
        assert!(t.can_pivot_vertex_edge_forward(e));
        t.pivot_vertex_edge_forward(e).unwrap();

        assert_eq!(t.near_vertex(e), near);
        assert_eq!(t.far_vertex(e), target);
        assert_eq!(t.vertex_neighbor_count(near), 4);
        assert_eq!(t.vertex_neighbor_count(far), 3);
        assert_eq!(t.vertex_neighbor_count(target), 5);
        assert_eq!(t.face_neighbor_count(right), 3);
        assert_eq!(t.face_neighbor_count(left), 5);
        assert_eq!(t.euler_characteristic(), 0);
    }

    #[test]
    fn grid_pivot_preconditions() {
        let (t, _) = meshgen::quad_grid(2, 2, GridWrap::NONE).unwrap();
        let inward = t.find_vertex_edge(1, 4).unwrap().index();
        let outward = t.find_vertex_edge(4, 1).unwrap().index();
        assert!(t.can_pivot_vertex_edge_forward(inward));
        assert!(t.can_pivot_vertex_edge_backward(inward));
        assert!(t.can_pivot_face_edge_forward(inward));
        assert!(!t.can_pivot_face_edge_backward(inward));

        assert!(!t.can_pivot_vertex_edge_forward(outward));
        assert!(!t.can_pivot_vertex_edge_backward(outward));
        assert!(!t.can_pivot_face_edge_forward(outward));
        assert!(t.can_pivot_face_edge_backward(outward));
    }

    #[test]
    fn pivots_refuse_to_shrink_small_elements() {
        let mut t = meshgen::tetrahedron().unwrap();
        let before = t.clone();
        for e in 0..t.edge_count() {
            assert!(!t.can_pivot_vertex_edge_forward(e));
            assert!(!t.can_pivot_face_edge_backward(e));
            let err = t.pivot_vertex_edge_forward(e).unwrap_err();
            assert!(matches!(
                err,
                TopologyError::InvalidOperation {
                    operation: "pivot vertex edge forward",
                    ..
                }
            ));
        }
        assert_eq!(t, before);
    }

    #[test]
    fn out_of_range_edge_is_reported() {
        let mut t = meshgen::cube().unwrap();
        assert!(!t.can_pivot_face_edge_forward(99));
        assert!(matches!(
            t.pivot_face_edge_forward(99),
            Err(TopologyError::OutOfRange { index: 99, .. })
        ));
    }

    #[test]
    fn backward_pivot_undoes_forward_pivot() {
        let (mut t, _) = meshgen::quad_grid(6, 5, GridWrap::BOTH).unwrap();
        let original = t.edge_records().to_vec();
        let mut undone = 0;
        for e in 0..t.edge_count() {
            if !t.can_pivot_vertex_edge_forward(e) {
                continue;
            }
            t.pivot_vertex_edge_forward(e).unwrap();
            assert!(t.can_pivot_vertex_edge_backward(e));
            t.pivot_vertex_edge_backward(e).unwrap();
            assert_eq!(t.edge_records(), &original[..]);

            if t.can_pivot_face_edge_forward(e) {
                t.pivot_face_edge_forward(e).unwrap();
                t.pivot_face_edge_backward(e).unwrap();
                assert_eq!(t.edge_records(), &original[..]);
            }
            undone += 1;
        }
        assert!(undone > 0);
    }

    #[test]
    fn pivots_keep_wrap_flags_consistent() {
        let (mut t, mut wraps) = meshgen::quad_grid(10, 10, GridWrap::BOTH).unwrap();
        let mut applied = 0;
        for e in (0..t.edge_count()).step_by(7) {
            for kind in PivotKind::ALL {
                if t.can_pivot(kind, e) {
                    t.pivot_with_wrap(kind, e, &mut wraps).unwrap();
                    applied += 1;
                    break;
                }
            }
        }
        assert!(applied > 10);
        validate_wrap(&t, &wraps).unwrap();
    }

    #[test]
    fn wrap_length_is_checked_before_mutating() {
        let (mut t, wraps) = meshgen::quad_grid(4, 4, GridWrap::BOTH).unwrap();
        let before = t.clone();
        let mut short = crate::topology::attributes::EdgeAttribute::from_vec(
            wraps.as_slice()[1..].to_vec(),
        );
        let e = (0..t.edge_count())
            .find(|&e| t.can_pivot_vertex_edge_forward(e))
            .unwrap();
        assert!(matches!(
            t.pivot_vertex_edge_forward_with_wrap(e, &mut short),
            Err(TopologyError::AttributeLengthMismatch { .. })
        ));
        assert_eq!(t, before);
    }

    #[test]
    fn every_pivot_on_a_cylinder_keeps_wraps() {
        for wrap in [GridWrap::AXIS0, GridWrap::AXIS1] {
            let (cylinder, flags) = meshgen::quad_grid(10, 10, wrap).unwrap();
            let mut applied = 0;
            for kind in PivotKind::ALL {
                for e in 0..cylinder.edge_count() {
                    if !cylinder.can_pivot(kind, e) {
                        continue;
                    }
                    let (mut t, mut wraps) = (cylinder.clone(), flags.clone());
                    t.pivot_with_wrap(kind, e, &mut wraps).unwrap();
                    if let Err(err) = validate_wrap(&t, &wraps) {
                        panic!("{kind:?} on edge {e} of {wrap:?}: {err}");
                    }
                    t.pivot_with_wrap(kind.inverse(), e, &mut wraps).unwrap();
                    assert_eq!(t.edge_records(), cylinder.edge_records());
                    assert_eq!(wraps, flags, "{kind:?} on edge {e} of {wrap:?}");
                    applied += 1;
                }
            }
            assert!(applied > 100);
        }
    }

    #[test]
    fn stored_wraps_never_reach_external_faces() {
        let (mut t, mut wraps) = meshgen::quad_grid(10, 10, GridWrap::AXIS0).unwrap();
        for e in (0..t.edge_count()).step_by(3) {
            if let Some(kind) = PivotKind::ALL.into_iter().find(|&k| t.can_pivot(k, e)) {
                t.pivot_with_wrap(kind, e, &mut wraps).unwrap();
            }
        }
        for e in 0..t.edge_count() {
            if !t.is_internal_face(t.far_face(e)) {
                assert_eq!(wraps[e].region(WrapRelation::VertToFace), 0);
                assert_eq!(wraps[e].region(WrapRelation::FaceToFace), 0);
            }
        }
        validate_wrap(&t, &wraps).unwrap();
    }
}
