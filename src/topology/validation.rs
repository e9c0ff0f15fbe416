//! Topology validation helpers.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::{ElementKind, TopologyError};
use crate::topology::attributes::EdgeAttribute;
use crate::topology::topology::Topology;
use crate::topology::wrap::{EdgeWrap, WrapRelation, chain_face_to_face_to_vert, chain_face_to_vert_to_vert};

/// Optional validation toggles for half-edge topology checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyValidationOptions {
    /// Ensure `twin(twin(e)) == e` and `twin(e) != e`.
    pub check_twins: bool,
    /// Walk every vertex and face rotation and check its length and members.
    pub check_cycles: bool,
    /// Ensure the internal/external face split is consistent.
    pub check_faces_partitioned: bool,
    /// Minimum number of sides of an internal face; `0` disables the check.
    pub min_face_sides: usize,
}

impl TopologyValidationOptions {
    /// Enable all topology validation checks.
    pub fn all() -> Self {
        Self {
            check_twins: true,
            check_cycles: true,
            check_faces_partitioned: true,
            min_face_sides: 3,
        }
    }

    /// Every link check, without a lower bound on face size.
    ///
    /// Duals of vertices with two neighbors are two-sided faces, which are
    /// structurally sound.
    pub fn structural() -> Self {
        Self {
            min_face_sides: 0,
            ..Self::all()
        }
    }
}

impl Default for TopologyValidationOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Validate the link structure of `topology`.
///
/// Index ranges are always checked; the remaining checks follow `options`.
pub fn validate_topology(
    topology: &Topology,
    options: TopologyValidationOptions,
) -> Result<(), TopologyError> {
    check_ranges(topology)?;
    if options.check_twins {
        check_twins(topology)?;
    }
    if options.check_faces_partitioned {
        check_partition(topology, options.min_face_sides)?;
    }
    if options.check_cycles {
        check_rotation_links(topology)?;
        check_count_totals(topology)?;
        for v in 0..topology.vertex_count() {
            check_vertex_cycle(topology, v)?;
        }
        for f in 0..topology.face_count() {
            check_face_cycle(topology, f)?;
        }
    }
    Ok(())
}

/// Same as [`validate_topology`], walking rotations on the rayon pool.
#[cfg(feature = "rayon")]
pub fn validate_topology_par(
    topology: &Topology,
    options: TopologyValidationOptions,
) -> Result<(), TopologyError> {
    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    check_ranges(topology)?;
    if options.check_twins {
        check_twins(topology)?;
    }
    if options.check_faces_partitioned {
        check_partition(topology, options.min_face_sides)?;
    }
    if options.check_cycles {
        check_rotation_links(topology)?;
        check_count_totals(topology)?;
        (0..topology.vertex_count())
            .into_par_iter()
            .try_for_each(|v| check_vertex_cycle(topology, v))?;
        (0..topology.face_count())
            .into_par_iter()
            .try_for_each(|f| check_face_cycle(topology, f))?;
    }
    Ok(())
}

fn check_ranges(topology: &Topology) -> Result<(), TopologyError> {
    let edges = topology.edge_count();
    let vertices = topology.vertex_count();
    let faces = topology.face_count();
    let in_range = |kind, index, len| {
        if index < len {
            Ok(())
        } else {
            Err(TopologyError::OutOfRange { kind, index, len })
        }
    };
    for record in topology.edge_records() {
        in_range(ElementKind::Edge, record.twin(), edges)?;
        in_range(ElementKind::Edge, record.v_next(), edges)?;
        in_range(ElementKind::Edge, record.f_next(), edges)?;
        in_range(ElementKind::Vertex, record.far_vertex(), vertices)?;
        in_range(ElementKind::Face, record.far_face(), faces)?;
    }
    if topology.vertex_first_edges.len() != vertices || topology.face_first_edges.len() != faces {
        return Err(TopologyError::InvalidState(
            "first-edge arrays do not match neighbor count arrays",
        ));
    }
    for &first in topology.vertex_first_edges.iter().chain(&topology.face_first_edges) {
        in_range(ElementKind::Edge, first as usize, edges)?;
    }
    Ok(())
}

fn check_twins(topology: &Topology) -> Result<(), TopologyError> {
    for e in 0..topology.edge_count() {
        let twin = topology.twin(e);
        if twin == e || topology.twin(twin) != e {
            return Err(TopologyError::BrokenTwin { edge: e, twin });
        }
    }
    Ok(())
}

fn check_partition(topology: &Topology, min_face_sides: usize) -> Result<(), TopologyError> {
    if topology.first_external_face_index() > topology.face_count() {
        return Err(TopologyError::InvalidState(
            "first external face index is past the face count",
        ));
    }
    if min_face_sides > 0 {
        for face in 0..topology.first_external_face_index() {
            let sides = topology.face_neighbor_count(face);
            if sides < min_face_sides {
                return Err(TopologyError::UndersizedFace {
                    face,
                    sides,
                    min: min_face_sides,
                });
            }
        }
    }
    Ok(())
}

/// `f_next(e)` must be the twin of the edge before `e` around its vertex.
fn check_rotation_links(topology: &Topology) -> Result<(), TopologyError> {
    for e in 0..topology.edge_count() {
        if topology.v_next(topology.twin(topology.f_next(e))) != e {
            return Err(TopologyError::RotationMismatch { edge: e });
        }
    }
    Ok(())
}

fn check_count_totals(topology: &Topology) -> Result<(), TopologyError> {
    let edges = topology.edge_count();
    let vertex_total: usize = topology.vertex_neighbor_counts().iter().map(|&c| c as usize).sum();
    let face_total: usize = topology.face_neighbor_counts().iter().map(|&c| c as usize).sum();
    if vertex_total != edges {
        return Err(TopologyError::InvalidState(
            "vertex neighbor counts do not cover every half-edge",
        ));
    }
    if face_total != edges {
        return Err(TopologyError::InvalidState(
            "face neighbor counts do not cover every half-edge",
        ));
    }
    Ok(())
}

fn check_vertex_cycle(topology: &Topology, vertex: usize) -> Result<(), TopologyError> {
    check_cycle(
        topology,
        ElementKind::Vertex,
        vertex,
        topology.vertex_first_edge(vertex),
        topology.vertex_neighbor_count(vertex),
        |e| topology.v_next(e),
        |e| topology.near_vertex(e),
    )
}

fn check_face_cycle(topology: &Topology, face: usize) -> Result<(), TopologyError> {
    check_cycle(
        topology,
        ElementKind::Face,
        face,
        topology.face_first_edge(face),
        topology.face_neighbor_count(face),
        |e| topology.f_next(e),
        |e| topology.near_face(e),
    )
}

fn check_cycle(
    topology: &Topology,
    kind: ElementKind,
    index: usize,
    first: usize,
    expected: usize,
    step: impl Fn(usize) -> usize,
    owner: impl Fn(usize) -> usize,
) -> Result<(), TopologyError> {
    let mut edge = first;
    let mut found = 0;
    loop {
        let edge_owner = owner(edge);
        if edge_owner != index {
            return Err(TopologyError::CycleMembership {
                kind,
                index,
                edge,
                owner: edge_owner,
            });
        }
        edge = step(edge);
        found += 1;
        if edge == first || found > topology.edge_count() {
            break;
        }
    }
    if found != expected {
        return Err(TopologyError::CycleLengthMismatch {
            kind,
            index,
            expected,
            found,
        });
    }
    Ok(())
}

/// Validate a wrap attribute against `topology`.
///
/// Checked for every edge `e`:
/// * its twin carries the reverse of its flags;
/// * relations reaching an external face are empty;
/// * if the near face is internal, near face -> far vertex crosses the same
///   seams as near face -> near vertex (read from `f_next(e)`) -> far vertex;
/// * if both faces are internal, near face -> far face -> near vertex -> far
///   vertex agrees with near face -> far vertex.
pub fn validate_wrap(
    topology: &Topology,
    wraps: &EdgeAttribute<EdgeWrap>,
) -> Result<(), TopologyError> {
    wraps.check_len(topology)?;
    let wraps = wraps.as_slice();
    let inconsistent = |edge| Err(TopologyError::InconsistentWrap { edge });
    for e in 0..topology.edge_count() {
        let wrap = wraps[e];
        let reversed = wrap.reversed();
        if wraps[topology.twin(e)] != reversed {
            return inconsistent(e);
        }
        let near_internal = topology.is_internal_face(topology.near_face(e));
        let far_internal = topology.is_internal_face(topology.far_face(e));
        let set = |relation| wrap.region(relation) != 0;
        let stray_far = !far_internal
            && (set(WrapRelation::VertToFace) || set(WrapRelation::FaceToFace));
        let stray_near = !near_internal
            && (set(WrapRelation::FaceToVert) || set(WrapRelation::FaceToFace));
        if stray_far || stray_near {
            return inconsistent(e);
        }
        if near_internal {
            let via_near = chain_face_to_vert_to_vert(wraps[topology.f_next(e)], wrap);
            if via_near.region(WrapRelation::FaceToVert) != wrap.region(WrapRelation::FaceToVert) {
                return inconsistent(e);
            }
        }
        if near_internal && far_internal {
            let near_face_to_near_vertex = chain_face_to_face_to_vert(wrap, reversed);
            let around = chain_face_to_vert_to_vert(near_face_to_near_vertex, wrap);
            if around.region(WrapRelation::FaceToVert) != wrap.region(WrapRelation::FaceToVert) {
                return inconsistent(e);
            }
        }
    }
    Ok(())
}

impl DebugInvariants for Topology {
    fn validate_invariants(&self) -> Result<(), TopologyError> {
        validate_topology(self, TopologyValidationOptions::structural())
    }
}
