//! Build a topology from faces given as clockwise vertex lists.
//!
//! Each face corner becomes one half-edge of that face. Matching directed
//! pairs become twins; every side left without a partner gets a synthesized
//! twin on the open boundary. Vertex rotations are then derived from the
//! face rotations (`v_next(e) = f_prev(twin(e))`), open fans at boundary
//! vertices are stitched together, and the synthesized half-edges are traced
//! into external faces numbered after the declared ones.

use hashbrown::HashMap;
use itertools::Itertools;

use super::{BuildOptions, checked_count, insert_after};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::{ElementKind, TopologyError};
use crate::topology::edge::{EdgeRecord, UNSET};
use crate::topology::topology::Topology;
use crate::topology::validation::{TopologyValidationOptions, validate_topology};

/// Accumulates faces and builds a [`Topology`] from them.
#[derive(Debug, Clone, Default)]
pub struct FaceVertexBuilder {
    faces: Vec<Vec<usize>>,
    vertex_count: usize,
    options: BuildOptions,
}

impl FaceVertexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `faces` faces.
    pub fn with_capacity(faces: usize) -> Self {
        Self {
            faces: Vec::with_capacity(faces),
            ..Self::default()
        }
    }

    /// Declare at least `vertex_count` vertices. Every one of them must end
    /// up on some face, otherwise `build()` reports it as disconnected.
    pub fn with_vertex_count(mut self, vertex_count: usize) -> Self {
        self.vertex_count = vertex_count;
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn options(&self) -> BuildOptions {
        self.options
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Declared vertex count, raised to cover every referenced vertex.
    pub fn vertex_count(&self) -> usize {
        self.faces
            .iter()
            .flatten()
            .map(|&v| v + 1)
            .max()
            .unwrap_or(0)
            .max(self.vertex_count)
    }

    /// Vertex list of a declared face.
    pub fn face(&self, face: usize) -> Option<&[usize]> {
        self.faces.get(face).map(Vec::as_slice)
    }

    /// Add a face from its clockwise vertex list and return its index.
    pub fn add_face(&mut self, vertices: impl IntoIterator<Item = usize>) -> usize {
        self.faces.push(vertices.into_iter().collect());
        self.faces.len() - 1
    }

    /// Add an empty face with room for `capacity` vertices.
    pub fn add_face_with_capacity(&mut self, capacity: usize) -> usize {
        self.faces.push(Vec::with_capacity(capacity));
        self.faces.len() - 1
    }

    pub fn add_empty_face(&mut self) -> usize {
        self.add_face_with_capacity(0)
    }

    /// Append vertices to the end of an already declared face.
    pub fn extend_face(
        &mut self,
        face: usize,
        vertices: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopologyError> {
        self.face_mut(face)?.extend(vertices);
        Ok(())
    }

    /// Insert vertices right after `after`, which must already be a corner
    /// of `face`.
    pub fn extend_face_after(
        &mut self,
        face: usize,
        after: usize,
        vertices: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopologyError> {
        let list = self.face_mut(face)?;
        insert_after(list, after, vertices, ElementKind::Face, face)
    }

    fn face_mut(&mut self, face: usize) -> Result<&mut Vec<usize>, TopologyError> {
        self.faces.get_mut(face).ok_or(TopologyError::UndeclaredElement {
            kind: ElementKind::Face,
            index: face,
        })
    }

    /// Build the topology. The builder is left untouched.
    pub fn build(&self) -> Result<Topology, TopologyError> {
        let min_sides = self.options.effective_min_face_sides();
        let mut corners = 0usize;
        for (f, face) in self.faces.iter().enumerate() {
            if face.len() < min_sides {
                return Err(TopologyError::DegenerateFace {
                    face: f,
                    sides: face.len(),
                    min: min_sides,
                });
            }
            checked_count(ElementKind::Face, f, face.len())?;
            if let Some(&vertex) = face.iter().duplicates().next() {
                return Err(TopologyError::RepeatedFaceVertex { face: f, vertex });
            }
            corners += face.len();
        }
        let vertex_count = self.vertex_count();
        let internal_faces = self.faces.len();

        let mut edges = EdgeLists::with_capacity(2 * corners);
        let mut face_counts: Vec<u16> = Vec::with_capacity(internal_faces + 1);
        let mut face_first: Vec<u32> = Vec::with_capacity(internal_faces + 1);
        let mut directed: HashMap<(usize, usize), usize> = HashMap::with_capacity(corners);

        // One half-edge per corner: corner i is near v_i and far v_{i-1}.
        for (f, face) in self.faces.iter().enumerate() {
            let base = edges.len();
            let n = face.len();
            face_first.push(base as u32);
            face_counts.push(n as u16);
            for i in 0..n {
                let near = face[i];
                let far = face[(i + n - 1) % n];
                if let Some(&other) = directed.get(&(near, far)) {
                    return Err(TopologyError::DuplicateEdge {
                        from: near,
                        to: far,
                        first: edges.near_face[other] as usize,
                        second: f,
                    });
                }
                directed.insert((near, far), base + i);
                edges.push(far, near, base + (i + 1) % n, f as u32);
            }
        }
        let internal = edges.len();

        for e in 0..internal {
            if edges.twin[e] != UNSET {
                continue;
            }
            let key = (edges.far_vertex[e] as usize, edges.near_vertex[e] as usize);
            if let Some(&t) = directed.get(&key) {
                edges.twin[e] = t as u32;
                edges.twin[t] = e as u32;
            }
        }

        // Unmatched sides lie on an open boundary; give them a twin.
        for e in 0..internal {
            if edges.twin[e] == UNSET {
                let u = edges.len();
                edges.push(
                    edges.near_vertex[e] as usize,
                    edges.far_vertex[e] as usize,
                    UNSET as usize,
                    UNSET,
                );
                edges.twin[u] = e as u32;
                edges.twin[e] = u as u32;
            }
        }
        let total = edges.len();

        let mut f_prev = vec![UNSET; internal];
        for e in 0..internal {
            f_prev[edges.f_next[e] as usize] = e as u32;
        }
        for e in 0..total {
            let t = edges.twin[e] as usize;
            if t < internal {
                edges.v_next[e] = f_prev[t];
            }
        }

        self.stitch_open_fans(&mut edges, internal)?;

        let (vertex_counts, vertex_first) = vertex_rotations(&edges, vertex_count)?;

        let mut v_prev = vec![UNSET; total];
        for e in 0..total {
            v_prev[edges.v_next[e] as usize] = e as u32;
        }
        for u in internal..total {
            edges.f_next[u] = edges.twin[v_prev[u] as usize];
        }

        // External faces: rotations over the synthesized half-edges.
        for u in internal..total {
            if edges.near_face[u] != UNSET {
                continue;
            }
            let face = face_counts.len();
            let mut e = u;
            let mut sides = 0usize;
            loop {
                edges.near_face[e] = face as u32;
                sides += 1;
                e = edges.f_next[e] as usize;
                if e == u {
                    break;
                }
                if sides > total {
                    return Err(TopologyError::OpenBoundary { edge: u });
                }
            }
            face_first.push(u as u32);
            face_counts.push(checked_count(ElementKind::Face, face, sides)?);
        }

        let records: Vec<EdgeRecord> = (0..total)
            .map(|e| EdgeRecord {
                twin: edges.twin[e],
                v_next: edges.v_next[e],
                f_next: edges.f_next[e],
                far_vertex: edges.far_vertex[e],
                far_face: edges.near_face[edges.twin[e] as usize],
            })
            .collect();

        let topology = Topology::from_parts(
            vertex_counts,
            vertex_first,
            records,
            face_counts,
            face_first,
            internal_faces,
        );
        if self.options.validate {
            validate_topology(
                &topology,
                TopologyValidationOptions {
                    min_face_sides: min_sides,
                    ..TopologyValidationOptions::all()
                },
            )?;
        }
        log::debug!(
            "face-vertex build: {} vertices, {} faces ({} external), {} half-edges",
            topology.vertex_count(),
            topology.face_count(),
            topology.external_face_count(),
            topology.edge_count()
        );
        topology.debug_assert_invariants_after("FaceVertexBuilder::build");
        Ok(topology)
    }

    /// Link the open end of each boundary fan to the start of the next fan
    /// around the same vertex. Fans start at synthesized half-edges and end
    /// at the internal half-edge whose `v_next` is still unset.
    fn stitch_open_fans(&self, edges: &mut EdgeLists, internal: usize) -> Result<(), TopologyError> {
        let total = edges.len();
        let boundary: Vec<(usize, usize)> = (internal..total)
            .map(|u| (edges.near_vertex[u] as usize, u))
            .sorted()
            .collect();
        let mut fans: Vec<(usize, usize)> = Vec::new();
        for (vertex, group) in &boundary.iter().chunk_by(|&&(v, _)| v) {
            fans.clear();
            for &(_, start) in group {
                let mut end = start;
                let mut steps = 0usize;
                while edges.v_next[end] != UNSET {
                    end = edges.v_next[end] as usize;
                    steps += 1;
                    if steps > total {
                        return Err(TopologyError::NonManifoldVertex {
                            vertex,
                            reached: steps,
                            expected: total,
                        });
                    }
                }
                fans.push((start, end));
            }
            if fans.len() > 1 {
                if !self.options.allow_pinched_vertices {
                    return Err(TopologyError::PinchedVertex {
                        vertex,
                        fans: fans.len(),
                    });
                }
                log::warn!("vertex {vertex} joins {} open fans; stitching them", fans.len());
            }
            for k in 0..fans.len() {
                let (_, end) = fans[k];
                let (next_start, _) = fans[(k + 1) % fans.len()];
                edges.v_next[end] = next_start as u32;
            }
        }
        Ok(())
    }
}

/// Count each vertex's half-edges and check they form one rotation.
fn vertex_rotations(edges: &EdgeLists, vertex_count: usize) -> Result<(Vec<u16>, Vec<u32>), TopologyError> {
    let mut counts = vec![0usize; vertex_count];
    let mut first = vec![UNSET; vertex_count];
    for e in 0..edges.len() {
        let v = edges.near_vertex[e] as usize;
        counts[v] += 1;
        if first[v] == UNSET {
            first[v] = e as u32;
        }
    }

    let mut neighbor_counts = Vec::with_capacity(vertex_count);
    for (vertex, &expected) in counts.iter().enumerate() {
        if expected == 0 {
            return Err(TopologyError::DisconnectedVertex { vertex });
        }
        neighbor_counts.push(checked_count(ElementKind::Vertex, vertex, expected)?);

        let start = first[vertex] as usize;
        let mut e = start;
        let mut reached = 0usize;
        loop {
            let next = edges.v_next[e];
            if next == UNSET {
                break;
            }
            e = next as usize;
            reached += 1;
            if e == start || reached > expected {
                break;
            }
        }
        if e != start || reached != expected {
            return Err(TopologyError::NonManifoldVertex {
                vertex,
                reached,
                expected,
            });
        }
    }
    Ok((neighbor_counts, first))
}

/// Half-edge fields under construction, one entry per half-edge.
struct EdgeLists {
    twin: Vec<u32>,
    v_next: Vec<u32>,
    f_next: Vec<u32>,
    far_vertex: Vec<u32>,
    near_vertex: Vec<u32>,
    near_face: Vec<u32>,
}

impl EdgeLists {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            twin: Vec::with_capacity(capacity),
            v_next: Vec::with_capacity(capacity),
            f_next: Vec::with_capacity(capacity),
            far_vertex: Vec::with_capacity(capacity),
            near_vertex: Vec::with_capacity(capacity),
            near_face: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.twin.len()
    }

    fn push(&mut self, far_vertex: usize, near_vertex: usize, f_next: usize, near_face: u32) {
        self.twin.push(UNSET);
        self.v_next.push(UNSET);
        self.f_next.push(f_next as u32);
        self.far_vertex.push(far_vertex as u32);
        self.near_vertex.push(near_vertex as u32);
        self.near_face.push(near_face);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron_builder() -> FaceVertexBuilder {
        let mut b = FaceVertexBuilder::new();
        b.add_face([0, 1, 2]);
        b.add_face([0, 2, 3]);
        b.add_face([0, 3, 1]);
        b.add_face([1, 3, 2]);
        b
    }

    fn grid_2x2_builder() -> FaceVertexBuilder {
        let mut b = FaceVertexBuilder::new();
        b.add_face([0, 1, 4, 3]);
        b.add_face([1, 2, 5, 4]);
        b.add_face([3, 4, 7, 6]);
        b.add_face([4, 5, 8, 7]);
        b
    }

    #[test]
    fn tetrahedron_is_closed() {
        let t = tetrahedron_builder().build().unwrap();
        assert_eq!(t.vertex_count(), 4);
        assert_eq!(t.edge_count(), 12);
        assert_eq!(t.undirected_edge_count(), 6);
        assert_eq!(t.face_count(), 4);
        assert!(t.is_closed());
        assert!(t.vertices().all(|v| v.neighbor_count() == 3));
        assert!(t.faces().all(|f| f.neighbor_count() == 3));
        assert_eq!(t.euler_characteristic(), 2);
    }

    #[test]
    fn faces_keep_declared_corner_order() {
        let t = tetrahedron_builder().build().unwrap();
        let corners: Vec<usize> = t.face(3).vertices().map(|v| v.index()).collect();
        assert_eq!(corners, vec![1, 3, 2]);
    }

    #[test]
    fn open_grid_gets_one_external_face() {
        let t = grid_2x2_builder().build().unwrap();
        assert_eq!(t.face_count(), 5);
        assert_eq!(t.first_external_face_index(), 4);
        assert_eq!(t.face(4).neighbor_count(), 8);
        assert_eq!(t.edge_count(), 24);
        assert_eq!(t.vertex_neighbor_counts(), &[2, 3, 2, 3, 4, 3, 2, 3, 2]);

        let outer = t.face_edges().filter(|e| e.is_outer_boundary()).count();
        let inner = t.face_edges().filter(|e| e.is_inner_boundary()).count();
        assert_eq!((outer, inner), (8, 8));
        assert!(t.vertices().filter(|v| !v.is_boundary()).map(|v| v.index()).eq([4]));
    }

    #[test]
    fn duplicate_directed_side_is_rejected() {
        let mut b = FaceVertexBuilder::new();
        b.add_face([0, 1, 2]);
        b.add_face([0, 1, 3]);
        assert_eq!(
            b.build().unwrap_err(),
            TopologyError::DuplicateEdge {
                from: 1,
                to: 0,
                first: 0,
                second: 1
            }
        );
    }

    #[test]
    fn malformed_faces_are_rejected() {
        let mut b = FaceVertexBuilder::new();
        b.add_face([0, 1]);
        assert_eq!(
            b.build().unwrap_err(),
            TopologyError::DegenerateFace {
                face: 0,
                sides: 2,
                min: 3
            }
        );

        let mut b = FaceVertexBuilder::new();
        b.add_face([0, 1, 1, 2]);
        assert_eq!(
            b.build().unwrap_err(),
            TopologyError::RepeatedFaceVertex { face: 0, vertex: 1 }
        );

        let b = tetrahedron_builder().with_options(BuildOptions {
            min_face_sides: 4,
            ..BuildOptions::default()
        });
        assert!(matches!(
            b.build(),
            Err(TopologyError::DegenerateFace { min: 4, .. })
        ));
    }

    #[test]
    fn unused_vertex_is_disconnected() {
        let b = tetrahedron_builder().with_vertex_count(5);
        assert_eq!(b.build().unwrap_err(), TopologyError::DisconnectedVertex { vertex: 4 });
    }

    #[test]
    fn pinched_vertex_requires_opt_in() {
        let mut b = FaceVertexBuilder::new();
        b.add_face([0, 1, 2]);
        b.add_face([0, 3, 4]);
        assert_eq!(
            b.build().unwrap_err(),
            TopologyError::PinchedVertex { vertex: 0, fans: 2 }
        );

        let t = b
            .with_options(BuildOptions {
                allow_pinched_vertices: true,
                ..BuildOptions::default()
            })
            .build()
            .unwrap();
        assert_eq!(t.vertex_neighbor_counts(), &[4, 2, 2, 2, 2]);
        assert_eq!(t.face_neighbor_counts(), &[3, 3, 6]);
        assert_eq!(t.external_face_count(), 1);
    }

    #[test]
    fn builder_failures_classify_as_build_errors() {
        let mut duplicate = FaceVertexBuilder::new();
        duplicate.add_face([0, 1, 2]);
        duplicate.add_face([0, 1, 3]);
        let mut pinched = FaceVertexBuilder::new();
        pinched.add_face([0, 1, 2]);
        pinched.add_face([0, 3, 4]);
        let errors = [
            duplicate.build().unwrap_err(),
            pinched.build().unwrap_err(),
            tetrahedron_builder().with_vertex_count(5).build().unwrap_err(),
            TopologyError::OpenBoundary { edge: 7 },
        ];
        for err in &errors {
            assert!(err.is_build_error(), "{err}");
        }
        assert!(!TopologyError::InvalidState("dual of an open topology").is_build_error());
    }

    #[test]
    fn touching_closed_shells_are_non_manifold() {
        let mut b = tetrahedron_builder();
        b.add_face([0, 4, 5]);
        b.add_face([0, 5, 6]);
        b.add_face([0, 6, 4]);
        b.add_face([4, 6, 5]);
        assert_eq!(
            b.build().unwrap_err(),
            TopologyError::NonManifoldVertex {
                vertex: 0,
                reached: 3,
                expected: 6
            }
        );
    }

    #[test]
    fn faces_can_be_extended_piecewise() {
        let mut b = FaceVertexBuilder::with_capacity(4);
        let f0 = b.add_empty_face();
        b.extend_face(f0, [0, 1]).unwrap();
        b.extend_face(f0, [2]).unwrap();
        b.add_face([0, 2, 3]);
        let f2 = b.add_face_with_capacity(3);
        b.extend_face(f2, [0, 1]).unwrap();
        b.extend_face_after(f2, 0, [3]).unwrap();
        let f3 = b.add_face([1, 2]);
        b.extend_face_after(f3, 1, [3]).unwrap();

        assert_eq!(b.face(f2), Some(&[0, 3, 1][..]));
        assert_eq!(b.face(f3), Some(&[1, 3, 2][..]));
        assert_eq!(b.build().unwrap(), tetrahedron_builder().build().unwrap());
    }

    #[test]
    fn extending_unknown_faces_fails() {
        let mut b = tetrahedron_builder();
        assert_eq!(
            b.extend_face(9, [0]).unwrap_err(),
            TopologyError::UndeclaredElement {
                kind: ElementKind::Face,
                index: 9
            }
        );
        assert_eq!(
            b.extend_face_after(0, 7, [5]).unwrap_err(),
            TopologyError::MissingAnchor {
                kind: ElementKind::Face,
                index: 0,
                anchor: 7
            }
        );
    }

    #[test]
    fn build_can_be_repeated_after_more_input() {
        let mut b = grid_2x2_builder();
        let first = b.build().unwrap();
        assert_eq!(b.build().unwrap(), first);
        b.extend_face_after(0, 1, [9]).unwrap();
        // the new corner opens a hole that touches the outer boundary at 1
        assert_eq!(
            b.build().unwrap_err(),
            TopologyError::PinchedVertex { vertex: 1, fans: 2 }
        );
        assert_eq!(b.vertex_count(), 10);

        let t = b
            .with_options(BuildOptions {
                allow_pinched_vertices: true,
                ..BuildOptions::default()
            })
            .build()
            .unwrap();
        assert_eq!(t.face_neighbor_counts(), &[5, 4, 4, 4, 8, 3]);
        assert_eq!(t.external_face_count(), 2);
    }
}
