//! The `Topology` container: flat index arrays for vertices, faces and
//! half-edges.
//!
//! Array lengths are fixed once a topology exists. Builders produce it whole,
//! [`Topology::make_dual`] rewrites it whole, and the Euler operators only
//! reassign links between existing records.

use serde::{Deserialize, Serialize};

use crate::mesh_error::{ElementKind, TopologyError};
use crate::topology::edge::EdgeRecord;
use crate::topology::handles::{Face, FaceEdge, Vertex, VertexEdge};
use crate::topology::validation::{TopologyValidationOptions, validate_topology};

/// Connectivity of a polygonal 2-manifold, possibly with boundary.
///
/// Faces `[0, first_external_face_index)` are internal; the rest are
/// external faces that close open boundaries, so every half-edge always has
/// a face on both sides.
///
/// Deserialized topologies pass the structural checks of
/// [`validate_topology`] before they are handed out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopologyParts")]
pub struct Topology {
    pub(crate) vertex_neighbor_counts: Vec<u16>,
    pub(crate) vertex_first_edges: Vec<u32>,
    pub(crate) edges: Vec<EdgeRecord>,
    pub(crate) face_neighbor_counts: Vec<u16>,
    pub(crate) face_first_edges: Vec<u32>,
    pub(crate) first_external_face_index: usize,
}

/// Serialized arrays of a [`Topology`], not yet checked.
#[derive(Deserialize)]
struct TopologyParts {
    vertex_neighbor_counts: Vec<u16>,
    vertex_first_edges: Vec<u32>,
    edges: Vec<EdgeRecord>,
    face_neighbor_counts: Vec<u16>,
    face_first_edges: Vec<u32>,
    first_external_face_index: usize,
}

impl TryFrom<TopologyParts> for Topology {
    type Error = TopologyError;

    fn try_from(parts: TopologyParts) -> Result<Self, Self::Error> {
        let topology = Self::from_parts(
            parts.vertex_neighbor_counts,
            parts.vertex_first_edges,
            parts.edges,
            parts.face_neighbor_counts,
            parts.face_first_edges,
            parts.first_external_face_index,
        );
        validate_topology(&topology, TopologyValidationOptions::structural())?;
        Ok(topology)
    }
}

impl Topology {
    /// Assembles a topology from raw arrays. Callers are responsible for the
    /// link invariants; builders validate before handing the result out.
    pub(crate) fn from_parts(
        vertex_neighbor_counts: Vec<u16>,
        vertex_first_edges: Vec<u32>,
        edges: Vec<EdgeRecord>,
        face_neighbor_counts: Vec<u16>,
        face_first_edges: Vec<u32>,
        first_external_face_index: usize,
    ) -> Self {
        Self {
            vertex_neighbor_counts,
            vertex_first_edges,
            edges,
            face_neighbor_counts,
            face_first_edges,
            first_external_face_index,
        }
    }

    // ----- sizes ----------------------------------------------------------

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_neighbor_counts.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_neighbor_counts.len()
    }

    /// Number of directed half-edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of undirected edges (twin pairs).
    #[inline]
    pub fn undirected_edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    #[inline]
    pub fn first_external_face_index(&self) -> usize {
        self.first_external_face_index
    }

    #[inline]
    pub fn internal_face_count(&self) -> usize {
        self.first_external_face_index
    }

    #[inline]
    pub fn external_face_count(&self) -> usize {
        self.face_count() - self.first_external_face_index
    }

    #[inline]
    pub fn has_external_faces(&self) -> bool {
        self.first_external_face_index < self.face_count()
    }

    /// A closed topology has no open boundary, hence no external faces.
    #[inline]
    pub fn is_closed(&self) -> bool {
        !self.has_external_faces()
    }

    #[inline]
    pub fn is_internal_face(&self, face: usize) -> bool {
        face < self.first_external_face_index
    }

    /// `V - E + F`, counting undirected edges and every face, external
    /// ones included.
    pub fn euler_characteristic(&self) -> isize {
        self.vertex_count() as isize - self.undirected_edge_count() as isize
            + self.face_count() as isize
    }

    // ----- handles --------------------------------------------------------

    /// Vertex handle. Panics if `index` is out of range.
    #[inline]
    pub fn vertex(&self, index: usize) -> Vertex<'_> {
        assert!(
            index < self.vertex_count(),
            "vertex index {index} out of range (len {})",
            self.vertex_count()
        );
        Vertex::new(self, index)
    }

    /// Face handle. Panics if `index` is out of range.
    #[inline]
    pub fn face(&self, index: usize) -> Face<'_> {
        assert!(
            index < self.face_count(),
            "face index {index} out of range (len {})",
            self.face_count()
        );
        Face::new(self, index)
    }

    /// Vertex-centric view of edge `index`. Panics if out of range.
    #[inline]
    pub fn vertex_edge(&self, index: usize) -> VertexEdge<'_> {
        assert!(
            index < self.edge_count(),
            "edge index {index} out of range (len {})",
            self.edge_count()
        );
        VertexEdge::new(self, index)
    }

    /// Face-centric view of edge `index`. Panics if out of range.
    #[inline]
    pub fn face_edge(&self, index: usize) -> FaceEdge<'_> {
        assert!(
            index < self.edge_count(),
            "edge index {index} out of range (len {})",
            self.edge_count()
        );
        FaceEdge::new(self, index)
    }

    pub fn try_vertex(&self, index: usize) -> Result<Vertex<'_>, TopologyError> {
        self.check_index(ElementKind::Vertex, index)?;
        Ok(Vertex::new(self, index))
    }

    pub fn try_face(&self, index: usize) -> Result<Face<'_>, TopologyError> {
        self.check_index(ElementKind::Face, index)?;
        Ok(Face::new(self, index))
    }

    pub fn try_vertex_edge(&self, index: usize) -> Result<VertexEdge<'_>, TopologyError> {
        self.check_index(ElementKind::Edge, index)?;
        Ok(VertexEdge::new(self, index))
    }

    pub fn try_face_edge(&self, index: usize) -> Result<FaceEdge<'_>, TopologyError> {
        self.check_index(ElementKind::Edge, index)?;
        Ok(FaceEdge::new(self, index))
    }

    pub(crate) fn len_of(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Vertex => self.vertex_count(),
            ElementKind::Face => self.face_count(),
            ElementKind::Edge => self.edge_count(),
        }
    }

    pub(crate) fn check_index(&self, kind: ElementKind, index: usize) -> Result<(), TopologyError> {
        let len = self.len_of(kind);
        if index < len {
            Ok(())
        } else {
            Err(TopologyError::OutOfRange { kind, index, len })
        }
    }

    // ----- iteration ------------------------------------------------------

    pub fn vertices(&self) -> impl ExactSizeIterator<Item = Vertex<'_>> + '_ {
        (0..self.vertex_count()).map(move |i| Vertex::new(self, i))
    }

    pub fn faces(&self) -> impl ExactSizeIterator<Item = Face<'_>> + '_ {
        (0..self.face_count()).map(move |i| Face::new(self, i))
    }

    pub fn internal_faces(&self) -> impl ExactSizeIterator<Item = Face<'_>> + '_ {
        (0..self.first_external_face_index).map(move |i| Face::new(self, i))
    }

    pub fn external_faces(&self) -> impl ExactSizeIterator<Item = Face<'_>> + '_ {
        (self.first_external_face_index..self.face_count()).map(move |i| Face::new(self, i))
    }

    pub fn vertex_edges(&self) -> impl ExactSizeIterator<Item = VertexEdge<'_>> + '_ {
        (0..self.edge_count()).map(move |i| VertexEdge::new(self, i))
    }

    pub fn face_edges(&self) -> impl ExactSizeIterator<Item = FaceEdge<'_>> + '_ {
        (0..self.edge_count()).map(move |i| FaceEdge::new(self, i))
    }

    /// The outgoing edge from `from` whose far vertex is `to`, if any.
    pub fn find_vertex_edge(&self, from: usize, to: usize) -> Option<VertexEdge<'_>> {
        if from >= self.vertex_count() {
            return None;
        }
        self.vertex(from).edges().find(|e| e.far_vertex().index() == to)
    }

    // ----- raw arrays -----------------------------------------------------

    #[inline]
    pub fn edge_records(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Zero-copy byte view of the edge records.
    #[inline]
    pub fn edge_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.edges)
    }

    #[inline]
    pub fn vertex_neighbor_counts(&self) -> &[u16] {
        &self.vertex_neighbor_counts
    }

    #[inline]
    pub fn face_neighbor_counts(&self) -> &[u16] {
        &self.face_neighbor_counts
    }

    // ----- raw index navigation ---------------------------------------------

    #[inline]
    pub fn twin(&self, edge: usize) -> usize {
        self.edges[edge].twin()
    }

    #[inline]
    pub fn v_next(&self, edge: usize) -> usize {
        self.edges[edge].v_next()
    }

    #[inline]
    pub fn f_next(&self, edge: usize) -> usize {
        self.edges[edge].f_next()
    }

    #[inline]
    pub fn v_prev(&self, edge: usize) -> usize {
        self.twin(self.f_next(edge))
    }

    #[inline]
    pub fn f_prev(&self, edge: usize) -> usize {
        self.v_next(self.twin(edge))
    }

    #[inline]
    pub fn far_vertex(&self, edge: usize) -> usize {
        self.edges[edge].far_vertex()
    }

    #[inline]
    pub fn near_vertex(&self, edge: usize) -> usize {
        self.far_vertex(self.twin(edge))
    }

    #[inline]
    pub fn far_face(&self, edge: usize) -> usize {
        self.edges[edge].far_face()
    }

    #[inline]
    pub fn near_face(&self, edge: usize) -> usize {
        self.far_face(self.twin(edge))
    }

    #[inline]
    pub fn vertex_neighbor_count(&self, vertex: usize) -> usize {
        self.vertex_neighbor_counts[vertex] as usize
    }

    #[inline]
    pub fn face_neighbor_count(&self, face: usize) -> usize {
        self.face_neighbor_counts[face] as usize
    }

    #[inline]
    pub fn vertex_first_edge(&self, vertex: usize) -> usize {
        self.vertex_first_edges[vertex] as usize
    }

    #[inline]
    pub fn face_first_edge(&self, face: usize) -> usize {
        self.face_first_edges[face] as usize
    }

    // ----- crate-internal rewiring ------------------------------------------

    #[inline]
    pub(crate) fn set_v_next(&mut self, edge: usize, next: usize) {
        self.edges[edge].v_next = next as u32;
    }

    #[inline]
    pub(crate) fn set_f_next(&mut self, edge: usize, next: usize) {
        self.edges[edge].f_next = next as u32;
    }

    #[inline]
    pub(crate) fn set_far_vertex(&mut self, edge: usize, vertex: usize) {
        self.edges[edge].far_vertex = vertex as u32;
    }

    #[inline]
    pub(crate) fn set_far_face(&mut self, edge: usize, face: usize) {
        self.edges[edge].far_face = face as u32;
    }

    /// Moves one neighbor slot from vertex `from` to vertex `to`.
    #[inline]
    pub(crate) fn shift_vertex_neighbor(&mut self, from: usize, to: usize) {
        self.vertex_neighbor_counts[from] -= 1;
        self.vertex_neighbor_counts[to] += 1;
    }

    /// Moves one neighbor slot from face `from` to face `to`.
    #[inline]
    pub(crate) fn shift_face_neighbor(&mut self, from: usize, to: usize) {
        self.face_neighbor_counts[from] -= 1;
        self.face_neighbor_counts[to] += 1;
    }

    /// Re-anchors `vertex` on `replacement` if its first edge is `leaving`.
    #[inline]
    pub(crate) fn reanchor_vertex(&mut self, vertex: usize, leaving: usize, replacement: usize) {
        if self.vertex_first_edges[vertex] as usize == leaving {
            self.vertex_first_edges[vertex] = replacement as u32;
        }
    }

    /// Re-anchors `face` on `replacement` if its first edge is `leaving`.
    #[inline]
    pub(crate) fn reanchor_face(&mut self, face: usize, leaving: usize, replacement: usize) {
        if self.face_first_edges[face] as usize == leaving {
            self.face_first_edges[face] = replacement as u32;
        }
    }
}
