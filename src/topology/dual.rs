//! Combinatorial dual: vertices become faces and faces become vertices.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::TopologyError;
use crate::topology::edge::EdgeRecord;
use crate::topology::topology::Topology;

impl Topology {
    /// Turns the topology into its dual in place.
    ///
    /// Every half-edge keeps its index and twin. Its view is rotated a
    /// quarter turn: the old face rotation becomes the new vertex rotation
    /// and the old vertex rotation becomes the new face rotation. Vertex
    /// rotations come out reversed, so each new vertex is re-anchored on the
    /// twin of its old first edge.
    ///
    /// Fails with [`TopologyError::InvalidState`] when the topology has
    /// external faces; an open boundary has no dual vertex to map to.
    pub fn make_dual(&mut self) -> Result<(), TopologyError> {
        if self.has_external_faces() {
            return Err(TopologyError::InvalidState(
                "dual requires a closed topology without external faces",
            ));
        }

        let edges: Vec<EdgeRecord> = (0..self.edge_count())
            .map(|e| {
                let twin = self.twin(e);
                EdgeRecord::new(
                    twin,
                    self.twin(self.f_next(twin)),
                    self.v_next(e),
                    self.far_face(twin),
                    self.far_vertex(e),
                )
            })
            .collect();
        self.edges = edges;

        std::mem::swap(&mut self.vertex_neighbor_counts, &mut self.face_neighbor_counts);
        std::mem::swap(&mut self.vertex_first_edges, &mut self.face_first_edges);
        for first in self.vertex_first_edges.iter_mut() {
            *first = self.edges[*first as usize].twin;
        }
        self.first_external_face_index = self.face_neighbor_counts.len();

        log::debug!(
            "dual topology: {} vertices, {} faces, {} half-edges",
            self.vertex_count(),
            self.face_count(),
            self.edge_count()
        );
        self.debug_assert_invariants_after("make_dual");
        Ok(())
    }

    /// A dual copy; `self` is left untouched.
    pub fn dual_topology(&self) -> Result<Topology, TopologyError> {
        let mut dual = self.clone();
        dual.make_dual()?;
        Ok(dual)
    }
}
