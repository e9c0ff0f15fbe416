//! Build a closed topology from vertices given as clockwise neighbor lists.
//!
//! The half-edges of vertex `v` are laid out contiguously in neighbor order,
//! so `v_next` is known up front. Twins are resolved only against neighbors
//! with a smaller index, whose edges already exist. Faces are then traced
//! with `f_next(e) = twin(v_prev(e))`.

use itertools::Itertools;

use super::{BuildOptions, checked_count, insert_after};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::{ElementKind, TopologyError};
use crate::topology::edge::{EdgeRecord, UNSET};
use crate::topology::topology::Topology;
use crate::topology::validation::{TopologyValidationOptions, validate_topology};

/// Accumulates vertex neighbor lists and builds a [`Topology`] from them.
#[derive(Debug, Clone, Default)]
pub struct VertexVertexBuilder {
    vertices: Vec<Vec<usize>>,
    face_count: Option<usize>,
    options: BuildOptions,
}

impl VertexVertexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            ..Self::default()
        }
    }

    /// Declare how many faces the neighbor lists must trace out.
    pub fn with_face_count(mut self, face_count: usize) -> Self {
        self.face_count = Some(face_count);
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn neighbors(&self, vertex: usize) -> Option<&[usize]> {
        self.vertices.get(vertex).map(Vec::as_slice)
    }

    /// Add a vertex from its clockwise neighbor list and return its index.
    pub fn add_vertex(&mut self, neighbors: impl IntoIterator<Item = usize>) -> usize {
        self.vertices.push(neighbors.into_iter().collect());
        self.vertices.len() - 1
    }

    pub fn add_vertex_with_capacity(&mut self, capacity: usize) -> usize {
        self.vertices.push(Vec::with_capacity(capacity));
        self.vertices.len() - 1
    }

    pub fn add_empty_vertex(&mut self) -> usize {
        self.add_vertex_with_capacity(0)
    }

    pub fn extend_vertex(
        &mut self,
        vertex: usize,
        neighbors: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopologyError> {
        self.vertex_mut(vertex)?.extend(neighbors);
        Ok(())
    }

    /// Insert neighbors right after `after` in the rotation of `vertex`.
    pub fn extend_vertex_after(
        &mut self,
        vertex: usize,
        after: usize,
        neighbors: impl IntoIterator<Item = usize>,
    ) -> Result<(), TopologyError> {
        let list = self.vertex_mut(vertex)?;
        insert_after(list, after, neighbors, ElementKind::Vertex, vertex)
    }

    fn vertex_mut(&mut self, vertex: usize) -> Result<&mut Vec<usize>, TopologyError> {
        self.vertices.get_mut(vertex).ok_or(TopologyError::UndeclaredElement {
            kind: ElementKind::Vertex,
            index: vertex,
        })
    }

    fn check_neighbor_lists(&self) -> Result<(), TopologyError> {
        let n = self.vertices.len();
        for (vertex, list) in self.vertices.iter().enumerate() {
            if list.is_empty() {
                return Err(TopologyError::DisconnectedVertex { vertex });
            }
            checked_count(ElementKind::Vertex, vertex, list.len())?;
            if let Some(&neighbor) = list.iter().find(|&&b| b >= n) {
                return Err(TopologyError::MissingVertex { vertex, neighbor });
            }
            if list.contains(&vertex) {
                return Err(TopologyError::InvalidNeighbor {
                    vertex,
                    neighbor: vertex,
                });
            }
            if let Some(&neighbor) = list.iter().duplicates().next() {
                return Err(TopologyError::InvalidNeighbor { vertex, neighbor });
            }
        }
        Ok(())
    }

    /// Build the topology. The builder is left untouched.
    pub fn build(&self) -> Result<Topology, TopologyError> {
        self.check_neighbor_lists()?;

        let mut offsets = Vec::with_capacity(self.vertices.len() + 1);
        offsets.push(0usize);
        for list in &self.vertices {
            offsets.push(offsets[offsets.len() - 1] + list.len());
        }
        let total = offsets[self.vertices.len()];

        let mut twin = vec![UNSET; total];
        let mut near_vertex = vec![0u32; total];
        for (v, list) in self.vertices.iter().enumerate() {
            for (j, &b) in list.iter().enumerate() {
                let e = offsets[v] + j;
                near_vertex[e] = v as u32;
                if b > v {
                    continue;
                }
                let k = self.vertices[b]
                    .iter()
                    .position(|&x| x == v)
                    .ok_or(TopologyError::UnmatchedNeighbor {
                        vertex: v,
                        neighbor: b,
                    })?;
                let t = offsets[b] + k;
                twin[e] = t as u32;
                twin[t] = e as u32;
            }
        }
        // `b` lists `v` but `v` does not list `b`
        if let Some(e) = twin.iter().position(|&t| t == UNSET) {
            let v = near_vertex[e] as usize;
            return Err(TopologyError::UnmatchedNeighbor {
                vertex: v,
                neighbor: self.vertices[v][e - offsets[v]],
            });
        }

        let mut records: Vec<EdgeRecord> = Vec::with_capacity(total);
        for (v, list) in self.vertices.iter().enumerate() {
            let d = list.len();
            for (j, &b) in list.iter().enumerate() {
                let e = offsets[v] + j;
                let v_next = offsets[v] + (j + 1) % d;
                let v_prev = offsets[v] + (j + d - 1) % d;
                records.push(EdgeRecord {
                    twin: twin[e],
                    v_next: v_next as u32,
                    f_next: twin[v_prev],
                    far_vertex: b as u32,
                    far_face: UNSET,
                });
            }
        }

        let min_sides = self.options.effective_min_face_sides();
        let mut near_face = vec![UNSET; total];
        let mut face_counts: Vec<u16> = Vec::new();
        let mut face_first: Vec<u32> = Vec::new();
        for start in 0..total {
            if near_face[start] != UNSET {
                continue;
            }
            let face = face_counts.len();
            let mut e = start;
            let mut sides = 0usize;
            while near_face[e] == UNSET {
                near_face[e] = face as u32;
                sides += 1;
                e = records[e].f_next();
            }
            if sides < min_sides {
                return Err(TopologyError::DegenerateFace {
                    face,
                    sides,
                    min: min_sides,
                });
            }
            face_first.push(start as u32);
            face_counts.push(checked_count(ElementKind::Face, face, sides)?);
        }
        if let Some(expected) = self.face_count {
            if expected != face_counts.len() {
                return Err(TopologyError::FaceCountMismatch {
                    expected,
                    found: face_counts.len(),
                });
            }
        }
        for e in 0..total {
            records[e].far_face = near_face[twin[e] as usize];
        }

        let vertex_counts = self.vertices.iter().map(|l| l.len() as u16).collect();
        let vertex_first = offsets[..self.vertices.len()].iter().map(|&o| o as u32).collect();
        let face_total = face_counts.len();
        let topology = Topology::from_parts(
            vertex_counts,
            vertex_first,
            records,
            face_counts,
            face_first,
            face_total,
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
            "vertex-vertex build: {} vertices, {} faces, {} half-edges",
            topology.vertex_count(),
            topology.face_count(),
            topology.edge_count()
        );
        topology.debug_assert_invariants_after("VertexVertexBuilder::build");
        Ok(topology)
    }
}
