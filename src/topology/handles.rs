//! Lightweight borrowed handles over a [`Topology`].
//!
//! A handle is a `(&Topology, index)` pair. [`VertexEdge`] and [`FaceEdge`]
//! are two readings of the same half-edge index: the first walks around the
//! edge's near vertex, the second around its near face. The two views of one
//! index compare equal.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::topology::topology::Topology;

macro_rules! handle_common {
    ($name:ident) => {
        impl<'a> $name<'a> {
            #[inline]
            pub(crate) fn new(topology: &'a Topology, index: usize) -> Self {
                Self { topology, index }
            }

            #[inline]
            pub fn index(&self) -> usize {
                self.index
            }

            #[inline]
            pub fn topology(&self) -> &'a Topology {
                self.topology
            }
        }

        impl fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.index)
            }
        }

        impl Hash for $name<'_> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.index.hash(state);
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                self.index == other.index && std::ptr::eq(self.topology, other.topology)
            }
        }

        impl Eq for $name<'_> {}
    };
}

/// A vertex of a topology.
#[derive(Clone, Copy)]
pub struct Vertex<'a> {
    topology: &'a Topology,
    index: usize,
}

/// A face of a topology, internal or external.
#[derive(Clone, Copy)]
pub struct Face<'a> {
    topology: &'a Topology,
    index: usize,
}

/// A half-edge read around its near vertex.
#[derive(Clone, Copy)]
pub struct VertexEdge<'a> {
    topology: &'a Topology,
    index: usize,
}

/// A half-edge read around its near face.
#[derive(Clone, Copy)]
pub struct FaceEdge<'a> {
    topology: &'a Topology,
    index: usize,
}

handle_common!(Vertex);
handle_common!(Face);
handle_common!(VertexEdge);
handle_common!(FaceEdge);

impl<'a> PartialEq<FaceEdge<'a>> for VertexEdge<'a> {
    fn eq(&self, other: &FaceEdge<'a>) -> bool {
        self.index == other.index && std::ptr::eq(self.topology, other.topology)
    }
}

impl<'a> PartialEq<VertexEdge<'a>> for FaceEdge<'a> {
    fn eq(&self, other: &VertexEdge<'a>) -> bool {
        other == self
    }
}

impl<'a> Vertex<'a> {
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.topology.vertex_neighbor_count(self.index)
    }

    #[inline]
    pub fn first_edge(&self) -> VertexEdge<'a> {
        VertexEdge::new(self.topology, self.topology.vertex_first_edge(self.index))
    }

    /// Outgoing edges in rotation order, starting at the first edge.
    pub fn edges(&self) -> VertexEdges<'a> {
        VertexEdges {
            topology: self.topology,
            next: self.topology.vertex_first_edge(self.index),
            remaining: self.neighbor_count(),
        }
    }

    /// Far vertex of every outgoing edge, in rotation order.
    pub fn neighbors(&self) -> impl ExactSizeIterator<Item = Vertex<'a>> + 'a {
        self.edges().map(|e| e.far_vertex())
    }

    /// Faces around the vertex; face `k` lies between edge `k` and `k + 1`.
    pub fn faces(&self) -> impl ExactSizeIterator<Item = Face<'a>> + 'a {
        self.edges().map(|e| e.next_face())
    }

    /// True when the vertex touches an external face.
    pub fn is_boundary(&self) -> bool {
        self.faces().any(|f| f.is_external())
    }
}

impl<'a> Face<'a> {
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.topology.face_neighbor_count(self.index)
    }

    #[inline]
    pub fn first_edge(&self) -> FaceEdge<'a> {
        FaceEdge::new(self.topology, self.topology.face_first_edge(self.index))
    }

    /// Boundary edges in face order, starting at the first edge.
    pub fn edges(&self) -> FaceEdges<'a> {
        FaceEdges {
            topology: self.topology,
            next: self.topology.face_first_edge(self.index),
            remaining: self.neighbor_count(),
        }
    }

    /// Corner vertices in the order the face was declared.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = Vertex<'a>> + 'a {
        self.edges().map(|e| e.next_vertex())
    }

    /// Faces across each side, in face order.
    pub fn neighbors(&self) -> impl ExactSizeIterator<Item = Face<'a>> + 'a {
        self.edges().map(|e| e.far_face())
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        self.topology.is_internal_face(self.index)
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        !self.is_internal()
    }

    /// True when the face shares a side with a face of the other kind.
    pub fn is_boundary(&self) -> bool {
        let internal = self.is_internal();
        self.neighbors().any(|f| f.is_internal() != internal)
    }
}

impl<'a> VertexEdge<'a> {
    #[inline]
    pub fn twin(&self) -> VertexEdge<'a> {
        VertexEdge::new(self.topology, self.topology.twin(self.index))
    }

    /// Next edge clockwise around the near vertex.
    #[inline]
    pub fn next(&self) -> VertexEdge<'a> {
        VertexEdge::new(self.topology, self.topology.v_next(self.index))
    }

    #[inline]
    pub fn prev(&self) -> VertexEdge<'a> {
        VertexEdge::new(self.topology, self.topology.v_prev(self.index))
    }

    #[inline]
    pub fn near_vertex(&self) -> Vertex<'a> {
        Vertex::new(self.topology, self.topology.near_vertex(self.index))
    }

    #[inline]
    pub fn far_vertex(&self) -> Vertex<'a> {
        Vertex::new(self.topology, self.topology.far_vertex(self.index))
    }

    /// Face between the previous edge and this one.
    #[inline]
    pub fn prev_face(&self) -> Face<'a> {
        Face::new(self.topology, self.topology.near_face(self.index))
    }

    /// Face between this edge and the next one.
    #[inline]
    pub fn next_face(&self) -> Face<'a> {
        Face::new(self.topology, self.topology.far_face(self.index))
    }

    /// The same half-edge read around its near face.
    #[inline]
    pub fn face_edge(&self) -> FaceEdge<'a> {
        FaceEdge::new(self.topology, self.index)
    }

    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.face_edge().is_boundary()
    }

    #[inline]
    pub fn is_outer_boundary(&self) -> bool {
        self.face_edge().is_outer_boundary()
    }

    #[inline]
    pub fn is_inner_boundary(&self) -> bool {
        self.face_edge().is_inner_boundary()
    }
}

impl<'a> FaceEdge<'a> {
    #[inline]
    pub fn twin(&self) -> FaceEdge<'a> {
        FaceEdge::new(self.topology, self.topology.twin(self.index))
    }

    /// Next edge around the near face.
    #[inline]
    pub fn next(&self) -> FaceEdge<'a> {
        FaceEdge::new(self.topology, self.topology.f_next(self.index))
    }

    #[inline]
    pub fn prev(&self) -> FaceEdge<'a> {
        FaceEdge::new(self.topology, self.topology.f_prev(self.index))
    }

    #[inline]
    pub fn near_face(&self) -> Face<'a> {
        Face::new(self.topology, self.topology.near_face(self.index))
    }

    #[inline]
    pub fn far_face(&self) -> Face<'a> {
        Face::new(self.topology, self.topology.far_face(self.index))
    }

    /// Corner shared with the previous face edge.
    #[inline]
    pub fn prev_vertex(&self) -> Vertex<'a> {
        Vertex::new(self.topology, self.topology.far_vertex(self.index))
    }

    /// Corner shared with the next face edge.
    #[inline]
    pub fn next_vertex(&self) -> Vertex<'a> {
        Vertex::new(self.topology, self.topology.near_vertex(self.index))
    }

    /// The same half-edge read around its near vertex.
    #[inline]
    pub fn vertex_edge(&self) -> VertexEdge<'a> {
        VertexEdge::new(self.topology, self.index)
    }

    /// Separates an internal face from an external one.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.near_face().is_internal() != self.far_face().is_internal()
    }

    /// Internal near face, external far face.
    #[inline]
    pub fn is_outer_boundary(&self) -> bool {
        self.near_face().is_internal() && self.far_face().is_external()
    }

    /// External near face, internal far face.
    #[inline]
    pub fn is_inner_boundary(&self) -> bool {
        self.near_face().is_external() && self.far_face().is_internal()
    }
}

/// Iterator over the rotation of edges around one vertex.
#[derive(Clone)]
pub struct VertexEdges<'a> {
    topology: &'a Topology,
    next: usize,
    remaining: usize,
}

impl<'a> Iterator for VertexEdges<'a> {
    type Item = VertexEdge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let edge = VertexEdge::new(self.topology, self.next);
        self.next = self.topology.v_next(self.next);
        Some(edge)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for VertexEdges<'_> {}

/// Iterator over the edges bounding one face.
#[derive(Clone)]
pub struct FaceEdges<'a> {
    topology: &'a Topology,
    next: usize,
    remaining: usize,
}

impl<'a> Iterator for FaceEdges<'a> {
    type Item = FaceEdge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let edge = FaceEdge::new(self.topology, self.next);
        self.next = self.topology.f_next(self.next);
        Some(edge)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for FaceEdges<'_> {}
