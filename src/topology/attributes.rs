//! Dense per-element attribute arrays.
//!
//! Attribute data lives outside the [`Topology`] in plain vectors indexed by
//! element index. The element kind is tracked in the type, so a
//! [`VertexAttribute`] can be indexed by a `usize` or a [`Vertex`] handle but
//! not by a [`Face`].

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::mesh_error::{ElementKind, TopologyError};
use crate::topology::handles::{Face, FaceEdge, Vertex, VertexEdge};
use crate::topology::topology::Topology;

/// Minimal read/write capability over an indexed attribute store.
pub trait Attribute<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Panics if `index` is out of range.
    fn get(&self, index: usize) -> &T;

    /// Panics if `index` is out of range.
    fn set(&mut self, index: usize, value: T);

    fn try_get(&self, index: usize) -> Result<&T, TopologyError>;

    fn try_set(&mut self, index: usize, value: T) -> Result<(), TopologyError>;
}

/// The element kind an attribute array is attached to.
pub trait AttributeDomain {
    const KIND: ElementKind;
}

/// Marker for arrays with one entry per vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnVertices;

/// Marker for arrays with one entry per face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnFaces;

/// Marker for arrays with one entry per half-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnEdges;

impl AttributeDomain for OnVertices {
    const KIND: ElementKind = ElementKind::Vertex;
}

impl AttributeDomain for OnFaces {
    const KIND: ElementKind = ElementKind::Face;
}

impl AttributeDomain for OnEdges {
    const KIND: ElementKind = ElementKind::Edge;
}

/// Anything that names an element of domain `D`.
pub trait ElementIndex<D> {
    fn element_index(&self) -> usize;
}

impl<D: AttributeDomain> ElementIndex<D> for usize {
    #[inline]
    fn element_index(&self) -> usize {
        *self
    }
}

impl ElementIndex<OnVertices> for Vertex<'_> {
    #[inline]
    fn element_index(&self) -> usize {
        self.index()
    }
}

impl ElementIndex<OnFaces> for Face<'_> {
    #[inline]
    fn element_index(&self) -> usize {
        self.index()
    }
}

impl ElementIndex<OnEdges> for VertexEdge<'_> {
    #[inline]
    fn element_index(&self) -> usize {
        self.index()
    }
}

impl ElementIndex<OnEdges> for FaceEdge<'_> {
    #[inline]
    fn element_index(&self) -> usize {
        self.index()
    }
}

/// A dense array holding one `T` per element of domain `D`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct AttributeArray<T, D> {
    values: Vec<T>,
    #[serde(skip)]
    domain: PhantomData<D>,
}

pub type VertexAttribute<T> = AttributeArray<T, OnVertices>;
pub type FaceAttribute<T> = AttributeArray<T, OnFaces>;
pub type EdgeAttribute<T> = AttributeArray<T, OnEdges>;

impl<T, D: AttributeDomain> AttributeArray<T, D> {
    /// Wraps existing values without checking them against a topology.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            values,
            domain: PhantomData,
        }
    }

    /// Wraps `values`, requiring one entry per element of `topology`.
    pub fn from_vec_for(topology: &Topology, values: Vec<T>) -> Result<Self, TopologyError> {
        let expected = topology.len_of(D::KIND);
        if values.len() != expected {
            return Err(TopologyError::AttributeLengthMismatch {
                expected,
                found: values.len(),
            });
        }
        Ok(Self::from_vec(values))
    }

    /// One copy of `value` per element of `topology`.
    pub fn filled(topology: &Topology, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_vec(vec![value; topology.len_of(D::KIND)])
    }

    /// Errors unless the array has one entry per element of `topology`.
    pub fn check_len(&self, topology: &Topology) -> Result<(), TopologyError> {
        let expected = topology.len_of(D::KIND);
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(TopologyError::AttributeLengthMismatch {
                expected,
                found: self.values.len(),
            })
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T: Clone + Default> AttributeArray<T, OnVertices> {
    pub fn for_vertices(topology: &Topology) -> Self {
        Self::filled(topology, T::default())
    }
}

impl<T: Clone + Default> AttributeArray<T, OnFaces> {
    pub fn for_faces(topology: &Topology) -> Self {
        Self::filled(topology, T::default())
    }
}

impl<T: Clone + Default> AttributeArray<T, OnEdges> {
    pub fn for_edges(topology: &Topology) -> Self {
        Self::filled(topology, T::default())
    }
}

impl<T, D: AttributeDomain> Attribute<T> for AttributeArray<T, D> {
    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn get(&self, index: usize) -> &T {
        &self.values[index]
    }

    #[inline]
    fn set(&mut self, index: usize, value: T) {
        self.values[index] = value;
    }

    fn try_get(&self, index: usize) -> Result<&T, TopologyError> {
        let len = self.values.len();
        self.values.get(index).ok_or(TopologyError::OutOfRange {
            kind: D::KIND,
            index,
            len,
        })
    }

    fn try_set(&mut self, index: usize, value: T) -> Result<(), TopologyError> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(TopologyError::OutOfRange {
                kind: D::KIND,
                index,
                len,
            }),
        }
    }
}

impl<T, D: AttributeDomain, I: ElementIndex<D>> Index<I> for AttributeArray<T, D> {
    type Output = T;

    #[inline]
    fn index(&self, index: I) -> &T {
        &self.values[index.element_index()]
    }
}

impl<T, D: AttributeDomain, I: ElementIndex<D>> IndexMut<I> for AttributeArray<T, D> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut T {
        &mut self.values[index.element_index()]
    }
}
