//! Half-edge topology: the edge record, the `Topology` container, typed
//! handles, per-element attributes and periodic wrap flags.
//!
//! Most users build a [`Topology`] with one of the builders in
//! [`crate::algs::build`] and then walk it through [`Vertex`], [`Face`],
//! [`VertexEdge`] and [`FaceEdge`] handles.

pub mod attributes;
pub mod dual;
pub mod edge;
pub mod handles;
#[allow(clippy::module_inception)]
pub mod topology;
pub mod validation;
pub mod wrap;

pub use attributes::{
    Attribute, AttributeArray, EdgeAttribute, ElementIndex, FaceAttribute, VertexAttribute,
};
pub use edge::EdgeRecord;
pub use handles::{Face, FaceEdge, FaceEdges, Vertex, VertexEdge, VertexEdges};
pub use topology::Topology;
pub use validation::{TopologyValidationOptions, validate_topology, validate_wrap};
pub use wrap::{EdgeWrap, WrapRelation};

#[cfg(test)]
mod tests;
