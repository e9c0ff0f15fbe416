#![cfg_attr(docsrs, feature(doc_cfg))]
//! # polygon-topology
//!
//! polygon-topology is a half-edge connectivity engine for generalized polygon
//! meshes. It represents the combinatorics of a 2-manifold, with or without
//! boundary, subdivided into polygonal faces. It stores no positions.
//!
//! ## Features
//! - Flat, index-addressed half-edge storage with typed vertex/face handles
//! - Builders from per-face vertex lists and per-vertex neighbor lists
//! - In-place combinatorial dual
//! - Pivot and spin edit operators with checked preconditions
//! - Per-edge periodic wrap flags that stay consistent under edits
//! - Dense attribute arrays keyed by handles
//!
//! ## Invariants
//!
//! Every topology handed out by a builder, the dual transform or an edit
//! operator satisfies:
//! - `twin(twin(e)) == e` and `twin(e) != e`;
//! - each vertex and face rotation has exactly as many edges as its
//!   neighbor count, and every edge lies in one of each;
//! - faces below `first_external_face_index` are internal, the rest close
//!   open boundaries.
//!
//! Debug builds (or the `strict-invariants` / `check-invariants` features)
//! re-validate these after every mutation.
//!
//! ## Usage
//!
//! ```
//! use polygon_topology::prelude::*;
//!
//! let mut builder = FaceVertexBuilder::new();
//! builder.add_face([0, 1, 2]);
//! builder.add_face([0, 2, 3]);
//! builder.add_face([0, 3, 1]);
//! builder.add_face([1, 3, 2]);
//! let tetra = builder.build()?;
//! assert_eq!(tetra.euler_characteristic(), 2);
//! assert!(tetra.vertices().all(|v| v.neighbor_count() == 3));
//! # Ok::<(), polygon_topology::mesh_error::TopologyError>(())
//! ```

pub mod algs;
pub mod debug_invariants;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::build::{BuildOptions, FaceVertexBuilder, VertexVertexBuilder};
    pub use crate::algs::euler::{PivotKind, SpinKind};
    pub use crate::algs::meshgen::{self, GridWrap};
    #[cfg(feature = "rand")]
    pub use crate::algs::perturb::spin_random_edges;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::TopologyError;
    pub use crate::topology::attributes::{
        Attribute, AttributeArray, EdgeAttribute, FaceAttribute, VertexAttribute,
    };
    pub use crate::topology::handles::{Face, FaceEdge, Vertex, VertexEdge};
    pub use crate::topology::topology::Topology;
    pub use crate::topology::validation::{
        TopologyValidationOptions, validate_topology, validate_wrap,
    };
    pub use crate::topology::wrap::{EdgeWrap, WrapRelation};
}
