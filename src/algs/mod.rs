//! Algorithms over [`Topology`](crate::topology::Topology): construction,
//! generators and local edits.

pub mod build;
pub mod euler;
pub mod meshgen;
#[cfg(feature = "rand")]
pub mod perturb;

pub use build::{BuildOptions, FaceVertexBuilder, VertexVertexBuilder};
pub use euler::{PivotKind, SpinKind};
