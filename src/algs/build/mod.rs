//! One-shot builders that turn unvalidated connectivity input into a
//! [`Topology`](crate::topology::Topology).
//!
//! - [`FaceVertexBuilder`]: faces given as clockwise vertex lists; open
//!   boundaries are closed with external faces.
//! - [`VertexVertexBuilder`]: vertices given as clockwise neighbor lists;
//!   the result is always closed.
//!
//! Both builders borrow themselves in `build()`, so the same input can be
//! extended and rebuilt.

pub mod face_vertex;
pub mod vertex_vertex;

pub use face_vertex::FaceVertexBuilder;
pub use vertex_vertex::VertexVertexBuilder;

use crate::mesh_error::{ElementKind, TopologyError};

/// Knobs shared by both builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Run a full structural validation of the result before returning it.
    pub validate: bool,
    /// Accept boundary vertices shared by several open fans (bow-tie
    /// corners). Their fans are stitched into one rotation.
    pub allow_pinched_vertices: bool,
    /// Smallest accepted internal face. Values below 3 are treated as 3.
    pub min_face_sides: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            validate: true,
            allow_pinched_vertices: false,
            min_face_sides: 3,
        }
    }
}

impl BuildOptions {
    #[inline]
    pub(crate) fn effective_min_face_sides(&self) -> usize {
        self.min_face_sides.max(3)
    }
}

/// Neighbor counts are stored as `u16`.
#[inline]
pub(crate) fn checked_count(kind: ElementKind, index: usize, count: usize) -> Result<u16, TopologyError> {
    u16::try_from(count).map_err(|_| TopologyError::NeighborCountOverflow { kind, index, count })
}

/// Inserts `items` right after the first occurrence of `anchor` in `list`.
pub(crate) fn insert_after(
    list: &mut Vec<usize>,
    anchor: usize,
    items: impl IntoIterator<Item = usize>,
    kind: ElementKind,
    index: usize,
) -> Result<(), TopologyError> {
    let pos = list
        .iter()
        .position(|&x| x == anchor)
        .ok_or(TopologyError::MissingAnchor { kind, index, anchor })?;
    let tail = list.split_off(pos + 1);
    list.extend(items);
    list.extend(tail);
    Ok(())
}
