//! `EdgeRecord`: the flat connectivity record behind every half-edge.
//!
//! A topology stores one record per directed half-edge in a single `Vec`.
//! Each record only names the *far* vertex and *far* face; the near ones are
//! recovered through the twin. The same record is read two ways:
//!
//! - as a vertex edge, `v_next` walks the edges around its near vertex;
//! - as a face edge, `f_next` walks the edges around its near face.
//!
//! With `far_face(e)` being the face between `e` and `v_next(e)`, the two
//! rotations are tied together by `f_next(e) = twin(v_prev(e))`, which makes
//! both "previous" lookups constant time:
//!
//! - `v_prev(e) = twin(f_next(e))`
//! - `f_prev(e) = v_next(twin(e))`

use bytemuck::{Pod, Zeroable};

/// One directed half-edge. All fields are indices into the owning topology.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, serde::Serialize, serde::Deserialize,
)]
#[repr(C)]
pub struct EdgeRecord {
    pub twin: u32,
    pub v_next: u32,
    pub f_next: u32,
    pub far_vertex: u32,
    pub far_face: u32,
}

impl EdgeRecord {
    #[inline]
    pub fn new(twin: usize, v_next: usize, f_next: usize, far_vertex: usize, far_face: usize) -> Self {
        Self {
            twin: twin as u32,
            v_next: v_next as u32,
            f_next: f_next as u32,
            far_vertex: far_vertex as u32,
            far_face: far_face as u32,
        }
    }

    #[inline]
    pub fn twin(&self) -> usize {
        self.twin as usize
    }

    #[inline]
    pub fn v_next(&self) -> usize {
        self.v_next as usize
    }

    #[inline]
    pub fn f_next(&self) -> usize {
        self.f_next as usize
    }

    #[inline]
    pub fn far_vertex(&self) -> usize {
        self.far_vertex as usize
    }

    #[inline]
    pub fn far_face(&self) -> usize {
        self.far_face as usize
    }
}

/// Index sentinel used by builders for links that are not resolved yet.
pub(crate) const UNSET: u32 = u32::MAX;
