//! Per-edge periodic wrap flags and their composition rules.
//!
//! An [`EdgeWrap`] records, for one half-edge, whether walking between the
//! elements it connects crosses a periodic seam. Four relations are tracked,
//! each in its own 4-bit region:
//!
//! | region | relation                     | bits      |
//! |--------|------------------------------|-----------|
//! | `VV`   | near vertex -> far vertex    | `0..4`    |
//! | `VF`   | near vertex -> far face      | `4..8`    |
//! | `FV`   | near face   -> far vertex    | `8..12`   |
//! | `FF`   | near face   -> far face      | `12..16`  |
//!
//! Inside a region, bit 0/1 mark a positive/negative crossing of axis 0 and
//! bit 2/3 the same for axis 1. Chaining two relations ORs their regions and
//! cancels an axis that ends up crossed in both directions.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Seam crossings of one half-edge, one 4-bit region per relation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct EdgeWrap: u16 {
        const VERT_TO_VERT_POS_AXIS0 = 0x0001;
        const VERT_TO_VERT_NEG_AXIS0 = 0x0002;
        const VERT_TO_VERT_POS_AXIS1 = 0x0004;
        const VERT_TO_VERT_NEG_AXIS1 = 0x0008;

        const VERT_TO_FACE_POS_AXIS0 = 0x0010;
        const VERT_TO_FACE_NEG_AXIS0 = 0x0020;
        const VERT_TO_FACE_POS_AXIS1 = 0x0040;
        const VERT_TO_FACE_NEG_AXIS1 = 0x0080;

        const FACE_TO_VERT_POS_AXIS0 = 0x0100;
        const FACE_TO_VERT_NEG_AXIS0 = 0x0200;
        const FACE_TO_VERT_POS_AXIS1 = 0x0400;
        const FACE_TO_VERT_NEG_AXIS1 = 0x0800;

        const FACE_TO_FACE_POS_AXIS0 = 0x1000;
        const FACE_TO_FACE_NEG_AXIS0 = 0x2000;
        const FACE_TO_FACE_POS_AXIS1 = 0x4000;
        const FACE_TO_FACE_NEG_AXIS1 = 0x8000;
    }
}

const REGION_MASK: u16 = 0x000F;
const POSITIVE_BITS: u16 = 0x5555;
const NEGATIVE_BITS: u16 = 0xAAAA;

/// Which of the four relations of an edge a wrap region describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapRelation {
    VertToVert,
    VertToFace,
    FaceToVert,
    FaceToFace,
}

impl WrapRelation {
    pub const ALL: [WrapRelation; 4] = [
        WrapRelation::VertToVert,
        WrapRelation::VertToFace,
        WrapRelation::FaceToVert,
        WrapRelation::FaceToFace,
    ];

    #[inline]
    pub const fn shift(self) -> u32 {
        match self {
            WrapRelation::VertToVert => 0,
            WrapRelation::VertToFace => 4,
            WrapRelation::FaceToVert => 8,
            WrapRelation::FaceToFace => 12,
        }
    }

    /// The same relation seen from the twin edge.
    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            WrapRelation::VertToFace => WrapRelation::FaceToVert,
            WrapRelation::FaceToVert => WrapRelation::VertToFace,
            same => same,
        }
    }
}

/// Drops every axis whose positive and negative bits are both set.
#[inline]
fn cancel(nibble: u16) -> u16 {
    let both = nibble & (nibble >> 1) & 0x5;
    nibble & !(both | (both << 1)) & REGION_MASK
}

impl EdgeWrap {
    /// Builds a wrap with a single relation set from signed axis crossings.
    ///
    /// Each crossing is clamped to its sign: `> 0` positive, `< 0` negative.
    pub fn from_axes(relation: WrapRelation, axis0: i32, axis1: i32) -> Self {
        let mut nibble = 0u16;
        match axis0.signum() {
            1 => nibble |= 0b0001,
            -1 => nibble |= 0b0010,
            _ => {}
        }
        match axis1.signum() {
            1 => nibble |= 0b0100,
            -1 => nibble |= 0b1000,
            _ => {}
        }
        Self::from_bits_retain(nibble << relation.shift())
    }

    /// The 4-bit region of `relation`, shifted down to bits `0..4`.
    #[inline]
    pub fn region(self, relation: WrapRelation) -> u16 {
        (self.bits() >> relation.shift()) & REGION_MASK
    }

    /// Only the bits of `relation`, left in place.
    #[inline]
    pub fn masked(self, relation: WrapRelation) -> Self {
        Self::from_bits_retain(self.bits() & (REGION_MASK << relation.shift()))
    }

    /// Replaces the region of `relation` with the same region of `value`.
    #[inline]
    pub fn with_region(self, relation: WrapRelation, value: EdgeWrap) -> Self {
        let mask = REGION_MASK << relation.shift();
        Self::from_bits_retain((self.bits() & !mask) | (value.bits() & mask))
    }

    /// Signed crossing of `axis` (0 or 1) for `relation`: `1`, `-1` or `0`.
    pub fn axis(self, relation: WrapRelation, axis: usize) -> i32 {
        let nibble = self.region(relation).checked_shr(2 * axis as u32).unwrap_or(0);
        (nibble & 1) as i32 - ((nibble >> 1) & 1) as i32
    }

    /// Swaps the positive and negative direction of every axis in every region.
    #[inline]
    pub fn invert(self) -> Self {
        let bits = self.bits();
        Self::from_bits_retain(((bits & POSITIVE_BITS) << 1) | ((bits & NEGATIVE_BITS) >> 1))
    }

    /// The wrap of the twin edge.
    ///
    /// Directions flip, and the vertex->face and face->vertex regions trade
    /// places since the twin's near elements are this edge's far ones.
    #[inline]
    pub fn reversed(self) -> Self {
        let inv = self.invert().bits();
        Self::from_bits_retain((inv & 0xF00F) | ((inv & 0x00F0) << 4) | ((inv & 0x0F00) >> 4))
    }

    /// True when no relation crosses any seam.
    #[inline]
    pub fn is_unwrapped(self) -> bool {
        self.is_empty()
    }
}

/// Composes the `a_rel` region of `a` with the `b_rel` region of `b` and
/// places the result in region `out`. All other regions of the result are
/// zero.
#[inline]
pub fn chain(
    a: EdgeWrap,
    a_rel: WrapRelation,
    b: EdgeWrap,
    b_rel: WrapRelation,
    out: WrapRelation,
) -> EdgeWrap {
    let nibble = cancel(a.region(a_rel) | b.region(b_rel));
    EdgeWrap::from_bits_retain(nibble << out.shift())
}

/// `vertex -> vertex` followed by `vertex -> vertex`.
#[inline]
pub fn chain_vert_to_vert_to_vert(a: EdgeWrap, b: EdgeWrap) -> EdgeWrap {
    chain(a, WrapRelation::VertToVert, b, WrapRelation::VertToVert, WrapRelation::VertToVert)
}

/// `vertex -> vertex` followed by `vertex -> face`.
#[inline]
pub fn chain_vert_to_vert_to_face(a: EdgeWrap, b: EdgeWrap) -> EdgeWrap {
    chain(a, WrapRelation::VertToVert, b, WrapRelation::VertToFace, WrapRelation::VertToFace)
}

/// `vertex -> face` followed by `face -> face`.
#[inline]
pub fn chain_vert_to_face_to_face(a: EdgeWrap, b: EdgeWrap) -> EdgeWrap {
    chain(a, WrapRelation::VertToFace, b, WrapRelation::FaceToFace, WrapRelation::VertToFace)
}

/// `face -> vertex` followed by `vertex -> vertex`.
#[inline]
pub fn chain_face_to_vert_to_vert(a: EdgeWrap, b: EdgeWrap) -> EdgeWrap {
    chain(a, WrapRelation::FaceToVert, b, WrapRelation::VertToVert, WrapRelation::FaceToVert)
}

/// `face -> face` followed by `face -> vertex`.
#[inline]
pub fn chain_face_to_face_to_vert(a: EdgeWrap, b: EdgeWrap) -> EdgeWrap {
    chain(a, WrapRelation::FaceToFace, b, WrapRelation::FaceToVert, WrapRelation::FaceToVert)
}

/// `face -> face` followed by `face -> face`.
#[inline]
pub fn chain_face_to_face_to_face(a: EdgeWrap, b: EdgeWrap) -> EdgeWrap {
    chain(a, WrapRelation::FaceToFace, b, WrapRelation::FaceToFace, WrapRelation::FaceToFace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_crossings_cancel() {
        let pos = EdgeWrap::VERT_TO_VERT_POS_AXIS0;
        let neg = EdgeWrap::VERT_TO_VERT_NEG_AXIS0;
        assert_eq!(chain_vert_to_vert_to_vert(pos, neg), EdgeWrap::empty());
        assert_eq!(chain_vert_to_vert_to_vert(pos, pos), pos);
    }

    #[test]
    fn cancellation_is_per_axis() {
        let a = EdgeWrap::FACE_TO_FACE_POS_AXIS0 | EdgeWrap::FACE_TO_FACE_POS_AXIS1;
        let b = EdgeWrap::FACE_TO_FACE_NEG_AXIS0;
        assert_eq!(chain_face_to_face_to_face(a, b), EdgeWrap::FACE_TO_FACE_POS_AXIS1);
    }

    #[test]
    fn chain_moves_operands_into_output_region() {
        let vv = EdgeWrap::VERT_TO_VERT_POS_AXIS1;
        let vf = EdgeWrap::VERT_TO_FACE_NEG_AXIS0;
        let out = chain_vert_to_vert_to_face(vv, vf);
        assert_eq!(
            out,
            EdgeWrap::VERT_TO_FACE_POS_AXIS1 | EdgeWrap::VERT_TO_FACE_NEG_AXIS0
        );
        // unrelated regions of the operands never leak through
        let noisy = vv | EdgeWrap::FACE_TO_FACE_POS_AXIS0;
        assert_eq!(chain_vert_to_vert_to_face(noisy, vf), out);
    }

    #[test]
    fn chain_is_associative_without_saturation() {
        let x = EdgeWrap::from_axes(WrapRelation::VertToVert, 1, 0);
        let y = EdgeWrap::from_axes(WrapRelation::VertToVert, 0, -1);
        let z = EdgeWrap::from_axes(WrapRelation::VertToVert, -1, 0);
        let left = chain_vert_to_vert_to_vert(chain_vert_to_vert_to_vert(x, y), z);
        let right = chain_vert_to_vert_to_vert(x, chain_vert_to_vert_to_vert(y, z));
        assert_eq!(left, right);
        assert_eq!(left, EdgeWrap::VERT_TO_VERT_NEG_AXIS1);
    }

    #[test]
    fn unwrapped_operands_are_identity() {
        let w = EdgeWrap::FACE_TO_VERT_NEG_AXIS1;
        assert_eq!(chain_face_to_vert_to_vert(w, EdgeWrap::empty()), w);
        assert_eq!(chain_face_to_face_to_vert(EdgeWrap::empty(), w), w);
        assert_eq!(
            chain_vert_to_face_to_face(EdgeWrap::empty(), EdgeWrap::empty()),
            EdgeWrap::empty()
        );
    }

    #[test]
    fn invert_swaps_directions() {
        let w = EdgeWrap::VERT_TO_VERT_POS_AXIS0 | EdgeWrap::FACE_TO_VERT_NEG_AXIS1;
        assert_eq!(
            w.invert(),
            EdgeWrap::VERT_TO_VERT_NEG_AXIS0 | EdgeWrap::FACE_TO_VERT_POS_AXIS1
        );
        assert_eq!(w.invert().invert(), w);
    }

    #[test]
    fn reversed_swaps_mixed_regions() {
        let w = EdgeWrap::VERT_TO_FACE_POS_AXIS0 | EdgeWrap::FACE_TO_FACE_NEG_AXIS1;
        assert_eq!(
            w.reversed(),
            EdgeWrap::FACE_TO_VERT_NEG_AXIS0 | EdgeWrap::FACE_TO_FACE_POS_AXIS1
        );
        assert_eq!(w.reversed().reversed(), w);
    }

    #[test]
    fn axis_reads_signed_crossings() {
        let w = EdgeWrap::from_axes(WrapRelation::FaceToVert, -3, 2);
        assert_eq!(w.axis(WrapRelation::FaceToVert, 0), -1);
        assert_eq!(w.axis(WrapRelation::FaceToVert, 1), 1);
        assert_eq!(w.axis(WrapRelation::VertToVert, 0), 0);
        assert_eq!(w.region(WrapRelation::FaceToVert), 0b0110);
    }

    #[test]
    fn with_region_only_touches_one_region() {
        let base = EdgeWrap::all();
        let out = base.with_region(WrapRelation::VertToFace, EdgeWrap::empty());
        assert_eq!(out.region(WrapRelation::VertToFace), 0);
        for rel in [WrapRelation::VertToVert, WrapRelation::FaceToVert, WrapRelation::FaceToFace] {
            assert_eq!(out.region(rel), 0xF);
        }
        assert_eq!(WrapRelation::VertToFace.reversed(), WrapRelation::FaceToVert);
        assert_eq!(base.masked(WrapRelation::FaceToFace).bits(), 0xF000);
    }
}
