//! Octant index tables for planes and pillars
//!
//! Octant codes are 3 bits: bit2 = X half, bit1 = Y half, bit0 = Z half.

use super::region::Axis;

/// A pillar of a cube: the axis it runs along and its 2-bit index
pub type PillarId = (Axis, u8);

/// Whether octant `index` lies on `side` of `axis`
pub fn octant_side(index: u8, axis: Axis) -> u8 {
    (index >> axis.octant_shift()) & 1
}

/// Octants covered by the plane `(axis, side)`
pub fn plane_octants(axis: Axis, side: u8) -> [u8; 4] {
    let shift = axis.octant_shift();
    let mut indexes = [0u8; 4];
    for (i, slot) in indexes.iter_mut().enumerate() {
        // spread the 2-bit counter over the two free bits, then force the axis bit
        let i = i as u8;
        let low_mask = (1u8 << shift) - 1;
        let spread = (i & low_mask) | ((i & !low_mask) << 1);
        *slot = (spread & !(1 << shift)) | ((side & 1) << shift);
    }
    indexes
}

/// Octants covered by the pillar `(axis, which)`, same bit order as [`super::Region::pillar`]
pub fn pillar_octants(axis: Axis, which: u8) -> [u8; 2] {
    let hi = (which >> 1) & 1;
    let lo = which & 1;
    match axis {
        Axis::X => {
            let base = (hi << 1) | lo;
            [base, (1 << 2) | base]
        }
        Axis::Y => {
            let base = (hi << 2) | lo;
            [base, base | (1 << 1)]
        }
        Axis::Z => {
            let base = (hi << 2) | (lo << 1);
            [base, base | 1]
        }
    }
}

/// The two pillars along `pillar_axis` that lie in the half `(half_axis, side)`
///
/// `half_axis` must differ from `pillar_axis`.
pub fn pillars_in_half(pillar_axis: Axis, half_axis: Axis, side: u8) -> [u8; 2] {
    debug_assert_ne!(pillar_axis, half_axis);
    let mut found = [0u8; 2];
    let mut n = 0;
    for which in 0..4u8 {
        let [a, b] = pillar_octants(pillar_axis, which);
        if octant_side(a, half_axis) == side && octant_side(b, half_axis) == side {
            found[n] = which;
            n += 1;
        }
    }
    debug_assert_eq!(n, 2);
    found
}

/// Number of unaligned pillar patterns
pub const UNALIGNED_PATTERN_COUNT: usize = 6;

/// Diagonal 4-pillar tilings mixing two pillar axes
///
/// Each pattern splits the cube into two layers across a third axis; the low
/// layer is covered by two pillars along one axis and the high layer by two
/// pillars along the other. Ordered by layer axis, then by which pillar axis
/// takes the low layer.
pub fn unaligned_patterns() -> [[PillarId; 4]; UNALIGNED_PATTERN_COUNT] {
    let mut patterns = [[(Axis::X, 0u8); 4]; UNALIGNED_PATTERN_COUNT];
    let mut n = 0;
    for layer in Axis::ALL {
        let [b, c] = layer.others();
        for (low, high) in [(b, c), (c, b)] {
            let [l0, l1] = pillars_in_half(low, layer, 0);
            let [h0, h1] = pillars_in_half(high, layer, 1);
            patterns[n] = [(low, l0), (low, l1), (high, h0), (high, h1)];
            n += 1;
        }
    }
    patterns
}
