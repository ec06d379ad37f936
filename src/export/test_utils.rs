//! Codec stubs and coverage checks shared by export tests

use std::cell::Cell;

use crate::codec::{PackedRegion, VolumeCodec};
use crate::core::types::IVec3;
use crate::core::{Error, Result};
use crate::math::Region;
use super::chunk::ExportedChunk;

/// Codec whose packed size per region comes from a closure
///
/// `None` declines the region. Unpacked length is the region's cell count and
/// the worst-case bound is `unpacked + 16`.
pub struct SizeStub {
    size_of: Box<dyn Fn(&Region) -> Option<usize>>,
    calls: Cell<usize>,
}

impl SizeStub {
    pub fn new(size_of: impl Fn(&Region) -> Option<usize> + 'static) -> Self {
        Self {
            size_of: Box::new(size_of),
            calls: Cell::new(0),
        }
    }

    /// Every region packs to `packed` bytes
    pub fn uniform(packed: usize) -> Self {
        Self::new(move |_| Some(packed))
    }

    /// Number of `pack` calls so far
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl VolumeCodec for SizeStub {
    fn pack(&self, region: &Region) -> Result<PackedRegion> {
        self.calls.set(self.calls.get() + 1);
        match (self.size_of)(region) {
            Some(packed) => Ok(PackedRegion {
                // tag the payload with the region so distinct chunks differ
                payload: vec![(region.scale() as u8) ^ (region.size.element_sum() as u8); packed],
                unpacked_len: region.volume() as usize,
            }),
            None => Err(Error::Codec {
                region: *region,
                reason: "stub declined".into(),
            }),
        }
    }

    fn worst_case_compressed_size(&self, unpacked_len: usize) -> usize {
        unpacked_len + 16
    }
}

/// Assert `chunks` cover every cell of `cube` exactly once
///
/// Counts membership on a coarse lattice: every chunk boundary is a multiple
/// of the smallest grid in the list, so one sample per smallest cell suffices.
pub fn assert_exact_cover(cube: &Region, chunks: &[ExportedChunk]) {
    let step = chunks.iter().map(|c| c.region().grid).min().unwrap_or(cube.grid);
    let cells = cube.grid / step;
    let mut covered_volume = 0u64;

    for chunk in chunks {
        let r = chunk.region();
        assert!(
            r.origin.cmpge(cube.origin).all()
                && (r.origin + r.extent()).cmple(cube.origin + cube.extent()).all(),
            "chunk {} escapes {}", r, cube
        );
        covered_volume += r.volume();
    }
    assert_eq!(covered_volume, cube.volume(), "chunk volumes do not add up to the cube");

    for x in 0..cells {
        for y in 0..cells {
            for z in 0..cells {
                let p = cube.origin + IVec3::new(x, y, z) * step;
                let hits = chunks.iter().filter(|c| c.region().contains(p)).count();
                assert_eq!(hits, 1, "cell {} covered {} times", p, hits);
            }
        }
    }
}
