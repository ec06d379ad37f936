//! Single-region export and merge admissibility

use crate::codec::{PackedRegion, VolumeCodec};
use crate::core::{Error, Result};
use crate::math::{Axis, Region};
use super::config::ExportLimits;

/// One successfully compressed region
///
/// Owned by the strategy that produced it until moved into the output;
/// dropping it releases the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedChunk {
    region: Region,
    unpacked_len: usize,
    payload: Vec<u8>,
}

impl ExportedChunk {
    pub fn new(region: Region, packed: PackedRegion) -> Self {
        Self {
            region,
            unpacked_len: packed.unpacked_len,
            payload: packed.payload,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn unpacked_len(&self) -> usize {
        self.unpacked_len
    }

    pub fn packed_len(&self) -> usize {
        self.payload.len()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Total packed size of a chunk list
pub fn packed_total(chunks: &[ExportedChunk]) -> usize {
    chunks.iter().map(ExportedChunk::packed_len).sum()
}

/// Recorded cost of exporting one octant on its own
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OctantCost {
    /// The octant could not be exported directly
    Failed,
    /// Already covered by a chunk in the current candidate
    Consumed,
    Sized { packed: usize, unpacked: usize },
}

/// Per-invocation cost table for the 8 octants of a cube
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctantCosts([OctantCost; 8]);

impl OctantCosts {
    pub fn new(costs: [OctantCost; 8]) -> Self {
        Self(costs)
    }

    pub fn get(&self, index: u8) -> OctantCost {
        self.0[index as usize]
    }

    /// Pre-flight check for merging the octants in `indexes` into one region
    ///
    /// Every octant must be individually exportable, the packed sizes must sum
    /// to at most `max_packed` and the codec's worst-case bounds to at most
    /// `max_bound`.
    pub fn can_export(&self, indexes: &[u8], limits: &ExportLimits, codec: &impl VolumeCodec) -> bool {
        let mut packed_total = 0usize;
        let mut bound_total = 0usize;
        for &i in indexes {
            let OctantCost::Sized { packed, unpacked } = self.get(i) else {
                return false;
            };
            if packed == 0 || unpacked == 0 {
                return false;
            }
            packed_total += packed;
            bound_total += codec.worst_case_compressed_size(unpacked);
            if packed_total > limits.max_packed || bound_total > limits.max_bound {
                return false;
            }
        }
        true
    }

    pub fn consume(&mut self, indexes: &[u8]) {
        for &i in indexes {
            self.0[i as usize] = OctantCost::Consumed;
        }
    }

    pub fn is_consumed(&self, index: u8) -> bool {
        self.get(index) == OctantCost::Consumed
    }
}

/// Wraps a codec and turns regions into [`ExportedChunk`]s within the limits
pub struct RegionExporter<C> {
    codec: C,
    limits: ExportLimits,
}

impl<C: VolumeCodec> RegionExporter<C> {
    pub fn new(codec: C, limits: ExportLimits) -> Self {
        Self { codec, limits }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn limits(&self) -> &ExportLimits {
        &self.limits
    }

    /// Compress a single region, not recursive
    pub fn try_export(&self, region: Region) -> Result<ExportedChunk> {
        if region.scale() <= self.limits.min_export_scale {
            return Err(Error::RegionTooSmall(region));
        }

        let packed = self.codec.pack(&region)?;
        if packed.packed_len() > self.limits.max_packed {
            log::debug!(
                "{} packed to {} bytes, over the {} byte ceiling",
                region, packed.packed_len(), self.limits.max_packed
            );
            return Err(Error::SizeInadmissible(region));
        }

        Ok(ExportedChunk::new(region, packed))
    }

    /// Try `try_export`, treating local failures as `None`
    pub fn export_region(&self, region: Region) -> Option<ExportedChunk> {
        match self.try_export(region) {
            Ok(chunk) => Some(chunk),
            Err(e) => {
                log::trace!("{}", e);
                None
            }
        }
    }

    pub fn export_cube(&self, cube: &Region) -> Option<ExportedChunk> {
        self.export_region(*cube)
    }

    pub fn export_plane(&self, cube: &Region, axis: Axis, side: u8) -> Option<ExportedChunk> {
        self.export_region(cube.plane(axis, side))
    }

    pub fn export_pillar(&self, cube: &Region, axis: Axis, which: u8) -> Option<ExportedChunk> {
        self.export_region(cube.pillar(axis, which))
    }

    /// Export each octant directly and record its sizes
    ///
    /// The chunks are returned too so a leftover octant can reuse its own
    /// direct export instead of packing it again.
    pub fn octant_costs(&self, cube: &Region) -> (OctantCosts, [Option<ExportedChunk>; 8]) {
        let mut costs = [OctantCost::Failed; 8];
        let chunks: [Option<ExportedChunk>; 8] = std::array::from_fn(|i| {
            let chunk = self.export_region(cube.sub_octant(i as u8));
            if let Some(chunk) = &chunk {
                costs[i] = OctantCost::Sized {
                    packed: chunk.packed_len(),
                    unpacked: chunk.unpacked_len(),
                };
            }
            chunk
        });
        (OctantCosts::new(costs), chunks)
    }

    /// Pre-flight check against this exporter's codec and limits
    pub fn can_export(&self, costs: &OctantCosts, indexes: &[u8]) -> bool {
        costs.can_export(indexes, &self.limits, &self.codec)
    }
}
