//! LZ4 block codec over a dense voxel grid

use crate::core::{Error, Result};
use crate::export::ExportedChunk;
use crate::math::Region;
use crate::voxel::{Voxel, VoxelGrid};
use super::{PackedRegion, VolumeCodec};

/// Largest worst-case output the codec agrees to allocate (1 MiB)
pub const DEFAULT_MAX_INPUT_BOUND: usize = 1 << 20;

const VOXEL_BYTES: usize = std::mem::size_of::<Voxel>();

/// Packs grid regions with `lz4_flex` block compression
pub struct Lz4Codec<'a> {
    grid: &'a VoxelGrid,
    max_input_bound: usize,
}

impl<'a> Lz4Codec<'a> {
    pub fn new(grid: &'a VoxelGrid) -> Self {
        Self {
            grid,
            max_input_bound: DEFAULT_MAX_INPUT_BOUND,
        }
    }

    /// Override the worst-case output size above which regions are declined
    pub fn with_max_input_bound(mut self, max_input_bound: usize) -> Self {
        self.max_input_bound = max_input_bound;
        self
    }

    pub fn max_input_bound(&self) -> usize {
        self.max_input_bound
    }

    /// Decompress a chunk back into voxels in region order
    pub fn unpack(chunk: &ExportedChunk) -> Result<Vec<Voxel>> {
        let region = chunk.region();
        let expected = region.volume() as usize * VOXEL_BYTES;
        if chunk.unpacked_len() != expected {
            return Err(Error::Format(format!(
                "chunk {} unpacks to {} bytes, region needs {}",
                region, chunk.unpacked_len(), expected
            )));
        }

        let raw = lz4_flex::block::decompress(chunk.payload(), chunk.unpacked_len())
            .map_err(|e| Error::Format(format!("LZ4 decompression failed for {}: {}", region, e)))?;
        if raw.len() != expected {
            return Err(Error::Format(format!(
                "chunk {} decompressed to {} bytes, expected {}",
                region, raw.len(), expected
            )));
        }

        Ok(raw
            .chunks_exact(VOXEL_BYTES)
            .map(bytemuck::pod_read_unaligned::<Voxel>)
            .collect())
    }
}

impl VolumeCodec for Lz4Codec<'_> {
    fn pack(&self, region: &Region) -> Result<PackedRegion> {
        let unpacked_len = region.volume() as usize * VOXEL_BYTES;
        let bound = self.worst_case_compressed_size(unpacked_len);
        if bound > self.max_input_bound {
            return Err(Error::Codec {
                region: *region,
                reason: format!("worst-case size {} exceeds {}", bound, self.max_input_bound),
            });
        }

        let voxels = self.grid.region_voxels(region);
        let payload = lz4_flex::block::compress(bytemuck::cast_slice(&voxels));

        Ok(PackedRegion { payload, unpacked_len })
    }

    fn worst_case_compressed_size(&self, unpacked_len: usize) -> usize {
        lz4_flex::block::get_maximum_output_size(unpacked_len)
    }
}
