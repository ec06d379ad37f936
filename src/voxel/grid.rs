//! Dense cubic voxel volume

use crate::codec::Lz4Codec;
use crate::core::Result;
use crate::core::types::IVec3;
use crate::export::ExportedChunk;
use crate::math::Region;
use super::voxel::Voxel;

/// Dense cube of voxels with side `2^scale`, addressed from the origin
///
/// Cells are stored x-major, then y, then z, so a region read walks the
/// same order octant codes use.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    scale: u32,
    side: i32,
    cells: Vec<Voxel>,
}

impl VoxelGrid {
    /// Create an empty grid with side `2^scale`
    pub fn new(scale: u32) -> Self {
        let side = 1i32 << scale;
        Self {
            scale,
            side,
            cells: vec![Voxel::EMPTY; (side as usize).pow(3)],
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn side(&self) -> i32 {
        self.side
    }

    /// The whole grid as a region
    pub fn bounds(&self) -> Region {
        Region::cube(IVec3::ZERO, self.scale)
    }

    fn index(&self, p: IVec3) -> Option<usize> {
        if p.cmplt(IVec3::ZERO).any() || p.cmpge(IVec3::splat(self.side)).any() {
            return None;
        }
        let side = self.side as usize;
        Some((p.x as usize * side + p.y as usize) * side + p.z as usize)
    }

    /// Voxel at `p`; outside cells read as empty
    pub fn get(&self, p: IVec3) -> Voxel {
        self.index(p).map(|i| self.cells[i]).unwrap_or(Voxel::EMPTY)
    }

    /// Set the voxel at `p`, returns false if `p` is outside the grid
    pub fn set(&mut self, p: IVec3, voxel: Voxel) -> bool {
        match self.index(p) {
            Some(i) => {
                self.cells[i] = voxel;
                true
            }
            None => false,
        }
    }

    /// Fill the cells of `region` that lie inside the grid
    pub fn fill_region(&mut self, region: &Region, voxel: Voxel) {
        let min = region.origin.max(IVec3::ZERO);
        let max = (region.origin + region.extent()).min(IVec3::splat(self.side));
        for x in min.x..max.x {
            for y in min.y..max.y {
                for z in min.z..max.z {
                    self.set(IVec3::new(x, y, z), voxel);
                }
            }
        }
    }

    /// Copy out the voxels of `region` in x, y, z order
    pub fn region_voxels(&self, region: &Region) -> Vec<Voxel> {
        let extent = region.extent();
        let mut out = Vec::with_capacity(region.volume() as usize);
        for x in 0..extent.x {
            for y in 0..extent.y {
                let row = region.origin + IVec3::new(x, y, 0);
                match (self.index(row), self.index(row + IVec3::new(0, 0, extent.z - 1))) {
                    (Some(start), Some(_)) => {
                        out.extend_from_slice(&self.cells[start..start + extent.z as usize]);
                    }
                    _ => {
                        for z in 0..extent.z {
                            out.push(self.get(row + IVec3::new(0, 0, z)));
                        }
                    }
                }
            }
        }
        out
    }

    /// Write voxels laid out as [`Self::region_voxels`] returns them
    ///
    /// Returns the number of cells written inside the grid.
    pub fn write_region(&mut self, region: &Region, voxels: &[Voxel]) -> usize {
        let extent = region.extent();
        let mut written = 0;
        let mut src = voxels.iter();
        for x in 0..extent.x {
            for y in 0..extent.y {
                for z in 0..extent.z {
                    let Some(&voxel) = src.next() else {
                        return written;
                    };
                    if self.set(region.origin + IVec3::new(x, y, z), voxel) {
                        written += 1;
                    }
                }
            }
        }
        written
    }

    /// Decompress LZ4 chunks into the grid, returns the number of cells written
    pub fn import_chunks(&mut self, chunks: &[ExportedChunk]) -> Result<usize> {
        let mut written = 0;
        for chunk in chunks {
            let voxels = Lz4Codec::unpack(chunk)?;
            written += self.write_region(chunk.region(), &voxels);
        }
        log::debug!("Imported {} chunks, {} cells", chunks.len(), written);
        Ok(written)
    }

    /// Number of non-empty cells
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|v| !v.is_empty()).count()
    }

    /// Raw cell storage, one `side * side` slab per x
    pub(crate) fn cells_mut(&mut self) -> &mut [Voxel] {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Axis;
    use crate::voxel::voxel::material;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = VoxelGrid::new(3);
        assert_eq!(grid.side(), 8);
        assert_eq!(grid.solid_count(), 0);
        assert_eq!(grid.bounds().volume(), 512);
    }

    #[test]
    fn test_get_set() {
        let mut grid = VoxelGrid::new(2);
        let v = Voxel::new(10, 20, 30, material::STONE);
        assert!(grid.set(IVec3::new(1, 2, 3), v));
        assert_eq!(grid.get(IVec3::new(1, 2, 3)), v);
        assert!(!grid.set(IVec3::new(4, 0, 0), v));
        assert_eq!(grid.get(IVec3::new(-1, 0, 0)), Voxel::EMPTY);
    }

    #[test]
    fn test_fill_region_clips() {
        let mut grid = VoxelGrid::new(3);
        let stone = Voxel::new(90, 90, 90, material::STONE);
        grid.fill_region(&Region::cube(IVec3::new(4, 4, 4), 3), stone);
        assert_eq!(grid.solid_count(), 64);
    }

    #[test]
    fn test_region_roundtrip() {
        let mut grid = VoxelGrid::new(3);
        for x in 0..8 {
            for y in 0..8 {
                for z in 0..8 {
                    grid.set(IVec3::new(x, y, z), Voxel::new(x as u8 * 30, y as u8 * 30, z as u8 * 30, 1));
                }
            }
        }
        let pillar = grid.bounds().pillar(Axis::Y, 0b01);
        let voxels = grid.region_voxels(&pillar);
        assert_eq!(voxels.len() as u64, pillar.volume());

        let mut copy = VoxelGrid::new(3);
        assert_eq!(copy.write_region(&pillar, &voxels), voxels.len());
        for x in 0..8 {
            for y in 0..8 {
                for z in 0..8 {
                    let p = IVec3::new(x, y, z);
                    let expected = if pillar.contains(p) { grid.get(p) } else { Voxel::EMPTY };
                    assert_eq!(copy.get(p), expected);
                }
            }
        }
    }
}
