//! Noise-based procedural terrain generation

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::voxel::voxel::{Voxel, material};
use crate::voxel::VoxelGrid;

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: u32,
    pub scale: f32,        // Horizontal scale (larger = smoother)
    pub height_scale: f32, // Vertical scale (max height)
    pub octaves: u32,      // FBM octaves (detail levels)
    pub persistence: f32,  // FBM persistence (0.5 typical)
    pub lacunarity: f32,   // FBM lacunarity (2.0 typical)
    pub sea_level: f32,    // Height below which is "water"
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 100.0,
            height_scale: 64.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            sea_level: 32.0,
        }
    }
}

/// Cells of dirt under the grass layer
const DIRT_DEPTH: i32 = 3;

/// Procedural terrain generator using fractal Brownian motion (FBM)
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    /// Create a new terrain generator with the given parameters
    pub fn new(params: TerrainParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    /// Get terrain parameters
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Get terrain height at world position (x, z)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        // Sample noise in normalized coordinates
        let nx = (x / self.params.scale) as f64;
        let nz = (z / self.params.scale) as f64;

        // Get noise value in range [-1, 1]
        let noise_value = self.noise.get([nx, nz]);

        // Map to height range [0, height_scale]
        let normalized = ((noise_value + 1.0) / 2.0).clamp(0.0, 1.0);
        (normalized * self.params.height_scale as f64) as f32
    }

    /// Voxel at height `y` in a column whose top solid cell is `surface`
    fn column_voxel(&self, y: i32, surface: i32) -> Voxel {
        let depth = surface - y;
        let underwater = (surface as f32) < self.params.sea_level;
        if depth < 0 {
            if (y as f32) < self.params.sea_level {
                Voxel::new(40, 90, 160, material::WATER)
            } else {
                Voxel::EMPTY
            }
        } else if depth == 0 && !underwater {
            Voxel::new(100, 180, 80, material::GRASS)
        } else if depth <= DIRT_DEPTH {
            Voxel::new(130, 100, 70, material::DIRT)
        } else {
            Voxel::new(120, 120, 120, material::STONE)
        }
    }

    /// Fill `grid` with terrain, Y up, one parallel task per X slab
    pub fn fill_grid(&self, grid: &mut VoxelGrid) {
        let side = grid.side();
        let slab = (side * side) as usize;

        grid.cells_mut()
            .par_chunks_mut(slab)
            .enumerate()
            .for_each(|(x, cells)| {
                for z in 0..side {
                    let surface = self.height_at(x as f32, z as f32).floor() as i32;
                    for y in 0..side {
                        cells[(y * side + z) as usize] = self.column_voxel(y, surface);
                    }
                }
            });

        log::info!(
            "Generated terrain {}^3 (seed {}), {} solid cells",
            side, self.params.seed, grid.solid_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;

    #[test]
    fn test_terrain_params_default() {
        let params = TerrainParams::default();
        assert_eq!(params.seed, 12345);
        assert_eq!(params.scale, 100.0);
        assert_eq!(params.height_scale, 64.0);
        assert_eq!(params.octaves, 4);
        assert_eq!(params.sea_level, 32.0);
    }

    #[test]
    fn test_height_at() {
        let generator = TerrainGenerator::new(TerrainParams::default());

        let height = generator.height_at(0.0, 0.0);
        assert!((0.0..=64.0).contains(&height));
        assert_eq!(height, generator.height_at(0.0, 0.0));

        let height = generator.height_at(100.0, 100.0);
        assert!((0.0..=64.0).contains(&height));
    }

    #[test]
    fn test_different_seeds() {
        let gen1 = TerrainGenerator::new(TerrainParams { seed: 1, ..Default::default() });
        let gen2 = TerrainGenerator::new(TerrainParams { seed: 2, ..Default::default() });
        assert_ne!(gen1.height_at(50.0, 50.0), gen2.height_at(50.0, 50.0));
    }

    #[test]
    fn test_params_from_partial_json() {
        let params: TerrainParams = serde_json::from_str(r#"{ "seed": 7, "height_scale": 20.0 }"#).unwrap();
        assert_eq!(params.seed, 7);
        assert_eq!(params.height_scale, 20.0);
        assert_eq!(params.octaves, 4);
    }

    #[test]
    fn test_fill_grid_columns() {
        let generator = TerrainGenerator::new(TerrainParams {
            height_scale: 24.0,
            sea_level: 4.0,
            ..Default::default()
        });
        let mut grid = VoxelGrid::new(5);
        generator.fill_grid(&mut grid);

        for (x, z) in [(0, 0), (7, 19), (31, 31)] {
            let surface = generator.height_at(x as f32, z as f32).floor() as i32;
            assert!(!grid.get(IVec3::new(x, 0, z)).is_empty());
            if surface > DIRT_DEPTH {
                assert_eq!(grid.get(IVec3::new(x, 0, z)).material_id, material::STONE);
            }
            assert!(grid.get(IVec3::new(x, 31, z)).is_empty());
            if surface >= 4 {
                assert_eq!(grid.get(IVec3::new(x, surface, z)).material_id, material::GRASS);
                assert!(grid.get(IVec3::new(x, surface + 1, z)).is_empty());
            }
        }
    }

    #[test]
    fn test_fill_grid_is_deterministic() {
        let generator = TerrainGenerator::new(TerrainParams::default());
        let mut a = VoxelGrid::new(4);
        let mut b = VoxelGrid::new(4);
        generator.fill_grid(&mut a);
        generator.fill_grid(&mut b);
        assert_eq!(a, b);
    }
}
