//! Export configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::VolumeCodec;
use crate::core::{Error, Result};
use crate::terrain::TerrainParams;

/// Largest packed payload a single chunk may carry (64 KiB)
pub const MAX_PACKED_SIZE: usize = 1 << 16;

/// Largest summed worst-case compressed size a merged region may need (1 MiB)
pub const MAX_COMPRESS_BOUND: usize = 1 << 20;

/// Largest world the dense grid will allocate: 1024^3 cells, 4 GiB
pub const MAX_WORLD_SCALE: u32 = 10;

const _: () = assert!(MAX_WORLD_SCALE <= crate::format::MAX_SCALE);

/// Size ceilings and recursion floors for the decomposition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportLimits {
    /// Cubes at or below this scale are never decomposed (recursion floor)
    pub min_scale: u32,
    /// Regions whose grid scale is at or below this are never handed to the codec
    pub min_export_scale: u32,
    /// Ceiling on packed bytes per chunk, and on summed octant packed sizes
    pub max_packed: usize,
    /// Ceiling on summed worst-case compressed sizes of a merge
    pub max_bound: usize,
}

impl Default for ExportLimits {
    fn default() -> Self {
        Self {
            min_scale: 5,
            min_export_scale: 1,
            max_packed: MAX_PACKED_SIZE,
            max_bound: MAX_COMPRESS_BOUND,
        }
    }
}

impl ExportLimits {
    /// Reject limits that make every merge inadmissible or contradict each other
    pub fn validate(&self) -> Result<()> {
        if self.max_packed == 0 || self.max_bound == 0 {
            return Err(Error::Config("size ceilings must be non-zero".into()));
        }
        if self.max_bound < self.max_packed {
            return Err(Error::Config(format!(
                "max_bound ({}) is below max_packed ({})",
                self.max_bound, self.max_packed
            )));
        }
        if self.min_export_scale > self.min_scale {
            return Err(Error::Config(format!(
                "min_export_scale ({}) is above min_scale ({})",
                self.min_export_scale, self.min_scale
            )));
        }
        Ok(())
    }

    /// Validate, then compare the bound ceiling with what the codec guarantees
    pub fn validate_for(&self, codec: &impl VolumeCodec) -> Result<()> {
        self.validate()?;
        let needed = codec.worst_case_compressed_size(self.max_packed);
        if needed > self.max_bound {
            log::warn!(
                "max_bound {} is below the codec bound {} for a full chunk; merges near max_packed will be rejected",
                self.max_bound, needed
            );
        }
        Ok(())
    }
}

/// Top-level export settings, loadable from JSON
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// World edge is `2^world_scale` cells
    pub world_scale: u32,
    pub limits: ExportLimits,
    /// Terrain used by the demo generator
    pub terrain: TerrainParams,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            world_scale: 8,
            limits: ExportLimits::default(),
            terrain: TerrainParams::default(),
        }
    }
}

impl ExportConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: ExportConfig = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.limits.validate()?;
        if self.world_scale > MAX_WORLD_SCALE {
            return Err(Error::Config(format!(
                "world_scale {} is above the maximum of {}",
                self.world_scale, MAX_WORLD_SCALE
            )));
        }
        if self.world_scale <= self.limits.min_scale.saturating_add(1) {
            return Err(Error::Config(format!(
                "world_scale {} leaves no room above the recursion floor {}",
                self.world_scale, self.limits.min_scale
            )));
        }
        Ok(())
    }
}
