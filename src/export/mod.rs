//! Octree export: region compression, cube decomposition and map assembly

pub mod config;
pub mod chunk;
pub mod decompose;
pub mod map;

#[cfg(test)]
pub mod test_utils;

pub use config::{ExportConfig, ExportLimits, MAX_COMPRESS_BOUND, MAX_PACKED_SIZE, MAX_WORLD_SCALE};
pub use chunk::{ExportedChunk, OctantCost, OctantCosts, RegionExporter, packed_total};
pub use decompose::Decomposer;
pub use map::{
    LogProgress, MapExporter, MapSummary, Progress, check_output_path, export_map_command, prepare_map,
};
