//! Octree geometry and indexing

pub mod region;
pub mod octant;

pub use region::{Axis, Region};
pub use octant::{
    PillarId, octant_side, plane_octants, pillar_octants, pillars_in_half,
    unaligned_patterns, UNALIGNED_PATTERN_COUNT,
};
