//! Voxel data structures

pub mod voxel;
pub mod grid;

pub use voxel::{Voxel, material};
pub use grid::VoxelGrid;
