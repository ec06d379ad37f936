//! Chunked - octree voxel world export into CHUNKED map files

pub mod core;
pub mod math;
pub mod voxel;
pub mod codec;
pub mod export;
pub mod format;
pub mod entity;
pub mod vars;
pub mod terrain;
