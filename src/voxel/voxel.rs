//! Voxel cell value

use bytemuck::{Pod, Zeroable};

/// Pack an RGB888 color into RGB565
pub fn rgb_to_565(r: u8, g: u8, b: u8) -> u16 {
    let r5 = (r as u16 >> 3) & 0x1F;
    let g6 = (g as u16 >> 2) & 0x3F;
    let b5 = (b as u16 >> 3) & 0x1F;
    (r5 << 11) | (g6 << 5) | b5
}

/// Material ids used by generated worlds
pub mod material {
    pub const AIR: u8 = 0;
    pub const STONE: u8 = 1;
    pub const DIRT: u8 = 2;
    pub const GRASS: u8 = 3;
    pub const WATER: u8 = 4;
}

/// Single grid cell, 4 bytes so runs of cells cast straight to codec input
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Voxel {
    /// RGB565 encoded color
    pub color: u16,
    pub material_id: u8,
    pub flags: u8,
}

impl Voxel {
    /// Empty/air cell
    pub const EMPTY: Voxel = Voxel {
        color: 0,
        material_id: material::AIR,
        flags: 0,
    };

    /// Create voxel from RGB888 values
    pub fn new(r: u8, g: u8, b: u8, material_id: u8) -> Self {
        Self {
            color: rgb_to_565(r, g, b),
            material_id,
            flags: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}
