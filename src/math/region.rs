//! Axis-aligned octree regions: cubes, planes and pillars

use std::fmt;

use crate::core::types::IVec3;

/// World axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The two orthogonal axes, in the order pillar indexes use them
    ///
    /// X -> (Y, Z), Y -> (X, Z), Z -> (X, Y)
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }

    /// Bit of an octant code holding this axis (X=bit2, Y=bit1, Z=bit0)
    pub fn octant_shift(self) -> u8 {
        2 - self as u8
    }

    fn unit(self) -> IVec3 {
        match self {
            Axis::X => IVec3::X,
            Axis::Y => IVec3::Y,
            Axis::Z => IVec3::Z,
        }
    }
}

/// Axis-aligned sub-volume of the world grid
///
/// `origin` is in world cells and always a multiple of `grid`. `size` counts
/// grid cells per axis: (1,1,1) for a cube, a single 1 for a plane and a
/// single 2 for a pillar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub origin: IVec3,
    pub size: IVec3,
    pub grid: i32,
}

impl Region {
    /// Cube with edge `2^scale` at `origin`
    pub fn cube(origin: IVec3, scale: u32) -> Self {
        Self {
            origin,
            size: IVec3::ONE,
            grid: 1 << scale,
        }
    }

    pub fn is_cube(&self) -> bool {
        self.size == IVec3::ONE
    }

    /// log2 of the grid edge
    pub fn scale(&self) -> u32 {
        self.grid.trailing_zeros()
    }

    /// Extent in world cells per axis
    pub fn extent(&self) -> IVec3 {
        self.size * self.grid
    }

    /// Number of world cells covered
    pub fn volume(&self) -> u64 {
        let e = self.extent().as_i64vec3();
        (e.x * e.y * e.z) as u64
    }

    /// Origin expressed in grid cells
    pub fn cell_origin(&self) -> IVec3 {
        self.origin / self.grid
    }

    pub fn contains(&self, p: IVec3) -> bool {
        let max = self.origin + self.extent();
        p.cmpge(self.origin).all() && p.cmplt(max).all()
    }

    /// Child cube `i` of this cube (bit2=X, bit1=Y, bit0=Z)
    pub fn sub_octant(&self, i: u8) -> Region {
        let grid = self.grid >> 1;
        let bits = IVec3::new(((i >> 2) & 1) as i32, ((i >> 1) & 1) as i32, (i & 1) as i32);
        Region {
            origin: self.origin + bits * grid,
            size: IVec3::ONE,
            grid,
        }
    }

    /// Half-volume slab of this cube perpendicular to `axis`
    pub fn plane(&self, axis: Axis, side: u8) -> Region {
        let grid = self.grid >> 1;
        let unit = axis.unit();
        Region {
            origin: self.origin + unit * grid * (side & 1) as i32,
            size: IVec3::splat(2) - unit,
            grid,
        }
    }

    /// Quarter-volume column of this cube running along `axis`
    ///
    /// The high bit of `which` offsets along the first orthogonal axis, the
    /// low bit along the second (see [`Axis::others`]).
    pub fn pillar(&self, axis: Axis, which: u8) -> Region {
        let grid = self.grid >> 1;
        let [hi, lo] = axis.others();
        let offset = hi.unit() * ((which >> 1) & 1) as i32 + lo.unit() * (which & 1) as i32;
        Region {
            origin: self.origin + offset * grid,
            size: IVec3::ONE + axis.unit(),
            grid,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {} {} | {}x{}x{}]",
            self.grid, self.origin.x, self.origin.y, self.origin.z,
            self.size.x, self.size.y, self.size.z
        )
    }
}
