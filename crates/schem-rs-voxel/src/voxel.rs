//! Positioned semantic blocks and the bounded sets a structure is made of.

use crate::block::{Cell, SemanticBlock};
use crate::error::VoxelError;

/// Zero-based block coordinate. `y` is the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl BlockPos {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Bounding box size of a structure: `width` along X, `height` along Y,
/// `length` along Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
    pub length: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32, length: u32) -> Self {
        Self {
            width,
            height,
            length,
        }
    }

    pub fn volume(&self) -> usize {
        self.width as usize * self.height as usize * self.length as usize
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        pos.x < self.width && pos.y < self.height && pos.z < self.length
    }

    /// Largest X coordinate. Only meaningful for a non-empty extent.
    pub fn max_x(&self) -> u32 {
        self.width.saturating_sub(1)
    }

    /// Largest Z coordinate. Only meaningful for a non-empty extent.
    pub fn max_z(&self) -> u32 {
        self.length.saturating_sub(1)
    }
}

/// One block of a structure at its coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub pos: BlockPos,
    pub block: SemanticBlock,
}

impl Voxel {
    pub fn new(pos: BlockPos, block: SemanticBlock) -> Self {
        Self { pos, block }
    }

    /// Flat row `[x, y, z, type, subtype, a0..a4]`, ordered by coordinate
    /// first. Rows are what variant deduplication compares.
    pub fn row(&self) -> [i64; 10] {
        let cell: Cell = self.block.to_cell();
        let mut row = [0i64; 10];
        row[0] = i64::from(self.pos.x);
        row[1] = i64::from(self.pos.y);
        row[2] = i64::from(self.pos.z);
        for (dst, src) in row[3..].iter_mut().zip(cell) {
            *dst = i64::from(src);
        }
        row
    }
}

/// Voxels of one structure (or one symmetry variant of it) together with the
/// extent they live in. Every voxel lies inside the extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelSet {
    extent: Extent,
    voxels: Vec<Voxel>,
}

impl VoxelSet {
    pub fn new(extent: Extent, voxels: Vec<Voxel>) -> Result<Self, VoxelError> {
        if let Some(v) = voxels.iter().find(|v| !extent.contains(v.pos)) {
            return Err(VoxelError::OutOfBounds {
                x: v.pos.x,
                y: v.pos.y,
                z: v.pos.z,
                width: extent.width,
                height: extent.height,
                length: extent.length,
            });
        }
        Ok(Self { extent, voxels })
    }

    /// Caller guarantees every voxel is inside `extent`.
    pub(crate) fn from_trusted(extent: Extent, voxels: Vec<Voxel>) -> Self {
        debug_assert!(voxels.iter().all(|v| extent.contains(v.pos)));
        Self { extent, voxels }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Hashable canonical form: all rows sorted by coordinate, then by the
    /// remaining fields. Two sets with the same canonical form build the same
    /// dense grid.
    pub fn canonical(&self) -> Vec<[i64; 10]> {
        let mut rows: Vec<[i64; 10]> = self.voxels.iter().map(Voxel::row).collect();
        rows.sort_unstable();
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;

    fn air(x: u32, y: u32, z: u32) -> Voxel {
        Voxel::new(BlockPos::new(x, y, z), SemanticBlock::new(BlockType::Air))
    }

    #[test]
    fn extent_bounds() {
        let e = Extent::new(3, 2, 4);
        assert_eq!(e.volume(), 24);
        assert!(e.contains(BlockPos::new(2, 1, 3)));
        assert!(!e.contains(BlockPos::new(3, 0, 0)));
        assert_eq!(e.max_x(), 2);
        assert_eq!(e.max_z(), 3);
    }

    #[test]
    fn out_of_bounds_rejected() {
        let err = VoxelSet::new(Extent::new(2, 2, 2), vec![air(0, 0, 0), air(0, 2, 0)]).unwrap_err();
        assert!(matches!(err, VoxelError::OutOfBounds { y: 2, height: 2, .. }));
    }

    #[test]
    fn canonical_ignores_input_order() {
        let e = Extent::new(2, 1, 2);
        let a = VoxelSet::new(e, vec![air(0, 0, 0), air(1, 0, 1)]).unwrap();
        let b = VoxelSet::new(e, vec![air(1, 0, 1), air(0, 0, 0)]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn row_layout() {
        let v = air(1, 2, 3);
        assert_eq!(v.row(), [1, 2, 3, 9, -1, -1, -1, -1, -1, -1]);
    }
}
