//! Rotations about the vertical axis and horizontal mirrors, applied to
//! coordinates and attribute vectors together.
//!
//! Every function here is pure and returns fresh values, so variants derived
//! from the same input never alias each other.

use crate::block::slot::{self, EAST, NORTH, SOUTH, WATERLOGGED, WEST};
use crate::block::{AttributeVector, BlockType};
use crate::voxel::{BlockPos, Extent, Voxel, VoxelSet};

/// Quarter-turn rotation about the Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    fn quarter_turns(self) -> i32 {
        (self.degrees() / 90) as i32
    }
}

/// Horizontal mirror. Y is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorAxis {
    /// Reflects X.
    NorthSouth,
    /// Reflects Z.
    EastWest,
}

/// One of the six transforms a structure is expanded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    Identity,
    Rotate(Rotation),
    Mirror(MirrorAxis),
}

impl Symmetry {
    /// Generation order of the variants. Index 0 is the untouched structure.
    pub const VARIANTS: [Symmetry; 6] = [
        Symmetry::Identity,
        Symmetry::Rotate(Rotation::Deg90),
        Symmetry::Rotate(Rotation::Deg180),
        Symmetry::Rotate(Rotation::Deg270),
        Symmetry::Mirror(MirrorAxis::NorthSouth),
        Symmetry::Mirror(MirrorAxis::EastWest),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Symmetry::Identity => "original",
            Symmetry::Rotate(Rotation::Deg90) => "rotate_90",
            Symmetry::Rotate(Rotation::Deg180) => "rotate_180",
            Symmetry::Rotate(Rotation::Deg270) => "rotate_270",
            Symmetry::Mirror(MirrorAxis::NorthSouth) => "mirror_north_south",
            Symmetry::Mirror(MirrorAxis::EastWest) => "mirror_east_west",
        }
    }

    /// Extent of the transformed structure: quarter turns swap width and
    /// length.
    pub fn extent(self, extent: Extent) -> Extent {
        match self {
            Symmetry::Rotate(Rotation::Deg90 | Rotation::Deg270) => {
                Extent::new(extent.length, extent.height, extent.width)
            }
            _ => extent,
        }
    }

    pub fn apply_pos(self, pos: BlockPos, extent: Extent) -> BlockPos {
        match self {
            Symmetry::Identity => pos,
            Symmetry::Rotate(r) => rotate_pos(pos, r, extent),
            Symmetry::Mirror(m) => mirror_pos(pos, m, extent),
        }
    }

    pub fn apply_attributes(self, block_type: BlockType, attrs: AttributeVector) -> AttributeVector {
        match self {
            Symmetry::Identity => attrs,
            Symmetry::Rotate(r) => rotate_attributes(block_type, attrs, r),
            Symmetry::Mirror(m) => mirror_attributes(block_type, attrs, m),
        }
    }

    /// Transform one voxel of a structure with the given extent.
    pub fn apply(self, voxel: &Voxel, extent: Extent) -> Voxel {
        let mut block = voxel.block;
        block.attributes = self.apply_attributes(block.block_type, block.attributes);
        Voxel::new(self.apply_pos(voxel.pos, extent), block)
    }

    /// Transform a whole set into a new one; the input is left untouched.
    pub fn apply_set(self, set: &VoxelSet) -> VoxelSet {
        let extent = set.extent();
        let voxels = set.voxels().iter().map(|v| self.apply(v, extent)).collect();
        VoxelSet::from_trusted(self.extent(extent), voxels)
    }
}

/// Rotate a coordinate. `pos` must lie inside `extent`, the pre-rotation
/// extent.
pub fn rotate_pos(pos: BlockPos, rotation: Rotation, extent: Extent) -> BlockPos {
    let max_x = extent.max_x();
    let max_z = extent.max_z();
    let BlockPos { x, y, z } = pos;
    match rotation {
        Rotation::Deg90 => BlockPos::new(z, y, max_x - x),
        Rotation::Deg180 => BlockPos::new(max_x - x, y, max_z - z),
        Rotation::Deg270 => BlockPos::new(max_z - z, y, x),
    }
}

pub fn mirror_pos(pos: BlockPos, axis: MirrorAxis, extent: Extent) -> BlockPos {
    let BlockPos { x, y, z } = pos;
    match axis {
        MirrorAxis::NorthSouth => BlockPos::new(extent.max_x() - x, y, z),
        MirrorAxis::EastWest => BlockPos::new(x, y, extent.max_z() - z),
    }
}

/// Rebuild a connection vector: slot `i` of the result takes slot
/// `sources[i]` of the input.
fn permute(attrs: AttributeVector, sources: [usize; 5]) -> AttributeVector {
    AttributeVector::new(sources.map(|s| attrs.get(s)))
}

pub fn rotate_attributes(
    block_type: BlockType,
    attrs: AttributeVector,
    rotation: Rotation,
) -> AttributeVector {
    match block_type {
        BlockType::Stairs | BlockType::Door => {
            let facing = (attrs.get(slot::FACING) + rotation.quarter_turns()).rem_euclid(4);
            attrs.with(slot::FACING, facing)
        }
        BlockType::Log => match (rotation, attrs.get(slot::AXIS)) {
            (Rotation::Deg180, _) => attrs,
            (_, 0) => attrs.with(slot::AXIS, 2),
            (_, 2) => attrs.with(slot::AXIS, 0),
            _ => attrs,
        },
        BlockType::Fence | BlockType::GlassPane => match rotation {
            Rotation::Deg90 => permute(attrs, [NORTH, WEST, EAST, WATERLOGGED, SOUTH]),
            Rotation::Deg180 => permute(attrs, [WEST, SOUTH, NORTH, WATERLOGGED, EAST]),
            Rotation::Deg270 => permute(attrs, [SOUTH, EAST, WEST, WATERLOGGED, NORTH]),
        },
        _ => attrs,
    }
}

pub fn mirror_attributes(
    block_type: BlockType,
    attrs: AttributeVector,
    axis: MirrorAxis,
) -> AttributeVector {
    match block_type {
        BlockType::Stairs | BlockType::Door => {
            let facing = attrs.get(slot::FACING);
            let facing = match axis {
                MirrorAxis::NorthSouth if facing == 0 || facing == 2 => facing,
                MirrorAxis::NorthSouth => 4 - facing,
                MirrorAxis::EastWest if facing == 1 || facing == 3 => facing,
                MirrorAxis::EastWest => 2 - facing,
            };
            let attrs = attrs.with(slot::FACING, facing);
            if block_type == BlockType::Door {
                attrs.with(slot::HINGE, (attrs.get(slot::HINGE) - 1).abs())
            } else {
                attrs.with(slot::SHAPE, mirror_stair_shape(attrs.get(slot::SHAPE)))
            }
        }
        BlockType::Fence | BlockType::GlassPane => match axis {
            MirrorAxis::NorthSouth => permute(attrs, [EAST, SOUTH, NORTH, WATERLOGGED, WEST]),
            MirrorAxis::EastWest => permute(attrs, [WEST, NORTH, SOUTH, WATERLOGGED, EAST]),
        },
        _ => attrs,
    }
}

/// inner_left <-> inner_right, outer_left <-> outer_right.
fn mirror_stair_shape(shape: i32) -> i32 {
    match shape {
        1 => 2,
        2 => 1,
        3 => 4,
        4 => 3,
        other => other,
    }
}
