//! Semantic block model: a closed set of block types, stair wood variants,
//! and the fixed-width attribute vector whose meaning depends on the type.

use std::fmt;

/// Number of attribute slots carried by every block.
pub const ATTRIBUTE_SLOTS: usize = 5;

/// Sentinel for "not applicable" slots, absent subtypes and grid holes.
pub const NOT_APPLICABLE: i32 = -1;

/// Coarse block category used as the first channel of a dense grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockType {
    Log,
    Planks,
    Stairs,
    Slab,
    Fence,
    GlassPane,
    Door,
    Functional,
    GrassBlock,
    Air,
}

impl BlockType {
    /// Substring resolution order: the first key contained in a block name
    /// wins. A name holding two keys (say `glass_pane_door`) resolves to the
    /// earlier entry.
    pub const RESOLUTION_ORDER: [BlockType; 10] = [
        BlockType::Log,
        BlockType::Planks,
        BlockType::Stairs,
        BlockType::Slab,
        BlockType::Fence,
        BlockType::GlassPane,
        BlockType::Door,
        BlockType::Functional,
        BlockType::GrassBlock,
        BlockType::Air,
    ];

    /// Substring key matched against block names.
    pub fn key(self) -> &'static str {
        match self {
            BlockType::Log => "log",
            BlockType::Planks => "planks",
            BlockType::Stairs => "stairs",
            BlockType::Slab => "slab",
            BlockType::Fence => "fence",
            BlockType::GlassPane => "glass_pane",
            BlockType::Door => "door",
            BlockType::Functional => "functional",
            BlockType::GrassBlock => "grass_block",
            BlockType::Air => "air",
        }
    }

    /// Numeric channel value.
    pub fn id(self) -> i32 {
        match self {
            BlockType::Log => 0,
            BlockType::Planks => 1,
            BlockType::Stairs => 2,
            BlockType::Slab => 3,
            BlockType::Fence => 4,
            BlockType::GlassPane => 5,
            BlockType::Door => 6,
            BlockType::Functional => 7,
            BlockType::GrassBlock => 8,
            BlockType::Air => 9,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::RESOLUTION_ORDER.into_iter().find(|t| t.id() == id)
    }

    /// Resolve a bare block name (no namespace, no properties).
    pub fn resolve(name: &str) -> Option<Self> {
        Self::RESOLUTION_ORDER
            .into_iter()
            .find(|t| name.contains(t.key()))
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Wood variant of a stair block. Only defined for [`BlockType::Stairs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StairSubtype {
    Oak,
    DarkOak,
    Birch,
    Spruce,
}

impl StairSubtype {
    pub const ALL: [StairSubtype; 4] = [
        StairSubtype::Oak,
        StairSubtype::DarkOak,
        StairSubtype::Birch,
        StairSubtype::Spruce,
    ];

    /// The exact block name this variant matches.
    pub fn block_name(self) -> &'static str {
        match self {
            StairSubtype::Oak => "oak_stairs",
            StairSubtype::DarkOak => "dark_oak_stairs",
            StairSubtype::Birch => "birch_stairs",
            StairSubtype::Spruce => "spruce_stairs",
        }
    }

    pub fn id(self) -> i32 {
        match self {
            StairSubtype::Oak => 0,
            StairSubtype::DarkOak => 1,
            StairSubtype::Birch => 2,
            StairSubtype::Spruce => 3,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Exact-match lookup; `dark_oak_stairs` is not `oak_stairs`.
    pub fn from_block_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.block_name() == name)
    }
}

/// Encode an optional subtype as its channel value.
pub fn subtype_id(subtype: Option<StairSubtype>) -> i32 {
    subtype.map_or(NOT_APPLICABLE, StairSubtype::id)
}

/// Slot positions inside an [`AttributeVector`], per block type.
pub mod slot {
    /// Stairs and doors.
    pub const FACING: usize = 0;
    pub const HALF: usize = 1;
    /// Stairs only.
    pub const SHAPE: usize = 2;
    /// Doors only.
    pub const HINGE: usize = 2;
    /// Logs.
    pub const AXIS: usize = 0;

    /// Fences and glass panes: `[east, north, south, waterlogged, west]`.
    pub const EAST: usize = 0;
    pub const NORTH: usize = 1;
    pub const SOUTH: usize = 2;
    pub const WATERLOGGED: usize = 3;
    pub const WEST: usize = 4;
}

/// Orientation and state properties, right-padded with [`NOT_APPLICABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeVector([i32; ATTRIBUTE_SLOTS]);

impl AttributeVector {
    pub const EMPTY: AttributeVector = AttributeVector([NOT_APPLICABLE; ATTRIBUTE_SLOTS]);

    pub const fn new(slots: [i32; ATTRIBUTE_SLOTS]) -> Self {
        Self(slots)
    }

    /// Build from a leading prefix of slots; the rest are padded.
    /// Slots beyond [`ATTRIBUTE_SLOTS`] are dropped.
    pub fn padded(prefix: &[i32]) -> Self {
        let mut slots = [NOT_APPLICABLE; ATTRIBUTE_SLOTS];
        for (dst, src) in slots.iter_mut().zip(prefix) {
            *dst = *src;
        }
        Self(slots)
    }

    pub fn get(&self, index: usize) -> i32 {
        self.0[index]
    }

    /// Copy with one slot replaced.
    #[must_use]
    pub fn with(mut self, index: usize, value: i32) -> Self {
        self.0[index] = value;
        self
    }

    pub fn as_array(&self) -> &[i32; ATTRIBUTE_SLOTS] {
        &self.0
    }
}

impl Default for AttributeVector {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// The semantic tuple `(type, subtype, attributes)` for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemanticBlock {
    pub block_type: BlockType,
    pub subtype: Option<StairSubtype>,
    pub attributes: AttributeVector,
}

/// Channels per dense-grid cell: type, subtype, then the attribute slots.
pub const CHANNELS: usize = 2 + ATTRIBUTE_SLOTS;

/// One dense-grid cell.
pub type Cell = [i32; CHANNELS];

/// Cell value for coordinates no voxel covers.
pub const HOLE: Cell = [NOT_APPLICABLE; CHANNELS];

impl SemanticBlock {
    pub fn new(block_type: BlockType) -> Self {
        Self {
            block_type,
            subtype: None,
            attributes: AttributeVector::EMPTY,
        }
    }

    pub fn to_cell(&self) -> Cell {
        let mut cell = HOLE;
        cell[0] = self.block_type.id();
        cell[1] = subtype_id(self.subtype);
        cell[2..].copy_from_slice(self.attributes.as_array());
        cell
    }

    /// Inverse of [`to_cell`](Self::to_cell). Returns `None` for holes and for
    /// cells whose type or subtype channel is not a known value.
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        let block_type = BlockType::from_id(cell[0])?;
        let subtype = match cell[1] {
            NOT_APPLICABLE => None,
            id => Some(StairSubtype::from_id(id)?),
        };
        let mut slots = [NOT_APPLICABLE; ATTRIBUTE_SLOTS];
        slots.copy_from_slice(&cell[2..]);
        Some(Self {
            block_type,
            subtype,
            attributes: AttributeVector::new(slots),
        })
    }
}
