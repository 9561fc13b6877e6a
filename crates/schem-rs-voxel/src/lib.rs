//! Structure decoding, block grammar, symmetry augmentation and dense grids.

pub mod block;
pub mod codec;
pub mod consistency;
pub mod error;
pub mod grammar;
pub mod grid;
pub mod layout;
pub mod metadata;
pub mod npy;
pub mod palette;
pub mod record;
pub mod schematic;
pub mod symmetry;
pub mod variants;
pub mod voxel;

pub use block::{AttributeVector, BlockType, SemanticBlock, StairSubtype};
pub use error::VoxelError;
pub use grid::DenseGrid;
pub use palette::Palette;
pub use schematic::Schematic;
pub use symmetry::Symmetry;
pub use variants::VariantSet;
pub use voxel::{BlockPos, Extent, Voxel, VoxelSet};
