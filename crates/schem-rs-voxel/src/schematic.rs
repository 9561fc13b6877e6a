//! Sponge `.schem` structure files (block data only).
//!
//! Only `Width`, `Height`, `Length`, `Palette`, `PaletteMax`, `BlockData` and
//! `Version` are read or written. Entities, biomes and metadata tags are
//! ignored.

use std::path::Path;

use schem_rs_nbt::{NbtCompound, NbtRoot, NbtTag};
use tracing::debug;

use crate::codec::{self, PaletteIndex};
use crate::error::VoxelError;
use crate::layout::{self, RawBlock};
use crate::palette::Palette;
use crate::voxel::Extent;

const ROOT_NAME: &str = "Schematic";
const FORMAT_VERSION: i32 = 1;

/// A decoded schematic: bounding box, palette and the packed block stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Schematic {
    pub extent: Extent,
    pub palette: Palette,
    pub block_data: Vec<i8>,
}

impl Schematic {
    pub fn from_nbt(root: &NbtRoot) -> Result<Self, VoxelError> {
        let extent = Extent::new(
            dimension(root, "Width")?,
            dimension(root, "Height")?,
            dimension(root, "Length")?,
        );

        let palette_tag = root.get("Palette").ok_or(VoxelError::MissingTag("Palette"))?;
        let entries = palette_tag.as_compound().ok_or(VoxelError::WrongTagType {
            tag: "Palette",
            expected: "TAG_Compound",
        })?;
        let mut palette = Palette::new();
        for (name, tag) in entries {
            let id = tag
                .as_integer()
                .and_then(|v| PaletteIndex::try_from(v).ok())
                .ok_or(VoxelError::WrongTagType {
                    tag: "Palette",
                    expected: "non-negative TAG_Int entries",
                })?;
            palette.insert(name.as_str(), id)?;
        }

        if let Some(version) = root.get("Version").and_then(NbtTag::as_int) {
            if version != FORMAT_VERSION {
                debug!(version, "reading schematic version {version} as version {FORMAT_VERSION}");
            }
        }
        if let Some(max) = root.get("PaletteMax").and_then(NbtTag::as_int) {
            if usize::try_from(max).ok() != Some(palette.len()) {
                debug!(palette_max = max, entries = palette.len(), "PaletteMax disagrees with palette size");
            }
        }

        let block_data = root
            .get("BlockData")
            .ok_or(VoxelError::MissingTag("BlockData"))?
            .as_byte_array()
            .ok_or(VoxelError::WrongTagType {
                tag: "BlockData",
                expected: "TAG_Byte_Array",
            })?
            .to_vec();

        Ok(Self {
            extent,
            palette,
            block_data,
        })
    }

    pub fn to_nbt(&self) -> Result<NbtRoot, VoxelError> {
        let mut palette = NbtCompound::new();
        for (id, name) in self.palette.iter() {
            let id = i32::try_from(id).map_err(|_| VoxelError::EncodingOverflow { value: id })?;
            palette.insert(name.to_string(), NbtTag::Int(id));
        }

        let mut c = NbtCompound::new();
        c.insert("Version".into(), NbtTag::Int(FORMAT_VERSION));
        c.insert("Width".into(), short_dimension("Width", self.extent.width)?);
        c.insert("Height".into(), short_dimension("Height", self.extent.height)?);
        c.insert("Length".into(), short_dimension("Length", self.extent.length)?);
        c.insert("PaletteMax".into(), NbtTag::Int(palette.len() as i32));
        c.insert("Palette".into(), NbtTag::Compound(palette));
        c.insert("BlockData".into(), NbtTag::ByteArray(self.block_data.clone()));
        Ok(NbtRoot::new(ROOT_NAME, c))
    }

    /// Read a gzipped (or plain) `.schem` file.
    pub fn load(path: &Path) -> Result<Self, VoxelError> {
        let data = std::fs::read(path)?;
        let root = schem_rs_nbt::read_file_bytes(&data)?;
        Self::from_nbt(&root)
    }

    /// Write a gzipped `.schem` file.
    pub fn save(&self, path: &Path) -> Result<(), VoxelError> {
        let data = schem_rs_nbt::write_file_bytes(&self.to_nbt()?)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Decode the block stream into palette indices.
    pub fn indices(&self) -> Result<Vec<PaletteIndex>, VoxelError> {
        codec::decode(&self.block_data)
    }

    /// Decode the block stream into named blocks at their coordinates.
    pub fn blocks(&self) -> Result<Vec<RawBlock>, VoxelError> {
        layout::resolve(self.extent, &self.palette, &self.indices()?)
    }

    /// Pack named blocks into a new schematic.
    pub fn from_blocks(
        extent: Extent,
        palette: Palette,
        blocks: &[RawBlock],
    ) -> Result<Self, VoxelError> {
        let indices = layout::pack(extent, &palette, blocks)?;
        let block_data = codec::encode(&indices)?;
        Ok(Self {
            extent,
            palette,
            block_data,
        })
    }
}

/// Dimensions are unsigned shorts stored in a signed `TAG_Short`; some
/// writers use `TAG_Int` instead.
fn dimension(root: &NbtRoot, name: &'static str) -> Result<u32, VoxelError> {
    match root.get(name) {
        None => Err(VoxelError::MissingTag(name)),
        Some(NbtTag::Short(v)) => Ok(u32::from(*v as u16)),
        Some(NbtTag::Int(v)) => {
            u32::try_from(*v).map_err(|_| VoxelError::InvalidDimension {
                name,
                value: i64::from(*v),
            })
        }
        Some(_) => Err(VoxelError::WrongTagType {
            tag: name,
            expected: "TAG_Short",
        }),
    }
}

fn short_dimension(name: &'static str, value: u32) -> Result<NbtTag, VoxelError> {
    let value = u16::try_from(value).map_err(|_| VoxelError::InvalidDimension {
        name,
        value: i64::from(value),
    })?;
    Ok(NbtTag::Short(value as i16))
}
