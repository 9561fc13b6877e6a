//! Mapping between a flat block stream and coordinates.
//!
//! Structure files pack blocks Y-outer, Z-middle, X-inner:
//! `index = (y * length + z) * width + x`. Any other order silently
//! scrambles every decoded coordinate.

use tracing::warn;

use crate::codec::PaletteIndex;
use crate::error::VoxelError;
use crate::palette::Palette;
use crate::voxel::{BlockPos, Extent};

/// A raw block string at a coordinate, before grammar parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub pos: BlockPos,
    pub name: String,
}

/// Stream index of `pos`.
pub fn index(extent: Extent, pos: BlockPos) -> usize {
    (pos.y as usize * extent.length as usize + pos.z as usize) * extent.width as usize
        + pos.x as usize
}

/// Every coordinate of `extent` in stream order.
pub fn positions(extent: Extent) -> impl Iterator<Item = BlockPos> {
    let Extent {
        width,
        height,
        length,
    } = extent;
    (0..height).flat_map(move |y| {
        (0..length).flat_map(move |z| (0..width).map(move |x| BlockPos::new(x, y, z)))
    })
}

/// Attach coordinates and palette names to decoded indices.
///
/// The index count must equal the extent volume, and every index must have
/// a palette entry.
pub fn resolve(
    extent: Extent,
    palette: &Palette,
    indices: &[PaletteIndex],
) -> Result<Vec<RawBlock>, VoxelError> {
    if indices.len() != extent.volume() {
        return Err(VoxelError::LengthMismatch {
            expected: extent.volume(),
            got: indices.len(),
        });
    }
    positions(extent)
        .zip(indices)
        .map(|(pos, &id)| {
            let name = palette
                .name_of(id)
                .ok_or(VoxelError::UnknownPaletteIndex(id))?;
            Ok(RawBlock {
                pos,
                name: name.to_string(),
            })
        })
        .collect()
}

/// Inverse of [`resolve`]: lay blocks out as a stream of palette indices.
///
/// Names missing from the palette and coordinates no block covers both fall
/// back to index 0.
pub fn pack(
    extent: Extent,
    palette: &Palette,
    blocks: &[RawBlock],
) -> Result<Vec<PaletteIndex>, VoxelError> {
    let mut stream = vec![0; extent.volume()];
    let mut unknown = 0usize;
    for block in blocks {
        if !extent.contains(block.pos) {
            return Err(VoxelError::OutOfBounds {
                x: block.pos.x,
                y: block.pos.y,
                z: block.pos.z,
                width: extent.width,
                height: extent.height,
                length: extent.length,
            });
        }
        let id = match palette.id_of(&block.name) {
            Some(id) => id,
            None => {
                unknown += 1;
                0
            }
        };
        stream[index(extent, block.pos)] = id;
    }
    if unknown > 0 {
        warn!(count = unknown, "blocks missing from palette packed as index 0");
    }
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette::from_map([
            ("minecraft:air", 0),
            ("minecraft:oak_planks", 1),
            ("minecraft:oak_log[axis=y]", 2),
        ])
        .unwrap()
    }

    #[test]
    fn stream_order_is_y_z_x() {
        let extent = Extent::new(2, 2, 3);
        let order: Vec<BlockPos> = positions(extent).collect();
        assert_eq!(order.len(), 12);
        assert_eq!(order[0], BlockPos::new(0, 0, 0));
        assert_eq!(order[1], BlockPos::new(1, 0, 0));
        assert_eq!(order[2], BlockPos::new(0, 0, 1));
        assert_eq!(order[6], BlockPos::new(0, 1, 0));
        for (i, pos) in order.iter().enumerate() {
            assert_eq!(index(extent, *pos), i);
        }
    }

    #[test]
    fn resolve_names_and_coordinates() {
        let extent = Extent::new(2, 1, 2);
        let blocks = resolve(extent, &palette(), &[0, 1, 2, 0]).unwrap();
        assert_eq!(blocks[1].pos, BlockPos::new(1, 0, 0));
        assert_eq!(blocks[1].name, "minecraft:oak_planks");
        assert_eq!(blocks[2].pos, BlockPos::new(0, 0, 1));
        assert_eq!(blocks[2].name, "minecraft:oak_log[axis=y]");
    }

    #[test]
    fn resolve_rejects_short_stream() {
        assert!(matches!(
            resolve(Extent::new(2, 1, 2), &palette(), &[0, 1, 2]),
            Err(VoxelError::LengthMismatch { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn resolve_rejects_unmapped_index() {
        assert!(matches!(
            resolve(Extent::new(1, 1, 1), &palette(), &[9]),
            Err(VoxelError::UnknownPaletteIndex(9))
        ));
    }

    #[test]
    fn pack_inverts_resolve() {
        let extent = Extent::new(3, 2, 2);
        let indices = vec![0, 1, 2, 2, 1, 0, 1, 1, 0, 2, 2, 2];
        let blocks = resolve(extent, &palette(), &indices).unwrap();
        assert_eq!(pack(extent, &palette(), &blocks).unwrap(), indices);
    }

    #[test]
    fn pack_places_by_coordinate_not_order() {
        let extent = Extent::new(2, 1, 1);
        let blocks = vec![
            RawBlock {
                pos: BlockPos::new(1, 0, 0),
                name: "minecraft:oak_planks".into(),
            },
            RawBlock {
                pos: BlockPos::new(0, 0, 0),
                name: "minecraft:oak_log[axis=y]".into(),
            },
        ];
        assert_eq!(pack(extent, &palette(), &blocks).unwrap(), vec![2, 1]);
    }

    #[test]
    fn pack_unknown_names_become_zero() {
        let extent = Extent::new(1, 1, 2);
        let blocks = vec![RawBlock {
            pos: BlockPos::new(0, 0, 1),
            name: "minecraft:diamond_block".into(),
        }];
        assert_eq!(pack(extent, &palette(), &blocks).unwrap(), vec![0, 0]);
    }
}
