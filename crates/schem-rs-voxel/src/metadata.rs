//! `metadata.json`: structure extent and palette, written next to a block
//! listing so the listing can be packed back into a schematic.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::PaletteIndex;
use crate::error::VoxelError;
use crate::palette::Palette;
use crate::schematic::Schematic;
use crate::voxel::Extent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureMetadata {
    pub width: u32,
    pub height: u32,
    pub length: u32,
    pub palette: BTreeMap<String, PaletteIndex>,
}

impl StructureMetadata {
    pub fn from_schematic(schem: &Schematic) -> Self {
        Self {
            width: schem.extent.width,
            height: schem.extent.height,
            length: schem.extent.length,
            palette: schem.palette.to_map(),
        }
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height, self.length)
    }

    pub fn palette(&self) -> Result<Palette, VoxelError> {
        Palette::from_map(self.palette.iter().map(|(name, &id)| (name.as_str(), id)))
    }

    pub fn load(path: &Path) -> Result<Self, VoxelError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), VoxelError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let meta = StructureMetadata {
            width: 2,
            height: 3,
            length: 4,
            palette: BTreeMap::from([("minecraft:air".to_string(), 0), ("minecraft:oak_planks".to_string(), 1)]),
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["width"], 2);
        assert_eq!(json["palette"]["minecraft:oak_planks"], 1);
        let back: StructureMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
        assert_eq!(back.extent(), Extent::new(2, 3, 4));
        assert_eq!(back.palette().unwrap().name_of(1), Some("minecraft:oak_planks"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let meta = StructureMetadata {
            width: 1,
            height: 1,
            length: 1,
            palette: BTreeMap::from([("a:a".to_string(), 0), ("a:b".to_string(), 0)]),
        };
        assert!(matches!(
            meta.palette(),
            Err(VoxelError::DuplicatePaletteEntry { id: 0, .. })
        ));
    }

    #[test]
    fn missing_field_is_an_error() {
        let err = serde_json::from_str::<StructureMetadata>(r#"{"width": 1, "height": 1}"#);
        assert!(err.is_err());
    }
}
