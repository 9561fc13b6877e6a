//! Per-structure palette: raw block string <-> palette index.

use std::collections::{BTreeMap, HashMap};

use crate::codec::PaletteIndex;
use crate::error::VoxelError;

/// Bijective mapping between raw block strings and palette indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    by_name: HashMap<String, PaletteIndex>,
    by_id: BTreeMap<PaletteIndex, String>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Rejects a name or index that is already mapped to
    /// something else; re-inserting an identical pair is a no-op.
    pub fn insert(&mut self, name: impl Into<String>, id: PaletteIndex) -> Result<(), VoxelError> {
        let name = name.into();
        match (self.by_name.get(&name), self.by_id.get(&id)) {
            (Some(&existing), _) if existing == id => return Ok(()),
            (None, None) => {}
            _ => return Err(VoxelError::DuplicatePaletteEntry { name, id }),
        }
        self.by_name.insert(name.clone(), id);
        self.by_id.insert(id, name);
        Ok(())
    }

    /// Index of `name`, adding it with the next free index if absent.
    pub fn intern(&mut self, name: &str) -> PaletteIndex {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = self.next_free();
        self.by_name.insert(name.to_string(), id);
        self.by_id.insert(id, name.to_string());
        id
    }

    fn next_free(&self) -> PaletteIndex {
        self.by_id.keys().next_back().map_or(0, |&max| max + 1)
    }

    pub fn id_of(&self, name: &str) -> Option<PaletteIndex> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: PaletteIndex) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Entries in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (PaletteIndex, &str)> + '_ {
        self.by_id.iter().map(|(&id, name)| (id, name.as_str()))
    }

    /// Ordered `name -> index` view, the shape JSON metadata and NBT store.
    pub fn to_map(&self) -> BTreeMap<String, PaletteIndex> {
        self.by_name.iter().map(|(n, &id)| (n.clone(), id)).collect()
    }

    pub fn from_map<I, S>(entries: I) -> Result<Self, VoxelError>
    where
        I: IntoIterator<Item = (S, PaletteIndex)>,
        S: Into<String>,
    {
        let mut palette = Self::new();
        for (name, id) in entries {
            palette.insert(name, id)?;
        }
        Ok(palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_reverse_lookup() {
        let palette = Palette::from_map([("minecraft:air", 0), ("minecraft:oak_planks", 1)]).unwrap();
        assert_eq!(palette.id_of("minecraft:oak_planks"), Some(1));
        assert_eq!(palette.name_of(0), Some("minecraft:air"));
        assert_eq!(palette.name_of(2), None);
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn bijection_enforced() {
        let mut palette = Palette::new();
        palette.insert("minecraft:air", 0).unwrap();
        palette.insert("minecraft:air", 0).unwrap();
        assert!(matches!(
            palette.insert("minecraft:stone", 0),
            Err(VoxelError::DuplicatePaletteEntry { id: 0, .. })
        ));
        assert!(matches!(
            palette.insert("minecraft:air", 5),
            Err(VoxelError::DuplicatePaletteEntry { id: 5, .. })
        ));
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn intern_appends_after_highest() {
        let mut palette = Palette::from_map([("a:a", 0), ("a:b", 7)]).unwrap();
        assert_eq!(palette.intern("a:b"), 7);
        assert_eq!(palette.intern("a:c"), 8);
        assert_eq!(Palette::new().intern("a:a"), 0);
    }

    #[test]
    fn iteration_is_index_ordered() {
        let palette = Palette::from_map([("z:z", 2), ("a:a", 1), ("m:m", 0)]).unwrap();
        let ids: Vec<_> = palette.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
