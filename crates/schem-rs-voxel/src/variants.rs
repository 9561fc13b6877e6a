//! The six symmetry variants of a structure and their deduplication.

use std::collections::HashSet;

use tracing::debug;

use crate::grid::DenseGrid;
use crate::symmetry::{MirrorAxis, Rotation, Symmetry};
use crate::voxel::VoxelSet;

/// Original structure plus its five transformed copies, one named slot each.
#[derive(Debug, Clone)]
pub struct VariantSet {
    pub original: VoxelSet,
    pub rotate_90: VoxelSet,
    pub rotate_180: VoxelSet,
    pub rotate_270: VoxelSet,
    pub mirror_north_south: VoxelSet,
    pub mirror_east_west: VoxelSet,
}

/// A variant that survived deduplication.
#[derive(Debug, Clone)]
pub struct UniqueVariant<'a> {
    /// Position among the unique variants; names the persisted artifact.
    pub index: usize,
    pub symmetry: Symmetry,
    pub voxels: &'a VoxelSet,
}

impl UniqueVariant<'_> {
    pub fn build_grid(&self) -> DenseGrid {
        DenseGrid::build(self.voxels.voxels())
    }
}

impl VariantSet {
    /// Derive all five transforms from `original`, which is not modified.
    pub fn generate(original: VoxelSet) -> Self {
        let rotate = |r| Symmetry::Rotate(r).apply_set(&original);
        let mirror = |m| Symmetry::Mirror(m).apply_set(&original);
        let rotate_90 = rotate(Rotation::Deg90);
        let rotate_180 = rotate(Rotation::Deg180);
        let rotate_270 = rotate(Rotation::Deg270);
        let mirror_north_south = mirror(MirrorAxis::NorthSouth);
        let mirror_east_west = mirror(MirrorAxis::EastWest);
        Self {
            original,
            rotate_90,
            rotate_180,
            rotate_270,
            mirror_north_south,
            mirror_east_west,
        }
    }

    pub fn get(&self, symmetry: Symmetry) -> &VoxelSet {
        match symmetry {
            Symmetry::Identity => &self.original,
            Symmetry::Rotate(Rotation::Deg90) => &self.rotate_90,
            Symmetry::Rotate(Rotation::Deg180) => &self.rotate_180,
            Symmetry::Rotate(Rotation::Deg270) => &self.rotate_270,
            Symmetry::Mirror(MirrorAxis::NorthSouth) => &self.mirror_north_south,
            Symmetry::Mirror(MirrorAxis::EastWest) => &self.mirror_east_west,
        }
    }

    /// All six slots in generation order.
    pub fn iter(&self) -> impl Iterator<Item = (Symmetry, &VoxelSet)> + '_ {
        Symmetry::VARIANTS.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Variants in generation order, skipping any whose canonical form was
    /// already seen. Symmetric structures collapse here.
    ///
    /// The extent is not part of the comparison: a sparse structure whose
    /// quarter turn lands every voxel on the same coordinates collapses even
    /// though width and length swapped. Use [`VariantSet::unique_within`]
    /// when grids are padded to the extent.
    pub fn unique(&self) -> Vec<UniqueVariant<'_>> {
        self.dedup(false)
    }

    /// Like [`VariantSet::unique`], but variants with different extents are
    /// always kept apart.
    pub fn unique_within(&self) -> Vec<UniqueVariant<'_>> {
        self.dedup(true)
    }

    fn dedup(&self, by_extent: bool) -> Vec<UniqueVariant<'_>> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for (symmetry, voxels) in self.iter() {
            let extent = by_extent.then(|| voxels.extent());
            if seen.insert((extent, voxels.canonical())) {
                unique.push(UniqueVariant {
                    index: unique.len(),
                    symmetry,
                    voxels,
                });
            } else {
                debug!(variant = symmetry.name(), "duplicate symmetry variant skipped");
            }
        }
        unique
    }
}
