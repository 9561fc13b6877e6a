//! Dense `[W][H][L][7]` grids built from sparse voxel sets.

use crate::block::{Cell, SemanticBlock, CHANNELS, HOLE};
use crate::record;
use crate::voxel::{BlockPos, Extent, Voxel};

/// Fully populated grid over a bounding box. Cells no voxel covers hold
/// [`HOLE`]; that is different from an explicit air block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseGrid {
    shape: [usize; 3],
    cells: Vec<Cell>,
}

impl DenseGrid {
    /// Grid of the given `[W, H, L]` shape, all holes.
    pub fn empty(shape: [usize; 3]) -> Self {
        Self {
            shape,
            cells: vec![HOLE; shape[0] * shape[1] * shape[2]],
        }
    }

    /// Wrap existing cells laid out in C order over `[W, H, L]`.
    /// Returns `None` when the cell count does not match the shape.
    pub fn from_cells(shape: [usize; 3], cells: Vec<Cell>) -> Option<Self> {
        (cells.len() == shape[0] * shape[1] * shape[2]).then_some(Self { shape, cells })
    }

    /// Build a grid sized by the largest coordinate present on each axis.
    ///
    /// A later voxel at an already written coordinate overwrites the earlier
    /// one. An empty input gives a zero-sized grid.
    pub fn build(voxels: &[Voxel]) -> Self {
        Self::fill(observed_shape(voxels), voxels)
    }

    /// Like [`build`](Self::build), but the grid covers at least `extent` even
    /// where the structure leaves its bounding box unoccupied.
    pub fn build_within(extent: Extent, voxels: &[Voxel]) -> Self {
        let observed = observed_shape(voxels);
        let declared = [extent.width, extent.height, extent.length].map(|d| d as usize);
        let shape = [0, 1, 2].map(|axis| observed[axis].max(declared[axis]));
        Self::fill(shape, voxels)
    }

    fn fill(shape: [usize; 3], voxels: &[Voxel]) -> Self {
        let mut grid = Self::empty(shape);
        for v in voxels {
            let index = grid.index(v.pos);
            grid.cells[index] = v.block.to_cell();
        }
        grid
    }

    /// `[W, H, L]`; the channel dimension is always [`CHANNELS`].
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Full array shape including the channel axis.
    pub fn array_shape(&self) -> [usize; 4] {
        [self.shape[0], self.shape[1], self.shape[2], CHANNELS]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, pos: BlockPos) -> usize {
        let [_, h, l] = self.shape;
        (pos.x as usize * h + pos.y as usize) * l + pos.z as usize
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        (pos.x as usize) < self.shape[0]
            && (pos.y as usize) < self.shape[1]
            && (pos.z as usize) < self.shape[2]
    }

    pub fn get(&self, pos: BlockPos) -> Option<&Cell> {
        self.contains(pos).then(|| &self.cells[self.index(pos)])
    }

    /// Decoded block at `pos`, or `None` for holes and out-of-range positions.
    pub fn block(&self, pos: BlockPos) -> Option<SemanticBlock> {
        self.get(pos).and_then(SemanticBlock::from_cell)
    }

    /// Every cell with its coordinate, enumerated Y-outer, Z-middle,
    /// X-inner: the order structure files are packed in.
    pub fn iter_packed(&self) -> impl Iterator<Item = (BlockPos, &Cell)> + '_ {
        let [w, h, l] = self.shape;
        (0..h).flat_map(move |y| {
            (0..l).flat_map(move |z| {
                (0..w).map(move |x| {
                    let pos = BlockPos::new(x as u32, y as u32, z as u32);
                    (pos, &self.cells[self.index(pos)])
                })
            })
        })
    }

    /// Semantic record lines for every cell, holes included, in packed
    /// order. Inverse of building for a fully covered structure.
    pub fn to_records(&self) -> Vec<String> {
        self.iter_packed()
            .map(|(pos, cell)| record::format_record(pos, cell))
            .collect()
    }
}

fn observed_shape(voxels: &[Voxel]) -> [usize; 3] {
    if voxels.is_empty() {
        return [0, 0, 0];
    }
    let mut max = [0u32; 3];
    for v in voxels {
        max[0] = max[0].max(v.pos.x);
        max[1] = max[1].max(v.pos.y);
        max[2] = max[2].max(v.pos.z);
    }
    max.map(|m| m as usize + 1)
}
