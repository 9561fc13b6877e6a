//! Batch stages from a `.schem` file to dense-grid artifacts and back.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use schem_rs_voxel::consistency::{self, ConsistencyReport};
use schem_rs_voxel::metadata::StructureMetadata;
use schem_rs_voxel::{grammar, npy, record};
use schem_rs_voxel::{DenseGrid, Schematic, VariantSet, Voxel, VoxelError, VoxelSet};
use tracing::{debug, info, warn};

use crate::config::ToolConfig;

const BLOCK_LISTING: &str = "block_data.txt";
const METADATA: &str = "metadata.json";
const SEMANTIC_RECORD: &str = "parsed_block_data.txt";
const CONSISTENCY_REPORT: &str = "consistency_report.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Parse,
    Augment,
    Check,
    Encode,
    All,
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "decode" => Ok(Stage::Decode),
            "parse" => Ok(Stage::Parse),
            "augment" => Ok(Stage::Augment),
            "check" => Ok(Stage::Check),
            "encode" => Ok(Stage::Encode),
            "all" => Ok(Stage::All),
            other => Err(format!(
                "unknown stage {other:?} (expected decode, parse, augment, check, encode or all)"
            )),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decode => "decode",
            Stage::Parse => "parse",
            Stage::Augment => "augment",
            Stage::Check => "check",
            Stage::Encode => "encode",
            Stage::All => "all",
        };
        f.write_str(name)
    }
}

/// Where each intermediate artifact lives inside the work directory.
#[derive(Debug, Clone)]
pub struct WorkFiles {
    pub dir: PathBuf,
}

impl WorkFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn block_listing(&self) -> PathBuf {
        self.dir.join(BLOCK_LISTING)
    }

    pub fn metadata(&self) -> PathBuf {
        self.dir.join(METADATA)
    }

    pub fn semantic_record(&self) -> PathBuf {
        self.dir.join(SEMANTIC_RECORD)
    }

    pub fn consistency_report(&self) -> PathBuf {
        self.dir.join(CONSISTENCY_REPORT)
    }

    pub fn variant(&self, index: usize) -> PathBuf {
        npy::variant_path(&self.dir, index)
    }
}

pub struct Pipeline<'a> {
    config: &'a ToolConfig,
    files: WorkFiles,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ToolConfig) -> Self {
        Self {
            config,
            files: WorkFiles::new(&config.paths.work_dir),
        }
    }

    pub fn files(&self) -> &WorkFiles {
        &self.files
    }

    pub fn run(&self, stage: Stage) -> Result<(), VoxelError> {
        std::fs::create_dir_all(&self.files.dir)?;
        match stage {
            Stage::Decode => self.decode().map(drop),
            Stage::Parse => self.parse().map(drop),
            Stage::Augment => self.augment().map(drop),
            Stage::Check => self.check().map(drop),
            Stage::Encode => self.encode().map(drop),
            Stage::All => {
                self.decode()?;
                self.parse()?;
                self.augment()?;
                self.check()?;
                Ok(())
            }
        }
    }

    /// `.schem` -> block listing + metadata. Returns the number of blocks.
    pub fn decode(&self) -> Result<usize, VoxelError> {
        let input = &self.config.paths.input;
        let schem = Schematic::load(input)?;
        let e = schem.extent;
        debug!(
            "Loaded {}: {}x{}x{}, {} palette entries, {} stream bytes",
            input.display(),
            e.width,
            e.height,
            e.length,
            schem.palette.len(),
            schem.block_data.len()
        );

        let blocks = schem.blocks()?;
        record::write_block_listing(
            create(&self.files.block_listing())?,
            &blocks,
            &self.config.decode.substitutions,
        )?;
        StructureMetadata::from_schematic(&schem).save(&self.files.metadata())?;

        info!("decode: {} blocks written to {}", blocks.len(), self.files.block_listing().display());
        Ok(blocks.len())
    }

    /// Block listing -> semantic record. Entries the grammar rejects are
    /// logged and skipped. Returns the number of records written.
    pub fn parse(&self) -> Result<usize, VoxelError> {
        let blocks = record::read_block_listing(open(&self.files.block_listing())?)?;
        let mut voxels = Vec::with_capacity(blocks.len());
        let mut skipped = 0usize;
        for block in &blocks {
            match grammar::parse(&block.name) {
                Ok(semantic) => voxels.push(Voxel::new(block.pos, semantic)),
                Err(e) if e.is_recoverable() => {
                    warn!(
                        x = block.pos.x,
                        y = block.pos.y,
                        z = block.pos.z,
                        "Skipping block: {e}"
                    );
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        record::write_semantic_records(create(&self.files.semantic_record())?, &voxels)?;

        info!("parse: {} records written, {} skipped", voxels.len(), skipped);
        Ok(voxels.len())
    }

    /// Semantic record + metadata -> one `.npy` per unique symmetry variant.
    /// Returns the number of grids written.
    pub fn augment(&self) -> Result<usize, VoxelError> {
        let metadata = StructureMetadata::load(&self.files.metadata())?;
        let voxels = record::read_semantic_records(open(&self.files.semantic_record())?)?;
        let set = VoxelSet::new(metadata.extent(), voxels)?;

        let variants = VariantSet::generate(set);
        let padded = self.config.augment.pad_to_extent;
        let unique = if padded {
            variants.unique_within()
        } else {
            variants.unique()
        };
        self.remove_variants()?;
        for variant in &unique {
            let grid = if padded {
                DenseGrid::build_within(variant.voxels.extent(), variant.voxels.voxels())
            } else {
                variant.build_grid()
            };
            let path = self.files.variant(variant.index);
            npy::save(&grid, &path)?;
            debug!(
                variant = variant.symmetry.name(),
                shape = ?grid.array_shape(),
                "Wrote {}",
                path.display()
            );
        }

        info!("augment: {} unique variants of 6", unique.len());
        Ok(unique.len())
    }

    /// Delete every variant grid a previous `augment` left in the work dir.
    fn remove_variants(&self) -> Result<(), VoxelError> {
        for entry in std::fs::read_dir(&self.files.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_str().and_then(npy::variant_index).is_some() {
                std::fs::remove_file(entry.path())?;
                debug!("Removed stale {}", entry.path().display());
            }
        }
        Ok(())
    }

    /// Rebuild the semantic record from variant 0 and diff it against the
    /// record `parse` wrote.
    pub fn check(&self) -> Result<ConsistencyReport, VoxelError> {
        let grid = npy::load(&self.files.variant(0))?;
        let original = record::read_semantic_lines(open(&self.files.semantic_record())?)?;
        let report = consistency::compare(&original, &grid.to_records());
        std::fs::write(self.files.consistency_report(), report.to_string())?;

        if report.is_consistent() {
            info!("check: {} lines consistent", report.matched);
        } else {
            warn!(
                "check: {} of {} lines differ, see {}",
                report.diffs.len(),
                report.original_lines.max(report.reconstructed_lines),
                self.files.consistency_report().display()
            );
        }
        Ok(report)
    }

    /// Block listing + metadata -> `.schem`.
    pub fn encode(&self) -> Result<Schematic, VoxelError> {
        let metadata = StructureMetadata::load(&self.files.metadata())?;
        let blocks = record::read_block_listing(open(&self.files.block_listing())?)?;
        let schem = Schematic::from_blocks(metadata.extent(), metadata.palette()?, &blocks)?;
        let output = &self.config.paths.output;
        schem.save(output)?;

        info!("encode: {} blocks written to {}", blocks.len(), output.display());
        Ok(schem)
    }
}

fn open(path: &Path) -> Result<BufReader<File>, VoxelError> {
    Ok(BufReader::new(File::open(path)?))
}

fn create(path: &Path) -> Result<BufWriter<File>, VoxelError> {
    Ok(BufWriter::new(File::create(path)?))
}
