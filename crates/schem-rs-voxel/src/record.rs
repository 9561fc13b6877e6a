//! Line-oriented interchange files between pipeline stages.
//!
//! Two formats, each opened by a version header line:
//!
//! ```text
//! # schem-rs block listing v1
//! 0,0,0,minecraft:oak_stairs[facing=east,half=bottom,shape=straight,waterlogged=false]
//!
//! # schem-rs semantic record v1
//! 0,0,0,(2,0,[0,0,0,0,-1])
//! ```

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::block::{Cell, SemanticBlock, ATTRIBUTE_SLOTS, CHANNELS};
use crate::error::VoxelError;
use crate::layout::RawBlock;
use crate::voxel::{BlockPos, Voxel};

pub const BLOCK_LISTING_HEADER: &str = "# schem-rs block listing v1";
pub const SEMANTIC_RECORD_HEADER: &str = "# schem-rs semantic record v1";

/// Rewrites one exact block string into another when writing a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

fn substitute<'a>(name: &'a str, substitutions: &'a [Substitution]) -> &'a str {
    substitutions
        .iter()
        .find(|s| s.from == name)
        .map_or(name, |s| s.to.as_str())
}

// ---------------------------------------------------------------------------
// Block listing
// ---------------------------------------------------------------------------

pub fn write_block_listing<W: Write>(
    mut w: W,
    blocks: &[RawBlock],
    substitutions: &[Substitution],
) -> Result<(), VoxelError> {
    writeln!(w, "{BLOCK_LISTING_HEADER}")?;
    for b in blocks {
        let name = substitute(&b.name, substitutions);
        writeln!(w, "{},{},{},{}", b.pos.x, b.pos.y, b.pos.z, name)?;
    }
    w.flush()?;
    Ok(())
}

pub fn read_block_listing<R: BufRead>(r: R) -> Result<Vec<RawBlock>, VoxelError> {
    body_lines(r, BLOCK_LISTING_HEADER)?
        .into_iter()
        .map(|(line, text)| {
            let (pos, raw) = split_position(line, &text)?;
            if raw.is_empty() {
                return Err(malformed(line, "empty block string"));
            }
            Ok(RawBlock {
                pos,
                name: raw.to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Semantic record
// ---------------------------------------------------------------------------

/// Render one semantic record line. Voxels and dense-grid cells (holes
/// included) go through this same formatter.
pub fn format_record(pos: BlockPos, cell: &Cell) -> String {
    let attrs: Vec<String> = cell[2..].iter().map(i32::to_string).collect();
    format!(
        "{},{},{},({},{},[{}])",
        pos.x,
        pos.y,
        pos.z,
        cell[0],
        cell[1],
        attrs.join(",")
    )
}

pub fn format_voxel(voxel: &Voxel) -> String {
    format_record(voxel.pos, &voxel.block.to_cell())
}

/// Parse a record line back into its coordinate and raw cell. `line` is the
/// 1-based line number used in errors.
pub fn parse_record(line: usize, text: &str) -> Result<(BlockPos, Cell), VoxelError> {
    let (pos, rest) = split_position(line, text)?;
    let inner = rest
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| malformed(line, "expected parenthesised tuple"))?;
    let (head, attrs) = inner
        .split_once('[')
        .ok_or_else(|| malformed(line, "missing attribute list"))?;
    let attrs = attrs
        .strip_suffix(']')
        .ok_or_else(|| malformed(line, "unterminated attribute list"))?;

    let mut head = head.split(',');
    let block_type = parse_int(line, head.next())?;
    let subtype = parse_int(line, head.next())?;
    if head.next().map(str::trim) != Some("") || head.next().is_some() {
        return Err(malformed(line, "expected exactly type and subtype before attributes"));
    }

    let mut cell: Cell = [0; CHANNELS];
    cell[0] = block_type;
    cell[1] = subtype;
    let mut count = 0;
    for part in attrs.split(',') {
        if count == ATTRIBUTE_SLOTS {
            return Err(malformed(line, "too many attributes"));
        }
        cell[2 + count] = parse_int(line, Some(part))?;
        count += 1;
    }
    if count != ATTRIBUTE_SLOTS {
        return Err(malformed(line, "too few attributes"));
    }
    Ok((pos, cell))
}

pub fn write_semantic_records<W: Write>(mut w: W, voxels: &[Voxel]) -> Result<(), VoxelError> {
    writeln!(w, "{SEMANTIC_RECORD_HEADER}")?;
    for v in voxels {
        writeln!(w, "{}", format_voxel(v))?;
    }
    w.flush()?;
    Ok(())
}

/// Body lines of a semantic record file, header checked and stripped.
pub fn read_semantic_lines<R: BufRead>(r: R) -> Result<Vec<String>, VoxelError> {
    Ok(body_lines(r, SEMANTIC_RECORD_HEADER)?
        .into_iter()
        .map(|(_, text)| text)
        .collect())
}

/// Read a semantic record into voxels. Hole cells and unknown type ids are
/// rejected.
pub fn read_semantic_records<R: BufRead>(r: R) -> Result<Vec<Voxel>, VoxelError> {
    body_lines(r, SEMANTIC_RECORD_HEADER)?
        .into_iter()
        .map(|(line, text)| {
            let (pos, cell) = parse_record(line, &text)?;
            let block = SemanticBlock::from_cell(&cell)
                .ok_or_else(|| malformed(line, "cell does not describe a known block"))?;
            Ok(Voxel::new(pos, block))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Read all lines, check the header, and return the non-blank body lines
/// with their 1-based line numbers.
fn body_lines<R: BufRead>(r: R, header: &str) -> Result<Vec<(usize, String)>, VoxelError> {
    let mut lines = r.lines().enumerate();
    let first = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(VoxelError::UnsupportedRecordVersion(String::new())),
        }
    };
    if first.trim_end() != header {
        return Err(VoxelError::UnsupportedRecordVersion(first));
    }

    let mut body = Vec::new();
    for (i, line) in lines {
        let line = line?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        body.push((i + 1, trimmed.to_string()));
    }
    Ok(body)
}

/// Split `x,y,z,rest` into a position and the remainder.
fn split_position(line: usize, text: &str) -> Result<(BlockPos, &str), VoxelError> {
    let mut parts = text.splitn(4, ',');
    let mut coord = || -> Result<u32, VoxelError> {
        let part = parts
            .next()
            .ok_or_else(|| malformed(line, "expected x,y,z prefix"))?;
        part.trim()
            .parse()
            .map_err(|_| malformed(line, format!("invalid coordinate {part:?}")))
    };
    let pos = BlockPos::new(coord()?, coord()?, coord()?);
    let rest = parts
        .next()
        .ok_or_else(|| malformed(line, "missing payload after coordinates"))?;
    Ok((pos, rest.trim()))
}

fn parse_int(line: usize, part: Option<&str>) -> Result<i32, VoxelError> {
    let part = part.ok_or_else(|| malformed(line, "missing field"))?.trim();
    part.parse()
        .map_err(|_| malformed(line, format!("invalid integer {part:?}")))
}

fn malformed(line: usize, reason: impl Into<String>) -> VoxelError {
    VoxelError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{AttributeVector, BlockType, StairSubtype, HOLE};

    fn stairs() -> Voxel {
        Voxel::new(
            BlockPos::new(3, 1, 2),
            SemanticBlock {
                block_type: BlockType::Stairs,
                subtype: Some(StairSubtype::Birch),
                attributes: AttributeVector::new([3, 1, 2, 0, -1]),
            },
        )
    }

    #[test]
    fn record_format() {
        assert_eq!(format_voxel(&stairs()), "3,1,2,(2,2,[3,1,2,0,-1])");
        assert_eq!(
            format_record(BlockPos::new(0, 0, 0), &HOLE),
            "0,0,0,(-1,-1,[-1,-1,-1,-1,-1])"
        );
    }

    #[test]
    fn semantic_records_roundtrip() {
        let planks = Voxel::new(BlockPos::new(0, 0, 0), SemanticBlock::new(BlockType::Planks));
        let voxels = vec![planks, stairs()];
        let mut buf = Vec::new();
        write_semantic_records(&mut buf, &voxels).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with(SEMANTIC_RECORD_HEADER));
        assert_eq!(read_semantic_records(buf.as_slice()).unwrap(), voxels);
        assert_eq!(read_semantic_lines(buf.as_slice()).unwrap().len(), 2);
    }

    #[test]
    fn block_listing_roundtrip_with_substitution() {
        let blocks = vec![
            RawBlock {
                pos: BlockPos::new(0, 0, 0),
                name: "minecraft:dirt".into(),
            },
            RawBlock {
                pos: BlockPos::new(1, 0, 0),
                name: "minecraft:oak_fence[east=true,north=false,south=false,waterlogged=false,west=true]"
                    .into(),
            },
        ];
        let subs = [Substitution::new("minecraft:dirt", "minecraft:grass_block[snowy=false]")];
        let mut buf = Vec::new();
        write_block_listing(&mut buf, &blocks, &subs).unwrap();
        let read = read_block_listing(buf.as_slice()).unwrap();
        assert_eq!(read[0].name, "minecraft:grass_block[snowy=false]");
        // commas inside the property list stay part of the block string
        assert_eq!(read[1], blocks[1]);
    }

    #[test]
    fn header_required() {
        let text = "0,0,0,(0,-1,[1,-1,-1,-1,-1])\n";
        assert!(matches!(
            read_semantic_records(text.as_bytes()),
            Err(VoxelError::UnsupportedRecordVersion(_))
        ));
        let text = "# schem-rs semantic record v2\n";
        assert!(matches!(
            read_semantic_records(text.as_bytes()),
            Err(VoxelError::UnsupportedRecordVersion(h)) if h.ends_with("v2")
        ));
        assert!(matches!(
            read_block_listing(SEMANTIC_RECORD_HEADER.as_bytes()),
            Err(VoxelError::UnsupportedRecordVersion(_))
        ));
    }

    #[test]
    fn malformed_lines_report_line_number() {
        let text = format!("{SEMANTIC_RECORD_HEADER}\n0,0,0,(0,-1,[1,-1,-1,-1,-1])\n\n1,0,0,(0,-1,[1,-1])\n");
        assert!(matches!(
            read_semantic_records(text.as_bytes()),
            Err(VoxelError::MalformedRecord { line: 4, .. })
        ));
        let text = format!("{SEMANTIC_RECORD_HEADER}\n-1,0,0,(0,-1,[1,-1,-1,-1,-1])\n");
        assert!(matches!(
            read_semantic_records(text.as_bytes()),
            Err(VoxelError::MalformedRecord { line: 2, .. })
        ));
        let text = format!("{BLOCK_LISTING_HEADER}\n0,0,minecraft:air\n");
        assert!(matches!(
            read_block_listing(text.as_bytes()),
            Err(VoxelError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn holes_parse_but_are_not_voxels() {
        let (pos, cell) = parse_record(1, "1,2,3,(-1,-1,[-1,-1,-1,-1,-1])").unwrap();
        assert_eq!(pos, BlockPos::new(1, 2, 3));
        assert_eq!(cell, HOLE);
        let text = format!("{SEMANTIC_RECORD_HEADER}\n1,2,3,(-1,-1,[-1,-1,-1,-1,-1])\n");
        assert!(matches!(
            read_semantic_records(text.as_bytes()),
            Err(VoxelError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn parse_tolerates_spaces() {
        let (_, cell) = parse_record(1, "0, 0, 0, (2, 0, [0, 0, 0, 0, -1])").unwrap();
        assert_eq!(cell, [2, 0, 0, 0, 0, 0, -1]);
    }
}
