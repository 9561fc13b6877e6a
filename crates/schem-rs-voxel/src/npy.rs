//! NumPy `.npy` persistence for dense grids.
//!
//! Grids are stored as little-endian `int32` (`<i4`), C order, shape
//! `(W, H, L, 7)`. Format versions 1.0 and 2.0 are read; 1.0 is written.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bytes::{Buf, BufMut, BytesMut};

use crate::block::{Cell, CHANNELS};
use crate::error::VoxelError;
use crate::grid::DenseGrid;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const DTYPE: &str = "<i4";
const ALIGN: usize = 64;

/// File name of the artifact for unique variant `index`.
pub fn variant_file_name(index: usize) -> String {
    format!("block_data_{index}.npy")
}

pub fn variant_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(variant_file_name(index))
}

/// Inverse of [`variant_file_name`].
pub fn variant_index(file_name: &str) -> Option<usize> {
    let digits = file_name.strip_prefix("block_data_")?.strip_suffix(".npy")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn write<W: Write>(grid: &DenseGrid, mut w: W) -> Result<(), VoxelError> {
    let [x, y, z, c] = grid.array_shape();
    let dict = format!(
        "{{'descr': '{DTYPE}', 'fortran_order': False, 'shape': ({x}, {y}, {z}, {c}), }}"
    );
    // magic + version + u16 length, then the dict padded with spaces and
    // terminated by a newline so the data starts on an aligned offset
    let prefix = MAGIC.len() + 2 + 2;
    let unpadded = prefix + dict.len() + 1;
    let padding = (ALIGN - unpadded % ALIGN) % ALIGN;
    let header_len = dict.len() + padding + 1;
    let header_len = u16::try_from(header_len)
        .map_err(|_| VoxelError::Npy(format!("header too long: {header_len} bytes")))?;

    let mut buf = BytesMut::with_capacity(prefix + header_len as usize + grid.cells().len() * CHANNELS * 4);
    buf.put_slice(MAGIC);
    buf.put_u8(1);
    buf.put_u8(0);
    buf.put_u16_le(header_len);
    buf.put_slice(dict.as_bytes());
    buf.put_bytes(b' ', padding);
    buf.put_u8(b'\n');
    for cell in grid.cells() {
        for &v in cell {
            buf.put_i32_le(v);
        }
    }
    w.write_all(&buf)?;
    w.flush()?;
    Ok(())
}

pub fn read<R: Read>(mut r: R) -> Result<DenseGrid, VoxelError> {
    let mut data = Vec::new();
    r.read_to_end(&mut data)?;
    let mut buf = data.as_slice();

    if buf.remaining() < MAGIC.len() + 2 || &buf[..MAGIC.len()] != MAGIC {
        return Err(VoxelError::Npy("missing magic string".into()));
    }
    buf.advance(MAGIC.len());
    let major = buf.get_u8();
    let _minor = buf.get_u8();
    let header_len = match major {
        1 if buf.remaining() >= 2 => buf.get_u16_le() as usize,
        2 if buf.remaining() >= 4 => buf.get_u32_le() as usize,
        1 | 2 => return Err(VoxelError::Npy("truncated header".into())),
        v => return Err(VoxelError::Npy(format!("unsupported format version {v}"))),
    };
    if buf.remaining() < header_len {
        return Err(VoxelError::Npy("truncated header".into()));
    }
    let header = std::str::from_utf8(&buf[..header_len])
        .map_err(|_| VoxelError::Npy("header is not valid text".into()))?;
    let (descr, fortran, shape) = parse_header(header)?;
    buf.advance(header_len);

    if descr != DTYPE {
        return Err(VoxelError::Npy(format!("unsupported dtype {descr}, expected {DTYPE}")));
    }
    if fortran {
        return Err(VoxelError::Npy("Fortran-ordered arrays are not supported".into()));
    }
    let [w, h, l] = match shape.as_slice() {
        &[w, h, l, c] if c == CHANNELS => [w, h, l],
        other => {
            return Err(VoxelError::Npy(format!(
                "expected shape (W, H, L, {CHANNELS}), got {other:?}"
            )))
        }
    };

    let too_large = || VoxelError::Npy(format!("shape too large: ({w}, {h}, {l}, {CHANNELS})"));
    let count = w
        .checked_mul(h)
        .and_then(|n| n.checked_mul(l))
        .ok_or_else(too_large)?;
    let data_len = count
        .checked_mul(CHANNELS * 4)
        .ok_or_else(too_large)?;
    if buf.remaining() != data_len {
        return Err(VoxelError::Npy(format!(
            "expected {data_len} data bytes, got {}",
            buf.remaining()
        )));
    }
    let mut cells = Vec::with_capacity(count);
    for _ in 0..count {
        let mut cell: Cell = [0; CHANNELS];
        for v in cell.iter_mut() {
            *v = buf.get_i32_le();
        }
        cells.push(cell);
    }
    DenseGrid::from_cells([w, h, l], cells)
        .ok_or_else(|| VoxelError::Npy("cell count does not match shape".into()))
}

pub fn save(grid: &DenseGrid, path: &Path) -> Result<(), VoxelError> {
    let file = std::fs::File::create(path)?;
    write(grid, std::io::BufWriter::new(file))
}

pub fn load(path: &Path) -> Result<DenseGrid, VoxelError> {
    let file = std::fs::File::open(path)?;
    read(std::io::BufReader::new(file))
}

/// Pull `descr`, `fortran_order` and `shape` out of the header dict.
fn parse_header(header: &str) -> Result<(String, bool, Vec<usize>), VoxelError> {
    let descr = dict_value(header, "descr")?
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string();
    let fortran = match dict_value(header, "fortran_order")? {
        "False" => false,
        "True" => true,
        other => return Err(VoxelError::Npy(format!("invalid fortran_order {other:?}"))),
    };
    let shape = dict_value(header, "shape")?
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| VoxelError::Npy(format!("invalid shape entry {s:?}")))
        })
        .collect::<Result<Vec<usize>, _>>()?;
    Ok((descr, fortran, shape))
}

fn dict_value<'a>(header: &'a str, key: &str) -> Result<&'a str, VoxelError> {
    let missing = || VoxelError::Npy(format!("header has no {key:?} entry"));
    let start = header
        .find(&format!("'{key}'"))
        .or_else(|| header.find(&format!("\"{key}\"")))
        .ok_or_else(missing)?;
    let rest = &header[start + key.len() + 2..];
    let rest = rest.trim_start().strip_prefix(':').ok_or_else(missing)?.trim_start();
    let end = if rest.starts_with('(') {
        rest.find(')').map(|i| i + 1)
    } else {
        rest.find([',', '}'])
    }
    .ok_or_else(missing)?;
    Ok(rest[..end].trim())
}
