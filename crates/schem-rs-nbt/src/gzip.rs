//! Gzip framing used by `.schem` files on disk.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::NbtError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns true if `data` starts with the gzip member header.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>, NbtError> {
    let mut decoder = GzDecoder::new(data);
    let mut output = Vec::new();
    decoder
        .read_to_end(&mut output)
        .map_err(|e| NbtError::Compression(e.to_string()))?;
    Ok(output)
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>, NbtError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| NbtError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| NbtError::Compression(e.to_string()))
}
