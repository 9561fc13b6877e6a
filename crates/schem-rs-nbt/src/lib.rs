//! NBT (Named Binary Tag) implementation for Java Edition structure files.
//!
//! Java Edition NBT is big-endian: scalars use their natural width, string
//! lengths are `u16`, and array/list lengths are `i32`. Files on disk are
//! usually wrapped in a single gzip member.

pub mod error;
pub mod gzip;
mod io;
pub mod tag;

pub use error::NbtError;
pub use tag::{NbtCompound, NbtRoot, NbtTag, TagKind};

use bytes::{Buf, BufMut};

/// Read big-endian NBT from a buffer.
pub fn read_nbt(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    io::read_nbt(buf)
}

/// Write big-endian NBT to a buffer.
pub fn write_nbt(buf: &mut impl BufMut, root: &NbtRoot) -> Result<(), NbtError> {
    io::write_nbt(buf, root)
}

/// Read NBT from file contents, inflating them first if they are gzipped.
pub fn read_file_bytes(data: &[u8]) -> Result<NbtRoot, NbtError> {
    if gzip::is_gzip(data) {
        let raw = gzip::decompress(data)?;
        read_nbt(&mut raw.as_slice())
    } else {
        read_nbt(&mut &data[..])
    }
}

/// Serialize NBT and gzip it, ready to be written to a `.schem` file.
pub fn write_file_bytes(root: &NbtRoot) -> Result<Vec<u8>, NbtError> {
    let mut raw = Vec::new();
    write_nbt(&mut raw, root)?;
    gzip::compress(&raw)
}
