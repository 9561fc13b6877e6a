//! Errors for decoding, parsing, and materializing voxel structures.

use thiserror::Error;

use schem_rs_nbt::NbtError;

#[derive(Debug, Error)]
pub enum VoxelError {
    #[error("byte stream truncated: negative byte at offset {offset} has no continuation")]
    TruncatedStream { offset: usize },

    #[error("byte stream corrupt: continuation byte {byte} at offset {offset} yields a negative index")]
    InvalidContinuation { offset: usize, byte: i8 },

    #[error("palette index {value} cannot be encoded in two signed bytes")]
    EncodingOverflow { value: u32 },

    #[error("malformed block string {raw:?}: {reason}")]
    Parse { raw: String, reason: &'static str },

    #[error("unknown block type: {name}")]
    UnknownBlockType { name: String },

    #[error("block {name}: invalid value {value:?} for property {key}")]
    InvalidPropertyValue {
        name: String,
        key: String,
        value: String,
    },

    #[error("palette entry {name:?} -> {id} conflicts with an existing entry")]
    DuplicatePaletteEntry { name: String, id: u32 },

    #[error("palette index {0} has no palette entry")]
    UnknownPaletteIndex(u32),

    #[error("expected {expected} palette indices for the structure volume, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("voxel ({x}, {y}, {z}) lies outside a {width}x{height}x{length} extent")]
    OutOfBounds {
        x: u32,
        y: u32,
        z: u32,
        width: u32,
        height: u32,
        length: u32,
    },

    #[error("schematic is missing tag {0}")]
    MissingTag(&'static str),

    #[error("schematic tag {tag} has the wrong type (expected {expected})")]
    WrongTagType {
        tag: &'static str,
        expected: &'static str,
    },

    #[error("invalid schematic dimension {name} = {value}")]
    InvalidDimension { name: &'static str, value: i64 },

    #[error("unsupported record format header: {0:?}")]
    UnsupportedRecordVersion(String),

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("invalid npy data: {0}")]
    Npy(String),

    #[error("NBT error: {0}")]
    Nbt(#[from] NbtError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoxelError {
    /// Per-record grammar failures: the caller skips the record and carries on.
    /// Everything else signals corrupt or incompatible input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VoxelError::Parse { .. }
                | VoxelError::UnknownBlockType { .. }
                | VoxelError::InvalidPropertyValue { .. }
        )
    }
}
