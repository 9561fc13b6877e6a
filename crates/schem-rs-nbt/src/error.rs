//! Errors raised while reading or writing NBT.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NbtError {
    #[error("NBT data ended mid-tag")]
    UnexpectedEof,

    #[error("root tag must be TAG_Compound (10), found type {got}")]
    ExpectedCompound { got: u8 },

    #[error("unknown tag type: {0}")]
    UnknownTagType(u8),

    #[error("invalid UTF-8 in NBT string")]
    InvalidUtf8,

    #[error("compound/list nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("negative length prefix: {0}")]
    NegativeLength(i32),

    #[error("string of {len} bytes exceeds the u16 length prefix")]
    StringTooLong { len: usize },

    #[error("list mixes element types {first} and {other}")]
    MixedList { first: u8, other: u8 },

    #[error("gzip error: {0}")]
    Compression(String),
}
