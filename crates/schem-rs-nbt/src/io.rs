//! Java Edition NBT read/write engine (big-endian throughout).

use bytes::{Buf, BufMut};

use crate::error::NbtError;
use crate::tag::{NbtCompound, NbtRoot, NbtTag, TagKind};

/// Compound and list nesting limit.
const MAX_DEPTH: usize = 512;

// -----------------------------------------------------------------------
// Reading
// -----------------------------------------------------------------------

pub(crate) fn read_nbt(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    ensure_remaining(buf, 1)?;
    let tag_type = buf.get_u8();
    if tag_type != TagKind::Compound.id() {
        return Err(NbtError::ExpectedCompound { got: tag_type });
    }
    let name = read_string(buf)?;
    let compound = read_compound(buf, 0)?;
    Ok(NbtRoot { name, compound })
}

fn read_tag(buf: &mut impl Buf, kind: TagKind, depth: usize) -> Result<NbtTag, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
    }

    match kind {
        TagKind::End => Err(NbtError::UnknownTagType(0)),
        TagKind::Byte => {
            ensure_remaining(buf, 1)?;
            Ok(NbtTag::Byte(buf.get_i8()))
        }
        TagKind::Short => {
            ensure_remaining(buf, 2)?;
            Ok(NbtTag::Short(buf.get_i16()))
        }
        TagKind::Int => {
            ensure_remaining(buf, 4)?;
            Ok(NbtTag::Int(buf.get_i32()))
        }
        TagKind::Long => {
            ensure_remaining(buf, 8)?;
            Ok(NbtTag::Long(buf.get_i64()))
        }
        TagKind::Float => {
            ensure_remaining(buf, 4)?;
            Ok(NbtTag::Float(buf.get_f32()))
        }
        TagKind::Double => {
            ensure_remaining(buf, 8)?;
            Ok(NbtTag::Double(buf.get_f64()))
        }
        TagKind::ByteArray => {
            let len = read_len(buf)?;
            ensure_remaining(buf, len)?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                arr.push(buf.get_i8());
            }
            Ok(NbtTag::ByteArray(arr))
        }
        TagKind::String => Ok(NbtTag::String(read_string(buf)?)),
        TagKind::List => {
            ensure_remaining(buf, 1)?;
            let element_id = buf.get_u8();
            let len = read_len(buf)?;
            if len == 0 {
                // Empty lists are commonly typed TAG_End.
                return Ok(NbtTag::List(Vec::new()));
            }
            let element_kind = TagKind::from_id(element_id)?;
            // Cap the preallocation; a hostile length still fails on EOF.
            let mut list = Vec::with_capacity(len.min(buf.remaining()));
            for _ in 0..len {
                list.push(read_tag(buf, element_kind, depth + 1)?);
            }
            Ok(NbtTag::List(list))
        }
        TagKind::Compound => Ok(NbtTag::Compound(read_compound(buf, depth + 1)?)),
        TagKind::IntArray => {
            let len = read_len(buf)?;
            ensure_remaining(buf, len.saturating_mul(4))?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                arr.push(buf.get_i32());
            }
            Ok(NbtTag::IntArray(arr))
        }
        TagKind::LongArray => {
            let len = read_len(buf)?;
            ensure_remaining(buf, len.saturating_mul(8))?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                arr.push(buf.get_i64());
            }
            Ok(NbtTag::LongArray(arr))
        }
    }
}

fn read_compound(buf: &mut impl Buf, depth: usize) -> Result<NbtCompound, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
    }
    let mut map = NbtCompound::new();
    loop {
        ensure_remaining(buf, 1)?;
        let kind = TagKind::from_id(buf.get_u8())?;
        if kind == TagKind::End {
            break;
        }
        let name = read_string(buf)?;
        let tag = read_tag(buf, kind, depth)?;
        map.insert(name, tag);
    }
    Ok(map)
}

fn read_len(buf: &mut impl Buf) -> Result<usize, NbtError> {
    ensure_remaining(buf, 4)?;
    let len = buf.get_i32();
    if len < 0 {
        return Err(NbtError::NegativeLength(len));
    }
    Ok(len as usize)
}

fn read_string(buf: &mut impl Buf) -> Result<String, NbtError> {
    ensure_remaining(buf, 2)?;
    let len = buf.get_u16() as usize;
    ensure_remaining(buf, len)?;
    let data = buf.copy_to_bytes(len);
    String::from_utf8(data.to_vec()).map_err(|_| NbtError::InvalidUtf8)
}

fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), NbtError> {
    if buf.remaining() < needed {
        Err(NbtError::UnexpectedEof)
    } else {
        Ok(())
    }
}

// -----------------------------------------------------------------------
// Writing
// -----------------------------------------------------------------------

pub(crate) fn write_nbt(buf: &mut impl BufMut, root: &NbtRoot) -> Result<(), NbtError> {
    buf.put_u8(TagKind::Compound.id());
    write_string(buf, &root.name)?;
    write_compound(buf, &root.compound)
}

fn write_tag(buf: &mut impl BufMut, tag: &NbtTag) -> Result<(), NbtError> {
    match tag {
        NbtTag::Byte(v) => buf.put_i8(*v),
        NbtTag::Short(v) => buf.put_i16(*v),
        NbtTag::Int(v) => buf.put_i32(*v),
        NbtTag::Long(v) => buf.put_i64(*v),
        NbtTag::Float(v) => buf.put_f32(*v),
        NbtTag::Double(v) => buf.put_f64(*v),
        NbtTag::ByteArray(arr) => {
            write_len(buf, arr.len())?;
            for &b in arr {
                buf.put_i8(b);
            }
        }
        NbtTag::String(s) => write_string(buf, s)?,
        NbtTag::List(list) => match list.first() {
            None => {
                buf.put_u8(TagKind::End.id());
                buf.put_i32(0);
            }
            Some(first) => {
                let first_kind = first.kind();
                if let Some(other) = list.iter().find(|t| t.kind() != first_kind) {
                    return Err(NbtError::MixedList {
                        first: first_kind.id(),
                        other: other.kind().id(),
                    });
                }
                buf.put_u8(first_kind.id());
                write_len(buf, list.len())?;
                for item in list {
                    write_tag(buf, item)?;
                }
            }
        },
        NbtTag::Compound(map) => write_compound(buf, map)?,
        NbtTag::IntArray(arr) => {
            write_len(buf, arr.len())?;
            for &v in arr {
                buf.put_i32(v);
            }
        }
        NbtTag::LongArray(arr) => {
            write_len(buf, arr.len())?;
            for &v in arr {
                buf.put_i64(v);
            }
        }
    }
    Ok(())
}

fn write_compound(buf: &mut impl BufMut, map: &NbtCompound) -> Result<(), NbtError> {
    for (name, tag) in map {
        buf.put_u8(tag.kind().id());
        write_string(buf, name)?;
        write_tag(buf, tag)?;
    }
    buf.put_u8(TagKind::End.id());
    Ok(())
}

fn write_len(buf: &mut impl BufMut, len: usize) -> Result<(), NbtError> {
    let len = i32::try_from(len).map_err(|_| NbtError::NegativeLength(i32::MIN))?;
    buf.put_i32(len);
    Ok(())
}

fn write_string(buf: &mut impl BufMut, s: &str) -> Result<(), NbtError> {
    let len = u16::try_from(s.len()).map_err(|_| NbtError::StringTooLong { len: s.len() })?;
    buf.put_u16(len);
    buf.put_slice(s.as_bytes());
    Ok(())
}
