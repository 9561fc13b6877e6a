//! NBT tag types.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::NbtError;

/// A compound tag: map of name -> tag.
///
/// Ordered so that writing the same compound twice yields identical bytes.
pub type NbtCompound = BTreeMap<String, NbtTag>;

/// A named root compound. Sponge schematics name it `Schematic`.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtRoot {
    pub name: String,
    pub compound: NbtCompound,
}

impl NbtRoot {
    pub fn new(name: impl Into<String>, compound: NbtCompound) -> Self {
        Self {
            name: name.into(),
            compound,
        }
    }

    /// Look up a top-level tag by name.
    pub fn get(&self, name: &str) -> Option<&NbtTag> {
        self.compound.get(name)
    }
}

/// Wire identifier of a tag. `End` only ever appears as a terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TagKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    pub fn from_id(id: u8) -> Result<Self, NbtError> {
        Ok(match id {
            0 => Self::End,
            1 => Self::Byte,
            2 => Self::Short,
            3 => Self::Int,
            4 => Self::Long,
            5 => Self::Float,
            6 => Self::Double,
            7 => Self::ByteArray,
            8 => Self::String,
            9 => Self::List,
            10 => Self::Compound,
            11 => Self::IntArray,
            12 => Self::LongArray,
            other => return Err(NbtError::UnknownTagType(other)),
        })
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Represents any NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtTag>),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtTag {
    pub fn kind(&self) -> TagKind {
        match self {
            NbtTag::Byte(_) => TagKind::Byte,
            NbtTag::Short(_) => TagKind::Short,
            NbtTag::Int(_) => TagKind::Int,
            NbtTag::Long(_) => TagKind::Long,
            NbtTag::Float(_) => TagKind::Float,
            NbtTag::Double(_) => TagKind::Double,
            NbtTag::ByteArray(_) => TagKind::ByteArray,
            NbtTag::String(_) => TagKind::String,
            NbtTag::List(_) => TagKind::List,
            NbtTag::Compound(_) => TagKind::Compound,
            NbtTag::IntArray(_) => TagKind::IntArray,
            NbtTag::LongArray(_) => TagKind::LongArray,
        }
    }

    /// Integer value of any of the integral scalar tags, widened to `i64`.
    ///
    /// Schematic writers disagree on whether dimensions are `Short` or `Int`,
    /// so readers go through this rather than a single typed accessor.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            NbtTag::Byte(v) => Some(i64::from(*v)),
            NbtTag::Short(v) => Some(i64::from(*v)),
            NbtTag::Int(v) => Some(i64::from(*v)),
            NbtTag::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            NbtTag::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&NbtCompound> {
        match self {
            NbtTag::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            NbtTag::ByteArray(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagKind::End => "TAG_End",
            TagKind::Byte => "TAG_Byte",
            TagKind::Short => "TAG_Short",
            TagKind::Int => "TAG_Int",
            TagKind::Long => "TAG_Long",
            TagKind::Float => "TAG_Float",
            TagKind::Double => "TAG_Double",
            TagKind::ByteArray => "TAG_Byte_Array",
            TagKind::String => "TAG_String",
            TagKind::List => "TAG_List",
            TagKind::Compound => "TAG_Compound",
            TagKind::IntArray => "TAG_Int_Array",
            TagKind::LongArray => "TAG_Long_Array",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_ids_roundtrip() {
        for id in 0..=12u8 {
            assert_eq!(TagKind::from_id(id).unwrap().id(), id);
        }
        assert!(matches!(
            TagKind::from_id(13),
            Err(NbtError::UnknownTagType(13))
        ));
    }

    #[test]
    fn kind_of_tags() {
        assert_eq!(NbtTag::Short(0).kind(), TagKind::Short);
        assert_eq!(NbtTag::ByteArray(vec![]).kind(), TagKind::ByteArray);
        assert_eq!(NbtTag::Compound(NbtCompound::new()).kind(), TagKind::Compound);
    }

    #[test]
    fn integer_widening() {
        assert_eq!(NbtTag::Byte(-3).as_integer(), Some(-3));
        assert_eq!(NbtTag::Short(300).as_integer(), Some(300));
        assert_eq!(NbtTag::Int(70_000).as_integer(), Some(70_000));
        assert_eq!(NbtTag::String("7".into()).as_integer(), None);
    }

    #[test]
    fn accessors() {
        assert_eq!(NbtTag::Int(42).as_int(), Some(42));
        assert_eq!(NbtTag::Short(42).as_int(), None);
        assert_eq!(NbtTag::ByteArray(vec![1, -1]).as_byte_array(), Some(&[1i8, -1][..]));
    }
}
