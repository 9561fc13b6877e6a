//! Block string grammar: `namespace:name[key=value,...]` to [`SemanticBlock`].
//!
//! Each block type owns a schema, a list of property slots with their
//! defaults, so missing properties never need ad hoc fallbacks at the call
//! site.

use std::collections::HashMap;

use crate::block::{AttributeVector, BlockType, SemanticBlock, StairSubtype};
use crate::error::VoxelError;

const FACINGS: &[&str] = &["north", "east", "south", "west"];
const STAIR_SHAPES: &[&str] = &[
    "straight",
    "inner_left",
    "inner_right",
    "outer_left",
    "outer_right",
];
const AXES: &[&str] = &["x", "y", "z"];

/// How a property value becomes a slot integer.
#[derive(Debug, Clone, Copy)]
enum Encoding {
    /// Position in a closed list of names; anything else is invalid.
    Index(&'static [&'static str]),
    /// `0` when the value equals the given word, `1` for anything else.
    ZeroWhen(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    key: &'static str,
    default: &'static str,
    encoding: Encoding,
}

impl Slot {
    const fn index(key: &'static str, default: &'static str, names: &'static [&'static str]) -> Self {
        Self {
            key,
            default,
            encoding: Encoding::Index(names),
        }
    }

    /// Two-state property whose default is also its zero value.
    const fn binary(key: &'static str, zero: &'static str) -> Self {
        Self {
            key,
            default: zero,
            encoding: Encoding::ZeroWhen(zero),
        }
    }

    const fn flag(key: &'static str) -> Self {
        Self::binary(key, "false")
    }

    fn encode(&self, value: &str) -> Option<i32> {
        match self.encoding {
            Encoding::Index(names) => names.iter().position(|n| *n == value).map(|i| i as i32),
            Encoding::ZeroWhen(zero) => Some(i32::from(value != zero)),
        }
    }
}

const STAIRS_SCHEMA: &[Slot] = &[
    Slot::index("facing", "north", FACINGS),
    Slot::binary("half", "bottom"),
    Slot::index("shape", "straight", STAIR_SHAPES),
    Slot::flag("waterlogged"),
];

const LOG_SCHEMA: &[Slot] = &[Slot::index("axis", "y", AXES)];

const SLAB_SCHEMA: &[Slot] = &[Slot::binary("type", "bottom"), Slot::flag("waterlogged")];

const CONNECTED_SCHEMA: &[Slot] = &[
    Slot::flag("east"),
    Slot::flag("north"),
    Slot::flag("south"),
    Slot::flag("waterlogged"),
    Slot::flag("west"),
];

const DOOR_SCHEMA: &[Slot] = &[
    Slot::index("facing", "north", FACINGS),
    Slot::binary("half", "lower"),
    Slot::binary("hinge", "left"),
    Slot::flag("open"),
    Slot::flag("powered"),
];

const GRASS_SCHEMA: &[Slot] = &[Slot::flag("snowy")];

fn schema(block_type: BlockType) -> &'static [Slot] {
    match block_type {
        BlockType::Stairs => STAIRS_SCHEMA,
        BlockType::Log => LOG_SCHEMA,
        BlockType::Slab => SLAB_SCHEMA,
        BlockType::Fence | BlockType::GlassPane => CONNECTED_SCHEMA,
        BlockType::Door => DOOR_SCHEMA,
        BlockType::GrassBlock => GRASS_SCHEMA,
        BlockType::Air | BlockType::Planks | BlockType::Functional => &[],
    }
}

/// A raw block string split into its parts, borrowing from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockString<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    /// `None` when no bracketed list is present; an empty `[]` yields `Some`
    /// with no entries.
    pub properties: Option<Vec<(&'a str, &'a str)>>,
}

impl<'a> BlockString<'a> {
    /// Split `namespace:name[k=v,...]`. Names are restricted to ASCII word
    /// characters; there is no escaping.
    pub fn split(raw: &'a str) -> Result<Self, VoxelError> {
        let malformed = |reason| VoxelError::Parse {
            raw: raw.to_string(),
            reason,
        };

        let (id, props) = match raw.find('[') {
            Some(open) => {
                let rest = &raw[open + 1..];
                let inner = rest
                    .strip_suffix(']')
                    .ok_or_else(|| malformed("property list is not closed by ']'"))?;
                (&raw[..open], Some(inner))
            }
            None => (raw, None),
        };

        let (namespace, name) = id
            .split_once(':')
            .ok_or_else(|| malformed("block name is not namespace-qualified"))?;
        if namespace.is_empty() || !namespace.bytes().all(is_namespace_byte) {
            return Err(malformed("invalid namespace"));
        }
        if name.is_empty() || !name.bytes().all(is_word_byte) {
            return Err(malformed("invalid block name"));
        }

        let properties = match props {
            None => None,
            Some("") => Some(Vec::new()),
            Some(list) => {
                let mut entries = Vec::new();
                for entry in list.split(',') {
                    let (key, value) = entry
                        .split_once('=')
                        .ok_or_else(|| malformed("property is not a key=value pair"))?;
                    if key.is_empty() || value.contains('=') {
                        return Err(malformed("property is not a key=value pair"));
                    }
                    entries.push((key, value));
                }
                Some(entries)
            }
        };

        Ok(Self {
            namespace,
            name,
            properties,
        })
    }

    /// Later duplicates of a key override earlier ones.
    fn property_map(&self) -> HashMap<&'a str, &'a str> {
        self.properties
            .iter()
            .flatten()
            .map(|&(k, v)| (k, v))
            .collect()
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_namespace_byte(b: u8) -> bool {
    is_word_byte(b) || b == b'.' || b == b'-'
}

/// Parse a raw block string into its semantic tuple.
///
/// [`VoxelError::Parse`], [`VoxelError::UnknownBlockType`] and
/// [`VoxelError::InvalidPropertyValue`] are per-record failures; see
/// [`VoxelError::is_recoverable`].
pub fn parse(raw: &str) -> Result<SemanticBlock, VoxelError> {
    let block = BlockString::split(raw)?;
    let block_type = BlockType::resolve(block.name).ok_or_else(|| VoxelError::UnknownBlockType {
        name: block.name.to_string(),
    })?;

    let props = block.property_map();
    let mut slots = Vec::with_capacity(5);
    for slot in schema(block_type) {
        let value = props.get(slot.key).copied().unwrap_or(slot.default);
        let encoded = slot
            .encode(value)
            .ok_or_else(|| VoxelError::InvalidPropertyValue {
                name: block.name.to_string(),
                key: slot.key.to_string(),
                value: value.to_string(),
            })?;
        slots.push(encoded);
    }

    let subtype = match block_type {
        BlockType::Stairs => StairSubtype::from_block_name(block.name),
        _ => None,
    };

    Ok(SemanticBlock {
        block_type,
        subtype,
        attributes: AttributeVector::padded(&slots),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(block: &SemanticBlock) -> [i32; 5] {
        *block.attributes.as_array()
    }

    #[test]
    fn stairs_defaults() {
        let b = parse("minecraft:oak_stairs").unwrap();
        assert_eq!(b.block_type, BlockType::Stairs);
        assert_eq!(b.subtype, Some(StairSubtype::Oak));
        assert_eq!(attrs(&b), [0, 0, 0, 0, -1]);
    }

    #[test]
    fn stairs_explicit() {
        let b = parse(
            "minecraft:spruce_stairs[facing=west,half=top,shape=outer_right,waterlogged=true]",
        )
        .unwrap();
        assert_eq!(b.subtype, Some(StairSubtype::Spruce));
        assert_eq!(attrs(&b), [3, 1, 4, 1, -1]);
    }

    #[test]
    fn unnamed_stair_variant_has_no_subtype() {
        let b = parse("minecraft:cobblestone_stairs[facing=south]").unwrap();
        assert_eq!(b.block_type, BlockType::Stairs);
        assert_eq!(b.subtype, None);
        assert_eq!(attrs(&b), [2, 0, 0, 0, -1]);
    }

    #[test]
    fn door_explicit() {
        let b = parse(
            "minecraft:oak_door[facing=east,half=upper,hinge=right,open=true,powered=false]",
        )
        .unwrap();
        assert_eq!(b.block_type, BlockType::Door);
        assert_eq!(b.subtype, None);
        assert_eq!(attrs(&b), [1, 1, 1, 1, 0]);
    }

    #[test]
    fn door_defaults() {
        let b = parse("minecraft:birch_door").unwrap();
        assert_eq!(attrs(&b), [0, 0, 0, 0, 0]);
    }

    #[test]
    fn log_axis() {
        assert_eq!(attrs(&parse("minecraft:oak_log[axis=x]").unwrap()), [0, -1, -1, -1, -1]);
        assert_eq!(attrs(&parse("minecraft:oak_log").unwrap()), [1, -1, -1, -1, -1]);
        assert_eq!(attrs(&parse("minecraft:oak_log[axis=z]").unwrap()), [2, -1, -1, -1, -1]);
    }

    #[test]
    fn slab() {
        let b = parse("minecraft:oak_slab[type=top,waterlogged=false]").unwrap();
        assert_eq!(b.block_type, BlockType::Slab);
        assert_eq!(attrs(&b), [1, 0, -1, -1, -1]);
        // Anything other than "bottom" reads as 1, including "double".
        let b = parse("minecraft:oak_slab[type=double]").unwrap();
        assert_eq!(attrs(&b), [1, 0, -1, -1, -1]);
    }

    #[test]
    fn fence_and_pane_connections() {
        let b = parse("minecraft:oak_fence[east=true,north=false,south=true,waterlogged=false,west=false]")
            .unwrap();
        assert_eq!(b.block_type, BlockType::Fence);
        assert_eq!(attrs(&b), [1, 0, 1, 0, 0]);
        let b = parse("minecraft:glass_pane[west=true]").unwrap();
        assert_eq!(b.block_type, BlockType::GlassPane);
        assert_eq!(attrs(&b), [0, 0, 0, 0, 1]);
    }

    #[test]
    fn grass_block() {
        let b = parse("minecraft:grass_block[snowy=false]").unwrap();
        assert_eq!(b.block_type, BlockType::GrassBlock);
        assert_eq!(attrs(&b), [0, -1, -1, -1, -1]);
        assert_eq!(attrs(&parse("minecraft:grass_block[snowy=true]").unwrap())[0], 1);
    }

    #[test]
    fn propertyless_types() {
        for raw in ["minecraft:air", "minecraft:oak_planks", "minecraft:spruce_planks[foo=bar]"] {
            let b = parse(raw).unwrap();
            assert_eq!(b.attributes, AttributeVector::EMPTY, "{raw}");
            assert_eq!(b.subtype, None);
        }
    }

    #[test]
    fn boolean_anything_but_false_is_one() {
        let b = parse("minecraft:oak_fence[east=yes,north=1,south=False]").unwrap();
        assert_eq!(attrs(&b), [1, 1, 1, 0, 0]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let b = parse("minecraft:oak_stairs[facing=east,colour=red]").unwrap();
        assert_eq!(attrs(&b), [1, 0, 0, 0, -1]);
    }

    #[test]
    fn other_namespaces_accepted() {
        let b = parse("mymod:walnut_log[axis=x]").unwrap();
        assert_eq!(b.block_type, BlockType::Log);
    }

    #[test]
    fn unknown_type_is_recoverable() {
        let err = parse("minecraft:stone").unwrap_err();
        assert!(matches!(err, VoxelError::UnknownBlockType { ref name } if name == "stone"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn malformed_strings() {
        for raw in [
            "oak_stairs",
            ":oak_stairs",
            "minecraft:",
            "minecraft:oak stairs",
            "minecraft:oak_stairs[facing=north",
            "minecraft:oak_stairs[facing]",
            "minecraft:oak_stairs[=north]",
            "",
        ] {
            let err = parse(raw).unwrap_err();
            assert!(matches!(err, VoxelError::Parse { .. }), "{raw}: {err}");
            assert!(err.is_recoverable());
        }
    }

    #[test]
    fn invalid_enumerated_value() {
        let err = parse("minecraft:oak_stairs[facing=up]").unwrap_err();
        assert!(matches!(
            err,
            VoxelError::InvalidPropertyValue { ref key, ref value, .. } if key == "facing" && value == "up"
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn empty_property_list() {
        let split = BlockString::split("minecraft:oak_log[]").unwrap();
        assert_eq!(split.properties, Some(vec![]));
        assert_eq!(attrs(&parse("minecraft:oak_log[]").unwrap())[0], 1);
    }

    #[test]
    fn split_parts() {
        let split = BlockString::split("minecraft:oak_door[half=upper,open=true]").unwrap();
        assert_eq!(split.namespace, "minecraft");
        assert_eq!(split.name, "oak_door");
        assert_eq!(
            split.properties,
            Some(vec![("half", "upper"), ("open", "true")])
        );
        assert_eq!(BlockString::split("minecraft:air").unwrap().properties, None);
    }
}
