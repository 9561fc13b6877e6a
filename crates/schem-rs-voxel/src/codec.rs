//! Variable-width packing of palette indices into signed bytes.
//!
//! Indices `0..=127` occupy one byte. Larger indices occupy two: a negative
//! low byte `(v mod 128) - 128` followed by `v div 128`. This is the two-byte
//! case of an LEB128 varint viewed through signed bytes, which is how Sponge
//! schematics store `BlockData`.

use crate::error::VoxelError;

/// A palette index as stored in the block stream.
pub type PaletteIndex = u32;

/// Largest index the two-byte form can carry: high byte 127, low byte 127.
pub const MAX_ENCODABLE: PaletteIndex = 127 * 128 + 127;

/// Decode a packed block stream into palette indices.
///
/// Fails on a trailing negative byte. The whole decode aborts; no partial
/// output is returned.
pub fn decode(bytes: &[i8]) -> Result<Vec<PaletteIndex>, VoxelError> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b >= 0 {
            out.push(b as PaletteIndex);
            i += 1;
            continue;
        }
        let next = *bytes
            .get(i + 1)
            .ok_or(VoxelError::TruncatedStream { offset: i })?;
        let value = (i32::from(next) + 1) * 128 + i32::from(b);
        if value < 0 {
            return Err(VoxelError::InvalidContinuation {
                offset: i + 1,
                byte: next,
            });
        }
        out.push(value as PaletteIndex);
        i += 2;
    }
    Ok(out)
}

/// Encode palette indices into a packed block stream.
pub fn encode(values: &[PaletteIndex]) -> Result<Vec<i8>, VoxelError> {
    let mut out = Vec::with_capacity(values.len());
    for &value in values {
        encode_one(value, &mut out)?;
    }
    Ok(out)
}

fn encode_one(value: PaletteIndex, out: &mut Vec<i8>) -> Result<(), VoxelError> {
    match encoded_len(value) {
        Some(1) => out.push(value as i8),
        Some(_) => {
            // low in -128..=-1, high in 1..=127
            out.push(((value % 128) as i32 - 128) as i8);
            out.push((value / 128) as i8);
        }
        None => return Err(VoxelError::EncodingOverflow { value }),
    }
    Ok(())
}

/// Number of bytes `value` occupies once encoded, or `None` if it cannot be.
pub fn encoded_len(value: PaletteIndex) -> Option<usize> {
    match value {
        0..=127 => Some(1),
        128..=MAX_ENCODABLE => Some(2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_values_pass_through() {
        let values: Vec<PaletteIndex> = (0..=127).collect();
        let encoded = encode(&values).unwrap();
        assert_eq!(encoded.len(), 128);
        assert_eq!(encoded[127], 127);
        assert_eq!(decode(&encoded).unwrap(), values);
    }

    #[test]
    fn two_byte_layout() {
        assert_eq!(encode(&[128]).unwrap(), vec![-128, 1]);
        assert_eq!(encode(&[200]).unwrap(), vec![-56, 1]);
        assert_eq!(encode(&[300]).unwrap(), vec![-84, 2]);
        assert_eq!(encode(&[MAX_ENCODABLE]).unwrap(), vec![-1, 127]);
    }

    #[test]
    fn decode_formula() {
        // (next + 1) * 128 + b
        assert_eq!(decode(&[-128, 1]).unwrap(), vec![128]);
        assert_eq!(decode(&[-84, 2]).unwrap(), vec![300]);
        assert_eq!(decode(&[-1, 127]).unwrap(), vec![MAX_ENCODABLE]);
    }

    #[test]
    fn every_encodable_value_roundtrips() {
        for v in 0..=1_000_000u32 {
            match encoded_len(v) {
                Some(len) => {
                    let encoded = encode(&[v]).unwrap();
                    assert_eq!(encoded.len(), len);
                    assert_eq!(decode(&encoded).unwrap(), vec![v], "value {v}");
                }
                None => assert!(matches!(
                    encode(&[v]),
                    Err(VoxelError::EncodingOverflow { value }) if value == v
                )),
            }
        }
    }

    #[test]
    fn mixed_stream_roundtrips() {
        let values = vec![0, 127, 128, 5, 16_000, 126, 255, 1, 4_096, 127, 0];
        let encoded = encode(&values).unwrap();
        assert_eq!(encoded.len(), 15);
        assert_eq!(decode(&encoded).unwrap(), values);
    }

    #[test]
    fn empty_stream() {
        assert!(decode(&[]).unwrap().is_empty());
        assert!(encode(&[]).unwrap().is_empty());
    }

    #[test]
    fn trailing_negative_byte_is_truncation() {
        assert!(matches!(
            decode(&[3, 4, -5]),
            Err(VoxelError::TruncatedStream { offset: 2 })
        ));
    }

    #[test]
    fn negative_continuation_rejected() {
        assert!(matches!(
            decode(&[-5, -1]),
            Err(VoxelError::InvalidContinuation { offset: 1, byte: -1 })
        ));
    }

    #[test]
    fn overflow_rejected_before_emission() {
        assert!(matches!(
            encode(&[1, MAX_ENCODABLE + 1]),
            Err(VoxelError::EncodingOverflow { value: 16_384 })
        ));
    }
}
