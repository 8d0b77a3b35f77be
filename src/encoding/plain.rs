//! PLAIN encoders and decoders.
//!
//! Numerics are fixed-width little-endian, booleans are bit-packed
//! LSB-first, byte arrays carry a `u32` little-endian length prefix, and
//! fixed-length byte arrays are raw. Values arriving here have already been
//! normalized to their primitive representation.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use ordered_float::OrderedFloat;

use crate::basic::PhysicalType;
use crate::error::{ParquetError, Result};
use crate::value::ParquetValue;

/// Number of bytes `value` occupies under PLAIN encoding. Booleans count as
/// one byte; the bit-packing discount is not worth tracking for page sizing.
pub fn encoded_size(value: &ParquetValue) -> usize {
    match value {
        ParquetValue::Boolean(_) => 1,
        ParquetValue::Int32(_) | ParquetValue::Float32(_) => 4,
        ParquetValue::Int64(_) | ParquetValue::Float64(_) => 8,
        ParquetValue::Int96(_) => 12,
        ParquetValue::Bytes(b) => 4 + b.len(),
        _ => 0,
    }
}

/// Encode a run of primitive values.
pub fn encode(values: &[ParquetValue], physical: PhysicalType, out: &mut Vec<u8>) -> Result<()> {
    match physical {
        PhysicalType::Boolean => {
            let start = out.len();
            out.resize(start + values.len().div_ceil(8), 0);
            for (i, value) in values.iter().enumerate() {
                if *expect_bool(value)? {
                    out[start + i / 8] |= 1 << (i % 8);
                }
            }
        }
        PhysicalType::Int32 => {
            for value in values {
                match value {
                    ParquetValue::Int32(v) => out.write_i32::<LittleEndian>(*v)?,
                    other => return Err(unexpected(other, physical)),
                }
            }
        }
        PhysicalType::Int64 => {
            for value in values {
                match value {
                    ParquetValue::Int64(v) => out.write_i64::<LittleEndian>(*v)?,
                    other => return Err(unexpected(other, physical)),
                }
            }
        }
        PhysicalType::Int96 => {
            for value in values {
                match value {
                    ParquetValue::Int96(v) => {
                        let le = (*v as u128).to_le_bytes();
                        out.extend_from_slice(&le[..12]);
                    }
                    other => return Err(unexpected(other, physical)),
                }
            }
        }
        PhysicalType::Float => {
            for value in values {
                match value {
                    ParquetValue::Float32(v) => out.write_f32::<LittleEndian>(v.0)?,
                    other => return Err(unexpected(other, physical)),
                }
            }
        }
        PhysicalType::Double => {
            for value in values {
                match value {
                    ParquetValue::Float64(v) => out.write_f64::<LittleEndian>(v.0)?,
                    other => return Err(unexpected(other, physical)),
                }
            }
        }
        PhysicalType::ByteArray => {
            for value in values {
                match value {
                    ParquetValue::Bytes(b) => {
                        out.write_u32::<LittleEndian>(b.len() as u32)?;
                        out.extend_from_slice(b);
                    }
                    other => return Err(unexpected(other, physical)),
                }
            }
        }
        PhysicalType::FixedLenByteArray => {
            for value in values {
                match value {
                    ParquetValue::Bytes(b) => out.extend_from_slice(b),
                    other => return Err(unexpected(other, physical)),
                }
            }
        }
    }
    Ok(())
}

/// Decode exactly `count` primitive values from `buf`.
pub fn decode(
    buf: &[u8],
    physical: PhysicalType,
    count: usize,
    type_length: Option<i32>,
) -> Result<Vec<ParquetValue>> {
    let mut out = Vec::with_capacity(count);
    let mut cursor = Cursor::new(buf);
    let truncated = |_| ParquetError::format("Truncated PLAIN value stream");

    match physical {
        PhysicalType::Boolean => {
            if buf.len() < count.div_ceil(8) {
                return Err(ParquetError::format("Truncated PLAIN value stream"));
            }
            for i in 0..count {
                out.push(ParquetValue::Boolean(buf[i / 8] >> (i % 8) & 1 == 1));
            }
        }
        PhysicalType::Int32 => {
            for _ in 0..count {
                out.push(ParquetValue::Int32(
                    cursor.read_i32::<LittleEndian>().map_err(truncated)?,
                ));
            }
        }
        PhysicalType::Int64 => {
            for _ in 0..count {
                out.push(ParquetValue::Int64(
                    cursor.read_i64::<LittleEndian>().map_err(truncated)?,
                ));
            }
        }
        PhysicalType::Int96 => {
            for _ in 0..count {
                let mut raw = [0u8; 16];
                std::io::Read::read_exact(&mut cursor, &mut raw[..12]).map_err(truncated)?;
                // Sign-extend from bit 95.
                if raw[11] & 0x80 != 0 {
                    raw[12..].fill(0xff);
                }
                out.push(ParquetValue::Int96(i128::from_le_bytes(raw)));
            }
        }
        PhysicalType::Float => {
            for _ in 0..count {
                out.push(ParquetValue::Float32(OrderedFloat(
                    cursor.read_f32::<LittleEndian>().map_err(truncated)?,
                )));
            }
        }
        PhysicalType::Double => {
            for _ in 0..count {
                out.push(ParquetValue::Float64(OrderedFloat(
                    cursor.read_f64::<LittleEndian>().map_err(truncated)?,
                )));
            }
        }
        PhysicalType::ByteArray => {
            for _ in 0..count {
                let len = cursor.read_u32::<LittleEndian>().map_err(truncated)? as usize;
                let pos = cursor.position() as usize;
                let slice = buf
                    .get(pos..pos + len)
                    .ok_or_else(|| ParquetError::format("Truncated PLAIN value stream"))?;
                out.push(ParquetValue::Bytes(Bytes::copy_from_slice(slice)));
                cursor.set_position((pos + len) as u64);
            }
        }
        PhysicalType::FixedLenByteArray => {
            let len = type_length.unwrap_or(0) as usize;
            if len == 0 {
                return Err(ParquetError::format(
                    "FIXED_LEN_BYTE_ARRAY column lacks a type length",
                ));
            }
            for i in 0..count {
                let slice = buf
                    .get(i * len..(i + 1) * len)
                    .ok_or_else(|| ParquetError::format("Truncated PLAIN value stream"))?;
                out.push(ParquetValue::Bytes(Bytes::copy_from_slice(slice)));
            }
        }
    }
    Ok(out)
}

fn expect_bool(value: &ParquetValue) -> Result<&bool> {
    match value {
        ParquetValue::Boolean(b) => Ok(b),
        other => Err(unexpected(other, PhysicalType::Boolean)),
    }
}

fn unexpected(value: &ParquetValue, physical: PhysicalType) -> ParquetError {
    ParquetError::conversion(format!(
        "Cannot PLAIN-encode {} as {}",
        value.type_name(),
        physical
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(values: Vec<ParquetValue>, physical: PhysicalType, type_length: Option<i32>) {
        let mut buf = Vec::new();
        encode(&values, physical, &mut buf).unwrap();
        let decoded = decode(&buf, physical, values.len(), type_length).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_int32_roundtrip() {
        roundtrip(
            vec![
                ParquetValue::Int32(0),
                ParquetValue::Int32(-1),
                ParquetValue::Int32(i32::MAX),
                ParquetValue::Int32(i32::MIN),
            ],
            PhysicalType::Int32,
            None,
        );
    }

    #[test]
    fn test_int64_little_endian_layout() {
        let mut buf = Vec::new();
        encode(&[ParquetValue::Int64(1)], PhysicalType::Int64, &mut buf).unwrap();
        assert_eq!(buf, vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_boolean_bit_packing() {
        let values: Vec<ParquetValue> = [true, false, true, true, false, false, true, false, true]
            .iter()
            .map(|b| ParquetValue::Boolean(*b))
            .collect();
        let mut buf = Vec::new();
        encode(&values, PhysicalType::Boolean, &mut buf).unwrap();
        // LSB-first: 0b0100_1101, then the lone ninth bit.
        assert_eq!(buf, vec![0b0100_1101, 0b0000_0001]);
        let decoded = decode(&buf, PhysicalType::Boolean, values.len(), None).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_byte_array_length_prefix() {
        let values = vec![
            ParquetValue::Bytes(Bytes::from_static(b"ab")),
            ParquetValue::Bytes(Bytes::new()),
            ParquetValue::Bytes(Bytes::from_static(b"xyz")),
        ];
        let mut buf = Vec::new();
        encode(&values, PhysicalType::ByteArray, &mut buf).unwrap();
        assert_eq!(&buf[..4], &[2, 0, 0, 0]);
        roundtrip(values, PhysicalType::ByteArray, None);
    }

    #[test]
    fn test_fixed_len_byte_array() {
        let values = vec![
            ParquetValue::Bytes(Bytes::from_static(b"abcd")),
            ParquetValue::Bytes(Bytes::from_static(b"wxyz")),
        ];
        roundtrip(values, PhysicalType::FixedLenByteArray, Some(4));
    }

    #[test]
    fn test_int96_sign_extension() {
        roundtrip(
            vec![ParquetValue::Int96(-1), ParquetValue::Int96(1 << 90)],
            PhysicalType::Int96,
            None,
        );
    }

    #[test]
    fn test_float_roundtrip() {
        roundtrip(
            vec![
                ParquetValue::Float64(OrderedFloat(2.6)),
                ParquetValue::Float64(OrderedFloat(-0.0)),
            ],
            PhysicalType::Double,
            None,
        );
    }

    #[test]
    fn test_truncated_decode_fails() {
        let mut buf = Vec::new();
        encode(&[ParquetValue::Int64(7)], PhysicalType::Int64, &mut buf).unwrap();
        buf.truncate(5);
        assert!(decode(&buf, PhysicalType::Int64, 1, None).is_err());
    }
}
