//! Conversions between user-facing values and the physical storage model.
//!
//! Shredded values are normalized through [`to_primitive`] before they reach
//! the page engine, so encoders only ever see `Boolean`, `Int32`, `Int64`,
//! `Int96`, `Float32`, `Float64`, or `Bytes`. [`from_primitive`] is the
//! inverse applied during assembly.

use bytes::Bytes;
use byteorder::{ByteOrder, LittleEndian};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use std::sync::Arc;

use crate::error::{ParquetError, Result};
use crate::schema::{ColumnDescriptor, LogicalType};
use crate::value::ParquetValue;

/// Coerce a user value to the primitive representation of its column.
pub fn to_primitive(desc: &ColumnDescriptor, value: ParquetValue) -> Result<ParquetValue> {
    use ParquetValue::*;

    let mismatch = |value: &ParquetValue| {
        ParquetError::conversion(format!(
            "Cannot convert {} to {} for column '{}'",
            value.type_name(),
            desc.physical_type,
            desc.path_string()
        ))
    };

    Ok(match desc.logical_type {
        LogicalType::Boolean => match value {
            Boolean(b) => Boolean(b),
            other => return Err(mismatch(&other)),
        },
        LogicalType::Int32 => match value {
            Int32(v) => Int32(v),
            Int64(v) => Int32(narrow_i64(v, desc)?),
            other => return Err(mismatch(&other)),
        },
        LogicalType::Int64 => match value {
            Int64(v) => Int64(v),
            Int32(v) => Int64(v as i64),
            other => return Err(mismatch(&other)),
        },
        LogicalType::Int96 => match value {
            Int96(v) => Int96(v),
            Int64(v) => Int96(v as i128),
            Int32(v) => Int96(v as i128),
            other => return Err(mismatch(&other)),
        },
        LogicalType::Float => match value {
            Float32(v) => Float32(v),
            Int32(v) => Float32(OrderedFloat(v as f32)),
            other => return Err(mismatch(&other)),
        },
        LogicalType::Double => match value {
            Float64(v) => Float64(v),
            Float32(v) => Float64(OrderedFloat(v.0 as f64)),
            Int32(v) => Float64(OrderedFloat(v as f64)),
            Int64(v) => Float64(OrderedFloat(v as f64)),
            other => return Err(mismatch(&other)),
        },
        LogicalType::ByteArray | LogicalType::Bson => match value {
            Bytes(b) => Bytes(b),
            String(s) => Bytes(bytes::Bytes::copy_from_slice(s.as_bytes())),
            other => return Err(mismatch(&other)),
        },
        LogicalType::Utf8 | LogicalType::Json => match value {
            String(s) => Bytes(bytes::Bytes::copy_from_slice(s.as_bytes())),
            Bytes(b) => {
                std::str::from_utf8(&b)?;
                Bytes(b)
            }
            other => return Err(mismatch(&other)),
        },
        LogicalType::FixedLenByteArray(len) => match value {
            Bytes(b) => {
                if b.len() != len as usize {
                    return Err(ParquetError::data_validation(format!(
                        "Column '{}' expects {} bytes, got {}",
                        desc.path_string(),
                        len,
                        b.len()
                    )));
                }
                Bytes(b)
            }
            String(s) => {
                if s.len() != len as usize {
                    return Err(ParquetError::data_validation(format!(
                        "Column '{}' expects {} bytes, got {}",
                        desc.path_string(),
                        len,
                        s.len()
                    )));
                }
                Bytes(bytes::Bytes::copy_from_slice(s.as_bytes()))
            }
            other => return Err(mismatch(&other)),
        },
        LogicalType::Interval => match value {
            Record(fields) => Bytes(interval_to_bytes(&fields, desc)?),
            Bytes(b) => {
                if b.len() != 12 {
                    return Err(ParquetError::data_validation(format!(
                        "INTERVAL column '{}' expects 12 bytes, got {}",
                        desc.path_string(),
                        b.len()
                    )));
                }
                Bytes(b)
            }
            other => return Err(mismatch(&other)),
        },
        LogicalType::Date => match value {
            Date32(v) => Int32(v),
            Int32(v) => Int32(v),
            Int64(v) => Int32(narrow_i64(v, desc)?),
            other => return Err(mismatch(&other)),
        },
        LogicalType::TimeMillis => match value {
            TimeMillis(v) => Int32(v),
            Int32(v) => Int32(v),
            other => return Err(mismatch(&other)),
        },
        LogicalType::TimeMicros => match value {
            TimeMicros(v) => Int64(v),
            Int64(v) => Int64(v),
            Int32(v) => Int64(v as i64),
            other => return Err(mismatch(&other)),
        },
        LogicalType::TimestampMillis => match value {
            TimestampMillis(v) => Int64(v),
            Int64(v) => Int64(v),
            other => return Err(mismatch(&other)),
        },
        LogicalType::TimestampMicros => match value {
            TimestampMicros(v) => Int64(v),
            Int64(v) => Int64(v),
            other => return Err(mismatch(&other)),
        },
        LogicalType::Decimal { scale, .. } => {
            let unscaled = match value {
                Float64(v) => (v.0 * 10f64.powi(scale as i32)).trunc() as i64,
                Float32(v) => (v.0 as f64 * 10f64.powi(scale as i32)).trunc() as i64,
                Int32(v) => (v as i64) * 10i64.pow(scale as u32),
                Int64(v) => v * 10i64.pow(scale as u32),
                other => return Err(mismatch(&other)),
            };
            match desc.physical_type {
                crate::basic::PhysicalType::Int32 => Int32(narrow_i64(unscaled, desc)?),
                _ => Int64(unscaled),
            }
        }
    })
}

/// Convert a stored primitive value back to the user-facing shape.
pub fn from_primitive(desc: &ColumnDescriptor, value: ParquetValue) -> Result<ParquetValue> {
    use ParquetValue::*;

    let unscale = |unscaled: i64, scale: u8| {
        Float64(OrderedFloat(unscaled as f64 / 10f64.powi(scale as i32)))
    };

    Ok(match (desc.logical_type, value) {
        (LogicalType::Date, Int32(v)) => Date32(v),
        (LogicalType::TimeMillis, Int32(v)) => TimeMillis(v),
        (LogicalType::TimeMicros, Int64(v)) => TimeMicros(v),
        (LogicalType::TimestampMillis, Int64(v)) => TimestampMillis(v),
        (LogicalType::TimestampMicros, Int64(v)) => TimestampMicros(v),
        (LogicalType::Decimal { scale, .. }, Int32(v)) => unscale(v as i64, scale),
        (LogicalType::Decimal { scale, .. }, Int64(v)) => unscale(v, scale),
        (LogicalType::Utf8, Bytes(b)) | (LogicalType::Json, Bytes(b)) => {
            String(Arc::from(std::str::from_utf8(&b)?))
        }
        (LogicalType::Interval, Bytes(b)) => Record(interval_from_bytes(&b)),
        (_, primitive) => primitive,
    })
}

fn narrow_i64(v: i64, desc: &ColumnDescriptor) -> Result<i32> {
    i32::try_from(v).map_err(|_| {
        ParquetError::conversion(format!(
            "Value {} overflows INT32 column '{}'",
            v,
            desc.path_string()
        ))
    })
}

fn interval_to_bytes(
    fields: &IndexMap<Arc<str>, ParquetValue>,
    desc: &ColumnDescriptor,
) -> Result<Bytes> {
    let mut buf = [0u8; 12];
    for (slot, key) in ["months", "days", "milliseconds"].iter().enumerate() {
        let part = match fields.get(*key) {
            Some(ParquetValue::Int32(v)) => *v as u32,
            Some(ParquetValue::Int64(v)) => *v as u32,
            Some(other) => {
                return Err(ParquetError::conversion(format!(
                    "INTERVAL field '{}' must be an integer, got {}",
                    key,
                    other.type_name()
                )))
            }
            None => {
                return Err(ParquetError::data_validation(format!(
                    "INTERVAL column '{}' is missing field '{}'",
                    desc.path_string(),
                    key
                )))
            }
        };
        LittleEndian::write_u32(&mut buf[slot * 4..slot * 4 + 4], part);
    }
    Ok(Bytes::copy_from_slice(&buf))
}

fn interval_from_bytes(buf: &[u8]) -> IndexMap<Arc<str>, ParquetValue> {
    let mut fields = IndexMap::with_capacity(3);
    for (slot, key) in ["months", "days", "milliseconds"].iter().enumerate() {
        let part = LittleEndian::read_u32(&buf[slot * 4..slot * 4 + 4]);
        fields.insert(Arc::from(*key), ParquetValue::Int32(part as i32));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::Repetition;
    use crate::schema::Schema;

    fn single_column(logical_type: LogicalType) -> Schema {
        crate::test_utils::single_column(logical_type, Repetition::Required)
    }

    #[test]
    fn test_decimal_truncates_toward_zero() {
        let schema = single_column(LogicalType::Decimal {
            precision: 10,
            scale: 2,
        });
        let desc = &schema.columns()[0];

        let stored = to_primitive(desc, ParquetValue::Float64(OrderedFloat(3.345678901234567)))
            .unwrap();
        assert_eq!(stored, ParquetValue::Int64(334));

        let stored = to_primitive(desc, ParquetValue::Float64(OrderedFloat(-3.999))).unwrap();
        assert_eq!(stored, ParquetValue::Int64(-399));

        let back = from_primitive(desc, ParquetValue::Int64(334)).unwrap();
        assert_eq!(back, ParquetValue::Float64(OrderedFloat(3.34)));
    }

    #[test]
    fn test_decimal_small_precision_backs_int32() {
        let schema = single_column(LogicalType::Decimal {
            precision: 5,
            scale: 1,
        });
        let desc = &schema.columns()[0];
        let stored = to_primitive(desc, ParquetValue::Int32(12)).unwrap();
        assert_eq!(stored, ParquetValue::Int32(120));
    }

    #[test]
    fn test_utf8_backs_byte_array() {
        let schema = single_column(LogicalType::Utf8);
        let desc = &schema.columns()[0];

        let stored = to_primitive(desc, ParquetValue::String(Arc::from("hello"))).unwrap();
        assert_eq!(stored, ParquetValue::Bytes(Bytes::from_static(b"hello")));

        let back = from_primitive(desc, stored).unwrap();
        assert_eq!(back, ParquetValue::String(Arc::from("hello")));
    }

    #[test]
    fn test_type_mismatch_is_conversion_error() {
        let schema = single_column(LogicalType::Int64);
        let desc = &schema.columns()[0];
        let err = to_primitive(desc, ParquetValue::String(Arc::from("oops"))).unwrap_err();
        assert!(matches!(err, ParquetError::Conversion(_)));
    }

    #[test]
    fn test_interval_record_roundtrip() {
        let schema = single_column(LogicalType::Interval);
        let desc = &schema.columns()[0];

        let mut fields = IndexMap::new();
        fields.insert(Arc::from("months"), ParquetValue::Int32(2));
        fields.insert(Arc::from("days"), ParquetValue::Int32(15));
        fields.insert(Arc::from("milliseconds"), ParquetValue::Int32(500));

        let stored = to_primitive(desc, ParquetValue::Record(fields.clone())).unwrap();
        match &stored {
            ParquetValue::Bytes(b) => assert_eq!(b.len(), 12),
            other => panic!("expected bytes, got {}", other.type_name()),
        }

        let back = from_primitive(desc, stored).unwrap();
        assert_eq!(back, ParquetValue::Record(fields));
    }

    #[test]
    fn test_fixed_len_byte_array_length_check() {
        let schema = single_column(LogicalType::FixedLenByteArray(5));
        let desc = &schema.columns()[0];
        assert!(to_primitive(desc, ParquetValue::Bytes(Bytes::from_static(b"12345"))).is_ok());
        let err =
            to_primitive(desc, ParquetValue::Bytes(Bytes::from_static(b"123"))).unwrap_err();
        assert!(matches!(err, ParquetError::DataValidation(_)));
    }
}
