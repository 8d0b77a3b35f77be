//! Common enums mirroring the Parquet format model: physical types,
//! repetition, encodings, compression codecs, and page types.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParquetError, Result};

/// Physical storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray,
}

impl PhysicalType {
    /// Wire value used in file metadata.
    pub fn to_i32(self) -> i32 {
        match self {
            PhysicalType::Boolean => 0,
            PhysicalType::Int32 => 1,
            PhysicalType::Int64 => 2,
            PhysicalType::Int96 => 3,
            PhysicalType::Float => 4,
            PhysicalType::Double => 5,
            PhysicalType::ByteArray => 6,
            PhysicalType::FixedLenByteArray => 7,
        }
    }

    pub fn from_i32(v: i32) -> Result<Self> {
        Ok(match v {
            0 => PhysicalType::Boolean,
            1 => PhysicalType::Int32,
            2 => PhysicalType::Int64,
            3 => PhysicalType::Int96,
            4 => PhysicalType::Float,
            5 => PhysicalType::Double,
            6 => PhysicalType::ByteArray,
            7 => PhysicalType::FixedLenByteArray,
            other => {
                return Err(ParquetError::format(format!(
                    "unknown physical type {}",
                    other
                )))
            }
        })
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhysicalType::Boolean => "BOOLEAN",
            PhysicalType::Int32 => "INT32",
            PhysicalType::Int64 => "INT64",
            PhysicalType::Int96 => "INT96",
            PhysicalType::Float => "FLOAT",
            PhysicalType::Double => "DOUBLE",
            PhysicalType::ByteArray => "BYTE_ARRAY",
            PhysicalType::FixedLenByteArray => "FIXED_LEN_BYTE_ARRAY",
        };
        f.write_str(s)
    }
}

/// Annotation carried in file metadata describing how a physical type is
/// interpreted. Only the subset this crate produces is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertedType {
    Utf8,
    Json,
    Bson,
    Date,
    TimeMillis,
    TimeMicros,
    TimestampMillis,
    TimestampMicros,
    Interval,
    Decimal,
}

impl ConvertedType {
    pub fn to_i32(self) -> i32 {
        match self {
            ConvertedType::Utf8 => 0,
            ConvertedType::Date => 6,
            ConvertedType::TimeMillis => 7,
            ConvertedType::TimeMicros => 8,
            ConvertedType::TimestampMillis => 9,
            ConvertedType::TimestampMicros => 10,
            ConvertedType::Json => 19,
            ConvertedType::Bson => 20,
            ConvertedType::Interval => 21,
            ConvertedType::Decimal => 5,
        }
    }

    pub fn from_i32(v: i32) -> Option<Self> {
        Some(match v {
            0 => ConvertedType::Utf8,
            5 => ConvertedType::Decimal,
            6 => ConvertedType::Date,
            7 => ConvertedType::TimeMillis,
            8 => ConvertedType::TimeMicros,
            9 => ConvertedType::TimestampMillis,
            10 => ConvertedType::TimestampMicros,
            19 => ConvertedType::Json,
            20 => ConvertedType::Bson,
            21 => ConvertedType::Interval,
            _ => return None,
        })
    }
}

/// How values of a field repeat within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repetition {
    /// Field has exactly one value.
    #[default]
    Required,
    /// Field has 0 or 1 value.
    Optional,
    /// Field has 0 or more values.
    Repeated,
}

impl Repetition {
    pub fn to_i32(self) -> i32 {
        match self {
            Repetition::Required => 0,
            Repetition::Optional => 1,
            Repetition::Repeated => 2,
        }
    }

    pub fn from_i32(v: i32) -> Result<Self> {
        Ok(match v {
            0 => Repetition::Required,
            1 => Repetition::Optional,
            2 => Repetition::Repeated,
            other => {
                return Err(ParquetError::format(format!(
                    "unknown repetition type {}",
                    other
                )))
            }
        })
    }
}

/// Value and level encodings used in data pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Plain,
    Rle,
}

impl Encoding {
    pub fn to_i32(self) -> i32 {
        match self {
            Encoding::Plain => 0,
            Encoding::Rle => 3,
        }
    }

    pub fn from_i32(v: i32) -> Result<Self> {
        Ok(match v {
            0 => Encoding::Plain,
            3 => Encoding::Rle,
            other => {
                return Err(ParquetError::format(format!(
                    "unsupported encoding {}",
                    other
                )))
            }
        })
    }
}

/// Compression codecs understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Uncompressed,
    Snappy,
    Gzip,
    Zstd,
}

impl Compression {
    pub fn to_i32(self) -> i32 {
        match self {
            Compression::Uncompressed => 0,
            Compression::Snappy => 1,
            Compression::Gzip => 2,
            Compression::Zstd => 6,
        }
    }

    pub fn from_i32(v: i32) -> Result<Self> {
        Ok(match v {
            0 => Compression::Uncompressed,
            1 => Compression::Snappy,
            2 => Compression::Gzip,
            6 => Compression::Zstd,
            other => {
                return Err(ParquetError::codec(format!(
                    "unsupported compression codec {}",
                    other
                )))
            }
        })
    }
}

impl FromStr for Compression {
    type Err = ParquetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "UNCOMPRESSED" => Ok(Compression::Uncompressed),
            "SNAPPY" => Ok(Compression::Snappy),
            "GZIP" => Ok(Compression::Gzip),
            "ZSTD" => Ok(Compression::Zstd),
            other => Err(ParquetError::codec(format!(
                "unknown compression codec: {}",
                other
            ))),
        }
    }
}

/// Page kinds appearing in a column chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    DataPage,
    DataPageV2,
}

impl PageType {
    pub fn to_i32(self) -> i32 {
        match self {
            PageType::DataPage => 0,
            PageType::DataPageV2 => 3,
        }
    }

    pub fn from_i32(v: i32) -> Result<Self> {
        Ok(match v {
            0 => PageType::DataPage,
            3 => PageType::DataPageV2,
            other => {
                return Err(ParquetError::format(format!(
                    "unsupported page type {}",
                    other
                )))
            }
        })
    }
}
