//! Self-contained Parquet reader and writer.
//!
//! `parquet-native` translates between record-oriented data — rows with
//! nested, repeated, and optional fields — and the Parquet on-disk layout of
//! column chunks, encoded pages, and footer metadata, without delegating to
//! an external Parquet implementation.
//!
//! # Key Components
//!
//! - **Writer**: streaming Parquet file writer
//!   - Accepts rows over any `std::io::Write + Send` sink
//!   - Buffers a row group at a time, flushing on a byte-size target
//!   - PLAIN values, RLE/bit-packed levels, V1 or V2 data pages,
//!     per-column compression, bloom filter byte reservation
//!
//! - **Reader**: envelope and row reader
//!   - Any [`reader::ByteSource`] (in-memory bytes, files)
//!   - Sequential row cursor with column projection
//!   - Footer, schema, and statistics accessors
//!
//! - **Schema**: declared tree compiled to a flat descriptor
//!   - Groups and primitive leaves with required/optional/repeated flags
//!   - Logical types (UTF8, DATE, timestamps, DECIMAL, INTERVAL, JSON, ...)
//!     resolved to backing physical types at construction
//!
//! - **Shredding/assembly**: the Dremel algorithm
//!   - Records stripe into per-column `(value, rep, def)` streams and back
//!
//! Metadata serialization (Thrift compact protocol) lives in [`format`];
//! compression codecs sit behind [`basic::Compression`].
//!
//! # Example
//!
//! ```
//! use parquet_native::{
//!     LogicalType, ParquetValue, Reader, Repetition, Schema, SchemaNode, Writer,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> parquet_native::Result<()> {
//! let schema = Schema::new(SchemaNode::Group {
//!     name: "root".to_string(),
//!     repetition: Repetition::Required,
//!     fields: vec![SchemaNode::Primitive {
//!         name: "id".to_string(),
//!         repetition: Repetition::Required,
//!         logical_type: LogicalType::Int64,
//!         compression: None,
//!     }],
//! })?;
//!
//! let mut buffer = Vec::new();
//! let mut writer = Writer::new(&mut buffer, schema)?;
//! writer.write_row([(Arc::<str>::from("id"), ParquetValue::Int64(7))].into_iter().collect())?;
//! writer.close()?;
//!
//! let reader = Reader::open(bytes::Bytes::from(buffer))?;
//! assert_eq!(reader.row_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod basic;
pub mod compression;
pub mod conversion;
pub mod encoding;
pub mod error;
pub mod format;
pub mod page;
pub mod reader;
pub mod schema;
pub mod shred;
pub mod statistics;
pub mod value;
pub mod writer;

pub mod thrift_ext;

#[cfg(test)]
pub mod test_utils;

pub use basic::{Compression, Encoding, PhysicalType, Repetition};
pub use error::{ErrorContext, ParquetError, Result};
pub use reader::{ByteSource, Reader, RowIterator};
pub use schema::{ColumnDescriptor, LogicalType, Schema, SchemaBuilder, SchemaNode};
pub use value::{ParquetValue, Row};
pub use writer::{Writer, WriterBuilder};
