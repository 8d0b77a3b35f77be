//! Core Parquet writing functionality.
//!
//! [`Writer`] accepts records over any `io::Write + Send` sink, which makes
//! it the streaming surface as well: rows in, Parquet bytes out, every
//! failure surfaced as an `Err` at the call that hit it. A writer that has
//! reported an error is poisoned and refuses further rows; the sink itself
//! is released when the writer drops.

use std::io::Write;

use tracing::{debug, trace};

use crate::basic::{Compression, Encoding};
use crate::error::{ParquetError, Result};
use crate::format;
use crate::page::{build_data_page_v1, build_data_page_v2, EncodedPage};
use crate::schema::Schema;
use crate::shred::RowGroupBuffer;
use crate::statistics::StatisticsAccumulator;
use crate::thrift_ext::encode_to_vec;
use crate::value::Row;

pub(crate) const MAGIC: &[u8; 4] = b"PAR1";

// Default configuration constants
const DEFAULT_PAGE_SIZE: usize = 1024 * 1024;
const DEFAULT_ROW_GROUP_SIZE: usize = 128 * 1024 * 1024;
const DEFAULT_DISTINCT_LIMIT: usize = 4096;

/// Builder for creating a configured Writer
pub struct WriterBuilder {
    compression: Compression,
    page_size: usize,
    row_group_size: usize,
    data_page_v2: bool,
    distinct_limit: Option<usize>,
    bloom_filters: Vec<(String, u32)>,
    created_by: String,
}

impl Default for WriterBuilder {
    fn default() -> Self {
        Self {
            compression: Compression::Uncompressed,
            page_size: DEFAULT_PAGE_SIZE,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            data_page_v2: false,
            distinct_limit: Some(DEFAULT_DISTINCT_LIMIT),
            bloom_filters: Vec::new(),
            created_by: concat!("parquet-native version ", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

impl WriterBuilder {
    /// Create a new WriterBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default compression, inherited by columns without their own
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the target uncompressed page body size in bytes
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Set the target uncompressed row group size in bytes
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Write V2 data pages instead of V1
    pub fn with_data_page_v2(mut self, enabled: bool) -> Self {
        self.data_page_v2 = enabled;
        self
    }

    /// Cap the per-chunk distinct set; `None` tracks exactly without bound.
    /// When a chunk exceeds the cap its `distinct_count` is omitted.
    pub fn with_distinct_limit(mut self, limit: Option<usize>) -> Self {
        self.distinct_limit = limit;
        self
    }

    /// Reserve `num_filter_bytes` of bloom filter space for a column and
    /// record its offset in the column metadata
    pub fn with_bloom_filter(mut self, column: impl Into<String>, num_filter_bytes: u32) -> Self {
        self.bloom_filters.push((column.into(), num_filter_bytes));
        self
    }

    /// Override the `created_by` footer string
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Build a Writer with the configured settings. The leading magic is
    /// written immediately.
    pub fn build<W: Write + Send>(self, mut sink: W, schema: Schema) -> Result<Writer<W>> {
        let mut bloom_bytes = vec![None; schema.num_columns()];
        for (path, num_filter_bytes) in &self.bloom_filters {
            let desc = schema.find_column(path)?;
            let index = schema
                .columns()
                .iter()
                .position(|c| c.path == desc.path)
                .unwrap_or_default();
            bloom_bytes[index] = Some(*num_filter_bytes);
        }

        sink.write_all(MAGIC)?;
        let buffer = RowGroupBuffer::new(&schema);
        Ok(Writer {
            sink,
            schema,
            buffer,
            offset: MAGIC.len() as u64,
            row_groups: Vec::new(),
            key_value_metadata: Vec::new(),
            total_rows: 0,
            compression: self.compression,
            page_size: self.page_size,
            row_group_size: self.row_group_size,
            data_page_v2: self.data_page_v2,
            distinct_limit: self.distinct_limit,
            bloom_bytes,
            created_by: self.created_by,
            poisoned: false,
            closed: false,
        })
    }
}

/// Core Parquet writer over any sink implementing Write
pub struct Writer<W: Write> {
    sink: W,
    schema: Schema,
    buffer: RowGroupBuffer,
    offset: u64,
    row_groups: Vec<format::RowGroup>,
    key_value_metadata: Vec<(String, String)>,
    total_rows: i64,
    compression: Compression,
    page_size: usize,
    row_group_size: usize,
    data_page_v2: bool,
    distinct_limit: Option<usize>,
    bloom_bytes: Vec<Option<u32>>,
    created_by: String,
    poisoned: bool,
    closed: bool,
}

impl<W> Writer<W>
where
    W: Write + Send,
{
    /// Create a new writer with default settings
    pub fn new(sink: W, schema: Schema) -> Result<Self> {
        WriterBuilder::new().build(sink, schema)
    }

    /// The compiled schema this writer shreds against
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Append a key-value pair to the footer's user metadata; insertion
    /// order is retained and duplicate keys are allowed
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.key_value_metadata.push((key.into(), value.into()));
    }

    /// Write a batch of rows
    pub fn write_rows(&mut self, rows: Vec<Row>) -> Result<()> {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Shred a single row into the open row group, flushing the group when
    /// its estimated uncompressed size crosses the configured target
    pub fn write_row(&mut self, row: Row) -> Result<()> {
        self.ensure_writable()?;
        let result = self.append_row(&row);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn append_row(&mut self, row: &Row) -> Result<()> {
        self.buffer.push_row(&self.schema, row)?;
        if self.buffer.byte_size() >= self.row_group_size {
            self.flush_buffered_group()?;
        }
        Ok(())
    }

    /// Force a row group boundary at the current row
    pub fn flush_row_group(&mut self) -> Result<()> {
        self.ensure_writable()?;
        let result = self.flush_buffered_group();
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    /// Close the writer: flush pending rows, then write the footer, its
    /// length, and the trailing magic
    pub fn close(mut self) -> Result<()> {
        self.ensure_writable()?;
        let result = self.finish();
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn finish(&mut self) -> Result<()> {
        self.flush_buffered_group()?;
        self.closed = true;

        let metadata = format::FileMetaData {
            version: 1,
            schema: self.schema.to_schema_elements(),
            num_rows: self.total_rows,
            row_groups: std::mem::take(&mut self.row_groups),
            key_value_metadata: if self.key_value_metadata.is_empty() {
                None
            } else {
                Some(
                    self.key_value_metadata
                        .drain(..)
                        .map(|(key, value)| format::KeyValue {
                            key,
                            value: Some(value),
                        })
                        .collect(),
                )
            },
            created_by: Some(self.created_by.clone()),
        };

        let footer = encode_to_vec(&metadata)?;
        let footer_len = footer.len() as u32;
        self.write_all(&footer)?;
        self.write_all(&footer_len.to_le_bytes())?;
        self.write_all(MAGIC)?;
        self.sink.flush()?;
        debug!(
            rows = self.total_rows,
            row_groups = metadata.row_groups.len(),
            footer_bytes = footer_len,
            "closed parquet file"
        );
        Ok(())
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.poisoned {
            return Err(ParquetError::Io(std::io::Error::other(
                "Writer is poisoned by a previous error",
            )));
        }
        if self.closed {
            return Err(ParquetError::Io(std::io::Error::other(
                "Writer has been closed",
            )));
        }
        Ok(())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.sink.write_all(data)?;
        self.offset += data.len() as u64;
        Ok(())
    }

    fn flush_buffered_group(&mut self) -> Result<()> {
        if self.buffer.num_rows == 0 {
            return Ok(());
        }
        let group = std::mem::replace(&mut self.buffer, RowGroupBuffer::new(&self.schema));
        debug!(
            rows = group.num_rows,
            bytes = group.byte_size(),
            "flushing row group"
        );

        let mut chunks = Vec::with_capacity(group.columns.len());
        let mut total_byte_size: i64 = 0;

        for (index, column) in group.columns.into_iter().enumerate() {
            let desc = self.schema.columns()[index].clone();
            let codec = desc.compression.unwrap_or(self.compression);
            let chunk_offset = self.offset as i64;

            let pages = cut_pages(
                &desc,
                &column.values,
                &column.rep_levels,
                &column.def_levels,
                codec,
                self.page_size,
                self.data_page_v2,
                self.distinct_limit,
            )?;

            let mut chunk_stats = StatisticsAccumulator::new(self.distinct_limit);
            let mut num_values: i64 = 0;
            let mut total_uncompressed: i64 = 0;
            let mut total_compressed: i64 = 0;

            for page in &pages {
                let header_bytes = encode_to_vec(&page.header)?;
                self.write_all(&header_bytes)?;
                self.write_all(&page.body)?;
                num_values += page.num_values as i64;
                total_uncompressed += (header_bytes.len() + page.uncompressed_size()) as i64;
                total_compressed += (header_bytes.len() + page.compressed_size()) as i64;
                chunk_stats.merge(&page.statistics);
            }
            trace!(
                column = %desc.path_string(),
                pages = pages.len(),
                values = num_values,
                "wrote column chunk"
            );

            let mut bloom_filter_offset = None;
            let mut bloom_filter_length = None;
            if let Some(filter_bytes) = self.bloom_bytes[index] {
                bloom_filter_offset = Some(self.offset as i64);
                bloom_filter_length = Some(filter_bytes as i32);
                self.write_all(&vec![0u8; filter_bytes as usize])?;
            }

            total_byte_size += total_uncompressed;
            chunks.push(format::ColumnChunk {
                file_path: None,
                file_offset: chunk_offset,
                meta_data: Some(format::ColumnMetaData {
                    type_: desc.physical_type.to_i32(),
                    encodings: vec![Encoding::Rle.to_i32(), Encoding::Plain.to_i32()],
                    path_in_schema: desc.path.iter().map(|p| p.to_string()).collect(),
                    codec: codec.to_i32(),
                    num_values,
                    total_uncompressed_size: total_uncompressed,
                    total_compressed_size: total_compressed,
                    data_page_offset: chunk_offset,
                    index_page_offset: None,
                    dictionary_page_offset: None,
                    statistics: Some(chunk_stats.to_format(desc.physical_type)?),
                    bloom_filter_offset,
                    bloom_filter_length,
                }),
            });
        }

        self.row_groups.push(format::RowGroup {
            columns: chunks,
            total_byte_size,
            num_rows: group.num_rows as i64,
        });
        self.total_rows += group.num_rows as i64;
        Ok(())
    }
}

/// Slice a column's tuple streams into pages bounded by the target body
/// size. A value is never split, so a single oversized value still forms a
/// page of its own.
#[allow(clippy::too_many_arguments)]
fn cut_pages(
    desc: &crate::schema::ColumnDescriptor,
    values: &[crate::value::ParquetValue],
    rep_levels: &[u16],
    def_levels: &[u16],
    codec: Compression,
    page_size: usize,
    data_page_v2: bool,
    distinct_limit: Option<usize>,
) -> Result<Vec<EncodedPage>> {
    use crate::encoding::plain;

    let mut pages = Vec::new();
    let num_tuples = def_levels.len();

    let mut tuple_start = 0;
    let mut value_start = 0;
    let mut value_cursor = 0;
    let mut page_bytes = 0usize;

    for i in 0..num_tuples {
        let mut tuple_bytes = 2;
        let is_present = def_levels[i] == desc.max_def_level;
        if is_present {
            tuple_bytes += plain::encoded_size(&values[value_cursor]);
        }

        if i > tuple_start && page_bytes + tuple_bytes > page_size {
            pages.push(build_page(
                desc,
                &values[value_start..value_cursor],
                &rep_levels[tuple_start..i],
                &def_levels[tuple_start..i],
                codec,
                data_page_v2,
                distinct_limit,
            )?);
            tuple_start = i;
            value_start = value_cursor;
            page_bytes = 0;
        }

        page_bytes += tuple_bytes;
        if is_present {
            value_cursor += 1;
        }
    }

    if tuple_start < num_tuples {
        pages.push(build_page(
            desc,
            &values[value_start..],
            &rep_levels[tuple_start..],
            &def_levels[tuple_start..],
            codec,
            data_page_v2,
            distinct_limit,
        )?);
    }
    Ok(pages)
}

fn build_page(
    desc: &crate::schema::ColumnDescriptor,
    values: &[crate::value::ParquetValue],
    rep_levels: &[u16],
    def_levels: &[u16],
    codec: Compression,
    data_page_v2: bool,
    distinct_limit: Option<usize>,
) -> Result<EncodedPage> {
    if data_page_v2 {
        build_data_page_v2(desc, values, rep_levels, def_levels, codec, distinct_limit)
    } else {
        build_data_page_v1(desc, values, rep_levels, def_levels, codec, distinct_limit)
    }
}
