//! Core Parquet reading functionality.
//!
//! [`Reader::open`] validates the envelope (leading and trailing magic,
//! footer length) and decodes the footer eagerly; cursors then stream row
//! groups on demand. Column projection restricts which chunks are fetched
//! and decoded — a projected group selects every leaf beneath it.

use bytes::Bytes;
use tracing::debug;

use crate::basic::Compression;
use crate::error::{ParquetError, Result};
use crate::format;
use crate::page::decode_data_page;
use crate::schema::Schema;
use crate::shred::{assemble_records, ColumnChunkData};
use crate::thrift_ext::decode_from_slice;
use crate::value::Row;
use crate::writer::MAGIC;

/// Random-access byte source capability.
pub trait ByteSource {
    /// Total length of the underlying data in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch `length` bytes starting at absolute `offset`.
    fn read_at(&self, offset: u64, length: usize) -> Result<Bytes>;
}

impl ByteSource for Bytes {
    fn len(&self) -> u64 {
        Bytes::len(self) as u64
    }

    fn read_at(&self, offset: u64, length: usize) -> Result<Bytes> {
        let start = offset as usize;
        let end = start.checked_add(length).filter(|&end| end <= Bytes::len(self));
        match end {
            Some(end) => Ok(self.slice(start..end)),
            None => Err(ParquetError::format(format!(
                "Range {}..{} is outside the {}-byte source",
                start,
                start + length,
                Bytes::len(self)
            ))),
        }
    }
}

impl ByteSource for std::fs::File {
    fn len(&self) -> u64 {
        self.metadata().map(|m| m.len()).unwrap_or(0)
    }

    fn read_at(&self, offset: u64, length: usize) -> Result<Bytes> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = self.try_clone()?;
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; length];
        file.read_exact(&mut buf)?;
        Ok(Bytes::from(buf))
    }
}

/// Core Parquet reader over any [`ByteSource`]
#[derive(Debug)]
pub struct Reader<R> {
    source: R,
    metadata: format::FileMetaData,
    schema: Schema,
}

impl Reader<std::fs::File> {
    /// Open a file on disk
    pub fn open_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Reader::open(std::fs::File::open(path)?)
    }
}

impl<R> Reader<R>
where
    R: ByteSource,
{
    /// Validate the envelope and decode the footer
    pub fn open(source: R) -> Result<Self> {
        let file_len = source.len();
        if file_len < (MAGIC.len() * 2 + 4) as u64 {
            return Err(ParquetError::format(format!(
                "File is {} bytes, smaller than the smallest possible file",
                file_len
            )));
        }

        let head = source.read_at(0, MAGIC.len())?;
        if head.as_ref() != MAGIC.as_slice() {
            return Err(ParquetError::format("Missing magic at file start"));
        }
        let tail = source.read_at(file_len - MAGIC.len() as u64, MAGIC.len())?;
        if tail.as_ref() != MAGIC.as_slice() {
            return Err(ParquetError::format("Missing magic at file end"));
        }

        let len_bytes = source.read_at(file_len - 8, 4)?;
        let footer_len = u32::from_le_bytes(len_bytes.as_ref().try_into().unwrap()) as u64;
        if footer_len + 12 > file_len {
            return Err(ParquetError::format(format!(
                "Footer length {} exceeds the file",
                footer_len
            )));
        }

        let footer = source.read_at(file_len - 8 - footer_len, footer_len as usize)?;
        let (metadata, _): (format::FileMetaData, usize) = decode_from_slice(&footer)?;
        let schema = Schema::from_schema_elements(&metadata.schema)?;
        debug!(
            rows = metadata.num_rows,
            row_groups = metadata.row_groups.len(),
            columns = schema.num_columns(),
            "opened parquet file"
        );

        Ok(Self {
            source,
            metadata,
            schema,
        })
    }

    /// Number of records in the file
    pub fn row_count(&self) -> i64 {
        self.metadata.num_rows
    }

    /// Decoded footer metadata
    pub fn metadata(&self) -> &format::FileMetaData {
        &self.metadata
    }

    /// User key-value metadata, in the order it was written
    pub fn key_value_metadata(&self) -> &[format::KeyValue] {
        self.metadata
            .key_value_metadata
            .as_deref()
            .unwrap_or_default()
    }

    /// The schema reconstructed from the footer
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Chunk-level statistics for a column in one row group
    pub fn column_statistics(
        &self,
        row_group: usize,
        path: &str,
    ) -> Result<Option<&format::Statistics>> {
        let desc = self.schema.find_column(path)?;
        let group = self.metadata.row_groups.get(row_group).ok_or_else(|| {
            ParquetError::format(format!("No row group {}", row_group))
        })?;
        let chunk = find_chunk(group, &desc.path)?;
        Ok(chunk.meta_data.as_ref().and_then(|m| m.statistics.as_ref()))
    }

    /// Cursor over all columns
    pub fn read_rows(self) -> Result<RowIterator<R>> {
        let projected = (0..self.schema.num_columns()).collect();
        Ok(RowIterator::new(self, projected))
    }

    /// Cursor over the given dotted paths. A path naming a group selects
    /// every leaf beneath it; unknown paths fail.
    pub fn read_rows_with_projection(self, paths: &[&str]) -> Result<RowIterator<R>> {
        let mut projected: Vec<usize> = Vec::new();
        for path in paths {
            let info = self.schema.find_field(path)?;
            let prefix = info.path.clone();
            for (index, column) in self.schema.columns().iter().enumerate() {
                let matches = column.path.len() >= prefix.len()
                    && column.path[..prefix.len()] == prefix[..];
                if matches && !projected.contains(&index) {
                    projected.push(index);
                }
            }
        }
        projected.sort_unstable();
        Ok(RowIterator::new(self, projected))
    }
}

fn find_chunk<'a>(
    group: &'a format::RowGroup,
    path: &[std::sync::Arc<str>],
) -> Result<&'a format::ColumnChunk> {
    group
        .columns
        .iter()
        .find(|chunk| {
            chunk
                .meta_data
                .as_ref()
                .is_some_and(|meta| {
                    meta.path_in_schema.len() == path.len()
                        && meta
                            .path_in_schema
                            .iter()
                            .zip(path)
                            .all(|(a, b)| a.as_str() == &**b)
                })
        })
        .ok_or_else(|| {
            ParquetError::format(format!(
                "Row group has no column chunk for '{}'",
                path.join(".")
            ))
        })
}

/// Sequential cursor over assembled records
#[derive(Debug)]
pub struct RowIterator<R> {
    reader: Reader<R>,
    projected: Vec<usize>,
    current_group: usize,
    pending: std::vec::IntoIter<Row>,
}

impl<R> RowIterator<R>
where
    R: ByteSource,
{
    fn new(reader: Reader<R>, projected: Vec<usize>) -> Self {
        Self {
            reader,
            projected,
            current_group: 0,
            pending: Vec::new().into_iter(),
        }
    }

    fn load_next_group(&mut self) -> Result<Option<Vec<Row>>> {
        let Some(group) = self.reader.metadata.row_groups.get(self.current_group) else {
            return Ok(None);
        };
        self.current_group += 1;

        let mut chunks = Vec::with_capacity(self.projected.len());
        for &index in &self.projected {
            let desc = &self.reader.schema.columns()[index];
            let chunk = find_chunk(group, &desc.path)?;
            let meta = chunk.meta_data.as_ref().ok_or_else(|| {
                ParquetError::format(format!(
                    "Column chunk '{}' carries no metadata",
                    desc.path_string()
                ))
            })?;
            let codec = Compression::from_i32(meta.codec)?;

            let raw = self.reader.source.read_at(
                meta.data_page_offset as u64,
                meta.total_compressed_size as usize,
            )?;

            let mut data = ColumnChunkData {
                column: index,
                values: Vec::new(),
                rep_levels: Vec::new(),
                def_levels: Vec::new(),
            };
            let mut pos = 0usize;
            let mut tuples: i64 = 0;
            while tuples < meta.num_values {
                if pos >= raw.len() {
                    return Err(ParquetError::format(format!(
                        "Column chunk '{}' ended before its {} declared values",
                        desc.path_string(),
                        meta.num_values
                    )));
                }
                let (header, consumed): (format::PageHeader, usize) =
                    decode_from_slice(&raw[pos..])?;
                pos += consumed;
                let body_len = header.compressed_page_size as usize;
                let body = raw.get(pos..pos + body_len).ok_or_else(|| {
                    ParquetError::format("Page body extends past its column chunk")
                })?;
                pos += body_len;

                let page = decode_data_page(&header, body, desc, codec)?;
                tuples += page.def_levels.len() as i64;
                data.values.extend(page.values);
                data.rep_levels.extend(page.rep_levels);
                data.def_levels.extend(page.def_levels);
            }
            if tuples != meta.num_values {
                return Err(ParquetError::format(format!(
                    "Column chunk '{}' holds {} values but declares {}",
                    desc.path_string(),
                    tuples,
                    meta.num_values
                )));
            }
            chunks.push(data);
        }

        let records = assemble_records(
            &self.reader.schema,
            &chunks,
            group.num_rows as usize,
        )?;
        Ok(Some(records))
    }
}

impl<R> Iterator for RowIterator<R>
where
    R: ByteSource,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            match self.load_next_group() {
                Ok(Some(records)) => self.pending = records.into_iter(),
                Ok(None) => return None,
                Err(e) => {
                    // Fuse after an error.
                    self.current_group = self.reader.metadata.row_groups.len();
                    return Some(Err(e));
                }
            }
        }
    }
}
