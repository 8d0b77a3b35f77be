//! The page engine: composing and decoding data pages.
//!
//! A V1 page body is `rep || def || values` with each level section RLE
//! encoded behind a `u32` little-endian length prefix; the whole body is
//! subject to compression. A V2 page carries its level byte lengths in the
//! header, keeps levels uncompressed, and compresses only the values region.
//! Boolean values are PLAIN bit-packed in V1 pages and RLE encoded (bit
//! width 1, length-prefixed) in V2 pages.

use byteorder::{ByteOrder, LittleEndian};

use crate::basic::{Compression, Encoding, PageType, PhysicalType};
use crate::encoding::{plain, rle};
use crate::error::{ParquetError, Result};
use crate::format;
use crate::schema::ColumnDescriptor;
use crate::statistics::StatisticsAccumulator;
use crate::value::ParquetValue;

/// A fully encoded page: serialized header plus body bytes, along with the
/// metrics the chunk writer folds into column metadata.
#[derive(Debug)]
pub struct EncodedPage {
    pub header: format::PageHeader,
    pub body: Vec<u8>,
    pub num_values: usize,
    pub statistics: StatisticsAccumulator,
}

impl EncodedPage {
    pub fn uncompressed_size(&self) -> usize {
        self.header.uncompressed_page_size as usize
    }

    pub fn compressed_size(&self) -> usize {
        self.body.len()
    }
}

/// Decoded tuple streams of one page.
#[derive(Debug)]
pub struct DecodedPage {
    pub values: Vec<ParquetValue>,
    pub rep_levels: Vec<u16>,
    pub def_levels: Vec<u16>,
}

fn page_statistics(
    desc: &ColumnDescriptor,
    values: &[ParquetValue],
    def_levels: &[u16],
    distinct_limit: Option<usize>,
) -> StatisticsAccumulator {
    let mut stats = StatisticsAccumulator::new(distinct_limit);
    for value in values {
        stats.update(value);
    }
    let nulls = def_levels
        .iter()
        .filter(|&&def| def < desc.max_def_level)
        .count();
    for _ in 0..nulls {
        stats.update_null();
    }
    stats
}

fn encode_values(
    desc: &ColumnDescriptor,
    values: &[ParquetValue],
    v2: bool,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if v2 && desc.physical_type == PhysicalType::Boolean {
        let levels: Vec<u16> = values
            .iter()
            .map(|v| match v {
                ParquetValue::Boolean(true) => Ok(1u16),
                ParquetValue::Boolean(false) => Ok(0u16),
                other => Err(ParquetError::conversion(format!(
                    "Cannot RLE-encode {} as BOOLEAN",
                    other.type_name()
                ))),
            })
            .collect::<Result<_>>()?;
        let encoded = rle::encode(&levels, 1);
        let mut prefix = [0u8; 4];
        LittleEndian::write_u32(&mut prefix, encoded.len() as u32);
        buf.extend_from_slice(&prefix);
        buf.extend_from_slice(&encoded);
    } else {
        plain::encode(values, desc.physical_type, &mut buf)?;
    }
    Ok(buf)
}

fn encode_levels_prefixed(levels: &[u16], max: u16, out: &mut Vec<u8>) {
    let encoded = rle::encode(levels, rle::bit_width(max));
    let mut prefix = [0u8; 4];
    LittleEndian::write_u32(&mut prefix, encoded.len() as u32);
    out.extend_from_slice(&prefix);
    out.extend_from_slice(&encoded);
}

/// Build a V1 data page over one page's worth of tuples.
pub fn build_data_page_v1(
    desc: &ColumnDescriptor,
    values: &[ParquetValue],
    rep_levels: &[u16],
    def_levels: &[u16],
    codec: Compression,
    distinct_limit: Option<usize>,
) -> Result<EncodedPage> {
    let num_values = def_levels.len();
    let statistics = page_statistics(desc, values, def_levels, distinct_limit);

    let mut body = Vec::new();
    if desc.max_rep_level > 0 {
        encode_levels_prefixed(rep_levels, desc.max_rep_level, &mut body);
    }
    if desc.max_def_level > 0 {
        encode_levels_prefixed(def_levels, desc.max_def_level, &mut body);
    }
    body.extend_from_slice(&encode_values(desc, values, false)?);

    let uncompressed_page_size = body.len() as i32;
    let compressed = codec.compress(&body)?;

    let header = format::PageHeader {
        type_: PageType::DataPage.to_i32(),
        uncompressed_page_size,
        compressed_page_size: compressed.len() as i32,
        crc: None,
        data_page_header: Some(format::DataPageHeader {
            num_values: num_values as i32,
            encoding: Encoding::Plain.to_i32(),
            definition_level_encoding: Encoding::Rle.to_i32(),
            repetition_level_encoding: Encoding::Rle.to_i32(),
            statistics: Some(statistics.to_format(desc.physical_type)?),
        }),
        data_page_header_v2: None,
    };

    Ok(EncodedPage {
        header,
        body: compressed,
        num_values,
        statistics,
    })
}

/// Build a V2 data page; levels stay uncompressed, only values compress.
pub fn build_data_page_v2(
    desc: &ColumnDescriptor,
    values: &[ParquetValue],
    rep_levels: &[u16],
    def_levels: &[u16],
    codec: Compression,
    distinct_limit: Option<usize>,
) -> Result<EncodedPage> {
    let num_values = def_levels.len();
    let statistics = page_statistics(desc, values, def_levels, distinct_limit);
    let num_rows = rep_levels.iter().filter(|&&rep| rep == 0).count();
    let num_nulls = num_values - values.len();

    let rep_bytes = if desc.max_rep_level > 0 {
        rle::encode(rep_levels, rle::bit_width(desc.max_rep_level))
    } else {
        Vec::new()
    };
    let def_bytes = if desc.max_def_level > 0 {
        rle::encode(def_levels, rle::bit_width(desc.max_def_level))
    } else {
        Vec::new()
    };
    let value_bytes = encode_values(desc, values, true)?;

    let uncompressed_page_size =
        (rep_bytes.len() + def_bytes.len() + value_bytes.len()) as i32;
    let compressed_values = codec.compress(&value_bytes)?;

    let mut body = Vec::with_capacity(rep_bytes.len() + def_bytes.len() + compressed_values.len());
    body.extend_from_slice(&rep_bytes);
    body.extend_from_slice(&def_bytes);
    body.extend_from_slice(&compressed_values);

    let value_encoding = if desc.physical_type == PhysicalType::Boolean {
        Encoding::Rle
    } else {
        Encoding::Plain
    };

    let header = format::PageHeader {
        type_: PageType::DataPageV2.to_i32(),
        uncompressed_page_size,
        compressed_page_size: body.len() as i32,
        crc: None,
        data_page_header: None,
        data_page_header_v2: Some(format::DataPageHeaderV2 {
            num_values: num_values as i32,
            num_nulls: num_nulls as i32,
            num_rows: num_rows as i32,
            encoding: value_encoding.to_i32(),
            definition_levels_byte_length: def_bytes.len() as i32,
            repetition_levels_byte_length: rep_bytes.len() as i32,
            is_compressed: Some(!codec.is_uncompressed()),
            statistics: Some(statistics.to_format(desc.physical_type)?),
        }),
    };

    Ok(EncodedPage {
        header,
        body,
        num_values,
        statistics,
    })
}

fn decode_values(
    desc: &ColumnDescriptor,
    buf: &[u8],
    count: usize,
    v2: bool,
) -> Result<Vec<ParquetValue>> {
    if v2 && desc.physical_type == PhysicalType::Boolean {
        if buf.len() < 4 {
            return Err(ParquetError::format("Truncated RLE boolean value stream"));
        }
        let len = LittleEndian::read_u32(&buf[..4]) as usize;
        let stream = buf.get(4..4 + len).ok_or_else(|| {
            ParquetError::format("Truncated RLE boolean value stream")
        })?;
        let levels = rle::decode(stream, 1, count)?;
        Ok(levels
            .into_iter()
            .map(|v| ParquetValue::Boolean(v == 1))
            .collect())
    } else {
        plain::decode(buf, desc.physical_type, count, desc.type_length)
    }
}

fn decode_levels_prefixed<'a>(
    buf: &'a [u8],
    max: u16,
    count: usize,
) -> Result<(Vec<u16>, &'a [u8])> {
    if buf.len() < 4 {
        return Err(ParquetError::format("Truncated level section"));
    }
    let len = LittleEndian::read_u32(&buf[..4]) as usize;
    let stream = buf
        .get(4..4 + len)
        .ok_or_else(|| ParquetError::format("Truncated level section"))?;
    let levels = rle::decode(stream, rle::bit_width(max), count)?;
    Ok((levels, &buf[4 + len..]))
}

/// Decode one data page (either version) from its compressed body bytes.
pub fn decode_data_page(
    header: &format::PageHeader,
    body: &[u8],
    desc: &ColumnDescriptor,
    codec: Compression,
) -> Result<DecodedPage> {
    match PageType::from_i32(header.type_)? {
        PageType::DataPage => {
            let page_header = header.data_page_header.as_ref().ok_or_else(|| {
                ParquetError::format("DATA_PAGE header is missing its data_page_header")
            })?;
            let num_values = usize::try_from(page_header.num_values)
                .map_err(|_| ParquetError::format("Negative page value count"))?;
            Encoding::from_i32(page_header.encoding)?;

            let body = codec.decompress(body, header.uncompressed_page_size as usize)?;
            let mut rest = body.as_slice();

            let rep_levels = if desc.max_rep_level > 0 {
                let (levels, tail) = decode_levels_prefixed(rest, desc.max_rep_level, num_values)?;
                rest = tail;
                levels
            } else {
                vec![0; num_values]
            };
            let def_levels = if desc.max_def_level > 0 {
                let (levels, tail) = decode_levels_prefixed(rest, desc.max_def_level, num_values)?;
                rest = tail;
                levels
            } else {
                vec![0; num_values]
            };

            let present = def_levels
                .iter()
                .filter(|&&def| def == desc.max_def_level)
                .count();
            let values = decode_values(desc, rest, present, false)?;
            Ok(DecodedPage {
                values,
                rep_levels,
                def_levels,
            })
        }
        PageType::DataPageV2 => {
            let page_header = header.data_page_header_v2.as_ref().ok_or_else(|| {
                ParquetError::format("DATA_PAGE_V2 header is missing its data_page_header_v2")
            })?;
            let num_values = usize::try_from(page_header.num_values)
                .map_err(|_| ParquetError::format("Negative page value count"))?;
            Encoding::from_i32(page_header.encoding)?;

            let rep_len = page_header.repetition_levels_byte_length as usize;
            let def_len = page_header.definition_levels_byte_length as usize;
            if body.len() < rep_len + def_len {
                return Err(ParquetError::format(
                    "Page body shorter than its level sections",
                ));
            }

            let rep_levels = if desc.max_rep_level > 0 {
                rle::decode(&body[..rep_len], rle::bit_width(desc.max_rep_level), num_values)?
            } else {
                vec![0; num_values]
            };
            let def_levels = if desc.max_def_level > 0 {
                rle::decode(
                    &body[rep_len..rep_len + def_len],
                    rle::bit_width(desc.max_def_level),
                    num_values,
                )?
            } else {
                vec![0; num_values]
            };

            let values_region = &body[rep_len + def_len..];
            let decompressed;
            let values_bytes = if page_header.is_compressed.unwrap_or(true)
                && !codec.is_uncompressed()
            {
                let uncompressed_len =
                    header.uncompressed_page_size as usize - rep_len - def_len;
                decompressed = codec.decompress(values_region, uncompressed_len)?;
                decompressed.as_slice()
            } else {
                values_region
            };

            let present = def_levels
                .iter()
                .filter(|&&def| def == desc.max_def_level)
                .count();
            let values = decode_values(desc, values_bytes, present, true)?;
            Ok(DecodedPage {
                values,
                rep_levels,
                def_levels,
            })
        }
    }
}
