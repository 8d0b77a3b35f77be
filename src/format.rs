//! The fixed set of metadata records written to and read from files: page
//! headers, the schema element list, row-group and column-chunk metadata,
//! and the file footer. Serialization is the Thrift compact protocol, via
//! hand-written [`TSerializable`] impls; enum-valued fields are carried as
//! their `i32` wire values and interpreted by the schema layer.

use thrift::protocol::{
    field_id, verify_required_field_exists, TFieldIdentifier, TInputProtocol, TListIdentifier,
    TOutputProtocol, TType,
};

use crate::thrift_ext::TSerializable;

fn write_i32_field<T: TOutputProtocol>(
    o_prot: &mut T,
    name: &'static str,
    id: i16,
    value: i32,
) -> thrift::Result<()> {
    o_prot.write_field_begin(&TFieldIdentifier::new(name, TType::I32, id))?;
    o_prot.write_i32(value)?;
    o_prot.write_field_end()
}

fn write_i64_field<T: TOutputProtocol>(
    o_prot: &mut T,
    name: &'static str,
    id: i16,
    value: i64,
) -> thrift::Result<()> {
    o_prot.write_field_begin(&TFieldIdentifier::new(name, TType::I64, id))?;
    o_prot.write_i64(value)?;
    o_prot.write_field_end()
}

fn write_string_field<T: TOutputProtocol>(
    o_prot: &mut T,
    name: &'static str,
    id: i16,
    value: &str,
) -> thrift::Result<()> {
    o_prot.write_field_begin(&TFieldIdentifier::new(name, TType::String, id))?;
    o_prot.write_string(value)?;
    o_prot.write_field_end()
}

fn write_bytes_field<T: TOutputProtocol>(
    o_prot: &mut T,
    name: &'static str,
    id: i16,
    value: &[u8],
) -> thrift::Result<()> {
    o_prot.write_field_begin(&TFieldIdentifier::new(name, TType::String, id))?;
    o_prot.write_bytes(value)?;
    o_prot.write_field_end()
}

fn write_struct_field<T: TOutputProtocol, S: TSerializable>(
    o_prot: &mut T,
    name: &'static str,
    id: i16,
    value: &S,
) -> thrift::Result<()> {
    o_prot.write_field_begin(&TFieldIdentifier::new(name, TType::Struct, id))?;
    value.write_to_out_protocol(o_prot)?;
    o_prot.write_field_end()
}

fn read_struct_list<T: TInputProtocol, S: TSerializable>(
    i_prot: &mut T,
) -> thrift::Result<Vec<S>> {
    let list_ident = i_prot.read_list_begin()?;
    let mut out = Vec::with_capacity(list_ident.size.max(0) as usize);
    for _ in 0..list_ident.size {
        out.push(S::read_from_in_protocol(i_prot)?);
    }
    i_prot.read_list_end()?;
    Ok(out)
}

/// Column or page value statistics. `min_value`/`max_value` hold a single
/// PLAIN-encoded value, byte arrays without their length prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statistics {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub max_value: Option<Vec<u8>>,
    pub min_value: Option<Vec<u8>>,
}

impl TSerializable for Statistics {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut result = Statistics::default();
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                3 => result.null_count = Some(i_prot.read_i64()?),
                4 => result.distinct_count = Some(i_prot.read_i64()?),
                5 => result.max_value = Some(i_prot.read_bytes()?),
                6 => result.min_value = Some(i_prot.read_bytes()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        Ok(result)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&thrift::protocol::TStructIdentifier::new("Statistics"))?;
        if let Some(v) = self.null_count {
            write_i64_field(o_prot, "null_count", 3, v)?;
        }
        if let Some(v) = self.distinct_count {
            write_i64_field(o_prot, "distinct_count", 4, v)?;
        }
        if let Some(v) = &self.max_value {
            write_bytes_field(o_prot, "max_value", 5, v)?;
        }
        if let Some(v) = &self.min_value {
            write_bytes_field(o_prot, "min_value", 6, v)?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Header of a V1 data page.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPageHeader {
    pub num_values: i32,
    pub encoding: i32,
    pub definition_level_encoding: i32,
    pub repetition_level_encoding: i32,
    pub statistics: Option<Statistics>,
}

impl TSerializable for DataPageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<i32> = None;
        let mut definition_level_encoding: Option<i32> = None;
        let mut repetition_level_encoding: Option<i32> = None;
        let mut statistics: Option<Statistics> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => num_values = Some(i_prot.read_i32()?),
                2 => encoding = Some(i_prot.read_i32()?),
                3 => definition_level_encoding = Some(i_prot.read_i32()?),
                4 => repetition_level_encoding = Some(i_prot.read_i32()?),
                5 => statistics = Some(Statistics::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DataPageHeader.num_values", &num_values)?;
        verify_required_field_exists("DataPageHeader.encoding", &encoding)?;
        Ok(DataPageHeader {
            num_values: num_values.unwrap_or(0),
            encoding: encoding.unwrap_or(0),
            definition_level_encoding: definition_level_encoding.unwrap_or(3),
            repetition_level_encoding: repetition_level_encoding.unwrap_or(3),
            statistics,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&thrift::protocol::TStructIdentifier::new("DataPageHeader"))?;
        write_i32_field(o_prot, "num_values", 1, self.num_values)?;
        write_i32_field(o_prot, "encoding", 2, self.encoding)?;
        write_i32_field(
            o_prot,
            "definition_level_encoding",
            3,
            self.definition_level_encoding,
        )?;
        write_i32_field(
            o_prot,
            "repetition_level_encoding",
            4,
            self.repetition_level_encoding,
        )?;
        if let Some(stats) = &self.statistics {
            write_struct_field(o_prot, "statistics", 5, stats)?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Header of a V2 data page. Level sections are uncompressed and their byte
/// lengths live here rather than as stream prefixes.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPageHeaderV2 {
    pub num_values: i32,
    pub num_nulls: i32,
    pub num_rows: i32,
    pub encoding: i32,
    pub definition_levels_byte_length: i32,
    pub repetition_levels_byte_length: i32,
    pub is_compressed: Option<bool>,
    pub statistics: Option<Statistics>,
}

impl TSerializable for DataPageHeaderV2 {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut num_values: Option<i32> = None;
        let mut num_nulls: Option<i32> = None;
        let mut num_rows: Option<i32> = None;
        let mut encoding: Option<i32> = None;
        let mut definition_levels_byte_length: Option<i32> = None;
        let mut repetition_levels_byte_length: Option<i32> = None;
        let mut is_compressed: Option<bool> = None;
        let mut statistics: Option<Statistics> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => num_values = Some(i_prot.read_i32()?),
                2 => num_nulls = Some(i_prot.read_i32()?),
                3 => num_rows = Some(i_prot.read_i32()?),
                4 => encoding = Some(i_prot.read_i32()?),
                5 => definition_levels_byte_length = Some(i_prot.read_i32()?),
                6 => repetition_levels_byte_length = Some(i_prot.read_i32()?),
                7 => is_compressed = Some(i_prot.read_bool()?),
                8 => statistics = Some(Statistics::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DataPageHeaderV2.num_values", &num_values)?;
        verify_required_field_exists(
            "DataPageHeaderV2.definition_levels_byte_length",
            &definition_levels_byte_length,
        )?;
        verify_required_field_exists(
            "DataPageHeaderV2.repetition_levels_byte_length",
            &repetition_levels_byte_length,
        )?;
        Ok(DataPageHeaderV2 {
            num_values: num_values.unwrap_or(0),
            num_nulls: num_nulls.unwrap_or(0),
            num_rows: num_rows.unwrap_or(0),
            encoding: encoding.unwrap_or(0),
            definition_levels_byte_length: definition_levels_byte_length.unwrap_or(0),
            repetition_levels_byte_length: repetition_levels_byte_length.unwrap_or(0),
            is_compressed,
            statistics,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot
            .write_struct_begin(&thrift::protocol::TStructIdentifier::new("DataPageHeaderV2"))?;
        write_i32_field(o_prot, "num_values", 1, self.num_values)?;
        write_i32_field(o_prot, "num_nulls", 2, self.num_nulls)?;
        write_i32_field(o_prot, "num_rows", 3, self.num_rows)?;
        write_i32_field(o_prot, "encoding", 4, self.encoding)?;
        write_i32_field(
            o_prot,
            "definition_levels_byte_length",
            5,
            self.definition_levels_byte_length,
        )?;
        write_i32_field(
            o_prot,
            "repetition_levels_byte_length",
            6,
            self.repetition_levels_byte_length,
        )?;
        if let Some(v) = self.is_compressed {
            o_prot.write_field_begin(&TFieldIdentifier::new("is_compressed", TType::Bool, 7))?;
            o_prot.write_bool(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(stats) = &self.statistics {
            write_struct_field(o_prot, "statistics", 8, stats)?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Common header preceding every page in a column chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct PageHeader {
    pub type_: i32,
    pub uncompressed_page_size: i32,
    pub compressed_page_size: i32,
    pub crc: Option<i32>,
    pub data_page_header: Option<DataPageHeader>,
    pub data_page_header_v2: Option<DataPageHeaderV2>,
}

impl TSerializable for PageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut type_: Option<i32> = None;
        let mut uncompressed_page_size: Option<i32> = None;
        let mut compressed_page_size: Option<i32> = None;
        let mut crc: Option<i32> = None;
        let mut data_page_header: Option<DataPageHeader> = None;
        let mut data_page_header_v2: Option<DataPageHeaderV2> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => type_ = Some(i_prot.read_i32()?),
                2 => uncompressed_page_size = Some(i_prot.read_i32()?),
                3 => compressed_page_size = Some(i_prot.read_i32()?),
                4 => crc = Some(i_prot.read_i32()?),
                5 => data_page_header = Some(DataPageHeader::read_from_in_protocol(i_prot)?),
                8 => data_page_header_v2 = Some(DataPageHeaderV2::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("PageHeader.type", &type_)?;
        verify_required_field_exists(
            "PageHeader.uncompressed_page_size",
            &uncompressed_page_size,
        )?;
        verify_required_field_exists("PageHeader.compressed_page_size", &compressed_page_size)?;
        Ok(PageHeader {
            type_: type_.unwrap_or(0),
            uncompressed_page_size: uncompressed_page_size.unwrap_or(0),
            compressed_page_size: compressed_page_size.unwrap_or(0),
            crc,
            data_page_header,
            data_page_header_v2,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&thrift::protocol::TStructIdentifier::new("PageHeader"))?;
        write_i32_field(o_prot, "type", 1, self.type_)?;
        write_i32_field(
            o_prot,
            "uncompressed_page_size",
            2,
            self.uncompressed_page_size,
        )?;
        write_i32_field(o_prot, "compressed_page_size", 3, self.compressed_page_size)?;
        if let Some(v) = self.crc {
            write_i32_field(o_prot, "crc", 4, v)?;
        }
        if let Some(header) = &self.data_page_header {
            write_struct_field(o_prot, "data_page_header", 5, header)?;
        }
        if let Some(header) = &self.data_page_header_v2 {
            write_struct_field(o_prot, "data_page_header_v2", 8, header)?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// One user metadata pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Option<String>,
}

impl TSerializable for KeyValue {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut key: Option<String> = None;
        let mut value: Option<String> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => key = Some(i_prot.read_string()?),
                2 => value = Some(i_prot.read_string()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("KeyValue.key", &key)?;
        Ok(KeyValue {
            key: key.unwrap_or_default(),
            value,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&thrift::protocol::TStructIdentifier::new("KeyValue"))?;
        write_string_field(o_prot, "key", 1, &self.key)?;
        if let Some(v) = &self.value {
            write_string_field(o_prot, "value", 2, v)?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// One node of the flattened schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaElement {
    pub type_: Option<i32>,
    pub type_length: Option<i32>,
    pub repetition_type: Option<i32>,
    pub name: String,
    pub num_children: Option<i32>,
    pub converted_type: Option<i32>,
    pub scale: Option<i32>,
    pub precision: Option<i32>,
}

impl TSerializable for SchemaElement {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut result = SchemaElement::default();
        let mut name: Option<String> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => result.type_ = Some(i_prot.read_i32()?),
                2 => result.type_length = Some(i_prot.read_i32()?),
                3 => result.repetition_type = Some(i_prot.read_i32()?),
                4 => name = Some(i_prot.read_string()?),
                5 => result.num_children = Some(i_prot.read_i32()?),
                6 => result.converted_type = Some(i_prot.read_i32()?),
                7 => result.scale = Some(i_prot.read_i32()?),
                8 => result.precision = Some(i_prot.read_i32()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("SchemaElement.name", &name)?;
        result.name = name.unwrap_or_default();
        Ok(result)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&thrift::protocol::TStructIdentifier::new("SchemaElement"))?;
        if let Some(v) = self.type_ {
            write_i32_field(o_prot, "type", 1, v)?;
        }
        if let Some(v) = self.type_length {
            write_i32_field(o_prot, "type_length", 2, v)?;
        }
        if let Some(v) = self.repetition_type {
            write_i32_field(o_prot, "repetition_type", 3, v)?;
        }
        write_string_field(o_prot, "name", 4, &self.name)?;
        if let Some(v) = self.num_children {
            write_i32_field(o_prot, "num_children", 5, v)?;
        }
        if let Some(v) = self.converted_type {
            write_i32_field(o_prot, "converted_type", 6, v)?;
        }
        if let Some(v) = self.scale {
            write_i32_field(o_prot, "scale", 7, v)?;
        }
        if let Some(v) = self.precision {
            write_i32_field(o_prot, "precision", 8, v)?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Metadata of one column chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetaData {
    pub type_: i32,
    pub encodings: Vec<i32>,
    pub path_in_schema: Vec<String>,
    pub codec: i32,
    pub num_values: i64,
    pub total_uncompressed_size: i64,
    pub total_compressed_size: i64,
    pub data_page_offset: i64,
    pub index_page_offset: Option<i64>,
    pub dictionary_page_offset: Option<i64>,
    pub statistics: Option<Statistics>,
    pub bloom_filter_offset: Option<i64>,
    pub bloom_filter_length: Option<i32>,
}

impl TSerializable for ColumnMetaData {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut type_: Option<i32> = None;
        let mut encodings: Option<Vec<i32>> = None;
        let mut path_in_schema: Option<Vec<String>> = None;
        let mut codec: Option<i32> = None;
        let mut num_values: Option<i64> = None;
        let mut total_uncompressed_size: Option<i64> = None;
        let mut total_compressed_size: Option<i64> = None;
        let mut data_page_offset: Option<i64> = None;
        let mut index_page_offset: Option<i64> = None;
        let mut dictionary_page_offset: Option<i64> = None;
        let mut statistics: Option<Statistics> = None;
        let mut bloom_filter_offset: Option<i64> = None;
        let mut bloom_filter_length: Option<i32> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => type_ = Some(i_prot.read_i32()?),
                2 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut values = Vec::with_capacity(list_ident.size.max(0) as usize);
                    for _ in 0..list_ident.size {
                        values.push(i_prot.read_i32()?);
                    }
                    i_prot.read_list_end()?;
                    encodings = Some(values);
                }
                3 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut values = Vec::with_capacity(list_ident.size.max(0) as usize);
                    for _ in 0..list_ident.size {
                        values.push(i_prot.read_string()?);
                    }
                    i_prot.read_list_end()?;
                    path_in_schema = Some(values);
                }
                4 => codec = Some(i_prot.read_i32()?),
                5 => num_values = Some(i_prot.read_i64()?),
                6 => total_uncompressed_size = Some(i_prot.read_i64()?),
                7 => total_compressed_size = Some(i_prot.read_i64()?),
                9 => data_page_offset = Some(i_prot.read_i64()?),
                10 => index_page_offset = Some(i_prot.read_i64()?),
                11 => dictionary_page_offset = Some(i_prot.read_i64()?),
                12 => statistics = Some(Statistics::read_from_in_protocol(i_prot)?),
                14 => bloom_filter_offset = Some(i_prot.read_i64()?),
                15 => bloom_filter_length = Some(i_prot.read_i32()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("ColumnMetaData.type", &type_)?;
        verify_required_field_exists("ColumnMetaData.num_values", &num_values)?;
        verify_required_field_exists("ColumnMetaData.data_page_offset", &data_page_offset)?;
        Ok(ColumnMetaData {
            type_: type_.unwrap_or(0),
            encodings: encodings.unwrap_or_default(),
            path_in_schema: path_in_schema.unwrap_or_default(),
            codec: codec.unwrap_or(0),
            num_values: num_values.unwrap_or(0),
            total_uncompressed_size: total_uncompressed_size.unwrap_or(0),
            total_compressed_size: total_compressed_size.unwrap_or(0),
            data_page_offset: data_page_offset.unwrap_or(0),
            index_page_offset,
            dictionary_page_offset,
            statistics,
            bloom_filter_offset,
            bloom_filter_length,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&thrift::protocol::TStructIdentifier::new("ColumnMetaData"))?;
        write_i32_field(o_prot, "type", 1, self.type_)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("encodings", TType::List, 2))?;
        o_prot.write_list_begin(&TListIdentifier::new(TType::I32, self.encodings.len() as i32))?;
        for encoding in &self.encodings {
            o_prot.write_i32(*encoding)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("path_in_schema", TType::List, 3))?;
        o_prot.write_list_begin(&TListIdentifier::new(
            TType::String,
            self.path_in_schema.len() as i32,
        ))?;
        for part in &self.path_in_schema {
            o_prot.write_string(part)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        write_i32_field(o_prot, "codec", 4, self.codec)?;
        write_i64_field(o_prot, "num_values", 5, self.num_values)?;
        write_i64_field(
            o_prot,
            "total_uncompressed_size",
            6,
            self.total_uncompressed_size,
        )?;
        write_i64_field(
            o_prot,
            "total_compressed_size",
            7,
            self.total_compressed_size,
        )?;
        write_i64_field(o_prot, "data_page_offset", 9, self.data_page_offset)?;
        if let Some(v) = self.index_page_offset {
            write_i64_field(o_prot, "index_page_offset", 10, v)?;
        }
        if let Some(v) = self.dictionary_page_offset {
            write_i64_field(o_prot, "dictionary_page_offset", 11, v)?;
        }
        if let Some(stats) = &self.statistics {
            write_struct_field(o_prot, "statistics", 12, stats)?;
        }
        if let Some(v) = self.bloom_filter_offset {
            write_i64_field(o_prot, "bloom_filter_offset", 14, v)?;
        }
        if let Some(v) = self.bloom_filter_length {
            write_i32_field(o_prot, "bloom_filter_length", 15, v)?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// One column chunk within a row group.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChunk {
    pub file_path: Option<String>,
    pub file_offset: i64,
    pub meta_data: Option<ColumnMetaData>,
}

impl TSerializable for ColumnChunk {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut file_path: Option<String> = None;
        let mut file_offset: Option<i64> = None;
        let mut meta_data: Option<ColumnMetaData> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => file_path = Some(i_prot.read_string()?),
                2 => file_offset = Some(i_prot.read_i64()?),
                3 => meta_data = Some(ColumnMetaData::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("ColumnChunk.file_offset", &file_offset)?;
        Ok(ColumnChunk {
            file_path,
            file_offset: file_offset.unwrap_or(0),
            meta_data,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&thrift::protocol::TStructIdentifier::new("ColumnChunk"))?;
        if let Some(path) = &self.file_path {
            write_string_field(o_prot, "file_path", 1, path)?;
        }
        write_i64_field(o_prot, "file_offset", 2, self.file_offset)?;
        if let Some(meta) = &self.meta_data {
            write_struct_field(o_prot, "meta_data", 3, meta)?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// One horizontal slice of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    pub columns: Vec<ColumnChunk>,
    pub total_byte_size: i64,
    pub num_rows: i64,
}

impl TSerializable for RowGroup {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut columns: Option<Vec<ColumnChunk>> = None;
        let mut total_byte_size: Option<i64> = None;
        let mut num_rows: Option<i64> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => columns = Some(read_struct_list(i_prot)?),
                2 => total_byte_size = Some(i_prot.read_i64()?),
                3 => num_rows = Some(i_prot.read_i64()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("RowGroup.columns", &columns)?;
        verify_required_field_exists("RowGroup.num_rows", &num_rows)?;
        Ok(RowGroup {
            columns: columns.unwrap_or_default(),
            total_byte_size: total_byte_size.unwrap_or(0),
            num_rows: num_rows.unwrap_or(0),
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&thrift::protocol::TStructIdentifier::new("RowGroup"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("columns", TType::List, 1))?;
        o_prot.write_list_begin(&TListIdentifier::new(
            TType::Struct,
            self.columns.len() as i32,
        ))?;
        for column in &self.columns {
            column.write_to_out_protocol(o_prot)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        write_i64_field(o_prot, "total_byte_size", 2, self.total_byte_size)?;
        write_i64_field(o_prot, "num_rows", 3, self.num_rows)?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// The footer record.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaData {
    pub version: i32,
    pub schema: Vec<SchemaElement>,
    pub num_rows: i64,
    pub row_groups: Vec<RowGroup>,
    pub key_value_metadata: Option<Vec<KeyValue>>,
    pub created_by: Option<String>,
}

impl TSerializable for FileMetaData {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut version: Option<i32> = None;
        let mut schema: Option<Vec<SchemaElement>> = None;
        let mut num_rows: Option<i64> = None;
        let mut row_groups: Option<Vec<RowGroup>> = None;
        let mut key_value_metadata: Option<Vec<KeyValue>> = None;
        let mut created_by: Option<String> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => version = Some(i_prot.read_i32()?),
                2 => schema = Some(read_struct_list(i_prot)?),
                3 => num_rows = Some(i_prot.read_i64()?),
                4 => row_groups = Some(read_struct_list(i_prot)?),
                5 => key_value_metadata = Some(read_struct_list(i_prot)?),
                6 => created_by = Some(i_prot.read_string()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("FileMetaData.version", &version)?;
        verify_required_field_exists("FileMetaData.schema", &schema)?;
        verify_required_field_exists("FileMetaData.num_rows", &num_rows)?;
        verify_required_field_exists("FileMetaData.row_groups", &row_groups)?;
        Ok(FileMetaData {
            version: version.unwrap_or(0),
            schema: schema.unwrap_or_default(),
            num_rows: num_rows.unwrap_or(0),
            row_groups: row_groups.unwrap_or_default(),
            key_value_metadata,
            created_by,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&thrift::protocol::TStructIdentifier::new("FileMetaData"))?;
        write_i32_field(o_prot, "version", 1, self.version)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("schema", TType::List, 2))?;
        o_prot.write_list_begin(&TListIdentifier::new(
            TType::Struct,
            self.schema.len() as i32,
        ))?;
        for element in &self.schema {
            element.write_to_out_protocol(o_prot)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        write_i64_field(o_prot, "num_rows", 3, self.num_rows)?;
        o_prot.write_field_begin(&TFieldIdentifier::new("row_groups", TType::List, 4))?;
        o_prot.write_list_begin(&TListIdentifier::new(
            TType::Struct,
            self.row_groups.len() as i32,
        ))?;
        for group in &self.row_groups {
            group.write_to_out_protocol(o_prot)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        if let Some(pairs) = &self.key_value_metadata {
            o_prot.write_field_begin(&TFieldIdentifier::new("key_value_metadata", TType::List, 5))?;
            o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, pairs.len() as i32))?;
            for pair in pairs {
                pair.write_to_out_protocol(o_prot)?;
            }
            o_prot.write_list_end()?;
            o_prot.write_field_end()?;
        }
        if let Some(created_by) = &self.created_by {
            write_string_field(o_prot, "created_by", 6, created_by)?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}
