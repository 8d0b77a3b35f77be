//! Record shredding and assembly.
//!
//! Shredding walks the compiled schema arena against each record and emits,
//! per leaf column, a stream of `(value, rep, def)` tuples: the definition
//! level counts the present non-required ancestors, the repetition level
//! marks the depth at which repetition occurred (0 starts a new record), and
//! values are present only when the definition level reaches the leaf's
//! maximum. Assembly inverts this with per-depth repetition counters.

use indexmap::IndexMap;

use crate::basic::{PhysicalType, Repetition};
use crate::conversion::{from_primitive, to_primitive};
use crate::encoding::plain;
use crate::error::{ParquetError, Result};
use crate::schema::{ColumnDescriptor, FieldKind, Schema};
use crate::value::{ParquetValue, Row};

/// Per-column arena filled while a row group is open. Released wholesale on
/// flush; nothing borrows across flushes.
#[derive(Debug, Default)]
pub struct ColumnBuffer {
    pub values: Vec<ParquetValue>,
    pub rep_levels: Vec<u16>,
    pub def_levels: Vec<u16>,
    /// Estimated uncompressed byte size of values plus level slots.
    pub byte_size: usize,
}

impl ColumnBuffer {
    pub fn num_tuples(&self) -> usize {
        self.def_levels.len()
    }
}

/// All column buffers of the row group currently being built.
#[derive(Debug)]
pub struct RowGroupBuffer {
    pub columns: Vec<ColumnBuffer>,
    pub num_rows: usize,
}

impl RowGroupBuffer {
    pub fn new(schema: &Schema) -> Self {
        Self {
            columns: (0..schema.num_columns()).map(|_| ColumnBuffer::default()).collect(),
            num_rows: 0,
        }
    }

    pub fn byte_size(&self) -> usize {
        self.columns.iter().map(|c| c.byte_size).sum()
    }

    /// Shred one record into the column buffers.
    pub fn push_row(&mut self, schema: &Schema, row: &Row) -> Result<()> {
        shred_fields(schema, &schema.root_fields, Some(row), &mut self.columns, 0, 0)?;
        self.num_rows += 1;
        Ok(())
    }
}

fn shred_fields(
    schema: &Schema,
    field_indices: &[usize],
    record: Option<&IndexMap<std::sync::Arc<str>, ParquetValue>>,
    columns: &mut [ColumnBuffer],
    rep: u16,
    def: u16,
) -> Result<()> {
    for &index in field_indices {
        let info = schema.field(index);
        let supplied = record
            .and_then(|r| r.get(&*info.name))
            .filter(|v| !v.is_null());

        let values: &[ParquetValue] = match supplied {
            None => &[],
            Some(ParquetValue::List(items)) => {
                if info.repetition != Repetition::Repeated {
                    return Err(list_input_error(schema, info.name.as_ref(), index, items));
                }
                items.as_slice()
            }
            Some(single) => std::slice::from_ref(single),
        };

        if values.is_empty() {
            if record.is_some() && info.repetition == Repetition::Required {
                return Err(ParquetError::data_validation(format!(
                    "Missing required field '{}'",
                    info.path.join(".")
                )));
            }
            match &info.kind {
                FieldKind::Group { children } => {
                    shred_fields(schema, children, None, columns, rep, def)?;
                }
                FieldKind::Leaf { column } => {
                    let buffer = &mut columns[*column];
                    buffer.rep_levels.push(rep);
                    buffer.def_levels.push(def);
                    buffer.byte_size += 2;
                }
            }
            continue;
        }

        for (i, value) in values.iter().enumerate() {
            let value_rep = if i == 0 { rep } else { info.rep_level_max };
            match &info.kind {
                FieldKind::Group { children } => {
                    let ParquetValue::Record(fields) = value else {
                        return Err(ParquetError::data_validation(format!(
                            "Group field '{}' expects a record, got {}",
                            info.path.join("."),
                            value.type_name()
                        )));
                    };
                    shred_fields(
                        schema,
                        children,
                        Some(fields),
                        columns,
                        value_rep,
                        info.def_level_max,
                    )?;
                }
                FieldKind::Leaf { column } => {
                    let desc = column_desc(schema, *column);
                    let primitive = to_primitive(desc, value.clone())?;
                    let buffer = &mut columns[*column];
                    buffer.byte_size += plain::encoded_size(&primitive) + 2;
                    buffer.values.push(primitive);
                    buffer.rep_levels.push(value_rep);
                    buffer.def_levels.push(info.def_level_max);
                }
            }
        }
    }
    Ok(())
}

fn column_desc(schema: &Schema, column: usize) -> &ColumnDescriptor {
    &schema.columns()[column]
}

fn list_input_error(
    schema: &Schema,
    name: &str,
    index: usize,
    items: &[ParquetValue],
) -> ParquetError {
    let info = schema.field(index);
    if let FieldKind::Leaf { column } = &info.kind {
        let desc = column_desc(schema, *column);
        if matches!(
            desc.physical_type,
            PhysicalType::ByteArray | PhysicalType::FixedLenByteArray
        ) {
            let element = items
                .first()
                .map(|v| v.type_name())
                .unwrap_or("empty");
            return ParquetError::unsupported(format!(
                "{} array input for {} column '{}' is not supported; pass raw bytes",
                element, desc.physical_type, name
            ));
        }
    }
    ParquetError::data_validation(format!(
        "Too many values for non-repeated field '{}'",
        info.path.join(".")
    ))
}

/// Decoded tuple streams of one column chunk, ready for assembly.
#[derive(Debug)]
pub struct ColumnChunkData {
    /// Index into [`Schema::columns`].
    pub column: usize,
    pub values: Vec<ParquetValue>,
    pub rep_levels: Vec<u16>,
    pub def_levels: Vec<u16>,
}

/// Rebuild records from projected column streams. Each tuple with a zero
/// repetition level starts a new record; all projected columns must agree on
/// the record count.
pub fn assemble_records(
    schema: &Schema,
    columns: &[ColumnChunkData],
    num_rows: usize,
) -> Result<Vec<Row>> {
    let mut records: Vec<Row> = Vec::with_capacity(num_rows);

    for chunk in columns {
        let desc = &schema.columns()[chunk.column];
        let mut values = chunk.values.iter();
        let mut rep_counts = vec![0usize; desc.max_rep_level as usize + 1];

        if chunk.rep_levels.len() != chunk.def_levels.len() {
            return Err(ParquetError::format(format!(
                "Column '{}' has mismatched level streams",
                desc.path_string()
            )));
        }

        for (&rep, &def) in chunk.rep_levels.iter().zip(&chunk.def_levels) {
            if rep > desc.max_rep_level || def > desc.max_def_level {
                return Err(ParquetError::format(format!(
                    "Column '{}' carries levels ({}, {}) beyond maxima ({}, {})",
                    desc.path_string(),
                    rep,
                    def,
                    desc.max_rep_level,
                    desc.max_def_level
                )));
            }
            for slot in rep_counts.iter_mut().skip(rep as usize + 1) {
                *slot = 0;
            }
            rep_counts[rep as usize] += 1;

            let mut value = if def == desc.max_def_level {
                let primitive = values.next().ok_or_else(|| {
                    ParquetError::format(format!(
                        "Column '{}' value stream exhausted before levels",
                        desc.path_string()
                    ))
                })?;
                Some(from_primitive(desc, primitive.clone())?)
            } else {
                None
            };

            let record_index = rep_counts[0] - 1;
            if records.len() <= record_index {
                records.resize_with(record_index + 1, Row::new);
            }
            materialize_field(
                &mut records[record_index],
                schema,
                &desc.branch,
                &rep_counts[1..],
                def,
                &mut value,
            )?;
        }
    }

    if !columns.is_empty() && records.len() != num_rows {
        return Err(ParquetError::format(format!(
            "Assembled {} records but the row group declares {}",
            records.len(),
            num_rows
        )));
    }
    records.resize_with(num_rows, Row::new);
    Ok(records)
}

fn materialize_field(
    record: &mut Row,
    schema: &Schema,
    branch: &[usize],
    rep_counts: &[usize],
    def: u16,
    value: &mut Option<ParquetValue>,
) -> Result<()> {
    let info = schema.field(branch[0]);
    if def < info.def_level_max {
        return Ok(());
    }

    if branch.len() > 1 {
        if info.repetition == Repetition::Repeated {
            let index = rep_counts[0];
            let list = expect_list(record, info.name.clone())?;
            while list.len() <= index {
                list.push(ParquetValue::Record(IndexMap::new()));
            }
            let ParquetValue::Record(child) = &mut list[index] else {
                return Err(ParquetError::format(format!(
                    "Assembled element under '{}' is not a record",
                    info.name
                )));
            };
            materialize_field(child, schema, &branch[1..], &rep_counts[1..], def, value)
        } else {
            let entry = record
                .entry(info.name.clone())
                .or_insert_with(|| ParquetValue::Record(IndexMap::new()));
            let ParquetValue::Record(child) = entry else {
                return Err(ParquetError::format(format!(
                    "Assembled field '{}' is not a record",
                    info.name
                )));
            };
            materialize_field(child, schema, &branch[1..], rep_counts, def, value)
        }
    } else if info.repetition == Repetition::Repeated {
        let index = rep_counts[0];
        let list = expect_list(record, info.name.clone())?;
        while list.len() < index {
            list.push(ParquetValue::Null);
        }
        let value = value.take().unwrap_or(ParquetValue::Null);
        if list.len() == index {
            list.push(value);
        } else {
            list[index] = value;
        }
        Ok(())
    } else {
        record.insert(
            info.name.clone(),
            value.take().unwrap_or(ParquetValue::Null),
        );
        Ok(())
    }
}

fn expect_list(
    record: &mut Row,
    name: std::sync::Arc<str>,
) -> Result<&mut Vec<ParquetValue>> {
    let display = name.clone();
    match record
        .entry(name)
        .or_insert_with(|| ParquetValue::List(Vec::new()))
    {
        ParquetValue::List(items) => Ok(items),
        _ => Err(ParquetError::format(format!(
            "Assembled field '{}' is not a list",
            display
        ))),
    }
}
