use bytes::Bytes;
use parquet_native::*;

use test_helpers::*;

fn id_schema() -> Schema {
    schema_of(vec![primitive(
        "id",
        Repetition::Required,
        LogicalType::Int64,
    )])
}

#[test]
fn test_missing_required_field() {
    let mut writer = Writer::new(Vec::new(), id_schema()).unwrap();
    let err = writer.write_row(row(vec![])).unwrap_err();
    assert!(matches!(err, ParquetError::DataValidation(_)));
    assert!(err.to_string().contains("id"));
}

#[test]
fn test_wrong_value_type() {
    let mut writer = Writer::new(Vec::new(), id_schema()).unwrap();
    let err = writer
        .write_row(row(vec![("id", ParquetValue::Boolean(true))]))
        .unwrap_err();
    assert!(matches!(err, ParquetError::Conversion(_)));
}

#[test]
fn test_null_for_required_field() {
    let mut writer = Writer::new(Vec::new(), id_schema()).unwrap();
    let err = writer
        .write_row(row(vec![("id", ParquetValue::Null)]))
        .unwrap_err();
    assert!(matches!(err, ParquetError::DataValidation(_)));
}

#[test]
fn test_too_many_values_for_scalar_field() {
    let mut writer = Writer::new(Vec::new(), id_schema()).unwrap();
    let err = writer
        .write_row(row(vec![(
            "id",
            ParquetValue::List(vec![ParquetValue::Int64(1), ParquetValue::Int64(2)]),
        )]))
        .unwrap_err();
    assert!(matches!(err, ParquetError::DataValidation(_)));
}

#[test]
fn test_open_rejects_non_parquet_bytes() {
    let err = Reader::open(Bytes::from_static(b"definitely not a parquet file")).unwrap_err();
    assert!(matches!(err, ParquetError::Format(_)));
}

#[test]
fn test_open_rejects_truncated_file() {
    let bytes = write_file(
        WriterBuilder::new(),
        id_schema(),
        vec![row(vec![("id", ParquetValue::Int64(1))])],
    );

    // Losing the tail magic must fail.
    let truncated = bytes.slice(0..bytes.len() - 2);
    assert!(Reader::open(truncated).is_err());

    // Losing part of the footer must fail too.
    let truncated = bytes.slice(0..bytes.len() - 12);
    assert!(Reader::open(truncated).is_err());
}

#[test]
fn test_corrupted_footer_fails() {
    let bytes = write_file(
        WriterBuilder::new(),
        id_schema(),
        vec![row(vec![("id", ParquetValue::Int64(1))])],
    );
    let mut corrupted = bytes.to_vec();
    // Scribble over the footer while keeping the envelope intact.
    let footer_start = corrupted.len() - 30;
    for byte in &mut corrupted[footer_start..footer_start + 8] {
        *byte = 0xFF;
    }
    assert!(Reader::open(Bytes::from(corrupted)).is_err());
}

#[test]
fn test_footer_length_beyond_file_fails() {
    let bytes = write_file(
        WriterBuilder::new(),
        id_schema(),
        vec![row(vec![("id", ParquetValue::Int64(1))])],
    );
    let mut corrupted = bytes.to_vec();
    let len_pos = corrupted.len() - 8;
    corrupted[len_pos..len_pos + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    let err = Reader::open(Bytes::from(corrupted)).unwrap_err();
    assert!(err.to_string().contains("Footer length"));
}

#[test]
fn test_unknown_schema_field_lookup() {
    let schema = id_schema();
    assert!(matches!(
        schema.find_column("missing"),
        Err(ParquetError::Schema(_))
    ));
}

#[test]
fn test_group_declared_as_leaf_value() {
    let schema = schema_of(vec![group(
        "meta",
        Repetition::Optional,
        vec![primitive("k", Repetition::Required, LogicalType::Utf8)],
    )]);

    let mut writer = Writer::new(Vec::new(), schema).unwrap();
    let err = writer
        .write_row(row(vec![("meta", string("not a record"))]))
        .unwrap_err();
    assert!(matches!(err, ParquetError::DataValidation(_)));
}

#[test]
fn test_errors_surface_through_cursor() {
    // A value stream that lies about its chunk length surfaces as a stream
    // error instead of a silent truncation.
    let bytes = write_file(
        WriterBuilder::new(),
        id_schema(),
        (0..10)
            .map(|i| row(vec![("id", ParquetValue::Int64(i))]))
            .collect(),
    );

    let reader = Reader::open(bytes.clone()).unwrap();
    let chunk_offset = reader.metadata().row_groups[0].columns[0]
        .meta_data
        .as_ref()
        .unwrap()
        .data_page_offset as usize;

    let mut corrupted = bytes.to_vec();
    // Break the page header so decoding fails mid-stream.
    corrupted[chunk_offset] = 0xFF;
    corrupted[chunk_offset + 1] = 0xFF;

    let reader = Reader::open(Bytes::from(corrupted)).unwrap();
    let results: Vec<_> = reader.read_rows().unwrap().collect();
    assert!(results.iter().any(|r| r.is_err()));
}
