use bytes::Bytes;
use parquet_native::*;

use test_helpers::*;

#[test]
fn test_all_primitive_types_roundtrip() {
    let schema = schema_of(vec![
        primitive("bool_val", Repetition::Required, LogicalType::Boolean),
        primitive("int32_val", Repetition::Required, LogicalType::Int32),
        primitive("int64_val", Repetition::Required, LogicalType::Int64),
        primitive("int96_val", Repetition::Required, LogicalType::Int96),
        primitive("float_val", Repetition::Required, LogicalType::Float),
        primitive("double_val", Repetition::Required, LogicalType::Double),
        primitive("string_val", Repetition::Required, LogicalType::Utf8),
        primitive("binary_val", Repetition::Required, LogicalType::ByteArray),
        primitive(
            "fixed_val",
            Repetition::Required,
            LogicalType::FixedLenByteArray(4),
        ),
    ]);

    let rows: Vec<Row> = (0..100)
        .map(|i| {
            row(vec![
                ("bool_val", ParquetValue::Boolean(i % 2 == 0)),
                ("int32_val", ParquetValue::Int32(i - 50)),
                ("int64_val", ParquetValue::Int64((i as i64) << 33)),
                ("int96_val", ParquetValue::Int96((i as i128) << 70)),
                ("float_val", ParquetValue::Float32((i as f32 * 0.5).into())),
                ("double_val", ParquetValue::Float64((i as f64 * 1.5).into())),
                ("string_val", string(&format!("row_{}", i))),
                (
                    "binary_val",
                    ParquetValue::Bytes(Bytes::from(vec![i as u8; (i % 7) as usize])),
                ),
                (
                    "fixed_val",
                    ParquetValue::Bytes(Bytes::from(vec![i as u8; 4])),
                ),
            ])
        })
        .collect();

    for v2 in [false, true] {
        let read = roundtrip(
            WriterBuilder::new().with_data_page_v2(v2),
            schema.clone(),
            rows.clone(),
        );
        assert_eq!(read, rows, "data page v2: {}", v2);
    }
}

#[test]
fn test_temporal_types_roundtrip() {
    let schema = schema_of(vec![
        primitive("day", Repetition::Required, LogicalType::Date),
        primitive("ts_ms", Repetition::Required, LogicalType::TimestampMillis),
        primitive("ts_us", Repetition::Required, LogicalType::TimestampMicros),
        primitive("t_ms", Repetition::Required, LogicalType::TimeMillis),
        primitive("t_us", Repetition::Required, LogicalType::TimeMicros),
        primitive("inter", Repetition::Required, LogicalType::Interval),
    ]);

    let rows: Vec<Row> = (0..10)
        .map(|i| {
            row(vec![
                ("day", ParquetValue::Date32(10_957 + i)),
                ("ts_ms", ParquetValue::TimestampMillis(1_230_000_000_000 + i as i64)),
                ("ts_us", ParquetValue::TimestampMicros(1_230_000_000_000_000 + i as i64)),
                ("t_ms", ParquetValue::TimeMillis(36_000_000 + i)),
                ("t_us", ParquetValue::TimeMicros(36_000_000_000 + i as i64)),
                (
                    "inter",
                    record(vec![
                        ("months", ParquetValue::Int32(2)),
                        ("days", ParquetValue::Int32(15)),
                        ("milliseconds", ParquetValue::Int32(i * 100)),
                    ]),
                ),
            ])
        })
        .collect();

    let read = roundtrip(WriterBuilder::new(), schema, rows.clone());
    assert_eq!(read, rows);
}

#[test]
fn test_optional_fields_roundtrip_as_absent_keys() {
    let schema = schema_of(vec![
        primitive("id", Repetition::Required, LogicalType::Int64),
        primitive("note", Repetition::Optional, LogicalType::Utf8),
    ]);

    let rows = vec![
        row(vec![("id", ParquetValue::Int64(1)), ("note", string("x"))]),
        row(vec![("id", ParquetValue::Int64(2))]),
        // An explicit null behaves like an absent key.
        row(vec![
            ("id", ParquetValue::Int64(3)),
            ("note", ParquetValue::Null),
        ]),
    ];

    for v2 in [false, true] {
        let read = roundtrip(
            WriterBuilder::new().with_data_page_v2(v2),
            schema.clone(),
            rows.clone(),
        );
        assert_eq!(read.len(), 3);
        assert_eq!(read[0].get("note"), Some(&string("x")));
        assert!(read[1].get("note").is_none());
        assert!(read[2].get("note").is_none());
    }
}

#[test]
fn test_scalar_for_repeated_leaf_reads_as_singleton_list() {
    let schema = schema_of(vec![primitive(
        "tags",
        Repetition::Repeated,
        LogicalType::Utf8,
    )]);

    let rows = vec![
        row(vec![("tags", string("solo"))]),
        row(vec![(
            "tags",
            ParquetValue::List(vec![string("a"), string("b")]),
        )]),
    ];

    let read = roundtrip(WriterBuilder::new(), schema, rows);
    assert_eq!(
        read[0].get("tags"),
        Some(&ParquetValue::List(vec![string("solo")]))
    );
    assert_eq!(
        read[1].get("tags"),
        Some(&ParquetValue::List(vec![string("a"), string("b")]))
    );
}

#[test]
fn test_multiple_row_groups() {
    let schema = schema_of(vec![primitive(
        "id",
        Repetition::Required,
        LogicalType::Int64,
    )]);
    let rows: Vec<Row> = (0..1000).map(|i| row(vec![("id", ParquetValue::Int64(i))])).collect();

    // 10 bytes per row forces many groups well before 1000 rows.
    let bytes = write_file(
        WriterBuilder::new().with_row_group_size(512),
        schema,
        rows.clone(),
    );
    let reader = Reader::open(bytes).unwrap();
    assert!(reader.metadata().row_groups.len() > 1);
    assert_eq!(reader.row_count(), 1000);

    let read: Vec<Row> = reader
        .read_rows()
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap();
    assert_eq!(read, rows);
}

#[test]
fn test_row_group_value_count_identity() {
    let schema = schema_of(vec![
        primitive("id", Repetition::Required, LogicalType::Int64),
        primitive("note", Repetition::Optional, LogicalType::Utf8),
    ]);
    let rows: Vec<Row> = (0..100)
        .map(|i| {
            if i % 3 == 0 {
                row(vec![("id", ParquetValue::Int64(i))])
            } else {
                row(vec![
                    ("id", ParquetValue::Int64(i)),
                    ("note", string(&format!("n{}", i))),
                ])
            }
        })
        .collect();

    let bytes = write_file(WriterBuilder::new(), schema, rows);
    let reader = Reader::open(bytes).unwrap();

    for group in &reader.metadata().row_groups {
        for chunk in &group.columns {
            let meta = chunk.meta_data.as_ref().unwrap();
            // Every column covers every record of its group.
            assert_eq!(meta.num_values, group.num_rows);
        }
    }
    let note_stats = reader.column_statistics(0, "note").unwrap().unwrap();
    assert_eq!(note_stats.null_count, Some(34));
}

#[test]
fn test_empty_file_roundtrip() {
    let schema = schema_of(vec![primitive(
        "id",
        Repetition::Required,
        LogicalType::Int64,
    )]);

    let bytes = write_file(WriterBuilder::new(), schema, Vec::new());
    let reader = Reader::open(bytes).unwrap();
    assert_eq!(reader.row_count(), 0);
    assert!(reader.metadata().row_groups.is_empty());
    assert_eq!(reader.read_rows().unwrap().count(), 0);
}

#[test]
fn test_file_roundtrip_through_disk() {
    let schema = schema_of(vec![
        primitive("id", Repetition::Required, LogicalType::Int64),
        primitive("name", Repetition::Required, LogicalType::Utf8),
    ]);
    let rows: Vec<Row> = (0..50)
        .map(|i| {
            row(vec![
                ("id", ParquetValue::Int64(i)),
                ("name", string(&format!("name_{}", i))),
            ])
        })
        .collect();

    let bytes = write_file(WriterBuilder::new(), schema, rows.clone());

    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), &bytes).unwrap();

    let reader = Reader::open_file(file.path()).unwrap();
    let read: Vec<Row> = reader
        .read_rows()
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap();
    assert_eq!(read, rows);
}

#[test]
fn test_offsets_are_absolute_and_monotonic() {
    let schema = schema_of(vec![
        primitive("a", Repetition::Required, LogicalType::Int64),
        primitive("b", Repetition::Required, LogicalType::Utf8),
    ]);
    let rows: Vec<Row> = (0..200)
        .map(|i| {
            row(vec![
                ("a", ParquetValue::Int64(i)),
                ("b", string(&format!("value_{}", i))),
            ])
        })
        .collect();

    let bytes = write_file(
        WriterBuilder::new().with_row_group_size(1024),
        schema,
        rows,
    );
    let file_len = bytes.len() as i64;
    let reader = Reader::open(bytes).unwrap();

    let mut previous_end = 4i64;
    for group in &reader.metadata().row_groups {
        for chunk in &group.columns {
            let meta = chunk.meta_data.as_ref().unwrap();
            assert!(meta.data_page_offset >= previous_end);
            previous_end = meta.data_page_offset + meta.total_compressed_size;
            assert!(previous_end < file_len);
        }
    }
}
