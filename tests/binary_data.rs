use bytes::Bytes;
use parquet_native::*;

use test_helpers::*;

#[test]
fn test_two_byte_buffer_roundtrips_bit_identically() {
    let schema = schema_of(vec![primitive(
        "data",
        Repetition::Required,
        LogicalType::ByteArray,
    )]);
    let payload = Bytes::from(vec![(12345 % 256) as u8, (365 % 256) as u8]);
    let rows = vec![row(vec![("data", ParquetValue::Bytes(payload.clone()))])];

    for v2 in [false, true] {
        let read = roundtrip(
            WriterBuilder::new().with_data_page_v2(v2),
            schema.clone(),
            rows.clone(),
        );
        assert_eq!(read[0].get("data"), Some(&ParquetValue::Bytes(payload.clone())));
    }
}

#[test]
fn test_binary_payload_shapes() {
    let schema = schema_of(vec![
        primitive("id", Repetition::Required, LogicalType::Int32),
        primitive("data", Repetition::Required, LogicalType::ByteArray),
    ]);

    let rows = vec![
        row(vec![
            ("id", ParquetValue::Int32(1)),
            ("data", ParquetValue::Bytes(Bytes::new())),
        ]),
        row(vec![
            ("id", ParquetValue::Int32(2)),
            ("data", ParquetValue::Bytes(Bytes::from_static(&[0, 0, 0, 0]))),
        ]),
        row(vec![
            ("id", ParquetValue::Int32(3)),
            (
                "data",
                ParquetValue::Bytes(Bytes::from((0u8..=255).collect::<Vec<u8>>())),
            ),
        ]),
    ];

    let read = roundtrip(WriterBuilder::new(), schema, rows.clone());
    assert_eq!(read, rows);
}

#[test]
fn test_typed_numeric_array_input_is_not_supported() {
    let schema = schema_of(vec![primitive(
        "data",
        Repetition::Required,
        LogicalType::ByteArray,
    )]);

    let typed_inputs = vec![
        ParquetValue::List(vec![ParquetValue::Int32(1), ParquetValue::Int32(2)]),
        ParquetValue::List(vec![ParquetValue::Int64(70000)]),
        ParquetValue::List(vec![
            ParquetValue::Float32(1.5.into()),
            ParquetValue::Float32(2.5.into()),
        ]),
        ParquetValue::List(vec![ParquetValue::Float64(0.25.into())]),
    ];

    for input in typed_inputs {
        let mut buffer = Vec::new();
        let mut writer = Writer::new(&mut buffer, schema.clone()).unwrap();
        let err = writer
            .write_row(row(vec![("data", input.clone())]))
            .unwrap_err();
        assert!(
            err.to_string().contains("is not supported"),
            "input {:?} produced: {}",
            input,
            err
        );
    }
}

#[test]
fn test_string_input_for_byte_array_column() {
    let schema = schema_of(vec![primitive(
        "data",
        Repetition::Required,
        LogicalType::ByteArray,
    )]);
    let rows = vec![row(vec![("data", string("plain text"))])];

    let read = roundtrip(WriterBuilder::new(), schema, rows);
    // Raw BYTE_ARRAY surfaces as bytes regardless of input shape.
    assert_eq!(
        read[0].get("data"),
        Some(&ParquetValue::Bytes(Bytes::from_static(b"plain text")))
    );
}

#[test]
fn test_fixed_len_byte_array_roundtrip_and_validation() {
    let schema = schema_of(vec![primitive(
        "finger",
        Repetition::Required,
        LogicalType::FixedLenByteArray(5),
    )]);

    let rows = vec![row(vec![(
        "finger",
        ParquetValue::Bytes(Bytes::from_static(b"abcde")),
    )])];
    let read = roundtrip(WriterBuilder::new(), schema.clone(), rows.clone());
    assert_eq!(read, rows);

    let mut buffer = Vec::new();
    let mut writer = Writer::new(&mut buffer, schema).unwrap();
    let err = writer
        .write_row(row(vec![(
            "finger",
            ParquetValue::Bytes(Bytes::from_static(b"toolongvalue")),
        )]))
        .unwrap_err();
    assert!(matches!(err, ParquetError::DataValidation(_)));
}

#[test]
fn test_large_binary_values_span_pages() {
    let schema = schema_of(vec![primitive(
        "data",
        Repetition::Required,
        LogicalType::ByteArray,
    )]);
    let rows: Vec<Row> = (0..64)
        .map(|i| {
            row(vec![(
                "data",
                ParquetValue::Bytes(Bytes::from(vec![i as u8; 1024])),
            )])
        })
        .collect();

    let read = roundtrip(
        WriterBuilder::new().with_page_size(4096),
        schema,
        rows.clone(),
    );
    assert_eq!(read, rows);
}
