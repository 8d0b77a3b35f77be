//! Shared helpers for unit tests.

use std::sync::Arc;

use crate::basic::Repetition;
use crate::schema::{LogicalType, Schema, SchemaNode};
use crate::value::{ParquetValue, Row};

pub fn string(s: &str) -> ParquetValue {
    ParquetValue::String(Arc::from(s))
}

pub fn record(entries: Vec<(&str, ParquetValue)>) -> ParquetValue {
    ParquetValue::Record(
        entries
            .into_iter()
            .map(|(k, v)| (Arc::from(k), v))
            .collect(),
    )
}

pub fn row(entries: Vec<(&str, ParquetValue)>) -> Row {
    entries
        .into_iter()
        .map(|(k, v)| (Arc::<str>::from(k), v))
        .collect()
}

/// Schema with a single leaf named `v`.
pub fn single_column(logical_type: LogicalType, repetition: Repetition) -> Schema {
    Schema::new(SchemaNode::Group {
        name: "root".to_string(),
        repetition: Repetition::Required,
        fields: vec![SchemaNode::Primitive {
            name: "v".to_string(),
            repetition,
            logical_type,
            compression: None,
        }],
    })
    .unwrap()
}

/// A nesting exercise: required name, optional quantity, and a repeated
/// `stock` group with a repeated leaf inside it.
pub fn nested_schema() -> Schema {
    Schema::new(SchemaNode::Group {
        name: "root".to_string(),
        repetition: Repetition::Required,
        fields: vec![
            SchemaNode::Primitive {
                name: "name".to_string(),
                repetition: Repetition::Required,
                logical_type: LogicalType::Utf8,
                compression: None,
            },
            SchemaNode::Primitive {
                name: "quantity".to_string(),
                repetition: Repetition::Optional,
                logical_type: LogicalType::Int64,
                compression: None,
            },
            SchemaNode::Group {
                name: "stock".to_string(),
                repetition: Repetition::Repeated,
                fields: vec![
                    SchemaNode::Primitive {
                        name: "quantity".to_string(),
                        repetition: Repetition::Repeated,
                        logical_type: LogicalType::Int64,
                        compression: None,
                    },
                    SchemaNode::Primitive {
                        name: "warehouse".to_string(),
                        repetition: Repetition::Required,
                        logical_type: LogicalType::Utf8,
                        compression: None,
                    },
                ],
            },
        ],
    })
    .unwrap()
}
