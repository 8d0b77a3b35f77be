use bytes::Bytes;
use indexmap::IndexMap;
use std::sync::Arc;

/// A record as written to or assembled from a file: field name to value,
/// in declaration order. Absent optional fields may be omitted or set to
/// [`ParquetValue::Null`]; assembled records omit them.
pub type Row = IndexMap<Arc<str>, ParquetValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParquetValue {
    // Numeric types
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Int96(i128),
    Float32(ordered_float::OrderedFloat<f32>),
    Float64(ordered_float::OrderedFloat<f64>),

    // Basic types
    String(Arc<str>),
    Bytes(Bytes),

    // Date/Time types
    Date32(i32), // Days since epoch
    TimestampMillis(i64),
    TimestampMicros(i64),
    TimeMillis(i32), // Time of day in milliseconds since midnight
    TimeMicros(i64), // Time of day in microseconds since midnight

    // Complex types
    List(Vec<ParquetValue>),
    Record(IndexMap<Arc<str>, ParquetValue>), // Preserves field order

    // Null value
    Null,
}

impl std::hash::Hash for ParquetValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ParquetValue::Boolean(b) => b.hash(state),
            ParquetValue::Int32(i) => i.hash(state),
            ParquetValue::Int64(i) => i.hash(state),
            ParquetValue::Int96(i) => i.hash(state),
            ParquetValue::Float32(f) => f.hash(state),
            ParquetValue::Float64(f) => f.hash(state),
            ParquetValue::String(s) => s.hash(state),
            ParquetValue::Bytes(b) => b.hash(state),
            ParquetValue::Date32(d) => d.hash(state),
            ParquetValue::TimestampMillis(ts) => ts.hash(state),
            ParquetValue::TimestampMicros(ts) => ts.hash(state),
            ParquetValue::TimeMillis(t) => t.hash(state),
            ParquetValue::TimeMicros(t) => t.hash(state),
            ParquetValue::List(l) => l.hash(state),
            ParquetValue::Record(r) => {
                // IndexMap preserves insertion order, so hash is deterministic
                for (k, v) in r {
                    k.hash(state);
                    v.hash(state);
                }
            }
            ParquetValue::Null => 0_i32.hash(state),
        }
    }
}

impl ParquetValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, ParquetValue::Null)
    }

    /// Get the type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            ParquetValue::Boolean(_) => "Boolean",
            ParquetValue::Int32(_) => "Int32",
            ParquetValue::Int64(_) => "Int64",
            ParquetValue::Int96(_) => "Int96",
            ParquetValue::Float32(_) => "Float32",
            ParquetValue::Float64(_) => "Float64",
            ParquetValue::String(_) => "String",
            ParquetValue::Bytes(_) => "Bytes",
            ParquetValue::Date32(_) => "Date32",
            ParquetValue::TimestampMillis(_) => "TimestampMillis",
            ParquetValue::TimestampMicros(_) => "TimestampMicros",
            ParquetValue::TimeMillis(_) => "TimeMillis",
            ParquetValue::TimeMicros(_) => "TimeMicros",
            ParquetValue::List(_) => "List",
            ParquetValue::Record(_) => "Record",
            ParquetValue::Null => "Null",
        }
    }
}
