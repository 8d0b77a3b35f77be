//! Per-page and per-chunk statistics.
//!
//! Pages accumulate min/max over non-null primitive values, an exact null
//! count, and a distinct set keyed on the primitive representation. Chunk
//! statistics are the element-wise merge of their pages. Distinct tracking
//! stops once a configurable cap is exceeded; the footer then omits the
//! count instead of reporting a wrong one.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::basic::PhysicalType;
use crate::encoding::plain;
use crate::error::Result;
use crate::format;
use crate::value::ParquetValue;

#[derive(Debug, Clone)]
pub struct StatisticsAccumulator {
    min: Option<ParquetValue>,
    max: Option<ParquetValue>,
    null_count: i64,
    distinct: Option<HashSet<ParquetValue>>,
    distinct_limit: Option<usize>,
}

impl StatisticsAccumulator {
    pub fn new(distinct_limit: Option<usize>) -> Self {
        Self {
            min: None,
            max: None,
            null_count: 0,
            distinct: Some(HashSet::new()),
            distinct_limit,
        }
    }

    /// Record a present (non-null) primitive value.
    pub fn update(&mut self, value: &ParquetValue) {
        match &self.min {
            Some(current) if compare_primitives(value, current) != Ordering::Less => {}
            _ => self.min = Some(value.clone()),
        }
        match &self.max {
            Some(current) if compare_primitives(value, current) != Ordering::Greater => {}
            _ => self.max = Some(value.clone()),
        }
        if let Some(set) = &mut self.distinct {
            set.insert(value.clone());
            if let Some(limit) = self.distinct_limit {
                if set.len() > limit {
                    self.distinct = None;
                }
            }
        }
    }

    /// Record a null slot.
    pub fn update_null(&mut self) {
        self.null_count += 1;
    }

    pub fn null_count(&self) -> i64 {
        self.null_count
    }

    pub fn distinct_count(&self) -> Option<i64> {
        self.distinct.as_ref().map(|s| s.len() as i64)
    }

    pub fn min(&self) -> Option<&ParquetValue> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&ParquetValue> {
        self.max.as_ref()
    }

    /// Fold another accumulator into this one (page -> chunk aggregation).
    pub fn merge(&mut self, other: &StatisticsAccumulator) {
        if let Some(min) = &other.min {
            match &self.min {
                Some(current) if compare_primitives(min, current) != Ordering::Less => {}
                _ => self.min = Some(min.clone()),
            }
        }
        if let Some(max) = &other.max {
            match &self.max {
                Some(current) if compare_primitives(max, current) != Ordering::Greater => {}
                _ => self.max = Some(max.clone()),
            }
        }
        self.null_count += other.null_count;
        match (&mut self.distinct, &other.distinct) {
            (Some(mine), Some(theirs)) => {
                mine.extend(theirs.iter().cloned());
                if let Some(limit) = self.distinct_limit {
                    if mine.len() > limit {
                        self.distinct = None;
                    }
                }
            }
            _ => self.distinct = None,
        }
    }

    /// Footer representation; min/max are single PLAIN values with byte
    /// arrays stored raw (no length prefix).
    pub fn to_format(&self, physical: PhysicalType) -> Result<format::Statistics> {
        Ok(format::Statistics {
            null_count: Some(self.null_count),
            distinct_count: self.distinct_count(),
            min_value: self
                .min
                .as_ref()
                .map(|v| encode_stat_value(v, physical))
                .transpose()?,
            max_value: self
                .max
                .as_ref()
                .map(|v| encode_stat_value(v, physical))
                .transpose()?,
        })
    }
}

fn encode_stat_value(value: &ParquetValue, physical: PhysicalType) -> Result<Vec<u8>> {
    if let ParquetValue::Bytes(b) = value {
        return Ok(b.to_vec());
    }
    let mut buf = Vec::new();
    plain::encode(std::slice::from_ref(value), physical, &mut buf)?;
    Ok(buf)
}

/// Ordering over primitive representations: numeric for numbers, unsigned
/// lexicographic for byte arrays.
pub fn compare_primitives(a: &ParquetValue, b: &ParquetValue) -> Ordering {
    use ParquetValue::*;
    match (a, b) {
        (Boolean(x), Boolean(y)) => x.cmp(y),
        (Int32(x), Int32(y)) => x.cmp(y),
        (Int64(x), Int64(y)) => x.cmp(y),
        (Int96(x), Int96(y)) => x.cmp(y),
        (Float32(x), Float32(y)) => x.cmp(y),
        (Float64(x), Float64(y)) => x.cmp(y),
        (Bytes(x), Bytes(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_min_max_numeric() {
        let mut acc = StatisticsAccumulator::new(None);
        for v in [5i64, -3, 12, 0] {
            acc.update(&ParquetValue::Int64(v));
        }
        assert_eq!(acc.min(), Some(&ParquetValue::Int64(-3)));
        assert_eq!(acc.max(), Some(&ParquetValue::Int64(12)));
        assert_eq!(acc.distinct_count(), Some(4));
    }

    #[test]
    fn test_byte_array_lexicographic() {
        let mut acc = StatisticsAccumulator::new(None);
        for s in ["kiwi", "apples", "oranges", "banana"] {
            acc.update(&ParquetValue::Bytes(Bytes::copy_from_slice(s.as_bytes())));
        }
        assert_eq!(
            acc.min(),
            Some(&ParquetValue::Bytes(Bytes::from_static(b"apples")))
        );
        assert_eq!(
            acc.max(),
            Some(&ParquetValue::Bytes(Bytes::from_static(b"oranges")))
        );
    }

    #[test]
    fn test_null_counting_and_merge() {
        let mut page1 = StatisticsAccumulator::new(None);
        page1.update(&ParquetValue::Int32(1));
        page1.update_null();

        let mut page2 = StatisticsAccumulator::new(None);
        page2.update(&ParquetValue::Int32(9));
        page2.update_null();
        page2.update_null();

        let mut chunk = StatisticsAccumulator::new(None);
        chunk.merge(&page1);
        chunk.merge(&page2);
        assert_eq!(chunk.null_count(), 3);
        assert_eq!(chunk.min(), Some(&ParquetValue::Int32(1)));
        assert_eq!(chunk.max(), Some(&ParquetValue::Int32(9)));
        assert_eq!(chunk.distinct_count(), Some(2));
    }

    #[test]
    fn test_distinct_cap_drops_count() {
        let mut acc = StatisticsAccumulator::new(Some(3));
        for v in 0..10 {
            acc.update(&ParquetValue::Int32(v));
        }
        assert_eq!(acc.distinct_count(), None);
    }

    #[test]
    fn test_stat_value_encoding() {
        let mut acc = StatisticsAccumulator::new(None);
        acc.update(&ParquetValue::Bytes(Bytes::from_static(b"apples")));
        let stats = acc.to_format(PhysicalType::ByteArray).unwrap();
        // Raw bytes, no length prefix.
        assert_eq!(stats.min_value.as_deref(), Some(b"apples".as_slice()));
        assert_eq!(stats.null_count, Some(0));
    }
}
