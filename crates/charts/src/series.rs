use crate::error::ChartError;
use crate::range::ChartRange;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::ser::{Error as _, SerializeTuple};
use serde::{Deserialize, Serialize, Serializer};

/// A raw observation: price or volume at a UNIX millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSample {
    pub timestamp: i64,
    pub value: Decimal,
}

impl ChartSample {
    pub fn new(timestamp: i64, value: Decimal) -> Self {
        Self { timestamp, value }
    }
}

impl From<(i64, Decimal)> for ChartSample {
    fn from((timestamp, value): (i64, Decimal)) -> Self {
        Self::new(timestamp, value)
    }
}

/// One bucket of a series, keyed by the bucket's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPoint {
    pub bucket_start: i64,
    pub value: Decimal,
}

impl ChartPoint {
    pub fn new(bucket_start: i64, value: Decimal) -> Self {
        Self {
            bucket_start,
            value,
        }
    }

    /// The value as a float for charting libraries.
    pub fn value_f64(&self) -> Result<f64, ChartError> {
        self.value
            .to_f64()
            .ok_or_else(|| ChartError::UnrepresentableValue(self.value.to_string()))
    }
}

/// Serialised as `[bucket_start, value]` with a numeric value.
impl Serialize for ChartPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.value_f64().map_err(S::Error::custom)?;
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.bucket_start)?;
        tuple.serialize_element(&value)?;
        tuple.end()
    }
}

/// Gap-free series, ascending by bucket start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    range: ChartRange,
    points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub(crate) fn new(range: ChartRange, points: Vec<ChartPoint>) -> Self {
        Self { range, points }
    }

    pub fn range(&self) -> ChartRange {
        self.range
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent bucket first.
    pub fn into_descending(self) -> Vec<ChartPoint> {
        let mut points = self.points;
        points.reverse();
        points
    }
}

impl Serialize for ChartSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}
