//! Time-bucketed price and volume series for charting.
//!
//! Samples are grouped into UTC calendar buckets, each bucket keeps its most
//! recent sample, and empty buckets between known ones repeat the last value.

pub mod builder;
pub mod error;
pub mod range;
pub mod series;

pub use builder::{ChartSeriesBuilder, MAX_CHART_POINTS};
pub use error::ChartError;
pub use range::ChartRange;
pub use series::{ChartPoint, ChartSample, ChartSeries};
