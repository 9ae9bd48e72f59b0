use crate::error::ChartError;
use crate::range::ChartRange;
use crate::series::{ChartPoint, ChartSample, ChartSeries};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{trace, warn};

/// Upper bound on the number of buckets in one series, filled ones included.
pub const MAX_CHART_POINTS: usize = 100_000;

/// Groups samples into calendar buckets and fills the gaps between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSeriesBuilder {
    range: ChartRange,
    window_ms: Option<i64>,
}

impl ChartSeriesBuilder {
    pub fn new(range: ChartRange) -> Self {
        Self {
            range,
            window_ms: None,
        }
    }

    /// Only keep samples newer than `latest - window_ms`.
    #[must_use]
    pub fn with_window(mut self, window_ms: i64) -> Self {
        self.window_ms = Some(window_ms);
        self
    }

    /// Builds an ascending, gap-free series from `samples` in any order.
    ///
    /// A bucket takes the value of its latest sample lying strictly between
    /// the bucket's start and the next bucket's start; a bucket whose only
    /// samples sit on its start gets zero. Buckets absent from the input but
    /// enclosed by present ones repeat the preceding bucket's value.
    pub fn build(&self, samples: &[ChartSample]) -> Result<ChartSeries, ChartError> {
        let mut samples = samples.to_vec();
        if let (Some(window), Some(latest)) =
            (self.window_ms, samples.iter().map(|s| s.timestamp).max())
        {
            let cutoff = latest.saturating_sub(window);
            samples.retain(|s| s.timestamp > cutoff);
        }
        samples.sort_by_key(|s| s.timestamp);

        // Ties on the timestamp keep input order, so the later entry wins.
        let mut buckets: BTreeMap<i64, Decimal> = BTreeMap::new();
        for sample in &samples {
            let start = self.range.bucket_start(sample.timestamp)?;
            let slot = buckets.entry(start).or_insert(Decimal::ZERO);
            if sample.timestamp > start {
                *slot = sample.value;
            }
        }

        let mut points = Vec::with_capacity(buckets.len());
        let mut previous: Option<ChartPoint> = None;
        for (&start, &value) in &buckets {
            if let Some(prev) = previous {
                let mut fill = self.range.next_bucket_start(prev.bucket_start)?;
                while fill < start {
                    if points.len() >= MAX_CHART_POINTS {
                        warn!(
                            range = %self.range,
                            from = prev.bucket_start,
                            to = start,
                            "Chart gap too wide to fill"
                        );
                        return Err(ChartError::TooManyBuckets {
                            limit: MAX_CHART_POINTS,
                        });
                    }
                    trace!(bucket = fill, "Forward-filling empty bucket");
                    points.push(ChartPoint::new(fill, prev.value));
                    fill = self.range.next_bucket_start(fill)?;
                }
            }
            let point = ChartPoint::new(start, value);
            points.push(point);
            previous = Some(point);
        }

        Ok(ChartSeries::new(self.range, points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HOUR: i64 = 3_600_000;
    const DAY: i64 = 24 * HOUR;
    // 2023-11-14T22:00:00Z
    const H0: i64 = 1_700_000_000_000 - 1_700_000_000_000 % HOUR;

    fn sample(timestamp: i64, value: Decimal) -> ChartSample {
        ChartSample::new(timestamp, value)
    }

    #[test]
    fn test_single_sample() {
        let t0 = 1_700_000_123_456;
        let series = ChartSeriesBuilder::new(ChartRange::Hour)
            .build(&[sample(t0, dec!(100))])
            .unwrap();
        assert_eq!(series.points(), &[ChartPoint::new(1_699_999_200_000, dec!(100))]);
    }

    #[test]
    fn test_empty_input() {
        let series = ChartSeriesBuilder::new(ChartRange::Week).build(&[]).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_latest_sample_wins() {
        let series = ChartSeriesBuilder::new(ChartRange::Hour)
            .build(&[
                sample(H0 + 50 * 60_000, dec!(2)),
                sample(H0 + 10 * 60_000, dec!(1)),
            ])
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].value, dec!(2));
    }

    #[test]
    fn test_forward_fill() {
        let series = ChartSeriesBuilder::new(ChartRange::Hour)
            .build(&[
                sample(H0 + 3 * HOUR + 5 * 60_000, dec!(8)),
                sample(H0 + 10 * 60_000, dec!(5)),
            ])
            .unwrap();
        let points: Vec<(i64, Decimal)> = series
            .points()
            .iter()
            .map(|p| (p.bucket_start, p.value))
            .collect();
        assert_eq!(
            points,
            vec![
                (H0, dec!(5)),
                (H0 + HOUR, dec!(5)),
                (H0 + 2 * HOUR, dec!(5)),
                (H0 + 3 * HOUR, dec!(8)),
            ]
        );
    }

    #[test]
    fn test_sample_on_boundary_yields_zero() {
        let series = ChartSeriesBuilder::new(ChartRange::Hour)
            .build(&[sample(H0, dec!(7))])
            .unwrap();
        assert_eq!(series.points(), &[ChartPoint::new(H0, Decimal::ZERO)]);

        // A sample inside the bucket still counts.
        let series = ChartSeriesBuilder::new(ChartRange::Hour)
            .build(&[sample(H0, dec!(7)), sample(H0 + 1, dec!(9))])
            .unwrap();
        assert_eq!(series.points()[0].value, dec!(9));
    }

    #[test]
    fn test_month_fill() {
        // 2024-01-10 and 2024-03-10
        let january = 1_704_067_200_000;
        let series = ChartSeriesBuilder::new(ChartRange::Month)
            .build(&[
                sample(january + 9 * DAY, dec!(3)),
                sample(january + (31 + 29 + 9) * DAY, dec!(4)),
            ])
            .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(
            series.points()[1],
            ChartPoint::new(january + 31 * DAY, dec!(3))
        );
        assert_eq!(series.points()[2].bucket_start, january + (31 + 29) * DAY);
    }

    #[test]
    fn test_window() {
        let series = ChartSeriesBuilder::new(ChartRange::Hour)
            .with_window(DAY)
            .build(&[
                sample(H0 + 1, dec!(1)),
                sample(H0 + HOUR + 1, dec!(2)),
                sample(H0 + 30 * HOUR + 1, dec!(3)),
            ])
            .unwrap();
        assert_eq!(series.points(), &[ChartPoint::new(H0 + 30 * HOUR, dec!(3))]);
    }

    #[test]
    fn test_gap_too_wide_to_fill() {
        let result = ChartSeriesBuilder::new(ChartRange::Hour)
            .build(&[sample(1, dec!(1)), sample(H0 + 1, dec!(2))]);
        assert_eq!(
            result,
            Err(ChartError::TooManyBuckets {
                limit: MAX_CHART_POINTS
            })
        );

        // The same gap in months stays well under the limit.
        let series = ChartSeriesBuilder::new(ChartRange::Month)
            .build(&[sample(1, dec!(1)), sample(H0 + 1, dec!(2))])
            .unwrap();
        assert_eq!(series.points().first().map(|p| p.value), Some(dec!(1)));
        assert_eq!(series.points().last().map(|p| p.value), Some(dec!(2)));
    }

    #[test]
    fn test_serialized_shape() {
        let series = ChartSeriesBuilder::new(ChartRange::Hour)
            .build(&[sample(H0 + 1, dec!(1.25))])
            .unwrap();
        assert_eq!(
            serde_json::to_string(&series).unwrap(),
            format!("[[{H0},1.25]]")
        );
        let descending = ChartSeriesBuilder::new(ChartRange::Hour)
            .build(&[sample(H0 + 1, dec!(1)), sample(H0 + HOUR + 1, dec!(2))])
            .unwrap()
            .into_descending();
        assert_eq!(descending[0].bucket_start, H0 + HOUR);
    }
}
