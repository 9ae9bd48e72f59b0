#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    #[error("timestamp {0} is outside the supported calendar range")]
    TimestampOutOfRange(i64),

    #[error("unknown chart range {0:?}, expected hour, week or month")]
    UnknownRange(String),

    #[error("series would exceed {limit} buckets")]
    TooManyBuckets { limit: usize },

    #[error("chart value {0} cannot be represented as a number")]
    UnrepresentableValue(String),
}
