use serde::{Deserialize, Serialize};

/// One of the two legs of a pool pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Base,
    Quote,
}

impl Side {
    /// Returns the other leg.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Base => Side::Quote,
            Side::Quote => Side::Base,
        }
    }
}

/// Lifecycle of a liquidity bootstrapping sale relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleState {
    NotStarted,
    Ongoing,
    Ended,
}

/// Where a pool charges its swap fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeSide {
    /// Deducted from the amount the trader supplies.
    Input,
    /// Deducted from the amount the pool pays out.
    Output,
}
