use crate::error::{PricingError, PricingResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A percentage on the 0-100 scale, e.g. `Percentage(dec!(0.3))` is 0.3%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(pub Decimal);

impl Percentage {
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);
    pub const HUNDRED: Percentage = Percentage(Decimal::ONE_HUNDRED);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn from_bps(bps: u32) -> Self {
        Self(Decimal::from(bps) / Decimal::ONE_HUNDRED)
    }

    pub fn to_bps(&self) -> u32 {
        (self.0 * Decimal::ONE_HUNDRED).to_u32().unwrap_or(0)
    }

    /// The percentage as a fraction of one.
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Applies the percentage to `amount`.
    pub fn of(&self, amount: Decimal) -> PricingResult<Decimal> {
        amount
            .checked_mul(self.as_fraction())
            .ok_or(PricingError::Overflow)
    }

    /// True when the value lies in `[0, 100)`.
    pub fn is_fee_range(&self) -> bool {
        !self.0.is_sign_negative() && self.0 < Decimal::ONE_HUNDRED
    }
}

impl From<Decimal> for Percentage {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bps_conversion() {
        let p = Percentage::from_bps(30);
        assert_eq!(p.0, dec!(0.3));
        assert_eq!(p.to_bps(), 30);
        assert_eq!(p.as_fraction(), dec!(0.003));
    }

    #[test]
    fn test_of() {
        assert_eq!(Percentage(dec!(2)).of(dec!(10)).unwrap(), dec!(0.2));
        assert!(Percentage(dec!(99.9)).is_fee_range());
        assert!(!Percentage::HUNDRED.is_fee_range());
        assert!(!Percentage(dec!(-1)).is_fee_range());
    }
}
