use crate::error::{PricingError, PricingResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Exchange rate of one base unit expressed in quote units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// One quote unit expressed in base units.
    pub fn invert(&self) -> PricingResult<Self> {
        if self.value <= Decimal::ZERO {
            return Err(PricingError::DegeneratePool("price must be positive"));
        }
        Ok(Self {
            value: Decimal::ONE / self.value,
        })
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self::new(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invert() {
        assert_eq!(Price::new(dec!(2)).invert().unwrap().value, dec!(0.5));
        assert!(Price::new(Decimal::ZERO).invert().is_err());
    }
}
