//! Time-dependent weights of liquidity bootstrapping pools.

use crate::enums::SaleState;
use crate::error::{PricingError, PricingResult};
use crate::math::rounding::{INTERNAL_PRECISION, round_down};
use crate::pool::{Sale, Timestamp};
use crate::value_objects::Pair;
use rust_decimal::Decimal;

/// Resolves the `{base, quote}` weights of a sale at any point in time.
///
/// The base weight moves linearly from `initial_weight` at `start` to
/// `final_weight` at `end` and is clamped outside the window. The quote weight
/// is always `100 - base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightCurve {
    sale: Sale,
}

impl WeightCurve {
    /// Validates the sale window.
    pub fn new(sale: Sale) -> PricingResult<Self> {
        if sale.start > sale.end {
            return Err(PricingError::InconsistentSaleWindow(
                "sale must not end before it starts",
            ));
        }
        let in_range = |w: Decimal| !w.is_sign_negative() && w <= Decimal::ONE_HUNDRED;
        if !in_range(sale.initial_weight) || !in_range(sale.final_weight) {
            return Err(PricingError::InconsistentSaleWindow(
                "weights must be within [0, 100]",
            ));
        }
        Ok(Self { sale })
    }

    /// Base weight at `at`, in percent.
    pub fn base_weight_at(&self, at: Timestamp) -> Decimal {
        let Sale {
            start,
            end,
            initial_weight,
            final_weight,
        } = self.sale;

        if at <= start {
            return initial_weight;
        }
        if at >= end {
            return final_weight;
        }

        // start < at < end, so the duration is non-zero here. Differences of
        // two i64 values always fit in i128 and in a Decimal mantissa.
        let span = |from: Timestamp, to: Timestamp| {
            Decimal::from_i128_with_scale(i128::from(to) - i128::from(from), 0)
        };
        let elapsed = span(start, at);
        let duration = span(start, end);
        let w = initial_weight + (final_weight - initial_weight) * elapsed / duration;
        round_down(w, INTERNAL_PRECISION)
    }

    /// `{base, quote}` weights at `at`, summing to exactly 100.
    pub fn weights_at(&self, at: Timestamp) -> Pair<Decimal> {
        let base = self.base_weight_at(at);
        Pair::new(base, Decimal::ONE_HUNDRED - base)
    }

    pub fn state_at(&self, at: Timestamp) -> SaleState {
        self.sale.state(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn curve(start: i64, end: i64, initial: Decimal, fin: Decimal) -> WeightCurve {
        WeightCurve::new(Sale {
            start,
            end,
            initial_weight: initial,
            final_weight: fin,
        })
        .unwrap()
    }

    #[test]
    fn test_boundaries() {
        let c = curve(1_000, 5_000, dec!(80), dec!(20));

        assert_eq!(c.weights_at(1_000), Pair::new(dec!(80), dec!(20)));
        assert_eq!(c.weights_at(5_000), Pair::new(dec!(20), dec!(80)));

        // Clamped outside the window
        assert_eq!(c.weights_at(0), Pair::new(dec!(80), dec!(20)));
        assert_eq!(c.weights_at(9_000), Pair::new(dec!(20), dec!(80)));
    }

    #[test]
    fn test_linear_interpolation() {
        let c = curve(0, 100, dec!(90), dec!(50));
        assert_eq!(c.base_weight_at(25), dec!(80));
        assert_eq!(c.base_weight_at(50), dec!(70));
        assert_eq!(c.weights_at(75), Pair::new(dec!(60), dec!(40)));
    }

    #[test]
    fn test_increasing_weight() {
        let c = curve(0, 10, dec!(10), dec!(60));
        assert_eq!(c.base_weight_at(5), dec!(35));
    }

    #[test]
    fn test_zero_length_window() {
        let c = curve(500, 500, dec!(90), dec!(10));
        assert_eq!(c.base_weight_at(499), dec!(90));
        assert_eq!(c.base_weight_at(500), dec!(90));
        assert_eq!(c.base_weight_at(501), dec!(10));
    }

    #[test]
    fn test_extreme_window() {
        let c = curve(-10, i64::MAX, dec!(90), dec!(10));

        let late = c.weights_at(i64::MAX - 1);
        assert_eq!(late.base, dec!(10));
        assert_eq!(late.base + late.quote, dec!(100));

        let early = c.weights_at(-9);
        assert!(early.base <= dec!(90) && early.base > dec!(89.99));
        assert_eq!(early.base + early.quote, dec!(100));

        let wide = curve(i64::MIN, i64::MAX, dec!(0), dec!(100));
        assert_eq!(wide.base_weight_at(-1), dec!(49.999999999999));
    }

    #[test]
    fn test_inconsistent_window() {
        let reversed = Sale {
            start: 10,
            end: 5,
            initial_weight: dec!(50),
            final_weight: dec!(50),
        };
        assert!(matches!(
            WeightCurve::new(reversed),
            Err(PricingError::InconsistentSaleWindow(_))
        ));

        let heavy = Sale {
            start: 0,
            end: 5,
            initial_weight: dec!(100.5),
            final_weight: dec!(50),
        };
        assert!(WeightCurve::new(heavy).is_err());

        let negative = Sale {
            start: 0,
            end: 5,
            initial_weight: dec!(50),
            final_weight: dec!(-1),
        };
        assert!(WeightCurve::new(negative).is_err());
    }

    #[test]
    fn test_state_at() {
        let c = curve(10, 20, dec!(90), dec!(50));
        assert_eq!(c.state_at(9), SaleState::NotStarted);
        assert_eq!(c.state_at(15), SaleState::Ongoing);
        assert_eq!(c.state_at(20), SaleState::Ended);
    }

    proptest! {
        #[test]
        fn prop_weights_sum_to_hundred(
            start in 0i64..1_000_000,
            duration in 0i64..1_000_000,
            initial in 0u32..=10_000,
            fin in 0u32..=10_000,
            at in -10_000i64..3_000_000,
        ) {
            let c = curve(
                start,
                start + duration,
                Decimal::new(initial.into(), 2),
                Decimal::new(fin.into(), 2),
            );
            let w = c.weights_at(at);
            prop_assert_eq!(w.base + w.quote, Decimal::ONE_HUNDRED);
            prop_assert!(w.base >= Decimal::ZERO && w.base <= Decimal::ONE_HUNDRED);
        }
    }
}
