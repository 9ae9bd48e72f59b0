//! Marginal exchange rate of a pool, before slippage and fees.

use crate::enums::Side;
use crate::error::{PricingError, PricingResult};
use crate::invariant::{InvariantCalculator, SwapCurve};
use crate::pool::{PoolState, Timestamp};
use crate::value_objects::{Pair, Price};
use rust_decimal::Decimal;

/// Spot price of base in quote from reserves and percentage weights.
///
/// `(quote_reserve / quote_weight) / (base_reserve / base_weight)`; at 50/50
/// this reduces to `quote_reserve / base_reserve`.
pub fn spot_price(reserves: &Pair<Decimal>, weights: &Pair<Decimal>) -> PricingResult<Price> {
    if weights.base <= Decimal::ZERO || weights.quote <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("weights must be positive"));
    }
    if reserves.base <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("base reserve must be positive"));
    }
    let base_weight = weights.base / Decimal::ONE_HUNDRED;
    let quote_weight = weights.quote / Decimal::ONE_HUNDRED;

    let numerator = reserves
        .quote
        .checked_div(quote_weight)
        .ok_or(PricingError::Overflow)?;
    let denominator = reserves
        .base
        .checked_div(base_weight)
        .ok_or(PricingError::Overflow)?;
    let value = numerator
        .checked_div(denominator)
        .ok_or(PricingError::Overflow)?;
    Ok(Price::new(value))
}

/// Spot prices of pools of any kind.
pub struct SpotPriceCalculator;

impl SpotPriceCalculator {
    /// Price of one base unit in quote units at `at`.
    pub fn for_pool(pool: &PoolState, at: Timestamp) -> PricingResult<Price> {
        match pool.weights_at(at)? {
            Some(weights) => spot_price(&pool.reserves, &weights),
            None => {
                let curve = InvariantCalculator::for_pool(pool, Side::Base, at)?;
                let rate = curve.marginal_rate(pool.reserves.base, pool.reserves.quote)?;
                Ok(Price::new(rate))
            }
        }
    }

    /// Price of one unit of `side` expressed in the other side's units.
    pub fn price_of(pool: &PoolState, side: Side, at: Timestamp) -> PricingResult<Price> {
        let base_in_quote = Self::for_pool(pool, at)?;
        match side {
            Side::Base => Ok(base_in_quote),
            Side::Quote => base_in_quote.invert(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{FeeConfig, PoolId, PoolKind, Sale};
    use rust_decimal_macros::dec;

    #[test]
    fn test_constant_product_spot_price() {
        let price = spot_price(
            &Pair::new(dec!(2000), dec!(1000)),
            &Pair::new(dec!(50), dec!(50)),
        )
        .unwrap();
        assert_eq!(price.value, dec!(0.5));
    }

    #[test]
    fn test_weighted_spot_price() {
        // (1000 / 0.2) / (100 / 0.8) = 5000 / 125 = 40
        let price = spot_price(
            &Pair::new(dec!(100), dec!(1000)),
            &Pair::new(dec!(80), dec!(20)),
        )
        .unwrap();
        assert_eq!(price.value, dec!(40));
    }

    #[test]
    fn test_degenerate_inputs() {
        let weights = Pair::new(dec!(50), dec!(50));
        assert!(matches!(
            spot_price(&Pair::new(Decimal::ZERO, dec!(10)), &weights),
            Err(PricingError::DegeneratePool(_))
        ));
        assert!(matches!(
            spot_price(&Pair::new(dec!(10), dec!(10)), &Pair::new(dec!(100), Decimal::ZERO)),
            Err(PricingError::DegeneratePool(_))
        ));
        // An empty quote side simply prices base at zero.
        assert_eq!(
            spot_price(&Pair::new(dec!(10), Decimal::ZERO), &weights)
                .unwrap()
                .value,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_for_pool_is_idempotent_and_time_aware() {
        let pool = PoolState {
            pool_id: PoolId(7),
            kind: PoolKind::LiquidityBootstrapping {
                sale: Sale {
                    start: 0,
                    end: 1_000,
                    initial_weight: dec!(80),
                    final_weight: dec!(20),
                },
            },
            pair: Pair::new(2, 1),
            reserves: Pair::new(dec!(100), dec!(1000)),
            fees: FeeConfig::default(),
        };

        let first = SpotPriceCalculator::for_pool(&pool, 0).unwrap();
        let second = SpotPriceCalculator::for_pool(&pool, 0).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.value, dec!(40));

        // Base weight falls over the sale, and so does its price.
        let later = SpotPriceCalculator::for_pool(&pool, 1_000).unwrap();
        assert_eq!(later.value, dec!(2.5));

        let quote_price = SpotPriceCalculator::price_of(&pool, Side::Quote, 0).unwrap();
        assert_eq!(quote_price.value, dec!(0.025));
    }

    #[test]
    fn test_stable_swap_spot_price() {
        let pool = PoolState {
            pool_id: PoolId(8),
            kind: PoolKind::StableSwap { amplification: 100 },
            pair: Pair::new(2, 1),
            reserves: Pair::new(dec!(1000), dec!(1000)),
            fees: FeeConfig::default(),
        };
        let price = SpotPriceCalculator::for_pool(&pool, 0).unwrap();
        assert!((price.value - Decimal::ONE).abs() < dec!(0.000001));
    }
}
