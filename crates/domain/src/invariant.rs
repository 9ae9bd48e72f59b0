//! One interface over every pool curve.

use crate::enums::Side;
use crate::error::{PricingError, PricingResult};
use crate::math::stable_swap::StableSwap;
use crate::math::weighted_product::{self, WeightedProduct};
use crate::pool::{PoolKind, PoolState, Timestamp};
use crate::value_objects::Pair;
use rust_decimal::Decimal;

/// Swap math of a pool curve, for one trade direction.
pub trait SwapCurve {
    /// Amount of the output asset received for `amount_in`.
    fn amount_out_given_in(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_in: Decimal,
    ) -> PricingResult<Decimal>;

    /// Amount of the input asset required to receive `amount_out`.
    fn amount_in_given_out(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_out: Decimal,
    ) -> PricingResult<Decimal>;

    /// Output units per input unit at the margin.
    fn marginal_rate(&self, reserve_in: Decimal, reserve_out: Decimal) -> PricingResult<Decimal>;
}

impl SwapCurve for WeightedProduct {
    fn amount_out_given_in(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_in: Decimal,
    ) -> PricingResult<Decimal> {
        weighted_product::amount_out_given_in(
            reserve_in,
            reserve_out,
            amount_in,
            self.weight_in,
            self.weight_out,
        )
    }

    fn amount_in_given_out(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_out: Decimal,
    ) -> PricingResult<Decimal> {
        weighted_product::amount_in_given_out(
            reserve_in,
            reserve_out,
            amount_out,
            self.weight_in,
            self.weight_out,
        )
    }

    fn marginal_rate(&self, reserve_in: Decimal, reserve_out: Decimal) -> PricingResult<Decimal> {
        weighted_product::marginal_rate(reserve_in, reserve_out, self.weight_in, self.weight_out)
    }
}

impl SwapCurve for StableSwap {
    fn amount_out_given_in(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_in: Decimal,
    ) -> PricingResult<Decimal> {
        StableSwap::amount_out_given_in(self, reserve_in, reserve_out, amount_in)
    }

    fn amount_in_given_out(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_out: Decimal,
    ) -> PricingResult<Decimal> {
        StableSwap::amount_in_given_out(self, reserve_in, reserve_out, amount_out)
    }

    fn marginal_rate(&self, reserve_in: Decimal, reserve_out: Decimal) -> PricingResult<Decimal> {
        StableSwap::marginal_rate(self, reserve_in, reserve_out)
    }
}

/// The curve of a concrete pool, resolved for one trade direction.
///
/// Built from a [`PoolState`] so callers never branch on the pool kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantCalculator {
    WeightedProduct(WeightedProduct),
    StableSwap(StableSwap),
}

impl InvariantCalculator {
    /// Resolves the curve of `pool` at `at` for trades that supply `side_in`.
    pub fn for_pool(pool: &PoolState, side_in: Side, at: Timestamp) -> PricingResult<Self> {
        match (pool.kind, pool.weights_at(at)?) {
            (PoolKind::StableSwap { amplification }, _) => {
                Ok(Self::StableSwap(StableSwap::new(amplification)))
            }
            (_, Some(weights)) => Ok(Self::WeightedProduct(WeightedProduct::new(
                *weights.get(side_in),
                *weights.get(side_in.opposite()),
            ))),
            (_, None) => Err(PricingError::DegeneratePool("pool has no weights")),
        }
    }

    /// Amount of `side_in.opposite()` received for `amount_in` of `side_in`.
    pub fn out_given_in_for(
        &self,
        reserves: &Pair<Decimal>,
        side_in: Side,
        amount_in: Decimal,
    ) -> PricingResult<Decimal> {
        self.amount_out_given_in(
            *reserves.get(side_in),
            *reserves.get(side_in.opposite()),
            amount_in,
        )
    }

    /// Amount of `side_in` required to receive `amount_out` of the other side.
    pub fn in_given_out_for(
        &self,
        reserves: &Pair<Decimal>,
        side_in: Side,
        amount_out: Decimal,
    ) -> PricingResult<Decimal> {
        self.amount_in_given_out(
            *reserves.get(side_in),
            *reserves.get(side_in.opposite()),
            amount_out,
        )
    }

    fn curve(&self) -> &dyn SwapCurve {
        match self {
            Self::WeightedProduct(c) => c,
            Self::StableSwap(c) => c,
        }
    }
}

impl SwapCurve for InvariantCalculator {
    fn amount_out_given_in(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_in: Decimal,
    ) -> PricingResult<Decimal> {
        self.curve()
            .amount_out_given_in(reserve_in, reserve_out, amount_in)
    }

    fn amount_in_given_out(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_out: Decimal,
    ) -> PricingResult<Decimal> {
        self.curve()
            .amount_in_given_out(reserve_in, reserve_out, amount_out)
    }

    fn marginal_rate(&self, reserve_in: Decimal, reserve_out: Decimal) -> PricingResult<Decimal> {
        self.curve().marginal_rate(reserve_in, reserve_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::spot_price::SpotPriceCalculator;
    use crate::pool::{FeeConfig, PoolId, Sale};
    use rust_decimal_macros::dec;

    fn pool(kind: PoolKind) -> PoolState {
        PoolState {
            pool_id: PoolId(1),
            kind,
            pair: Pair::new(2, 1),
            reserves: Pair::new(dec!(1000), dec!(2000)),
            fees: FeeConfig::default(),
        }
    }

    #[test]
    fn test_for_pool_constant_product() {
        let p = pool(PoolKind::ConstantProduct);
        let calc = InvariantCalculator::for_pool(&p, Side::Base, 0).unwrap();
        assert_eq!(
            calc,
            InvariantCalculator::WeightedProduct(WeightedProduct::constant_product())
        );

        // (1000 + 1000) * (2000 - out) = 1000 * 2000 => out = 1000
        let out = calc
            .out_given_in_for(&p.reserves, Side::Base, dec!(1000))
            .unwrap();
        assert_eq!(out, dec!(1000));
    }

    #[test]
    fn test_for_pool_lbp_orients_weights() {
        let p = pool(PoolKind::LiquidityBootstrapping {
            sale: Sale {
                start: 0,
                end: 100,
                initial_weight: dec!(80),
                final_weight: dec!(40),
            },
        });
        let buy = InvariantCalculator::for_pool(&p, Side::Quote, 50).unwrap();
        assert_eq!(
            buy,
            InvariantCalculator::WeightedProduct(WeightedProduct::new(dec!(40), dec!(60)))
        );
        let sell = InvariantCalculator::for_pool(&p, Side::Base, 50).unwrap();
        assert_eq!(
            sell,
            InvariantCalculator::WeightedProduct(WeightedProduct::new(dec!(60), dec!(40)))
        );
    }

    #[test]
    fn test_lbp_at_full_weight_is_degenerate() {
        let p = pool(PoolKind::LiquidityBootstrapping {
            sale: Sale {
                start: 0,
                end: 100,
                initial_weight: dec!(100),
                final_weight: dec!(50),
            },
        });
        // Before the sale the weights are 100/0 in both directions.
        for side_in in [Side::Base, Side::Quote] {
            let calc = InvariantCalculator::for_pool(&p, side_in, 0).unwrap();
            assert!(matches!(
                calc.out_given_in_for(&p.reserves, side_in, dec!(10)),
                Err(PricingError::DegeneratePool(_))
            ));
            assert!(matches!(
                calc.in_given_out_for(&p.reserves, side_in, dec!(10)),
                Err(PricingError::DegeneratePool(_))
            ));
        }
        assert!(matches!(
            SpotPriceCalculator::for_pool(&p, 0),
            Err(PricingError::DegeneratePool(_))
        ));

        // Halfway through, both weights are positive again.
        let calc = InvariantCalculator::for_pool(&p, Side::Quote, 50).unwrap();
        assert!(calc.out_given_in_for(&p.reserves, Side::Quote, dec!(10)).is_ok());
        assert!(SpotPriceCalculator::for_pool(&p, 50).is_ok());
    }

    #[test]
    fn test_for_pool_stable_swap() {
        let p = pool(PoolKind::StableSwap { amplification: 20 });
        let calc = InvariantCalculator::for_pool(&p, Side::Quote, 0).unwrap();
        assert_eq!(calc, InvariantCalculator::StableSwap(StableSwap::new(20)));

        let amount_in = calc
            .in_given_out_for(&p.reserves, Side::Quote, dec!(10))
            .unwrap();
        // Quote is abundant, so more than 10 quote is needed for 10 base.
        assert!(amount_in > dec!(10));
    }

    #[test]
    fn test_drain_rejected_through_dispatch() {
        let p = pool(PoolKind::ConstantProduct);
        let calc = InvariantCalculator::for_pool(&p, Side::Quote, 0).unwrap();
        assert!(matches!(
            calc.in_given_out_for(&p.reserves, Side::Quote, dec!(1000)),
            Err(PricingError::InsufficientLiquidity { .. })
        ));
    }
}
