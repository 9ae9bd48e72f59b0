//! Full swap simulation against a pool's invariant.
//!
//! Unlike [`crate::quote::QuoteEngine`], the simulator walks the curve, so
//! large trades show their price impact.

use crate::config::EngineConfig;
use amm_engine_domain::enums::{FeeSide, SaleState, Side};
use amm_engine_domain::error::{PricingError, PricingResult};
use amm_engine_domain::invariant::InvariantCalculator;
use amm_engine_domain::math::rounding::{round_down, round_up};
use amm_engine_domain::math::spot_price::SpotPriceCalculator;
use amm_engine_domain::pool::{FeeSplit, PoolState, Timestamp};
use amm_engine_domain::value_objects::{Pair, Price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of a simulated swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapOutcome {
    /// Side the trader pays in.
    pub side_in: Side,
    /// Total paid by the trader, fee included when charged on input.
    pub amount_in: Decimal,
    /// Total received by the trader, fee excluded when charged on output.
    pub amount_out: Decimal,
    pub fee_side: FeeSide,
    /// Fee in units of `fee_side`'s asset.
    pub fee: FeeSplit,
    /// One output unit in input units, before the trade.
    pub spot_price_before: Price,
    /// One output unit in input units, after the trade.
    pub spot_price_after: Price,
    /// `1 - before / after`.
    pub price_impact: Decimal,
    /// Pool balances once the trade and the owner's fee transfer settle.
    pub reserves_after: Pair<Decimal>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwapSimulator {
    config: EngineConfig,
}

impl SwapSimulator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Simulates paying exactly `amount_in` of `side_in` into `pool` at `at`.
    pub fn exact_in(
        &self,
        pool: &PoolState,
        side_in: Side,
        amount_in: Decimal,
        at: Timestamp,
    ) -> PricingResult<SwapOutcome> {
        check_tradable(pool, at)?;
        if amount_in <= Decimal::ZERO {
            return Err(PricingError::InvalidAmount("amount in must be positive"));
        }
        let curve = InvariantCalculator::for_pool(pool, side_in, at)?;
        let fee_side = pool.kind.fee_side();

        let (amount_out, fee) = match fee_side {
            FeeSide::Input => {
                let fee = pool.fees.split(amount_in)?;
                let out = curve.out_given_in_for(&pool.reserves, side_in, amount_in - fee.total)?;
                (out, fee)
            }
            FeeSide::Output => {
                let gross = curve.out_given_in_for(&pool.reserves, side_in, amount_in)?;
                let fee = pool.fees.split(gross)?;
                (gross - fee.total, fee)
            }
        };
        self.settle(pool, side_in, amount_in, amount_out, fee_side, fee, at)
    }

    /// Simulates receiving exactly `amount_out` of the side opposite `side_in`.
    pub fn exact_out(
        &self,
        pool: &PoolState,
        side_in: Side,
        amount_out: Decimal,
        at: Timestamp,
    ) -> PricingResult<SwapOutcome> {
        check_tradable(pool, at)?;
        if amount_out <= Decimal::ZERO {
            return Err(PricingError::InvalidAmount("amount out must be positive"));
        }
        let curve = InvariantCalculator::for_pool(pool, side_in, at)?;
        let fee_side = pool.kind.fee_side();
        let dp = self.config.internal_precision;

        let (amount_in, amount_out, fee) = match fee_side {
            FeeSide::Input => {
                let net_in = curve.in_given_out_for(&pool.reserves, side_in, amount_out)?;
                let gross_in = round_up(pool.fees.gross_up(net_in)?, dp);
                let fee = pool.fees.split(gross_in)?;
                (net_in + fee.total, amount_out, fee)
            }
            FeeSide::Output => {
                // Rounding the gross up keeps the net at or above the request.
                let gross_out = round_up(pool.fees.gross_up(amount_out)?, dp);
                let amount_in = curve.in_given_out_for(&pool.reserves, side_in, gross_out)?;
                let fee = pool.fees.split(gross_out)?;
                (amount_in, gross_out - fee.total, fee)
            }
        };
        self.settle(pool, side_in, amount_in, amount_out, fee_side, fee, at)
    }

    #[allow(clippy::too_many_arguments)]
    fn settle(
        &self,
        pool: &PoolState,
        side_in: Side,
        amount_in: Decimal,
        amount_out: Decimal,
        fee_side: FeeSide,
        fee: FeeSplit,
        at: Timestamp,
    ) -> PricingResult<SwapOutcome> {
        let side_out = side_in.opposite();
        let mut reserves_after = pool.reserves;
        *reserves_after.get_mut(side_in) += amount_in;
        *reserves_after.get_mut(side_out) -= amount_out;
        // The LP share stays in the pool, the owner's share leaves it.
        let fee_asset = match fee_side {
            FeeSide::Input => side_in,
            FeeSide::Output => side_out,
        };
        *reserves_after.get_mut(fee_asset) -= fee.owner;

        if *reserves_after.get(side_out) <= Decimal::ZERO {
            return Err(PricingError::InsufficientLiquidity {
                requested: amount_out,
                available: *pool.reserves.get(side_out),
            });
        }

        let after = PoolState {
            reserves: reserves_after,
            ..pool.clone()
        };
        let spot_price_before = SpotPriceCalculator::price_of(pool, side_out, at)?;
        let spot_price_after = SpotPriceCalculator::price_of(&after, side_out, at)?;
        if spot_price_after.value <= Decimal::ZERO {
            return Err(PricingError::DegeneratePool("price after trade must be positive"));
        }
        let price_impact = round_down(
            Decimal::ONE - spot_price_before.value / spot_price_after.value,
            self.config.internal_precision,
        );

        debug!(
            pool = %pool.pool_id,
            side_in = ?side_in,
            amount_in = %amount_in,
            amount_out = %amount_out,
            price_impact = %price_impact,
            "Simulated swap"
        );

        Ok(SwapOutcome {
            side_in,
            amount_in,
            amount_out,
            fee_side,
            fee,
            spot_price_before,
            spot_price_after,
            price_impact,
            reserves_after,
        })
    }
}

fn check_tradable(pool: &PoolState, at: Timestamp) -> PricingResult<()> {
    pool.validate()?;
    if pool.sale_state(at) != SaleState::Ongoing {
        return Err(PricingError::SaleNotOngoing);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use amm_engine_domain::pool::{FeeConfig, PoolId, PoolKind, Sale};
    use amm_engine_domain::value_objects::Percentage;
    use rust_decimal_macros::dec;

    fn pool(kind: PoolKind) -> PoolState {
        PoolState {
            pool_id: PoolId(7),
            kind,
            pair: Pair::new(2, 1),
            reserves: Pair::new(dec!(1000), dec!(1000)),
            fees: FeeConfig::new(Percentage(dec!(1)), Percentage(dec!(25))),
        }
    }

    fn lbp() -> PoolState {
        PoolState {
            reserves: Pair::new(dec!(1000000), dec!(10000)),
            ..pool(PoolKind::LiquidityBootstrapping {
                sale: Sale {
                    start: 1_000,
                    end: 2_000,
                    initial_weight: dec!(90),
                    final_weight: dec!(50),
                },
            })
        }
    }

    fn simulator() -> SwapSimulator {
        SwapSimulator::new(EngineConfig::default())
    }

    #[test]
    fn test_exact_in_fee_on_input() {
        let pool = pool(PoolKind::ConstantProduct);
        let outcome = simulator()
            .exact_in(&pool, Side::Base, dec!(100), 0)
            .unwrap();

        assert_eq!(outcome.fee_side, FeeSide::Input);
        assert_eq!(outcome.fee.total, dec!(1));
        assert_eq!(outcome.fee.owner, dec!(0.25));
        assert_eq!(outcome.fee.lp, dec!(0.75));
        // 1000 * 99 / 1099
        assert!(outcome.amount_out > dec!(90.08) && outcome.amount_out < dec!(90.09));
        assert_eq!(outcome.reserves_after.base, dec!(1099.75));
        assert_eq!(
            outcome.reserves_after.quote,
            dec!(1000) - outcome.amount_out
        );
        assert_eq!(outcome.spot_price_before.value, dec!(1));
        assert!(outcome.spot_price_after.value > dec!(1.2));
        assert!(outcome.price_impact > dec!(0.17) && outcome.price_impact < dec!(0.18));
    }

    #[test]
    fn test_exact_out_matches_exact_in() {
        let pool = pool(PoolKind::ConstantProduct);
        let simulator = simulator();
        let outcome = simulator
            .exact_out(&pool, Side::Quote, dec!(90), 0)
            .unwrap();
        assert_eq!(outcome.amount_out, dec!(90));
        assert!(outcome.amount_in > dec!(99.89) && outcome.amount_in < dec!(99.91));

        let replay = simulator
            .exact_in(&pool, Side::Quote, outcome.amount_in, 0)
            .unwrap();
        assert!((replay.amount_out - dec!(90)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_stable_fee_on_output() {
        let pool = pool(PoolKind::StableSwap { amplification: 100 });
        let outcome = simulator()
            .exact_in(&pool, Side::Base, dec!(10), 0)
            .unwrap();

        assert_eq!(outcome.fee_side, FeeSide::Output);
        assert!(outcome.fee.total > dec!(0.0999) && outcome.fee.total < dec!(0.1));
        assert!(outcome.amount_out > dec!(9.89) && outcome.amount_out < dec!(9.9));
        assert_eq!(outcome.reserves_after.base, dec!(1010));
        assert_eq!(
            outcome.reserves_after.quote,
            dec!(1000) - outcome.amount_out - outcome.fee.owner
        );
        assert!(outcome.price_impact > Decimal::ZERO);
        assert!(outcome.price_impact < dec!(0.002));
    }

    #[test]
    fn test_stable_exact_out_covers_request() {
        let pool = pool(PoolKind::StableSwap { amplification: 100 });
        let outcome = simulator()
            .exact_out(&pool, Side::Base, dec!(50), 0)
            .unwrap();
        assert!(outcome.amount_out >= dec!(50));
        assert!(outcome.amount_out - dec!(50) < dec!(0.000001));
        assert!(outcome.amount_in > dec!(50));
    }

    #[test]
    fn test_lbp_requires_ongoing_sale() {
        let pool = lbp();
        let simulator = simulator();
        assert_eq!(
            simulator.exact_in(&pool, Side::Quote, dec!(100), 999),
            Err(PricingError::SaleNotOngoing)
        );
        assert_eq!(
            simulator.exact_out(&pool, Side::Quote, dec!(100), 2_000),
            Err(PricingError::SaleNotOngoing)
        );

        let outcome = simulator
            .exact_in(&pool, Side::Quote, dec!(100), 1_500)
            .unwrap();
        assert!(outcome.amount_out > Decimal::ZERO);
        assert!(outcome.price_impact > Decimal::ZERO);
    }

    #[test]
    fn test_rejects_bad_trades() {
        let pool = pool(PoolKind::ConstantProduct);
        let simulator = simulator();
        assert!(matches!(
            simulator.exact_in(&pool, Side::Base, Decimal::ZERO, 0),
            Err(PricingError::InvalidAmount(_))
        ));
        assert!(matches!(
            simulator.exact_out(&pool, Side::Base, dec!(1000), 0),
            Err(PricingError::InsufficientLiquidity { .. })
        ));

        let mut broken = pool;
        broken.pair = Pair::new(1, 1);
        assert_eq!(
            simulator.exact_in(&broken, Side::Base, dec!(1), 0),
            Err(PricingError::InvalidPair)
        );
    }
}
