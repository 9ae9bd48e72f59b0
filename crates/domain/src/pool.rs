//! Normalized view of a pool as supplied by the chain-query layer.

use crate::enums::{FeeSide, SaleState, Side};
use crate::error::{PricingError, PricingResult};
use crate::math::weight_curve::WeightCurve;
use crate::value_objects::{Pair, Percentage};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// UNIX timestamp in milliseconds (or a block number for block-driven sales).
pub type Timestamp = i64;

/// On-chain asset identifier.
pub type AssetId = u128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub u128);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sale window of a liquidity bootstrapping pool.
///
/// Weights are the base asset's share, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub start: Timestamp,
    pub end: Timestamp,
    pub initial_weight: Decimal,
    pub final_weight: Decimal,
}

impl Sale {
    pub fn state(&self, at: Timestamp) -> SaleState {
        if at < self.start {
            SaleState::NotStarted
        } else if at >= self.end {
            SaleState::Ended
        } else {
            SaleState::Ongoing
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum PoolKind {
    /// `x * y = k`, weights fixed at 50/50.
    ConstantProduct,
    /// Curve-style invariant; weights are not used.
    StableSwap { amplification: u32 },
    /// Weighted pool whose weights move linearly over a sale window.
    LiquidityBootstrapping { sale: Sale },
}

impl PoolKind {
    /// Which leg of a trade the pool charges its fee on.
    pub fn fee_side(&self) -> FeeSide {
        match self {
            PoolKind::ConstantProduct | PoolKind::LiquidityBootstrapping { .. } => FeeSide::Input,
            PoolKind::StableSwap { .. } => FeeSide::Output,
        }
    }
}

/// Fee charged per trade. `owner_fee` is a share of `fee`, not an extra charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfig {
    pub fee: Percentage,
    pub owner_fee: Percentage,
}

/// A fee amount broken down between liquidity providers and the pool owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSplit {
    pub total: Decimal,
    pub lp: Decimal,
    pub owner: Decimal,
}

impl FeeConfig {
    pub fn new(fee: Percentage, owner_fee: Percentage) -> Self {
        Self { fee, owner_fee }
    }

    pub fn validate(&self) -> PricingResult<()> {
        if !self.fee.is_fee_range() {
            return Err(PricingError::InvalidFees("fee must be in [0, 100)"));
        }
        if !self.owner_fee.is_fee_range() {
            return Err(PricingError::InvalidFees("owner fee must be in [0, 100)"));
        }
        Ok(())
    }

    /// Fee charged on `amount`, with the owner's cut carved out of it.
    pub fn split(&self, amount: Decimal) -> PricingResult<FeeSplit> {
        let total = self.fee.of(amount)?;
        let owner = self.owner_fee.of(total)?;
        Ok(FeeSplit {
            total,
            lp: total - owner,
            owner,
        })
    }

    /// Gross amount whose fee-deducted remainder equals `net`.
    pub fn gross_up(&self, net: Decimal) -> PricingResult<Decimal> {
        let keep = Decimal::ONE - self.fee.as_fraction();
        if keep <= Decimal::ZERO {
            return Err(PricingError::InvalidFees("fee must be below 100"));
        }
        net.checked_div(keep).ok_or(PricingError::Overflow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    pub pool_id: PoolId,
    pub kind: PoolKind,
    pub pair: Pair<AssetId>,
    pub reserves: Pair<Decimal>,
    pub fees: FeeConfig,
}

impl PoolState {
    /// Checks the structural invariants of the pool record.
    pub fn validate(&self) -> PricingResult<()> {
        if self.pair.base == self.pair.quote {
            return Err(PricingError::InvalidPair);
        }
        if self.reserves.base.is_sign_negative() || self.reserves.quote.is_sign_negative() {
            return Err(PricingError::InvalidAmount("reserves must not be negative"));
        }
        self.fees.validate()?;
        match self.kind {
            PoolKind::ConstantProduct => Ok(()),
            PoolKind::StableSwap { amplification } => {
                if amplification == 0 {
                    return Err(PricingError::DegeneratePool(
                        "amplification coefficient must be positive",
                    ));
                }
                Ok(())
            }
            PoolKind::LiquidityBootstrapping { sale } => WeightCurve::new(sale).map(|_| ()),
        }
    }

    /// Effective `{base, quote}` weights at `at`, or `None` for stable-swap pools.
    pub fn weights_at(&self, at: Timestamp) -> PricingResult<Option<Pair<Decimal>>> {
        match self.kind {
            PoolKind::ConstantProduct => Ok(Some(Pair::new(
                Decimal::from(50),
                Decimal::from(50),
            ))),
            PoolKind::StableSwap { .. } => Ok(None),
            PoolKind::LiquidityBootstrapping { sale } => {
                Ok(Some(WeightCurve::new(sale)?.weights_at(at)))
            }
        }
    }

    /// Sale state at `at`; pools without a sale window are always ongoing.
    pub fn sale_state(&self, at: Timestamp) -> SaleState {
        match self.kind {
            PoolKind::LiquidityBootstrapping { sale } => sale.state(at),
            _ => SaleState::Ongoing,
        }
    }

    /// Which side of the pool `asset` sits on.
    pub fn side_of(&self, asset: AssetId) -> PricingResult<Side> {
        self.pair.side_of(&asset).ok_or(PricingError::InvalidPair)
    }
}
