//! Liquidity provider share math.

use crate::error::{PricingError, PricingResult};
use crate::math::rounding::{INTERNAL_PRECISION, round_down};
use crate::value_objects::{Pair, Percentage};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

/// Outcome of adding liquidity in both assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpDeposit {
    /// Quote amount actually taken, matched to the pool ratio.
    pub quote_amount: Decimal,
    /// LP tokens minted for the deposit.
    pub lp_minted: Decimal,
}

/// LP tokens for the first deposit into an empty pool: `sqrt(base) * sqrt(quote)`.
pub fn first_deposit_lp(base_amount: Decimal, quote_amount: Decimal) -> PricingResult<Decimal> {
    if base_amount <= Decimal::ZERO || quote_amount <= Decimal::ZERO {
        return Err(PricingError::InvalidAmount("deposit amounts must be positive"));
    }
    let base_root = base_amount.sqrt().ok_or(PricingError::Overflow)?;
    let quote_root = quote_amount.sqrt().ok_or(PricingError::Overflow)?;
    let lp = base_root
        .checked_mul(quote_root)
        .ok_or(PricingError::Overflow)?;
    // Nearest, not down: the square roots are themselves approximations.
    Ok(lp.round_dp(INTERNAL_PRECISION))
}

/// Deposit of `base_amount` (and the matching quote) into a pool.
///
/// On an empty pool (`lp_total_issuance == 0`) the quote amount is taken as
/// given. Otherwise it is overwritten to keep the pool ratio and LP tokens
/// are minted pro rata to the base contribution.
pub fn deposit(
    lp_total_issuance: Decimal,
    base_amount: Decimal,
    quote_amount: Decimal,
    reserves: &Pair<Decimal>,
) -> PricingResult<LpDeposit> {
    if lp_total_issuance.is_zero() {
        return Ok(LpDeposit {
            quote_amount,
            lp_minted: first_deposit_lp(base_amount, quote_amount)?,
        });
    }
    if base_amount <= Decimal::ZERO {
        return Err(PricingError::InvalidAmount("base amount must be positive"));
    }
    if reserves.base <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("base reserve must be positive"));
    }
    let share = base_amount
        .checked_div(reserves.base)
        .ok_or(PricingError::Overflow)?;
    let matched_quote = reserves
        .quote
        .checked_mul(share)
        .ok_or(PricingError::Overflow)?;
    let lp_minted = lp_total_issuance
        .checked_mul(share)
        .ok_or(PricingError::Overflow)?;
    Ok(LpDeposit {
        quote_amount: round_down(matched_quote, INTERNAL_PRECISION),
        lp_minted: round_down(lp_minted, INTERNAL_PRECISION),
    })
}

/// LP tokens issued for a single-asset deposit into a weighted pool, and the
/// fee withheld from it.
///
/// `issued = supply * (((d * (1 - f) + b) / b)^w - 1)`
///
/// # Arguments
///
/// * `lp_supply` - LP tokens already issued
/// * `amount` - Deposit of the asset (`d`)
/// * `reserve` - Pool balance of that asset (`b`)
/// * `weight` - Weight of that asset, in percent (`w`)
/// * `fee` - Fee applied to the deposit (`f`)
pub fn single_asset_deposit(
    lp_supply: Decimal,
    amount: Decimal,
    reserve: Decimal,
    weight: Decimal,
    fee: Percentage,
) -> PricingResult<(Decimal, Decimal)> {
    if amount <= Decimal::ZERO {
        return Err(PricingError::InvalidAmount("deposit must be positive"));
    }
    if reserve <= Decimal::ZERO || weight <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("reserve and weight must be positive"));
    }
    let fee_amount = fee.of(amount)?;
    let net = amount - fee_amount;
    let growth = (net + reserve)
        .checked_div(reserve)
        .ok_or(PricingError::Overflow)?;
    let power = growth
        .checked_powd(weight / Decimal::ONE_HUNDRED)
        .ok_or(PricingError::Overflow)?;
    let issued = lp_supply
        .checked_mul(power - Decimal::ONE)
        .ok_or(PricingError::Overflow)?;
    Ok((round_down(issued, INTERNAL_PRECISION), fee_amount))
}
