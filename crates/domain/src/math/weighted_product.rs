//! Constant weighted-product invariant `Bi^Wi * Bo^Wo = k`.
//!
//! With equal weights this is the constant-product `x * y = k` curve.
//! Formulas follow the Balancer whitepaper, equations (15) and (20).

use crate::error::{PricingError, PricingResult};
use crate::math::rounding::{INTERNAL_PRECISION, round_down, round_up};
use rust_decimal::{Decimal, MathematicalOps};

fn ensure_positive_reserves(reserve_in: Decimal, reserve_out: Decimal) -> PricingResult<()> {
    if reserve_in <= Decimal::ZERO || reserve_out <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("reserves must be positive"));
    }
    Ok(())
}

fn weight_ratio(numerator: Decimal, denominator: Decimal) -> PricingResult<Decimal> {
    if numerator <= Decimal::ZERO || denominator <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("weights must be positive"));
    }
    numerator
        .checked_div(denominator)
        .ok_or(PricingError::Overflow)
}

/// Amount of the output asset received for `amount_in` of the input asset.
///
/// `Ao = Bo * (1 - (Bi / (Bi + Ai))^(Wi / Wo))`, rounded toward zero.
///
/// # Arguments
///
/// * `reserve_in` - Pool balance of the asset supplied (`Bi`)
/// * `reserve_out` - Pool balance of the asset received (`Bo`)
/// * `amount_in` - Amount supplied (`Ai`)
/// * `weight_in` / `weight_out` - Weights of the two assets, any common scale
pub fn amount_out_given_in(
    reserve_in: Decimal,
    reserve_out: Decimal,
    amount_in: Decimal,
    weight_in: Decimal,
    weight_out: Decimal,
) -> PricingResult<Decimal> {
    if amount_in <= Decimal::ZERO {
        return Err(PricingError::InvalidAmount("amount in must be positive"));
    }
    ensure_positive_reserves(reserve_in, reserve_out)?;
    let power = weight_ratio(weight_in, weight_out)?;

    let new_reserve_in = reserve_in
        .checked_add(amount_in)
        .ok_or(PricingError::Overflow)?;
    let ratio = reserve_in
        .checked_div(new_reserve_in)
        .ok_or(PricingError::Overflow)?;
    let term = ratio.checked_powd(power).ok_or(PricingError::Overflow)?;
    let amount_out = reserve_out
        .checked_mul(Decimal::ONE - term)
        .ok_or(PricingError::Overflow)?;
    let amount_out = round_down(amount_out, INTERNAL_PRECISION);

    if amount_out >= reserve_out {
        // The power underflowed to zero; the exact result is still below `Bo`.
        let ceiling = reserve_out - Decimal::new(1, INTERNAL_PRECISION);
        if ceiling <= Decimal::ZERO {
            return Err(PricingError::InsufficientLiquidity {
                requested: amount_out,
                available: reserve_out,
            });
        }
        return Ok(ceiling);
    }
    Ok(amount_out.max(Decimal::ZERO))
}

/// Amount of the input asset required to receive `amount_out`.
///
/// `Ai = Bi * ((Bo / (Bo - Ao))^(Wo / Wi) - 1)`, rounded away from zero.
/// Fails with `InsufficientLiquidity` when `amount_out >= reserve_out`.
pub fn amount_in_given_out(
    reserve_in: Decimal,
    reserve_out: Decimal,
    amount_out: Decimal,
    weight_in: Decimal,
    weight_out: Decimal,
) -> PricingResult<Decimal> {
    if amount_out <= Decimal::ZERO {
        return Err(PricingError::InvalidAmount("amount out must be positive"));
    }
    ensure_positive_reserves(reserve_in, reserve_out)?;
    if amount_out >= reserve_out {
        return Err(PricingError::InsufficientLiquidity {
            requested: amount_out,
            available: reserve_out,
        });
    }
    let power = weight_ratio(weight_out, weight_in)?;

    let ratio = reserve_out
        .checked_div(reserve_out - amount_out)
        .ok_or(PricingError::Overflow)?;
    let term = ratio.checked_powd(power).ok_or(PricingError::Overflow)?;
    let amount_in = reserve_in
        .checked_mul(term - Decimal::ONE)
        .ok_or(PricingError::Overflow)?;
    Ok(round_up(amount_in, INTERNAL_PRECISION))
}

/// Output units per input unit at the margin: `(Bo / Wo) / (Bi / Wi)`.
pub fn marginal_rate(
    reserve_in: Decimal,
    reserve_out: Decimal,
    weight_in: Decimal,
    weight_out: Decimal,
) -> PricingResult<Decimal> {
    if weight_in <= Decimal::ZERO || weight_out <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("weights must be positive"));
    }
    if reserve_in <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("reserve in must be positive"));
    }
    let numerator = reserve_out
        .checked_div(weight_out)
        .ok_or(PricingError::Overflow)?;
    let denominator = reserve_in
        .checked_div(weight_in)
        .ok_or(PricingError::Overflow)?;
    numerator
        .checked_div(denominator)
        .ok_or(PricingError::Overflow)
}

/// Weighted-product curve with the weights of one trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedProduct {
    pub weight_in: Decimal,
    pub weight_out: Decimal,
}

impl WeightedProduct {
    pub fn new(weight_in: Decimal, weight_out: Decimal) -> Self {
        Self {
            weight_in,
            weight_out,
        }
    }

    /// Equal weights, i.e. `x * y = k`.
    pub fn constant_product() -> Self {
        Self::new(Decimal::from(50), Decimal::from(50))
    }
}
