//! Two-coin StableSwap invariant.
//!
//! `A * n^n * sum(x_i) + D = A * D * n^n + D^(n+1) / (n^n * prod(x_i))`
//!
//! `D` is the total amount of coins when both have an equal price. Both `D`
//! and the balance that keeps `D` fixed after a trade are found with the
//! converging iterations from Egorov's StableSwap paper.

use crate::error::{PricingError, PricingResult};
use crate::math::rounding::{INTERNAL_PRECISION, round_down, round_up};
use rust_decimal::Decimal;

const N_COINS: Decimal = Decimal::TWO;
const MAX_ITERATIONS: usize = 255;

fn tolerance(scale: Decimal) -> Decimal {
    // Absolute 1e-12, relaxed for balances where 28 significant digits cannot hold it.
    Decimal::new(1, INTERNAL_PRECISION).max(scale * Decimal::new(1, 20))
}

fn mul(a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    a.checked_mul(b).ok_or(PricingError::Overflow)
}

fn div(a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    if b.is_zero() {
        return Err(PricingError::DegeneratePool("division by zero balance"));
    }
    a.checked_div(b).ok_or(PricingError::Overflow)
}

/// `A * n^n` for two coins.
fn ann(amplification: u32) -> PricingResult<Decimal> {
    if amplification == 0 {
        return Err(PricingError::DegeneratePool(
            "amplification coefficient must be positive",
        ));
    }
    mul(Decimal::from(amplification), N_COINS * N_COINS)
}

/// Finds `D` for the balances `x` and `y`.
///
/// ```text
/// D_p = D^(n+1) / (n^n * x * y)
/// D' = (Ann * S + D_p * n) * D / ((Ann - 1) * D + (n + 1) * D_p)
/// ```
pub fn compute_d(x: Decimal, y: Decimal, amplification: u32) -> PricingResult<Decimal> {
    if x <= Decimal::ZERO || y <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("balances must be positive"));
    }
    let ann = ann(amplification)?;
    let sum = x.checked_add(y).ok_or(PricingError::Overflow)?;
    let mut d = sum;

    for _ in 0..MAX_ITERATIONS {
        // Multiply by ratios so intermediates stay on the scale of D.
        let d_p = mul(mul(d, div(d, mul(x, N_COINS)?)?)?, div(d, mul(y, N_COINS)?)?)?;
        let d_prev = d;

        let numerator = mul(ann, sum)?
            .checked_add(mul(d_p, N_COINS)?)
            .ok_or(PricingError::Overflow)?;
        let denominator = mul(ann - Decimal::ONE, d)?
            .checked_add(mul(N_COINS + Decimal::ONE, d_p)?)
            .ok_or(PricingError::Overflow)?;
        d = mul(d, div(numerator, denominator)?)?;

        if (d - d_prev).abs() <= tolerance(d) {
            return Ok(d);
        }
    }
    Err(PricingError::Overflow)
}

/// Finds the balance `y` of the other coin that keeps `d` fixed when one coin's
/// balance becomes `x`.
///
/// ```text
/// c = D^(n+1) / (n^n * x * Ann)
/// b = x + D / Ann
/// y' = (y^2 + c) / (2y + b - D)
/// ```
pub fn compute_y(x: Decimal, d: Decimal, amplification: u32) -> PricingResult<Decimal> {
    if x <= Decimal::ZERO {
        return Err(PricingError::DegeneratePool("balance must be positive"));
    }
    let ann = ann(amplification)?;
    let c = mul(mul(d, div(d, mul(x, N_COINS)?)?)?, div(d, mul(ann, N_COINS)?)?)?;
    let b = x.checked_add(div(d, ann)?).ok_or(PricingError::Overflow)?;
    let mut y = d;

    for _ in 0..MAX_ITERATIONS {
        let y_prev = y;
        let numerator = mul(y, y)?.checked_add(c).ok_or(PricingError::Overflow)?;
        let denominator = mul(Decimal::TWO, y)?
            .checked_add(b)
            .ok_or(PricingError::Overflow)?
            - d;
        y = div(numerator, denominator)?;

        if (y - y_prev).abs() <= tolerance(y) {
            return Ok(y);
        }
    }
    Err(PricingError::Overflow)
}

/// StableSwap curve with a fixed amplification coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableSwap {
    pub amplification: u32,
}

impl StableSwap {
    pub fn new(amplification: u32) -> Self {
        Self { amplification }
    }

    pub fn amount_out_given_in(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_in: Decimal,
    ) -> PricingResult<Decimal> {
        if amount_in <= Decimal::ZERO {
            return Err(PricingError::InvalidAmount("amount in must be positive"));
        }
        let d = compute_d(reserve_in, reserve_out, self.amplification)?;
        let new_in = reserve_in
            .checked_add(amount_in)
            .ok_or(PricingError::Overflow)?;
        let new_out = compute_y(new_in, d, self.amplification)?;
        let amount_out = round_down(reserve_out - new_out, INTERNAL_PRECISION);

        if amount_out >= reserve_out {
            return Err(PricingError::InsufficientLiquidity {
                requested: amount_out,
                available: reserve_out,
            });
        }
        Ok(amount_out.max(Decimal::ZERO))
    }

    pub fn amount_in_given_out(
        &self,
        reserve_in: Decimal,
        reserve_out: Decimal,
        amount_out: Decimal,
    ) -> PricingResult<Decimal> {
        if amount_out <= Decimal::ZERO {
            return Err(PricingError::InvalidAmount("amount out must be positive"));
        }
        let d = compute_d(reserve_in, reserve_out, self.amplification)?;
        if amount_out >= reserve_out {
            return Err(PricingError::InsufficientLiquidity {
                requested: amount_out,
                available: reserve_out,
            });
        }
        let new_in = compute_y(reserve_out - amount_out, d, self.amplification)?;
        Ok(round_up(new_in - reserve_in, INTERNAL_PRECISION).max(Decimal::ZERO))
    }

    /// Output units per input unit at the margin, `-dy/dx` on the curve:
    /// `(Ann + D^3 / (4 x^2 y)) / (Ann + D^3 / (4 x y^2))`.
    pub fn marginal_rate(&self, reserve_in: Decimal, reserve_out: Decimal) -> PricingResult<Decimal> {
        let d = compute_d(reserve_in, reserve_out, self.amplification)?;
        let ann = ann(self.amplification)?;

        let half_in = div(d, mul(N_COINS, reserve_in)?)?;
        let half_out = div(d, mul(N_COINS, reserve_out)?)?;
        let dx = mul(mul(half_in, half_in)?, div(d, reserve_out)?)?;
        let dy = mul(mul(half_out, half_out)?, div(d, reserve_in)?)?;

        div(ann + dx, ann + dy)
    }
}
