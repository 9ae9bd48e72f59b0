use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept by the invariant math, matching on-chain comparisons.
pub const INTERNAL_PRECISION: u32 = 12;

/// Fractional digits of figures handed to display and validation callers.
pub const DISPLAY_PRECISION: u32 = 4;

/// Rounds toward zero. Used for amounts the pool pays out.
pub fn round_down(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::ToZero)
}

/// Rounds away from zero. Used for amounts the pool requires.
pub fn round_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::AwayFromZero)
}

/// Rounds half away from zero, the way display figures are fixed.
pub fn round_display(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
