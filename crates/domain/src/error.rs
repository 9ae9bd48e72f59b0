//! Error taxonomy shared by every pricing computation.

use rust_decimal::Decimal;

/// Errors raised by pool math, weight interpolation and quoting.
///
/// None of these are retried internally; callers surface them as
/// validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// Negative, zero where positive is required, or otherwise unusable input.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// A required reserve or weight is zero, making a ratio undefined.
    #[error("degenerate pool: {0}")]
    DegeneratePool(&'static str),

    /// The requested output would drain the pool.
    #[error("insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity {
        /// Amount the trade asked for.
        requested: Decimal,
        /// Reserve on the output side.
        available: Decimal,
    },

    /// Sale window ends before it starts or a weight is outside `[0, 100]`.
    #[error("inconsistent sale window: {0}")]
    InconsistentSaleWindow(&'static str),

    /// Fee or owner fee outside `[0, 100)`.
    #[error("invalid fees: {0}")]
    InvalidFees(&'static str),

    /// Pair with identical assets, or an asset that is not part of the pool.
    #[error("invalid pair")]
    InvalidPair,

    /// The pool cannot be traded at the requested time.
    #[error("sale is not ongoing")]
    SaleNotOngoing,

    /// Decimal arithmetic overflowed or an iterative solver did not converge.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Convenience alias used across the engine.
pub type PricingResult<T> = Result<T, PricingError>;
