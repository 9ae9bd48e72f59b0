//! Pool model and invariant math for constant-product, stable-swap and
//! liquidity bootstrapping pools.
//!
//! Everything here is a pure function of its inputs: pool snapshots are passed
//! in by reference and nothing is cached between calls.

pub mod enums;
pub mod error;
pub mod invariant;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod value_objects;
