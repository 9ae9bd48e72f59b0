//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use amm_engine_domain::prelude::*;
//! ```

pub use crate::enums::{FeeSide, SaleState, Side};
pub use crate::error::{PricingError, PricingResult};
pub use crate::invariant::{InvariantCalculator, SwapCurve};
pub use crate::math::rounding::{DISPLAY_PRECISION, INTERNAL_PRECISION};
pub use crate::math::spot_price::{SpotPriceCalculator, spot_price};
pub use crate::math::stable_swap::StableSwap;
pub use crate::math::weight_curve::WeightCurve;
pub use crate::math::weighted_product::WeightedProduct;
pub use crate::pool::{AssetId, FeeConfig, FeeSplit, PoolId, PoolKind, PoolState, Sale, Timestamp};
pub use crate::value_objects::{Pair, Percentage, Price};
