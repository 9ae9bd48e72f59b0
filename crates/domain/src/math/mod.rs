pub mod liquidity;
pub mod rounding;
pub mod spot_price;
pub mod stable_swap;
pub mod weight_curve;
pub mod weighted_product;
