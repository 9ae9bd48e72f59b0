//! Predicted price path of a liquidity bootstrapping pool.
//!
//! Assumes nobody trades: reserves stay put and only the weights move, tracing
//! where the sale price heads without demand.

use amm_engine_domain::error::{PricingError, PricingResult};
use amm_engine_domain::math::spot_price::SpotPriceCalculator;
use amm_engine_domain::pool::{PoolKind, PoolState, Timestamp};
use amm_engine_domain::value_objects::Price;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of points in one forecast.
pub const MAX_FORECAST_POINTS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub timestamp: Timestamp,
    pub price: Price,
}

/// Spot price of base in quote every `step` from `from` until the sale ends.
///
/// The last point always sits on the sale end. Empty once the sale is over.
pub fn predicted_series(
    pool: &PoolState,
    from: Timestamp,
    step: Timestamp,
) -> PricingResult<Vec<ForecastPoint>> {
    let PoolKind::LiquidityBootstrapping { sale } = pool.kind else {
        return Err(PricingError::DegeneratePool("pool has no sale window"));
    };
    if step <= 0 {
        return Err(PricingError::InvalidAmount("forecast step must be positive"));
    }
    if from >= sale.end {
        return Ok(Vec::new());
    }

    let span = sale.end.saturating_sub(from);
    let count = usize::try_from(span / step).unwrap_or(usize::MAX);
    if count >= MAX_FORECAST_POINTS {
        return Err(PricingError::InvalidAmount("forecast step too small for the sale window"));
    }

    let mut points = Vec::with_capacity(count + 2);
    let mut at = from;
    while at < sale.end {
        points.push(ForecastPoint {
            timestamp: at,
            price: SpotPriceCalculator::for_pool(pool, at)?,
        });
        at = at.saturating_add(step);
    }
    points.push(ForecastPoint {
        timestamp: sale.end,
        price: SpotPriceCalculator::for_pool(pool, sale.end)?,
    });
    Ok(points)
}
