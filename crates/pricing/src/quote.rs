//! Trade quotes shown to a user while they type an amount.
//!
//! The engine only needs the pool's marginal rate and fee: it does not walk
//! the invariant. Slippage is the tolerance the user accepts, applied as a
//! percentage of the traded leg.

use crate::config::EngineConfig;
use amm_engine_domain::error::{PricingError, PricingResult};
use amm_engine_domain::math::rounding::round_display;
use amm_engine_domain::math::spot_price::SpotPriceCalculator;
use amm_engine_domain::pool::{AssetId, PoolState, Timestamp};
use amm_engine_domain::prelude::{Percentage, Price, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A trade as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    /// Which input field the user edited.
    pub side_updated: Side,
    /// The user's base/quote selection is the reverse of the pool's.
    pub inverted: bool,
    /// Amount entered in the field named by `side_updated`.
    pub amount: Decimal,
    /// Pool spot price, one base unit in quote units.
    pub one_base_in_quote: Decimal,
    pub slippage_percent: Percentage,
    pub fee_percent: Percentage,
}

/// Display-ready figures of a quote, each rounded to the display precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    /// Amount for the opposite field.
    pub token_out_amount: Decimal,
    pub fee_charged_amount: Decimal,
    pub slippage_amount: Decimal,
    /// Worst-case amount the user receives.
    pub min_receive: Decimal,
}

/// Computes quotes from a marginal rate, a slippage tolerance and a fee.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteEngine {
    config: EngineConfig,
}

impl QuoteEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Quotes `request`.
    ///
    /// The fee and the slippage are both taken on the leg that was entered in,
    /// or produced in, base units: `token_out` when the user typed a base
    /// amount, the typed amount otherwise. The minimum received is that leg
    /// net of both, expressed in the currency the user receives.
    ///
    /// # Errors
    /// * [`PricingError::InvalidAmount`] for a non-positive amount, or a
    ///   slippage or fee percentage outside `[0, 100)`
    /// * [`PricingError::DegeneratePool`] for a non-positive rate
    pub fn quote(&self, request: &TradeRequest) -> PricingResult<QuoteResult> {
        if request.amount <= Decimal::ZERO {
            return Err(PricingError::InvalidAmount("amount must be positive"));
        }
        if !request.slippage_percent.is_fee_range() {
            return Err(PricingError::InvalidAmount("slippage must be in [0, 100)"));
        }
        if !request.fee_percent.is_fee_range() {
            return Err(PricingError::InvalidAmount("fee must be in [0, 100)"));
        }

        let one_base_in_quote = Price::new(request.one_base_in_quote);
        let one_quote_in_base = one_base_in_quote.invert()?;
        let (forward, backward) = if request.inverted {
            (one_quote_in_base.value, one_base_in_quote.value)
        } else {
            (one_base_in_quote.value, one_quote_in_base.value)
        };

        let amount = request.amount;
        let (token_out, leg) = match request.side_updated {
            Side::Base => {
                let out = mul(amount, forward)?;
                (out, out)
            }
            Side::Quote => (mul(amount, backward)?, amount),
        };

        let slippage = request.slippage_percent.of(leg)?;
        let fee = request.fee_percent.of(leg)?;
        let net = leg - slippage - fee;
        let min_receive = match request.side_updated {
            Side::Base => mul(net, backward)?,
            Side::Quote => token_out - slippage - fee,
        };

        let dp = self.config.display_precision;
        let result = QuoteResult {
            token_out_amount: round_display(token_out, dp),
            fee_charged_amount: round_display(fee, dp),
            slippage_amount: round_display(slippage, dp),
            min_receive: round_display(min_receive, dp),
        };
        debug!(
            side = ?request.side_updated,
            inverted = request.inverted,
            amount = %amount,
            token_out = %result.token_out_amount,
            min_receive = %result.min_receive,
            "Computed quote"
        );
        Ok(result)
    }

    /// Quotes a trade against `pool` at `at`, taking the rate and fee from the
    /// pool record.
    ///
    /// `quote_asset` is the asset the user selected as quote; the request is
    /// inverted when it is not the pool's own quote asset.
    pub fn quote_pool(
        &self,
        pool: &PoolState,
        quote_asset: AssetId,
        side_updated: Side,
        amount: Decimal,
        slippage_percent: Percentage,
        at: Timestamp,
    ) -> PricingResult<QuoteResult> {
        let selected_side = pool.side_of(quote_asset)?;
        let rate = SpotPriceCalculator::for_pool(pool, at)?;
        self.quote(&TradeRequest {
            side_updated,
            inverted: selected_side != Side::Quote,
            amount,
            one_base_in_quote: rate.value,
            slippage_percent,
            fee_percent: pool.fees.fee,
        })
    }
}

fn mul(a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    a.checked_mul(b).ok_or(PricingError::Overflow)
}
