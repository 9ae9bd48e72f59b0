//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use amm_engine_pricing::prelude::*;
//! ```

// Configuration
pub use crate::config::{ConfigError, EngineConfig};

// Forecasts
pub use crate::forecast::{ForecastPoint, predicted_series};

// Quotes
pub use crate::quote::{QuoteEngine, QuoteResult, TradeRequest};

// Swaps
pub use crate::swap::{SwapOutcome, SwapSimulator};
