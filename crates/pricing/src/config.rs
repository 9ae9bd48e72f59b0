//! Engine configuration.

use amm_engine_domain::math::rounding::{DISPLAY_PRECISION, INTERNAL_PRECISION};
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`EngineConfig::display_precision`].
pub const DISPLAY_PRECISION_ENV: &str = "AMM_DISPLAY_PRECISION";
/// Environment variable overriding [`EngineConfig::internal_precision`].
///
/// Curve math in `amm_engine_domain` always rounds at
/// [`INTERNAL_PRECISION`]; this setting only governs the swap simulator's fee
/// gross-up and price-impact figures.
pub const INTERNAL_PRECISION_ENV: &str = "AMM_INTERNAL_PRECISION";

const MAX_PRECISION: u32 = 28;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be an unsigned integer, got {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} must be at most {MAX_PRECISION}, got {value}")]
    PrecisionOutOfRange { key: &'static str, value: u32 },
}

/// Precision settings of the quoting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fractional digits of quote figures returned to callers.
    pub display_precision: u32,
    /// Fractional digits kept for fee gross-up and price impact in swap
    /// simulations. Curve outputs keep the domain's fixed precision.
    pub internal_precision: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display_precision: DISPLAY_PRECISION,
            internal_precision: INTERNAL_PRECISION,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `AMM_DISPLAY_PRECISION` / `AMM_INTERNAL_PRECISION`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            display_precision: read_precision(
                &lookup,
                DISPLAY_PRECISION_ENV,
                defaults.display_precision,
            )?,
            internal_precision: read_precision(
                &lookup,
                INTERNAL_PRECISION_ENV,
                defaults.internal_precision,
            )?,
        })
    }
}

fn read_precision(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
        })?;
    if value > MAX_PRECISION {
        return Err(ConfigError::PrecisionOutOfRange { key, value });
    }
    Ok(value)
}
