//! Command Line Interface for the AMM pricing engine.
use amm_engine_charts::{ChartRange, ChartSample, ChartSeriesBuilder};
use amm_engine_domain::math::liquidity;
use amm_engine_domain::prelude::*;
use amm_engine_pricing::prelude::*;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "amm-cli")]
#[command(about = "Quotes, swaps and charts for constant-product, stable-swap and LBP pools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Base,
    Quote,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Base => Side::Base,
            SideArg::Quote => Side::Quote,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a trade from a spot rate and a fee, or against a pool snapshot
    Quote {
        /// Field the amount was typed into
        #[arg(long, value_enum, default_value = "base")]
        side: SideArg,

        /// Amount typed by the user
        #[arg(short, long)]
        amount: Decimal,

        /// Slippage tolerance in percent
        #[arg(long, default_value = "1")]
        slippage: Decimal,

        /// One base unit in quote units (ignored with --pool)
        #[arg(long, required_unless_present = "pool")]
        rate: Option<Decimal>,

        /// Fee in percent (ignored with --pool)
        #[arg(long, default_value = "0")]
        fee: Decimal,

        /// The user's selection is the reverse of the pool's orientation (ignored with --pool)
        #[arg(long)]
        inverted: bool,

        /// Pool snapshot (JSON)
        #[arg(long)]
        pool: Option<PathBuf>,

        /// Asset selected as quote, defaults to the pool's quote asset
        #[arg(long, requires = "pool")]
        quote_asset: Option<AssetId>,

        /// Evaluation time in UNIX milliseconds, defaults to now
        #[arg(long)]
        at: Option<Timestamp>,
    },
    /// Spot price of one side of a pool in the other side's units
    SpotPrice {
        /// Pool snapshot (JSON)
        #[arg(long)]
        pool: PathBuf,

        #[arg(long, value_enum, default_value = "base")]
        side: SideArg,

        /// Evaluation time in UNIX milliseconds, defaults to now
        #[arg(long)]
        at: Option<Timestamp>,
    },
    /// Effective weights and sale state of a pool
    Weights {
        /// Pool snapshot (JSON)
        #[arg(long)]
        pool: PathBuf,

        /// Evaluation time in UNIX milliseconds, defaults to now
        #[arg(long)]
        at: Option<Timestamp>,
    },
    /// Simulate a swap along the pool's invariant
    Swap {
        /// Pool snapshot (JSON)
        #[arg(long)]
        pool: PathBuf,

        /// Side paid into the pool
        #[arg(long, value_enum)]
        side_in: SideArg,

        /// Amount paid in, or received with --exact-out
        #[arg(short, long)]
        amount: Decimal,

        /// Treat the amount as the exact output
        #[arg(long)]
        exact_out: bool,

        /// Evaluation time in UNIX milliseconds, defaults to now
        #[arg(long)]
        at: Option<Timestamp>,
    },
    /// Predicted spot price of an LBP until its sale ends
    Forecast {
        /// Pool snapshot (JSON)
        #[arg(long)]
        pool: PathBuf,

        /// First point in UNIX milliseconds, defaults to now
        #[arg(long)]
        from: Option<Timestamp>,

        /// Spacing between points in milliseconds
        #[arg(long, default_value_t = 3_600_000)]
        step: Timestamp,
    },
    /// Bucket price or volume samples into a chart series
    Chart {
        /// Samples as a JSON array of [timestamp, value]
        #[arg(long)]
        samples: PathBuf,

        /// hour, week or month
        #[arg(long, default_value = "hour")]
        range: ChartRange,

        /// Keep only samples newer than the latest one minus this many milliseconds
        #[arg(long)]
        window: Option<i64>,

        /// Most recent bucket first
        #[arg(long)]
        descending: bool,
    },
    /// LP tokens minted for a two-sided deposit
    LpDeposit {
        /// Pool snapshot (JSON)
        #[arg(long)]
        pool: PathBuf,

        /// LP tokens already issued
        #[arg(long, default_value = "0")]
        issuance: Decimal,

        /// Base amount deposited
        #[arg(long)]
        base: Decimal,

        /// Quote amount deposited, used as given only for the first deposit
        #[arg(long, default_value = "0")]
        quote: Decimal,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env()?;

    match cli.command {
        Commands::Quote {
            side,
            amount,
            slippage,
            rate,
            fee,
            inverted,
            pool,
            quote_asset,
            at,
        } => {
            let engine = QuoteEngine::new(config);
            let result = match pool {
                Some(path) => {
                    let pool = load_pool(&path)?;
                    let quote_asset = quote_asset.unwrap_or(pool.pair.quote);
                    engine.quote_pool(
                        &pool,
                        quote_asset,
                        side.into(),
                        amount,
                        Percentage(slippage),
                        at.unwrap_or_else(now_ms),
                    )?
                }
                None => {
                    let Some(rate) = rate else {
                        bail!("--rate is required without --pool");
                    };
                    engine.quote(&TradeRequest {
                        side_updated: side.into(),
                        inverted,
                        amount,
                        one_base_in_quote: rate,
                        slippage_percent: Percentage(slippage),
                        fee_percent: Percentage(fee),
                    })?
                }
            };
            print_json(&result)?;
        }
        Commands::SpotPrice { pool, side, at } => {
            let pool = load_pool(&pool)?;
            let price = SpotPriceCalculator::price_of(&pool, side.into(), at.unwrap_or_else(now_ms))?;
            print_json(&price)?;
        }
        Commands::Weights { pool, at } => {
            let pool = load_pool(&pool)?;
            let at = at.unwrap_or_else(now_ms);

            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            struct WeightsReport {
                at: Timestamp,
                weights: Option<Pair<Decimal>>,
                sale_state: SaleState,
            }

            print_json(&WeightsReport {
                at,
                weights: pool.weights_at(at)?,
                sale_state: pool.sale_state(at),
            })?;
        }
        Commands::Swap {
            pool,
            side_in,
            amount,
            exact_out,
            at,
        } => {
            let pool = load_pool(&pool)?;
            let simulator = SwapSimulator::new(config);
            let at = at.unwrap_or_else(now_ms);
            let outcome = if exact_out {
                simulator.exact_out(&pool, side_in.into(), amount, at)?
            } else {
                simulator.exact_in(&pool, side_in.into(), amount, at)?
            };
            print_json(&outcome)?;
        }
        Commands::Forecast { pool, from, step } => {
            let pool = load_pool(&pool)?;
            let points = predicted_series(&pool, from.unwrap_or_else(now_ms), step)?;
            info!(points = points.len(), "Forecast computed");
            print_json(&points)?;
        }
        Commands::Chart {
            samples,
            range,
            window,
            descending,
        } => {
            let raw = fs::read_to_string(&samples)
                .with_context(|| format!("reading samples from {}", samples.display()))?;
            let samples: Vec<(i64, Decimal)> =
                serde_json::from_str(&raw).context("samples must be an array of [timestamp, value]")?;
            let samples: Vec<ChartSample> = samples.into_iter().map(ChartSample::from).collect();

            let mut builder = ChartSeriesBuilder::new(range);
            if let Some(window) = window {
                builder = builder.with_window(window);
            }
            let series = builder.build(&samples)?;
            info!(range = %range, buckets = series.len(), "Chart built");
            if descending {
                print_json(&series.into_descending())?;
            } else {
                print_json(&series)?;
            }
        }
        Commands::LpDeposit {
            pool,
            issuance,
            base,
            quote,
        } => {
            let pool = load_pool(&pool)?;
            let deposit = liquidity::deposit(issuance, base, quote, &pool.reserves)?;
            print_json(&deposit)?;
        }
    }

    Ok(())
}

fn load_pool(path: &Path) -> Result<PoolState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading pool snapshot from {}", path.display()))?;
    let pool: PoolState = serde_json::from_str(&raw)
        .with_context(|| format!("parsing pool snapshot {}", path.display()))?;
    pool.validate()?;
    info!(pool = %pool.pool_id, kind = ?pool.kind, "Loaded pool snapshot");
    Ok(pool)
}

fn now_ms() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
