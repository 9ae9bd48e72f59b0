//! Quoting and trade simulation on top of the pool math in
//! `amm_engine_domain`.

pub mod config;
pub mod forecast;
pub mod prelude;
pub mod quote;
pub mod swap;
