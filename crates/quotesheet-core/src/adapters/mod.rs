//! Quote API adapters.

pub mod alphavantage;

pub use alphavantage::{parse_latest_daily, AlphaVantageDaily, ALPHAVANTAGE_BASE_URL};
