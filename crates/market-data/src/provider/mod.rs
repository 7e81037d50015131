//! Provider implementations.
//!
//! Each submodule owns one upstream source: its request shaping, its
//! payload quirks and its error mapping. Providers never cache and never
//! fall back internally (the single mirror retry in `fawaz` is the one
//! documented exception); ordering and fallback live in the aggregator.

pub mod binance;
pub mod exchange_rate;
pub mod fawaz;
pub mod fmp;
pub mod mynet;
pub mod tefas;
pub mod tradingview;
pub mod twelve_data;
pub mod yahoo;

mod traits;
mod util;

pub use traits::{FxRateSource, MarketDataProvider};
pub use util::{build_client, parse_decimal, parse_tr_decimal, REQUEST_TIMEOUT};
