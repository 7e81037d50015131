//! InvestGuide Market Data Crate
//!
//! Multi-source market data aggregation with ranked provider fallback.
//!
//! # Overview
//!
//! This crate supports:
//! - Multiple asset classes: BIST and global equities, crypto, FX,
//!   commodities, TEFAS funds
//! - Multiple providers: Mynet, Yahoo, TradingView, FMP, Binance,
//!   Twelve Data, exchangerate-api, the fawazahmed0 currency CDN, TEFAS
//! - Deterministic symbol classification and per-provider dialects
//! - TTL-differentiated in-process caching
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   App symbol     | --> |   Classifier     |  (category + venue + dialect)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   Aggregator     |  (cache-first, fallback chains)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (Mynet, Yahoo, Binance, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Quote        |  (price > 0, or absent)
//!                          +------------------+
//! ```
//!
//! The core contract: a provider that errors, times out or answers with
//! a non-positive price is treated as absent and the next provider in
//! priority order is consulted. Callers never see a failure for a
//! data-quality problem; total exhaustion yields `Quote::unknown`.

pub mod aggregator;
pub mod cache;
pub mod classifier;
pub mod errors;
pub mod models;
pub mod provider;

pub use aggregator::{
    derive_gram_gold, resolve_history, resolve_quotes, Aggregator, Providers,
    GRAMS_PER_TROY_OUNCE,
};
pub use cache::{MarketCache, TtlCache};
pub use classifier::{FundRegistry, SymbolClassifier, FX_TABLE_CODES};
pub use errors::MarketDataError;
pub use models::{
    AssetCategory, Classification, ClassifiedSymbol, HistoryPeriod, HistoryPoint, HistoryRange,
    Quote, Venue,
};
pub use provider::MarketDataProvider;
