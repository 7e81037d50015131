//! Static symbol tables consulted by the classifier.
//!
//! These sets are deliberately small and hand-curated: they cover the
//! instruments the product surfaces, not the whole listing universe.
//! Anything outside them falls through to the US-equity default.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::models::Venue;

lazy_static! {
    /// Crypto bases quoted against USDT on Binance.
    pub static ref CRYPTO_BASES: HashSet<&'static str> = [
        "BTC", "ETH", "SOL", "XRP", "ADA", "DOGE", "AVAX", "DOT", "LINK",
        "MATIC", "LTC", "BNB", "TRX", "SHIB", "UNI", "ATOM", "XLM", "NEAR",
    ]
    .into_iter()
    .collect();

    /// US large caps listed on NASDAQ.
    pub static ref NASDAQ_SET: HashSet<&'static str> = [
        "AAPL", "MSFT", "GOOGL", "GOOG", "AMZN", "NVDA", "META", "TSLA",
        "NFLX", "AMD", "INTC", "QCOM", "CSCO", "ADBE", "PYPL",
    ]
    .into_iter()
    .collect();

    /// NYSE/AMEX names and the ETF/bond tickers served from the curated
    /// lists.
    pub static ref NYSE_SET: HashSet<&'static str> = [
        "KO", "PEP", "MCD", "V", "MA", "JPM", "DIS", "BRK.B",
        "SPY", "VOO", "GLD", "SLV", "VTI", "IVV", "AGG", "LQD", "HYG", "BND", "TLT",
    ]
    .into_iter()
    .collect();

    /// BIST majors recognized without the ".IS" suffix.
    pub static ref BIST_SET: HashSet<&'static str> = [
        "THYAO", "ASELS", "GARAN", "AKBNK", "ISCTR", "YKBNK", "EREGL",
        "KCHOL", "SISE", "TUPRS", "BIMAS", "SAHOL", "FROTO", "TOASO",
        "TCELL", "PETKM", "KOZAL", "HEKTS", "EKGYO", "ARCLK",
    ]
    .into_iter()
    .collect();

    /// Currency codes quoted against TRY in the FX table.
    pub static ref FOREX_CODES: HashSet<&'static str> = [
        "USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD", "DKK", "SEK",
        "NOK", "SAR", "TRY",
    ]
    .into_iter()
    .collect();

    /// German large caps on XETRA.
    pub static ref XETRA_SET: HashSet<&'static str> = [
        "SAP", "SIE", "ALV", "DTE", "BMW", "VOW3", "BAS", "AIR",
    ]
    .into_iter()
    .collect();

    /// UK large caps on the LSE. "BP." keeps its listing dot.
    pub static ref LSE_SET: HashSet<&'static str> = [
        "SHEL", "HSBA", "AZN", "ULVR", "BP.", "BARC", "VOD", "LLOY",
    ]
    .into_iter()
    .collect();

    /// Commodity aliases to provider tickers. Values are (ticker, venue).
    pub static ref COMMODITY_TABLE: HashMap<&'static str, (&'static str, Venue)> = [
        ("GOLD", ("XAUUSD", Venue::FxIdc)),
        ("XAU/USD", ("XAUUSD", Venue::FxIdc)),
        ("SILVER", ("XAGUSD", Venue::FxIdc)),
        ("XAG/USD", ("XAGUSD", Venue::FxIdc)),
        ("BRENT", ("UKOIL", Venue::Tvc)),
        ("CRUDE_OIL", ("USOIL", Venue::Tvc)),
        ("NATURAL_GAS", ("NATGAS", Venue::Tvc)),
        ("CORN", ("ZC1!", Venue::Cbot)),
        ("WHEAT", ("ZW1!", Venue::Cbot)),
        ("SOYBEAN", ("ZS1!", Venue::Cbot)),
    ]
    .into_iter()
    .collect();
}

/// The eleven codes the FX table endpoint serves, quoted against TRY.
pub const FX_TABLE_CODES: [&str; 11] = [
    "USD", "EUR", "GBP", "CHF", "JPY", "CAD", "AUD", "DKK", "SEK", "NOK", "SAR",
];
