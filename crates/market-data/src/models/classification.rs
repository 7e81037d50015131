use serde::{Deserialize, Serialize};

/// Asset classes the classifier can assign. Each category fixes the
/// provider chain, the default currency and the symbol dialect used
/// downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    EquityTr,
    EquityUs,
    EquityDe,
    EquityUk,
    Crypto,
    Forex,
    Commodity,
    Fund,
}

impl AssetCategory {
    /// Currency assumed when a provider omits one.
    pub fn default_currency(&self) -> &'static str {
        match self {
            AssetCategory::EquityTr | AssetCategory::Fund => "TRY",
            AssetCategory::EquityDe => "EUR",
            AssetCategory::EquityUk => "GBP",
            _ => "USD",
        }
    }
}

/// Listing venue, used to route symbols to the right screener or
/// exchange-qualified ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Bist,
    Nasdaq,
    Nyse,
    Xetra,
    Lse,
    Binance,
    FxIdc,
    Tvc,
    Cbot,
    Tefas,
}

impl Venue {
    /// TradingView screener bucket for this venue.
    pub fn screener(&self) -> &'static str {
        match self {
            Venue::Bist | Venue::Tefas => "turkey",
            Venue::Nasdaq | Venue::Nyse => "america",
            Venue::Xetra => "germany",
            Venue::Lse => "uk",
            Venue::Binance => "crypto",
            Venue::FxIdc => "forex",
            Venue::Tvc | Venue::Cbot => "cfd",
        }
    }

    /// Exchange prefix for exchange-qualified tickers ("BIST:THYAO").
    pub fn prefix(&self) -> &'static str {
        match self {
            Venue::Bist => "BIST",
            Venue::Nasdaq => "NASDAQ",
            Venue::Nyse => "NYSE",
            Venue::Xetra => "XETR",
            Venue::Lse => "LSE",
            Venue::Binance => "BINANCE",
            Venue::FxIdc => "FX_IDC",
            Venue::Tvc => "TVC",
            Venue::Cbot => "CBOT",
            Venue::Tefas => "TEFAS",
        }
    }
}

/// Outcome of classifying one application-level symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The symbol in the dialect providers for this category expect
    /// (e.g. "BTCUSDT" for crypto, "USDTRY" for forex).
    pub provider_symbol: String,
    pub category: AssetCategory,
    pub venue: Venue,
}

/// An application symbol paired with its classification; the unit the
/// provider chain works in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSymbol {
    pub app_symbol: String,
    pub classification: Classification,
}

impl ClassifiedSymbol {
    pub fn category(&self) -> AssetCategory {
        self.classification.category
    }

    pub fn provider_symbol(&self) -> &str {
        &self.classification.provider_symbol
    }

    /// Exchange-qualified form, e.g. "BINANCE:BTCUSDT".
    pub fn qualified(&self) -> String {
        format!(
            "{}:{}",
            self.classification.venue.prefix(),
            self.classification.provider_symbol
        )
    }
}
