//! Market data provider trait definition.
//!
//! Every upstream source implements `MarketDataProvider`. The contract
//! that matters to the chain: absence is a missing key in the returned
//! map (or an empty history vector), and errors carry diagnostics but
//! are treated by the caller exactly like absence.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, ClassifiedSymbol, HistoryPoint, HistoryRange, Quote};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier, a constant like "YAHOO" or "BINANCE". Used for
    /// logging and as the `source` field on quotes.
    fn id(&self) -> &'static str;

    /// Chain ordering. Lower values = higher priority. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// Whether this provider can serve the given asset category at all.
    /// Symbols outside the supported set are never sent to it.
    fn supports(&self, category: AssetCategory) -> bool;

    /// Fetch current quotes for a batch of symbols.
    ///
    /// Returns a map keyed by app symbol. A symbol the provider could
    /// not price is simply absent from the map; only transport or
    /// payload failures produce an `Err`.
    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError>;

    /// Fetch a historical series. Implementations return candles in any
    /// order; the aggregator sorts ascending. Default: not supported.
    async fn fetch_history(
        &self,
        symbol: &ClassifiedSymbol,
        range: &HistoryRange,
    ) -> Result<Vec<HistoryPoint>, MarketDataError> {
        let _ = (symbol, range);
        Err(MarketDataError::NotSupported {
            provider: self.id(),
            operation: "history",
        })
    }
}

/// A source that builds the whole X/TRY rate table in one request.
/// These sources publish no per-symbol change data, so tables built
/// from them are cached on the long fallback TTL.
#[async_trait]
pub trait FxRateSource: Send + Sync {
    fn id(&self) -> &'static str;

    async fn fetch_rates(&self, codes: &[&str]) -> Result<Vec<Quote>, MarketDataError>;
}
