//! TradingView scanner provider.
//!
//! One POST per screener bucket to `scanner.tradingview.com/{screener}/scan`
//! with exchange-qualified tickers and a fixed column list. The scanner
//! covers every asset class the product serves, which makes it the
//! broadest (if not always the freshest) source in the chain. It also
//! carries the aggregate analyst recommendation used on detail pages.

use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, ClassifiedSymbol, Quote};
use crate::provider::{build_client, MarketDataProvider};

const BASE_URL: &str = "https://scanner.tradingview.com";
const PROVIDER_ID: &str = "TRADINGVIEW";

/// Column order of every scan request; `parse_row` indexes into this.
const COLUMNS: [&str; 7] = [
    "close",
    "open",
    "high",
    "low",
    "volume",
    "change",
    "Recommend.All",
];

pub struct TradingViewProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ScanResponse {
    #[serde(default)]
    data: Vec<ScanRow>,
}

#[derive(Debug, Deserialize)]
struct ScanRow {
    /// Exchange-qualified ticker, e.g. "BINANCE:BTCUSDT".
    s: String,
    /// Values in `COLUMNS` order; null where the scanner has no data.
    d: Vec<Option<f64>>,
}

fn dec(v: Option<f64>) -> Decimal {
    v.and_then(Decimal::from_f64_retain).unwrap_or_default()
}

/// Maps the Recommend.All oscillator to the label the product shows.
fn recommendation_label(score: Option<f64>) -> &'static str {
    match score {
        Some(s) if s >= 0.5 => "STRONG_BUY",
        Some(s) if s >= 0.1 => "BUY",
        Some(s) if s <= -0.5 => "STRONG_SELL",
        Some(s) if s <= -0.1 => "SELL",
        _ => "NEUTRAL",
    }
}

fn parse_row(app_symbol: &str, row: &ScanRow) -> Option<Quote> {
    let close = row.d.first().copied().flatten()?;
    if close <= 0.0 {
        return None;
    }
    let mut quote = Quote::new(app_symbol, dec(Some(close)).round_dp(4), PROVIDER_ID);
    quote.open = dec(row.d.get(1).copied().flatten());
    quote.high = dec(row.d.get(2).copied().flatten());
    quote.low = dec(row.d.get(3).copied().flatten());
    quote.volume = dec(row.d.get(4).copied().flatten());
    quote.change_percent = dec(row.d.get(5).copied().flatten()).round_dp(2);
    quote.recommendation =
        Some(recommendation_label(row.d.get(6).copied().flatten()).to_string());
    quote.logo_url = Some(format!(
        "https://s3-symbol-logo.tradingview.com/{}.svg",
        app_symbol.to_lowercase()
    ));
    Some(quote)
}

impl Default for TradingViewProvider {
    fn default() -> Self {
        TradingViewProvider::new()
    }
}

impl TradingViewProvider {
    pub fn new() -> Self {
        TradingViewProvider {
            client: build_client(),
            base_url: BASE_URL.to_string(),
        }
    }

    async fn scan(
        &self,
        screener: &str,
        tickers: &[String],
    ) -> Result<Vec<ScanRow>, MarketDataError> {
        let body = json!({
            "symbols": { "tickers": tickers, "query": { "types": [] } },
            "columns": COLUMNS,
        });
        let resp = self
            .client
            .post(format!("{}/{}/scan", self.base_url, screener))
            .json(&body)
            .send()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;

        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                provider: PROVIDER_ID,
                status: resp.status().as_u16(),
            });
        }

        let parsed: ScanResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;
        Ok(parsed.data)
    }
}

#[async_trait]
impl MarketDataProvider for TradingViewProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        7
    }

    fn supports(&self, _category: AssetCategory) -> bool {
        true
    }

    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        // Group by screener; each bucket is one scan request.
        let mut groups: HashMap<&'static str, Vec<&ClassifiedSymbol>> = HashMap::new();
        for sym in symbols {
            groups
                .entry(sym.classification.venue.screener())
                .or_default()
                .push(sym);
        }

        let mut out = HashMap::new();
        for (screener, group) in groups {
            let tickers: Vec<String> = group.iter().map(|s| s.qualified()).collect();
            let ticker_map: HashMap<String, &ClassifiedSymbol> = group
                .iter()
                .map(|s| (s.qualified(), *s))
                .collect();

            let rows = match self.scan(screener, &tickers).await {
                Ok(rows) => rows,
                Err(e) => {
                    // One bucket failing must not sink the others.
                    warn!("[{PROVIDER_ID}] {screener} scan failed: {e}");
                    continue;
                }
            };
            debug!("[{PROVIDER_ID}] {screener}: {} rows for {} tickers", rows.len(), tickers.len());

            for row in rows {
                let Some(sym) = ticker_map.get(&row.s) else {
                    continue;
                };
                if let Some(mut quote) = parse_row(&sym.app_symbol, &row) {
                    quote.currency = sym.category().default_currency().to_string();
                    out.insert(sym.app_symbol.clone(), quote);
                }
            }
        }
        Ok(out)
    }
}
