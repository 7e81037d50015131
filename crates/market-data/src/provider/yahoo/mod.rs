//! Yahoo Finance chart API (v8) provider.
//!
//! Quotes come from the 1-day chart metadata (`regularMarketPrice` /
//! `previousClose`); history from the OHLCV arrays of a ranged chart
//! request. Yahoo has no batch endpoint, so quote batches fan out with
//! bounded concurrency.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::stream::{self, StreamExt};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{
    AssetCategory, ClassifiedSymbol, HistoryPoint, HistoryRange, Quote, Venue,
};
use crate::provider::{build_client, MarketDataProvider};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const PROVIDER_ID: &str = "YAHOO";
const FANOUT: usize = 4;

pub struct YahooProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
    #[serde(rename = "chartPreviousClose")]
    chart_previous_close: Option<f64>,
    currency: Option<String>,
    #[serde(rename = "regularMarketVolume")]
    regular_market_volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<OhlcvArrays>,
}

#[derive(Debug, Deserialize)]
struct OhlcvArrays {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Translates a classified symbol into Yahoo's ticker dialect.
fn yahoo_symbol(symbol: &ClassifiedSymbol) -> String {
    let ps = symbol.provider_symbol();
    match symbol.category() {
        AssetCategory::EquityTr => format!("{ps}.IS"),
        AssetCategory::Crypto => {
            let base = ps.strip_suffix("USDT").unwrap_or(ps);
            format!("{base}-USD")
        }
        AssetCategory::Forex => format!("{ps}=X"),
        AssetCategory::Commodity => match ps {
            "XAUUSD" => "GC=F".to_string(),
            "XAGUSD" => "SI=F".to_string(),
            "UKOIL" => "BZ=F".to_string(),
            "USOIL" => "CL=F".to_string(),
            "NATGAS" => "NG=F".to_string(),
            "ZC1!" => "ZC=F".to_string(),
            "ZW1!" => "ZW=F".to_string(),
            "ZS1!" => "ZS=F".to_string(),
            other => other.to_string(),
        },
        AssetCategory::EquityDe => format!("{ps}.DE"),
        AssetCategory::EquityUk => format!("{}.L", ps.trim_end_matches('.')),
        _ => {
            if symbol.classification.venue == Venue::Bist {
                format!("{ps}.IS")
            } else {
                ps.to_string()
            }
        }
    }
}

fn dec(v: f64) -> Decimal {
    Decimal::from_f64_retain(v).unwrap_or_default()
}

impl Default for YahooProvider {
    fn default() -> Self {
        YahooProvider::new()
    }
}

impl YahooProvider {
    pub fn new() -> Self {
        YahooProvider {
            client: build_client(),
            base_url: BASE_URL.to_string(),
        }
    }

    async fn get_chart(&self, url: &str) -> Result<ChartResult, MarketDataError> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;

        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                provider: PROVIDER_ID,
                status: resp.status().as_u16(),
            });
        }

        let body: ChartResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;
        body.chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| MarketDataError::MalformedPayload {
                provider: PROVIDER_ID,
                message: "empty chart result".to_string(),
            })
    }
}

fn quote_from_meta(symbol: &str, meta: &ChartMeta) -> Option<Quote> {
    let price = meta.regular_market_price?;
    let prev = meta
        .previous_close
        .or(meta.chart_previous_close)
        .filter(|p| *p > 0.0);
    let change = prev
        .map(|p| (price - p) / p * 100.0)
        .unwrap_or(0.0);

    let mut quote = Quote::new(symbol, dec(price).round_dp(2), PROVIDER_ID);
    quote.change_percent = dec(change).round_dp(2);
    quote.volume = meta.regular_market_volume.map(dec).unwrap_or_default();
    if let Some(currency) = &meta.currency {
        quote.currency = currency.clone();
    }
    Some(quote)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        5
    }

    fn supports(&self, _category: AssetCategory) -> bool {
        true
    }

    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        let results: Vec<(String, Option<Quote>)> = stream::iter(symbols.iter().cloned())
            .map(|sym| async move {
                let ticker = yahoo_symbol(&sym);
                let url = format!("{}/{}?interval=1m&range=1d", self.base_url, ticker);
                let quote = match self.get_chart(&url).await {
                    Ok(result) => quote_from_meta(&sym.app_symbol, &result.meta),
                    Err(e) => {
                        debug!("[{PROVIDER_ID}] {ticker}: {e}");
                        None
                    }
                };
                (sym.app_symbol, quote)
            })
            .buffer_unordered(FANOUT)
            .collect()
            .await;

        let mut out = HashMap::new();
        for (app_symbol, quote) in results {
            if let Some(mut q) = quote {
                q.currency = if q.currency.is_empty() {
                    "USD".to_string()
                } else {
                    q.currency
                };
                out.insert(app_symbol, q);
            }
        }
        Ok(out)
    }

    async fn fetch_history(
        &self,
        symbol: &ClassifiedSymbol,
        range: &HistoryRange,
    ) -> Result<Vec<HistoryPoint>, MarketDataError> {
        let ticker = yahoo_symbol(symbol);
        let url = format!(
            "{}/{}?period1={}&period2={}&interval={}",
            self.base_url,
            ticker,
            range.start.timestamp(),
            range.end.timestamp(),
            range.interval,
        );
        let result = self.get_chart(&url).await?;

        let timestamps = result.timestamp.unwrap_or_default();
        let arrays = result
            .indicators
            .and_then(|mut i| if i.quote.is_empty() { None } else { Some(i.quote.remove(0)) })
            .ok_or_else(|| MarketDataError::MalformedPayload {
                provider: PROVIDER_ID,
                message: "missing quote indicators".to_string(),
            })?;

        let closes = arrays.close.unwrap_or_default();
        let opens = arrays.open.unwrap_or_default();
        let highs = arrays.high.unwrap_or_default();
        let lows = arrays.low.unwrap_or_default();
        let volumes = arrays.volume.unwrap_or_default();

        let mut points = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            // Rows with a null close are session gaps; skip them.
            let Some(close) = closes.get(i).copied().flatten() else {
                continue;
            };
            let Some(timestamp) = Utc.timestamp_opt(*ts, 0).single() else {
                continue;
            };
            let mut point = HistoryPoint::from_close(timestamp, dec(close));
            if let Some(open) = opens.get(i).copied().flatten() {
                point.open = dec(open);
            }
            if let Some(high) = highs.get(i).copied().flatten() {
                point.high = dec(high);
            }
            if let Some(low) = lows.get(i).copied().flatten() {
                point.low = dec(low);
            }
            if let Some(volume) = volumes.get(i).copied().flatten() {
                point.volume = dec(volume);
            }
            points.push(point);
        }
        Ok(points)
    }
}
