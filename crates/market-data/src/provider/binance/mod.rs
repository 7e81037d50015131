//! Binance public API provider for crypto.
//!
//! Quotes come from `/ticker/24hr` (one unfiltered call also backs the
//! top-coins listing), history from `/klines`, and the 52-week range on
//! detail pages from 52 weekly candles. Binance publishes every numeric
//! field as a string.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::stream::{self, StreamExt};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{
    AssetCategory, ClassifiedSymbol, HistoryPoint, HistoryRange, HistoryPeriod, Quote,
};
use crate::provider::{build_client, parse_decimal, MarketDataProvider};

const BASE_URL: &str = "https://api.binance.com/api/v3";
const PROVIDER_ID: &str = "BINANCE";
const FANOUT: usize = 4;

pub struct BinanceProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Ticker24h {
    symbol: String,
    #[serde(rename = "lastPrice")]
    last_price: String,
    #[serde(rename = "priceChangePercent")]
    price_change_percent: String,
    #[serde(rename = "quoteVolume")]
    quote_volume: String,
    #[serde(rename = "highPrice", default)]
    high_price: String,
    #[serde(rename = "lowPrice", default)]
    low_price: String,
    #[serde(rename = "openPrice", default)]
    open_price: String,
}

fn quote_from_ticker(app_symbol: &str, t: &Ticker24h) -> Option<Quote> {
    let price = parse_decimal(&t.last_price).filter(|p| *p > Decimal::ZERO)?;
    let mut quote = Quote::new(app_symbol, price, PROVIDER_ID);
    quote.change_percent = parse_decimal(&t.price_change_percent).unwrap_or_default();
    quote.volume = parse_decimal(&t.quote_volume).unwrap_or_default();
    quote.high = parse_decimal(&t.high_price).unwrap_or_default();
    quote.low = parse_decimal(&t.low_price).unwrap_or_default();
    quote.open = parse_decimal(&t.open_price).unwrap_or_default();
    quote.currency = "USD".to_string();
    let base = t.symbol.strip_suffix("USDT").unwrap_or(&t.symbol);
    quote.logo_url = Some(format!(
        "https://assets.coincap.io/assets/icons/{}@2x.png",
        base.to_lowercase()
    ));
    Some(quote)
}

/// Builds the listing from a 24hr snapshot: USDT pairs only, leveraged
/// UP/DOWN tokens dropped, volume descending, truncated to `limit`.
fn top_coins_from(tickers: &[Ticker24h], limit: usize) -> Vec<Quote> {
    let mut coins: Vec<Quote> = tickers
        .iter()
        .filter_map(|t| {
            let base = t.symbol.strip_suffix("USDT")?;
            if base.contains("UP") || base.contains("DOWN") {
                return None;
            }
            quote_from_ticker(base, t)
        })
        .collect();
    coins.sort_by(|a, b| b.volume.cmp(&a.volume));
    coins.truncate(limit);
    coins
}

impl Default for BinanceProvider {
    fn default() -> Self {
        BinanceProvider::new()
    }
}

impl BinanceProvider {
    pub fn new() -> Self {
        BinanceProvider {
            client: build_client(),
            base_url: BASE_URL.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, MarketDataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;
        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                provider: PROVIDER_ID,
                status: resp.status().as_u16(),
            });
        }
        resp.json()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))
    }

    /// Every USDT pair on the exchange, sorted by quote volume
    /// descending and truncated.
    pub async fn top_coins(&self, limit: usize) -> Result<Vec<Quote>, MarketDataError> {
        let url = format!("{}/ticker/24hr", self.base_url);
        let tickers: Vec<Ticker24h> = self.get_json(&url).await?;
        debug!("[{PROVIDER_ID}] {} tickers in 24hr snapshot", tickers.len());
        Ok(top_coins_from(&tickers, limit))
    }

    /// 52-week high/low computed from 52 weekly candles; used to enrich
    /// crypto detail pages.
    pub async fn year_range(
        &self,
        pair: &str,
    ) -> Result<Option<(Decimal, Decimal)>, MarketDataError> {
        let url = format!(
            "{}/klines?symbol={}&interval=1w&limit=52",
            self.base_url, pair
        );
        let klines: Vec<Vec<Value>> = self.get_json(&url).await?;

        let mut high: Option<Decimal> = None;
        let mut low: Option<Decimal> = None;
        for k in &klines {
            let h = k.get(2).and_then(Value::as_str).and_then(parse_decimal);
            let l = k.get(3).and_then(Value::as_str).and_then(parse_decimal);
            if let Some(h) = h {
                high = Some(high.map_or(h, |cur| cur.max(h)));
            }
            if let Some(l) = l {
                low = Some(low.map_or(l, |cur| cur.min(l)));
            }
        }
        Ok(high.zip(low))
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn supports(&self, category: AssetCategory) -> bool {
        category == AssetCategory::Crypto
    }

    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        let results: Vec<(String, Option<Quote>)> = stream::iter(symbols.iter().cloned())
            .map(|sym| async move {
                let url = format!(
                    "{}/ticker/24hr?symbol={}",
                    self.base_url,
                    sym.provider_symbol()
                );
                let quote = match self.get_json::<Ticker24h>(&url).await {
                    Ok(ticker) => quote_from_ticker(&sym.app_symbol, &ticker),
                    Err(e) => {
                        debug!("[{PROVIDER_ID}] {}: {e}", sym.provider_symbol());
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
            if let Some(q) = quote {
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
        let limit = match range.period {
            HistoryPeriod::OneMonth => 30,
            HistoryPeriod::ThreeMonths => 90,
            HistoryPeriod::OneYear => 365,
            // Daily candles cap out at 500 on one request.
            HistoryPeriod::FiveYears => 500,
        };
        let interval = match range.interval.as_str() {
            "1d" | "1w" | "1M" => range.interval.clone(),
            _ => "1d".to_string(),
        };
        let url = format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            symbol.provider_symbol(),
            interval,
            limit,
        );
        // Kline rows: [open time ms, open, high, low, close, volume, ...]
        let klines: Vec<Vec<Value>> = self.get_json(&url).await?;

        let mut points = Vec::with_capacity(klines.len());
        for k in &klines {
            let Some(ts_ms) = k.first().and_then(Value::as_i64) else {
                continue;
            };
            let Some(timestamp) = Utc.timestamp_millis_opt(ts_ms).single() else {
                continue;
            };
            let Some(close) = k.get(4).and_then(Value::as_str).and_then(parse_decimal) else {
                continue;
            };
            let mut point = HistoryPoint::from_close(timestamp, close);
            if let Some(open) = k.get(1).and_then(Value::as_str).and_then(parse_decimal) {
                point.open = open;
            }
            if let Some(high) = k.get(2).and_then(Value::as_str).and_then(parse_decimal) {
                point.high = high;
            }
            if let Some(low) = k.get(3).and_then(Value::as_str).and_then(parse_decimal) {
                point.low = low;
            }
            if let Some(volume) = k.get(5).and_then(Value::as_str).and_then(parse_decimal) {
                point.volume = volume;
            }
            points.push(point);
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ticker(symbol: &str, price: &str) -> Ticker24h {
        Ticker24h {
            symbol: symbol.to_string(),
            last_price: price.to_string(),
            price_change_percent: "1.2".to_string(),
            quote_volume: "1000000".to_string(),
            high_price: "91000".to_string(),
            low_price: "88500".to_string(),
            open_price: "89000".to_string(),
        }
    }

    #[test]
    fn test_quote_from_ticker() {
        let q = quote_from_ticker("BTC", &ticker("BTCUSDT", "90000.5")).expect("quote");
        assert_eq!(q.price, dec!(90000.5));
        assert_eq!(q.change_percent, dec!(1.2));
        assert_eq!(q.currency, "USD");
        assert!(q.logo_url.as_deref().is_some_and(|u| u.contains("btc@2x")));
    }

    #[test]
    fn test_zero_price_ticker_is_absent() {
        assert!(quote_from_ticker("BTC", &ticker("BTCUSDT", "0.00000000")).is_none());
        assert!(quote_from_ticker("BTC", &ticker("BTCUSDT", "garbage")).is_none());
    }

    #[test]
    fn test_top_coins_listing_shape() {
        let mut eth = ticker("ETHUSDT", "3500");
        eth.quote_volume = "2000".to_string();
        let mut btc = ticker("BTCUSDT", "90000");
        btc.quote_volume = "9000".to_string();
        let mut sol = ticker("SOLUSDT", "150");
        sol.quote_volume = "1000".to_string();
        let mut lever = ticker("BTCUPUSDT", "12");
        lever.quote_volume = "99999999".to_string();
        let cross = ticker("ETHBTC", "0.05");

        let coins = top_coins_from(&[eth, btc, sol, lever, cross], 2);
        assert_eq!(coins.len(), 2);
        // Volume descending; leveraged tokens and non-USDT pairs dropped.
        assert_eq!(coins[0].symbol, "BTC");
        assert_eq!(coins[1].symbol, "ETH");
    }
}
