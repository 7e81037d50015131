//! Financial Modeling Prep provider.
//!
//! Batch quotes via `/quote/{symbols}` (one request, one API credit) and
//! daily history via `/historical-price-full`. Requires an API key; the
//! credential gate fires before any network call so a keyless deployment
//! just skips this link of the chain.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{
    AssetCategory, ClassifiedSymbol, HistoryPoint, HistoryRange, Quote,
};
use crate::provider::{build_client, MarketDataProvider};

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
const PROVIDER_ID: &str = "FMP";
pub const API_KEY_SETTING: &str = "FMP_API_KEY";

pub struct FmpProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FmpQuote {
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    price: Option<f64>,
    #[serde(rename = "changesPercentage")]
    changes_percentage: Option<f64>,
    volume: Option<f64>,
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
    #[serde(rename = "dayHigh")]
    day_high: Option<f64>,
    #[serde(rename = "dayLow")]
    day_low: Option<f64>,
    open: Option<f64>,
    #[serde(rename = "yearHigh")]
    year_high: Option<f64>,
    #[serde(rename = "yearLow")]
    year_low: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    #[serde(default)]
    historical: Vec<HistoricalRow>,
}

#[derive(Debug, Deserialize)]
struct HistoricalRow {
    /// "YYYY-MM-DD"
    date: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

fn dec(v: Option<f64>) -> Decimal {
    v.and_then(Decimal::from_f64_retain).unwrap_or_default()
}

/// FMP's ticker dialect for a classified symbol.
fn fmp_symbol(symbol: &ClassifiedSymbol) -> String {
    let ps = symbol.provider_symbol();
    match symbol.category() {
        AssetCategory::EquityTr => format!("{ps}.IS"),
        AssetCategory::Crypto => {
            let base = ps.strip_suffix("USDT").unwrap_or(ps);
            format!("{base}USD")
        }
        AssetCategory::Commodity => match ps {
            "XAUUSD" => "GCUSD".to_string(),
            "XAGUSD" => "SIUSD".to_string(),
            "UKOIL" => "BZUSD".to_string(),
            "USOIL" => "CLUSD".to_string(),
            "NATGAS" => "NGUSD".to_string(),
            other => other.to_string(),
        },
        _ => ps.to_string(),
    }
}

impl FmpProvider {
    pub fn new(api_key: Option<String>) -> Self {
        FmpProvider {
            client: build_client(),
            base_url: BASE_URL.to_string(),
            api_key,
        }
    }

    fn key(&self) -> Result<&str, MarketDataError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(MarketDataError::MissingCredential {
                key: API_KEY_SETTING,
            })
    }

    fn quote_from(&self, app_symbol: &str, item: &FmpQuote) -> Option<Quote> {
        let price = item.price.filter(|p| *p > 0.0)?;
        let mut quote = Quote::new(app_symbol, dec(Some(price)).round_dp(4), PROVIDER_ID);
        quote.display_name = item
            .name
            .clone()
            .unwrap_or_else(|| app_symbol.to_string());
        quote.change_percent = dec(item.changes_percentage).round_dp(2);
        quote.volume = dec(item.volume);
        quote.market_cap = dec(item.market_cap);
        quote.high = dec(item.day_high);
        quote.low = dec(item.day_low);
        quote.open = dec(item.open);
        quote.high_52w = item.year_high.and_then(Decimal::from_f64_retain);
        quote.low_52w = item.year_low.and_then(Decimal::from_f64_retain);
        quote.logo_url = Some(format!(
            "https://financialmodelingprep.com/image-stock/{}.png",
            item.symbol
        ));
        Some(quote)
    }
}

#[async_trait]
impl MarketDataProvider for FmpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        3
    }

    fn supports(&self, category: AssetCategory) -> bool {
        // Funds are TEFAS-only territory.
        category != AssetCategory::Fund
    }

    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        let key = self.key()?;
        // FMP strips nothing and answers keyed by its own dialect, so
        // keep a reverse map to hand results back under app symbols.
        let dialect_map: HashMap<String, &ClassifiedSymbol> = symbols
            .iter()
            .map(|s| (fmp_symbol(s), s))
            .collect();
        let joined = dialect_map
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(",");

        let url = format!("{}/quote/{}?apikey={}", self.base_url, joined, key);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;

        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                provider: PROVIDER_ID,
                status: resp.status().as_u16(),
            });
        }

        let items: Vec<FmpQuote> = resp
            .json()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;
        debug!("[{PROVIDER_ID}] {} rows for {} symbols", items.len(), symbols.len());

        let mut out = HashMap::new();
        for item in &items {
            let Some(sym) = dialect_map.get(&item.symbol) else {
                continue;
            };
            if let Some(mut quote) = self.quote_from(&sym.app_symbol, item) {
                quote.currency = sym.category().default_currency().to_string();
                out.insert(sym.app_symbol.clone(), quote);
            }
        }
        Ok(out)
    }

    async fn fetch_history(
        &self,
        symbol: &ClassifiedSymbol,
        _range: &HistoryRange,
    ) -> Result<Vec<HistoryPoint>, MarketDataError> {
        let key = self.key()?;
        let url = format!(
            "{}/historical-price-full/{}?apikey={}&serietype=line",
            self.base_url,
            fmp_symbol(symbol),
            key,
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;

        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                provider: PROVIDER_ID,
                status: resp.status().as_u16(),
            });
        }

        let body: HistoricalResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;

        // FMP answers newest-first; the aggregator re-sorts ascending.
        let mut points = Vec::new();
        for row in body.historical {
            let Some(close) = row.close.filter(|c| *c > 0.0) else {
                continue;
            };
            let Ok(date) = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d") else {
                continue;
            };
            let Some(naive) = date.and_hms_opt(0, 0, 0) else {
                continue;
            };
            let timestamp = Utc.from_utc_datetime(&naive);
            let mut point = HistoryPoint::from_close(timestamp, dec(Some(close)));
            if let Some(open) = row.open {
                point.open = dec(Some(open));
            }
            if let Some(high) = row.high {
                point.high = dec(Some(high));
            }
            if let Some(low) = row.low {
                point.low = dec(Some(low));
            }
            point.volume = dec(row.volume);
            points.push(point);
        }
        Ok(points)
    }
}
