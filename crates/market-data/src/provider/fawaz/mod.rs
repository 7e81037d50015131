//! Keyless currency CDN (fawazahmed0/currency-api).
//!
//! Free, unmetered, daily-granularity TRY rates served from jsDelivr
//! with a Cloudflare Pages mirror. The primary and mirror URLs are
//! tried in order; this is the one provider allowed an internal
//! fallback because the two URLs serve the identical dataset.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, ClassifiedSymbol, Quote};
use crate::provider::{build_client, FxRateSource, MarketDataProvider};

const PRIMARY_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/try.json";
const MIRROR_URL: &str = "https://latest.currency-api.pages.dev/v1/currencies/try.json";
const PROVIDER_ID: &str = "FAWAZ_CDN";

pub struct FawazProvider {
    client: Client,
    urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TryResponse {
    #[serde(rename = "try", default)]
    rates: HashMap<String, f64>,
}

fn invert(rate: f64) -> Option<Decimal> {
    if rate <= 0.0 {
        return None;
    }
    Decimal::from_f64_retain(1.0 / rate).map(|d| d.round_dp(4))
}

impl Default for FawazProvider {
    fn default() -> Self {
        FawazProvider::new()
    }
}

impl FawazProvider {
    pub fn new() -> Self {
        FawazProvider {
            client: build_client(),
            urls: vec![PRIMARY_URL.to_string(), MIRROR_URL.to_string()],
        }
    }

    /// TRY crosses for the given codes, primary URL first, mirror on
    /// any failure.
    pub async fn try_rates(&self, codes: &[&str]) -> Result<Vec<Quote>, MarketDataError> {
        let mut last_err = MarketDataError::MalformedPayload {
            provider: PROVIDER_ID,
            message: "no urls configured".to_string(),
        };
        for url in &self.urls {
            match self.fetch_one(url, codes).await {
                Ok(quotes) if !quotes.is_empty() => return Ok(quotes),
                Ok(_) => {
                    last_err = MarketDataError::MalformedPayload {
                        provider: PROVIDER_ID,
                        message: "empty rate table".to_string(),
                    };
                }
                Err(e) => {
                    debug!("[{PROVIDER_ID}] {url} failed: {e}");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    async fn fetch_one(&self, url: &str, codes: &[&str]) -> Result<Vec<Quote>, MarketDataError> {
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
        let body: TryResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;

        Ok(codes
            .iter()
            .filter_map(|code| {
                let rate = body.rates.get(&code.to_lowercase())?;
                let price = invert(*rate)?;
                let mut quote = Quote::new(*code, price, PROVIDER_ID);
                quote.display_name = format!("{code}/TRY");
                quote.currency = "TRY".to_string();
                quote.recommendation = Some("NEUTRAL".to_string());
                quote.logo_url = Some(format!(
                    "https://s3-symbol-logo.tradingview.com/country/{}.svg",
                    &code[..2].to_lowercase()
                ));
                Some(quote)
            })
            .collect())
    }
}

#[async_trait]
impl FxRateSource for FawazProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_rates(&self, codes: &[&str]) -> Result<Vec<Quote>, MarketDataError> {
        self.try_rates(codes).await
    }
}

#[async_trait]
impl MarketDataProvider for FawazProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        20
    }

    fn supports(&self, category: AssetCategory) -> bool {
        category == AssetCategory::Forex
    }

    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        let codes: Vec<&str> = symbols
            .iter()
            .filter_map(|s| s.provider_symbol().strip_suffix("TRY"))
            .collect();
        let quotes = self.try_rates(&codes).await?;

        let mut out = HashMap::new();
        for quote in quotes {
            if let Some(sym) = symbols
                .iter()
                .find(|s| s.provider_symbol().strip_suffix("TRY") == Some(quote.symbol.as_str()))
            {
                let mut q = quote;
                q.symbol = sym.app_symbol.clone();
                out.insert(sym.app_symbol.clone(), q);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invert() {
        assert_eq!(invert(0.025), Some(dec!(40.0000)));
        assert_eq!(invert(0.0), None);
    }
}
