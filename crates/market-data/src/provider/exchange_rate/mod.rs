//! exchangerate-api.com v6 provider.
//!
//! One `latest/TRY` request returns 1 TRY in every currency; rates are
//! inverted into the X/TRY quotes the FX table serves. The free tier
//! refreshes once a day and publishes no change percent, which is why
//! tables built from this source are cached for 24 hours.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, ClassifiedSymbol, Quote};
use crate::provider::{build_client, FxRateSource, MarketDataProvider};

const BASE_URL: &str = "https://v6.exchangerate-api.com/v6";
const PROVIDER_ID: &str = "EXCHANGE_RATE_API";
pub const API_KEY_SETTING: &str = "EXCHANGERATE_API_KEY";

pub struct ExchangeRateProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    result: String,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

/// Inverts a 1-TRY-in-X rate into an X/TRY price, 4 decimal places.
fn invert(rate: f64) -> Option<Decimal> {
    if rate <= 0.0 {
        return None;
    }
    Decimal::from_f64_retain(1.0 / rate).map(|d| d.round_dp(4))
}

fn fx_quote(code: &str, price: Decimal) -> Quote {
    let mut quote = Quote::new(code, price, PROVIDER_ID);
    quote.display_name = format!("{code}/TRY");
    quote.currency = "TRY".to_string();
    quote.recommendation = Some("NEUTRAL".to_string());
    quote.logo_url = Some(format!(
        "https://s3-symbol-logo.tradingview.com/country/{}.svg",
        &code[..2].to_lowercase()
    ));
    quote
}

impl ExchangeRateProvider {
    pub fn new(api_key: Option<String>) -> Self {
        ExchangeRateProvider {
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

    /// Fetches the full TRY table once and inverts the requested codes.
    pub async fn try_rates(&self, codes: &[&str]) -> Result<Vec<Quote>, MarketDataError> {
        let key = self.key()?;
        let url = format!("{}/{}/latest/TRY", self.base_url, key);
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
        let body: LatestResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;
        if body.result != "success" {
            return Err(MarketDataError::MalformedPayload {
                provider: PROVIDER_ID,
                message: format!("result = {}", body.result),
            });
        }

        let quotes: Vec<Quote> = codes
            .iter()
            .filter_map(|code| {
                let rate = body.conversion_rates.get(*code)?;
                Some(fx_quote(code, invert(*rate)?))
            })
            .collect();
        debug!("[{PROVIDER_ID}] inverted {} of {} codes", quotes.len(), codes.len());
        Ok(quotes)
    }
}

#[async_trait]
impl FxRateSource for ExchangeRateProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_rates(&self, codes: &[&str]) -> Result<Vec<Quote>, MarketDataError> {
        self.try_rates(codes).await
    }
}

#[async_trait]
impl MarketDataProvider for ExchangeRateProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        15
    }

    fn supports(&self, category: AssetCategory) -> bool {
        category == AssetCategory::Forex
    }

    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        // The table request only carries TRY crosses; peel the base code
        // off each classified pair.
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
    fn test_invert_rounds_to_four_places() {
        // 1 TRY = 0.0232 USD means 1 USD = 43.1034 TRY.
        assert_eq!(invert(0.0232), Some(dec!(43.1034)));
        assert_eq!(invert(0.0), None);
        assert_eq!(invert(-1.0), None);
    }

    #[test]
    fn test_fx_quote_shape() {
        let q = fx_quote("USD", dec!(43.10));
        assert_eq!(q.display_name, "USD/TRY");
        assert_eq!(q.currency, "TRY");
        assert_eq!(q.change_percent, Decimal::ZERO);
        assert_eq!(q.recommendation.as_deref(), Some("NEUTRAL"));
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let provider = ExchangeRateProvider::new(None);
        let err = provider.try_rates(&["USD"]).await.expect_err("no key");
        assert!(matches!(err, MarketDataError::MissingCredential { .. }));
    }
}
