//! Mynet Finans homepage scrape.
//!
//! The fastest source for the headline Turkish instruments: one GET of
//! the homepage, then a regex scan for the `dynamic-price-{ID}` and
//! `dynamic-direction-{ID}` spans. Numbers are in Turkish locale
//! ("12.200,50"), change percents carry a "%" sign. Only the five
//! summary instruments are mapped; this provider is never asked for
//! anything else.

use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use reqwest::Client;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, ClassifiedSymbol, Quote};
use crate::provider::{build_client, parse_tr_decimal, MarketDataProvider};

const BASE_URL: &str = "https://finans.mynet.com/";
const PROVIDER_ID: &str = "MYNET";

/// (Mynet span id, app symbol) pairs for the headline instruments.
const MAPPINGS: [(&str, &str); 5] = [
    ("XU100", "XU100"),
    ("USDTRY", "USDTRY"),
    ("EURTRY", "EURTRY"),
    ("GAUTRY", "GAUTRY"),
    ("BTCUSD", "BTCUSD"),
];

lazy_static! {
    static ref PRICE_RES: HashMap<&'static str, Regex> = MAPPINGS
        .iter()
        .map(|(id, _)| {
            (
                *id,
                Regex::new(&format!(r"dynamic-price-{id}[^>]*>([^<]+)</span>"))
                    .expect("static pattern"),
            )
        })
        .collect();
    static ref DIRECTION_RES: HashMap<&'static str, Regex> = MAPPINGS
        .iter()
        .map(|(id, _)| {
            (
                *id,
                Regex::new(&format!(r"dynamic-direction-{id}[^>]*>([^<]+)</span>"))
                    .expect("static pattern"),
            )
        })
        .collect();
}

pub struct MynetProvider {
    client: Client,
    base_url: String,
}

impl Default for MynetProvider {
    fn default() -> Self {
        MynetProvider::new()
    }
}

impl MynetProvider {
    pub fn new() -> Self {
        MynetProvider {
            client: build_client(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Scans one page of HTML for every mapped instrument. Spans that
    /// fail to parse are skipped with a warning, not fatal.
    fn extract(&self, html: &str) -> HashMap<String, Quote> {
        let mut out = HashMap::new();
        for (mynet_id, app_symbol) in MAPPINGS {
            let Some(price_caps) = PRICE_RES[mynet_id].captures(html) else {
                continue;
            };
            let Some(price) = parse_tr_decimal(&price_caps[1]) else {
                warn!("[{PROVIDER_ID}] unparseable price span for {mynet_id}");
                continue;
            };
            let change = DIRECTION_RES[mynet_id]
                .captures(html)
                .and_then(|c| parse_tr_decimal(&c[1].replace('%', "")))
                .unwrap_or_default();

            let mut quote = Quote::new(app_symbol, price, PROVIDER_ID);
            quote.change_percent = change;
            quote.currency = if app_symbol.ends_with("TRY") || app_symbol == "XU100" {
                "TRY".to_string()
            } else {
                "USD".to_string()
            };
            out.insert(app_symbol.to_string(), quote);
        }
        out
    }
}

#[async_trait]
impl MarketDataProvider for MynetProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    fn supports(&self, category: AssetCategory) -> bool {
        matches!(category, AssetCategory::EquityTr | AssetCategory::Forex)
    }

    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        let resp = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;

        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                provider: PROVIDER_ID,
                status: resp.status().as_u16(),
            });
        }

        let html = resp
            .text()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;

        let mut extracted = self.extract(&html);
        debug!("[{PROVIDER_ID}] extracted {} of {} instruments", extracted.len(), MAPPINGS.len());

        // Only hand back what was asked for.
        let wanted: Vec<&str> = symbols.iter().map(|s| s.app_symbol.as_str()).collect();
        extracted.retain(|k, _| wanted.contains(&k.as_str()));
        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = concat!(
        r#"<span class="value dynamic-price-XU100">12.245,80</span>"#,
        r#"<span class="ratio dynamic-direction-XU100">%0,52</span>"#,
        r#"<span class="value dynamic-price-USDTRY">43,12</span>"#,
        r#"<span class="ratio dynamic-direction-USDTRY">%-0,08</span>"#,
        r#"<span class="value dynamic-price-GAUTRY">4.512,33</span>"#,
    );

    #[test]
    fn test_extract_parses_turkish_locale_spans() {
        let p = MynetProvider::new();
        let got = p.extract(SAMPLE);

        let xu = &got["XU100"];
        assert_eq!(xu.price, dec!(12245.80));
        assert_eq!(xu.change_percent, dec!(0.52));
        assert_eq!(xu.currency, "TRY");

        let usd = &got["USDTRY"];
        assert_eq!(usd.price, dec!(43.12));
        assert_eq!(usd.change_percent, dec!(-0.08));

        // Direction span missing: change defaults to zero.
        let gau = &got["GAUTRY"];
        assert_eq!(gau.price, dec!(4512.33));
        assert_eq!(gau.change_percent, dec!(0));

        // Instruments not on the page are simply absent.
        assert!(!got.contains_key("BTCUSD"));
    }
}
