//! TEFAS (Turkish mutual fund platform) provider.
//!
//! One POST to `BindHistoryInfo` returns the whole fund universe for a
//! date: code, name, unit price and daily return. That single table
//! feeds three things: the classifier's fund registry, the top-funds
//! listing and fund quote lookups.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, ClassifiedSymbol, Quote};
use crate::provider::{build_client, MarketDataProvider};

const BASE_URL: &str = "https://www.tefas.gov.tr/api/DB/BindHistoryInfo";
const PROVIDER_ID: &str = "TEFAS";

pub struct TefasProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct HistoryInfoResponse {
    #[serde(default)]
    data: Vec<FundRow>,
}

#[derive(Debug, Deserialize)]
struct FundRow {
    #[serde(rename = "FONKODU")]
    code: String,
    #[serde(rename = "FONUNVAN", default)]
    name: String,
    #[serde(rename = "FIYAT")]
    price: Option<f64>,
    #[serde(rename = "GUNLUKGETIRI")]
    daily_return: Option<f64>,
}

fn dec(v: Option<f64>) -> Decimal {
    v.and_then(Decimal::from_f64_retain).unwrap_or_default()
}

fn quote_from_row(row: &FundRow) -> Option<Quote> {
    let price = row.price.filter(|p| *p > 0.0)?;
    let mut quote = Quote::new(
        row.code.clone(),
        dec(Some(price)).round_dp(6),
        PROVIDER_ID,
    );
    quote.display_name = row.name.clone();
    quote.change_percent = dec(row.daily_return).round_dp(2);
    quote.currency = "TRY".to_string();
    Some(quote)
}

impl Default for TefasProvider {
    fn default() -> Self {
        TefasProvider::new()
    }
}

impl TefasProvider {
    pub fn new() -> Self {
        TefasProvider {
            client: build_client(),
            base_url: BASE_URL.to_string(),
        }
    }

    async fn fetch_table(&self) -> Result<Vec<FundRow>, MarketDataError> {
        let today = Utc::now().format("%d.%m.%Y").to_string();
        let params = [
            ("fontip", "YAT"),
            ("bastarih", today.as_str()),
            ("bittarih", today.as_str()),
        ];
        let resp = self
            .client
            .post(&self.base_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;
        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                provider: PROVIDER_ID,
                status: resp.status().as_u16(),
            });
        }
        let body: HistoryInfoResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::from_reqwest(PROVIDER_ID, e))?;
        debug!("[{PROVIDER_ID}] {} funds in table", body.data.len());
        Ok(body.data)
    }

    /// Full code-to-name table for the classifier's fund registry.
    pub async fn fetch_registry(&self) -> Result<HashMap<String, String>, MarketDataError> {
        let rows = self.fetch_table().await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.code, row.name))
            .collect())
    }

    /// Best daily performers, for the top-funds listing.
    pub async fn top_funds(&self, limit: usize) -> Result<Vec<Quote>, MarketDataError> {
        let rows = self.fetch_table().await?;
        let mut quotes: Vec<Quote> = rows.iter().filter_map(quote_from_row).collect();
        quotes.sort_by(|a, b| b.change_percent.cmp(&a.change_percent));
        quotes.truncate(limit);
        Ok(quotes)
    }
}

#[async_trait]
impl MarketDataProvider for TefasProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        4
    }

    fn supports(&self, category: AssetCategory) -> bool {
        category == AssetCategory::Fund
    }

    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        let rows = self.fetch_table().await?;
        let wanted: HashMap<&str, &ClassifiedSymbol> = symbols
            .iter()
            .map(|s| (s.provider_symbol(), s))
            .collect();

        let mut out = HashMap::new();
        for row in &rows {
            let Some(sym) = wanted.get(row.code.as_str()) else {
                continue;
            };
            if let Some(mut quote) = quote_from_row(row) {
                quote.symbol = sym.app_symbol.clone();
                out.insert(sym.app_symbol.clone(), quote);
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
    fn test_quote_from_row() {
        let row = FundRow {
            code: "AFA".into(),
            name: "Ak Portfoy Alternatif Enerji".into(),
            price: Some(12.345678),
            daily_return: Some(1.234),
        };
        let q = quote_from_row(&row).expect("quote");
        assert_eq!(q.price, dec!(12.345678));
        assert_eq!(q.change_percent, dec!(1.23));
        assert_eq!(q.currency, "TRY");
    }

    #[test]
    fn test_unpriced_fund_is_absent() {
        let row = FundRow {
            code: "AFA".into(),
            name: String::new(),
            price: None,
            daily_return: None,
        };
        assert!(quote_from_row(&row).is_none());
    }
}
