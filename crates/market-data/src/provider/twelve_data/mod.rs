//! Twelve Data provider.
//!
//! Batch quotes via `/quote`, with symbols translated through a local
//! symbol master (exchange MIC qualification for stocks, "/TRY" pairing
//! for bare currency codes). The master itself is synced daily from the
//! `/stocks`, `/forex_pairs` and `/commodities` listings and
//! materialized to a JSON file so restarts do not spend API credits.
//! The whole provider is metered and credential-gated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{AssetCategory, ClassifiedSymbol, Quote};
use crate::provider::{build_client, parse_decimal, MarketDataProvider};

const BASE_URL: &str = "https://api.twelvedata.com";
const PROVIDER_ID: &str = "TWELVE_DATA";
pub const API_KEY_SETTING: &str = "TWELVEDATA_API_KEY";

/// One row of the symbol master.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MasterEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub mic_code: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// The materialized symbol universe, keyed by bare symbol.
pub struct SymbolMaster {
    path: PathBuf,
    entries: RwLock<HashMap<String, MasterEntry>>,
}

impl SymbolMaster {
    /// Opens the master at `path`, loading the previous snapshot if one
    /// exists on disk.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        SymbolMaster {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(e) => e.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, symbol: &str) -> Option<MasterEntry> {
        match self.entries.read() {
            Ok(e) => e.get(symbol).cloned(),
            Err(poisoned) => poisoned.into_inner().get(symbol).cloned(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory snapshot and persists it.
    pub fn replace(&self, entries: HashMap<String, MasterEntry>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string(&entries)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, serialized)?;
        match self.entries.write() {
            Ok(mut guard) => *guard = entries,
            Err(poisoned) => *poisoned.into_inner() = entries,
        }
        Ok(())
    }
}

pub struct TwelveDataProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    master: std::sync::Arc<SymbolMaster>,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Vec<Value>,
}

impl TwelveDataProvider {
    pub fn new(api_key: Option<String>, master: std::sync::Arc<SymbolMaster>) -> Self {
        TwelveDataProvider {
            client: build_client(),
            base_url: BASE_URL.to_string(),
            api_key,
            master,
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

    /// Translates a bare symbol into Twelve Data's request dialect using
    /// the master: MIC-qualified for listed stocks, TRY-paired for bare
    /// currency codes.
    fn target_symbol(&self, sym: &ClassifiedSymbol) -> String {
        let bare = sym.provider_symbol();
        if let Some(entry) = self.master.get(bare) {
            if !entry.mic_code.is_empty() {
                return format!("{bare}:{}", entry.mic_code);
            }
            if entry.kind == "Forex" && !bare.contains('/') {
                return format!("{bare}/TRY");
            }
        }
        if sym.category() == AssetCategory::Forex && bare.len() == 6 {
            let (base, quote) = bare.split_at(3);
            return format!("{base}/{quote}");
        }
        bare.to_string()
    }

    fn parse_quote(app_symbol: &str, q: &Value) -> Option<Quote> {
        let price = q
            .get("price")
            .or_else(|| q.get("close"))
            .and_then(Value::as_str)
            .and_then(parse_decimal)
            .filter(|p| p.is_sign_positive() && !p.is_zero())?;
        let mut quote = Quote::new(app_symbol, price, PROVIDER_ID);
        if let Some(name) = q.get("name").and_then(Value::as_str) {
            quote.display_name = name.to_string();
        }
        if let Some(change) = q
            .get("percent_change")
            .and_then(Value::as_str)
            .and_then(parse_decimal)
        {
            quote.change_percent = change.round_dp(2);
        }
        if let Some(volume) = q.get("volume").and_then(Value::as_str).and_then(parse_decimal) {
            quote.volume = volume;
        }
        if let Some(high) = q.get("high").and_then(Value::as_str).and_then(parse_decimal) {
            quote.high = high;
        }
        if let Some(low) = q.get("low").and_then(Value::as_str).and_then(parse_decimal) {
            quote.low = low;
        }
        if let Some(open) = q.get("open").and_then(Value::as_str).and_then(parse_decimal) {
            quote.open = open;
        }
        if let Some(currency) = q.get("currency").and_then(Value::as_str) {
            quote.currency = currency.to_string();
        }
        Some(quote)
    }

    /// Daily symbol-master sync: stock listings for the four covered
    /// countries plus forex pairs and commodities, written through to
    /// the JSON file. Returns the number of entries synced.
    pub async fn sync_symbol_master(&self) -> Result<usize, MarketDataError> {
        let key = self.key()?;
        let mut entries: HashMap<String, MasterEntry> = HashMap::new();

        for country in ["Turkey", "United States", "Germany", "United Kingdom"] {
            let url = format!(
                "{}/stocks?country={}&apikey={}",
                self.base_url,
                country.replace(' ', "%20"),
                key
            );
            let listing: ListingResponse = self.get_json(&url).await?;
            if listing.status != "ok" {
                warn!("[{PROVIDER_ID}] stocks listing for {country} not ok");
                continue;
            }
            for item in &listing.data {
                let Some(symbol) = item.get("symbol").and_then(Value::as_str) else {
                    continue;
                };
                entries.insert(
                    symbol.to_string(),
                    MasterEntry {
                        name: str_field(item, "name"),
                        currency: str_field(item, "currency"),
                        exchange: str_field(item, "exchange"),
                        mic_code: str_field(item, "mic_code"),
                        kind: str_field(item, "type"),
                    },
                );
            }
        }

        let url = format!("{}/forex_pairs?apikey={}", self.base_url, key);
        let listing: ListingResponse = self.get_json(&url).await?;
        if listing.status == "ok" {
            for item in &listing.data {
                let Some(symbol) = item.get("symbol").and_then(Value::as_str) else {
                    continue;
                };
                entries.insert(
                    symbol.to_string(),
                    MasterEntry {
                        name: str_field(item, "currency_base"),
                        currency: str_field(item, "currency_quote"),
                        kind: "Forex".to_string(),
                        ..Default::default()
                    },
                );
            }
        }

        let url = format!("{}/commodities?apikey={}", self.base_url, key);
        let listing: ListingResponse = self.get_json(&url).await?;
        if listing.status == "ok" {
            for item in &listing.data {
                let Some(symbol) = item.get("symbol").and_then(Value::as_str) else {
                    continue;
                };
                entries.insert(
                    symbol.to_string(),
                    MasterEntry {
                        name: str_field(item, "name"),
                        kind: "Commodity".to_string(),
                        ..Default::default()
                    },
                );
            }
        }

        let count = entries.len();
        self.master.replace(entries).map_err(|e| {
            MarketDataError::Parse(format!("symbol master persist failed: {e}"))
        })?;
        info!("[{PROVIDER_ID}] symbol master synced, {count} entries");
        Ok(count)
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
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

#[async_trait]
impl MarketDataProvider for TwelveDataProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        8
    }

    fn supports(&self, category: AssetCategory) -> bool {
        !matches!(category, AssetCategory::Fund | AssetCategory::Crypto)
    }

    async fn fetch_quotes(
        &self,
        symbols: &[ClassifiedSymbol],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        let key = self.key()?;
        let target_map: HashMap<String, &ClassifiedSymbol> = symbols
            .iter()
            .map(|s| (self.target_symbol(s), s))
            .collect();
        let joined = target_map.keys().cloned().collect::<Vec<_>>().join(",");

        let url = format!("{}/quote?symbol={}&apikey={}", self.base_url, joined, key);
        let body: Value = self.get_json(&url).await?;

        if body.get("status").and_then(Value::as_str) == Some("error") {
            return Err(MarketDataError::MalformedPayload {
                provider: PROVIDER_ID,
                message: str_field(&body, "message"),
            });
        }

        let mut out = HashMap::new();
        // A single-symbol request answers with the quote object itself;
        // batches answer with a map keyed by target symbol.
        if body.get("symbol").is_some() {
            if let Some((_, sym)) = target_map.iter().next() {
                if let Some(quote) = Self::parse_quote(&sym.app_symbol, &body) {
                    out.insert(sym.app_symbol.clone(), quote);
                }
            }
        } else if let Some(map) = body.as_object() {
            for (target, quote_data) in map {
                let Some(sym) = target_map.get(target) else {
                    continue;
                };
                if quote_data.get("status").and_then(Value::as_str) == Some("error") {
                    continue;
                }
                if let Some(quote) = Self::parse_quote(&sym.app_symbol, quote_data) {
                    out.insert(sym.app_symbol.clone(), quote);
                }
            }
        }
        debug!("[{PROVIDER_ID}] resolved {} of {} symbols", out.len(), symbols.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{FundRegistry, SymbolClassifier};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn classify(sym: &str) -> ClassifiedSymbol {
        SymbolClassifier::new(Arc::new(FundRegistry::new())).classify(sym)
    }

    fn provider_with_master(entries: HashMap<String, MasterEntry>) -> TwelveDataProvider {
        let dir = std::env::temp_dir().join(format!("td-master-{}", std::process::id()));
        let master = SymbolMaster::open(dir.join("symbols.json"));
        let _ = master.replace(entries);
        TwelveDataProvider::new(Some("k".into()), Arc::new(master))
    }

    #[test]
    fn test_target_symbol_uses_master_mic() {
        let provider = provider_with_master(HashMap::from([(
            "THYAO".to_string(),
            MasterEntry {
                mic_code: "XIST".to_string(),
                ..Default::default()
            },
        )]));
        assert_eq!(provider.target_symbol(&classify("THYAO")), "THYAO:XIST");
        // Forex pairs split into base/quote.
        assert_eq!(provider.target_symbol(&classify("USD")), "USD/TRY");
        // Unknown symbols pass through bare.
        assert_eq!(provider.target_symbol(&classify("ORCL")), "ORCL");
    }

    #[test]
    fn test_parse_quote_string_numerics() {
        let q = json!({
            "symbol": "THYAO",
            "name": "Turk Hava Yollari",
            "price": "312.50",
            "percent_change": "1.85",
            "volume": "1500000",
            "currency": "TRY"
        });
        let quote = TwelveDataProvider::parse_quote("THYAO", &q).expect("quote");
        assert_eq!(quote.price, dec!(312.50));
        assert_eq!(quote.change_percent, dec!(1.85));
        assert_eq!(quote.currency, "TRY");
        assert_eq!(quote.display_name, "Turk Hava Yollari");
    }

    #[test]
    fn test_parse_quote_rejects_zero() {
        let q = json!({"symbol": "X", "price": "0.00"});
        assert!(TwelveDataProvider::parse_quote("X", &q).is_none());
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let master = Arc::new(SymbolMaster::open(
            std::env::temp_dir().join("td-none.json"),
        ));
        let provider = TwelveDataProvider::new(None, master);
        let err = provider.fetch_quotes(&[classify("AAPL")]).await.expect_err("no key");
        assert!(matches!(err, MarketDataError::MissingCredential { .. }));
    }
}
