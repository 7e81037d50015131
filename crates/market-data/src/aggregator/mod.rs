//! The aggregation facade.
//!
//! One `Aggregator` instance owns the provider chains, the TTL caches,
//! the classifier and the static fallback table. Every public method is
//! cache-first, absorbs provider failures as absence, and never returns
//! an error for a data-quality problem.

mod chain;
mod static_fallback;

pub use chain::{resolve_history, resolve_quotes};
pub use static_fallback::{fallback_price, fallback_quote, summary_keys, GRAMS_PER_TROY_OUNCE};

use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};
use rust_decimal::Decimal;

use crate::cache::{
    MarketCache, TTL_ANALYSIS, TTL_COMMODITIES, TTL_FX_TABLE_FALLBACK, TTL_SUMMARY,
};
use crate::classifier::{FundRegistry, SymbolClassifier, FX_TABLE_CODES};
use crate::errors::MarketDataError;
use crate::models::{ClassifiedSymbol, AssetCategory, HistoryPeriod, HistoryPoint, HistoryRange, Quote};
use crate::provider::binance::BinanceProvider;
use crate::provider::exchange_rate::ExchangeRateProvider;
use crate::provider::fawaz::FawazProvider;
use crate::provider::fmp::FmpProvider;
use crate::provider::mynet::MynetProvider;
use crate::provider::tefas::TefasProvider;
use crate::provider::tradingview::TradingViewProvider;
use crate::provider::twelve_data::TwelveDataProvider;
use crate::provider::yahoo::YahooProvider;
use crate::provider::{FxRateSource, MarketDataProvider};

/// Mynet instrument to summary key mapping.
const SUMMARY_SOURCES: [(&str, &str); 5] = [
    ("XU100", "bist100"),
    ("USDTRY", "dolar"),
    ("EURTRY", "euro"),
    ("GAUTRY", "gram_altin"),
    ("BTCUSD", "bitcoin"),
];

/// Globally sourced summary keys re-checked when the scrape left them
/// at the static value.
const SUMMARY_REQUERY: [(&str, &str); 2] = [("BTC", "bitcoin"), ("GOLD", "ons_altin")];

/// Curated listing sets. BIST majors and US large caps for stocks; the
/// ETF and bond sets mirror the product's NYSE curation.
const STOCK_SET: [&str; 18] = [
    "THYAO", "GARAN", "AKBNK", "EREGL", "ASELS", "BIMAS", "TUPRS", "KCHOL", "SISE", "SAHOL",
    "PETKM", "AAPL", "TSLA", "MSFT", "AMZN", "GOOGL", "NVDA", "META",
];
const COMMODITY_SET: [&str; 3] = ["GOLD", "SILVER", "BRENT"];
const ETF_SET: [&str; 6] = ["SPY", "VOO", "GLD", "SLV", "VTI", "IVV"];
const BOND_SET: [&str; 5] = ["AGG", "LQD", "HYG", "BND", "TLT"];

/// Derives the gram-gold price from the ounce price and the USD/TRY
/// rate, rounded to two decimal places.
pub fn derive_gram_gold(ons_usd: Decimal, usdtry: Decimal) -> Decimal {
    (ons_usd / GRAMS_PER_TROY_OUNCE * usdtry).round_dp(2)
}

/// The full provider set, constructed once at startup and injected.
pub struct Providers {
    pub mynet: Arc<MynetProvider>,
    pub yahoo: Arc<YahooProvider>,
    pub binance: Arc<BinanceProvider>,
    pub tradingview: Arc<TradingViewProvider>,
    pub fmp: Arc<FmpProvider>,
    pub tefas: Arc<TefasProvider>,
    pub twelve_data: Arc<TwelveDataProvider>,
    pub exchange_rate: Arc<ExchangeRateProvider>,
    pub fawaz: Arc<FawazProvider>,
}

pub struct Aggregator {
    classifier: SymbolClassifier,
    cache: MarketCache,
    fund_registry: Arc<FundRegistry>,
    providers: Providers,
    /// General quote chain, priority-ordered inside `resolve_quotes`.
    quote_chain: Vec<Arc<dyn MarketDataProvider>>,
    /// Detail/analysis chain for non-crypto symbols.
    detail_chain: Vec<Arc<dyn MarketDataProvider>>,
    history_crypto: Vec<Arc<dyn MarketDataProvider>>,
    history_default: Vec<Arc<dyn MarketDataProvider>>,
    /// Single-scrape source overlaid on the summary seed.
    summary_overlay: Arc<dyn MarketDataProvider>,
    /// Chain consulted for globals still at their fallback value.
    summary_requery: Vec<Arc<dyn MarketDataProvider>>,
    /// FX table: live chain first, whole-table daily sources after.
    fx_chain: Vec<Arc<dyn MarketDataProvider>>,
    fx_fallbacks: Vec<Arc<dyn FxRateSource>>,
}

impl Aggregator {
    pub fn new(providers: Providers, fund_registry: Arc<FundRegistry>) -> Self {
        let quote_chain: Vec<Arc<dyn MarketDataProvider>> = vec![
            providers.binance.clone(),
            providers.fmp.clone(),
            providers.tefas.clone(),
            providers.yahoo.clone(),
            providers.tradingview.clone(),
            providers.twelve_data.clone(),
        ];
        let detail_chain: Vec<Arc<dyn MarketDataProvider>> = vec![
            providers.fmp.clone(),
            providers.yahoo.clone(),
            providers.tradingview.clone(),
        ];
        let history_crypto: Vec<Arc<dyn MarketDataProvider>> = vec![
            providers.binance.clone(),
            providers.yahoo.clone(),
        ];
        let history_default: Vec<Arc<dyn MarketDataProvider>> = vec![
            providers.fmp.clone(),
            providers.yahoo.clone(),
        ];
        let summary_overlay: Arc<dyn MarketDataProvider> = providers.mynet.clone();
        let summary_requery: Vec<Arc<dyn MarketDataProvider>> = vec![providers.yahoo.clone()];
        let fx_chain: Vec<Arc<dyn MarketDataProvider>> = vec![providers.tradingview.clone()];
        let fx_fallbacks: Vec<Arc<dyn FxRateSource>> = vec![
            providers.exchange_rate.clone(),
            providers.fawaz.clone(),
        ];
        Aggregator {
            classifier: SymbolClassifier::new(fund_registry.clone()),
            cache: MarketCache::new(),
            fund_registry,
            providers,
            quote_chain,
            detail_chain,
            history_crypto,
            history_default,
            summary_overlay,
            summary_requery,
            fx_chain,
            fx_fallbacks,
        }
    }

    pub fn classifier(&self) -> &SymbolClassifier {
        &self.classifier
    }

    /// The headline dashboard map. Static fallback seeded first, Mynet
    /// overlaid, globals re-checked against Yahoo, gram gold derived
    /// when no live feed supplied it. Never returns a zero price.
    pub async fn market_summary(&self) -> HashMap<String, Quote> {
        if let Some(cached) = self.cache.summary.get("summary") {
            return cached;
        }

        // 1. Seed every key from the static table.
        let mut res: HashMap<String, Quote> = summary_keys()
            .filter_map(|k| fallback_quote(k).map(|q| (k.to_string(), q)))
            .collect();

        // 2. Overlay the single-request Mynet scrape.
        let mynet_symbols: Vec<ClassifiedSymbol> = SUMMARY_SOURCES
            .iter()
            .map(|(sym, _)| self.classifier.classify(sym))
            .collect();
        match self.summary_overlay.fetch_quotes(&mynet_symbols).await {
            Ok(scraped) => {
                for (mynet_sym, key) in SUMMARY_SOURCES {
                    if let Some(quote) = scraped.get(mynet_sym) {
                        if quote.is_valid() {
                            let mut q = quote.clone();
                            q.symbol = key.to_string();
                            res.insert(key.to_string(), q);
                        }
                    }
                }
            }
            Err(e) => warn!("summary: scrape overlay failed: {e}"),
        }

        // 3. Globals still at their fallback value get one pass through
        // the requery chain.
        let stale: Vec<(ClassifiedSymbol, &str)> = SUMMARY_REQUERY
            .iter()
            .filter(|(_, key)| self.is_still_fallback(&res, key))
            .map(|(sym, key)| (self.classifier.classify(sym), *key))
            .collect();
        if !stale.is_empty() {
            let symbols: Vec<ClassifiedSymbol> =
                stale.iter().map(|(sym, _)| sym.clone()).collect();
            let answers = resolve_quotes(&self.summary_requery, &symbols).await;
            for (sym, key) in &stale {
                if let Some(quote) = answers.get(&sym.app_symbol) {
                    let mut q = quote.clone();
                    q.symbol = key.to_string();
                    res.insert(key.to_string(), q);
                }
            }
        }

        // 4. Gram gold: derive from ounce and USD/TRY when nothing live
        // covered it.
        if self.is_still_fallback(&res, "gram_altin") {
            let usd = res.get("dolar").map(|q| q.price).unwrap_or_default();
            let ons = res.get("ons_altin").cloned();
            if let Some(ons) = ons {
                if usd > Decimal::ZERO && ons.price > Decimal::ZERO {
                    let mut derived = Quote::new("gram_altin", derive_gram_gold(ons.price, usd), "derived");
                    derived.change_percent = ons.change_percent;
                    derived.currency = "TRY".to_string();
                    res.insert("gram_altin".to_string(), derived);
                }
            }
        }

        self.cache.summary.set("summary", res.clone(), TTL_SUMMARY);
        res
    }

    fn is_still_fallback(&self, res: &HashMap<String, Quote>, key: &str) -> bool {
        match (res.get(key), fallback_price(key)) {
            (Some(quote), Some(price)) => quote.source == "fallback" || quote.price == price,
            _ => true,
        }
    }

    /// Resolves a batch of app symbols through the general chain; every
    /// requested symbol gets a row, unresolvable ones as the sentinel.
    pub async fn quote_batch(&self, symbols: &[String]) -> Vec<Quote> {
        let classified: Vec<ClassifiedSymbol> =
            symbols.iter().map(|s| self.classifier.classify(s)).collect();
        let resolved = resolve_quotes(&self.quote_chain, &classified).await;
        classified
            .iter()
            .map(|sym| {
                resolved
                    .get(&sym.app_symbol)
                    .cloned()
                    .unwrap_or_else(|| Quote::unknown(&sym.app_symbol))
            })
            .collect()
    }

    /// Single-symbol detail record. Crypto goes Binance-first with the
    /// 52-week range stitched in; everything else walks the detail
    /// chain. Exhaustion yields the sentinel, never an error.
    pub async fn asset_detail(&self, symbol: &str) -> Quote {
        let classified = self.classifier.classify(symbol);
        if let Some(cached) = self.cache.analysis.get(&classified.app_symbol) {
            return cached;
        }

        let mut quote = if classified.category() == AssetCategory::Crypto {
            self.crypto_detail(&classified).await
        } else {
            resolve_quotes(&self.detail_chain, std::slice::from_ref(&classified))
                .await
                .remove(&classified.app_symbol)
        }
        .unwrap_or_else(|| Quote::unknown(&classified.app_symbol));

        if quote.is_valid() {
            quote.symbol = classified.app_symbol.clone();
            self.cache
                .analysis
                .set(classified.app_symbol.as_str(), quote.clone(), TTL_ANALYSIS);
        }
        quote
    }

    async fn crypto_detail(&self, classified: &ClassifiedSymbol) -> Option<Quote> {
        let chain: Vec<Arc<dyn MarketDataProvider>> = vec![
            self.providers.binance.clone() as Arc<dyn MarketDataProvider>,
            self.providers.yahoo.clone(),
            self.providers.tradingview.clone(),
        ];
        let mut quote = resolve_quotes(&chain, std::slice::from_ref(classified))
            .await
            .remove(&classified.app_symbol)?;
        // 52-week range from weekly candles; purely additive.
        if quote.source == self.providers.binance.id() {
            match self.providers.binance.year_range(classified.provider_symbol()).await {
                Ok(Some((high, low))) => {
                    quote.high_52w = Some(high);
                    quote.low_52w = Some(low);
                }
                Ok(None) => {}
                Err(e) => warn!("crypto detail: year range failed: {e}"),
            }
        }
        Some(quote)
    }

    /// Historical series for charting, oldest first. One provider's
    /// series, never a cross-provider merge.
    pub async fn history(
        &self,
        symbol: &str,
        period: &str,
        interval: Option<&str>,
    ) -> Vec<HistoryPoint> {
        let classified = self.classifier.classify(symbol);
        let period = HistoryPeriod::parse(period);
        let range = HistoryRange::from_period(period, interval);
        let cache_key = format!(
            "{}:{}:{}",
            classified.app_symbol,
            period.as_str(),
            range.interval
        );
        if let Some(cached) = self.cache.history.get(&cache_key) {
            return cached;
        }

        let chain = if classified.category() == AssetCategory::Crypto {
            &self.history_crypto
        } else {
            &self.history_default
        };
        let points = resolve_history(chain, &classified, &range).await;
        if !points.is_empty() {
            self.cache.history.set(cache_key, points.clone(), TTL_ANALYSIS);
        }
        points
    }

    pub async fn stock_list(&self) -> Vec<Quote> {
        self.listing("stocks", &STOCK_SET, TTL_SUMMARY).await
    }

    pub async fn commodity_list(&self) -> Vec<Quote> {
        self.listing("commodities", &COMMODITY_SET, TTL_COMMODITIES).await
    }

    pub async fn etf_list(&self) -> Vec<Quote> {
        self.listing("etfs", &ETF_SET, TTL_COMMODITIES).await
    }

    pub async fn bond_list(&self) -> Vec<Quote> {
        self.listing("bonds", &BOND_SET, TTL_COMMODITIES).await
    }

    async fn listing(
        &self,
        name: &str,
        symbols: &[&str],
        ttl: std::time::Duration,
    ) -> Vec<Quote> {
        if let Some(cached) = self.cache.lists.get(name) {
            return cached;
        }
        let owned: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
        let mut rows: Vec<Quote> = self
            .quote_batch(&owned)
            .await
            .into_iter()
            .filter(Quote::is_valid)
            .collect();
        rows.sort_by(|a, b| b.volume.cmp(&a.volume));
        if !rows.is_empty() {
            self.cache.lists.set(name, rows.clone(), ttl);
        }
        rows
    }

    /// The exchange-wide top-coins listing, volume descending.
    pub async fn crypto_list(&self, limit: usize) -> Vec<Quote> {
        let key = format!("crypto:{limit}");
        if let Some(cached) = self.cache.lists.get(&key) {
            return cached;
        }
        match self.providers.binance.top_coins(limit).await {
            Ok(rows) => {
                if !rows.is_empty() {
                    self.cache.lists.set(key, rows.clone(), TTL_SUMMARY);
                }
                rows
            }
            Err(e) => {
                warn!("crypto list fetch failed: {e}");
                Vec::new()
            }
        }
    }

    /// Best daily TEFAS performers.
    pub async fn top_funds(&self) -> Vec<Quote> {
        if let Some(cached) = self.cache.lists.get("funds") {
            return cached;
        }
        match self.providers.tefas.top_funds(20).await {
            Ok(rows) => {
                if !rows.is_empty() {
                    self.cache.lists.set("funds", rows.clone(), TTL_ANALYSIS);
                }
                rows
            }
            Err(e) => {
                warn!("top funds fetch failed: {e}");
                Vec::new()
            }
        }
    }

    /// The eleven-currency TRY table. The live chain first (fresh
    /// change percents, 60 s cache); a table built from the
    /// daily-granularity fallback sources is cached for 24 hours
    /// instead.
    pub async fn fx_table(&self) -> Vec<Quote> {
        if let Some(cached) = self.cache.fx_table.get("fx_table") {
            return cached;
        }
        match self.fx_table_uncached().await {
            Some((rows, ttl)) => {
                self.cache.fx_table.set("fx_table", rows.clone(), ttl);
                rows
            }
            None => Vec::new(),
        }
    }

    /// Resolves the table and the TTL it should be cached on.
    async fn fx_table_uncached(&self) -> Option<(Vec<Quote>, std::time::Duration)> {
        let classified: Vec<ClassifiedSymbol> = FX_TABLE_CODES
            .iter()
            .map(|c| self.classifier.classify(c))
            .collect();
        let live = resolve_quotes(&self.fx_chain, &classified).await;
        let rows: Vec<Quote> = classified
            .iter()
            .filter_map(|sym| live.get(&sym.app_symbol).cloned())
            .collect();
        if !rows.is_empty() {
            return Some((rows, TTL_SUMMARY));
        }

        let codes: Vec<&str> = FX_TABLE_CODES.to_vec();
        for source in &self.fx_fallbacks {
            match source.fetch_rates(&codes).await {
                Ok(rows) if !rows.is_empty() => {
                    return Some((rows, TTL_FX_TABLE_FALLBACK));
                }
                Ok(_) => {}
                Err(e) => warn!("[{}] fx table fallback failed: {e}", source.id()),
            }
        }
        None
    }

    /// Refreshes the classifier's fund registry from TEFAS. Called by
    /// the daily job and on demand.
    pub async fn refresh_fund_registry(&self) -> Result<usize, MarketDataError> {
        let funds = self.providers.tefas.fetch_registry().await?;
        let count = funds.len();
        self.fund_registry.replace(funds);
        info!("fund registry refreshed, {count} funds");
        Ok(count)
    }

    pub fn fund_registry(&self) -> &Arc<FundRegistry> {
        &self.fund_registry
    }

    /// Daily symbol-master sync for the metered provider.
    pub async fn sync_symbol_master(&self) -> Result<usize, MarketDataError> {
        self.providers.twelve_data.sync_symbol_master().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct ScriptedProvider {
        id: &'static str,
        quotes: HashMap<String, Quote>,
        fail: bool,
    }

    impl ScriptedProvider {
        fn new(id: &'static str) -> Self {
            ScriptedProvider {
                id,
                quotes: HashMap::new(),
                fail: false,
            }
        }

        fn with_quote(mut self, symbol: &str, price: Decimal, change: Decimal) -> Self {
            let mut quote = Quote::new(symbol, price, self.id);
            quote.change_percent = change;
            self.quotes.insert(symbol.to_string(), quote);
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }
    }

    #[async_trait]
    impl MarketDataProvider for ScriptedProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn supports(&self, _category: AssetCategory) -> bool {
            true
        }

        async fn fetch_quotes(
            &self,
            symbols: &[ClassifiedSymbol],
        ) -> Result<HashMap<String, Quote>, MarketDataError> {
            if self.fail {
                return Err(MarketDataError::Timeout { provider: self.id });
            }
            Ok(symbols
                .iter()
                .filter_map(|s| {
                    self.quotes
                        .get(&s.app_symbol)
                        .map(|q| (s.app_symbol.clone(), q.clone()))
                })
                .collect())
        }
    }

    struct ScriptedFxSource {
        id: &'static str,
        rows: Vec<Quote>,
        fail: bool,
    }

    #[async_trait]
    impl FxRateSource for ScriptedFxSource {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn fetch_rates(&self, _codes: &[&str]) -> Result<Vec<Quote>, MarketDataError> {
            if self.fail {
                return Err(MarketDataError::Timeout { provider: self.id });
            }
            Ok(self.rows.clone())
        }
    }

    fn test_aggregator() -> Aggregator {
        let master = Arc::new(crate::provider::twelve_data::SymbolMaster::open(
            std::env::temp_dir().join("aggregator-test-master.json"),
        ));
        let providers = Providers {
            mynet: Arc::new(MynetProvider::new()),
            yahoo: Arc::new(YahooProvider::new()),
            binance: Arc::new(BinanceProvider::new()),
            tradingview: Arc::new(TradingViewProvider::new()),
            fmp: Arc::new(FmpProvider::new(None)),
            tefas: Arc::new(TefasProvider::new()),
            twelve_data: Arc::new(TwelveDataProvider::new(None, master)),
            exchange_rate: Arc::new(ExchangeRateProvider::new(None)),
            fawaz: Arc::new(FawazProvider::new()),
        };
        Aggregator::new(providers, Arc::new(FundRegistry::new()))
    }

    #[tokio::test]
    async fn test_fx_table_live_chain_cached_on_short_ttl() {
        let mut agg = test_aggregator();
        agg.fx_chain = vec![Arc::new(
            ScriptedProvider::new("LIVE")
                .with_quote("USD", dec!(43.10), dec!(0.2))
                .with_quote("EUR", dec!(50.20), dec!(-0.1)),
        )];

        let (rows, ttl) = agg.fx_table_uncached().await.expect("table");
        assert_eq!(ttl, TTL_SUMMARY);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|q| q.source == "LIVE"));
    }

    #[tokio::test]
    async fn test_fx_table_fallback_cached_on_daily_ttl() {
        let mut agg = test_aggregator();
        agg.fx_chain = vec![Arc::new(ScriptedProvider::new("LIVE").failing())];
        agg.fx_fallbacks = vec![
            Arc::new(ScriptedFxSource {
                id: "KEYED",
                rows: Vec::new(),
                fail: true,
            }),
            Arc::new(ScriptedFxSource {
                id: "CDN",
                rows: vec![Quote::new("USD", dec!(43.04), "CDN")],
                fail: false,
            }),
        ];

        let (rows, ttl) = agg.fx_table_uncached().await.expect("table");
        assert_eq!(ttl, TTL_FX_TABLE_FALLBACK);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].source, "CDN");
    }

    #[tokio::test]
    async fn test_fx_table_total_exhaustion_yields_nothing() {
        let mut agg = test_aggregator();
        agg.fx_chain = vec![Arc::new(ScriptedProvider::new("LIVE").failing())];
        agg.fx_fallbacks = vec![Arc::new(ScriptedFxSource {
            id: "KEYED",
            rows: Vec::new(),
            fail: true,
        })];

        assert!(agg.fx_table_uncached().await.is_none());
        assert!(agg.fx_table().await.is_empty());
    }

    #[tokio::test]
    async fn test_summary_overlay_requery_and_derivation() {
        let mut agg = test_aggregator();
        // The scrape covers the local instruments but not gold or BTC.
        agg.summary_overlay = Arc::new(
            ScriptedProvider::new("SCRAPE")
                .with_quote("XU100", dec!(11500.0), dec!(1.0))
                .with_quote("USDTRY", dec!(43.50), dec!(0.2))
                .with_quote("EURTRY", dec!(50.50), dec!(-0.1)),
        );
        agg.summary_requery = vec![Arc::new(
            ScriptedProvider::new("REQUERY")
                .with_quote("BTC", dec!(95000), dec!(2.0))
                .with_quote("GOLD", dec!(3300), dec!(0.4)),
        )];

        let summary = agg.market_summary().await;
        assert_eq!(summary["bist100"].price, dec!(11500.0));
        assert_eq!(summary["dolar"].source, "SCRAPE");
        assert_eq!(summary["bitcoin"].price, dec!(95000));
        assert_eq!(summary["ons_altin"].source, "REQUERY");

        // Gram gold is derived from the live ounce and USD/TRY values.
        let gram = &summary["gram_altin"];
        assert_eq!(gram.source, "derived");
        assert_eq!(gram.price, derive_gram_gold(dec!(3300), dec!(43.50)));
        assert_eq!(gram.change_percent, dec!(0.4));
    }

    #[tokio::test]
    async fn test_summary_total_outage_serves_static_values() {
        let mut agg = test_aggregator();
        agg.summary_overlay = Arc::new(ScriptedProvider::new("SCRAPE").failing());
        agg.summary_requery = vec![Arc::new(ScriptedProvider::new("REQUERY").failing())];

        let summary = agg.market_summary().await;
        for key in summary_keys() {
            let quote = summary.get(key).expect("seeded key");
            assert!(quote.price > Decimal::ZERO, "{key} must never be zero");
            assert_eq!(quote.source, "fallback");
        }
        assert_eq!(summary["bist100"].price, dec!(12200.0));
    }

    #[test]
    fn test_derive_gram_gold() {
        // 3250 USD/oz at 43.04 TRY/USD is 4497.24 TRY/gram.
        assert_eq!(derive_gram_gold(dec!(3250.0), dec!(43.04)), dec!(4497.24));
    }

    #[test]
    fn test_derive_gram_gold_rounding() {
        let got = derive_gram_gold(dec!(3000), dec!(40));
        // 3000 / 31.1035 * 40 = 3858.0867...
        assert_eq!(got, dec!(3858.09));
    }

    #[test]
    fn test_summary_keys_cover_contract() {
        let keys: Vec<&str> = summary_keys().collect();
        assert_eq!(
            keys,
            vec!["bist100", "dolar", "euro", "bitcoin", "gram_altin", "ons_altin"]
        );
    }
}
