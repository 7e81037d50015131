//! In-process TTL caches for aggregated market data.
//!
//! One process, one cache: entries live in a mutex-guarded map and are
//! dropped lazily when a read finds them expired. There is no size bound
//! and no LRU; the key space is a handful of surface names plus symbol
//! lists, so the map stays small by construction.

mod ttl_cache;

pub use ttl_cache::TtlCache;

use std::collections::HashMap;
use std::time::Duration;

use crate::models::{HistoryPoint, Quote};

/// Headline summary map: refreshed every minute.
pub const TTL_SUMMARY: Duration = Duration::from_secs(60);
/// Single-symbol analysis quotes: 15 minutes.
pub const TTL_ANALYSIS: Duration = Duration::from_secs(900);
/// FX table served from a metered or daily-granularity fallback source.
pub const TTL_FX_TABLE_FALLBACK: Duration = Duration::from_secs(86_400);
/// Commodity list.
pub const TTL_COMMODITIES: Duration = Duration::from_secs(300);
/// Fund registry snapshot used by the classifier.
pub const TTL_FUND_REGISTRY: Duration = Duration::from_secs(86_400);

/// The process-wide cache, one typed compartment per surface.
#[derive(Default)]
pub struct MarketCache {
    /// Keyed by surface name ("summary").
    pub summary: TtlCache<HashMap<String, Quote>>,
    /// Keyed by list name ("stocks", "commodities", "etfs", "bonds").
    pub lists: TtlCache<Vec<Quote>>,
    /// Keyed by app symbol; detail/analysis quotes.
    pub analysis: TtlCache<Quote>,
    /// Keyed by "{symbol}:{period}:{interval}".
    pub history: TtlCache<Vec<HistoryPoint>>,
    /// Keyed by "fx_table".
    pub fx_table: TtlCache<Vec<Quote>>,
}

impl MarketCache {
    pub fn new() -> Self {
        MarketCache::default()
    }
}
