//! Fallback chain resolution.
//!
//! Providers are tried strictly in priority order. The first provider
//! sees the full symbol set; each later provider only sees the symbols
//! still unresolved. Accepted quotes are never overwritten by a later
//! provider, and a provider error counts exactly like an empty answer.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::models::{sort_ascending, ClassifiedSymbol, HistoryPoint, HistoryRange, Quote};
use crate::provider::MarketDataProvider;

/// Resolves a batch of symbols through the chain. Symbols no provider
/// could price are absent from the result; callers that need a row per
/// symbol fill in `Quote::unknown`.
pub async fn resolve_quotes(
    providers: &[Arc<dyn MarketDataProvider>],
    symbols: &[ClassifiedSymbol],
) -> HashMap<String, Quote> {
    let mut ordered: Vec<&Arc<dyn MarketDataProvider>> = providers.iter().collect();
    ordered.sort_by_key(|p| p.priority());

    let mut resolved: HashMap<String, Quote> = HashMap::new();
    let mut remaining: Vec<ClassifiedSymbol> = symbols.to_vec();

    for provider in ordered {
        if remaining.is_empty() {
            break;
        }
        let subset: Vec<ClassifiedSymbol> = remaining
            .iter()
            .filter(|s| provider.supports(s.category()))
            .cloned()
            .collect();
        if subset.is_empty() {
            continue;
        }

        let answers = match provider.fetch_quotes(&subset).await {
            Ok(answers) => answers,
            Err(e) => {
                // Absence, not failure: log and move down the chain.
                warn!("[{}] quote fetch failed: {e}", provider.id());
                continue;
            }
        };

        let before = remaining.len();
        remaining.retain(|sym| {
            match answers.get(&sym.app_symbol) {
                Some(quote) if quote.is_valid() => {
                    resolved.insert(sym.app_symbol.clone(), quote.clone());
                    false
                }
                // A zero-price answer is semantically empty.
                _ => true,
            }
        });
        debug!(
            "[{}] accepted {} of {} symbols",
            provider.id(),
            before - remaining.len(),
            subset.len()
        );
    }
    resolved
}

/// Resolves a history series: the first provider returning a non-empty,
/// well-formed series wins outright. Series are never merged across
/// providers; the winner is sorted ascending before being returned.
pub async fn resolve_history(
    providers: &[Arc<dyn MarketDataProvider>],
    symbol: &ClassifiedSymbol,
    range: &HistoryRange,
) -> Vec<HistoryPoint> {
    let mut ordered: Vec<&Arc<dyn MarketDataProvider>> = providers.iter().collect();
    ordered.sort_by_key(|p| p.priority());

    for provider in ordered {
        if !provider.supports(symbol.category()) {
            continue;
        }
        match provider.fetch_history(symbol, range).await {
            Ok(mut points) if !points.is_empty() => {
                sort_ascending(&mut points);
                debug!(
                    "[{}] history for {}: {} points",
                    provider.id(),
                    symbol.app_symbol,
                    points.len()
                );
                return points;
            }
            Ok(_) => continue,
            Err(e) => {
                warn!("[{}] history fetch failed: {e}", provider.id());
                continue;
            }
        }
    }
    Vec::new()
}
