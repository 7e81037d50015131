use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A snapshot record for a single instrument.
///
/// A price of zero is the documented "unknown" sentinel: it means every
/// provider in the chain came up empty and no static fallback covered the
/// symbol. Consumers must not average, chart or alert on zero-price rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub symbol: String,
    #[serde(default)]
    pub display_name: String,
    pub price: Decimal,
    #[serde(default)]
    pub change_percent: Decimal,
    #[serde(default)]
    pub volume: Decimal,
    #[serde(default)]
    pub market_cap: Decimal,
    #[serde(default)]
    pub high: Decimal,
    #[serde(default)]
    pub low: Decimal,
    #[serde(default)]
    pub open: Decimal,
    /// Identifier of the provider that produced this record, or
    /// "fallback" for static/sentinel rows.
    pub source: String,
    /// ISO 4217 code; defaults to the asset class convention (USD for
    /// global assets, TRY for local ones) when the provider omits it.
    pub currency: String,
    /// Aggregate analyst stance (BUY / SELL / NEUTRAL), where available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// 52-week range, populated on detail lookups only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_52w: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_52w: Option<Decimal>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: Decimal, source: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Quote {
            display_name: symbol.clone(),
            symbol,
            price,
            change_percent: Decimal::ZERO,
            volume: Decimal::ZERO,
            market_cap: Decimal::ZERO,
            high: Decimal::ZERO,
            low: Decimal::ZERO,
            open: Decimal::ZERO,
            source: source.into(),
            currency: "USD".to_string(),
            recommendation: None,
            logo_url: None,
            high_52w: None,
            low_52w: None,
        }
    }

    /// The sentinel returned when the whole chain failed to produce a
    /// price. `price == 0` and `source == "fallback"` by contract.
    pub fn unknown(symbol: impl Into<String>) -> Self {
        Quote::new(symbol, Decimal::ZERO, "fallback")
    }

    /// Acceptance predicate used by the fallback chain: a quote counts as
    /// resolved only when its price is strictly positive.
    pub fn is_valid(&self) -> bool {
        self.price > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_price_is_not_valid() {
        assert!(!Quote::unknown("XYZ").is_valid());
        assert!(!Quote::new("XYZ", dec!(-1), "test").is_valid());
        assert!(Quote::new("XYZ", dec!(0.0001), "test").is_valid());
    }

    #[test]
    fn test_unknown_sentinel_contract() {
        let q = Quote::unknown("GAUTRY");
        assert_eq!(q.price, Decimal::ZERO);
        assert_eq!(q.source, "fallback");
        assert_eq!(q.symbol, "GAUTRY");
    }
}
