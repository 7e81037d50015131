//! Symbol classification: the single authority that turns an
//! application-level symbol into an asset category, a venue and the
//! provider-dialect symbol.
//!
//! Rules are evaluated in a fixed priority order and the first match
//! wins, so classification is deterministic for a given registry state.
//! Rules 1 through 7 are static tables; only the fund rule consults
//! runtime state (the TEFAS registry), and it sits below everything
//! static so a fund code can never shadow a crypto or equity symbol.

mod fund_registry;
mod tables;

pub use fund_registry::FundRegistry;
pub use tables::FX_TABLE_CODES;

use std::sync::Arc;

use crate::models::{AssetCategory, Classification, ClassifiedSymbol, Venue};
use tables::{
    BIST_SET, COMMODITY_TABLE, CRYPTO_BASES, FOREX_CODES, LSE_SET, NASDAQ_SET, NYSE_SET, XETRA_SET,
};

pub struct SymbolClassifier {
    fund_registry: Arc<FundRegistry>,
}

impl SymbolClassifier {
    pub fn new(fund_registry: Arc<FundRegistry>) -> Self {
        SymbolClassifier { fund_registry }
    }

    pub fn classify(&self, app_symbol: &str) -> ClassifiedSymbol {
        let sym = app_symbol.trim().to_uppercase();
        let classification = self.classify_inner(&sym);
        ClassifiedSymbol {
            app_symbol: sym,
            classification,
        }
    }

    fn classify_inner(&self, sym: &str) -> Classification {
        // 1. Crypto: explicit USDT pair, or a known base.
        if sym.len() > 4 && sym.ends_with("USDT") {
            return Classification {
                provider_symbol: sym.to_string(),
                category: AssetCategory::Crypto,
                venue: Venue::Binance,
            };
        }
        if CRYPTO_BASES.contains(sym) {
            return Classification {
                provider_symbol: format!("{sym}USDT"),
                category: AssetCategory::Crypto,
                venue: Venue::Binance,
            };
        }

        // 2. US large caps.
        if NASDAQ_SET.contains(sym) {
            return Classification {
                provider_symbol: sym.to_string(),
                category: AssetCategory::EquityUs,
                venue: Venue::Nasdaq,
            };
        }
        if NYSE_SET.contains(sym) {
            return Classification {
                provider_symbol: sym.to_string(),
                category: AssetCategory::EquityUs,
                venue: Venue::Nyse,
            };
        }

        // 3. Local market: ".IS" suffix or a known BIST name.
        if let Some(stripped) = sym.strip_suffix(".IS") {
            return Classification {
                provider_symbol: stripped.to_string(),
                category: AssetCategory::EquityTr,
                venue: Venue::Bist,
            };
        }
        if BIST_SET.contains(sym) {
            return Classification {
                provider_symbol: sym.to_string(),
                category: AssetCategory::EquityTr,
                venue: Venue::Bist,
            };
        }

        // 4. Forex: a bare code is quoted against TRY; a six-letter pair
        // of known codes passes through.
        if sym != "TRY" && FOREX_CODES.contains(sym) {
            return Classification {
                provider_symbol: format!("{sym}TRY"),
                category: AssetCategory::Forex,
                venue: Venue::FxIdc,
            };
        }
        if sym.len() == 6 {
            let (base, quote) = sym.split_at(3);
            if FOREX_CODES.contains(base) && FOREX_CODES.contains(quote) {
                return Classification {
                    provider_symbol: sym.to_string(),
                    category: AssetCategory::Forex,
                    venue: Venue::FxIdc,
                };
            }
        }

        // 5 and 6. European large caps.
        if XETRA_SET.contains(sym) {
            return Classification {
                provider_symbol: sym.to_string(),
                category: AssetCategory::EquityDe,
                venue: Venue::Xetra,
            };
        }
        if LSE_SET.contains(sym) {
            return Classification {
                provider_symbol: sym.to_string(),
                category: AssetCategory::EquityUk,
                venue: Venue::Lse,
            };
        }

        // 7. Commodity aliases.
        if let Some((ticker, venue)) = COMMODITY_TABLE.get(sym) {
            return Classification {
                provider_symbol: (*ticker).to_string(),
                category: AssetCategory::Commodity,
                venue: *venue,
            };
        }

        // 8. TEFAS fund codes, from the dynamic registry.
        if self.fund_registry.contains(sym) {
            return Classification {
                provider_symbol: sym.to_string(),
                category: AssetCategory::Fund,
                venue: Venue::Tefas,
            };
        }

        // 9. Default: treat as a US equity and let the chain sort it out.
        Classification {
            provider_symbol: sym.to_string(),
            category: AssetCategory::EquityUs,
            venue: Venue::Nyse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn classifier() -> SymbolClassifier {
        SymbolClassifier::new(Arc::new(FundRegistry::new()))
    }

    #[test]
    fn test_btc_is_crypto_regardless_of_registry_state() {
        // Empty registry.
        let c = classifier();
        let got = c.classify("BTC");
        assert_eq!(got.category(), AssetCategory::Crypto);
        assert_eq!(got.provider_symbol(), "BTCUSDT");

        // Registry poisoned with a colliding "fund" named BTC: the
        // static crypto rule still wins because it runs first.
        let reg = Arc::new(FundRegistry::new());
        reg.replace(HashMap::from([("BTC".to_string(), "bogus".to_string())]));
        let c = SymbolClassifier::new(reg);
        let got = c.classify("BTC");
        assert_eq!(got.category(), AssetCategory::Crypto);
        assert_eq!(got.provider_symbol(), "BTCUSDT");
    }

    #[test]
    fn test_explicit_usdt_pair_passes_through() {
        let got = classifier().classify("ethusdt");
        assert_eq!(got.category(), AssetCategory::Crypto);
        assert_eq!(got.provider_symbol(), "ETHUSDT");
        assert_eq!(got.app_symbol, "ETHUSDT");
    }

    #[test]
    fn test_bist_suffix_is_stripped() {
        let got = classifier().classify("THYAO.IS");
        assert_eq!(got.category(), AssetCategory::EquityTr);
        assert_eq!(got.provider_symbol(), "THYAO");
        let got = classifier().classify("GARAN");
        assert_eq!(got.category(), AssetCategory::EquityTr);
    }

    #[test]
    fn test_forex_code_quoted_against_try() {
        let got = classifier().classify("USD");
        assert_eq!(got.category(), AssetCategory::Forex);
        assert_eq!(got.provider_symbol(), "USDTRY");
        // A full pair is kept as-is.
        let got = classifier().classify("EURUSD");
        assert_eq!(got.provider_symbol(), "EURUSD");
    }

    #[test]
    fn test_commodity_aliases() {
        let got = classifier().classify("GOLD");
        assert_eq!(got.category(), AssetCategory::Commodity);
        assert_eq!(got.provider_symbol(), "XAUUSD");
        assert_eq!(got.qualified(), "FX_IDC:XAUUSD");

        let got = classifier().classify("BRENT");
        assert_eq!(got.qualified(), "TVC:UKOIL");

        let got = classifier().classify("CORN");
        assert_eq!(got.qualified(), "CBOT:ZC1!");
    }

    #[test]
    fn test_european_sets() {
        assert_eq!(classifier().classify("SAP").category(), AssetCategory::EquityDe);
        assert_eq!(classifier().classify("BP.").category(), AssetCategory::EquityUk);
    }

    #[test]
    fn test_fund_rule_only_matches_registered_codes() {
        let reg = Arc::new(FundRegistry::new());
        reg.replace(HashMap::from([("AFA".to_string(), "Ak Portfoy".to_string())]));
        let c = SymbolClassifier::new(reg);
        assert_eq!(c.classify("AFA").category(), AssetCategory::Fund);
        // Unknown three-letter code falls through to the default.
        assert_eq!(c.classify("ZZZ").category(), AssetCategory::EquityUs);
    }

    #[test]
    fn test_default_is_us_equity_passthrough() {
        let got = classifier().classify("ORCL");
        assert_eq!(got.category(), AssetCategory::EquityUs);
        assert_eq!(got.provider_symbol(), "ORCL");
    }
}
