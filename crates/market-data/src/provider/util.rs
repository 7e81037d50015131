//! Shared helpers for provider implementations.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;

/// Per-request deadline applied to every provider client. A provider
/// that cannot answer in time is treated as absent for that request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the reqwest client all providers share the configuration of.
/// Client construction only fails on TLS backend misconfiguration, in
/// which case a default client without the timeout is still usable.
pub fn build_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
        .build()
        .unwrap_or_default()
}

/// Parses a plain decimal string ("12345.67"), tolerating thousands
/// commas ("12,345.67").
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    Decimal::from_str(&cleaned).ok()
}

/// Parses a Turkish-locale numeric string: "." is the thousands
/// separator and "," the decimal mark, so "12.200,50" is 12200.50.
pub fn parse_tr_decimal(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace('.', "").replace(',', ".");
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_with_thousands_commas() {
        assert_eq!(parse_decimal("12,345.67"), Some(dec!(12345.67)));
        assert_eq!(parse_decimal(" 43.04 "), Some(dec!(43.04)));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_parse_tr_decimal() {
        assert_eq!(parse_tr_decimal("12.200,50"), Some(dec!(12200.50)));
        assert_eq!(parse_tr_decimal("4.500,00"), Some(dec!(4500.00)));
        assert_eq!(parse_tr_decimal("%1,25"), None);
        assert_eq!(parse_tr_decimal("1,25"), Some(dec!(1.25)));
    }
}
