//! Static fallback values for the headline dashboard instruments.
//!
//! These are part of the API contract: the summary endpoint must never
//! render a zero for bist100, dolar, euro, bitcoin, gram_altin or
//! ons_altin, so every summary starts from this table and live data
//! overlays it. The values are maintained by hand to stay plausible.

use rust_decimal::Decimal;

use crate::models::Quote;

/// Grams per troy ounce, exact by definition.
pub const GRAMS_PER_TROY_OUNCE: Decimal = Decimal::from_parts(311035, 0, 0, false, 4);

/// (summary key, price, change percent)
const TABLE: [(&str, Decimal, Decimal); 6] = [
    ("bist100", Decimal::from_parts(122000, 0, 0, false, 1), Decimal::from_parts(5, 0, 0, false, 1)),
    ("dolar", Decimal::from_parts(4304, 0, 0, false, 2), Decimal::from_parts(1, 0, 0, false, 1)),
    ("euro", Decimal::from_parts(5009, 0, 0, false, 2), Decimal::from_parts(5, 0, 0, true, 2)),
    ("bitcoin", Decimal::from_parts(90000, 0, 0, false, 0), Decimal::from_parts(12, 0, 0, false, 1)),
    ("gram_altin", Decimal::from_parts(4500, 0, 0, false, 0), Decimal::from_parts(3, 0, 0, false, 1)),
    ("ons_altin", Decimal::from_parts(3250, 0, 0, false, 0), Decimal::from_parts(2, 0, 0, false, 1)),
];

/// The summary keys in presentation order.
pub fn summary_keys() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|(k, _, _)| *k)
}

/// Builds the seed quote for one summary key, `source == "fallback"`.
pub fn fallback_quote(key: &str) -> Option<Quote> {
    let (_, price, change) = TABLE.iter().find(|(k, _, _)| *k == key)?;
    let mut quote = Quote::new(key, *price, "fallback");
    quote.change_percent = *change;
    quote.currency = if key == "bitcoin" || key == "ons_altin" {
        "USD".to_string()
    } else {
        "TRY".to_string()
    };
    Some(quote)
}

/// The static price for a key; used to detect that an entry is still
/// sitting at its fallback value after the overlay passes.
pub fn fallback_price(key: &str) -> Option<Decimal> {
    TABLE.iter().find(|(k, _, _)| *k == key).map(|(_, p, _)| *p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_table_values() {
        assert_eq!(fallback_price("bist100"), Some(dec!(12200.0)));
        assert_eq!(fallback_price("dolar"), Some(dec!(43.04)));
        assert_eq!(fallback_price("euro"), Some(dec!(50.09)));
        assert_eq!(fallback_price("bitcoin"), Some(dec!(90000)));
        assert_eq!(fallback_price("gram_altin"), Some(dec!(4500)));
        assert_eq!(fallback_price("ons_altin"), Some(dec!(3250)));
        assert_eq!(fallback_price("nope"), None);
    }

    #[test]
    fn test_negative_change_for_euro() {
        let q = fallback_quote("euro").expect("euro");
        assert_eq!(q.change_percent, dec!(-0.05));
        assert_eq!(q.source, "fallback");
    }

    #[test]
    fn test_grams_per_troy_ounce() {
        assert_eq!(GRAMS_PER_TROY_OUNCE, dec!(31.1035));
    }
}
