use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One candle of a historical series. `close` is mandatory; providers
/// that only publish a closing price repeat it into open/high/low.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    #[serde(default)]
    pub volume: Decimal,
}

impl HistoryPoint {
    /// Builds a candle from a bare close when the source has no OHLC.
    pub fn from_close(timestamp: DateTime<Utc>, close: Decimal) -> Self {
        HistoryPoint {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::ZERO,
        }
    }
}

/// Sorts a series oldest-first. Every resolved series passes through
/// here before it is cached or returned, regardless of provider order.
pub fn sort_ascending(points: &mut [HistoryPoint]) {
    points.sort_by_key(|p| p.timestamp);
}

/// Accepted lookback periods for history requests. Unrecognized strings
/// fall back to one month rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPeriod {
    OneMonth,
    ThreeMonths,
    OneYear,
    FiveYears,
}

impl HistoryPeriod {
    pub fn parse(s: &str) -> Self {
        match s {
            "3mo" => HistoryPeriod::ThreeMonths,
            "1y" => HistoryPeriod::OneYear,
            "5y" => HistoryPeriod::FiveYears,
            _ => HistoryPeriod::OneMonth,
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            HistoryPeriod::OneMonth => 30,
            HistoryPeriod::ThreeMonths => 90,
            HistoryPeriod::OneYear => 365,
            HistoryPeriod::FiveYears => 1825,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::OneMonth => "1mo",
            HistoryPeriod::ThreeMonths => "3mo",
            HistoryPeriod::OneYear => "1y",
            HistoryPeriod::FiveYears => "5y",
        }
    }
}

/// Concrete time window handed to providers, derived from a period at
/// request time plus the caller's interval string (daily when absent).
#[derive(Debug, Clone)]
pub struct HistoryRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period: HistoryPeriod,
    pub interval: String,
}

impl HistoryRange {
    pub fn from_period(period: HistoryPeriod, interval: Option<&str>) -> Self {
        let end = Utc::now();
        HistoryRange {
            start: end - Duration::days(period.days()),
            end,
            period,
            interval: interval.unwrap_or("1d").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_period_mapping() {
        assert_eq!(HistoryPeriod::parse("1mo").days(), 30);
        assert_eq!(HistoryPeriod::parse("3mo").days(), 90);
        assert_eq!(HistoryPeriod::parse("1y").days(), 365);
        assert_eq!(HistoryPeriod::parse("5y").days(), 1825);
        // Unknown strings default to one month.
        assert_eq!(HistoryPeriod::parse("2w"), HistoryPeriod::OneMonth);
        assert_eq!(HistoryPeriod::parse(""), HistoryPeriod::OneMonth);
    }

    #[test]
    fn test_sort_ascending_reorders_descending_series() {
        let t0 = Utc::now();
        let mut points: Vec<HistoryPoint> = (0..5)
            .map(|i| HistoryPoint::from_close(t0 - Duration::days(i), dec!(100) + Decimal::from(i)))
            .collect();
        sort_ascending(&mut points);
        for w in points.windows(2) {
            assert!(w[0].timestamp < w[1].timestamp);
        }
    }
}
