//! Economic calendar event model.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Currency / country-name spellings mapped to the feed's numeric
    /// country ids. Turkish spellings included because the live feed is
    /// a Turkish-language page.
    pub static ref COUNTRY_MAP: HashMap<&'static str, i32> = {
        let mut m = HashMap::new();
        for (name, id) in [
            ("USD", 5), ("ABD", 5), ("USA", 5), ("AMERIKA", 5),
            ("TRY", 63), ("TUR", 63), ("TURKEY", 63), ("TÜRKİYE", 63), ("TL", 63),
            ("EUR", 72), ("EURO ZONE", 72), ("AVRUPA", 72), ("EU", 72),
            ("GBP", 12), ("UK", 12), ("İNGİLTERE", 12), ("STERLIN", 12),
            ("CAD", 6), ("KANADA", 6),
            ("JPY", 37), ("JAPONYA", 37),
            ("AUD", 7), ("AVUSTRALYA", 7),
            ("NZD", 35), ("YENİ ZELANDA", 35),
            ("CHF", 110), ("İSVİÇRE", 110),
            ("CNY", 51), ("ÇİN", 51),
            ("DEM", 4), ("ALMANYA", 4),
            ("INR", 160), ("HİNDİSTAN", 160),
        ] {
            m.insert(name, id);
        }
        m
    };
}

/// Resolves a currency code or country spelling to its feed id, 0 when
/// unknown.
pub fn country_id_for(name: &str) -> i32 {
    let key = name.trim().to_uppercase();
    COUNTRY_MAP.get(key.as_str()).copied().unwrap_or(0)
}

/// Event importance, three levels only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    /// Parses the importance markers the feeds use: stars, text in
    /// English or Turkish, or a bare digit. Anything unrecognized is Low.
    pub fn parse(raw: &str) -> Impact {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("⭐⭐⭐")
            || lowered.contains("high")
            || lowered.contains("yüksek")
            || lowered.contains("kritik")
            || lowered == "3"
        {
            return Impact::High;
        }
        if lowered.contains("⭐⭐") || lowered.contains("medium") || lowered.contains("orta") || lowered == "2" {
            return Impact::Medium;
        }
        Impact::Low
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Low => "Low",
            Impact::Medium => "Medium",
            Impact::High => "High",
        }
    }
}

/// One calendar row. `actual`, `forecast` and `previous` are free text
/// with `"-"` standing in for "not yet released".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub event_id: String,
    pub date_time: NaiveDateTime,
    pub country_id: i32,
    pub currency: String,
    pub title: String,
    pub impact: Impact,
    #[serde(default = "dash")]
    pub actual: String,
    #[serde(default = "dash")]
    pub forecast: String,
    #[serde(default = "dash")]
    pub previous: String,
    #[serde(default)]
    pub unit: String,
}

fn dash() -> String {
    "-".to_string()
}

impl CalendarEvent {
    /// Day-and-time label shown to the client; the year is dropped, so
    /// de-duplication on this field alone would confuse events a year
    /// apart. Callers pair it with the title.
    pub fn displayed_date(&self) -> String {
        self.date_time.format("%d.%m %H:%M").to_string()
    }
}

/// Synthesizes an id for feed rows that do not carry one:
/// `{country_id}-{datetime digits}-{first five title chars}`.
pub fn synthesize_event_id(country_id: i32, date_time: &NaiveDateTime, title: &str) -> String {
    let stamp: String = date_time
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let prefix: String = title.chars().take(5).collect();
    format!("{country_id}-{stamp}-{prefix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_impact_parse_variants() {
        assert_eq!(Impact::parse("⭐⭐⭐"), Impact::High);
        assert_eq!(Impact::parse("High"), Impact::High);
        assert_eq!(Impact::parse("Yüksek"), Impact::High);
        assert_eq!(Impact::parse("3"), Impact::High);
        assert_eq!(Impact::parse("⭐⭐"), Impact::Medium);
        assert_eq!(Impact::parse("orta"), Impact::Medium);
        assert_eq!(Impact::parse("2"), Impact::Medium);
        assert_eq!(Impact::parse("⭐"), Impact::Low);
        assert_eq!(Impact::parse("whatever"), Impact::Low);
        assert_eq!(Impact::parse(""), Impact::Low);
    }

    #[test]
    fn test_country_ids() {
        assert_eq!(country_id_for("USD"), 5);
        assert_eq!(country_id_for("try"), 63);
        assert_eq!(country_id_for("TÜRKİYE"), 63);
        assert_eq!(country_id_for("EUR"), 72);
        assert_eq!(country_id_for("XYZ"), 0);
    }

    #[test]
    fn test_event_id_synthesis() {
        let dt = NaiveDate::from_ymd_opt(2026, 1, 15)
            .and_then(|d| d.and_hms_opt(14, 0, 0))
            .unwrap();
        let id = synthesize_event_id(63, &dt, "TCMB Politika Faizi Kararı");
        assert_eq!(id, "63-20260115140000-TCMB ");
    }

    #[test]
    fn test_displayed_date_drops_year() {
        let dt = NaiveDate::from_ymd_opt(2026, 1, 15)
            .and_then(|d| d.and_hms_opt(14, 0, 0))
            .unwrap();
        let event = CalendarEvent {
            event_id: "x".into(),
            date_time: dt,
            country_id: 63,
            currency: "TRY".into(),
            title: "t".into(),
            impact: Impact::High,
            actual: "-".into(),
            forecast: "-".into(),
            previous: "-".into(),
            unit: String::new(),
        };
        assert_eq!(event.displayed_date(), "15.01 14:00");
    }
}
