//! Live economic-calendar feed.
//!
//! The production feed scrapes the Mynet economic-calendar page, the
//! same source the quote scraper already depends on. Rows that cannot
//! be parsed are skipped silently; a feed that yields nothing is an
//! absence, not an error, and the store keeps serving.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::calendar::model::{country_id_for, synthesize_event_id, CalendarEvent, Impact};
use crate::errors::{CoreError, Result};

const BASE_URL: &str = "https://finans.mynet.com/ekonomik-takvim/";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[async_trait]
pub trait CalendarFeed: Send + Sync {
    /// Events inside `[start, end]` (dates inclusive). An empty vec is a
    /// legitimate answer.
    async fn fetch_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEvent>>;
}

pub struct MynetCalendarFeed {
    client: reqwest::Client,
}

impl Default for MynetCalendarFeed {
    fn default() -> Self {
        MynetCalendarFeed::new()
    }
}

impl MynetCalendarFeed {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
            .build()
            .unwrap_or_default();
        MynetCalendarFeed { client }
    }
}

#[async_trait]
impl CalendarFeed for MynetCalendarFeed {
    async fn fetch_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEvent>> {
        let body = self
            .client
            .get(BASE_URL)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| CoreError::Feed(format!("calendar page status: {e}")))?
            .text()
            .await?;
        let events: Vec<CalendarEvent> = parse_calendar_rows(&body, start)
            .into_iter()
            .filter(|e| {
                let day = e.date_time.date();
                day >= start && day <= end
            })
            .collect();
        debug!("calendar feed yielded {} events in window", events.len());
        Ok(events)
    }
}

lazy_static! {
    // The tag head is captured whole; the date attribute is looked up
    // in a second pass so unrelated attributes cannot swallow it.
    static ref ROW_RE: Regex = Regex::new(r"(?s)<tr([^>]*)>(.*?)</tr>").expect("static pattern");
    static ref DATE_ATTR_RE: Regex =
        Regex::new(r"data-date=.(\d{4}-\d{2}-\d{2})").expect("static pattern");
    static ref CELL_RE: Regex = Regex::new(r"(?s)<td[^>]*>(.*?)</td>").expect("static pattern");
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").expect("static pattern");
    static ref TIME_RE: Regex = Regex::new(r"^(\d{1,2}):(\d{2})$").expect("static pattern");
}

fn strip_tags(fragment: &str) -> String {
    TAG_RE.replace_all(fragment, "").trim().to_string()
}

/// Parses the calendar table. Expected cell order per row: time,
/// country/currency, importance, title, actual, forecast, previous.
/// Rows carry their date in a `data-date` attribute; rows without one
/// are attributed to `default_date`.
pub fn parse_calendar_rows(html: &str, default_date: NaiveDate) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    for row in ROW_RE.captures_iter(html) {
        let date = DATE_ATTR_RE
            .captures(&row[1])
            .and_then(|c| NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok())
            .unwrap_or(default_date);
        let cells: Vec<String> = CELL_RE
            .captures_iter(&row[2])
            .map(|c| strip_tags(&c[1]))
            .collect();
        if cells.len() < 4 {
            continue;
        }
        let Some(time) = parse_time(&cells[0]) else {
            // Header or separator row.
            continue;
        };
        let currency = cells[1].to_uppercase();
        let country_id = country_id_for(&currency);
        if country_id == 0 {
            warn!("calendar row with unknown country: {}", cells[1]);
            continue;
        }
        let title = cells[3].clone();
        if title.is_empty() {
            continue;
        }
        let date_time = NaiveDateTime::new(date, time);
        let cell_or_dash = |i: usize| -> String {
            cells
                .get(i)
                .filter(|c| !c.is_empty())
                .cloned()
                .unwrap_or_else(|| "-".to_string())
        };
        events.push(CalendarEvent {
            event_id: synthesize_event_id(country_id, &date_time, &title),
            date_time,
            country_id,
            currency,
            title,
            impact: Impact::parse(&cells[2]),
            actual: cell_or_dash(4),
            forecast: cell_or_dash(5),
            previous: cell_or_dash(6),
            unit: String::new(),
        });
    }
    events
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let caps = TIME_RE.captures(raw)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}
