//! Calendar sync and the merged listing the API serves.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use log::{info, warn};

use crate::calendar::feed::CalendarFeed;
use crate::calendar::model::CalendarEvent;
use crate::calendar::store::CalendarStore;
use crate::errors::Result;

/// Window: yesterday (to pick up just-released "actual" values) through
/// a week ahead.
const LOOKBACK_DAYS: i64 = 1;
const LOOKAHEAD_DAYS: i64 = 7;

pub struct CalendarSync {
    feed: Arc<dyn CalendarFeed>,
    store: Arc<CalendarStore>,
}

impl CalendarSync {
    pub fn new(feed: Arc<dyn CalendarFeed>, store: Arc<CalendarStore>) -> Self {
        CalendarSync { feed, store }
    }

    pub fn store(&self) -> &Arc<CalendarStore> {
        &self.store
    }

    fn window(&self) -> (NaiveDate, NaiveDate) {
        let today = Local::now().date_naive();
        (today - Duration::days(LOOKBACK_DAYS), today + Duration::days(LOOKAHEAD_DAYS))
    }

    /// Pulls the live window into the store. Upsert only; rows that
    /// dropped out of the feed stay put.
    pub async fn sync(&self) -> Result<usize> {
        let (start, end) = self.window();
        let events = self.feed.fetch_window(start, end).await?;
        let count = self.store.upsert_all(&events)?;
        info!("calendar sync: upserted {count} events ({start} .. {end})");
        Ok(count)
    }

    /// The merged view: live feed plus store rows for the same window,
    /// de-duplicated on `(title, displayed date)` preferring the live
    /// row, then sorted by the real timestamp. The displayed date drops
    /// the year, which is why the sort must use `date_time` and not the
    /// display string.
    pub async fn list(&self, country_code: &str) -> Result<Vec<CalendarEvent>> {
        let (start, end) = self.window();

        let live = match self.feed.fetch_window(start, end).await {
            Ok(events) => events,
            Err(e) => {
                // The store alone is a serviceable answer.
                warn!("calendar live feed unavailable: {e}");
                Vec::new()
            }
        };

        let start_dt = start.and_time(chrono::NaiveTime::MIN);
        let end_dt = end.and_time(chrono::NaiveTime::MIN) + Duration::days(1) - Duration::seconds(1);
        let stored = self.store.range(start_dt, end_dt)?;

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut merged: Vec<CalendarEvent> = Vec::with_capacity(live.len() + stored.len());
        for event in live.into_iter().chain(stored) {
            if seen.insert((event.title.clone(), event.displayed_date())) {
                merged.push(event);
            }
        }
        merged.sort_by_key(|e| e.date_time);

        let filter = country_code.trim().to_uppercase();
        if !filter.is_empty() && filter != "ALL" {
            merged.retain(|e| e.currency == filter);
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::model::Impact;
    use crate::errors::CoreError;
    use async_trait::async_trait;
    use chrono::{NaiveDateTime, Utc};

    struct ScriptedFeed {
        events: Vec<CalendarEvent>,
        fail: bool,
    }

    #[async_trait]
    impl CalendarFeed for ScriptedFeed {
        async fn fetch_window(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<CalendarEvent>> {
            if self.fail {
                return Err(CoreError::Feed("scripted outage".to_string()));
            }
            Ok(self.events.clone())
        }
    }

    fn event(id: &str, title: &str, at: NaiveDateTime, actual: &str) -> CalendarEvent {
        CalendarEvent {
            event_id: id.to_string(),
            date_time: at,
            country_id: 63,
            currency: "TRY".to_string(),
            title: title.to_string(),
            impact: Impact::Medium,
            actual: actual.to_string(),
            forecast: "-".to_string(),
            previous: "-".to_string(),
            unit: String::new(),
        }
    }

    fn in_window(hours_from_now: i64) -> NaiveDateTime {
        (Utc::now() + Duration::hours(hours_from_now)).naive_utc()
    }

    #[tokio::test]
    async fn test_sync_upserts_feed_window() {
        let at = in_window(2);
        let feed = Arc::new(ScriptedFeed {
            events: vec![event("e1", "TÜFE", at, "-"), event("e2", "Faiz", at, "-")],
            fail: false,
        });
        let store = Arc::new(CalendarStore::open_in_memory().unwrap());
        let sync = CalendarSync::new(feed, store.clone());

        assert_eq!(sync.sync().await.unwrap(), 2);
        assert_eq!(store.count().unwrap(), 2);
        // A second sync with updated actuals does not grow the table.
        assert_eq!(sync.sync().await.unwrap(), 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_prefers_live_over_store_duplicate() {
        let at = in_window(3);
        let store = Arc::new(CalendarStore::open_in_memory().unwrap());
        store.upsert(&event("e1", "TÜFE", at, "-")).unwrap();

        let feed = Arc::new(ScriptedFeed {
            events: vec![event("e1", "TÜFE", at, "0.8%")],
            fail: false,
        });
        let sync = CalendarSync::new(feed, store);

        let rows = sync.list("ALL").await.unwrap();
        assert_eq!(rows.len(), 1);
        // Live row wins: its actual value is populated.
        assert_eq!(rows[0].actual, "0.8%");
    }

    #[tokio::test]
    async fn test_list_sorts_chronologically_and_filters_country() {
        let store = Arc::new(CalendarStore::open_in_memory().unwrap());
        let mut usd = event("u1", "CPI", in_window(1), "-");
        usd.currency = "USD".to_string();
        usd.country_id = 5;
        store.upsert(&usd).unwrap();
        store.upsert(&event("t1", "Faiz", in_window(30), "-")).unwrap();
        store.upsert(&event("t2", "TÜFE", in_window(5), "-")).unwrap();

        let feed = Arc::new(ScriptedFeed { events: vec![], fail: false });
        let sync = CalendarSync::new(feed, store);

        let all = sync.list("ALL").await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].date_time <= w[1].date_time));

        let tr_only = sync.list("try").await.unwrap();
        assert_eq!(tr_only.len(), 2);
        assert!(tr_only.iter().all(|e| e.currency == "TRY"));
    }

    #[tokio::test]
    async fn test_list_survives_feed_outage() {
        let store = Arc::new(CalendarStore::open_in_memory().unwrap());
        store.upsert(&event("e1", "Faiz", in_window(2), "-")).unwrap();
        let feed = Arc::new(ScriptedFeed { events: vec![], fail: true });
        let sync = CalendarSync::new(feed, store);

        let rows = sync.list("ALL").await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
