//! Durable calendar-event store over SQLite.
//!
//! Writes are serialized behind a mutexed connection. The table only
//! grows: syncs upsert by `event_id` and never delete, so rows survive
//! until an explicit admin delete or a manual upload with `clear`.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::calendar::model::{CalendarEvent, Impact};
use crate::errors::{CoreError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS calendar_events (
        event_id   TEXT PRIMARY KEY,
        date_time  TEXT NOT NULL,
        country_id INTEGER NOT NULL,
        currency   TEXT NOT NULL,
        title      TEXT NOT NULL,
        impact     TEXT NOT NULL,
        actual     TEXT NOT NULL DEFAULT '-',
        forecast   TEXT NOT NULL DEFAULT '-',
        previous   TEXT NOT NULL DEFAULT '-',
        unit       TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_calendar_date ON calendar_events (date_time);
";

pub struct CalendarStore {
    conn: Arc<Mutex<Connection>>,
}

impl CalendarStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Result<Self> {
        let store = CalendarStore { conn };
        store.lock().execute_batch(SCHEMA)?;
        Ok(store)
    }

    /// Convenience constructor for tests and standalone tools.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        CalendarStore::new(Arc::new(Mutex::new(conn)))
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Inserts or updates one event by `event_id`. The mutable fields
    /// (`actual` above all) are refreshed in place on conflict.
    pub fn upsert(&self, event: &CalendarEvent) -> Result<()> {
        self.lock().execute(
            "INSERT INTO calendar_events
                 (event_id, date_time, country_id, currency, title, impact,
                  actual, forecast, previous, unit)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(event_id) DO UPDATE SET
                 date_time = excluded.date_time,
                 title     = excluded.title,
                 impact    = excluded.impact,
                 actual    = excluded.actual,
                 forecast  = excluded.forecast,
                 previous  = excluded.previous,
                 unit      = excluded.unit",
            params![
                event.event_id,
                event.date_time.format(DATE_FORMAT).to_string(),
                event.country_id,
                event.currency,
                event.title,
                event.impact.as_str(),
                event.actual,
                event.forecast,
                event.previous,
                event.unit,
            ],
        )?;
        Ok(())
    }

    pub fn upsert_all(&self, events: &[CalendarEvent]) -> Result<usize> {
        for event in events {
            self.upsert(event)?;
        }
        Ok(events.len())
    }

    /// Events whose `date_time` falls in `[start, end]`, chronological.
    pub fn range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<CalendarEvent>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT event_id, date_time, country_id, currency, title, impact,
                    actual, forecast, previous, unit
             FROM calendar_events
             WHERE date_time >= ?1 AND date_time <= ?2
             ORDER BY date_time ASC",
        )?;
        let rows = stmt.query_map(
            params![
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string()
            ],
            row_to_event,
        )?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(CoreError::from)
    }

    pub fn delete(&self, event_id: &str) -> Result<bool> {
        let changed = self.lock().execute(
            "DELETE FROM calendar_events WHERE event_id = ?1",
            params![event_id],
        )?;
        Ok(changed > 0)
    }

    pub fn clear(&self) -> Result<()> {
        self.lock().execute("DELETE FROM calendar_events", [])?;
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.lock();
        let n = conn.query_row("SELECT COUNT(*) FROM calendar_events", [], |r| r.get(0))?;
        Ok(n)
    }
}

fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<CalendarEvent> {
    let raw_date: String = row.get(1)?;
    let date_time = NaiveDateTime::parse_from_str(&raw_date, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let raw_impact: String = row.get(5)?;
    Ok(CalendarEvent {
        event_id: row.get(0)?,
        date_time,
        country_id: row.get(2)?,
        currency: row.get(3)?,
        title: row.get(4)?,
        impact: Impact::parse(&raw_impact),
        actual: row.get(6)?,
        forecast: row.get(7)?,
        previous: row.get(8)?,
        unit: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(id: &str, day: u32, actual: &str) -> CalendarEvent {
        CalendarEvent {
            event_id: id.to_string(),
            date_time: NaiveDate::from_ymd_opt(2026, 1, day)
                .and_then(|d| d.and_hms_opt(10, 0, 0))
                .unwrap(),
            country_id: 63,
            currency: "TRY".to_string(),
            title: "İşsizlik Oranı".to_string(),
            impact: Impact::High,
            actual: actual.to_string(),
            forecast: "8.5%".to_string(),
            previous: "8.6%".to_string(),
            unit: String::new(),
        }
    }

    #[test]
    fn test_upsert_then_update_in_place() {
        let store = CalendarStore::open_in_memory().unwrap();
        store.upsert(&event("e1", 12, "-")).unwrap();
        store.upsert(&event("e1", 12, "8.4%")).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        let start = NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .unwrap();
        let rows = store.range(start, end).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].actual, "8.4%");
        assert_eq!(rows[0].impact, Impact::High);
    }

    #[test]
    fn test_range_is_chronological_and_bounded() {
        let store = CalendarStore::open_in_memory().unwrap();
        store.upsert(&event("late", 20, "-")).unwrap();
        store.upsert(&event("early", 5, "-")).unwrap();
        store.upsert(&event("out", 31, "-")).unwrap();

        let start = NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 25)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let rows = store.range(start, end).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event_id, "early");
        assert_eq!(rows[1].event_id, "late");
    }

    #[test]
    fn test_clear_and_delete() {
        let store = CalendarStore::open_in_memory().unwrap();
        store.upsert(&event("e1", 12, "-")).unwrap();
        store.upsert(&event("e2", 13, "-")).unwrap();
        assert!(store.delete("e1").unwrap());
        assert!(!store.delete("e1").unwrap());
        assert_eq!(store.count().unwrap(), 1);
        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}
