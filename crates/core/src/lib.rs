//! InvestGuide Core Crate
//!
//! Durable-state services behind the market-data aggregation core:
//! - economic calendar store, live feed and sync
//! - key-value application settings (SQLite-backed, seeded defaults)
//! - the closed job registry and the daily midnight scheduler

pub mod calendar;
pub mod errors;
pub mod jobs;
pub mod settings;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

pub use calendar::{CalendarEvent, CalendarFeed, CalendarStore, CalendarSync, Impact, MynetCalendarFeed};
pub use errors::CoreError;
pub use jobs::{spawn_daily_scheduler, JobKind, JobRunner, TaskHandle};
pub use settings::{MemorySettings, Settings, SqliteSettings};

/// Opens (creating if needed) the application database. The calendar
/// store and the settings table share this single connection; SQLite
/// serializes their writes behind the mutex.
pub fn open_database(path: &Path) -> errors::Result<Arc<Mutex<Connection>>> {
    let conn = Connection::open(path)?;
    Ok(Arc::new(Mutex::new(conn)))
}
