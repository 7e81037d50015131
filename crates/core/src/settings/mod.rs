//! Key-value application settings.
//!
//! Provider credentials and feature toggles flow through this accessor
//! rather than raw environment reads, so tests can inject values and
//! admin tooling can change them at runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection};

use crate::errors::Result;

pub trait Settings: Send + Sync {
    fn get_value(&self, key: &str) -> Option<String>;
    fn set_value(&self, key: &str, value: &str) -> Result<()>;
}

/// Seeded rows: empty credential slots plus feature defaults. Existing
/// values are never overwritten by the seed pass.
const DEFAULTS: [(&str, &str, &str); 6] = [
    ("FMP_API_KEY", "", "api_keys"),
    ("TWELVEDATA_API_KEY", "", "api_keys"),
    ("EXCHANGERATE_API_KEY", "", "api_keys"),
    ("CALENDAR_SYNC_ENABLED", "1", "features"),
    ("SYMBOL_MASTER_SYNC_ENABLED", "1", "features"),
    ("FUND_REGISTRY_REFRESH_ENABLED", "1", "features"),
];

pub struct SqliteSettings {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSettings {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Result<Self> {
        let settings = SqliteSettings { conn };
        {
            let guard = settings.lock();
            guard.execute_batch(
                "CREATE TABLE IF NOT EXISTS app_settings (
                     key        TEXT PRIMARY KEY,
                     value      TEXT NOT NULL,
                     category   TEXT NOT NULL DEFAULT '',
                     updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                 )",
            )?;
            for (key, value, category) in DEFAULTS {
                guard.execute(
                    "INSERT OR IGNORE INTO app_settings (key, value, category) VALUES (?1, ?2, ?3)",
                    params![key, value, category],
                )?;
            }
        }
        Ok(settings)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Settings for SqliteSettings {
    fn get_value(&self, key: &str) -> Option<String> {
        let conn = self.lock();
        conn.query_row(
            "SELECT value FROM app_settings WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .ok()
        .filter(|v| !v.is_empty())
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.lock().execute(
            "INSERT INTO app_settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory implementation for tests.
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        MemorySettings::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        {
            let mut guard = match self.values.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl Settings for MemorySettings {
    fn get_value(&self, key: &str) -> Option<String> {
        let guard = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.get(key).cloned().filter(|v| !v.is_empty())
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite() -> SqliteSettings {
        let conn = Connection::open_in_memory().unwrap();
        SqliteSettings::new(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_seed_leaves_empty_credentials_absent() {
        let settings = sqlite();
        // Empty string reads as absent, matching the "credential not
        // configured" contract providers rely on.
        assert_eq!(settings.get_value("FMP_API_KEY"), None);
        assert_eq!(settings.get_value("CALENDAR_SYNC_ENABLED"), Some("1".to_string()));
    }

    #[test]
    fn test_set_then_get_and_overwrite() {
        let settings = sqlite();
        settings.set_value("FMP_API_KEY", "abc").unwrap();
        assert_eq!(settings.get_value("FMP_API_KEY"), Some("abc".to_string()));
        settings.set_value("FMP_API_KEY", "def").unwrap();
        assert_eq!(settings.get_value("FMP_API_KEY"), Some("def".to_string()));
    }

    #[test]
    fn test_memory_settings() {
        let settings = MemorySettings::new().with("TWELVEDATA_API_KEY", "k");
        assert_eq!(settings.get_value("TWELVEDATA_API_KEY"), Some("k".to_string()));
        assert_eq!(settings.get_value("MISSING"), None);
    }
}
