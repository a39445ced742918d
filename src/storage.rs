// 💾 Storage - Key-value snapshots for the ledger and theme
// One row per key, each write replaces the whole value

use crate::ledger::Ledger;
use crate::theme::Theme;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// Key holding the serialized ledger
pub const COURSES_KEY: &str = "gpaCourses";

/// Key holding the theme preference
pub const THEME_KEY: &str = "theme";

// ============================================================================
// STORE TRAIT
// ============================================================================

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        setup_store(&conn)?;
        tracing::info!(path = %path.display(), "store opened");
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_store(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// When `key` was last written
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let stamp: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match stamp {
            Some(s) => {
                let parsed = DateTime::parse_from_rfc3339(&s)
                    .with_context(|| format!("Bad timestamp for key {}: {}", key, s))?;
                Ok(Some(parsed.with_timezone(&Utc)))
            }
            None => Ok(None),
        }
    }
}

pub fn setup_store(conn: &Connection) -> Result<()> {
    // WAL keeps the previous snapshot readable if a write is interrupted
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value BLOB NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create kv table")?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, Vec<u8>>(0)
            })
            .optional()
            .with_context(|| format!("Failed to read key {}", key))?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to write key {}", key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to delete key {}", key))?;
        Ok(())
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// HashMap-backed store; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

// ============================================================================
// LOAD / SAVE
// ============================================================================

/// Read the persisted ledger. Missing, unreadable or corrupt data is an
/// empty ledger; the caller never sees an error.
pub fn load_ledger(store: &dyn KeyValueStore) -> Ledger {
    match store.get(COURSES_KEY) {
        Ok(Some(bytes)) => Ledger::deserialize(&bytes),
        Ok(None) => Ledger::new(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read saved courses, starting empty");
            Ledger::new()
        }
    }
}

pub fn save_ledger(store: &dyn KeyValueStore, ledger: &Ledger) -> Result<()> {
    store.set(COURSES_KEY, &ledger.serialize())?;
    tracing::debug!(courses = ledger.len(), "ledger saved");
    Ok(())
}

pub fn load_theme(store: &dyn KeyValueStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(value) => {
            let text = value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
            Theme::from_stored(text.as_deref())
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not read theme, using default");
            Theme::default()
        }
    }
}

pub fn save_theme(store: &dyn KeyValueStore, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.as_str().as_bytes())?;
    tracing::debug!(theme = theme.as_str(), "theme saved");
    Ok(())
}
