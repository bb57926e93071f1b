use crate::dlog;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;

/// A string key-value medium holding named slots.
pub trait SlotStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySlotStore {
    slots: HashMap<String, String>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Slots kept in a single `slots(key, value)` table of a SQLite file.
pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    pub fn open(path: &Path) -> Result<Self> {
        let display = path.display();
        let conn =
            Connection::open(path).with_context(|| format!("Opening SQLite DB: {display}"))?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Opening in-memory SQLite DB")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        if !table_exists(&conn, "slots")? {
            tracing::info!("creating slots table");
            conn.execute_batch(
                r"
                CREATE TABLE slots (
                  key   TEXT PRIMARY KEY NOT NULL,
                  value TEXT NOT NULL
                );
                ",
            )
            .context("Creating slots table")?;
        }
        Ok(Self { conn })
    }
}

impl SlotStore for SqliteSlotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Reading slot {key:?}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"
                INSERT INTO slots (key, value) VALUES (?1, ?2)
                ON CONFLICT (key) DO UPDATE SET value = excluded.value
                ",
                params![key, value],
            )
            .with_context(|| format!("Writing slot {key:?}"))?;
        dlog!("slot_written key={key} bytes={}", value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1", [key])
            .with_context(|| format!("Removing slot {key:?}"))?;
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &mut dyn SlotStore) {
        assert_eq!(store.get("workouts").unwrap(), None);
        store.set("workouts", "[]").unwrap();
        assert_eq!(store.get("workouts").unwrap().as_deref(), Some("[]"));
        store.set("workouts", "[1]").unwrap();
        assert_eq!(store.get("workouts").unwrap().as_deref(), Some("[1]"));
        store.remove("workouts").unwrap();
        assert_eq!(store.get("workouts").unwrap(), None);
        // Removing an absent slot is fine.
        store.remove("workouts").unwrap();
    }

    #[test]
    fn memory_store_overwrites_and_removes() {
        exercise(&mut MemorySlotStore::new());
    }

    #[test]
    fn sqlite_store_overwrites_and_removes() {
        exercise(&mut SqliteSlotStore::in_memory().unwrap());
    }

    #[test]
    fn sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slots.sqlite3");

        {
            let mut store = SqliteSlotStore::open(&path).unwrap();
            store.set("workouts", r#"[{"a":1}]"#).unwrap();
        }

        let store = SqliteSlotStore::open(&path).unwrap();
        assert_eq!(
            store.get("workouts").unwrap().as_deref(),
            Some(r#"[{"a":1}]"#)
        );
    }
}
