use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::Result;

/// A stored response body.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub stored_at: String,
}

/// SQLite-backed response store keyed by request identity (`"METHOD URL"`).
pub struct HttpCache {
    conn: Connection,
}

impl HttpCache {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let cache = Self {
            conn: Connection::open(path)?,
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// In-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let cache = Self {
            conn: Connection::open_in_memory()?,
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                method TEXT NOT NULL,
                url TEXT NOT NULL,
                status INTEGER NOT NULL,
                body BLOB NOT NULL,
                stored_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn key(method: &str, url: &str) -> String {
        format!("{} {}", method.to_ascii_uppercase(), url)
    }

    pub fn get(&self, method: &str, url: &str) -> Result<Option<CachedResponse>> {
        let response = self
            .conn
            .query_row(
                "SELECT status, body, stored_at FROM responses WHERE key = ?1",
                params![Self::key(method, url)],
                |row| {
                    Ok(CachedResponse {
                        status: row.get(0)?,
                        body: row.get(1)?,
                        stored_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(response)
    }

    pub fn put(&self, method: &str, url: &str, status: u16, body: &[u8]) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO responses (key, method, url, status, body, stored_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Self::key(method, url),
                method.to_ascii_uppercase(),
                url,
                status,
                body,
                chrono::Local::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Drop every stored response; returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM responses", [])?)
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
