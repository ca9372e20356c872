use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};
use tokio::sync::watch;

use crate::app::{Result, WhiskerError};
use crate::favorites::FavoritesStore;

const FAVORITES_KEY: &str = "favorites";

/// SQLite-backed favorites.
///
/// The whole set is stored as one JSON array under a single key in a
/// `prefs` table and replaced on every toggle.
pub struct SqliteFavorites {
    conn: Mutex<Connection>,
    tx: watch::Sender<HashSet<String>>,
}

impl SqliteFavorites {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);
        migrations
            .to_latest(&mut conn)
            .map_err(|_| WhiskerError::Database(rusqlite::Error::InvalidQuery))?;

        let initial = Self::load(&conn)?;
        let (tx, _) = watch::channel(initial);

        Ok(Self {
            conn: Mutex::new(conn),
            tx,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            WhiskerError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn load(conn: &Connection) -> Result<HashSet<String>> {
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM prefs WHERE key = ?1",
                params![FAVORITES_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| WhiskerError::Unknown(format!("Corrupt favorites value: {}", e))),
            None => Ok(HashSet::new()),
        }
    }

    fn persist(conn: &Connection, favorites: &HashSet<String>) -> Result<()> {
        let json = serde_json::to_string(favorites)
            .map_err(|e| WhiskerError::Unknown(format!("Failed to encode favorites: {}", e)))?;
        conn.execute(
            "INSERT INTO prefs (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![FAVORITES_KEY, json],
        )?;
        Ok(())
    }
}

impl FavoritesStore for SqliteFavorites {
    fn observe(&self) -> watch::Receiver<HashSet<String>> {
        self.tx.subscribe()
    }

    fn toggle(&self, cat_id: &str) -> Result<()> {
        let conn = self.lock()?;
        let mut favorites = Self::load(&conn)?;
        if !favorites.remove(cat_id) {
            favorites.insert(cat_id.to_string());
        }
        Self::persist(&conn, &favorites)?;
        drop(conn);

        tracing::debug!(cat_id, total = favorites.len(), "Toggled favorite");
        self.tx.send_replace(favorites);
        Ok(())
    }

    fn favorites(&self) -> Result<HashSet<String>> {
        let conn = self.lock()?;
        Self::load(&conn)
    }
}
