use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::state::StateStore;
use crate::version::error::StoreError;

/// SQLite-backed state store; every row belongs to one installation
pub struct SqliteStore {
    conn: Mutex<Connection>,
    installation: String,
}

impl SqliteStore {
    pub fn new(db_path: &Path, installation: &str) -> Result<Self, StoreError> {
        info!("Initializing state database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let store = Self {
            conn: Mutex::new(conn),
            installation: installation.to_string(),
        };

        store.create_schema()?;
        info!("State store initialized for installation {:?}", installation);

        Ok(store)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                installation TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (installation, key)
            )
            "#,
            [],
        )?;

        debug!("Database schema created successfully");
        Ok(())
    }
}

impl StateStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock_conn()?;
        let result = conn.query_row(
            "SELECT value FROM settings WHERE installation = ?1 AND key = ?2",
            (&self.installation, key),
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        debug!("Setting {}/{} = {:?}", self.installation, key, value);

        let now = Self::current_timestamp_ms();
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO settings (installation, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(installation, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            (&self.installation, key, value, now),
        )?;

        Ok(())
    }
}
