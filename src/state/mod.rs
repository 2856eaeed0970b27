//! Persisted check state
//!
//! The monitor only needs a string key-value store scoped to one
//! installation. [`CheckState`] is the typed view over the keys it uses.
//!
//! # Modules
//!
//! - [`sqlite`]: SQLite-backed store surviving restarts
//! - [`memory`]: In-process store

pub mod memory;
pub mod sqlite;

#[cfg(test)]
use mockall::automock;

use crate::version::error::StoreError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Setting keys
pub mod keys {
    pub const LAST_CHECK_AT: &str = "lastCheckAt";
    pub const CHECK_INTERVAL_HOURS: &str = "checkIntervalHours";
    pub const HIDDEN_UNTIL_UPDATE: &str = "hiddenUntilUpdate";
    pub const SNOOZED_UNTIL: &str = "snoozedUntil";
    pub const LAST_FINGERPRINT: &str = "lastFingerprint";
}

/// Key-value persistence for one installation
#[cfg_attr(test, automock)]
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Typed accessors layered over [`StateStore`]
pub trait StateStoreExt: StateStore {
    fn get_i64(&self, key: &str, default: i64) -> Result<i64, StoreError> {
        self.get_parsed(key, default)
    }

    fn get_f64(&self, key: &str, default: f64) -> Result<f64, StoreError> {
        self.get_parsed(key, default)
    }

    fn get_bool(&self, key: &str, default: bool) -> Result<bool, StoreError> {
        self.get_parsed(key, default)
    }

    fn get_string(&self, key: &str) -> Result<String, StoreError> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    fn get_parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T, StoreError> {
        match self.get(key)? {
            None => Ok(default),
            Some(value) => value.trim().parse().map_err(|_| StoreError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        }
    }
}

impl<S: StateStore + ?Sized> StateStoreExt for S {}

/// Snapshot of everything persisted between check cycles
#[derive(Debug, Clone, PartialEq)]
pub struct CheckState {
    /// Epoch milliseconds of the last started cycle (0 = never)
    pub last_check_at: i64,
    pub check_interval_hours: f64,
    pub hidden_until_update: bool,
    /// Epoch milliseconds until which notifications are snoozed (0 = not snoozed)
    pub snoozed_until: i64,
    pub last_fingerprint: String,
}

impl CheckState {
    /// State of an installation that has never run a check
    pub fn initial(check_interval_hours: f64) -> Self {
        Self {
            last_check_at: 0,
            check_interval_hours,
            hidden_until_update: false,
            snoozed_until: 0,
            last_fingerprint: String::new(),
        }
    }

    /// Read the state, falling back to defaults for keys never written
    pub fn load(
        store: &dyn StateStore,
        default_interval_hours: f64,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            last_check_at: store.get_i64(keys::LAST_CHECK_AT, 0)?,
            check_interval_hours: store
                .get_f64(keys::CHECK_INTERVAL_HOURS, default_interval_hours)?,
            hidden_until_update: store.get_bool(keys::HIDDEN_UNTIL_UPDATE, false)?,
            snoozed_until: store.get_i64(keys::SNOOZED_UNTIL, 0)?,
            last_fingerprint: store.get_string(keys::LAST_FINGERPRINT)?,
        })
    }
}
