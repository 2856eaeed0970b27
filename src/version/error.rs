use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    BadResponse(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Unparseable version: {0:?}")]
    Unparseable(String),
}
