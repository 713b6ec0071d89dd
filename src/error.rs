use thiserror::Error;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Failures raised by the durable key-value layer.
///
/// Input problems (blank titles, stale ids) are not errors: store operations
/// report them by returning `false`/`None` and leave state untouched.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("opening store: {0}")]
    Open(String),

    #[error("reading key '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("writing key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("writing key '{key}' would use {needed} bytes, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("stored value under '{key}' is malformed: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serializing value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
