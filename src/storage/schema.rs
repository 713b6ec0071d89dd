use rusqlite::Connection;

use crate::error::{StorageError, StorageResult};

pub fn apply(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        "#,
    )
    .map_err(|err| StorageError::Open(format!("applying schema: {err}")))?;
    Ok(())
}
