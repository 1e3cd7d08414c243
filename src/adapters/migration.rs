use crate::utils::error::{PortsError, Result};
use rusqlite::Connection;

pub const SCHEMA_VERSION: i64 = 1;

const CREATE_PORTS: &str = r#"
    CREATE TABLE IF NOT EXISTS ports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        unloc TEXT NOT NULL UNIQUE,
        name TEXT,
        city TEXT,
        country TEXT,
        alias TEXT,
        regions TEXT,
        coordinates TEXT,
        province TEXT,
        timezone TEXT,
        unlocs TEXT,
        code TEXT
    );
"#;

/// 建立 ports 資料表（已存在則略過），並記錄 schema 版本
pub fn migrate(conn: &Connection) -> Result<()> {
    let current: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|source| PortsError::MigrationError { source })?;

    conn.execute_batch(CREATE_PORTS)
        .map_err(|source| PortsError::MigrationError { source })?;

    if current < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(|source| PortsError::MigrationError { source })?;
        tracing::debug!("Migrated ports schema from v{} to v{}", current, SCHEMA_VERSION);
    }

    Ok(())
}
