use crate::adapters::migration::migrate;
use crate::domain::model::{Coordinates, Port};
use crate::domain::ports::PortRepository;
use crate::utils::error::{PortsError, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

/// Opens a SQLite connection; `:memory:` gives a private in-memory database.
pub fn connect(path: &str) -> Result<Connection> {
    Connection::open(path).map_err(|source| PortsError::ConnectionError {
        path: path.to_string(),
        source,
    })
}

const UPSERT_PORT: &str = r#"
    INSERT INTO ports (
        unloc, name, city, country, alias, regions,
        coordinates, province, timezone, unlocs, code
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    ON CONFLICT(unloc) DO UPDATE SET
        name = excluded.name,
        city = excluded.city,
        country = excluded.country,
        alias = excluded.alias,
        regions = excluded.regions,
        coordinates = excluded.coordinates,
        province = excluded.province,
        timezone = excluded.timezone,
        unlocs = excluded.unlocs,
        code = excluded.code
"#;

const SELECT_PORT: &str = r#"
    SELECT unloc, name, city, country, alias, regions,
           coordinates, province, timezone, unlocs, code
    FROM ports WHERE unloc = ?1
"#;

/// SQLite 實作的 port 儲存
///
/// 陣列欄位（alias、regions、coordinates、unlocs）以 JSON 字串存放，
/// 缺少的 optional 欄位存成 NULL。
pub struct SqlitePortRepository {
    conn: Mutex<Connection>,
}

impl SqlitePortRepository {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: &str) -> Result<Self> {
        let conn = connect(path)?;
        migrate(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| PortsError::StoreUnavailable {
            message: format!("connection lock poisoned: {}", e),
        })
    }

    pub fn find_port(&self, unloc: &str) -> Result<Option<Port>> {
        let conn = self.lock()?;
        let raw = conn
            .query_row(SELECT_PORT, params![unloc], RawPort::from_row)
            .optional()
            .map_err(|e| PortsError::StoreUnavailable {
                message: format!("failed to load port {}: {}", unloc, e),
            })?;

        raw.map(RawPort::into_port).transpose()
    }

    pub fn count_ports(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM ports", [], |row| row.get(0))
            .map_err(|e| PortsError::StoreUnavailable {
                message: format!("failed to count ports: {}", e),
            })?;
        Ok(count as usize)
    }
}

impl PortRepository for SqlitePortRepository {
    fn upsert_port(&self, port: &Port) -> Result<()> {
        let alias = encode_optional(&port.alias)?;
        let regions = encode_optional(&port.regions)?;
        let coordinates = encode_optional(&port.coordinates)?;
        let unlocs = serde_json::to_string(&port.unlocs)?;

        let conn = self.lock()?;
        conn.execute(
            UPSERT_PORT,
            params![
                port.unloc,
                port.name,
                port.city,
                port.country,
                alias,
                regions,
                coordinates,
                port.province,
                port.timezone,
                unlocs,
                port.code,
            ],
        )
        .map_err(|source| PortsError::UpsertError {
            unloc: port.unloc.clone(),
            source,
        })?;

        Ok(())
    }
}

fn encode_optional<T: Serialize>(value: &Option<T>) -> Result<Option<String>> {
    value
        .as_ref()
        .map(|v| serde_json::to_string(v).map_err(PortsError::from))
        .transpose()
}

fn decode_optional<T: DeserializeOwned>(value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| serde_json::from_str(&v).map_err(PortsError::from))
        .transpose()
}

struct RawPort {
    unloc: String,
    name: Option<String>,
    city: Option<String>,
    country: Option<String>,
    alias: Option<String>,
    regions: Option<String>,
    coordinates: Option<String>,
    province: Option<String>,
    timezone: Option<String>,
    unlocs: Option<String>,
    code: Option<String>,
}

impl RawPort {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            unloc: row.get(0)?,
            name: row.get(1)?,
            city: row.get(2)?,
            country: row.get(3)?,
            alias: row.get(4)?,
            regions: row.get(5)?,
            coordinates: row.get(6)?,
            province: row.get(7)?,
            timezone: row.get(8)?,
            unlocs: row.get(9)?,
            code: row.get(10)?,
        })
    }

    fn into_port(self) -> Result<Port> {
        Ok(Port {
            unloc: self.unloc,
            name: self.name.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            alias: decode_optional(self.alias)?,
            regions: decode_optional(self.regions)?,
            coordinates: decode_optional::<Coordinates>(self.coordinates)?,
            province: self.province.unwrap_or_default(),
            timezone: self.timezone.unwrap_or_default(),
            unlocs: decode_optional(self.unlocs)?.unwrap_or_default(),
            code: self.code.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ajman() -> Port {
        Port {
            unloc: "AEAJM".to_string(),
            name: "Ajman".to_string(),
            city: "Ajman".to_string(),
            country: "United Arab Emirates".to_string(),
            alias: Some(vec![]),
            regions: Some(vec![]),
            coordinates: Some(Coordinates(55.5136433, 25.4052165)),
            province: "Ajman".to_string(),
            timezone: "Asia/Dubai".to_string(),
            unlocs: vec!["AEAJM".to_string()],
            code: "52000".to_string(),
        }
    }

    #[test]
    fn test_upsert_inserts_new_port() {
        let repo = SqlitePortRepository::in_memory().unwrap();
        repo.upsert_port(&ajman()).unwrap();

        assert_eq!(repo.count_ports().unwrap(), 1);
        assert_eq!(repo.find_port("AEAJM").unwrap(), Some(ajman()));
    }

    #[test]
    fn test_upsert_replaces_every_column_on_conflict() {
        let repo = SqlitePortRepository::in_memory().unwrap();
        let mut initial = ajman();
        initial.alias = Some(vec!["AJMAN".to_string()]);
        initial.coordinates = Some(Coordinates(56.5136433, 26.4052165));
        repo.upsert_port(&initial).unwrap();

        let replacement = Port {
            unloc: "AEAJM".to_string(),
            name: "Ajman Port".to_string(),
            coordinates: Some(Coordinates(55.5136433, 25.4052165)),
            ..Default::default()
        };
        repo.upsert_port(&replacement).unwrap();

        assert_eq!(repo.count_ports().unwrap(), 1);
        let stored = repo.find_port("AEAJM").unwrap().unwrap();
        assert_eq!(stored, replacement);
        assert!(stored.alias.is_none());
        assert_eq!(stored.city, "");
    }

    #[test]
    fn test_missing_optional_arrays_stored_as_null() {
        let repo = SqlitePortRepository::in_memory().unwrap();
        let port = Port {
            unloc: "AEDXB".to_string(),
            name: "Dubai".to_string(),
            ..Default::default()
        };
        repo.upsert_port(&port).unwrap();

        let conn = repo.lock().unwrap();
        let (alias, regions, unlocs): (Option<String>, Option<String>, Option<String>) = conn
            .query_row(
                "SELECT alias, regions, unlocs FROM ports WHERE unloc = 'AEDXB'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert!(alias.is_none());
        assert!(regions.is_none());
        assert_eq!(unlocs.as_deref(), Some("[]"));
    }

    #[test]
    fn test_coordinates_stored_as_json_array() {
        let repo = SqlitePortRepository::in_memory().unwrap();
        repo.upsert_port(&ajman()).unwrap();

        let conn = repo.lock().unwrap();
        let coordinates: String = conn
            .query_row(
                "SELECT coordinates FROM ports WHERE unloc = 'AEAJM'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(coordinates, "[55.5136433,25.4052165]");
    }

    #[test]
    fn test_find_unknown_port() {
        let repo = SqlitePortRepository::in_memory().unwrap();
        assert!(repo.find_port("ZZZZZ").unwrap().is_none());
    }

    #[test]
    fn test_upsert_without_schema_fails_per_record() {
        let conn = connect(":memory:").unwrap();
        let repo = SqlitePortRepository::new(conn);

        let err = repo.upsert_port(&ajman()).unwrap_err();
        assert!(matches!(err, PortsError::UpsertError { ref unloc, .. } if unloc == "AEAJM"));
        assert!(!err.is_fatal());
    }
}
