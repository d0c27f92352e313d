// ==========================================
// Asset import - SQLite connection and schema
// ==========================================
// Goals:
// - one place for PRAGMAs (foreign keys, busy_timeout) on every connection
// - one place for the category tables the importer writes to
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version expected by this build
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Apply the unified PRAGMAs (both are per-connection settings)
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a connection with the unified PRAGMAs applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Read schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

// Columns shared by every category table. `internal_id` is UNIQUE per table;
// it is the backstop against concurrent imports producing the same ids.
const COMMON_COLUMNS: &str = r#"
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    internal_id TEXT NOT NULL UNIQUE,
    barcode_id TEXT,
    name TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'Operativo',
    location TEXT NOT NULL DEFAULT 'Pañol Central',
    image_url TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
"#;

const MACHINERY_COLUMNS: &str = r#"
    functional_description TEXT,
    complementary_description TEXT,
    brand TEXT,
    model TEXT,
    serial_number TEXT,
    ownership TEXT NOT NULL DEFAULT 'Propio',
    responsible TEXT NOT NULL DEFAULT 'Sin Asignar',
    value REAL,
    accounting_account TEXT,
    tti REAL,
    remaining_useful_life REAL,
    hours REAL,
    daily_rate REAL,
    year INTEGER,
    origin_year INTEGER,
    insurance TEXT,
    insurance_expiry TEXT
"#;

const VEHICLE_COLUMNS: &str = r#"
    domain_number TEXT,
    engine_number TEXT,
    chassis_number TEXT
"#;

const IT_EQUIPMENT_COLUMNS: &str = r#"
    brand TEXT,
    model TEXT,
    serial_number TEXT,
    ownership TEXT NOT NULL DEFAULT 'Propio',
    responsible TEXT NOT NULL DEFAULT 'Sin Asignar',
    assigned_to TEXT,
    processor TEXT,
    ram TEXT,
    storage TEXT,
    value REAL
"#;

const FURNITURE_COLUMNS: &str = r#"
    serial_number TEXT,
    ownership TEXT NOT NULL DEFAULT 'Propio',
    responsible TEXT NOT NULL DEFAULT 'Sin Asignar',
    assigned_to TEXT,
    value REAL,
    type TEXT NOT NULL DEFAULT 'Mobiliario'
"#;

const INSTALLATION_COLUMNS: &str = r#"
    functional_description TEXT,
    complementary_description TEXT
"#;

const INFRASTRUCTURE_COLUMNS: &str = r#"
    functional_description TEXT,
    complementary_description TEXT,
    brand TEXT,
    model TEXT,
    serial_number TEXT,
    ownership TEXT NOT NULL DEFAULT 'Propio',
    responsible TEXT NOT NULL DEFAULT 'Sin Asignar',
    value REAL,
    accounting_account TEXT,
    remaining_useful_life REAL,
    daily_rate REAL,
    year INTEGER,
    origin_year INTEGER
"#;

fn create_table_sql(table: &str, extra: &[&str]) -> String {
    let mut columns = vec![COMMON_COLUMNS.trim_end().to_string()];
    columns.extend(extra.iter().map(|c| c.trim_end().to_string()));
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({}\n);",
        table,
        columns.join(",")
    )
}

/// Create every table the importer touches (idempotent)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS asset_id_sequence (
            table_name TEXT PRIMARY KEY,
            prefix TEXT NOT NULL,
            last_value INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    let tables = [
        create_table_sql("machinery", &[MACHINERY_COLUMNS]),
        create_table_sql("vehicles", &[MACHINERY_COLUMNS, VEHICLE_COLUMNS]),
        create_table_sql("it_equipment", &[IT_EQUIPMENT_COLUMNS]),
        create_table_sql("infrastructure_installations", &[INSTALLATION_COLUMNS]),
        create_table_sql("mobiliario", &[FURNITURE_COLUMNS]),
        create_table_sql("infrastructures", &[INFRASTRUCTURE_COLUMNS]),
    ];
    for sql in &tables {
        conn.execute_batch(sql)?;
    }

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// Environment override for the database location
pub const DB_PATH_ENV: &str = "ASSET_IMPORT_DB_PATH";

/// Default database path
///
/// # Resolution
/// 1. `ASSET_IMPORT_DB_PATH` when set and not blank
/// 2. `<data_dir>/asset-import/assets.db` (directory created on demand)
/// 3. `./assets.db`
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./assets.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("asset-import");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("assets.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_category_tables_exist() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        for table in [
            "machinery",
            "vehicles",
            "it_equipment",
            "infrastructure_installations",
            "mobiliario",
            "infrastructures",
        ] {
            let exists: bool = conn
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |_row| Ok(true),
                )
                .optional()
                .unwrap()
                .unwrap_or(false);
            assert!(exists, "missing table {}", table);
        }
    }

    #[test]
    fn test_internal_id_unique() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO mobiliario (internal_id, name) VALUES ('MOB-001', 'Silla')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO mobiliario (internal_id, name) VALUES ('MOB-001', 'Mesa')",
            [],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn test_schema_version_missing() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }

    #[test]
    fn test_default_db_path_file_name() {
        let path = default_db_path();
        assert!(!path.trim().is_empty());
        if std::env::var(DB_PATH_ENV).is_err() {
            assert!(path.ends_with("assets.db"));
        }
    }
}
