// ==========================================
// Asset import - AssetStore implementation (SQLite)
// ==========================================
// Role: category tables + asset_id_sequence through rusqlite
// Concurrency: Arc<Mutex<Connection>> per store, IMMEDIATE transaction for
//              sequence reservation, UNIQUE(internal_id) on every table
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::AssetCategory;
use crate::repository::asset_store::{AssetRow, AssetStore};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// SQLite host parameter limit is 999 on older builds
const IN_CLAUSE_CHUNK: usize = 500;

/// `{prefix}-N` with a non-empty, all-digit suffix (`?1` is the prefix)
const NUMERIC_SUFFIX_FILTER: &str = "internal_id GLOB ?1 || '-[0-9]*' \
     AND SUBSTR(internal_id, LENGTH(?1) + 2) NOT GLOB '*[^0-9]*'";

/// Only the six category tables are addressable
fn checked_table(table: &str) -> RepositoryResult<&str> {
    if AssetCategory::ALL.iter().any(|c| c.table_name() == table) {
        Ok(table)
    } else {
        Err(RepositoryError::UnknownTable(table.to_string()))
    }
}

fn checked_column(column: &str) -> RepositoryResult<&str> {
    let valid = !column.is_empty()
        && column
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(column)
    } else {
        Err(RepositoryError::InvalidColumn(column.to_string()))
    }
}

/// JSON value → SQLite value
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

// ==========================================
// SqliteAssetStore
// ==========================================
pub struct SqliteAssetStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAssetStore {
    /// Open a store on a database file
    ///
    /// # Parameters
    /// - db_path: SQLite file (schema created by `db::init_schema`)
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn max_suffix_sql(table: &str) -> String {
        format!(
            "SELECT internal_id FROM {} WHERE {} \
             ORDER BY CAST(SUBSTR(internal_id, LENGTH(?1) + 2) AS INTEGER) DESC, internal_id DESC \
             LIMIT 1",
            table, NUMERIC_SUFFIX_FILTER
        )
    }
}

#[async_trait]
impl AssetStore for SqliteAssetStore {
    async fn select_max_internal_id(
        &self,
        table: &str,
        prefix: &str,
    ) -> RepositoryResult<Option<String>> {
        let table = checked_table(table)?;
        let conn = self.conn.lock()?;

        let max_id = conn
            .query_row(&Self::max_suffix_sql(table), params![prefix], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;

        Ok(max_id)
    }

    async fn reserve_sequence(
        &self,
        table: &str,
        prefix: &str,
        count: u64,
        min_start: i64,
    ) -> RepositoryResult<i64> {
        let table = checked_table(table)?;
        let count = i64::try_from(count).map_err(|_| RepositoryError::FieldValueError {
            field: "count".to_string(),
            message: format!("bloque demasiado grande: {}", count),
        })?;

        let mut conn = self.conn.lock()?;
        // IMMEDIATE takes the write lock up front so concurrent reservations serialize
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let last_reserved: i64 = tx
            .query_row(
                "SELECT last_value FROM asset_id_sequence WHERE table_name = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0);

        let existing_max: i64 = tx.query_row(
            &format!(
                "SELECT COALESCE(MAX(CAST(SUBSTR(internal_id, LENGTH(?1) + 2) AS INTEGER)), 0) \
                 FROM {} WHERE {}",
                table, NUMERIC_SUFFIX_FILTER
            ),
            params![prefix],
            |row| row.get(0),
        )?;

        let start = last_reserved.max(existing_max).max(min_start);
        // CAST saturates at i64::MAX for oversized suffixes
        let end = start
            .checked_add(count)
            .ok_or_else(|| RepositoryError::FieldValueError {
                field: "last_value".to_string(),
                message: format!("secuencia agotada en {} (último valor {})", table, start),
            })?;

        tx.execute(
            r#"
            INSERT INTO asset_id_sequence (table_name, prefix, last_value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(table_name) DO UPDATE SET
                prefix = excluded.prefix,
                last_value = excluded.last_value,
                updated_at = excluded.updated_at
            "#,
            params![table, prefix, end],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(start)
    }

    async fn find_existing_ids(&self, table: &str, ids: &[String]) -> RepositoryResult<Vec<String>> {
        let table = checked_table(table)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock()?;
        let mut existing = Vec::new();

        for chunk in ids.chunks(IN_CLAUSE_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT internal_id FROM {} WHERE internal_id IN ({})",
                table, placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let found = stmt
                .query_map(params_from_iter(chunk.iter()), |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            existing.extend(found);
        }

        Ok(existing)
    }

    async fn insert_many(&self, table: &str, rows: Vec<AssetRow>) -> RepositoryResult<usize> {
        let table = checked_table(table)?;
        if rows.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.lock()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        for row in &rows {
            let columns = row
                .keys()
                .map(|k| checked_column(k))
                .collect::<RepositoryResult<Vec<_>>>()?;
            let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                placeholders.join(", ")
            );

            let mut stmt = tx.prepare_cached(&sql)?;
            stmt.execute(params_from_iter(row.values().map(to_sql_value)))?;
            count += 1;
        }

        // dropping tx without commit rolls back every row above
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use serde_json::json;

    fn setup_store() -> SqliteAssetStore {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        SqliteAssetStore::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn row(internal_id: &str, name: &str) -> AssetRow {
        let value = json!({ "internal_id": internal_id, "name": name, "brand": null });
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_select_max_orders_numerically() {
        let store = setup_store();
        store
            .insert_many(
                "machinery",
                vec![row("MAQ-999", "a"), row("MAQ-1000", "b"), row("MAQ-020", "c")],
            )
            .await
            .unwrap();

        let max = store.select_max_internal_id("machinery", "MAQ").await.unwrap();
        assert_eq!(max, Some("MAQ-1000".to_string()));
    }

    #[tokio::test]
    async fn test_select_max_empty_table() {
        let store = setup_store();
        let max = store.select_max_internal_id("vehicles", "ROD").await.unwrap();
        assert_eq!(max, None);
    }

    #[tokio::test]
    async fn test_unknown_table_rejected() {
        let store = setup_store();
        let result = store.select_max_internal_id("users; DROP TABLE x", "MAQ").await;
        assert!(matches!(result, Err(RepositoryError::UnknownTable(_))));
    }

    #[tokio::test]
    async fn test_reserve_sequence_respects_existing_rows() {
        let store = setup_store();
        store
            .insert_many("vehicles", vec![row("ROD-007", "Camioneta")])
            .await
            .unwrap();

        let first = store.reserve_sequence("vehicles", "ROD", 3, 0).await.unwrap();
        let second = store.reserve_sequence("vehicles", "ROD", 2, 0).await.unwrap();

        assert_eq!(first, 7);
        assert_eq!(second, 10);
    }

    #[tokio::test]
    async fn test_reserve_sequence_starts_after_min_start() {
        let store = setup_store();

        let first = store.reserve_sequence("machinery", "MAQ", 3, 4).await.unwrap();
        let second = store.reserve_sequence("machinery", "MAQ", 1, 0).await.unwrap();

        assert_eq!(first, 4); // MAQ-005..007
        assert_eq!(second, 7);
    }

    #[tokio::test]
    async fn test_reserve_sequence_oversized_suffix_is_error() {
        let store = setup_store();
        store
            .insert_many("machinery", vec![row("MAQ-99999999999999999999", "Grúa")])
            .await
            .unwrap();

        let result = store.reserve_sequence("machinery", "MAQ", 3, 0).await;
        assert!(matches!(result, Err(RepositoryError::FieldValueError { .. })));

        // nothing was written to the sequence table
        let conn = store.conn.lock().unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM asset_id_sequence", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_non_numeric_suffixes_are_ignored() {
        let store = setup_store();
        store
            .insert_many(
                "machinery",
                vec![
                    row("MAQ-001", "a"),
                    row("MAQ-002", "b"),
                    row("MAQ-9B", "c"),
                    row("MAQ-12abc", "d"),
                ],
            )
            .await
            .unwrap();

        let max = store.select_max_internal_id("machinery", "MAQ").await.unwrap();
        assert_eq!(max, Some("MAQ-002".to_string()));

        let start = store.reserve_sequence("machinery", "MAQ", 1, 0).await.unwrap();
        assert_eq!(start, 2);
    }

    #[tokio::test]
    async fn test_insert_many_all_or_nothing() {
        let store = setup_store();
        let result = store
            .insert_many(
                "mobiliario",
                vec![row("MOB-001", "Silla"), row("MOB-001", "Silla repetida")],
            )
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::UniqueConstraintViolation(_))
        ));

        let existing = store
            .find_existing_ids("mobiliario", &["MOB-001".to_string()])
            .await
            .unwrap();
        assert!(existing.is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_column() {
        let store = setup_store();
        let mut bad = row("MAQ-001", "a");
        bad.insert("name) VALUES ('x'); --".to_string(), json!(1));

        let result = store.insert_many("machinery", vec![bad]).await;
        assert!(matches!(result, Err(RepositoryError::InvalidColumn(_))));
    }

    #[tokio::test]
    async fn test_find_existing_ids() {
        let store = setup_store();
        store
            .insert_many("it_equipment", vec![row("TEC-001", "Notebook")])
            .await
            .unwrap();

        let existing = store
            .find_existing_ids(
                "it_equipment",
                &["TEC-001".to_string(), "TEC-002".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(existing, vec!["TEC-001".to_string()]);
    }
}
