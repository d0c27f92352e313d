// ==========================================
// Asset import - import API
// ==========================================
// Role: façade used by the CLI; wires store, config and importer
//       onto one SQLite connection and maps errors to ApiError
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version};
use crate::domain::{AssetCategory, DqViolation, ImportOutcome};
use crate::importer::{AssetImporter, AssetImporterImpl, CancelHandle, TemplateGenerator};
use crate::repository::SqliteAssetStore;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Import API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// Run id (also present in the logs)
    pub run_id: String,
    pub category: AssetCategory,
    /// Table written to
    pub table: String,
    /// Data rows read from the file
    pub total_rows: usize,
    /// Rows committed
    pub inserted: usize,
    /// Auto-assigned id range (None when every row carried its own id)
    pub first_assigned_id: Option<String>,
    pub last_assigned_id: Option<String>,
    /// Rendered warnings (degraded allocation)
    pub warnings: Vec<String>,
    /// Non-blocking DQ findings
    pub dq_violations: Vec<DqViolation>,
    pub elapsed_ms: i64,
}

impl From<ImportOutcome> for ImportApiResponse {
    fn from(outcome: ImportOutcome) -> Self {
        Self {
            run_id: outcome.run_id,
            category: outcome.category,
            table: outcome.table,
            total_rows: outcome.total_rows,
            inserted: outcome.inserted,
            first_assigned_id: outcome.first_assigned_id,
            last_assigned_id: outcome.last_assigned_id,
            warnings: outcome.warnings.iter().map(|w| w.to_string()).collect(),
            dq_violations: outcome.violations,
            elapsed_ms: outcome.elapsed_time.as_millis() as i64,
        }
    }
}

/// Template export response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateApiResponse {
    pub category: AssetCategory,
    pub path: String,
    pub columns: usize,
}

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Create the schema (idempotent)
    ///
    /// # Returns
    /// - schema version after initialization
    pub fn init_db(&self) -> ApiResult<i64> {
        let conn = open_sqlite_connection(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let version = read_schema_version(&conn)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?
            .ok_or_else(|| ApiError::InternalError("schema_version vacío".to_string()))?;

        info!(db_path = %self.db_path, version, "base de datos inicializada");
        Ok(version)
    }

    /// Import a file into a category
    ///
    /// # Parameters
    /// - category: category name (English, Spanish or table name)
    /// - file_path: .csv or workbook
    pub async fn import_assets(
        &self,
        category: &str,
        file_path: &str,
    ) -> ApiResult<ImportApiResponse> {
        self.import_assets_with_cancel(category, file_path, CancelHandle::new())
            .await
    }

    /// Same as `import_assets`, honoring an external cancellation flag
    pub async fn import_assets_with_cancel(
        &self,
        category: &str,
        file_path: &str,
        cancel: CancelHandle,
    ) -> ApiResult<ImportApiResponse> {
        let category = parse_category(category)?;
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("ruta de archivo vacía".to_string()));
        }

        let conn = self.open_initialized()?;
        let store = Arc::new(SqliteAssetStore::from_connection(conn.clone()));
        let config = ConfigManager::from_connection(conn)?;

        let importer = AssetImporterImpl::with_defaults(store, config).with_cancel_handle(cancel);
        let outcome = importer.import_file(category, Path::new(file_path)).await?;

        Ok(ImportApiResponse::from(outcome))
    }

    /// Write the header-only template of a category
    pub fn export_template(&self, category: &str, out_path: &str) -> ApiResult<TemplateApiResponse> {
        let category = parse_category(category)?;
        if out_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("ruta de salida vacía".to_string()));
        }

        let columns = TemplateGenerator.write_to(category, Path::new(out_path))?;

        Ok(TemplateApiResponse {
            category,
            path: out_path.to_string(),
            columns,
        })
    }

    /// Override one import setting (`import.*` keys)
    pub fn set_config_value(&self, key: &str, value: &str) -> ApiResult<()> {
        if !key.starts_with("import.") {
            return Err(ApiError::InvalidInput(format!("clave no soportada: {}", key)));
        }

        let conn = self.open_initialized()?;
        let config = ConfigManager::from_connection(conn)?;
        config.set_global_value(key, value)?;
        Ok(())
    }

    /// Open the database; fails when `init-db` has not been run
    fn open_initialized(&self) -> ApiResult<Arc<Mutex<Connection>>> {
        let conn = open_sqlite_connection(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;

        let version =
            read_schema_version(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        if version.is_none() {
            return Err(ApiError::DatabaseError(format!(
                "base de datos sin inicializar: {} (ejecute init-db)",
                self.db_path
            )));
        }

        Ok(Arc::new(Mutex::new(conn)))
    }
}

fn parse_category(value: &str) -> ApiResult<AssetCategory> {
    value.parse::<AssetCategory>().map_err(ApiError::InvalidInput)
}
