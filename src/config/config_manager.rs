// ==========================================
// Asset import - configuration manager
// ==========================================
// Role: load/override import defaults
// Storage: config_kv table (key-value, scope_id = 'global')
// ==========================================

use crate::config::category_defaults::{
    AllocationStrategy, CategoryProfile, ImportPolicy, DEFAULT_ID_PADDING,
};
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::AssetCategory;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Open a ConfigManager on a database file
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ImportError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection (PRAGMAs are re-applied, idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ImportError::InternalError(format!("lock poisoned: {}", e)))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    /// Read a global value; None when the key is not set
    pub fn get_global_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("lock poisoned: {}", e)))?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Upsert a global value
    pub fn set_global_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("lock poisoned: {}", e)))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// All global values, sorted by key
    pub fn get_config_snapshot(&self) -> ImportResult<BTreeMap<String, String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("lock poisoned: {}", e)))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ImportResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }
}

// ==========================================
// ImportConfigReader implementation
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_category_profile(&self, category: AssetCategory) -> ImportResult<CategoryProfile> {
        let builtin = CategoryProfile::builtin(category);

        let padding_raw =
            self.get_config_or_default(config_keys::ID_PADDING, &DEFAULT_ID_PADDING.to_string())?;
        let id_padding = match padding_raw.trim().parse::<usize>() {
            Ok(p) if (1..=10).contains(&p) => p,
            _ => {
                tracing::warn!(
                    config_key = config_keys::ID_PADDING,
                    raw_value = %padding_raw,
                    "invalid id padding, falling back to default"
                );
                DEFAULT_ID_PADDING
            }
        };

        Ok(CategoryProfile {
            category,
            id_prefix: builtin.id_prefix,
            id_padding,
            default_image: self.get_config_or_default(
                &config_keys::default_image(category),
                &builtin.default_image,
            )?,
            default_location: self
                .get_config_or_default(config_keys::DEFAULT_LOCATION, &builtin.default_location)?,
            default_ownership: self
                .get_config_or_default(config_keys::DEFAULT_OWNERSHIP, &builtin.default_ownership)?,
            default_responsible: self.get_config_or_default(
                config_keys::DEFAULT_RESPONSIBLE,
                &builtin.default_responsible,
            )?,
            default_status: self
                .get_config_or_default(config_keys::DEFAULT_STATUS, &builtin.default_status)?,
        })
    }

    async fn get_import_policy(&self) -> ImportResult<ImportPolicy> {
        let defaults = ImportPolicy::default();

        let strategy_raw = self.get_config_or_default(config_keys::ALLOCATION_STRATEGY, "RESERVED")?;
        let allocation_strategy = strategy_raw
            .parse::<AllocationStrategy>()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    config_key = config_keys::ALLOCATION_STRATEGY,
                    raw_value = %strategy_raw,
                    error = %e,
                    "invalid allocation strategy, falling back to RESERVED"
                );
                defaults.allocation_strategy
            });

        let abort_raw =
            self.get_config_or_default(config_keys::ABORT_ON_ALLOCATION_FAILURE, "false")?;
        let abort_on_allocation_failure = matches!(
            abort_raw.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "si" | "sí"
        );

        Ok(ImportPolicy {
            allocation_strategy,
            abort_on_allocation_failure,
        })
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    use crate::domain::AssetCategory;

    pub const DEFAULT_LOCATION: &str = "import.default_location";
    pub const DEFAULT_OWNERSHIP: &str = "import.default_ownership";
    pub const DEFAULT_RESPONSIBLE: &str = "import.default_responsible";
    pub const DEFAULT_STATUS: &str = "import.default_status";
    pub const ID_PADDING: &str = "import.id_padding";
    pub const ALLOCATION_STRATEGY: &str = "import.allocation_strategy";
    pub const ABORT_ON_ALLOCATION_FAILURE: &str = "import.abort_on_allocation_failure";

    pub fn default_image(category: AssetCategory) -> String {
        format!("import.default_image.{}", category.table_name())
    }
}
