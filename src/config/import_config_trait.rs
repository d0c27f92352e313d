// ==========================================
// Asset import - import configuration reader trait
// ==========================================
// Role: configuration the import pipeline needs (read only)
// Implementors: ConfigManager (config_kv table), BuiltinConfig (static table)
// ==========================================

use crate::config::category_defaults::{CategoryProfile, ImportPolicy};
use crate::domain::AssetCategory;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Resolved defaults for one category
    ///
    /// # Defaults
    /// - location: "Pañol Central"
    /// - ownership: "Propio"
    /// - responsible: "Sin Asignar"
    /// - status: "Operativo"
    /// - id padding: 3
    async fn get_category_profile(&self, category: AssetCategory) -> ImportResult<CategoryProfile>;

    /// Identifier allocation policy
    ///
    /// # Defaults
    /// - allocation_strategy: RESERVED
    /// - abort_on_allocation_failure: false
    async fn get_import_policy(&self) -> ImportResult<ImportPolicy>;
}
