// ==========================================
// Asset import - category defaults table
// ==========================================
// Role: the single place that holds import defaults per category; read by the
//       field normalizer and the schema mapper through CategoryProfile
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::AssetCategory;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_LOCATION: &str = "Pañol Central";
pub const DEFAULT_OWNERSHIP: &str = "Propio";
pub const DEFAULT_RESPONSIBLE: &str = "Sin Asignar";
pub const DEFAULT_STATUS: &str = "Operativo";
pub const DEFAULT_ID_PADDING: usize = 3;

/// Default image per category when the row carries none
pub fn default_image(category: AssetCategory) -> &'static str {
    match category {
        AssetCategory::Machinery => "/img/defaults/maquinaria.png",
        AssetCategory::Vehicles => "/img/defaults/rodado.png",
        AssetCategory::ITEquipment => "/img/defaults/equipo_informatico.png",
        AssetCategory::InfrastructureInstallation => "/img/defaults/instalacion.png",
        AssetCategory::Furniture => "/img/defaults/mobiliario.png",
        AssetCategory::Infrastructure => "/img/defaults/infraestructura.png",
    }
}

// ==========================================
// CategoryProfile - resolved defaults for one category
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub category: AssetCategory,
    pub id_prefix: String,
    pub id_padding: usize,
    pub default_image: String,
    pub default_location: String,
    pub default_ownership: String,
    pub default_responsible: String,
    pub default_status: String,
}

impl CategoryProfile {
    /// Built-in defaults, no overrides applied
    pub fn builtin(category: AssetCategory) -> Self {
        Self {
            category,
            id_prefix: category.id_prefix().to_string(),
            id_padding: DEFAULT_ID_PADDING,
            default_image: default_image(category).to_string(),
            default_location: DEFAULT_LOCATION.to_string(),
            default_ownership: DEFAULT_OWNERSHIP.to_string(),
            default_responsible: DEFAULT_RESPONSIBLE.to_string(),
            default_status: DEFAULT_STATUS.to_string(),
        }
    }

    /// `{PREFIX}-{n:0width}`
    pub fn format_id(&self, sequence: u64) -> String {
        format!(
            "{}-{:0width$}",
            self.id_prefix,
            sequence,
            width = self.id_padding
        )
    }
}

// ==========================================
// AllocationStrategy / ImportPolicy
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStrategy {
    /// Atomic block reservation through the store's sequence table
    Reserved,
    /// Read the greatest existing id once, then count up in memory
    ReadMax,
}

impl FromStr for AllocationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RESERVED" => Ok(AllocationStrategy::Reserved),
            "READ_MAX" => Ok(AllocationStrategy::ReadMax),
            other => Err(format!("estrategia de asignación inválida: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPolicy {
    pub allocation_strategy: AllocationStrategy,
    pub abort_on_allocation_failure: bool,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            allocation_strategy: AllocationStrategy::Reserved,
            abort_on_allocation_failure: false,
        }
    }
}

// ==========================================
// BuiltinConfig - reader over the static table only
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct BuiltinConfig {
    pub policy: ImportPolicy,
}

impl BuiltinConfig {
    pub fn with_policy(policy: ImportPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl ImportConfigReader for BuiltinConfig {
    async fn get_category_profile(&self, category: AssetCategory) -> ImportResult<CategoryProfile> {
        Ok(CategoryProfile::builtin(category))
    }

    async fn get_import_policy(&self) -> ImportResult<ImportPolicy> {
        Ok(self.policy)
    }
}
