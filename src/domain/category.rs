// ==========================================
// Asset import - asset categories
// ==========================================
// Role: fixed category set, target table and id prefix per category
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// AssetCategory
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    Machinery,
    Vehicles,
    ITEquipment,
    InfrastructureInstallation,
    Furniture,
    Infrastructure,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 6] = [
        AssetCategory::Machinery,
        AssetCategory::Vehicles,
        AssetCategory::ITEquipment,
        AssetCategory::InfrastructureInstallation,
        AssetCategory::Furniture,
        AssetCategory::Infrastructure,
    ];

    /// Target table in the asset store
    pub fn table_name(&self) -> &'static str {
        match self {
            AssetCategory::Machinery => "machinery",
            AssetCategory::Vehicles => "vehicles",
            AssetCategory::ITEquipment => "it_equipment",
            AssetCategory::InfrastructureInstallation => "infrastructure_installations",
            AssetCategory::Furniture => "mobiliario",
            AssetCategory::Infrastructure => "infrastructures",
        }
    }

    /// Prefix of auto-assigned internal identifiers (`MAQ-001`)
    pub fn id_prefix(&self) -> &'static str {
        match self {
            AssetCategory::Machinery => "MAQ",
            AssetCategory::Vehicles => "ROD",
            AssetCategory::ITEquipment => "TEC",
            AssetCategory::InfrastructureInstallation => "INS",
            AssetCategory::Furniture => "MOB",
            AssetCategory::Infrastructure => "INF",
        }
    }

    /// Display label used in messages and templates
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::Machinery => "Maquinaria",
            AssetCategory::Vehicles => "Rodados",
            AssetCategory::ITEquipment => "Equipos Informáticos",
            AssetCategory::InfrastructureInstallation => "Instalaciones de Infraestructura",
            AssetCategory::Furniture => "Mobiliario",
            AssetCategory::Infrastructure => "Infraestructura",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "machinery" | "maquinaria" | "maq" => Ok(AssetCategory::Machinery),
            "vehicles" | "vehicle" | "vehiculos" | "vehículos" | "rodados" | "rod" => {
                Ok(AssetCategory::Vehicles)
            }
            "it" | "it_equipment" | "itequipment" | "informatica" | "informática"
            | "equipos_informaticos" | "tec" => Ok(AssetCategory::ITEquipment),
            "installations" | "infrastructure_installations" | "instalaciones" | "ins" => {
                Ok(AssetCategory::InfrastructureInstallation)
            }
            "furniture" | "mobiliario" | "mob" => Ok(AssetCategory::Furniture),
            "infrastructure" | "infrastructures" | "infraestructura" | "inf" => {
                Ok(AssetCategory::Infrastructure)
            }
            _ => Err(format!("categoría desconocida: {}", s.trim())),
        }
    }
}
