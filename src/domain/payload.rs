// ==========================================
// Asset import - category insert payloads
// ==========================================
// Role: one struct per category table; a field present in the struct is a
//       column of that table (emitted even when None → NULL), a field absent
//       from the struct is never emitted
// ==========================================

use crate::domain::category::AssetCategory;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed `type` tag of furniture rows
pub const FURNITURE_TYPE_TAG: &str = "Mobiliario";

// ==========================================
// Machinery (table: machinery)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineryPayload {
    pub internal_id: String,
    pub barcode_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub functional_description: Option<String>,
    pub complementary_description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub status: String,
    pub location: String,
    pub ownership: String,
    pub responsible: String,
    pub value: Option<f64>,
    pub accounting_account: Option<String>,
    pub tti: Option<f64>,
    pub remaining_useful_life: Option<f64>,
    pub hours: Option<f64>,
    pub daily_rate: Option<f64>,
    pub year: Option<i32>,
    pub origin_year: Option<i32>,
    pub insurance: Option<String>,
    pub insurance_expiry: Option<String>,
    pub image_url: Option<String>,
}

// ==========================================
// Vehicles (table: vehicles)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePayload {
    #[serde(flatten)]
    pub machinery: MachineryPayload,
    pub domain_number: Option<String>,
    pub engine_number: Option<String>,
    pub chassis_number: Option<String>,
}

// ==========================================
// IT equipment (table: it_equipment)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItEquipmentPayload {
    pub internal_id: String,
    pub barcode_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub status: String,
    pub location: String,
    pub ownership: String,
    pub responsible: String,
    pub assigned_to: Option<String>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub value: Option<f64>,
    pub image_url: Option<String>,
}

// ==========================================
// Furniture (table: mobiliario)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurniturePayload {
    pub internal_id: String,
    pub barcode_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub status: String,
    pub location: String,
    pub ownership: String,
    pub responsible: String,
    pub assigned_to: Option<String>,
    pub value: Option<f64>,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub image_url: Option<String>,
}

// ==========================================
// Infrastructure installations (table: infrastructure_installations)
// ==========================================
// Narrow on purpose: no brand/model/serial, no custody fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationPayload {
    pub internal_id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub status: String,
    pub functional_description: Option<String>,
    pub complementary_description: Option<String>,
    pub barcode_id: Option<String>,
    pub image_url: Option<String>,
}

// ==========================================
// Infrastructure (table: infrastructures)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructurePayload {
    pub internal_id: String,
    pub barcode_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub functional_description: Option<String>,
    pub complementary_description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub status: String,
    pub location: String,
    pub ownership: String,
    pub responsible: String,
    pub value: Option<f64>,
    pub accounting_account: Option<String>,
    pub remaining_useful_life: Option<f64>,
    pub daily_rate: Option<f64>,
    pub year: Option<i32>,
    pub origin_year: Option<i32>,
    pub image_url: Option<String>,
}

// ==========================================
// CategoryInsertPayload - sum type over category shapes
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryInsertPayload {
    Machinery(MachineryPayload),
    Vehicles(VehiclePayload),
    ITEquipment(ItEquipmentPayload),
    InfrastructureInstallation(InstallationPayload),
    Furniture(FurniturePayload),
    Infrastructure(InfrastructurePayload),
}

impl CategoryInsertPayload {
    pub fn category(&self) -> AssetCategory {
        match self {
            CategoryInsertPayload::Machinery(_) => AssetCategory::Machinery,
            CategoryInsertPayload::Vehicles(_) => AssetCategory::Vehicles,
            CategoryInsertPayload::ITEquipment(_) => AssetCategory::ITEquipment,
            CategoryInsertPayload::InfrastructureInstallation(_) => {
                AssetCategory::InfrastructureInstallation
            }
            CategoryInsertPayload::Furniture(_) => AssetCategory::Furniture,
            CategoryInsertPayload::Infrastructure(_) => AssetCategory::Infrastructure,
        }
    }

    pub fn internal_id(&self) -> &str {
        match self {
            CategoryInsertPayload::Machinery(p) => &p.internal_id,
            CategoryInsertPayload::Vehicles(p) => &p.machinery.internal_id,
            CategoryInsertPayload::ITEquipment(p) => &p.internal_id,
            CategoryInsertPayload::InfrastructureInstallation(p) => &p.internal_id,
            CategoryInsertPayload::Furniture(p) => &p.internal_id,
            CategoryInsertPayload::Infrastructure(p) => &p.internal_id,
        }
    }

    /// Column → value row handed to the store
    pub fn to_row(&self) -> serde_json::Result<Map<String, Value>> {
        let value = match self {
            CategoryInsertPayload::Machinery(p) => serde_json::to_value(p)?,
            CategoryInsertPayload::Vehicles(p) => serde_json::to_value(p)?,
            CategoryInsertPayload::ITEquipment(p) => serde_json::to_value(p)?,
            CategoryInsertPayload::InfrastructureInstallation(p) => serde_json::to_value(p)?,
            CategoryInsertPayload::Furniture(p) => serde_json::to_value(p)?,
            CategoryInsertPayload::Infrastructure(p) => serde_json::to_value(p)?,
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "payload did not serialize to an object: {}",
                other
            ))),
        }
    }
}
