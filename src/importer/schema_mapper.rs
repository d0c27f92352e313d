// ==========================================
// Asset import - category schema mapper
// ==========================================
// Role: canonical record → category payload (pure projection per variant)
// Rule: fields outside a variant are dropped, never null-padded
// ==========================================

use crate::domain::{
    AssetCategory, CanonicalAssetRecord, CategoryInsertPayload, FurniturePayload,
    InfrastructurePayload, InstallationPayload, ItEquipmentPayload, MachineryPayload,
    VehiclePayload, FURNITURE_TYPE_TAG,
};
use crate::importer::asset_importer_trait::SchemaMapper;

/// Columns of each category table, in schema order (excluding the fixed `type`)
pub fn schema_fields(category: AssetCategory) -> &'static [&'static str] {
    match category {
        AssetCategory::Machinery => MACHINERY_FIELDS,
        AssetCategory::Vehicles => VEHICLE_FIELDS,
        AssetCategory::ITEquipment => IT_EQUIPMENT_FIELDS,
        AssetCategory::Furniture => FURNITURE_FIELDS,
        AssetCategory::InfrastructureInstallation => INSTALLATION_FIELDS,
        AssetCategory::Infrastructure => INFRASTRUCTURE_FIELDS,
    }
}

const MACHINERY_FIELDS: &[&str] = &[
    "internal_id",
    "barcode_id",
    "name",
    "description",
    "functional_description",
    "complementary_description",
    "brand",
    "model",
    "serial_number",
    "status",
    "location",
    "ownership",
    "responsible",
    "value",
    "accounting_account",
    "tti",
    "remaining_useful_life",
    "hours",
    "daily_rate",
    "year",
    "origin_year",
    "insurance",
    "insurance_expiry",
    "image_url",
];

const VEHICLE_FIELDS: &[&str] = &[
    "internal_id",
    "barcode_id",
    "name",
    "description",
    "functional_description",
    "complementary_description",
    "brand",
    "model",
    "serial_number",
    "status",
    "location",
    "ownership",
    "responsible",
    "value",
    "accounting_account",
    "tti",
    "remaining_useful_life",
    "hours",
    "daily_rate",
    "year",
    "origin_year",
    "insurance",
    "insurance_expiry",
    "image_url",
    "domain_number",
    "engine_number",
    "chassis_number",
];

const IT_EQUIPMENT_FIELDS: &[&str] = &[
    "internal_id",
    "barcode_id",
    "name",
    "description",
    "brand",
    "model",
    "serial_number",
    "status",
    "location",
    "ownership",
    "responsible",
    "assigned_to",
    "processor",
    "ram",
    "storage",
    "value",
    "image_url",
];

const FURNITURE_FIELDS: &[&str] = &[
    "internal_id",
    "barcode_id",
    "name",
    "description",
    "serial_number",
    "status",
    "location",
    "ownership",
    "responsible",
    "assigned_to",
    "value",
    "image_url",
];

const INSTALLATION_FIELDS: &[&str] = &[
    "internal_id",
    "name",
    "description",
    "location",
    "status",
    "functional_description",
    "complementary_description",
    "barcode_id",
    "image_url",
];

const INFRASTRUCTURE_FIELDS: &[&str] = &[
    "internal_id",
    "barcode_id",
    "name",
    "description",
    "functional_description",
    "complementary_description",
    "brand",
    "model",
    "serial_number",
    "status",
    "location",
    "ownership",
    "responsible",
    "value",
    "accounting_account",
    "remaining_useful_life",
    "daily_rate",
    "year",
    "origin_year",
    "image_url",
];

// ==========================================
// Projections
// ==========================================

fn project_machinery(r: &CanonicalAssetRecord) -> MachineryPayload {
    MachineryPayload {
        internal_id: r.internal_id.clone(),
        barcode_id: r.barcode_id.clone(),
        name: r.name.clone(),
        description: r.description.clone(),
        functional_description: r.functional_description.clone(),
        complementary_description: r.complementary_description.clone(),
        brand: r.brand.clone(),
        model: r.model.clone(),
        serial_number: r.serial_number.clone(),
        status: r.status.clone(),
        location: r.location.clone(),
        ownership: r.ownership.clone(),
        responsible: r.responsible.clone(),
        value: r.value,
        accounting_account: r.accounting_account.clone(),
        tti: r.tti,
        remaining_useful_life: r.remaining_useful_life,
        hours: r.hours,
        daily_rate: r.daily_rate,
        year: r.year,
        origin_year: r.origin_year,
        insurance: r.insurance.clone(),
        insurance_expiry: r.insurance_expiry.clone(),
        image_url: r.image_url.clone(),
    }
}

fn project_vehicle(r: &CanonicalAssetRecord) -> VehiclePayload {
    VehiclePayload {
        machinery: project_machinery(r),
        domain_number: r.domain_number.clone(),
        engine_number: r.engine_number.clone(),
        chassis_number: r.chassis_number.clone(),
    }
}

fn project_it_equipment(r: &CanonicalAssetRecord) -> ItEquipmentPayload {
    ItEquipmentPayload {
        internal_id: r.internal_id.clone(),
        barcode_id: r.barcode_id.clone(),
        name: r.name.clone(),
        description: r.description.clone(),
        brand: r.brand.clone(),
        model: r.model.clone(),
        serial_number: r.serial_number.clone(),
        status: r.status.clone(),
        location: r.location.clone(),
        ownership: r.ownership.clone(),
        responsible: r.responsible.clone(),
        assigned_to: r.assigned_to.clone(),
        processor: r.processor.clone(),
        ram: r.ram.clone(),
        storage: r.storage.clone(),
        value: r.value,
        image_url: r.image_url.clone(),
    }
}

fn project_furniture(r: &CanonicalAssetRecord) -> FurniturePayload {
    FurniturePayload {
        internal_id: r.internal_id.clone(),
        barcode_id: r.barcode_id.clone(),
        name: r.name.clone(),
        description: r.description.clone(),
        serial_number: r.serial_number.clone(),
        status: r.status.clone(),
        location: r.location.clone(),
        ownership: r.ownership.clone(),
        responsible: r.responsible.clone(),
        assigned_to: r.assigned_to.clone(),
        value: r.value,
        asset_type: FURNITURE_TYPE_TAG.to_string(),
        image_url: r.image_url.clone(),
    }
}

fn project_installation(r: &CanonicalAssetRecord) -> InstallationPayload {
    InstallationPayload {
        internal_id: r.internal_id.clone(),
        name: r.name.clone(),
        description: r.description.clone(),
        location: r.location.clone(),
        status: r.status.clone(),
        functional_description: r.functional_description.clone(),
        complementary_description: r.complementary_description.clone(),
        barcode_id: r.barcode_id.clone(),
        image_url: r.image_url.clone(),
    }
}

fn project_infrastructure(r: &CanonicalAssetRecord) -> InfrastructurePayload {
    InfrastructurePayload {
        internal_id: r.internal_id.clone(),
        barcode_id: r.barcode_id.clone(),
        name: r.name.clone(),
        description: r.description.clone(),
        functional_description: r.functional_description.clone(),
        complementary_description: r.complementary_description.clone(),
        brand: r.brand.clone(),
        model: r.model.clone(),
        serial_number: r.serial_number.clone(),
        status: r.status.clone(),
        location: r.location.clone(),
        ownership: r.ownership.clone(),
        responsible: r.responsible.clone(),
        value: r.value,
        accounting_account: r.accounting_account.clone(),
        remaining_useful_life: r.remaining_useful_life,
        daily_rate: r.daily_rate,
        year: r.year,
        origin_year: r.origin_year,
        image_url: r.image_url.clone(),
    }
}

// ==========================================
// CategorySchemaMapper
// ==========================================
pub struct CategorySchemaMapper;

impl SchemaMapper for CategorySchemaMapper {
    fn project(
        &self,
        record: &CanonicalAssetRecord,
        category: AssetCategory,
    ) -> CategoryInsertPayload {
        match category {
            AssetCategory::Machinery => CategoryInsertPayload::Machinery(project_machinery(record)),
            AssetCategory::Vehicles => CategoryInsertPayload::Vehicles(project_vehicle(record)),
            AssetCategory::ITEquipment => {
                CategoryInsertPayload::ITEquipment(project_it_equipment(record))
            }
            AssetCategory::InfrastructureInstallation => {
                CategoryInsertPayload::InfrastructureInstallation(project_installation(record))
            }
            AssetCategory::Furniture => CategoryInsertPayload::Furniture(project_furniture(record)),
            AssetCategory::Infrastructure => {
                CategoryInsertPayload::Infrastructure(project_infrastructure(record))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn full_record() -> CanonicalAssetRecord {
        CanonicalAssetRecord {
            internal_id: "X-001".to_string(),
            name: "Activo".to_string(),
            status: "Operativo".to_string(),
            location: "Pañol Central".to_string(),
            ownership: "Propio".to_string(),
            responsible: "Sin Asignar".to_string(),
            chassis_number: Some("CH-9".to_string()),
            domain_number: Some("AB123CD".to_string()),
            processor: Some("i7".to_string()),
            hours: Some(1200.0),
            year: Some(2015),
            ..Default::default()
        }
    }

    #[test]
    fn test_furniture_never_contains_chassis_number() {
        let payload = CategorySchemaMapper.project(&full_record(), AssetCategory::Furniture);
        let row = payload.to_row().unwrap();

        assert!(!row.contains_key("chassis_number"));
        assert!(!row.contains_key("processor"));
        assert!(!row.contains_key("hours"));
        assert_eq!(row.get("type"), Some(&Value::String("Mobiliario".to_string())));
    }

    #[test]
    fn test_vehicle_row_is_flat() {
        let payload = CategorySchemaMapper.project(&full_record(), AssetCategory::Vehicles);
        let row = payload.to_row().unwrap();

        assert!(!row.contains_key("machinery"));
        assert_eq!(row.get("chassis_number"), Some(&Value::String("CH-9".to_string())));
        assert_eq!(row.get("internal_id"), Some(&Value::String("X-001".to_string())));
    }

    #[test]
    fn test_known_absence_is_null() {
        let payload = CategorySchemaMapper.project(&full_record(), AssetCategory::Machinery);
        let row = payload.to_row().unwrap();

        assert_eq!(row.get("brand"), Some(&Value::Null));
        assert!(!row.contains_key("domain_number"));
    }

    #[test]
    fn test_row_keys_match_schema_fields() {
        for category in AssetCategory::ALL {
            let row = CategorySchemaMapper
                .project(&full_record(), category)
                .to_row()
                .unwrap();

            let mut expected: Vec<&str> = schema_fields(category).to_vec();
            if category == AssetCategory::Furniture {
                expected.push("type");
            }
            expected.sort();

            let mut keys: Vec<&str> = row.keys().map(String::as_str).collect();
            keys.sort();

            assert_eq!(keys, expected, "category {}", category);
        }
    }

    #[test]
    fn test_installation_is_narrow() {
        let payload = CategorySchemaMapper
            .project(&full_record(), AssetCategory::InfrastructureInstallation);
        let row = payload.to_row().unwrap();

        assert!(!row.contains_key("brand"));
        assert!(!row.contains_key("ownership"));
        assert_eq!(payload.category(), AssetCategory::InfrastructureInstallation);
    }
}
