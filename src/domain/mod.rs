// ==========================================
// Asset import - domain layer
// ==========================================
// Role: categories, canonical records, category payloads
// Rule: no data access, no pipeline logic
// ==========================================

pub mod asset;
pub mod category;
pub mod payload;

pub use asset::{
    CanonicalAssetRecord, CellValue, DqLevel, DqViolation, ImportOutcome, ImportWarning, RawRow,
};
pub use category::AssetCategory;
pub use payload::{
    CategoryInsertPayload, FurniturePayload, InfrastructurePayload, InstallationPayload,
    ItEquipmentPayload, MachineryPayload, VehiclePayload, FURNITURE_TYPE_TAG,
};
