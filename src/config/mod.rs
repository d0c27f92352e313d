// ==========================================
// Asset import - configuration layer
// ==========================================
// Role: category defaults and import policy, overridable per database
// Storage: config_kv table
// ==========================================

pub mod category_defaults;
pub mod config_manager;
pub mod import_config_trait;

pub use category_defaults::{
    AllocationStrategy, BuiltinConfig, CategoryProfile, ImportPolicy, DEFAULT_LOCATION,
    DEFAULT_OWNERSHIP, DEFAULT_RESPONSIBLE, DEFAULT_STATUS,
};
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::ImportConfigReader;
