// ==========================================
// Asset import - library root
// ==========================================
// Bulk import of asset spreadsheets into per-category tables,
// with internal identifier assignment
// Stack: Rust + SQLite
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - categories, records, payloads
pub mod domain;

// Repository layer - asset store
pub mod repository;

// Import layer - parse, normalize, allocate, insert
pub mod importer;

// Configuration layer - category defaults and policy
pub mod config;

// Database infrastructure (connections, PRAGMAs, schema)
pub mod db;

// Logging
pub mod logging;

// API layer - CLI façade
pub mod api;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    AssetCategory, CanonicalAssetRecord, CategoryInsertPayload, DqLevel, DqViolation,
    ImportOutcome, ImportWarning, RawRow,
};

pub use importer::{
    AssetImporter, AssetImporterImpl, CancelHandle, ImportError, ImportResult, TemplateGenerator,
};

pub use repository::{AssetStore, SqliteAssetStore};

pub use config::{ConfigManager, ImportConfigReader};

pub use api::{ApiError, ImportApi, ImportApiResponse};

// ==========================================
// Version
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "asset-import";
