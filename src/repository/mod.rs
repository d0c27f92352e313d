// ==========================================
// Asset import - repository layer
// ==========================================
// Rule: no business logic in repositories
// Role: data access behind traits, database details hidden
// Constraint: parameterized queries; table and column names are whitelisted
// ==========================================

pub mod asset_store;
pub mod asset_store_impl;
pub mod error;

pub use asset_store::{AssetRow, AssetStore};
pub use asset_store_impl::SqliteAssetStore;
pub use error::{RepositoryError, RepositoryResult};
