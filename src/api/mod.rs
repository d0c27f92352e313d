// ==========================================
// Asset import - API layer
// ==========================================
// Role: entry points for the CLI; input checks and error mapping
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse, TemplateApiResponse};
