// ==========================================
// Asset import - API error types
// ==========================================
// Role: map repository/importer errors onto caller-facing errors;
//       every message carries its explicit cause
// ==========================================

use crate::domain::DqViolation;
use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== input =====
    #[error("entrada inválida: {0}")]
    InvalidInput(String),

    #[error("recurso no encontrado: {0}")]
    NotFound(String),

    // ===== data access =====
    #[error("error de base de datos: {0}")]
    DatabaseError(String),

    #[error("fallo de conexión a la base de datos: {0}")]
    DatabaseConnectionError(String),

    #[error("fallo de transacción: {0}")]
    DatabaseTransactionError(String),

    #[error("restricción violada: {0}")]
    ConstraintViolation(String),

    // ===== import =====
    #[error("falló la importación: {0}")]
    ImportError(String),

    #[error("validación fallida: {message}")]
    ValidationError {
        message: String,
        violations: Vec<DqViolation>,
    },

    #[error("importación cancelada")]
    Cancelled,

    #[error("error generando plantilla: {0}")]
    TemplateError(String),

    // ===== generic =====
    #[error("error interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// From RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UnknownTable(t) => ApiError::InvalidInput(format!("tabla {}", t)),
            RepositoryError::InvalidColumn(c) => ApiError::InvalidInput(format!("columna {}", c)),
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("lock: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::ConstraintViolation(format!("única: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ConstraintViolation(format!("clave foránea: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("campo {}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// From ImportError
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(path),
            ImportError::UnsupportedFormat(_) => ApiError::InvalidInput(err.to_string()),
            ImportError::ValidationError { violations } => ApiError::ValidationError {
                message: ImportError::ValidationError {
                    violations: violations.clone(),
                }
                .to_string(),
                violations,
            },
            ImportError::Cancelled => ApiError::Cancelled,
            ImportError::TemplateError(msg) => ApiError::TemplateError(msg),
            ImportError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            ImportError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;
