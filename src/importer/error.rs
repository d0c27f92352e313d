// ==========================================
// Asset import - importer error types
// ==========================================
// Tooling: thiserror
// ==========================================

use crate::domain::{AssetCategory, DqViolation};
use thiserror::Error;

/// Importer error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== file =====
    #[error("archivo no encontrado: {0}")]
    FileNotFound(String),

    #[error("formato no soportado: {0} (solo .xlsx/.xlsm/.xls/.xlsb/.ods/.csv)")]
    UnsupportedFormat(String),

    #[error("error de lectura de archivo: {0}")]
    FileReadError(String),

    #[error("no se pudo decodificar la planilla: {0}")]
    DecodeError(String),

    #[error("la planilla no contiene filas de datos")]
    EmptySheet,

    // ===== validation =====
    #[error("la importación tiene {} observaciones bloqueantes", blocking_count(.violations))]
    ValidationError { violations: Vec<DqViolation> },

    // ===== identity allocation =====
    #[error("no se pudo asignar IDs internos para {category}: {cause}")]
    AllocationFailed {
        category: AssetCategory,
        cause: String,
    },

    // ===== persistence =====
    #[error("error al insertar en {table}: {cause}")]
    PersistenceError { table: String, cause: String },

    #[error("error de conexión a la base de datos: {0}")]
    DatabaseConnectionError(String),

    #[error("error de consulta: {0}")]
    DatabaseQueryError(String),

    // ===== config =====
    #[error("error leyendo configuración (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== template =====
    #[error("error generando plantilla: {0}")]
    TemplateError(String),

    // ===== control =====
    #[error("importación cancelada")]
    Cancelled,

    #[error("error interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn blocking_count(violations: &[DqViolation]) -> usize {
    violations.iter().filter(|v| v.level.is_blocking()).count()
}

impl ImportError {
    /// Blocking violations carried by a ValidationError
    pub fn blocking_violations(&self) -> Vec<&DqViolation> {
        match self {
            ImportError::ValidationError { violations } => {
                violations.iter().filter(|v| v.level.is_blocking()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::DatabaseQueryError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::DecodeError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::DecodeError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ImportError::TemplateError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
