// ==========================================
// Asset import - asset domain model
// ==========================================
// Role: raw rows, canonical asset record, DQ violations, import outcome
// Lifecycle: everything here lives inside a single import run
// ==========================================

use crate::domain::category::AssetCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// CellValue - loosely typed spreadsheet cell
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Build a text cell; blank text becomes `Empty`
    pub fn text(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Text rendering; integral numbers drop the trailing `.0`
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => {
                if !n.is_finite() {
                    None
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{:.0}", n))
                } else {
                    Some(n.to_string())
                }
            }
        }
    }
}

// ==========================================
// RawRow - one spreadsheet row keyed by header
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRow {
    pub row_number: usize, // source row (header is row 1)
    pub cells: HashMap<String, CellValue>,
    /// Headers in column order
    #[serde(default)]
    pub columns: Vec<String>,
}

impl RawRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: HashMap::new(),
            columns: Vec::new(),
        }
    }

    /// Insert a cell unless the header was already seen (first column wins)
    pub fn insert(&mut self, header: impl Into<String>, value: CellValue) {
        let header = header.into();
        if self.cells.contains_key(&header) {
            return;
        }
        self.columns.push(header.clone());
        self.cells.insert(header, value);
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.get(header)
    }

    /// Cells in column order
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns
            .iter()
            .filter_map(|h| self.cells.get(h).map(|v| (h.as_str(), v)))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_empty)
    }
}

// ==========================================
// CanonicalAssetRecord - normalized, category-agnostic asset
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalAssetRecord {
    // ===== identity =====
    pub internal_id: String,
    pub barcode_id: Option<String>,
    pub name: String,

    // ===== description =====
    pub description: Option<String>,
    pub functional_description: Option<String>,
    pub complementary_description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,

    // ===== custody =====
    pub status: String,
    pub location: String,
    pub ownership: String,
    pub responsible: String,
    pub assigned_to: Option<String>,

    // ===== accounting / usage =====
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

    // ===== vehicles =====
    pub domain_number: Option<String>,
    pub engine_number: Option<String>,
    pub chassis_number: Option<String>,

    // ===== IT equipment =====
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,

    pub image_url: Option<String>,

    // ===== import metadata (never persisted) =====
    pub row_number: usize,
    pub auto_assigned_id: bool,
}

// ==========================================
// DqLevel / DqViolation
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Error,    // blocks the batch
    Warning,  // reported, imported
    Info,     // reported only
    Conflict, // duplicate identifier, blocks the batch
}

impl DqLevel {
    pub fn is_blocking(&self) -> bool {
        matches!(self, DqLevel::Error | DqLevel::Conflict)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,
    pub internal_id: Option<String>,
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

// ==========================================
// ImportWarning - non-fatal pipeline degradation
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportWarning {
    /// Identifier lookup failed; numbering restarted at 1
    AllocationDegraded {
        category: AssetCategory,
        cause: String,
    },
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportWarning::AllocationDegraded { category, cause } => write!(
                f,
                "no se pudo consultar el último ID de {} ({}); la numeración reinició en {}-001 y puede duplicar IDs existentes",
                category.label(),
                cause,
                category.id_prefix()
            ),
        }
    }
}

// ==========================================
// ImportOutcome - result of one import run
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub run_id: String,
    pub category: AssetCategory,
    pub table: String,
    pub total_rows: usize,
    pub inserted: usize,
    pub first_assigned_id: Option<String>,
    pub last_assigned_id: Option<String>,
    pub warnings: Vec<ImportWarning>,
    pub violations: Vec<DqViolation>, // non-blocking only
    pub elapsed_time: std::time::Duration,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_blank_is_empty() {
        assert_eq!(CellValue::text("   "), CellValue::Empty);
        assert_eq!(CellValue::text(" CAT "), CellValue::Text("CAT".to_string()));
    }

    #[test]
    fn test_cell_number_as_text() {
        assert_eq!(CellValue::Number(12345.0).as_text(), Some("12345".to_string()));
        assert_eq!(CellValue::Number(2.5).as_text(), Some("2.5".to_string()));
        assert_eq!(CellValue::Number(f64::NAN).as_text(), None);
    }

    #[test]
    fn test_raw_row_first_header_wins() {
        let mut row = RawRow::new(2);
        row.insert("Marca", CellValue::text("CAT"));
        row.insert("Marca", CellValue::text("Komatsu"));
        assert_eq!(row.get("Marca"), Some(&CellValue::Text("CAT".to_string())));
    }

    #[test]
    fn test_raw_row_keeps_column_order() {
        let mut row = RawRow::new(2);
        row.insert("Nombre", CellValue::text("Grúa"));
        row.insert("Marca", CellValue::text("CAT"));
        row.insert("Nombre", CellValue::text("Otra"));

        let headers: Vec<&str> = row.iter_columns().map(|(h, _)| h).collect();
        assert_eq!(headers, vec!["Nombre", "Marca"]);
    }

    #[test]
    fn test_raw_row_blank() {
        let mut row = RawRow::new(3);
        row.insert("Marca", CellValue::Empty);
        row.insert("Modelo", CellValue::Text("  ".to_string()));
        assert!(row.is_blank());
    }
}
