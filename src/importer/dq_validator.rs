// ==========================================
// Asset import - data quality validator
// ==========================================
// Levels:
// - Error / Conflict: block the batch
// - Warning / Info: reported in the outcome
// ==========================================

use crate::domain::{CanonicalAssetRecord, DqLevel, DqViolation};
use crate::importer::asset_importer_trait::DqValidator as DqValidatorTrait;
use chrono::{Datelike, Utc};

/// Status catalogue; anything else is reported as Info
pub const KNOWN_STATUSES: [&str; 5] = [
    "Operativo",
    "En Mantenimiento",
    "En Reparación",
    "Fuera de Servicio",
    "Baja",
];

pub const MIN_YEAR: i32 = 1900;

pub struct DqValidator {
    max_year: i32, // current year + 1
}

impl DqValidator {
    pub fn new() -> Self {
        Self {
            max_year: Utc::now().year() + 1,
        }
    }

    /// Fixed upper bound for years (tests)
    pub fn with_max_year(max_year: i32) -> Self {
        Self { max_year }
    }

    fn violation(
        record: &CanonicalAssetRecord,
        level: DqLevel,
        field: &str,
        message: String,
    ) -> DqViolation {
        DqViolation {
            row_number: record.row_number,
            internal_id: Some(record.internal_id.clone()).filter(|id| !id.trim().is_empty()),
            level,
            field: field.to_string(),
            message,
        }
    }

    fn check_non_negative(
        record: &CanonicalAssetRecord,
        field: &str,
        value: Option<f64>,
        violations: &mut Vec<DqViolation>,
    ) {
        if let Some(v) = value {
            if v < 0.0 {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    field,
                    format!("valor negativo: {}", v),
                ));
            }
        }
    }

    fn check_year(
        &self,
        record: &CanonicalAssetRecord,
        field: &str,
        value: Option<i32>,
        violations: &mut Vec<DqViolation>,
    ) {
        if let Some(year) = value {
            if year < MIN_YEAR || year > self.max_year {
                violations.push(Self::violation(
                    record,
                    DqLevel::Warning,
                    field,
                    format!(
                        "año fuera de rango: {} (esperado {}..={})",
                        year, MIN_YEAR, self.max_year
                    ),
                ));
            }
        }
    }
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DqValidatorTrait for DqValidator {
    fn validate_required_fields(&self, record: &CanonicalAssetRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        if record.internal_id.trim().is_empty() {
            violations.push(Self::violation(
                record,
                DqLevel::Error,
                "internal_id",
                "ID interno vacío".to_string(),
            ));
        }

        if record.name.trim().is_empty() {
            violations.push(Self::violation(
                record,
                DqLevel::Error,
                "name",
                "nombre vacío".to_string(),
            ));
        }

        if let Some(barcode) = &record.barcode_id {
            if barcode.trim().is_empty() {
                violations.push(Self::violation(
                    record,
                    DqLevel::Error,
                    "barcode_id",
                    "código de barra presente pero vacío".to_string(),
                ));
            }
        }

        violations
    }

    fn validate_ranges(&self, record: &CanonicalAssetRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        Self::check_non_negative(record, "value", record.value, &mut violations);
        Self::check_non_negative(record, "hours", record.hours, &mut violations);
        Self::check_non_negative(record, "daily_rate", record.daily_rate, &mut violations);
        Self::check_non_negative(
            record,
            "remaining_useful_life",
            record.remaining_useful_life,
            &mut violations,
        );

        self.check_year(record, "year", record.year, &mut violations);
        self.check_year(record, "origin_year", record.origin_year, &mut violations);

        violations
    }

    fn validate_status(&self, record: &CanonicalAssetRecord) -> Vec<DqViolation> {
        if KNOWN_STATUSES.contains(&record.status.as_str()) {
            return Vec::new();
        }
        vec![Self::violation(
            record,
            DqLevel::Info,
            "status",
            format!("estado fuera del catálogo: {}", record.status),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(internal_id: &str, name: &str) -> CanonicalAssetRecord {
        CanonicalAssetRecord {
            internal_id: internal_id.to_string(),
            name: name.to_string(),
            status: "Operativo".to_string(),
            row_number: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_record_has_no_violations() {
        let validator = DqValidator::with_max_year(2027);
        assert!(validator.validate_batch(&[record("MAQ-001", "Grúa")]).is_empty());
    }

    #[test]
    fn test_missing_required_fields_are_errors() {
        let validator = DqValidator::with_max_year(2027);
        let mut r = record("", "");
        r.barcode_id = Some("  ".to_string());

        let violations = validator.validate_required_fields(&r);

        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|v| v.level == DqLevel::Error));
        assert_eq!(violations[0].internal_id, None);
    }

    #[test]
    fn test_negative_amounts_are_warnings() {
        let validator = DqValidator::with_max_year(2027);
        let mut r = record("MAQ-001", "Grúa");
        r.value = Some(-10.0);
        r.hours = Some(-1.0);

        let violations = validator.validate_ranges(&r);

        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.level == DqLevel::Warning));
        assert!(violations.iter().all(|v| !v.level.is_blocking()));
    }

    #[test]
    fn test_year_bounds() {
        let validator = DqValidator::with_max_year(2027);
        let mut r = record("MAQ-001", "Grúa");
        r.year = Some(1899);
        r.origin_year = Some(2027);

        let violations = validator.validate_ranges(&r);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "year");
    }

    #[test]
    fn test_unknown_status_is_info() {
        let validator = DqValidator::with_max_year(2027);
        let mut r = record("MAQ-001", "Grúa");
        r.status = "Prestado".to_string();

        let violations = validator.validate_status(&r);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].level, DqLevel::Info);
    }
}
