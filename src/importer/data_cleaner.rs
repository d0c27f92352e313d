// ==========================================
// Asset import - data cleaner
// ==========================================
// Role: trim / null sentinels / status folding / numeric coercion
// Rule: never fails on a malformed cell, the value becomes None
// ==========================================

use crate::config::DEFAULT_STATUS;
use crate::domain::CellValue;
use crate::importer::asset_importer_trait::DataCleaner as DataCleanerTrait;

/// Barcode placeholders meaning "no barcode"
const BARCODE_SENTINELS: [&str; 3] = ["-", "n/a", "."];

/// Status spellings folded onto "Operativo"
const OPERATIONAL_SYNONYMS: [&str; 3] = ["activo", "en uso", "vigente"];

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &CellValue) -> Option<String> {
        value.as_text()
    }

    fn clean_barcode(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            let lowered = trimmed.to_lowercase();
            if trimmed.is_empty() || BARCODE_SENTINELS.contains(&lowered.as_str()) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn normalize_status(&self, value: Option<String>, default_status: &str) -> String {
        match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            None => default_status.to_string(),
            Some(v) => {
                let lowered = v.to_lowercase();
                if OPERATIONAL_SYNONYMS.contains(&lowered.as_str()) {
                    DEFAULT_STATUS.to_string()
                } else {
                    v
                }
            }
        }
    }

    fn coerce_number(&self, value: &CellValue) -> Option<f64> {
        match value {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            CellValue::Text(s) => parse_localized_number(s),
        }
    }

    fn coerce_year(&self, value: &CellValue) -> Option<i32> {
        self.coerce_number(value)
            .filter(|n| n.fract() == 0.0)
            .filter(|n| *n >= i32::MIN as f64 && *n <= i32::MAX as f64)
            .map(|n| n as i32)
    }
}

/// Parse a number written with Spanish or English separators
///
/// - `$` and spaces are dropped
/// - both `.` and `,` present: the last one is the decimal separator
/// - a single kind repeated (`1.234.567`): thousands separators
/// - a single `,`: decimal separator
fn parse_localized_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');

    let normalized = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            if comma > dot {
                cleaned.replace('.', "").replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (None, Some(_)) => {
            if cleaned.matches(',').count() > 1 {
                cleaned.replace(',', "")
            } else {
                cleaned.replace(',', ".")
            }
        }
        (Some(_), None) => {
            if cleaned.matches('.').count() > 1 {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    // "inf" / "NaN" parse successfully as f64
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_barcode_sentinels_collapse() {
        let cleaner = DataCleaner;
        for sentinel in ["-", "N/A", "n/a", ".", "", "   "] {
            assert_eq!(cleaner.clean_barcode(Some(sentinel.to_string())), None);
        }
        assert_eq!(cleaner.clean_barcode(None), None);
    }

    #[test]
    fn test_barcode_kept() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.clean_barcode(Some(" 779123 ".to_string())),
            Some("779123".to_string())
        );
        assert_eq!(
            cleaner.clean_barcode(Some("N/A-01".to_string())),
            Some("N/A-01".to_string())
        );
    }

    #[test]
    fn test_status_synonyms() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_status(Some("ACTIVO".to_string()), "Operativo"), "Operativo");
        assert_eq!(cleaner.normalize_status(Some("en uso".to_string()), "Operativo"), "Operativo");
        assert_eq!(cleaner.normalize_status(Some("Vigente".to_string()), "Operativo"), "Operativo");
        assert_eq!(
            cleaner.normalize_status(Some(" En Reparación ".to_string()), "Operativo"),
            "En Reparación"
        );
        assert_eq!(cleaner.normalize_status(None, "Operativo"), "Operativo");
        assert_eq!(cleaner.normalize_status(Some("  ".to_string()), "Baja"), "Baja");
    }

    #[test]
    fn test_coerce_number_spanish_format() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.coerce_number(&text("1.234,56")), Some(1234.56));
        assert_eq!(cleaner.coerce_number(&text("1234,56")), Some(1234.56));
        assert_eq!(cleaner.coerce_number(&text("1,234.56")), Some(1234.56));
        assert_eq!(cleaner.coerce_number(&text("$ 1.500.000")), Some(1_500_000.0));
        assert_eq!(cleaner.coerce_number(&text("42")), Some(42.0));
        assert_eq!(cleaner.coerce_number(&CellValue::Number(7.5)), Some(7.5));
    }

    #[test]
    fn test_coerce_number_garbage_is_none() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.coerce_number(&text("n/d")), None);
        assert_eq!(cleaner.coerce_number(&text("NaN")), None);
        assert_eq!(cleaner.coerce_number(&text("inf")), None);
        assert_eq!(cleaner.coerce_number(&CellValue::Number(f64::NAN)), None);
        assert_eq!(cleaner.coerce_number(&CellValue::Empty), None);
    }

    #[test]
    fn test_coerce_year() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.coerce_year(&CellValue::Number(2019.0)), Some(2019));
        assert_eq!(cleaner.coerce_year(&text("2020")), Some(2020));
        assert_eq!(cleaner.coerce_year(&CellValue::Number(2019.5)), None);
        assert_eq!(cleaner.coerce_year(&text("dos mil")), None);
    }
}
