// ==========================================
// Asset import - conflict handler
// ==========================================
// Role: duplicate internal_id inside the batch and against the target table
// ==========================================

use crate::domain::CanonicalAssetRecord;
use crate::importer::asset_importer_trait::ConflictHandler as ConflictHandlerTrait;
use std::collections::HashSet;

pub struct ConflictHandler;

impl ConflictHandlerTrait for ConflictHandler {
    fn detect_duplicates(&self, records: &[CanonicalAssetRecord]) -> Vec<(usize, String)> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut duplicates = Vec::new();

        for record in records {
            let id = record.internal_id.as_str();
            if id.trim().is_empty() {
                continue;
            }
            if !seen.insert(id) {
                duplicates.push((record.row_number, id.to_string()));
            }
        }

        duplicates
    }

    fn detect_cross_batch_duplicates(
        &self,
        records: &[CanonicalAssetRecord],
        existing_ids: &[String],
    ) -> Vec<(usize, String)> {
        let existing_set: HashSet<&str> = existing_ids.iter().map(String::as_str).collect();

        records
            .iter()
            .filter(|r| existing_set.contains(r.internal_id.as_str()))
            .map(|r| (r.row_number, r.internal_id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DqLevel;

    fn create_test_record(internal_id: &str, row_number: usize) -> CanonicalAssetRecord {
        CanonicalAssetRecord {
            internal_id: internal_id.to_string(),
            name: "Activo".to_string(),
            row_number,
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_duplicates_skips_first_occurrence() {
        let records = vec![
            create_test_record("MAQ-001", 2),
            create_test_record("MAQ-002", 3),
            create_test_record("MAQ-001", 4),
            create_test_record("MAQ-001", 5),
        ];

        let duplicates = ConflictHandler.detect_duplicates(&records);

        assert_eq!(
            duplicates,
            vec![(4, "MAQ-001".to_string()), (5, "MAQ-001".to_string())]
        );
    }

    #[test]
    fn test_detect_duplicates_ignores_blank_ids() {
        let records = vec![
            create_test_record("", 2),
            create_test_record("", 3),
            create_test_record("MAQ-003", 4),
        ];

        assert!(ConflictHandler.detect_duplicates(&records).is_empty());
    }

    #[test]
    fn test_detect_cross_batch_duplicates() {
        let records = vec![
            create_test_record("ROD-007", 2),
            create_test_record("ROD-008", 3),
        ];
        let existing = vec!["ROD-007".to_string()];

        let duplicates = ConflictHandler.detect_cross_batch_duplicates(&records, &existing);

        assert_eq!(duplicates, vec![(2, "ROD-007".to_string())]);
    }

    #[test]
    fn test_conflict_violations_are_blocking() {
        let records = vec![create_test_record("MOB-001", 2), create_test_record("MOB-001", 3)];

        let violations = ConflictHandler.conflict_violations(&records, &["MOB-001".to_string()]);

        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|v| v.level == DqLevel::Conflict));
        assert_eq!(violations[2].message, "ID interno ya registrado: MOB-001");
    }
}
