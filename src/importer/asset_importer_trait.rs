// ==========================================
// Asset import - importer traits
// ==========================================
// Role: interfaces of every pipeline stage (no implementations here)
// ==========================================

use crate::config::CategoryProfile;
use crate::domain::{
    AssetCategory, CanonicalAssetRecord, CategoryInsertPayload, CellValue, DqLevel, DqViolation,
    ImportOutcome, RawRow,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::identity_allocator::SequenceCounter;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// AssetImporter Trait
// ==========================================
// Main entry point
// Implementor: AssetImporterImpl
#[async_trait]
pub trait AssetImporter: Send + Sync {
    /// Import an uploaded workbook into the category's table
    ///
    /// # Pipeline
    /// 1. parse
    /// 2. load category profile
    /// 3. allocate identifiers for rows lacking one
    /// 4. normalize (file order)
    /// 5. project onto the category schema
    /// 6. validate + detect conflicts
    /// 7. check cancellation
    /// 8. bulk insert (all or nothing)
    /// 9. build the outcome
    async fn import_bytes(
        &self,
        category: AssetCategory,
        bytes: &[u8],
    ) -> ImportResult<ImportOutcome>;

    /// Import a file from disk (.csv or a workbook format)
    async fn import_file(
        &self,
        category: AssetCategory,
        file_path: &Path,
    ) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// Stage 0
// Implementors: ExcelParser, CsvParser, SpreadsheetParser
pub trait FileParser: Send + Sync {
    /// Decode bytes into rows keyed by the header row
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>>;

    /// Read a file and decode it
    fn parse_file(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(
                file_path.to_string_lossy().to_string(),
            ));
        }
        let bytes = std::fs::read(file_path)?;
        self.parse_bytes(&bytes)
    }
}

// ==========================================
// DataCleaner Trait
// ==========================================
// Cell-level cleanup primitives
// Implementor: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// Trim; blank → None
    fn clean_text(&self, value: &CellValue) -> Option<String>;

    /// Trim; sentinels (`-`, `n/a`, `.`, blank) → None
    fn clean_barcode(&self, value: Option<String>) -> Option<String>;

    /// Fold status synonyms onto the canonical label
    ///
    /// # Returns
    /// - `default_status` when the value is missing
    /// - "Operativo" for activo / en uso / vigente (any case)
    /// - the trimmed input otherwise
    fn normalize_status(&self, value: Option<String>, default_status: &str) -> String;

    /// Numeric coercion; never fails, unparseable → None
    fn coerce_number(&self, value: &CellValue) -> Option<f64>;

    /// Numeric coercion kept only when integral
    fn coerce_year(&self, value: &CellValue) -> Option<i32>;
}

// ==========================================
// FieldNormalizer Trait
// ==========================================
// Stage 1: raw row → canonical record
// Implementor: FieldMapper
pub trait FieldNormalizer: Send + Sync {
    /// Extract canonical fields through the alias table
    ///
    /// # Parameters
    /// - row: source row
    /// - profile: category defaults
    /// - counter: per-run sequence; advanced only when the row has no id
    fn normalize(
        &self,
        row: &RawRow,
        profile: &CategoryProfile,
        counter: &mut SequenceCounter,
    ) -> CanonicalAssetRecord;

    /// Internal id the row carries, if any
    fn explicit_internal_id(&self, row: &RawRow) -> Option<String>;
}

// ==========================================
// SchemaMapper Trait
// ==========================================
// Stage 2: canonical record → category payload
// Implementor: CategorySchemaMapper
pub trait SchemaMapper: Send + Sync {
    fn project(
        &self,
        record: &CanonicalAssetRecord,
        category: AssetCategory,
    ) -> CategoryInsertPayload;
}

// ==========================================
// DqValidator Trait
// ==========================================
// Stage 3: batch validation
// Implementor: DqValidator
pub trait DqValidator: Send + Sync {
    /// Required fields (internal_id, name, barcode)
    fn validate_required_fields(&self, record: &CanonicalAssetRecord) -> Vec<DqViolation>;

    /// Negative amounts, implausible years
    fn validate_ranges(&self, record: &CanonicalAssetRecord) -> Vec<DqViolation>;

    /// Status outside the catalogue
    fn validate_status(&self, record: &CanonicalAssetRecord) -> Vec<DqViolation>;

    /// Run every rule over the batch
    fn validate_batch(&self, records: &[CanonicalAssetRecord]) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        for record in records {
            violations.extend(self.validate_required_fields(record));
            violations.extend(self.validate_ranges(record));
            violations.extend(self.validate_status(record));
        }
        violations
    }
}

// ==========================================
// ConflictHandler Trait
// ==========================================
// Duplicate internal ids
// Implementor: ConflictHandler
pub trait ConflictHandler: Send + Sync {
    /// Duplicates inside the batch
    ///
    /// # Returns
    /// - Vec<(row number, internal_id)>, first occurrence excluded
    fn detect_duplicates(&self, records: &[CanonicalAssetRecord]) -> Vec<(usize, String)>;

    /// Ids already present in the target table
    ///
    /// # Parameters
    /// - existing_ids: ids returned by the store for this batch
    fn detect_cross_batch_duplicates(
        &self,
        records: &[CanonicalAssetRecord],
        existing_ids: &[String],
    ) -> Vec<(usize, String)>;

    /// Both checks as Conflict violations
    fn conflict_violations(
        &self,
        records: &[CanonicalAssetRecord],
        existing_ids: &[String],
    ) -> Vec<DqViolation> {
        let in_batch = self
            .detect_duplicates(records)
            .into_iter()
            .map(|(row_number, id)| DqViolation {
                row_number,
                message: format!("ID interno repetido en la planilla: {}", id),
                internal_id: Some(id),
                level: DqLevel::Conflict,
                field: "internal_id".to_string(),
            });

        let cross_batch = self
            .detect_cross_batch_duplicates(records, existing_ids)
            .into_iter()
            .map(|(row_number, id)| DqViolation {
                row_number,
                message: format!("ID interno ya registrado: {}", id),
                internal_id: Some(id),
                level: DqLevel::Conflict,
                field: "internal_id".to_string(),
            });

        in_batch.chain(cross_batch).collect()
    }
}
