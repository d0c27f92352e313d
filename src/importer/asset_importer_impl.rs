// ==========================================
// Asset import - importer pipeline
// ==========================================
// Flow: parse → allocate → normalize → project → validate → insert
// Rules:
// - rows are processed in file order, auto-assigned ids strictly increase
// - any blocking violation rejects the whole batch
// - cancellation is honored up to the moment the insert is issued
// ==========================================

use crate::config::{CategoryProfile, ImportConfigReader, ImportPolicy};
use crate::domain::{
    AssetCategory, CanonicalAssetRecord, CategoryInsertPayload, ImportOutcome, ImportWarning,
    RawRow,
};
use crate::importer::asset_importer_trait::{
    AssetImporter, ConflictHandler, DqValidator, FieldNormalizer, FileParser, SchemaMapper,
};
use crate::importer::batch_inserter::ImportBatchInserter;
use crate::importer::conflict_handler::ConflictHandler as ConflictHandlerImpl;
use crate::importer::dq_validator::DqValidator as DqValidatorImpl;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::SpreadsheetParser;
use crate::importer::identity_allocator::{
    max_explicit_sequence, IdentityAllocator, SequenceCounter, StartSequence,
};
use crate::importer::schema_mapper::CategorySchemaMapper;
use crate::repository::AssetStore;
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// CancelHandle
// ==========================================
/// Shared cancellation flag; clones observe the same flag
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ==========================================
// AssetImporterImpl
// ==========================================
pub struct AssetImporterImpl<C>
where
    C: ImportConfigReader,
{
    // data access
    store: Arc<dyn AssetStore>,

    // config reader
    config: C,

    // pipeline components
    file_parser: Box<dyn FileParser>,
    field_normalizer: Box<dyn FieldNormalizer>,
    schema_mapper: Box<dyn SchemaMapper>,
    dq_validator: Box<dyn DqValidator>,
    conflict_handler: Box<dyn ConflictHandler>,

    allocator: IdentityAllocator,
    inserter: ImportBatchInserter,
    cancel: CancelHandle,
}

impl<C> AssetImporterImpl<C>
where
    C: ImportConfigReader,
{
    /// Build an importer from explicit components
    pub fn new(
        store: Arc<dyn AssetStore>,
        config: C,
        file_parser: Box<dyn FileParser>,
        field_normalizer: Box<dyn FieldNormalizer>,
        schema_mapper: Box<dyn SchemaMapper>,
        dq_validator: Box<dyn DqValidator>,
        conflict_handler: Box<dyn ConflictHandler>,
    ) -> Self {
        Self {
            allocator: IdentityAllocator::new(store.clone()),
            inserter: ImportBatchInserter::new(store.clone()),
            store,
            config,
            file_parser,
            field_normalizer,
            schema_mapper,
            dq_validator,
            conflict_handler,
            cancel: CancelHandle::new(),
        }
    }

    /// Standard components
    pub fn with_defaults(store: Arc<dyn AssetStore>, config: C) -> Self {
        Self::new(
            store,
            config,
            Box::new(SpreadsheetParser),
            Box::new(FieldMapper::new()),
            Box::new(CategorySchemaMapper),
            Box::new(DqValidatorImpl::new()),
            Box::new(ConflictHandlerImpl),
        )
    }

    /// Use a caller-owned cancellation flag
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that cancels this importer's runs
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Step 3: start sequence, or degrade per policy
    async fn allocate(
        &self,
        category: AssetCategory,
        profile: &CategoryProfile,
        policy: &ImportPolicy,
        missing_ids: usize,
        min_start: u64,
        warnings: &mut Vec<ImportWarning>,
    ) -> ImportResult<StartSequence> {
        match self
            .allocator
            .allocate(profile, policy.allocation_strategy, missing_ids as u64, min_start)
            .await
        {
            Ok(start) => Ok(start),
            Err(w) => {
                if policy.abort_on_allocation_failure {
                    error!(category = %category, cause = %w.cause, "asignación de IDs fallida, importación abortada");
                    return Err(ImportError::AllocationFailed {
                        category,
                        cause: w.cause,
                    });
                }
                warn!(
                    category = %category,
                    cause = %w.cause,
                    "asignación de IDs degradada, la numeración empieza en 1"
                );
                warnings.push(w.into());
                Ok(StartSequence::default())
            }
        }
    }

    /// Steps 2-9 on already parsed rows
    async fn import_rows(
        &self,
        category: AssetCategory,
        raw_rows: Vec<RawRow>,
        run_id: String,
        started: Instant,
    ) -> ImportResult<ImportOutcome> {
        let table = category.table_name();
        let total_rows = raw_rows.len();
        if total_rows == 0 {
            warn!(run_id = %run_id, "planilla sin filas de datos");
            return Err(ImportError::EmptySheet);
        }
        info!(total_rows = total_rows, "planilla leída");

        // === Step 2: category profile ===
        debug!("Step 2: category profile");
        let profile = self.config.get_category_profile(category).await?;
        let policy = self.config.get_import_policy().await?;

        // === Step 3: identifier allocation ===
        debug!("Step 3: identifier allocation");
        let explicit_ids: Vec<String> = raw_rows
            .iter()
            .filter_map(|row| self.field_normalizer.explicit_internal_id(row))
            .collect();
        let missing_ids = total_rows - explicit_ids.len();
        // generated ids start after the greatest explicit one of this batch
        let min_start =
            max_explicit_sequence(explicit_ids.iter().map(String::as_str), &profile.id_prefix)
                .unwrap_or(u64::MAX);
        let mut warnings = Vec::new();
        let start = self
            .allocate(category, &profile, &policy, missing_ids, min_start, &mut warnings)
            .await?;
        info!(
            missing_ids = missing_ids,
            min_start = min_start,
            start = start.value(),
            strategy = ?policy.allocation_strategy,
            "secuencia de IDs asignada"
        );

        // === Step 4: normalize ===
        debug!("Step 4: normalize");
        let mut counter = SequenceCounter::new(start, &profile);
        let records: Vec<CanonicalAssetRecord> = raw_rows
            .iter()
            .map(|row| self.field_normalizer.normalize(row, &profile, &mut counter))
            .collect();

        // === Step 5: project ===
        debug!("Step 5: project onto {}", table);
        let payloads: Vec<CategoryInsertPayload> = records
            .iter()
            .map(|record| self.schema_mapper.project(record, category))
            .collect();

        // === Step 6: validate + conflicts ===
        debug!("Step 6: validate");
        let mut violations = self.dq_validator.validate_batch(&records);

        let ids: Vec<String> = records
            .iter()
            .map(|r| r.internal_id.clone())
            .filter(|id| !id.trim().is_empty())
            .collect();
        let existing_ids = self
            .store
            .find_existing_ids(table, &ids)
            .await
            .map_err(|e| ImportError::DatabaseQueryError(e.to_string()))?;
        violations.extend(self.conflict_handler.conflict_violations(&records, &existing_ids));

        let blocking = violations.iter().filter(|v| v.level.is_blocking()).count();
        if blocking > 0 {
            error!(
                blocking = blocking,
                total = violations.len(),
                "la planilla tiene observaciones bloqueantes, no se inserta nada"
            );
            return Err(ImportError::ValidationError { violations });
        }
        info!(violations = violations.len(), "validación completa");

        // === Step 7: cancellation ===
        if self.cancel.is_cancelled() {
            warn!(run_id = %run_id, "importación cancelada antes de insertar");
            return Err(ImportError::Cancelled);
        }

        // === Step 8: insert ===
        debug!("Step 8: insert");
        let inserted = self.inserter.insert(category, payloads).await?;

        // === Step 9: outcome ===
        let elapsed_time = started.elapsed();
        info!(
            run_id = %run_id,
            table = table,
            inserted = inserted,
            elapsed_ms = elapsed_time.as_millis() as u64,
            "importación completa"
        );

        Ok(ImportOutcome {
            run_id,
            category,
            table: table.to_string(),
            total_rows,
            inserted,
            first_assigned_id: counter.first_issued().map(str::to_string),
            last_assigned_id: counter.last_issued().map(str::to_string),
            warnings,
            violations,
            elapsed_time,
            completed_at: Utc::now(),
        })
    }
}

#[async_trait]
impl<C> AssetImporter for AssetImporterImpl<C>
where
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, bytes), fields(run_id))]
    async fn import_bytes(
        &self,
        category: AssetCategory,
        bytes: &[u8],
    ) -> ImportResult<ImportOutcome> {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        info!(category = %category, size = bytes.len(), "inicio de importación");

        // === Step 1: parse ===
        let raw_rows = self.file_parser.parse_bytes(bytes).map_err(|e| {
            error!(error = %e, "no se pudo leer la planilla");
            e
        })?;

        self.import_rows(category, raw_rows, run_id, started).await
    }

    #[instrument(skip(self), fields(run_id))]
    async fn import_file(
        &self,
        category: AssetCategory,
        file_path: &Path,
    ) -> ImportResult<ImportOutcome> {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        info!(category = %category, file_path = %file_path.display(), "inicio de importación");

        // === Step 1: parse ===
        let raw_rows = self.file_parser.parse_file(file_path).map_err(|e| {
            error!(error = %e, "no se pudo leer la planilla");
            e
        })?;

        self.import_rows(category, raw_rows, run_id, started).await
    }
}
