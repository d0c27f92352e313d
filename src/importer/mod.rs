// ==========================================
// Asset import - importer layer
// ==========================================
// Role: spreadsheet → category table, with identifier assignment
// Formats: xlsx/xlsm/xls/xlsb/ods, CSV
// ==========================================

pub mod asset_importer_impl;
pub mod asset_importer_trait;
pub mod batch_inserter;
pub mod conflict_handler;
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod identity_allocator;
pub mod schema_mapper;
pub mod template_generator;

// core types
pub use asset_importer_impl::{AssetImporterImpl, CancelHandle};
pub use batch_inserter::ImportBatchInserter;
pub use conflict_handler::ConflictHandler as ConflictHandlerImpl;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, SpreadsheetParser};
pub use identity_allocator::{
    parse_sequence_suffix, AllocationWarning, IdentityAllocator, SequenceCounter, StartSequence,
};
pub use schema_mapper::{schema_fields, CategorySchemaMapper};
pub use template_generator::TemplateGenerator;

// traits
pub use asset_importer_trait::{
    AssetImporter, ConflictHandler, DataCleaner, DqValidator, FieldNormalizer, FileParser,
    SchemaMapper,
};
