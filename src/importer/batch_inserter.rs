// ==========================================
// Asset import - batch inserter
// ==========================================
// Role: one bulk insert per import, all or nothing
// No per-row retry, no partial success
// ==========================================

use crate::domain::{AssetCategory, CategoryInsertPayload};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{AssetRow, AssetStore};
use std::sync::Arc;
use tracing::{error, info};

pub struct ImportBatchInserter {
    store: Arc<dyn AssetStore>,
}

impl ImportBatchInserter {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// Insert every payload into the category's table
    ///
    /// # Returns
    /// - Ok(n): n == payloads.len(), all committed
    /// - Err(PersistenceError): nothing committed, cause reported verbatim
    pub async fn insert(
        &self,
        category: AssetCategory,
        payloads: Vec<CategoryInsertPayload>,
    ) -> ImportResult<usize> {
        let table = category.table_name();
        if payloads.is_empty() {
            return Ok(0);
        }

        let mut rows: Vec<AssetRow> = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            if payload.category() != category {
                return Err(ImportError::InternalError(format!(
                    "payload de {} enviado a {}",
                    payload.category(),
                    table
                )));
            }
            let row = payload.to_row().map_err(|e| ImportError::PersistenceError {
                table: table.to_string(),
                cause: e.to_string(),
            })?;
            rows.push(row);
        }

        let expected = rows.len();
        let inserted = self.store.insert_many(table, rows).await.map_err(|e| {
            error!(table = table, error = %e, "fallo la inserción masiva");
            ImportError::PersistenceError {
                table: table.to_string(),
                cause: e.to_string(),
            }
        })?;

        if inserted != expected {
            return Err(ImportError::PersistenceError {
                table: table.to_string(),
                cause: format!("se esperaban {} filas, el almacén informó {}", expected, inserted),
            });
        }

        info!(table = table, inserted = inserted, "inserción masiva completa");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FurniturePayload, FURNITURE_TYPE_TAG};
    use crate::repository::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        fail: bool,
        insert_calls: AtomicUsize,
    }

    #[async_trait]
    impl AssetStore for CountingStore {
        async fn select_max_internal_id(&self, _: &str, _: &str) -> RepositoryResult<Option<String>> {
            Ok(None)
        }

        async fn reserve_sequence(&self, _: &str, _: &str, _: u64, _: i64) -> RepositoryResult<i64> {
            Ok(0)
        }

        async fn find_existing_ids(&self, _: &str, _: &[String]) -> RepositoryResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn insert_many(&self, _: &str, rows: Vec<AssetRow>) -> RepositoryResult<usize> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RepositoryError::UniqueConstraintViolation(
                    "UNIQUE constraint failed: mobiliario.internal_id".to_string(),
                ));
            }
            Ok(rows.len())
        }
    }

    fn store(fail: bool) -> Arc<CountingStore> {
        Arc::new(CountingStore {
            fail,
            insert_calls: AtomicUsize::new(0),
        })
    }

    fn chair(id: &str) -> CategoryInsertPayload {
        CategoryInsertPayload::Furniture(FurniturePayload {
            internal_id: id.to_string(),
            barcode_id: None,
            name: "Silla".to_string(),
            description: None,
            serial_number: None,
            status: "Operativo".to_string(),
            location: "Pañol Central".to_string(),
            ownership: "Propio".to_string(),
            responsible: "Sin Asignar".to_string(),
            assigned_to: None,
            value: None,
            asset_type: FURNITURE_TYPE_TAG.to_string(),
            image_url: None,
        })
    }

    #[tokio::test]
    async fn test_insert_returns_input_length() {
        let s = store(false);
        let inserter = ImportBatchInserter::new(s.clone());

        let n = inserter
            .insert(AssetCategory::Furniture, vec![chair("MOB-001"), chair("MOB-002")])
            .await
            .unwrap();

        assert_eq!(n, 2);
        assert_eq!(s.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_store() {
        let s = store(false);
        let inserter = ImportBatchInserter::new(s.clone());

        let n = inserter.insert(AssetCategory::Furniture, Vec::new()).await.unwrap();

        assert_eq!(n, 0);
        assert_eq!(s.insert_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let inserter = ImportBatchInserter::new(store(true));

        let err = inserter
            .insert(AssetCategory::Furniture, vec![chair("MOB-001")])
            .await
            .unwrap_err();

        match err {
            ImportError::PersistenceError { table, cause } => {
                assert_eq!(table, "mobiliario");
                assert!(cause.contains("UNIQUE constraint failed"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_category_mismatch_rejected() {
        let inserter = ImportBatchInserter::new(store(false));
        let result = inserter
            .insert(AssetCategory::Machinery, vec![chair("MOB-001")])
            .await;
        assert!(matches!(result, Err(ImportError::InternalError(_))));
    }
}
