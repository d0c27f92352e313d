// ==========================================
// Asset import - AssetStore trait
// ==========================================
// Role: persistence boundary of the importer, addressed by table name
// Rule: no business rules here, data access only
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One row to insert: column → value
pub type AssetRow = Map<String, Value>;

// ==========================================
// AssetStore Trait
// ==========================================
// Implementor: SqliteAssetStore (rusqlite)
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Greatest `internal_id` of the form `{prefix}-N`, by numeric suffix
    /// (ids whose suffix is not all digits are ignored)
    ///
    /// # Returns
    /// - Ok(None): no matching identifier
    async fn select_max_internal_id(
        &self,
        table: &str,
        prefix: &str,
    ) -> RepositoryResult<Option<String>>;

    /// Atomically reserve `count` sequence values for `table`
    ///
    /// # Parameters
    /// - min_start: lower bound for the value preceding the block
    ///   (greatest explicit id of the batch being imported)
    ///
    /// # Returns
    /// - the value preceding the block; the block is `start+1 ..= start+count`
    ///
    /// # Notes
    /// - the block starts after max(last reserved value, greatest existing suffix, min_start)
    /// - only ids whose whole suffix is digits count as existing
    /// - two concurrent callers never receive overlapping blocks
    /// - Err(FieldValueError) when the block would pass i64::MAX
    async fn reserve_sequence(
        &self,
        table: &str,
        prefix: &str,
        count: u64,
        min_start: i64,
    ) -> RepositoryResult<i64>;

    /// Which of `ids` already exist in `table`
    async fn find_existing_ids(&self, table: &str, ids: &[String]) -> RepositoryResult<Vec<String>>;

    /// Insert every row in one transaction
    ///
    /// # Returns
    /// - Ok(n): all `n` rows committed
    /// - Err: nothing committed (the whole transaction rolls back)
    async fn insert_many(&self, table: &str, rows: Vec<AssetRow>) -> RepositoryResult<usize>;
}
