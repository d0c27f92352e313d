// ==========================================
// Asset import - identity allocator
// ==========================================
// Role: first free sequence number per category
// Strategies:
// - Reserved: atomic block through the store's sequence table
// - ReadMax: read the greatest existing id once
// Degradation: a failed lookup is reported as AllocationWarning; the caller
//              decides whether to continue from 0 or abort
// ==========================================

use crate::config::{AllocationStrategy, CategoryProfile};
use crate::domain::{AssetCategory, ImportWarning};
use crate::repository::AssetStore;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

// ==========================================
// StartSequence
// ==========================================
/// Last sequence value in use; the first generated id is `start + 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartSequence(pub u64);

impl StartSequence {
    pub fn value(&self) -> u64 {
        self.0
    }
}

// ==========================================
// AllocationWarning
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationWarning {
    pub category: AssetCategory,
    pub cause: String,
}

impl fmt::Display for AllocationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category.table_name(), self.cause)
    }
}

impl From<AllocationWarning> for ImportWarning {
    fn from(w: AllocationWarning) -> Self {
        ImportWarning::AllocationDegraded {
            category: w.category,
            cause: w.cause,
        }
    }
}

// ==========================================
// SequenceCounter - per-run mutable counter
// ==========================================
#[derive(Debug, Clone)]
pub struct SequenceCounter {
    profile: CategoryProfile,
    current: u64,
    first_issued: Option<String>,
    last_issued: Option<String>,
}

impl SequenceCounter {
    pub fn new(start: StartSequence, profile: &CategoryProfile) -> Self {
        Self {
            profile: profile.clone(),
            current: start.value(),
            first_issued: None,
            last_issued: None,
        }
    }

    /// Pre-increment, then format `{PREFIX}-{n:0padding}`
    pub fn next_id(&mut self) -> String {
        self.current = self.current.saturating_add(1);
        let id = self.profile.format_id(self.current);
        if self.first_issued.is_none() {
            self.first_issued = Some(id.clone());
        }
        self.last_issued = Some(id.clone());
        id
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn first_issued(&self) -> Option<&str> {
        self.first_issued.as_deref()
    }

    pub fn last_issued(&self) -> Option<&str> {
        self.last_issued.as_deref()
    }
}

/// Greatest sequence value the store can hold (INTEGER column)
pub const MAX_SEQUENCE: u64 = i64::MAX as u64;

/// All-digit suffix of `{prefix}-N`
fn digit_suffix<'a>(internal_id: &'a str, prefix: &str) -> Option<&'a str> {
    let suffix = internal_id.trim().strip_prefix(prefix)?.strip_prefix('-')?;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(suffix)
}

/// Numeric suffix of `{prefix}-N`
///
/// # Returns
/// - None when the prefix differs, the suffix is not all digits,
///   or the value is above MAX_SEQUENCE
pub fn parse_sequence_suffix(internal_id: &str, prefix: &str) -> Option<u64> {
    digit_suffix(internal_id, prefix)?
        .parse::<u64>()
        .ok()
        .filter(|n| *n <= MAX_SEQUENCE)
}

/// Greatest explicit sequence among `ids` carrying `prefix` (0 when none)
///
/// # Returns
/// - None when some id has an all-digit suffix beyond MAX_SEQUENCE
pub fn max_explicit_sequence<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    prefix: &str,
) -> Option<u64> {
    let mut max = 0;
    for id in ids {
        if digit_suffix(id, prefix).is_some() {
            max = max.max(parse_sequence_suffix(id, prefix)?);
        }
    }
    Some(max)
}

// ==========================================
// IdentityAllocator
// ==========================================
pub struct IdentityAllocator {
    store: Arc<dyn AssetStore>,
}

impl IdentityAllocator {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    fn exhausted(profile: &CategoryProfile, detail: impl fmt::Display) -> AllocationWarning {
        AllocationWarning {
            category: profile.category,
            cause: format!("secuencia agotada para {}: {}", profile.id_prefix, detail),
        }
    }

    /// Greatest existing suffix, 0 when there is none or it cannot be parsed
    ///
    /// A digit suffix past MAX_SEQUENCE is reported as exhausted instead
    pub async fn next_sequence_start(
        &self,
        profile: &CategoryProfile,
    ) -> Result<StartSequence, AllocationWarning> {
        let table = profile.category.table_name();

        let max_id = self
            .store
            .select_max_internal_id(table, &profile.id_prefix)
            .await
            .map_err(|e| AllocationWarning {
                category: profile.category,
                cause: e.to_string(),
            })?;

        let start = match max_id {
            None => 0,
            Some(id) => match parse_sequence_suffix(&id, &profile.id_prefix) {
                Some(n) => n,
                None if digit_suffix(&id, &profile.id_prefix).is_some() => {
                    return Err(Self::exhausted(profile, id));
                }
                None => {
                    warn!(
                        table = table,
                        internal_id = %id,
                        "sufijo no numérico en el último ID, la numeración empieza en 0"
                    );
                    0
                }
            },
        };

        debug!(table = table, start = start, "secuencia leída");
        Ok(StartSequence(start))
    }

    /// Reserve `count` ids atomically, after `min_start`
    pub async fn reserve_block(
        &self,
        profile: &CategoryProfile,
        count: u64,
        min_start: u64,
    ) -> Result<StartSequence, AllocationWarning> {
        let table = profile.category.table_name();
        let min_start = i64::try_from(min_start).map_err(|_| Self::exhausted(profile, min_start))?;

        let start = self
            .store
            .reserve_sequence(table, &profile.id_prefix, count, min_start)
            .await
            .map_err(|e| AllocationWarning {
                category: profile.category,
                cause: e.to_string(),
            })?;

        debug!(table = table, start = start, count = count, "bloque reservado");
        Ok(StartSequence(u64::try_from(start).unwrap_or(0)))
    }

    /// Dispatch on the configured strategy; nothing is queried for count 0
    ///
    /// # Parameters
    /// - min_start: greatest explicit sequence in the batch; generated ids
    ///   start after it
    pub async fn allocate(
        &self,
        profile: &CategoryProfile,
        strategy: AllocationStrategy,
        count: u64,
        min_start: u64,
    ) -> Result<StartSequence, AllocationWarning> {
        if count == 0 {
            return Ok(StartSequence::default());
        }
        let start = match strategy {
            AllocationStrategy::Reserved => self.reserve_block(profile, count, min_start).await?,
            AllocationStrategy::ReadMax => {
                let read = self.next_sequence_start(profile).await?;
                StartSequence(read.value().max(min_start))
            }
        };

        match start.value().checked_add(count) {
            Some(end) if end <= MAX_SEQUENCE => Ok(start),
            _ => Err(Self::exhausted(profile, start.value())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{AssetRow, RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedStore {
        max_id: Option<String>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FixedStore {
        fn new(max_id: Option<&str>, fail: bool) -> Self {
            Self {
                max_id: max_id.map(str::to_string),
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AssetStore for FixedStore {
        async fn select_max_internal_id(
            &self,
            _table: &str,
            _prefix: &str,
        ) -> RepositoryResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RepositoryError::DatabaseQueryError("sin conexión".to_string()));
            }
            Ok(self.max_id.clone())
        }

        async fn reserve_sequence(
            &self,
            _table: &str,
            _prefix: &str,
            _count: u64,
            min_start: i64,
        ) -> RepositoryResult<i64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RepositoryError::DatabaseQueryError("sin conexión".to_string()));
            }
            Ok(min_start.max(41))
        }

        async fn find_existing_ids(&self, _table: &str, _ids: &[String]) -> RepositoryResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn insert_many(&self, _table: &str, rows: Vec<AssetRow>) -> RepositoryResult<usize> {
            Ok(rows.len())
        }
    }

    fn vehicles() -> CategoryProfile {
        CategoryProfile::builtin(AssetCategory::Vehicles)
    }

    #[test]
    fn test_parse_sequence_suffix() {
        assert_eq!(parse_sequence_suffix("ROD-007", "ROD"), Some(7));
        assert_eq!(parse_sequence_suffix("ROD-1000", "ROD"), Some(1000));
        assert_eq!(parse_sequence_suffix("ROD-7a", "ROD"), None);
        assert_eq!(parse_sequence_suffix("MAQ-007", "ROD"), None);
        assert_eq!(parse_sequence_suffix("ROD-", "ROD"), None);
        assert_eq!(parse_sequence_suffix("ROD-99999999999999999999", "ROD"), None);
    }

    #[test]
    fn test_counter_strictly_increasing() {
        let mut counter = SequenceCounter::new(StartSequence(7), &vehicles());
        assert_eq!(counter.next_id(), "ROD-008");
        assert_eq!(counter.next_id(), "ROD-009");
        assert_eq!(counter.next_id(), "ROD-010");
        assert_eq!(counter.first_issued(), Some("ROD-008"));
        assert_eq!(counter.last_issued(), Some("ROD-010"));
    }

    #[test]
    fn test_counter_does_not_truncate() {
        let mut counter = SequenceCounter::new(StartSequence(999), &vehicles());
        assert_eq!(counter.next_id(), "ROD-1000");
    }

    #[tokio::test]
    async fn test_next_sequence_start_reads_suffix() {
        let allocator = IdentityAllocator::new(Arc::new(FixedStore::new(Some("ROD-007"), false)));
        let start = allocator.next_sequence_start(&vehicles()).await.unwrap();
        assert_eq!(start, StartSequence(7));
    }

    #[tokio::test]
    async fn test_next_sequence_start_empty_table() {
        let allocator = IdentityAllocator::new(Arc::new(FixedStore::new(None, false)));
        let start = allocator.next_sequence_start(&vehicles()).await.unwrap();
        assert_eq!(start, StartSequence(0));
    }

    #[tokio::test]
    async fn test_next_sequence_start_unparseable_suffix() {
        let allocator = IdentityAllocator::new(Arc::new(FixedStore::new(Some("ROD-X1"), false)));
        let start = allocator.next_sequence_start(&vehicles()).await.unwrap();
        assert_eq!(start, StartSequence(0));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_warning() {
        let allocator = IdentityAllocator::new(Arc::new(FixedStore::new(None, true)));
        let warning = allocator.next_sequence_start(&vehicles()).await.unwrap_err();
        assert_eq!(warning.category, AssetCategory::Vehicles);
        assert!(warning.cause.contains("sin conexión"));
    }

    #[tokio::test]
    async fn test_allocate_zero_skips_store() {
        let store = Arc::new(FixedStore::new(Some("ROD-007"), false));
        let allocator = IdentityAllocator::new(store.clone());

        let start = allocator
            .allocate(&vehicles(), AllocationStrategy::Reserved, 0, 0)
            .await
            .unwrap();

        assert_eq!(start, StartSequence(0));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_allocate_reserved() {
        let allocator = IdentityAllocator::new(Arc::new(FixedStore::new(None, false)));
        let start = allocator
            .allocate(&vehicles(), AllocationStrategy::Reserved, 3, 0)
            .await
            .unwrap();
        assert_eq!(start, StartSequence(41));
    }

    #[tokio::test]
    async fn test_allocate_read_max_respects_min_start() {
        let allocator = IdentityAllocator::new(Arc::new(FixedStore::new(Some("ROD-007"), false)));
        let start = allocator
            .allocate(&vehicles(), AllocationStrategy::ReadMax, 2, 20)
            .await
            .unwrap();
        assert_eq!(start, StartSequence(20));
    }

    #[tokio::test]
    async fn test_read_max_near_limit_is_warning() {
        let max_id = format!("ROD-{}", MAX_SEQUENCE - 1);
        let allocator = IdentityAllocator::new(Arc::new(FixedStore::new(Some(&max_id), false)));

        let warning = allocator
            .allocate(&vehicles(), AllocationStrategy::ReadMax, 3, 0)
            .await
            .unwrap_err();

        assert!(warning.cause.contains("secuencia agotada"));
    }

    #[tokio::test]
    async fn test_read_max_oversized_suffix_is_warning() {
        let allocator = IdentityAllocator::new(Arc::new(FixedStore::new(
            Some("ROD-99999999999999999999"),
            false,
        )));

        let warning = allocator.next_sequence_start(&vehicles()).await.unwrap_err();

        assert_eq!(warning.category, AssetCategory::Vehicles);
        assert!(warning.cause.contains("secuencia agotada"));
    }

    #[tokio::test]
    async fn test_reserved_min_start_beyond_limit_is_warning() {
        let store = Arc::new(FixedStore::new(None, false));
        let allocator = IdentityAllocator::new(store.clone());

        let result = allocator
            .allocate(&vehicles(), AllocationStrategy::Reserved, 1, u64::MAX)
            .await;

        assert!(result.is_err());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_max_explicit_sequence() {
        let ids = ["MAQ-004", "MAQ-9B", "ROD-050", "MAQ-012"];
        assert_eq!(max_explicit_sequence(ids.iter().copied(), "MAQ"), Some(12));
        assert_eq!(max_explicit_sequence(std::iter::empty(), "MAQ"), Some(0));
        assert_eq!(
            max_explicit_sequence(["MAQ-99999999999999999999"].iter().copied(), "MAQ"),
            None
        );
    }

    #[test]
    fn test_counter_saturates_instead_of_overflowing() {
        let mut counter = SequenceCounter::new(StartSequence(u64::MAX), &vehicles());
        assert_eq!(counter.current(), u64::MAX);
        counter.next_id();
        assert_eq!(counter.current(), u64::MAX);
    }
}
