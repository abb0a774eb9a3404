use crate::{
    error::AgriError,
    record::{LookupKey, RecommendationRecord},
};
use async_trait::async_trait;

/// Equality filter for a single-record lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub key: LookupKey,
    /// Required value of `isActive`.
    pub is_active: bool,
}

impl RecordFilter {
    /// Match `key` among active records only.
    pub fn active(key: LookupKey) -> Self {
        Self {
            key,
            is_active: true,
        }
    }

    /// Whether `record` satisfies every equality in this filter.
    pub fn matches(&self, record: &RecommendationRecord) -> bool {
        record.is_active == self.is_active
            && record.product_id == self.key.product_id
            && record.moisture == self.key.moisture
            && record.intended_use == self.key.intended_use
    }
}

/// Record store trait — where recommendation documents live.
///
/// Implementations are created once at startup and shared by every request,
/// so they must be safe for concurrent use.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Return the first record matching `filter`, if any.
    ///
    /// When several records match, whichever the backend yields first wins.
    async fn find_one(
        &self,
        filter: &RecordFilter,
    ) -> Result<Option<RecommendationRecord>, AgriError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), AgriError>;

    /// Release backend resources on shutdown.
    async fn close(&self) {}
}
