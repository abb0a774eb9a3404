//! Single-record lookup.

use super::SqliteStore;
use agriwaste_core::{
    error::AgriError,
    record::{Localized, RecommendationRecord},
    traits::{RecordFilter, RecordStore},
};
use async_trait::async_trait;
use serde_json::from_str;

/// Raw row: key columns, `is_active`, then the four JSON-encoded maps.
type RecordRow = (String, String, String, bool, String, String, String, String);

fn decode_row(row: RecordRow) -> Result<RecommendationRecord, AgriError> {
    let (product_id, moisture, intended_use, is_active, process, final_output, benefits, notes) =
        row;
    Ok(RecommendationRecord {
        product_id,
        moisture,
        intended_use,
        is_active,
        process: from_str::<Localized<Vec<String>>>(&process)?,
        final_output: from_str(&final_output)?,
        benefits: from_str(&benefits)?,
        notes: from_str(&notes)?,
    })
}

impl SqliteStore {
    /// Number of active records. Read-only, used for status reporting.
    pub async fn count_active(&self) -> Result<i64, AgriError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM recommendations WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AgriError::StoreUnavailable(format!("count failed: {e}")))?;
        Ok(count)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn find_one(
        &self,
        filter: &RecordFilter,
    ) -> Result<Option<RecommendationRecord>, AgriError> {
        let row: Option<RecordRow> = sqlx::query_as(
            "SELECT product_id, moisture, intended_use, is_active, \
                    process, final_output, benefits, notes \
             FROM recommendations \
             WHERE product_id = ? AND moisture = ? AND intended_use = ? AND is_active = ? \
             LIMIT 1",
        )
        .bind(&filter.key.product_id)
        .bind(&filter.key.moisture)
        .bind(&filter.key.intended_use)
        .bind(filter.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AgriError::StoreUnavailable(format!("find_one failed: {e}")))?;

        row.map(decode_row).transpose()
    }

    async fn ping(&self) -> Result<(), AgriError> {
        self.ping_pool().await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
