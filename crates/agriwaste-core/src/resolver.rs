//! Recommendation lookup with language fallback.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    error::AgriError,
    lang,
    record::{LocalizedView, LookupKey},
    traits::{RecordFilter, RecordStore},
};

/// Resolves a lookup key and a requested language into a [`LocalizedView`].
///
/// Holds no per-call state; one instance is shared by all requests.
#[derive(Clone)]
pub struct RecommendationResolver {
    store: Arc<dyn RecordStore>,
    query_timeout: Duration,
}

impl RecommendationResolver {
    pub fn new(store: Arc<dyn RecordStore>, query_timeout: Duration) -> Self {
        Self {
            store,
            query_timeout,
        }
    }

    /// Check the store is reachable within the lookup timeout.
    pub async fn ping(&self) -> Result<(), AgriError> {
        tokio::time::timeout(self.query_timeout, self.store.ping())
            .await
            .map_err(|_| AgriError::StoreUnavailable("ping timed out".to_string()))?
    }

    /// Look up the active record for `key` and localize it.
    ///
    /// Returns `Ok(None)` when no active record matches. Store failures and
    /// timeouts are reported as [`AgriError::StoreUnavailable`].
    pub async fn resolve(
        &self,
        key: &LookupKey,
        requested_lang: Option<&str>,
    ) -> Result<Option<LocalizedView>, AgriError> {
        let requested = lang::normalize(requested_lang);
        let filter = RecordFilter::active(key.clone());

        let found = tokio::time::timeout(self.query_timeout, self.store.find_one(&filter))
            .await
            .map_err(|_| {
                warn!(
                    "lookup {key} on {} timed out after {:?}",
                    self.store.name(),
                    self.query_timeout
                );
                AgriError::StoreUnavailable(format!(
                    "lookup timed out after {}ms",
                    self.query_timeout.as_millis()
                ))
            })?
            .inspect_err(|e| warn!("lookup {key} on {} failed: {e}", self.store.name()))?;

        let Some(record) = found else {
            debug!("no active recommendation for {key}");
            return Ok(None);
        };

        debug!(
            "resolved {key} lang={} (requested {requested})",
            record.effective_language(requested)
        );
        Ok(Some(record.localize(requested)))
    }
}
