//! Subscription service
//!
//! Combines a [`SubscriptionSource`] with a [`QueryCache`] and exposes the
//! result as a [`SubscriptionState`], the only shape access decisions consume.

use crate::access::{Subscription, SubscriptionState};
use crate::billing::cache::{QueryCache, QueryKey};
use crate::billing::source::SubscriptionSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct SubscriptionService {
    source: Arc<dyn SubscriptionSource>,
    cache: QueryCache<Subscription>,
}

impl SubscriptionService {
    pub fn new(source: Arc<dyn SubscriptionSource>, ttl: Duration, max_entries: u64) -> Self {
        debug!(
            source = source.source_type(),
            ttl_secs = ttl.as_secs(),
            max_entries,
            "Subscription service ready"
        );
        Self {
            source,
            cache: QueryCache::new(ttl, max_entries),
        }
    }

    /// Subscription state for an account.
    ///
    /// No account means no billing record: the free plan. Fetch failures are
    /// reported as [`SubscriptionState::Failed`] and are not cached.
    pub async fn state(&self, account_id: Option<&str>) -> SubscriptionState {
        let Some(account_id) = account_id.filter(|id| !id.is_empty()) else {
            return Subscription::free().into();
        };

        let key = QueryKey::subscription(account_id);
        let result = self
            .cache
            .get_or_fetch(key, || async {
                self.source
                    .fetch(account_id)
                    .await
                    .map(|sub| sub.unwrap_or_else(Subscription::free))
            })
            .await;

        match result {
            Ok(sub) => SubscriptionState::Loaded(*sub),
            Err(e) => {
                warn!(account_id, error = %e, "Subscription fetch failed");
                SubscriptionState::failed(e.to_string())
            }
        }
    }

    /// Force the next read for `account_id` to refetch
    pub async fn invalidate(&self, account_id: &str) -> bool {
        self.cache
            .invalidate(&QueryKey::subscription(account_id))
            .await
    }

    pub fn cache(&self) -> &QueryCache<Subscription> {
        &self.cache
    }
}
