//! Subscription source trait
//!
//! Abstracts where subscription records come from so the cache and the HTTP
//! service can be exercised without a live billing service.

use crate::access::Subscription;
use crate::error::BillingResult;
// async_trait required for dyn-compatibility with Arc<dyn SubscriptionSource>
use async_trait::async_trait;
use std::collections::HashMap;

/// Provider of subscription records
#[async_trait]
pub trait SubscriptionSource: Send + Sync {
    /// Fetch the subscription of an account
    ///
    /// `Ok(None)` means the account has no billing record and is on the free plan.
    async fn fetch(&self, account_id: &str) -> BillingResult<Option<Subscription>>;

    /// Short description of the source (for logging)
    fn source_type(&self) -> &'static str;
}

/// Fixed in-memory source, for tests and local development
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    subscriptions: HashMap<String, Subscription>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, account_id: impl Into<String>, subscription: Subscription) -> Self {
        self.subscriptions.insert(account_id.into(), subscription);
        self
    }
}

#[async_trait]
impl SubscriptionSource for StaticSource {
    async fn fetch(&self, account_id: &str) -> BillingResult<Option<Subscription>> {
        Ok(self.subscriptions.get(account_id).copied())
    }

    fn source_type(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{PlanType, SubscriptionStatus};

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new().with(
            "acct-1",
            Subscription::new(PlanType::CrmPro, SubscriptionStatus::Active),
        );

        let sub = source.fetch("acct-1").await.unwrap().unwrap();
        assert_eq!(sub.current_plan_type, PlanType::CrmPro);
        assert!(source.fetch("acct-2").await.unwrap().is_none());
        assert_eq!(source.source_type(), "static");
    }
}
