//! Subscription evaluation
//!
//! Turns already-fetched subscription state into plan-access predicates.
//! Every predicate fails closed: a state that is still loading or that failed
//! to load behaves like the free plan.

use crate::access::types::{PlanType, SubscriptionState, SubscriptionStatus};

/// Read-only view over a [`SubscriptionState`]
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionEvaluator<'a> {
    state: &'a SubscriptionState,
}

impl<'a> SubscriptionEvaluator<'a> {
    pub fn new(state: &'a SubscriptionState) -> Self {
        Self { state }
    }

    /// True while no response has arrived; callers must render a neutral
    /// loading state instead of consulting [`Self::has_access`].
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SubscriptionState::Unloaded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, SubscriptionState::Failed { .. })
    }

    /// Plan currently held, `Free` unless a subscription is loaded
    pub fn current_plan(&self) -> PlanType {
        self.state
            .subscription()
            .map(|s| s.current_plan_type)
            .unwrap_or_default()
    }

    /// Billing status, if a subscription is loaded
    pub fn status(&self) -> Option<SubscriptionStatus> {
        self.state.subscription().map(|s| s.subscription_status)
    }

    /// Rank of the current plan is at least the rank of `required`
    pub fn has_plan_access(&self, required: PlanType) -> bool {
        self.current_plan().satisfies(required)
    }

    /// Billing standing is active; the free plan always is
    pub fn has_active_subscription(&self) -> bool {
        match self.state.subscription() {
            Some(sub) => {
                sub.current_plan_type == PlanType::Free || sub.subscription_status.is_active()
            }
            None => false,
        }
    }

    /// Combined rule: plan rank suffices and, for paid plans, standing is active
    pub fn has_access(&self, required: PlanType) -> bool {
        self.has_plan_access(required)
            && (required == PlanType::Free || self.has_active_subscription())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::types::Subscription;

    fn loaded(plan: PlanType, status: SubscriptionStatus) -> SubscriptionState {
        Subscription::new(plan, status).into()
    }

    #[test]
    fn test_free_access_for_every_plan() {
        for plan in PlanType::all() {
            let state = loaded(*plan, SubscriptionStatus::Canceled);
            let eval = SubscriptionEvaluator::new(&state);
            assert!(eval.has_plan_access(PlanType::Free));
            assert!(eval.has_access(PlanType::Free));
        }
    }

    #[test]
    fn test_bundle_requires_bundle() {
        for plan in PlanType::all() {
            let state = loaded(*plan, SubscriptionStatus::Active);
            let eval = SubscriptionEvaluator::new(&state);
            assert_eq!(
                eval.has_plan_access(PlanType::BuildProBundle),
                *plan == PlanType::BuildProBundle
            );
        }
    }

    #[test]
    fn test_past_due_denies_paid_plans() {
        let state = loaded(PlanType::BuildProBundle, SubscriptionStatus::PastDue);
        let eval = SubscriptionEvaluator::new(&state);
        assert!(eval.has_plan_access(PlanType::CrmBasic));
        assert!(!eval.has_active_subscription());
        for required in [PlanType::CrmBasic, PlanType::CrmPro, PlanType::BuildProBundle] {
            assert!(!eval.has_access(required));
        }
    }

    #[test]
    fn test_free_plan_is_always_active() {
        let state = loaded(PlanType::Free, SubscriptionStatus::Canceled);
        let eval = SubscriptionEvaluator::new(&state);
        assert!(eval.has_active_subscription());
        assert!(!eval.has_access(PlanType::CrmBasic));
    }

    #[test]
    fn test_pro_grants_basic() {
        let state = loaded(PlanType::CrmPro, SubscriptionStatus::Active);
        let eval = SubscriptionEvaluator::new(&state);
        assert!(eval.has_access(PlanType::CrmBasic));
        assert!(eval.has_access(PlanType::CrmPro));
        assert!(!eval.has_access(PlanType::BuildProBundle));
    }

    #[test]
    fn test_unloaded_and_failed_fail_closed() {
        for state in [SubscriptionState::Unloaded, SubscriptionState::failed("timeout")] {
            let eval = SubscriptionEvaluator::new(&state);
            assert_eq!(eval.current_plan(), PlanType::Free);
            assert!(!eval.has_active_subscription());
            assert!(!eval.has_access(PlanType::CrmBasic));
            assert_eq!(eval.status(), None);
        }
        assert!(SubscriptionEvaluator::new(&SubscriptionState::Unloaded).is_loading());
        assert!(SubscriptionEvaluator::new(&SubscriptionState::failed("x")).is_failed());
    }
}
