//! Feature gating
//!
//! A [`FeatureGate`] decides whether plan-protected content renders, is
//! replaced by caller-supplied fallback content, or is replaced by an upgrade
//! prompt. On denial the fallback always wins over the generic prompt.

use crate::access::subscription::SubscriptionEvaluator;
use crate::access::types::{PlanType, SubscriptionState, SubscriptionStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_UPGRADE_MESSAGE: &str = "Upgrade your plan to unlock this feature.";

/// Gate configuration for a single protected feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGate {
    pub required_plan: PlanType,
    pub upgrade_message: Option<String>,
    pub show_upgrade: bool,
}

impl Default for FeatureGate {
    fn default() -> Self {
        Self {
            required_plan: PlanType::CrmBasic,
            upgrade_message: None,
            show_upgrade: true,
        }
    }
}

/// Result of evaluating a gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GateOutcome<T> {
    /// Subscription data has not resolved
    Loading,
    /// Render the protected content
    Granted,
    /// Render the caller's fallback content
    Fallback { content: T },
    /// Render the generic upgrade prompt
    Upgrade { prompt: UpgradePrompt },
    /// Render nothing
    Hidden,
}

impl<T> GateOutcome<T> {
    pub fn is_granted(&self) -> bool {
        matches!(self, GateOutcome::Granted)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, GateOutcome::Loading)
    }
}

/// Notice about the billing standing shown under the upgrade prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusNotice {
    Canceled,
    PastDue,
}

impl StatusNotice {
    fn from_status(status: Option<SubscriptionStatus>) -> Option<Self> {
        match status? {
            SubscriptionStatus::Canceled => Some(StatusNotice::Canceled),
            SubscriptionStatus::PastDue => Some(StatusNotice::PastDue),
            _ => None,
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            StatusNotice::Canceled => {
                "Your subscription has been canceled. Reactivate it to regain access."
            }
            StatusNotice::PastDue => {
                "Your payment is past due. Update your billing details to restore access."
            }
        }
    }
}

/// Copy for the generic "upgrade required" prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradePrompt {
    pub required_plan: PlanType,
    pub current_plan: PlanType,
    pub message: String,
    pub required_plan_label: String,
    pub current_plan_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_notice: Option<StatusNotice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl UpgradePrompt {
    fn new(
        required_plan: PlanType,
        current_plan: PlanType,
        message: Option<&str>,
        status: Option<SubscriptionStatus>,
    ) -> Self {
        let status_notice = StatusNotice::from_status(status);
        Self {
            required_plan,
            current_plan,
            message: message.unwrap_or(DEFAULT_UPGRADE_MESSAGE).to_string(),
            required_plan_label: format!("Required Plan: {}", required_plan.label()),
            current_plan_label: format!("Current Plan: {}", current_plan.label()),
            status_notice,
            status_message: status_notice.map(|n| n.message().to_string()),
        }
    }
}

impl FeatureGate {
    pub fn new(required_plan: PlanType) -> Self {
        Self {
            required_plan,
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.upgrade_message = Some(message.into());
        self
    }

    pub fn show_upgrade(mut self, show: bool) -> Self {
        self.show_upgrade = show;
        self
    }

    /// Evaluate the gate against the current subscription state
    pub fn evaluate<T>(&self, state: &SubscriptionState, fallback: Option<T>) -> GateOutcome<T> {
        let eval = SubscriptionEvaluator::new(state);

        if eval.is_loading() {
            return GateOutcome::Loading;
        }

        if eval.has_access(self.required_plan) {
            return GateOutcome::Granted;
        }

        debug!(
            required = %self.required_plan,
            current = %eval.current_plan(),
            failed = eval.is_failed(),
            "Feature gate denied"
        );

        if let Some(content) = fallback {
            return GateOutcome::Fallback { content };
        }

        if !self.show_upgrade {
            return GateOutcome::Hidden;
        }

        GateOutcome::Upgrade {
            prompt: UpgradePrompt::new(
                self.required_plan,
                eval.current_plan(),
                self.upgrade_message.as_deref(),
                eval.status(),
            ),
        }
    }
}
