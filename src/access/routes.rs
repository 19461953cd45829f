//! Route guard
//!
//! Decides whether a request path may be entered. Rules are regexes evaluated
//! in order; the first match assigns the path to a navigation section and,
//! optionally, a required plan. Paths no rule matches are denied.

use crate::access::subscription::SubscriptionEvaluator;
use crate::access::types::{PlanType, Role, SubscriptionState};
use crate::config::RouteRuleConfig;
use crate::error::{AccessDeniedError, ConfigError};
use crate::navigation::{NavigationResolver, Section};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

/// Compiled route rule
#[derive(Debug)]
struct CompiledRule {
    source: String,
    regex: Regex,
    section: Section,
    required_plan: Option<PlanType>,
}

/// Result of a route check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access is allowed
    Allowed,
    /// Access is denied with a reason
    Denied(AccessDeniedError),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Denied(_))
    }
}

/// Route check result with the section the path resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCheck {
    /// Section of the matching rule; `None` when no rule matched
    pub section: Option<Section>,
    pub decision: AccessDecision,
}

impl RouteCheck {
    pub fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }

    pub fn is_denied(&self) -> bool {
        self.decision.is_denied()
    }
}

/// Matched rule summary, for callers that want to know why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMatch {
    pub pattern: String,
    pub section: Section,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_plan: Option<PlanType>,
}

/// Ordered set of route rules
#[derive(Debug)]
pub struct RouteGuard {
    rules: Vec<CompiledRule>,
}

impl RouteGuard {
    /// Compile rules from configuration
    pub fn new(rules: &[RouteRuleConfig]) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let regex = Regex::new(&rule.pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: rule.pattern.clone(),
                reason: e.to_string(),
            })?;

            compiled.push(CompiledRule {
                source: rule.pattern.clone(),
                regex,
                section: rule.section,
                required_plan: rule.required_plan,
            });
        }

        Ok(Self { rules: compiled })
    }

    /// Create a guard with no rules (denies every path)
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    fn first_match(&self, path: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.regex.is_match(path))
    }

    /// First rule matching `path`
    pub fn find_match(&self, path: &str) -> Option<RouteMatch> {
        self.first_match(path).map(|r| RouteMatch {
            pattern: r.source.clone(),
            section: r.section,
            required_plan: r.required_plan,
        })
    }

    /// Check whether `role` may enter `path`
    ///
    /// The rules are scanned once; the result carries the matched section.
    pub fn check(
        &self,
        path: &str,
        role: Option<Role>,
        subscription: &SubscriptionState,
        navigation: &NavigationResolver,
    ) -> RouteCheck {
        debug!(path, role = ?role, "Checking route access");

        let Some(rule) = self.first_match(path) else {
            trace!(path, "No route rule matched");
            return RouteCheck {
                section: None,
                decision: AccessDecision::Denied(AccessDeniedError::no_matching_rule(path)),
            };
        };
        trace!(path, pattern = %rule.source, section = %rule.section, "Matched route rule");

        RouteCheck {
            section: Some(rule.section),
            decision: Self::decide(rule, path, role, subscription, navigation),
        }
    }

    fn decide(
        rule: &CompiledRule,
        path: &str,
        role: Option<Role>,
        subscription: &SubscriptionState,
        navigation: &NavigationResolver,
    ) -> AccessDecision {
        if !navigation.can_see(rule.section, role) {
            return AccessDecision::Denied(AccessDeniedError::role_required(
                path,
                rule.section.as_str(),
            ));
        }

        if let Some(plan) = rule.required_plan {
            let eval = SubscriptionEvaluator::new(subscription);
            if eval.is_loading() {
                return AccessDecision::Denied(AccessDeniedError::subscription_loading(path));
            }
            if !eval.has_access(plan) {
                return AccessDecision::Denied(AccessDeniedError::plan_required(
                    path,
                    plan.as_str(),
                ));
            }
        }

        AccessDecision::Allowed
    }

    /// Check a route, returning an error if denied
    pub fn require(
        &self,
        path: &str,
        role: Option<Role>,
        subscription: &SubscriptionState,
        navigation: &NavigationResolver,
    ) -> Result<(), AccessDeniedError> {
        match self.check(path, role, subscription, navigation).decision {
            AccessDecision::Allowed => Ok(()),
            AccessDecision::Denied(err) => Err(err),
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::empty()
    }
}
