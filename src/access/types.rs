//! Access control types
//!
//! Core types used by the access control system: roles, plans, subscription
//! records and the loading state wrapped around them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized user role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Visitor,
    Member,
    EnterpriseOwner,
    Admin,
}

impl Role {
    /// Get the role name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Visitor => "visitor",
            Role::Member => "member",
            Role::EnterpriseOwner => "enterprise_owner",
            Role::Admin => "admin",
        }
    }

    /// Try to parse a role from a string
    ///
    /// Case-insensitive; `-` and spaces are accepted in place of `_`.
    pub fn try_parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "visitor" => Some(Role::Visitor),
            "member" => Some(Role::Member),
            "enterprise_owner" => Some(Role::EnterpriseOwner),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Get all roles
    pub fn all() -> &'static [Role] {
        &[
            Role::Visitor,
            Role::Member,
            Role::EnterpriseOwner,
            Role::Admin,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription plan
///
/// Plans are totally ordered by [`PlanType::rank`]. Deserializing an unknown
/// plan string or `null` yields [`PlanType::Free`], the bottom of the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum PlanType {
    #[default]
    Free,
    CrmBasic,
    CrmPro,
    BuildProBundle,
}

impl PlanType {
    /// Position in the plan order
    pub const fn rank(&self) -> u8 {
        match self {
            PlanType::Free => 0,
            PlanType::CrmBasic => 1,
            PlanType::CrmPro => 2,
            PlanType::BuildProBundle => 3,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PlanType::Free => "free",
            PlanType::CrmBasic => "crm_basic",
            PlanType::CrmPro => "crm_pro",
            PlanType::BuildProBundle => "build_pro_bundle",
        }
    }

    /// Parse a plan identifier. Total: anything unrecognized is `Free`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "crm_basic" => PlanType::CrmBasic,
            "crm_pro" => PlanType::CrmPro,
            "build_pro_bundle" => PlanType::BuildProBundle,
            _ => PlanType::Free,
        }
    }

    /// Whether this plan sits at or above `required` in the plan order
    pub const fn satisfies(&self, required: PlanType) -> bool {
        self.rank() >= required.rank()
    }

    /// Upper-case label used in upgrade copy, e.g. `FREE`
    pub fn label(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }

    pub fn all() -> &'static [PlanType] {
        &[
            PlanType::Free,
            PlanType::CrmBasic,
            PlanType::CrmPro,
            PlanType::BuildProBundle,
        ]
    }
}

impl From<String> for PlanType {
    fn from(s: String) -> Self {
        PlanType::parse(&s)
    }
}

impl From<Option<String>> for PlanType {
    fn from(s: Option<String>) -> Self {
        s.map(PlanType::from).unwrap_or_default()
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing standing of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Trialing,
    Canceled,
    PastDue,
    Incomplete,
    Unpaid,
    /// Any status string this service does not recognize
    Unknown,
}

impl SubscriptionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => SubscriptionStatus::Active,
            "trialing" => SubscriptionStatus::Trialing,
            // billing providers disagree on the spelling
            "canceled" | "cancelled" => SubscriptionStatus::Canceled,
            "past_due" => SubscriptionStatus::PastDue,
            "incomplete" => SubscriptionStatus::Incomplete,
            "unpaid" => SubscriptionStatus::Unpaid,
            _ => SubscriptionStatus::Unknown,
        }
    }

    pub const fn is_active(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }
}

impl From<String> for SubscriptionStatus {
    fn from(s: String) -> Self {
        SubscriptionStatus::parse(&s)
    }
}

/// `null` means the billing record carries no status: the default, not `Unknown`
impl From<Option<String>> for SubscriptionStatus {
    fn from(s: Option<String>) -> Self {
        s.map(SubscriptionStatus::from).unwrap_or_default()
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw user record as supplied by the auth collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub membership_status: Option<String>,
}

impl User {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..Default::default()
        }
    }
}

/// Subscription record for one account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub current_plan_type: PlanType,
    #[serde(default)]
    pub subscription_status: SubscriptionStatus,
}

impl Subscription {
    pub const fn new(plan: PlanType, status: SubscriptionStatus) -> Self {
        Self {
            current_plan_type: plan,
            subscription_status: status,
        }
    }

    /// The implicit subscription of an account with no billing record
    pub const fn free() -> Self {
        Self::new(PlanType::Free, SubscriptionStatus::Active)
    }
}

/// Subscription data as seen by a consumer of the fetch layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubscriptionState {
    /// No response has arrived yet
    #[default]
    Unloaded,
    Loaded(Subscription),
    Failed { reason: String },
}

impl SubscriptionState {
    pub fn failed(reason: impl Into<String>) -> Self {
        SubscriptionState::Failed {
            reason: reason.into(),
        }
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        match self {
            SubscriptionState::Loaded(sub) => Some(sub),
            _ => None,
        }
    }
}

impl From<Subscription> for SubscriptionState {
    fn from(sub: Subscription) -> Self {
        SubscriptionState::Loaded(sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in Role::all() {
            assert_eq!(Role::try_parse(role.as_str()), Some(*role));
        }
    }

    #[test]
    fn test_role_parse_normalizes() {
        assert_eq!(Role::try_parse("Enterprise-Owner"), Some(Role::EnterpriseOwner));
        assert_eq!(Role::try_parse(" ADMIN "), Some(Role::Admin));
        assert_eq!(Role::try_parse("superuser"), None);
    }

    #[test]
    fn test_plan_ranks_are_ordered() {
        let ranks: Vec<u8> = PlanType::all().iter().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unknown_plan_is_free() {
        assert_eq!(PlanType::parse("enterprise_gold"), PlanType::Free);
        assert_eq!(PlanType::parse(""), PlanType::Free);

        let plan: PlanType = serde_json::from_str(r#""platinum""#).unwrap();
        assert_eq!(plan, PlanType::Free);
        let plan: PlanType = serde_json::from_str(r#""crm_pro""#).unwrap();
        assert_eq!(plan, PlanType::CrmPro);
    }

    #[test]
    fn test_plan_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PlanType::BuildProBundle).unwrap(),
            r#""build_pro_bundle""#
        );
        assert_eq!(PlanType::Free.label(), "FREE");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(SubscriptionStatus::parse("past_due"), SubscriptionStatus::PastDue);
        assert_eq!(SubscriptionStatus::parse("cancelled"), SubscriptionStatus::Canceled);
        assert_eq!(SubscriptionStatus::parse("paused"), SubscriptionStatus::Unknown);
        assert!(SubscriptionStatus::Active.is_active());
        assert!(!SubscriptionStatus::Trialing.is_active());
    }

    #[test]
    fn test_subscription_deserialize_camel_case() {
        let json = r#"{"currentPlanType":"crm_basic","subscriptionStatus":"past_due"}"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.current_plan_type, PlanType::CrmBasic);
        assert_eq!(sub.subscription_status, SubscriptionStatus::PastDue);
    }

    #[test]
    fn test_subscription_defaults_to_free() {
        let sub: Subscription = serde_json::from_str("{}").unwrap();
        assert_eq!(sub, Subscription::free());
    }

    #[test]
    fn test_subscription_null_fields_default() {
        let json = r#"{"currentPlanType":null,"subscriptionStatus":null}"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub, Subscription::free());

        let json = r#"{"currentPlanType":"crm_pro","subscriptionStatus":null}"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.current_plan_type, PlanType::CrmPro);
        assert_eq!(sub.subscription_status, SubscriptionStatus::Active);
    }

    #[test]
    fn test_user_deserialize() {
        let json = r#"{"id":"u1","role":"member","membershipStatus":"active"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role.as_deref(), Some("member"));
        assert_eq!(user.membership_status.as_deref(), Some("active"));
    }
}
