//! Access control module
//!
//! Turns a user's role and subscription state into access decisions.
//!
//! ## Decision model
//!
//! - **Role**: raw user records are classified into `visitor`, `member`,
//!   `enterprise_owner` or `admin`; no user at all classifies as `None`.
//! - **Plan**: plans are ranked `free < crm_basic < crm_pro < build_pro_bundle`.
//!   A feature requiring plan X is available when the current plan ranks at
//!   least X and, for any paid X, the subscription is `active`.
//! - **Gate**: a plan-protected feature renders, falls back to caller content,
//!   shows an upgrade prompt, or renders nothing.
//! - **Route**: request paths map to navigation sections through ordered regex
//!   rules; unmatched paths are denied.
//!
//! Every decision fails closed. Subscription data that has not loaded yields a
//! neutral loading outcome, never a grant.

pub mod gate;
pub mod role;
pub mod routes;
pub mod subscription;
pub mod types;

pub use gate::{FeatureGate, GateOutcome, StatusNotice, UpgradePrompt};
pub use role::{classify, classify_or_visitor};
pub use routes::{AccessDecision, RouteCheck, RouteGuard, RouteMatch};
pub use subscription::SubscriptionEvaluator;
pub use types::{PlanType, Role, Subscription, SubscriptionState, SubscriptionStatus, User};
