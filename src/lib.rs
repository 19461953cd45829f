//! Earth Care Network access resolution
//!
//! Decides what a user of the Earth Care Network may see and use, based on
//! their role and their subscription.
//!
//! ## Features
//!
//! - **Role classification** of raw user records into `visitor`, `member`,
//!   `enterprise_owner` and `admin`
//! - **Plan gating** over the ranked plans `free < crm_basic < crm_pro < build_pro_bundle`,
//!   where paid access also requires an `active` subscription
//! - **Navigation resolution** into public, member, CRM and admin sections, with
//!   workspace-scoped links
//! - **Route guarding** with ordered regex rules
//! - **HTTP decision service** with a cached view of the billing service
//!
//! ## Example Configuration
//!
//! ```toml
//! [billing]
//! url = "https://api.earthcare.network"
//! # token from BILLING_API_TOKEN env var
//!
//! [cache]
//! ttl_secs = 300
//!
//! [navigation]
//! member_menu = "role_gated"      # or "authenticated"
//! crm_link = "role_gated"         # or "authenticated"
//!
//! [[routes.rules]]
//! pattern = "^/crm(/.*)?$"
//! section = "crm"
//! required_plan = "crm_basic"
//! ```

pub mod access;
pub mod billing;
pub mod config;
pub mod error;
pub mod navigation;
pub mod server;
pub mod util;

// Re-export main types
pub use access::{FeatureGate, GateOutcome, PlanType, Role, SubscriptionState};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use navigation::{NavigationBundle, NavigationResolver};
