//! Configuration types for earthcare-access
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access::PlanType;
use crate::navigation::Section;
use crate::util::SecretString;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Billing service connection settings
    pub billing: BillingConfig,

    /// Subscription cache settings
    pub cache: CacheConfig,

    /// Navigation visibility policy
    pub navigation: NavigationPolicy,

    /// Route guard rules
    pub routes: RoutesConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Service name reported by `/health`
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: crate::server::DEFAULT_PORT,
            name: "earthcare-access".to_string(),
        }
    }
}

/// Billing service connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Base URL of the billing/data service (e.g., `https://api.earthcare.network`)
    pub url: String,

    /// Service token (prefer env var BILLING_API_TOKEN)
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries for failed requests
    pub max_retries: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            token: None,
            timeout_secs: 10,
            max_retries: 2,
        }
    }
}

impl BillingConfig {
    /// URL of the current-subscription endpoint
    pub fn subscription_url(&self) -> String {
        format!(
            "{}/api/subscriptions/current",
            self.url.trim_end_matches('/')
        )
    }
}

/// Subscription cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Freshness window in seconds
    pub ttl_secs: u64,

    /// Upper bound on cached subscriptions
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_entries: crate::billing::cache::DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Who may see a navigation section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceRule {
    /// Only the roles listed for the section
    #[default]
    RoleGated,
    /// Any signed-in role; `visitor` does not count as signed in
    Authenticated,
}

/// Navigation visibility policy
///
/// The member menu and the CRM link each have a role-gated and an
/// authenticated-only variant; the admin menu is always admin-only.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NavigationPolicy {
    /// Role-gated: member, enterprise_owner, admin
    pub member_menu: AudienceRule,

    /// Role-gated: enterprise_owner, admin
    pub crm_link: AudienceRule,

    /// Optional TOML file replacing the built-in navigation table
    #[serde(default)]
    pub table_path: Option<String>,
}

/// Route guard configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Ordered rules; first match wins
    pub rules: Vec<RouteRuleConfig>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            rules: default_route_rules(),
        }
    }
}

/// A single route rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteRuleConfig {
    /// Regex matched against the request path
    pub pattern: String,

    /// Navigation section whose audience may enter the route
    pub section: Section,

    /// Plan required on top of the section audience
    #[serde(default)]
    pub required_plan: Option<PlanType>,
}

impl RouteRuleConfig {
    pub fn new(pattern: &str, section: Section) -> Self {
        Self {
            pattern: pattern.to_string(),
            section,
            required_plan: None,
        }
    }

    pub fn with_plan(mut self, plan: PlanType) -> Self {
        self.required_plan = Some(plan);
        self
    }
}

/// Route rules matching the built-in navigation table
pub fn default_route_rules() -> Vec<RouteRuleConfig> {
    vec![
        RouteRuleConfig::new("^/admin(/.*)?$", Section::Admin),
        RouteRuleConfig::new("^/crm/[^/]*/(reports|automations)(/.*)?$", Section::Crm)
            .with_plan(PlanType::CrmPro),
        RouteRuleConfig::new("^/crm(/.*)?$", Section::Crm).with_plan(PlanType::CrmBasic),
        RouteRuleConfig::new(
            "^/(dashboard|favorites|profile|billing|pledge/affirm)(/.*)?$",
            Section::Member,
        ),
        RouteRuleConfig::new(
            "^/(directory(/.*)?|pledge|pricing|about|login|signup)?$",
            Section::Public,
        ),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
