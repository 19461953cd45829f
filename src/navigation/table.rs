//! Navigation configuration table
//!
//! The table is immutable data: the resolver only ever reads it. A built-in
//! table mirrors the Earth Care Network site map, and deployments may replace
//! it with a TOML file of the same shape.

use crate::error::ConfigError;
use crate::navigation::items::{Icon, NavItem};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Role-independent list of navigation items, grouped by section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTable {
    pub public: Vec<NavItem>,
    pub member: Vec<NavItem>,
    /// Top-level entry into the CRM workspace
    pub crm_link: NavItem,
    /// Sidebar shown inside a CRM workspace
    #[serde(default)]
    pub crm_workspace: Vec<NavItem>,
    pub admin: Vec<NavItem>,
}

impl Default for NavigationTable {
    fn default() -> Self {
        Self {
            public: vec![
                NavItem::new("/", "Home", Icon::Home, "nav-home"),
                NavItem::new("/directory", "Directory", Icon::Directory, "nav-directory"),
                NavItem::new("/pledge", "Earth Care Pledge", Icon::Pledge, "nav-pledge"),
                NavItem::new("/pricing", "Pricing", Icon::Pricing, "nav-pricing"),
                NavItem::new("/about", "About", Icon::Info, "nav-about"),
            ],
            member: vec![
                NavItem::new("/dashboard", "Dashboard", Icon::Dashboard, "nav-dashboard"),
                NavItem::new("/favorites", "Favorites", Icon::Heart, "nav-favorites"),
                NavItem::new("/pledge/affirm", "My Pledge", Icon::Pledge, "nav-my-pledge"),
                NavItem::new("/profile", "Profile", Icon::User, "nav-profile"),
                NavItem::new("/billing", "Billing", Icon::CreditCard, "nav-billing"),
            ],
            crm_link: NavItem::new("/crm/{enterpriseId}", "CRM", Icon::Briefcase, "nav-crm"),
            crm_workspace: vec![
                NavItem::new("/crm/{enterpriseId}", "Overview", Icon::Dashboard, "crm-overview"),
                NavItem::new("/crm/{enterpriseId}/people", "People", Icon::Users, "crm-people"),
                NavItem::new(
                    "/crm/{enterpriseId}/opportunities",
                    "Opportunities",
                    Icon::Target,
                    "crm-opportunities",
                ),
                NavItem::new("/crm/{enterpriseId}/tasks", "Tasks", Icon::CheckSquare, "crm-tasks"),
                NavItem::new("/crm/{enterpriseId}/reports", "Reports", Icon::BarChart, "crm-reports")
                    .crm_pro(),
                NavItem::new(
                    "/crm/{enterpriseId}/automations",
                    "Automations",
                    Icon::Zap,
                    "crm-automations",
                )
                .crm_pro(),
            ],
            admin: vec![
                NavItem::new("/admin", "Admin Dashboard", Icon::Shield, "admin-dashboard"),
                NavItem::new("/admin/users", "Users", Icon::Users, "admin-users"),
                NavItem::new("/admin/enterprises", "Enterprises", Icon::Building, "admin-enterprises"),
                NavItem::new(
                    "/admin/subscriptions",
                    "Subscriptions",
                    Icon::CreditCard,
                    "admin-subscriptions",
                ),
                NavItem::new("/admin/pledges", "Pledges", Icon::Pledge, "admin-pledges"),
                NavItem::new("/admin/settings", "Settings", Icon::Settings, "admin-settings"),
            ],
        }
    }
}

impl NavigationTable {
    /// Parse a table from TOML
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::InvalidTable {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a table from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        toml::from_str(&source).map_err(|e| ConfigError::InvalidTable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load from `path` if given, otherwise use the built-in table
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(shellexpand::tilde(p).as_ref()),
            None => Ok(Self::default()),
        }
    }
}
