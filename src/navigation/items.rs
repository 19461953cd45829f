//! Navigation item types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder replaced by the current workspace's enterprise id
pub const WORKSPACE_PLACEHOLDER: &str = "{enterpriseId}";

/// Named navigation section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Public,
    Member,
    Crm,
    Admin,
}

impl Section {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Section::Public => "public",
            Section::Member => "member",
            Section::Crm => "crm",
            Section::Admin => "admin",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Symbolic icon identifier, resolved to a glyph by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Home,
    Directory,
    Pledge,
    Pricing,
    Info,
    Dashboard,
    Heart,
    User,
    CreditCard,
    Briefcase,
    Users,
    Target,
    CheckSquare,
    BarChart,
    Zap,
    Building,
    Shield,
    Settings,
}

/// A single navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub href: String,
    pub label: String,
    pub icon: Icon,
    pub test_id: String,
    /// Hidden unless the account holds an active CRM Pro (or higher) plan
    #[serde(default)]
    pub requires_crm_pro: bool,
}

impl NavItem {
    pub fn new(href: &str, label: &str, icon: Icon, test_id: &str) -> Self {
        Self {
            href: href.to_string(),
            label: label.to_string(),
            icon,
            test_id: test_id.to_string(),
            requires_crm_pro: false,
        }
    }

    pub fn crm_pro(mut self) -> Self {
        self.requires_crm_pro = true;
        self
    }

    pub fn is_workspace_scoped(&self) -> bool {
        self.href.contains(WORKSPACE_PLACEHOLDER)
    }

    /// Copy of this item with the workspace placeholder filled in.
    ///
    /// Without a workspace the placeholder becomes empty.
    pub fn for_workspace(&self, workspace: Option<&str>) -> Self {
        if !self.is_workspace_scoped() {
            return self.clone();
        }
        let id = workspace
            .map(|w| urlencoding::encode(w).into_owned())
            .unwrap_or_default();
        Self {
            href: self.href.replace(WORKSPACE_PLACEHOLDER, &id),
            ..self.clone()
        }
    }
}
