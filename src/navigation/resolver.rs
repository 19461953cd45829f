//! Navigation resolution
//!
//! Combines a role, an optional workspace and the subscription state into the
//! set of navigation sections a user may see. Section visibility:
//!
//! | section  | `role_gated`                  | `authenticated`     |
//! |----------|-------------------------------|---------------------|
//! | public   | everyone                      | everyone            |
//! | member   | member, enterprise_owner, admin | any role but visitor |
//! | crm      | enterprise_owner, admin       | any role but visitor |
//! | admin    | admin                         | admin               |
//!
//! Items flagged `requires_crm_pro` are additionally dropped unless the
//! account holds an active CRM Pro or Build Pro Bundle plan.

use crate::access::{PlanType, Role, SubscriptionEvaluator, SubscriptionState};
use crate::config::{AudienceRule, NavigationPolicy};
use crate::navigation::items::{NavItem, Section};
use crate::navigation::table::NavigationTable;
use serde::Serialize;
use tracing::debug;

/// Inputs for one resolution
#[derive(Debug, Clone, Copy)]
pub struct NavigationContext<'a> {
    pub role: Option<Role>,
    pub workspace: Option<&'a str>,
    pub subscription: &'a SubscriptionState,
}

/// Visible navigation for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationBundle {
    pub public_links: Vec<NavItem>,
    pub member_menu: Option<Vec<NavItem>>,
    pub crm_link: Option<NavItem>,
    pub crm_menu: Option<Vec<NavItem>>,
    pub admin_menu: Option<Vec<NavItem>>,
}

/// Navigation resolver
///
/// Holds the immutable table and policy; [`NavigationResolver::resolve`] is a
/// pure function of its arguments.
#[derive(Debug, Clone)]
pub struct NavigationResolver {
    table: NavigationTable,
    member_menu: AudienceRule,
    crm_link: AudienceRule,
}

impl Default for NavigationResolver {
    fn default() -> Self {
        Self::new(NavigationTable::default(), &NavigationPolicy::default())
    }
}

impl NavigationResolver {
    pub fn new(table: NavigationTable, policy: &NavigationPolicy) -> Self {
        Self {
            table,
            member_menu: policy.member_menu,
            crm_link: policy.crm_link,
        }
    }

    pub fn table(&self) -> &NavigationTable {
        &self.table
    }

    /// Whether `role` may see `section` under this resolver's policy
    pub fn can_see(&self, section: Section, role: Option<Role>) -> bool {
        match section {
            Section::Public => true,
            Section::Member => audience_allows(
                self.member_menu,
                role,
                &[Role::Member, Role::EnterpriseOwner, Role::Admin],
            ),
            Section::Crm => {
                audience_allows(self.crm_link, role, &[Role::EnterpriseOwner, Role::Admin])
            }
            Section::Admin => role == Some(Role::Admin),
        }
    }

    /// Resolve the navigation bundle for a context
    pub fn resolve(&self, ctx: &NavigationContext<'_>) -> NavigationBundle {
        let crm_pro = SubscriptionEvaluator::new(ctx.subscription).has_access(PlanType::CrmPro);

        let section = |section: Section, items: &[NavItem]| -> Option<Vec<NavItem>> {
            self.can_see(section, ctx.role)
                .then(|| filter_items(items, ctx.workspace, crm_pro))
        };

        let bundle = NavigationBundle {
            public_links: filter_items(&self.table.public, ctx.workspace, crm_pro),
            member_menu: section(Section::Member, &self.table.member),
            crm_link: self
                .can_see(Section::Crm, ctx.role)
                .then(|| self.table.crm_link.for_workspace(ctx.workspace))
                .filter(|link| crm_pro || !link.requires_crm_pro),
            crm_menu: section(Section::Crm, &self.table.crm_workspace),
            admin_menu: section(Section::Admin, &self.table.admin),
        };

        debug!(
            role = ?ctx.role,
            workspace = ?ctx.workspace,
            member = bundle.member_menu.is_some(),
            crm = bundle.crm_link.is_some(),
            admin = bundle.admin_menu.is_some(),
            "Resolved navigation"
        );

        bundle
    }
}

/// `Visitor` is the unauthenticated convention and never counts as signed in
fn audience_allows(rule: AudienceRule, role: Option<Role>, gated: &[Role]) -> bool {
    match (rule, role) {
        (_, None | Some(Role::Visitor)) => false,
        (AudienceRule::Authenticated, Some(_)) => true,
        (AudienceRule::RoleGated, Some(role)) => gated.contains(&role),
    }
}

fn filter_items(items: &[NavItem], workspace: Option<&str>, crm_pro: bool) -> Vec<NavItem> {
    items
        .iter()
        .filter(|item| crm_pro || !item.requires_crm_pro)
        .map(|item| item.for_workspace(workspace))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Subscription, SubscriptionStatus};

    fn active(plan: PlanType) -> SubscriptionState {
        Subscription::new(plan, SubscriptionStatus::Active).into()
    }

    fn resolve(role: Option<Role>, state: &SubscriptionState) -> NavigationBundle {
        NavigationResolver::default().resolve(&NavigationContext {
            role,
            workspace: Some("ent-1"),
            subscription: state,
        })
    }

    #[test]
    fn test_anonymous_sees_public_only() {
        let state = active(PlanType::BuildProBundle);
        for role in [None, Some(Role::Visitor)] {
            let bundle = resolve(role, &state);
            assert!(!bundle.public_links.is_empty());
            assert!(bundle.member_menu.is_none());
            assert!(bundle.crm_link.is_none());
            assert!(bundle.crm_menu.is_none());
            assert!(bundle.admin_menu.is_none());
        }
    }

    #[test]
    fn test_member_has_member_menu_only() {
        let bundle = resolve(Some(Role::Member), &active(PlanType::Free));
        assert!(bundle.member_menu.is_some());
        assert!(bundle.crm_link.is_none());
        assert!(bundle.admin_menu.is_none());
    }

    #[test]
    fn test_owner_gets_workspace_links() {
        let bundle = resolve(Some(Role::EnterpriseOwner), &active(PlanType::CrmBasic));
        assert_eq!(bundle.crm_link.unwrap().href, "/crm/ent-1");
        let menu = bundle.crm_menu.unwrap();
        assert!(menu.iter().all(|i| !i.requires_crm_pro));
        assert!(menu.iter().any(|i| i.href == "/crm/ent-1/people"));
        assert!(bundle.admin_menu.is_none());
    }

    #[test]
    fn test_crm_pro_items_need_pro_plan() {
        let basic = resolve(Some(Role::Admin), &active(PlanType::CrmBasic));
        let pro = resolve(Some(Role::Admin), &active(PlanType::CrmPro));
        let bundle = resolve(Some(Role::Admin), &active(PlanType::BuildProBundle));

        let count = |b: &NavigationBundle| b.crm_menu.as_ref().unwrap().len();
        assert!(count(&basic) < count(&pro));
        assert_eq!(count(&pro), count(&bundle));
    }

    #[test]
    fn test_lapsed_pro_loses_pro_items() {
        let state: SubscriptionState =
            Subscription::new(PlanType::CrmPro, SubscriptionStatus::PastDue).into();
        let bundle = resolve(Some(Role::EnterpriseOwner), &state);
        assert!(
            bundle
                .crm_menu
                .unwrap()
                .iter()
                .all(|i| !i.requires_crm_pro)
        );
    }

    #[test]
    fn test_authenticated_policy() {
        let policy = NavigationPolicy {
            member_menu: AudienceRule::Authenticated,
            crm_link: AudienceRule::Authenticated,
            table_path: None,
        };
        let resolver = NavigationResolver::new(NavigationTable::default(), &policy);
        let state = active(PlanType::Free);

        let member = resolver.resolve(&NavigationContext {
            role: Some(Role::Member),
            workspace: None,
            subscription: &state,
        });
        assert!(member.member_menu.is_some());
        assert_eq!(member.crm_link.unwrap().href, "/crm/");
        assert!(member.admin_menu.is_none());

        let visitor = resolver.resolve(&NavigationContext {
            role: Some(Role::Visitor),
            workspace: None,
            subscription: &state,
        });
        assert!(visitor.member_menu.is_none());
        assert!(visitor.crm_link.is_none());
        assert!(visitor.crm_menu.is_none());

        let anonymous = resolver.resolve(&NavigationContext {
            role: None,
            workspace: None,
            subscription: &state,
        });
        assert!(anonymous.member_menu.is_none());
        assert!(anonymous.crm_link.is_none());
    }
}
