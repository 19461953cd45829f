//! Role classification
//!
//! Maps a raw user record onto one normalized [`Role`]. Classification is
//! total: malformed or unknown records land on the least privileged role
//! rather than producing an error.

use crate::access::types::{Role, User};
use tracing::trace;

/// Membership status that promotes a role-less user to [`Role::Member`]
const ACTIVE_MEMBERSHIP: &str = "active";

/// Classify a user, returning `None` when there is no authenticated user
pub fn classify(user: Option<&User>) -> Option<Role> {
    let user = user?;

    let raw = user.role.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        let active = user
            .membership_status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(ACTIVE_MEMBERSHIP));
        return Some(if active { Role::Member } else { Role::Visitor });
    }

    match Role::try_parse(raw) {
        Some(role) => Some(role),
        None => {
            trace!(role = raw, "Unknown role, classifying as visitor");
            Some(Role::Visitor)
        }
    }
}

/// Classify a user, treating the unauthenticated case as [`Role::Visitor`]
pub fn classify_or_visitor(user: Option<&User>) -> Role {
    classify(user).unwrap_or(Role::Visitor)
}
