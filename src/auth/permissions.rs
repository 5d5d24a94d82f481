//! Permission catalog and authorization gate.
//!
//! Four cumulative role tiers over a closed permission set. The per-tier
//! tables are static; nothing here is mutated at runtime. Role strings from
//! the outside world are parsed at this boundary; an unrecognized role
//! holds no permissions and can manage nobody, it is never an error.

use std::str::FromStr;

use strum::{Display, EnumString};

use crate::auth::Principal;
use crate::error::AppError;

/// Ordered role tiers. Variant order is the authority ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Viewer,
    Moderator,
    Admin,
    SuperAdmin,
}

/// Fine-grained capabilities checked by the admin route handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Permission {
    ViewMessages,
    EditMessages,
    DeleteMessages,
    ViewUsers,
    CreateUsers,
    EditUsers,
    DeleteUsers,
    ViewFiles,
    UploadFiles,
    DeleteFiles,
    ViewTasks,
    CreateTasks,
    EditTasks,
    DeleteTasks,
    ViewMeetings,
    CreateMeetings,
    EditMeetings,
    DeleteMeetings,
    ViewActivity,
    ManagePages,
}

use Permission::*;

const VIEWER_PERMISSIONS: &[Permission] =
    &[ViewMessages, ViewUsers, ViewFiles, ViewTasks, ViewMeetings];

const MODERATOR_PERMISSIONS: &[Permission] = &[
    ViewMessages,
    ViewUsers,
    ViewFiles,
    ViewTasks,
    ViewMeetings,
    EditMessages,
    CreateTasks,
    EditTasks,
    CreateMeetings,
    EditMeetings,
    UploadFiles,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    ViewMessages,
    ViewUsers,
    ViewFiles,
    ViewTasks,
    ViewMeetings,
    EditMessages,
    CreateTasks,
    EditTasks,
    CreateMeetings,
    EditMeetings,
    UploadFiles,
    DeleteMessages,
    CreateUsers,
    EditUsers,
    DeleteTasks,
    DeleteMeetings,
    DeleteFiles,
    ViewActivity,
    ManagePages,
];

const SUPER_ADMIN_PERMISSIONS: &[Permission] = &[
    ViewMessages,
    ViewUsers,
    ViewFiles,
    ViewTasks,
    ViewMeetings,
    EditMessages,
    CreateTasks,
    EditTasks,
    CreateMeetings,
    EditMeetings,
    UploadFiles,
    DeleteMessages,
    CreateUsers,
    EditUsers,
    DeleteTasks,
    DeleteMeetings,
    DeleteFiles,
    ViewActivity,
    ManagePages,
    DeleteUsers,
];

/// Admin-UI sections and the capability each one requires.
const TAB_REQUIREMENTS: &[(&str, Permission)] = &[
    ("messages", ViewMessages),
    ("users", ViewUsers),
    ("files", ViewFiles),
    ("tasks", ViewTasks),
    ("meetings", ViewMeetings),
    ("activity", ViewActivity),
    ("pages", ManagePages),
];

impl Role {
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Viewer => VIEWER_PERMISSIONS,
            Role::Moderator => MODERATOR_PERMISSIONS,
            Role::Admin => ADMIN_PERMISSIONS,
            Role::SuperAdmin => SUPER_ADMIN_PERMISSIONS,
        }
    }

    /// Parse a role string from the token or database. `None` for anything
    /// outside the four known tiers.
    pub fn parse(role: &str) -> Option<Role> {
        Role::from_str(role).ok()
    }
}

/// Permission set for a role string. Unknown roles hold nothing.
pub fn role_permissions(role: &str) -> &'static [Permission] {
    match Role::parse(role) {
        Some(role) => role.permissions(),
        None => &[],
    }
}

pub fn has_permission(role: &str, permission: Permission) -> bool {
    role_permissions(role).contains(&permission)
}

/// Permission check against an optional principal; anonymous holds nothing.
pub fn user_has_permission(user: Option<&Principal>, permission: Permission) -> bool {
    user.is_some_and(|u| has_permission(&u.role, permission))
}

/// Whether `actor_role` may manage (edit the role of, or delete) a principal
/// holding `target_role`: strictly greater tier only. Equal or higher targets
/// are rejected regardless of any permission flags the actor holds, and any
/// unrecognized role on either side denies.
pub fn can_manage_role(actor_role: &str, target_role: &str) -> bool {
    match (Role::parse(actor_role), Role::parse(target_role)) {
        (Some(actor), Some(target)) => actor > target,
        _ => false,
    }
}

/// Guard for call sites that convert errors into 403 responses.
pub fn require_permission(user: &Principal, permission: Permission) -> Result<(), AppError> {
    if has_permission(&user.role, permission) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %user.id,
            role = %user.role,
            permission = %permission,
            "principal lacks required permission"
        );
        Err(AppError::PermissionDenied(permission))
    }
}

/// Whether the principal may open the named admin-UI section.
/// Unknown tab names are always denied.
pub fn can_access_tab(user: Option<&Principal>, tab: &str) -> bool {
    let Some((_, required)) = TAB_REQUIREMENTS.iter().find(|(name, _)| *name == tab) else {
        return false;
    };
    user_has_permission(user, *required)
}

/// The admin-UI sections the principal may open, in display order.
pub fn accessible_tabs(user: &Principal) -> Vec<&'static str> {
    TAB_REQUIREMENTS
        .iter()
        .filter(|(_, required)| has_permission(&user.role, *required))
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: &str) -> Principal {
        Principal {
            id: "u1".to_string(),
            email: "user@example.com".to_string(),
            name: "User".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Viewer < Role::Moderator);
        assert!(Role::Moderator < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
    }

    #[test]
    fn test_role_string_roundtrip() {
        for (s, role) in [
            ("viewer", Role::Viewer),
            ("moderator", Role::Moderator),
            ("admin", Role::Admin),
            ("super_admin", Role::SuperAdmin),
        ] {
            assert_eq!(Role::parse(s), Some(role));
            assert_eq!(role.to_string(), s);
        }
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Role::parse(""), None);
    }

    /// Every tier holds a superset of every lower tier.
    #[test]
    fn test_tiers_are_monotonic() {
        let tiers = [Role::Viewer, Role::Moderator, Role::Admin, Role::SuperAdmin];
        for pair in tiers.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            for permission in lower.permissions() {
                assert!(
                    higher.permissions().contains(permission),
                    "{higher} is missing {permission} held by {lower}"
                );
            }
            assert!(higher.permissions().len() > lower.permissions().len());
        }
    }

    #[test]
    fn test_unknown_role_holds_nothing() {
        assert!(role_permissions("root").is_empty());
        assert!(!has_permission("root", ViewMessages));
    }

    #[test]
    fn test_admin_tier_scenario() {
        let admin = principal("admin");
        assert!(user_has_permission(Some(&admin), EditTasks));
        assert!(!user_has_permission(Some(&admin), DeleteUsers));
    }

    #[test]
    fn test_anonymous_holds_nothing() {
        assert!(!user_has_permission(None, ViewMessages));
    }

    #[test]
    fn test_can_manage_role_is_strictly_greater() {
        assert!(can_manage_role("super_admin", "admin"));
        assert!(can_manage_role("admin", "moderator"));
        assert!(can_manage_role("admin", "viewer"));
        assert!(!can_manage_role("super_admin", "super_admin"));
        assert!(!can_manage_role("admin", "super_admin"));
        assert!(!can_manage_role("viewer", "viewer"));
        assert!(!can_manage_role("unknown", "viewer"));
        assert!(!can_manage_role("admin", "unknown"));
    }

    #[test]
    fn test_require_permission_distinguishes_denial() {
        let viewer = principal("viewer");
        assert!(require_permission(&viewer, ViewTasks).is_ok());
        assert!(matches!(
            require_permission(&viewer, DeleteUsers),
            Err(AppError::PermissionDenied(DeleteUsers))
        ));
    }

    #[test]
    fn test_tab_access_fails_closed() {
        let viewer = principal("viewer");
        assert!(can_access_tab(Some(&viewer), "messages"));
        assert!(!can_access_tab(Some(&viewer), "activity"));
        assert!(!can_access_tab(Some(&viewer), "definitely-not-a-tab"));
        assert!(!can_access_tab(None, "messages"));
    }

    #[test]
    fn test_accessible_tabs_per_role() {
        assert_eq!(
            accessible_tabs(&principal("viewer")),
            vec!["messages", "users", "files", "tasks", "meetings"]
        );
        assert_eq!(accessible_tabs(&principal("super_admin")).len(), 7);
        assert!(accessible_tabs(&principal("mystery")).is_empty());
    }
}
