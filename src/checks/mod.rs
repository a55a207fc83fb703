use poise::serenity_prelude::{Member, Permissions, RoleId};
use std::collections::HashSet;

/// Outcome of the authorization check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(DenyReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// An allow-list is configured and the user holds none of its roles.
    MissingAllowedRole,
    /// No allow-list is configured and the user lacks manage-messages.
    MissingManageMessages,
}

impl DenyReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::MissingAllowedRole => {
                "❌ Vous n'avez pas les permissions nécessaires pour utiliser ce bouton."
            }
            DenyReason::MissingManageMessages => {
                "❌ Vous devez avoir la permission 'Gérer les messages' pour utiliser ce bouton."
            }
        }
    }
}

/// Decides whether a user may trigger an alert. Pure, no side effects,
/// the caller renders the denial.
///
/// A configured allow-list fully replaces the manage-messages fallback.
/// Absent permissions (no guild membership context) never allow.
pub fn authorize(
    roles: &[RoleId],
    permissions: Option<Permissions>,
    allowed_roles: &HashSet<RoleId>,
) -> Access {
    if !allowed_roles.is_empty() {
        if roles.iter().any(|role| allowed_roles.contains(role)) {
            return Access::Allowed;
        }
        return Access::Denied(DenyReason::MissingAllowedRole);
    }

    match permissions {
        Some(permissions) if permissions.manage_messages() => Access::Allowed,
        _ => Access::Denied(DenyReason::MissingManageMessages),
    }
}

/// [`authorize`] over an optional guild member, as delivered by an
/// interaction. A missing member means no membership context.
pub fn member_access(member: Option<&Member>, allowed_roles: &HashSet<RoleId>) -> Access {
    match member {
        Some(member) => authorize(&member.roles, member.permissions, allowed_roles),
        None => authorize(&[], None, allowed_roles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(ids: &[u64]) -> HashSet<RoleId> {
        ids.iter().map(|id| RoleId::new(*id)).collect()
    }

    #[test]
    fn allow_list_requires_an_intersection() {
        let config = allowed(&[77]);
        let roles = vec![RoleId::new(12), RoleId::new(34)];
        assert_eq!(
            authorize(&roles, Some(Permissions::all()), &config),
            Access::Denied(DenyReason::MissingAllowedRole)
        );
        let roles = vec![RoleId::new(12), RoleId::new(77)];
        assert_eq!(authorize(&roles, None, &config), Access::Allowed);
    }

    #[test]
    fn allow_list_overrides_the_permission_fallback() {
        // Holding manage-messages does not help once an allow-list exists.
        let config = allowed(&[77]);
        assert_eq!(
            authorize(&[], Some(Permissions::MANAGE_MESSAGES), &config),
            Access::Denied(DenyReason::MissingAllowedRole)
        );
    }

    #[test]
    fn empty_allow_list_falls_back_to_manage_messages() {
        let config = HashSet::new();
        assert_eq!(
            authorize(&[], Some(Permissions::MANAGE_MESSAGES), &config),
            Access::Allowed
        );
        assert_eq!(
            authorize(&[], Some(Permissions::SEND_MESSAGES), &config),
            Access::Denied(DenyReason::MissingManageMessages)
        );
    }

    #[test]
    fn missing_membership_context_never_allows() {
        assert_eq!(
            authorize(&[], None, &HashSet::new()),
            Access::Denied(DenyReason::MissingManageMessages)
        );
        assert_eq!(member_access(None, &HashSet::new()), Access::Denied(DenyReason::MissingManageMessages));
    }

    #[test]
    fn authorize_is_pure() {
        let config = allowed(&[77]);
        let roles = vec![RoleId::new(12)];
        let first = authorize(&roles, Some(Permissions::empty()), &config);
        let second = authorize(&roles, Some(Permissions::empty()), &config);
        assert_eq!(first, second);
    }
}
