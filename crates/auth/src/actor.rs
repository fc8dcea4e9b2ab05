//! Resolved actor context.

use serde::{Deserialize, Serialize};

use fablink_core::{DomainError, DomainResult, UserId};

use crate::Role;

/// A fully resolved actor for authorization decisions.
///
/// Construction is intentionally decoupled from transport: the identity
/// provider (external) resolves a session to an `Actor`, and every guarded
/// domain operation takes one explicitly. No ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            name: name.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require an exact role (admins always pass).
    pub fn require_role(&self, role: Role) -> DomainResult<()> {
        if self.role == role || self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "requires role '{role}', actor has '{}'",
                self.role
            )))
        }
    }

    /// Require that the actor is a specific user (admins always pass).
    ///
    /// Used for "party to the order" checks: only the order's creator may
    /// run setup operations, only the assigned manufacturer may advance it.
    pub fn require_user(&self, user_id: UserId, what: &str) -> DomainResult<()> {
        if self.user_id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!("actor is not {what}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor::new(UserId::new(), "test", role)
    }

    #[test]
    fn require_role_matches_exact_role() {
        assert!(actor(Role::Manufacturer).require_role(Role::Manufacturer).is_ok());
        assert!(actor(Role::Creator).require_role(Role::Creator).is_ok());
    }

    #[test]
    fn require_role_rejects_other_roles_with_forbidden() {
        let err = actor(Role::Creator)
            .require_role(Role::Manufacturer)
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn admin_passes_any_role_requirement() {
        assert!(actor(Role::Admin).require_role(Role::Creator).is_ok());
        assert!(actor(Role::Admin).require_role(Role::Manufacturer).is_ok());
    }

    #[test]
    fn require_user_checks_identity() {
        let a = actor(Role::Creator);
        assert!(a.require_user(a.user_id, "the order's creator").is_ok());

        let err = a
            .require_user(UserId::new(), "the order's creator")
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn admin_passes_identity_checks() {
        let a = actor(Role::Admin);
        assert!(a.require_user(UserId::new(), "the order's creator").is_ok());
    }
}
