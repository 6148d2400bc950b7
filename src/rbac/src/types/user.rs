//! User entity and credentials

use super::constraint::Constraint;
use super::role::{UserAdminRole, UserRole};
use serde::{Deserialize, Serialize};

/// A user known to the backing directory.
///
/// Carries the ordered RBAC and admin role assignments plus the user's
/// own activation constraint. Users are value types: the engine never
/// mutates a stored user, it builds sessions from copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub user_id: String,

    /// Ordered RBAC role assignments
    #[serde(default)]
    pub roles: Vec<UserRole>,

    /// Ordered administrative role assignments
    #[serde(default)]
    pub admin_roles: Vec<UserAdminRole>,

    /// The user's own activation constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

impl User {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_admin_role(mut self, role: UserAdminRole) -> Self {
        self.admin_roles.push(role);
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Whether the user is assigned the named RBAC role.
    pub fn is_assigned(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.name == role)
    }
}

/// Credentials presented at session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// User identifier
    pub user_id: String,

    /// Opaque credential handed to the authenticator
    pub password: String,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
        }
    }
}
