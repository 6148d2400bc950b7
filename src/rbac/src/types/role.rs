//! Role entities and user-to-role assignments

use super::constraint::Constraint;
use serde::{Deserialize, Serialize};

/// A named role in one of the two hierarchies.
///
/// `parents` are the roles this role directly inherits permissions
/// from; `children` are the roles that directly inherit from it. The
/// optional constraint is the default applied to assignments that do
/// not carry their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role name within its role type
    pub name: String,

    /// Direct parent role names (this role inherits their permissions)
    #[serde(default)]
    pub parents: Vec<String>,

    /// Direct child role names (they inherit this role's permissions)
    #[serde(default)]
    pub children: Vec<String>,

    /// Default activation constraint for assignments of this role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

/// Administrative role. Same shape as [`Role`] but lives in the
/// independent admin hierarchy.
pub type AdminRole = Role;

/// Assignment of an RBAC role to a user.
///
/// Assignments are ordered: session activation walks them in stored
/// order. An assignment may override the role's default constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    /// Assigned role name
    pub name: String,

    /// Constraint override for this assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

impl UserRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Effective constraint: the assignment's own override if set,
    /// otherwise the role's default.
    pub fn effective_constraint(&self, role: &Role) -> Option<Constraint> {
        self.constraint
            .clone()
            .or_else(|| role.constraint.clone())
    }
}

/// Assignment of an administrative role to a user. Resolution rules
/// match [`UserRole`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAdminRole {
    /// Assigned admin role name
    pub name: String,

    /// Constraint override for this assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
}

impl UserAdminRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Effective constraint: the assignment's own override if set,
    /// otherwise the admin role's default.
    pub fn effective_constraint(&self, role: &AdminRole) -> Option<Constraint> {
        self.constraint
            .clone()
            .or_else(|| role.constraint.clone())
    }
}
