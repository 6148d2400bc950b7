//! Permission entity

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An operation on a protected object, granted to roles and
/// (exceptionally) directly to users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Protected object name (e.g. "account")
    pub object: String,

    /// Operation on the object (e.g. "withdraw")
    pub operation: String,

    /// Roles granted this permission
    #[serde(default)]
    pub roles: HashSet<String>,

    /// Users granted this permission directly
    #[serde(default)]
    pub users: HashSet<String>,
}

impl Permission {
    pub fn new(object: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            operation: operation.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.users.insert(user.into());
        self
    }
}
