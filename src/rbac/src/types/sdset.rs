//! Separation-of-duty set definitions

use crate::error::{RbacError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which activation scope a separation-of-duty set governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SdType {
    /// Enforced against a user's full assignment set at assignment time
    Static,
    /// Enforced against a session's active role set at activation time
    Dynamic,
}

/// A named set of mutually-exclusive roles with a cardinality.
///
/// At most `cardinality - 1` member roles (counting inherited
/// membership) may be simultaneously assigned (static) or activated in
/// one session (dynamic) for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdSet {
    /// Unique set name
    pub name: String,

    /// Scope of enforcement
    #[serde(rename = "type")]
    pub sd_type: SdType,

    /// Member role names
    pub members: HashSet<String>,

    /// Threshold n: at most n-1 members may coexist
    pub cardinality: usize,
}

impl SdSet {
    pub fn new(name: impl Into<String>, sd_type: SdType, cardinality: usize) -> Self {
        Self {
            name: name.into(),
            sd_type,
            members: HashSet::new(),
            cardinality,
        }
    }

    pub fn with_member(mut self, role: impl Into<String>) -> Self {
        self.members.insert(role.into());
        self
    }

    /// Validate the set definition: cardinality must be at least 2 and
    /// the member set must not be empty.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(RbacError::InvalidInput(
                "SD set name cannot be empty".to_string(),
            ));
        }
        if self.cardinality < 2 {
            return Err(RbacError::InvalidInput(format!(
                "SD set '{}' cardinality must be >= 2, got {}",
                self.name, self.cardinality
            )));
        }
        if self.members.is_empty() {
            return Err(RbacError::InvalidInput(format!(
                "SD set '{}' has no members",
                self.name
            )));
        }
        Ok(())
    }
}
