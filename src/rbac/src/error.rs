//! Error types for the RBAC engine

use crate::validator::ConstraintCheck;
use rolegate_hierarchy::HierarchyError;
use thiserror::Error;

/// RBAC engine errors
#[derive(Debug, Error)]
pub enum RbacError {
    /// Referenced entity is absent from the backing store
    #[error("{entity} not found: {name}")]
    NotFound { entity: &'static str, name: String },

    /// Credential rejected or account locked by the authenticator
    #[error("Authentication failed for {user_id}: {reason}")]
    AuthenticationFailure { user_id: String, reason: String },

    /// A temporal/contextual constraint check failed
    #[error("Constraint violation on {entity}: {check} check failed")]
    ConstraintViolation {
        entity: String,
        check: ConstraintCheck,
    },

    /// A separation-of-duty cardinality would be exceeded
    #[error("Separation-of-duty violation: set {sd_set} (cardinality {cardinality}) over roles {conflicting:?}")]
    SodViolation {
        sd_set: String,
        cardinality: usize,
        conflicting: Vec<String>,
    },

    /// Invalid role hierarchy mutation
    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// Role activation was requested for a role the user is not assigned
    #[error("Role {role} is not assigned to user {user_id}")]
    NotAssigned { user_id: String, role: String },

    /// Role is already active in the session
    #[error("Role {role} is already active in this session")]
    AlreadyActive { role: String },

    /// Role is not active in the session
    #[error("Role {role} is not active in this session")]
    NotActive { role: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for RBAC operations
pub type Result<T> = std::result::Result<T, RbacError>;
