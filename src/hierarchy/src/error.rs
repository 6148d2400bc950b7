//! Error types for role hierarchy mutations and queries

use thiserror::Error;

/// Role hierarchy errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// Referenced role is not a node in this graph
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Adding the edge would create an inheritance cycle
    #[error("Inheritance cycle: {child} already passes its permissions to {parent}")]
    CycleDetected { parent: String, child: String },

    /// The inheritance relation is already present
    #[error("Inheritance already exists between {parent} and {child}")]
    EdgeExists { parent: String, child: String },

    /// The inheritance relation does not exist
    #[error("No inheritance relation between {parent} and {child}")]
    EdgeNotFound { parent: String, child: String },

    /// Removal would leave a connected role with no remaining relations
    #[error("Cannot remove last remaining relation of role {0}")]
    LastRelation(String),

    /// Internal lock failure
    #[error("Hierarchy lock error: {0}")]
    Lock(String),
}

/// Result type for hierarchy operations
pub type Result<T> = std::result::Result<T, HierarchyError>;
