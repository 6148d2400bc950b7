//! # Rolegate Role Hierarchy
//!
//! Directed acyclic graph of role inheritance relations, shared by the
//! RBAC engine for inheritance and separation-of-duty evaluation.
//!
//! An inheritance relation `add_inheritance(parent, child)` means the
//! child role inherits the parent's permissions. The graph rejects any
//! mutation that would introduce a cycle, duplicate a relation, or
//! strand a connected role, so readers can rely on closure queries
//! always terminating and never containing the queried role itself.
//!
//! ## Example
//!
//! ```rust
//! use rolegate_hierarchy::RoleGraph;
//!
//! let graph = RoleGraph::new();
//! graph.add_role("employee")?;
//! graph.add_role("engineer")?;
//! graph.add_inheritance("employee", "engineer")?;
//!
//! assert!(graph.ascendants("engineer")?.contains("employee"));
//! # Ok::<(), rolegate_hierarchy::HierarchyError>(())
//! ```

pub mod error;
pub mod graph;

pub use error::{HierarchyError, Result};
pub use graph::RoleGraph;
