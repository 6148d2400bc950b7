//! # Rolegate RBAC Engine
//!
//! ANSI INCITS 359 RBAC decision core: user/role/permission
//! assignment, hierarchical inheritance, static and dynamic
//! separation of duty, and temporal constraints on role activation.
//!
//! The crate is a library invoked in-process by a session or
//! management layer. Storage, credential checking, and audit belong
//! to collaborators injected through the traits in [`store`].
//!
//! ## Example
//!
//! ```rust
//! use rolegate_rbac::{
//!     AccessEngine, Credentials, MemoryAuthenticator, MemoryRoleStore,
//!     MemorySdSetStore, MemoryUserStore, Role, User, UserRole,
//! };
//! use rolegate_hierarchy::RoleGraph;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let users = Arc::new(MemoryUserStore::new());
//!     let roles = Arc::new(MemoryRoleStore::new());
//!     let auth = Arc::new(MemoryAuthenticator::new());
//!
//!     roles.insert(Role::new("teller"));
//!     users.insert(User::new("alice").with_role(UserRole::new("teller")));
//!     auth.set_password("alice", "secret");
//!
//!     let engine = AccessEngine::new(
//!         users,
//!         roles,
//!         Arc::new(MemorySdSetStore::new()),
//!         auth,
//!         Arc::new(RoleGraph::new()),
//!         Arc::new(RoleGraph::new()),
//!     );
//!     engine.rebuild_hierarchy().await?;
//!
//!     let session = engine
//!         .create_session(&Credentials::new("alice", "secret"), false)
//!         .await?;
//!     assert!(session.is_active("teller"));
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod sod;
pub mod store;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use engine::AccessEngine;
pub use error::{RbacError, Result};
pub use sod::SodChecker;
pub use store::{
    Authenticator, MemoryAuthenticator, MemoryRoleStore, MemorySdSetStore, MemoryUserStore,
    RoleStore, SdSetStore, UserStore,
};
pub use types::{
    AdminRole, Constraint, Credentials, Permission, Role, SdSet, SdType, Session, User,
    UserAdminRole, UserRole,
};
pub use validator::{ConstraintCheck, TimeContext};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
