//! Entity model: users, roles, constraints, SD sets, sessions,
//! permissions.
//!
//! All entities are serde-friendly value types. The engine treats them
//! as immutable inputs and produces new values (sessions) rather than
//! mutating a shared object graph.

pub mod constraint;
pub mod permission;
pub mod role;
pub mod sdset;
pub mod session;
pub mod user;

pub use constraint::{Constraint, NONE};
pub use permission::Permission;
pub use role::{AdminRole, Role, UserAdminRole, UserRole};
pub use sdset::{SdSet, SdType};
pub use session::Session;
pub use user::{Credentials, User};
