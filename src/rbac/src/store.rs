//! Collaborator contracts and in-memory implementations
//!
//! The engine is storage-agnostic: users, roles, SD sets, and
//! credential checking are supplied through these traits. The memory
//! implementations back the test suite and small embeddings; directory
//! or database adapters live in host crates.

use crate::error::{RbacError, Result};
use crate::types::{AdminRole, Role, SdSet, SdType, User, UserRole};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Read access to user entities and their role assignments.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Load a user with its assignments and constraint.
    async fn get_user(&self, user_id: &str) -> Result<User>;

    /// A user's RBAC role assignments, in stored assignment order.
    async fn get_assigned_roles(&self, user_id: &str) -> Result<Vec<UserRole>>;
}

/// Read access to role entities of both types.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Load an RBAC role with parents, children, and default constraint.
    async fn get_role(&self, name: &str) -> Result<Role>;

    /// All RBAC roles; used to rebuild the hierarchy graph.
    async fn list_roles(&self) -> Result<Vec<Role>>;

    /// Load an administrative role.
    async fn get_admin_role(&self, name: &str) -> Result<AdminRole>;

    /// All admin roles; used to rebuild the admin hierarchy graph.
    async fn list_admin_roles(&self) -> Result<Vec<AdminRole>>;
}

/// Read access to separation-of-duty set definitions.
#[async_trait]
pub trait SdSetStore: Send + Sync {
    /// All SD sets of the given type.
    async fn list_sd_sets(&self, sd_type: SdType) -> Result<Vec<SdSet>>;
}

/// Credential verification. Opaque to the engine; implementations may
/// consult password policies, lockout state, or external providers.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify the credential for the user. Must return
    /// [`RbacError::AuthenticationFailure`] on any rejection.
    async fn authenticate(&self, user_id: &str, password: &str) -> Result<()>;
}

/// In-memory user store.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user.user_id.clone(), user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_user(&self, user_id: &str) -> Result<User> {
        self.users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(user_id)
            .cloned()
            .ok_or_else(|| RbacError::NotFound {
                entity: "user",
                name: user_id.to_string(),
            })
    }

    async fn get_assigned_roles(&self, user_id: &str) -> Result<Vec<UserRole>> {
        Ok(self.get_user(user_id).await?.roles)
    }
}

/// In-memory role store holding both role types.
#[derive(Default)]
pub struct MemoryRoleStore {
    roles: RwLock<HashMap<String, Role>>,
    admin_roles: RwLock<HashMap<String, AdminRole>>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, role: Role) {
        self.roles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(role.name.clone(), role);
    }

    pub fn insert_admin(&self, role: AdminRole) {
        self.admin_roles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(role.name.clone(), role);
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn get_role(&self, name: &str) -> Result<Role> {
        self.roles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
            .ok_or_else(|| RbacError::NotFound {
                entity: "role",
                name: name.to_string(),
            })
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        Ok(self
            .roles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect())
    }

    async fn get_admin_role(&self, name: &str) -> Result<AdminRole> {
        self.admin_roles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
            .ok_or_else(|| RbacError::NotFound {
                entity: "admin role",
                name: name.to_string(),
            })
    }

    async fn list_admin_roles(&self) -> Result<Vec<AdminRole>> {
        Ok(self
            .admin_roles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect())
    }
}

/// In-memory SD set store.
#[derive(Default)]
pub struct MemorySdSetStore {
    sets: RwLock<Vec<SdSet>>,
}

impl MemorySdSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a set after validating its definition.
    pub fn insert(&self, set: SdSet) -> Result<()> {
        set.validate()?;
        self.sets
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(set);
        Ok(())
    }
}

#[async_trait]
impl SdSetStore for MemorySdSetStore {
    async fn list_sd_sets(&self, sd_type: SdType) -> Result<Vec<SdSet>> {
        Ok(self
            .sets
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|s| s.sd_type == sd_type)
            .cloned()
            .collect())
    }
}

/// In-memory authenticator with per-user lockout.
#[derive(Default)]
pub struct MemoryAuthenticator {
    passwords: RwLock<HashMap<String, String>>,
    locked: RwLock<HashMap<String, bool>>,
}

impl MemoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_password(&self, user_id: impl Into<String>, password: impl Into<String>) {
        self.passwords
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user_id.into(), password.into());
    }

    pub fn set_locked(&self, user_id: impl Into<String>, locked: bool) {
        self.locked
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user_id.into(), locked);
    }
}

#[async_trait]
impl Authenticator for MemoryAuthenticator {
    async fn authenticate(&self, user_id: &str, password: &str) -> Result<()> {
        if self
            .locked
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(user_id)
            .copied()
            .unwrap_or(false)
        {
            return Err(RbacError::AuthenticationFailure {
                user_id: user_id.to_string(),
                reason: "account is locked".to_string(),
            });
        }

        let stored = self
            .passwords
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(user_id)
            .cloned();

        match stored {
            Some(expected) if expected == password => Ok(()),
            _ => Err(RbacError::AuthenticationFailure {
                user_id: user_id.to_string(),
                reason: "invalid credentials".to_string(),
            }),
        }
    }
}
